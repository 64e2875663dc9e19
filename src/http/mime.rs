//! MIME type detection module
//!
//! Returns the Content-Type for a resource name by looking its extension up
//! in a static, ordered table.

/// Fallback when no extension matches
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extension to Content-Type table, scanned in order (first match wins)
static MIME_TYPES: &[(&str, &str)] = &[
    // Text
    ("txt", "text/plain"),
    ("log", "text/plain"),
    ("cfg", "text/plain"),
    ("conf", "text/plain"),
    ("README", "text/plain"),
    ("md", "text/plain"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("mjs", "text/javascript"),
    ("diff", "text/x-patch"),
    ("patch", "text/x-patch"),
    ("c", "text/x-csrc"),
    ("h", "text/x-chdr"),
    ("o", "text/x-object"),
    ("ko", "text/x-object"),
    // Images
    ("bmp", "image/bmp"),
    ("gif", "image/gif"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    // Application
    ("json", "application/json"),
    ("wasm", "application/wasm"),
    ("xml", "application/xml"),
    ("xsl", "application/xml"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("tar", "application/x-tar"),
    ("tgz", "application/x-compressed-tar"),
    ("deb", "application/x-deb"),
    ("iso", "application/x-cd-image"),
    ("doc", "application/msword"),
    ("xls", "application/vnd.ms-excel"),
    ("ppt", "application/vnd.ms-powerpoint"),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("odp", "application/vnd.oasis.opendocument.presentation"),
    ("pl", "application/x-perl"),
    ("sh", "application/x-shellscript"),
    ("php", "application/x-php"),
    ("pac", "application/x-ns-proxy-autoconfig"),
    // Audio
    ("mp3", "audio/mpeg"),
    ("ogg", "audio/x-vorbis+ogg"),
    ("wav", "audio/x-wav"),
    ("flac", "audio/flac"),
    // Video
    ("mpg", "video/mpeg"),
    ("mpeg", "video/mpeg"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("avi", "video/x-msvideo"),
    // Fonts
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
];

/// Extract the lookup key of a path
///
/// The key starts after whichever of the last `/` or last `.` comes later, so
/// `docs/README` yields `README` while `a.b/c` yields `c`.
fn extension_of(path: &str) -> Option<&str> {
    let split = match (path.rfind('/'), path.rfind('.')) {
        (Some(slash), Some(dot)) => slash.max(dot),
        (None, Some(dot)) => dot,
        (Some(slash), None) => slash,
        (None, None) => return None,
    };

    Some(&path[split + 1..]).filter(|ext| !ext.is_empty())
}

/// Get MIME Content-Type for a resource name or path
///
/// # Examples
/// ```ignore
/// assert_eq!(resolve_mime("/www/index.HTML"), "text/html");
/// assert_eq!(resolve_mime("noext"), "application/octet-stream");
/// ```
pub fn resolve_mime(path: &str) -> &'static str {
    extension_of(path)
        .and_then(|ext| {
            MIME_TYPES
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        })
        .map_or(DEFAULT_CONTENT_TYPE, |&(_, mime)| mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(resolve_mime("index.html"), "text/html");
        assert_eq!(resolve_mime("/css/site.css"), "text/css");
        assert_eq!(resolve_mime("app.js"), "text/javascript");
        assert_eq!(resolve_mime("data.json"), "application/json");
        assert_eq!(resolve_mime("logo.png"), "image/png");
        assert_eq!(resolve_mime("clip.mp4"), "video/mp4");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(resolve_mime("a.b/c.TXT"), "text/plain");
        assert_eq!(resolve_mime("PHOTO.JpEg"), "image/jpeg");
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(resolve_mime("noext"), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolve_mime(".hidden"), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolve_mime("archive.xyz"), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolve_mime("trailing."), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolve_mime("dir/"), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolve_mime(""), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_dot_in_directory_segment() {
        // Extension must not be taken from a parent directory name
        assert_eq!(resolve_mime("site.d/noext"), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolve_mime("v1.txt/plain"), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_slash_wins_for_bare_names() {
        assert_eq!(resolve_mime("pkg/README"), "text/plain");
        assert_eq!(resolve_mime("/srv/proxy.pac"), "application/x-ns-proxy-autoconfig");
    }
}
