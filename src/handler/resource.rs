//! Resource descriptor module
//!
//! A filesystem object already located under the document root and stat'ed,
//! plus the resolver that produces it from a request path.

use crate::logger;
use chrono::{DateTime, Utc};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Metadata snapshot the validators are derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMeta {
    pub inode: u64,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub is_dir: bool,
    pub is_file: bool,
}

impl ResourceMeta {
    /// Modification times are kept at one-second resolution
    pub fn from_metadata(meta: &Metadata) -> Self {
        let modified = meta
            .modified()
            .ok()
            .map_or(DateTime::<Utc>::UNIX_EPOCH, DateTime::<Utc>::from);

        Self {
            inode: inode_of(meta),
            size: meta.len(),
            modified: DateTime::from_timestamp(modified.timestamp(), 0)
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
        }
    }
}

#[cfg(unix)]
fn inode_of(meta: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.ino()
}

#[cfg(not(unix))]
const fn inode_of(_: &Metadata) -> u64 {
    0
}

/// Resolved resource for one request
#[derive(Debug, Clone)]
pub struct Resource {
    /// Location on disk
    pub physical: PathBuf,
    /// Request path used to build links; ends with `/` for directories
    pub logical: String,
    pub meta: ResourceMeta,
}

impl Resource {
    pub async fn stat(physical: PathBuf, logical: String) -> std::io::Result<Self> {
        let meta = ResourceMeta::from_metadata(&fs::metadata(&physical).await?);
        let logical = if meta.is_dir && !logical.ends_with('/') {
            format!("{logical}/")
        } else {
            logical
        };

        Ok(Self {
            physical,
            logical,
            meta,
        })
    }
}

/// Resolve a request path below `document_root`
///
/// Returns `None` when nothing exists there or when the path would escape the
/// document root. Directories are replaced by their first existing index file.
pub async fn resolve(
    document_root: &Path,
    request_path: &str,
    index_files: &[String],
) -> Option<Resource> {
    let relative = request_path.trim_start_matches('/');

    let root = match fs::canonicalize(document_root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Document root not found or inaccessible '{}': {e}",
                document_root.display()
            ));
            return None;
        }
    };

    // Missing files are the common 404 case, not worth a log line
    let physical = fs::canonicalize(root.join(relative)).await.ok()?;
    if !physical.starts_with(&root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            physical.display()
        ));
        return None;
    }

    let mut logical = request_path.to_string();
    let mut physical = physical;

    if fs::metadata(&physical).await.ok()?.is_dir() {
        for index in index_files {
            let candidate = physical.join(index);
            if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
                if !logical.ends_with('/') {
                    logical.push('/');
                }
                logical.push_str(index);
                physical = candidate;
                break;
            }
        }
    }

    Resource::stat(physical, logical).await.ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), b"0123456789").unwrap();

        let res = resolve(dir.path(), "/hello.txt", &[]).await.unwrap();
        assert!(res.meta.is_file);
        assert!(!res.meta.is_dir);
        assert_eq!(res.meta.size, 10);
        assert_eq!(res.logical, "/hello.txt");
    }

    #[tokio::test]
    async fn test_resolve_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve(dir.path(), "/nope.txt", &[]).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_directory_gets_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let res = resolve(dir.path(), "/sub", &[]).await.unwrap();
        assert!(res.meta.is_dir);
        assert_eq!(res.logical, "/sub/");
    }

    #[tokio::test]
    async fn test_resolve_index_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("site")).unwrap();
        std::fs::write(dir.path().join("site/index.html"), b"<p>hi</p>").unwrap();

        let index = vec!["index.htm".to_string(), "index.html".to_string()];
        let res = resolve(dir.path(), "/site/", &index).await.unwrap();
        assert!(res.meta.is_file);
        assert_eq!(res.logical, "/site/index.html");
        assert!(res.physical.ends_with("index.html"));
    }

    #[tokio::test]
    async fn test_resolve_blocks_traversal() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("root");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.txt"), b"x").unwrap();

        assert!(resolve(&root, "/../secret.txt", &[]).await.is_none());
    }

    #[test]
    fn test_meta_truncates_to_seconds() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let meta = ResourceMeta::from_metadata(&file.as_file().metadata().unwrap());
        assert_eq!(meta.modified.timestamp_subsec_nanos(), 0);
        assert!(meta.is_file);
    }
}
