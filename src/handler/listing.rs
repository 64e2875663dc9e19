//! Directory listing module
//!
//! Renders an HTML index of a directory: subdirectories first, then files,
//! each group in byte-wise name order. Children are stat'ed at render time and
//! any child that cannot be stat'ed is left out.

use crate::handler::resource::Resource;
use crate::http::mime::resolve_mime;
use crate::http::validator::format_http_date;
use crate::logger;
use crate::transport::Transport;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::ffi::OsString;
use std::io;
use std::path::Path;
use tokio::fs;

/// Bytes that would end or redirect the path part of an href
const HREF_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One row of the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Display name, lossily converted when not UTF-8
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: DateTime<Utc>,
    /// Set for files only
    pub mime: Option<&'static str>,
}

/// Enumerate and stat the children of `dir`, sorted by name bytes
///
/// `.` is skipped; `..` is listed like any other child. A failure part way
/// through enumeration keeps the names read so far.
pub async fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut names = vec![OsString::from("..")];
    let mut reader = fs::read_dir(dir).await?;
    loop {
        let next = reader
            .next_entry()
            .await
            .map(|child| child.map(|c| c.file_name()));
        if !push_name(&mut names, next, dir) {
            break;
        }
    }
    names.sort_by(|a, b| a.as_encoded_bytes().cmp(b.as_encoded_bytes()));

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        let Ok(meta) = fs::metadata(&path).await else {
            continue;
        };
        let is_dir = meta.is_dir();
        entries.push(Entry {
            mime: (!is_dir).then(|| resolve_mime(&path.to_string_lossy())),
            name: name.to_string_lossy().into_owned(),
            is_dir,
            size: meta.len(),
            modified: meta
                .modified()
                .map_or(DateTime::<Utc>::UNIX_EPOCH, DateTime::<Utc>::from),
        });
    }

    Ok(entries)
}

/// Record one enumeration step, false once there is nothing more to read
fn push_name(names: &mut Vec<OsString>, next: io::Result<Option<OsString>>, dir: &Path) -> bool {
    match next {
        Ok(Some(name)) => {
            if name != "." {
                names.push(name);
            }
            true
        }
        Ok(None) => false,
        Err(e) => {
            logger::log_warning(&format!(
                "Listing of '{}' cut short: {e}",
                dir.display()
            ));
            false
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[allow(clippy::cast_precision_loss)]
fn kibibytes(size: u64) -> f64 {
    size as f64 / 1024.0
}

pub fn page_header(logical: &str) -> String {
    let path = escape_html(logical);
    format!(
        "<html><head><title>Index of {path}</title></head>\
         <body><h1>Index of {path}</h1><hr /><ol>"
    )
}

pub const PAGE_FOOTER: &str = "</ol><hr /></body></html>";

pub fn render_row(logical: &str, entry: &Entry) -> String {
    let target = format!("{logical}{}", entry.name);
    let href = escape_html(&utf8_percent_encode(&target, HREF_ESCAPE).to_string());
    let name = escape_html(&entry.name);
    let modified = format_http_date(&entry.modified);
    let size = kibibytes(entry.size);

    match entry.mime {
        None => format!(
            "<li><strong><a href='{href}'>{name}</a>/</strong><br />\
             <small>modified: {modified}<br />directory - {size:.2} kbyte\
             <br /><br /></small></li>"
        ),
        Some(mime) => format!(
            "<li><strong><a href='{href}'>{name}</a></strong><br />\
             <small>modified: {modified}<br />{mime} - {size:.2} kbyte<br />\
             <br /></small></li>"
        ),
    }
}

/// Stream the listing of `dir` through the transport
pub async fn render<T: Transport>(transport: &mut T, dir: &Resource) -> io::Result<()> {
    let entries = read_entries(&dir.physical).await.unwrap_or_else(|e| {
        logger::log_warning(&format!(
            "Failed to list directory '{}': {e}",
            dir.physical.display()
        ));
        Vec::new()
    });

    transport
        .send_body(page_header(&dir.logical).as_bytes())
        .await?;

    let dirs = entries.iter().filter(|e| e.is_dir);
    let files = entries.iter().filter(|e| !e.is_dir);
    for entry in dirs.chain(files) {
        transport
            .send_body(render_row(&dir.logical, entry).as_bytes())
            .await?;
    }

    transport.send_body(PAGE_FOOTER.as_bytes()).await
}
