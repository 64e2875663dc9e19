//! Cache validator module
//!
//! Builds `ETag` values from file identity and renders/parses HTTP dates.
//! Everything here returns owned values, so it is safe to call from any number
//! of in-flight requests at once.

use crate::handler::resource::ResourceMeta;
use chrono::{DateTime, NaiveDateTime, Utc};

/// IMF-fixdate, the preferred HTTP date form
const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
/// Obsolete RFC 850 form
const RFC850_DATE: &str = "%A, %d-%b-%y %H:%M:%S GMT";
/// Obsolete ANSI C `asctime()` form
const ASCTIME_DATE: &str = "%a %b %e %H:%M:%S %Y";

/// Validators derived from a resource's current metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validators {
    pub etag: String,
    pub last_modified: DateTime<Utc>,
}

impl Validators {
    pub fn from_meta(meta: &ResourceMeta) -> Self {
        Self {
            etag: make_entity_tag(meta),
            last_modified: meta.modified,
        }
    }
}

/// Build the entity tag for a resource
///
/// Three lowercase hex fields (inode, size, mtime seconds) joined by `-` and
/// quoted, e.g. `"2a1-3e8-5f2c1a00"`. External caches parse this format.
pub fn make_entity_tag(meta: &ResourceMeta) -> String {
    format!(
        "\"{:x}-{:x}-{:x}\"",
        meta.inode,
        meta.size,
        meta.modified.timestamp()
    )
}

/// Render an instant as an HTTP date, always in GMT
///
/// # Examples
/// ```ignore
/// let t = DateTime::from_timestamp(784_111_777, 0).unwrap();
/// assert_eq!(format_http_date(&t), "Sun, 06 Nov 1994 08:49:37 GMT");
/// ```
pub fn format_http_date(instant: &DateTime<Utc>) -> String {
    instant.format(IMF_FIXDATE).to_string()
}

/// Parse an HTTP date header value
///
/// Accepts IMF-fixdate (plus anything else RFC 2822 allows), RFC 850 and
/// asctime forms. Returns `None` when nothing matches; callers treat that as
/// "condition does not apply".
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    [IMF_FIXDATE, RFC850_DATE, ASCTIME_DATE]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}
