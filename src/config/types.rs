// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Connection handling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Upper bound for serving one connection, in seconds
    pub request_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Static response configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub document_root: PathBuf,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
    #[serde(default = "default_directory_listing")]
    pub directory_listing: bool,
    /// Bytes per file read while streaming a body
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

#[allow(clippy::missing_const_for_fn)]
fn default_directory_listing() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_read_buffer_size() -> usize {
    4096
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_defaults() {
        let http: HttpConfig = toml::from_str(r#"document_root = "/srv/www""#).unwrap();
        assert_eq!(http.document_root, PathBuf::from("/srv/www"));
        assert_eq!(http.index_files, vec!["index.html", "index.htm"]);
        assert!(http.directory_listing);
        assert_eq!(http.read_buffer_size, 4096);
    }

    #[test]
    fn test_logging_section() {
        let logging: LoggingConfig = toml::from_str(
            r#"
            level = "debug"
            access_log = false
            error_log_file = "/var/log/uhttpd/error.log"
            "#,
        )
        .unwrap();
        assert!(!logging.access_log);
        assert_eq!(logging.access_log_format, "combined");
        assert_eq!(logging.access_log_file, None);
        assert_eq!(
            logging.error_log_file.as_deref(),
            Some("/var/log/uhttpd/error.log")
        );
    }
}
