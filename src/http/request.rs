//! Request descriptor module
//!
//! The parsed view of a request the response path reads from: method,
//! protocol version and an ordered header list.

use hyper::{Request, Version};
use std::fmt;

/// Request method, only GET and HEAD are told apart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Other(String),
}

impl Method {
    pub fn parse(method: &str) -> Self {
        match method {
            "GET" => Self::Get,
            "HEAD" => Self::Head,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Other(m) => m,
        }
    }

    /// GET or HEAD
    pub const fn is_retrieval(&self) -> bool {
        matches!(self, Self::Get | Self::Head)
    }
}

/// Numeric HTTP protocol version, ordered so `1.1 > 1.0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    pub const HTTP_1_0: Self = Self { major: 1, minor: 0 };
    pub const HTTP_1_1: Self = Self { major: 1, minor: 1 };

    /// Versions above 1.0 get chunked bodies
    pub fn supports_chunked(self) -> bool {
        self > Self::HTTP_1_0
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl From<Version> for ProtocolVersion {
    fn from(version: Version) -> Self {
        if version == Version::HTTP_09 {
            Self { major: 0, minor: 9 }
        } else if version == Version::HTTP_10 {
            Self::HTTP_1_0
        } else if version == Version::HTTP_2 {
            Self { major: 2, minor: 0 }
        } else if version == Version::HTTP_3 {
            Self { major: 3, minor: 0 }
        } else {
            Self::HTTP_1_1
        }
    }
}

/// Request descriptor consumed by the response composer
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub version: ProtocolVersion,
    headers: Vec<(String, String)>,
}

impl RequestInfo {
    #[cfg(test)]
    pub const fn new(method: Method, version: ProtocolVersion) -> Self {
        Self {
            method,
            version,
            headers: Vec::new(),
        }
    }

    /// Append a header, keeping arrival order
    #[cfg(test)]
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Case-insensitive lookup, first match wins
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::Head
    }
}

impl<B> From<&Request<B>> for RequestInfo {
    fn from(req: &Request<B>) -> Self {
        let headers = req
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Self {
            method: Method::parse(req.method().as_str()),
            version: req.version().into(),
            headers,
        }
    }
}
