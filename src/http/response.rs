//! HTTP response building module
//!
//! Status lines, header lines and the fixed error responses, written through
//! a [`Transport`].

use crate::http::request::ProtocolVersion;
use crate::http::validator::{format_http_date, Validators};
use crate::transport::Transport;
use chrono::Utc;
use std::io;

pub const FORBIDDEN_BODY: &str = "Access to this resource is forbidden";
pub const NOT_FOUND_BODY: &str = "No such file or directory";

/// Statuses the static response path can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotModified,
    Forbidden,
    NotFound,
    PreconditionFailed,
}

impl Status {
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NotModified => 304,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::PreconditionFailed => 412,
        }
    }

    pub const fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NotModified => "Not Modified",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::PreconditionFailed => "Precondition Failed",
        }
    }
}

/// `HTTP/<version> <code> <reason>`
pub fn status_line(version: ProtocolVersion, status: Status) -> String {
    format!("HTTP/{version} {} {}", status.code(), status.reason())
}

pub async fn send_status<T: Transport>(
    transport: &mut T,
    version: ProtocolVersion,
    status: Status,
) -> io::Result<()> {
    transport
        .send_header_line(&status_line(version, status))
        .await
}

pub async fn send_header<T: Transport>(
    transport: &mut T,
    name: &str,
    value: impl std::fmt::Display,
) -> io::Result<()> {
    transport.send_header_line(&format!("{name}: {value}")).await
}

/// `ETag` and `Last-Modified` when validators are given, then `Date`
pub async fn send_validator_headers<T: Transport>(
    transport: &mut T,
    validators: Option<&Validators>,
) -> io::Result<()> {
    if let Some(v) = validators {
        send_header(transport, "ETag", &v.etag).await?;
        send_header(transport, "Last-Modified", format_http_date(&v.last_modified)).await?;
    }
    send_header(transport, "Date", format_http_date(&Utc::now())).await
}

/// Announce chunked framing for clients newer than HTTP/1.0
pub async fn send_chunked_header<T: Transport>(
    transport: &mut T,
    version: ProtocolVersion,
) -> io::Result<()> {
    if version.supports_chunked() {
        send_header(transport, "Transfer-Encoding", "chunked").await?;
    }
    Ok(())
}

/// Close the header block
pub async fn end_headers<T: Transport>(transport: &mut T) -> io::Result<()> {
    transport.send_header_line("").await
}

/// Complete response with a short plain-text body
pub async fn send_error<T: Transport>(
    transport: &mut T,
    version: ProtocolVersion,
    status: Status,
    body: &str,
) -> io::Result<()> {
    send_status(transport, version, status).await?;
    send_validator_headers(transport, None).await?;
    send_header(transport, "Content-Type", "text/plain").await?;
    send_header(transport, "Content-Length", body.len()).await?;
    end_headers(transport).await?;
    transport.send_body(body.as_bytes()).await?;
    transport.end_body().await
}
