//! Response composer module
//!
//! Entry point of the static response path: given the resolved resource (or
//! none) it writes exactly one complete response through the transport.

use crate::config::HttpConfig;
use crate::handler::listing;
use crate::handler::resource::Resource;
use crate::http::mime::resolve_mime;
use crate::http::precondition::{self, Outcome};
use crate::http::request::RequestInfo;
use crate::http::response::{
    end_headers, send_chunked_header, send_error, send_header, send_status,
    send_validator_headers, Status, FORBIDDEN_BODY, NOT_FOUND_BODY,
};
use crate::http::validator::Validators;
use crate::logger;
use crate::transport::Transport;
use std::io;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Per-server knobs of the response path
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub directory_listing: bool,
    pub read_buffer_size: usize,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            directory_listing: true,
            read_buffer_size: 4096,
        }
    }
}

impl From<&HttpConfig> for ServeOptions {
    fn from(http: &HttpConfig) -> Self {
        Self {
            directory_listing: http.directory_listing,
            read_buffer_size: http.read_buffer_size.max(1),
        }
    }
}

/// Write the response for `resource`, or a 404 when resolution failed
///
/// An error means the transport failed after the response had started; the
/// caller can only log it.
pub async fn respond<T: Transport>(
    transport: &mut T,
    req: &RequestInfo,
    resource: Option<&Resource>,
    opts: &ServeOptions,
) -> io::Result<()> {
    let Some(resource) = resource else {
        return send_error(transport, req.version, Status::NotFound, NOT_FOUND_BODY).await;
    };

    if resource.meta.is_file {
        match File::open(&resource.physical).await {
            Ok(file) => return serve_file(transport, req, resource, file, opts).await,
            Err(e) => logger::log_warning(&format!(
                "Failed to open '{}': {e}",
                resource.physical.display()
            )),
        }
    } else if resource.meta.is_dir && opts.directory_listing {
        return serve_directory(transport, req, resource).await;
    }

    send_error(transport, req.version, Status::Forbidden, FORBIDDEN_BODY).await
}

async fn serve_file<T: Transport>(
    transport: &mut T,
    req: &RequestInfo,
    resource: &Resource,
    file: File,
    opts: &ServeOptions,
) -> io::Result<()> {
    let validators = Validators::from_meta(&resource.meta);

    match precondition::evaluate(req, &validators) {
        Outcome::Proceed => {}
        Outcome::NotModified => {
            send_status(transport, req.version, Status::NotModified).await?;
            send_validator_headers(transport, Some(&validators)).await?;
            return end_headers(transport).await;
        }
        Outcome::PreconditionFailed => {
            send_status(transport, req.version, Status::PreconditionFailed).await?;
            send_validator_headers(transport, None).await?;
            return end_headers(transport).await;
        }
    }

    send_status(transport, req.version, Status::Ok).await?;
    send_validator_headers(transport, Some(&validators)).await?;
    send_header(transport, "Content-Type", resolve_mime(&resource.logical)).await?;
    send_header(transport, "Content-Length", resource.meta.size).await?;
    send_chunked_header(transport, req.version).await?;
    end_headers(transport).await?;

    if !req.is_head() {
        pump_file(transport, file, opts.read_buffer_size).await?;
    }
    transport.end_body().await
}

/// Copy the file to the transport in fixed-size reads
///
/// Returns on the first read or write error; the file is closed on drop.
async fn pump_file<T: Transport>(
    transport: &mut T,
    mut file: File,
    buffer_size: usize,
) -> io::Result<()> {
    let mut buf = vec![0u8; buffer_size];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        transport.send_body(&buf[..n]).await?;
    }
}

async fn serve_directory<T: Transport>(
    transport: &mut T,
    req: &RequestInfo,
    resource: &Resource,
) -> io::Result<()> {
    send_status(transport, req.version, Status::Ok).await?;
    send_validator_headers(transport, None).await?;
    send_chunked_header(transport, req.version).await?;
    send_header(transport, "Content-Type", "text/html").await?;
    end_headers(transport).await?;

    if !req.is_head() {
        listing::render(transport, resource).await?;
    }
    transport.end_body().await
}
