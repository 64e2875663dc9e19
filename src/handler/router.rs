//! Request dispatch module
//!
//! Entry point for HTTP request processing: turns a hyper request into a
//! request descriptor, resolves the target below the document root and runs
//! the response composer on a hyper-backed transport.

use crate::config::Config;
use crate::handler::composer::{self, ServeOptions};
use crate::handler::resource;
use crate::http::RequestInfo;
use crate::logger::{self, AccessLogEntry};
use crate::transport::channel::empty_body;
use crate::transport::{HyperTransport, ResponseBody};
use hyper::header::{CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::{Request, Response, StatusCode};
use percent_encoding::percent_decode_str;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Must run inside a `LocalSet`: the composer is spawned locally so it can
/// keep streaming the body after the response head has been returned.
pub async fn handle_request<B>(
    req: Request<B>,
    config: Arc<Config>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let info = RequestInfo::from(&req);
    let raw_path = req.uri().path();

    let resource = match percent_decode_str(raw_path).decode_utf8() {
        Ok(path) => {
            resource::resolve(&config.http.document_root, &path, &config.http.index_files).await
        }
        Err(_) => {
            logger::log_warning(&format!("Request path is not valid UTF-8: {raw_path}"));
            None
        }
    };

    let opts = ServeOptions::from(&config.http);
    let (mut transport, head_rx) = HyperTransport::new();
    let task_info = info.clone();
    tokio::task::spawn_local(async move {
        if let Err(e) =
            composer::respond(&mut transport, &task_info, resource.as_ref(), &opts).await
        {
            logger::log_warning(&format!("Response aborted: {e}"));
        }
    });

    let response = head_rx.await.unwrap_or_else(|_| {
        logger::log_error("Response ended before its header block was complete");
        let mut fallback = Response::new(empty_body());
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    });

    if config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            info.method.as_str().to_string(),
            raw_path.to_string(),
        );
        entry.http_version = info.version.to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        entry.referer = info.header(REFERER.as_str()).map(ToString::to_string);
        entry.user_agent = info.header(USER_AGENT.as_str()).map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &config.logging.access_log_format);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};
    use http_body_util::BodyExt;
    use hyper::Version;
    use std::path::Path;

    fn test_config(root: &Path) -> Arc<Config> {
        Arc::new(Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive: true,
                request_timeout: 30,
                max_connections: None,
            },
            http: HttpConfig {
                document_root: root.to_path_buf(),
                index_files: vec!["index.html".to_string()],
                directory_listing: true,
                read_buffer_size: 4,
            },
        })
    }

    async fn send(req: Request<()>, config: Arc<Config>) -> (Response<ResponseBody>, Vec<u8>) {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let peer = "127.0.0.1:40000".parse().unwrap();
                let response = handle_request(req, config, peer).await.unwrap();
                let (parts, body) = response.into_parts();
                let bytes = body.collect().await.unwrap().to_bytes().to_vec();
                (Response::from_parts(parts, empty_body()), bytes)
            })
            .await
    }

    #[tokio::test]
    async fn test_serves_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ten bytes.txt"), b"0123456789").unwrap();

        let req = Request::get("/ten%20bytes.txt").body(()).unwrap();
        let (response, body) = send(req, test_config(dir.path())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/plain");
        assert!(response.headers().contains_key("etag"));
        assert_eq!(body, b"0123456789");
    }

    #[tokio::test]
    async fn test_http10_keeps_content_length() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"abc").unwrap();

        let req = Request::get("/a.txt")
            .version(Version::HTTP_10)
            .body(())
            .unwrap();
        let (response, body) = send(req, test_config(dir.path())).await;

        assert_eq!(response.headers()["content-length"], "3");
        assert!(response.headers().get("transfer-encoding").is_none());
        assert_eq!(body, b"abc");
    }

    #[tokio::test]
    async fn test_conditional_get_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"abc").unwrap();
        let config = test_config(dir.path());

        let (first, _) = send(Request::get("/a.txt").body(()).unwrap(), Arc::clone(&config)).await;
        let etag = first.headers()["etag"].to_str().unwrap().to_string();

        let req = Request::get("/a.txt")
            .header("If-None-Match", &etag)
            .body(())
            .unwrap();
        let (second, body) = send(req, config).await;
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(second.headers()["etag"], etag.as_str());
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let req = Request::get("/missing").body(()).unwrap();
        let (response, body) = send(req, test_config(dir.path())).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body, b"No such file or directory");
    }

    #[tokio::test]
    async fn test_directory_listing_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pub")).unwrap();
        std::fs::write(dir.path().join("pub/x.png"), b"png").unwrap();

        let req = Request::get("/pub/").body(()).unwrap();
        let (response, body) = send(req, test_config(dir.path())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/html");
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("<h1>Index of /pub/</h1>"));
        assert!(html.contains("image/png - 0.00 kbyte"));
    }
}
