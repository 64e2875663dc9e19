//! Hyper-backed transport
//!
//! Header lines are collected into a response head that is handed to hyper as
//! soon as the header block closes. Body bytes then travel through a bounded
//! channel into [`ChannelBody`], which hyper polls while writing to the socket.

use super::Transport;
use http_body_util::combinators::BoxBody;
use http_body_util::BodyExt;
use hyper::body::{Body, Bytes, Frame};
use hyper::header::{HeaderName, HeaderValue, CONTENT_LENGTH, TRANSFER_ENCODING};
use hyper::{HeaderMap, Response, StatusCode};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};

/// Chunks buffered between the composer and hyper
const BODY_CHANNEL_CAPACITY: usize = 8;

pub type ResponseBody = BoxBody<Bytes, io::Error>;

/// Response body fed from the transport's channel
pub struct ChannelBody {
    rx: mpsc::Receiver<Bytes>,
}

impl Body for ChannelBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        self.get_mut()
            .rx
            .poll_recv(cx)
            .map(|chunk| chunk.map(|bytes| Ok(Frame::data(bytes))))
    }
}

/// Body that ends immediately, for responses produced without a transport
pub fn empty_body() -> ResponseBody {
    let (_, rx) = mpsc::channel(1);
    ChannelBody { rx }.boxed()
}

/// Transport that turns header lines and body bytes into a hyper response
pub struct HyperTransport {
    status: Option<StatusCode>,
    headers: HeaderMap,
    head_tx: Option<oneshot::Sender<Response<ResponseBody>>>,
    body_tx: Option<mpsc::Sender<Bytes>>,
}

impl HyperTransport {
    /// Create a transport and the receiver its response head arrives on
    pub fn new() -> (Self, oneshot::Receiver<Response<ResponseBody>>) {
        let (head_tx, head_rx) = oneshot::channel();
        let transport = Self {
            status: None,
            headers: HeaderMap::new(),
            head_tx: Some(head_tx),
            body_tx: None,
        };
        (transport, head_rx)
    }

    fn parse_status_line(line: &str) -> io::Result<StatusCode> {
        line.split(' ')
            .nth(1)
            .and_then(|code| code.parse::<u16>().ok())
            .and_then(|code| StatusCode::from_u16(code).ok())
            .ok_or_else(|| invalid(format!("malformed status line: {line}")))
    }

    fn push_header(&mut self, line: &str) -> io::Result<()> {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| invalid(format!("malformed header line: {line}")))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(invalid)?;
        let value = HeaderValue::from_str(value.trim()).map_err(invalid)?;
        self.headers.append(name, value);
        Ok(())
    }

    fn is_chunked(&self) -> bool {
        self.headers
            .get_all(TRANSFER_ENCODING)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| v.eq_ignore_ascii_case("chunked"))
    }

    fn close_head(&mut self) -> io::Result<()> {
        let status = self
            .status
            .ok_or_else(|| invalid("header block closed before status line"))?;

        // Hyper does the chunk framing, a length alongside it is invalid
        if self.is_chunked() {
            self.headers.remove(CONTENT_LENGTH);
        }

        let (body_tx, rx) = mpsc::channel(BODY_CHANNEL_CAPACITY);
        self.body_tx = Some(body_tx);

        let mut response = Response::new(ChannelBody { rx }.boxed());
        *response.status_mut() = status;
        *response.headers_mut() = std::mem::take(&mut self.headers);

        self.head_tx
            .take()
            .ok_or_else(|| invalid("header block already closed"))?
            .send(response)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response head dropped"))
    }
}

impl Transport for HyperTransport {
    async fn send_header_line(&mut self, line: &str) -> io::Result<()> {
        if self.head_tx.is_none() {
            return Err(invalid("header block already closed"));
        }

        if line.is_empty() {
            self.close_head()
        } else if self.status.is_none() {
            self.status = Some(Self::parse_status_line(line)?);
            Ok(())
        } else {
            self.push_header(line)
        }
    }

    async fn send_body(&mut self, bytes: &[u8]) -> io::Result<()> {
        let tx = self
            .body_tx
            .as_ref()
            .ok_or_else(|| invalid("body sent before header block closed"))?;

        tx.send(Bytes::copy_from_slice(bytes))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "peer closed the response body"))
    }

    async fn end_body(&mut self) -> io::Result<()> {
        // Dropping the sender ends the body stream
        self.body_tx.take();
        Ok(())
    }
}

fn invalid<E>(err: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, err)
}
