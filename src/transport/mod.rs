//! Transport module
//!
//! The byte sink a response is written to. The response path only produces
//! header lines and body bytes; framing (including chunked encoding once it
//! has been announced) belongs to the implementation.

pub mod channel;
#[cfg(test)]
pub mod recording;

pub use channel::{HyperTransport, ResponseBody};

use std::io;

/// Outgoing side of one response
///
/// The first header line is the status line and an empty line closes the
/// header block. A write error means the peer is gone: callers stop writing
/// and must not call [`Transport::end_body`] afterwards.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send_header_line(&mut self, line: &str) -> io::Result<()>;

    async fn send_body(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Signal that the body is complete
    async fn end_body(&mut self) -> io::Result<()>;
}
