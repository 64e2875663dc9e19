//! In-memory transport for tests

use super::Transport;
use std::io;

/// Records everything written to it; can be told to fail body writes
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub header_lines: Vec<String>,
    pub body: Vec<u8>,
    pub body_writes: usize,
    pub ended: bool,
    fail_after: Option<usize>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `writes` body writes, then fail every following one
    pub fn failing_after(writes: usize) -> Self {
        Self {
            fail_after: Some(writes),
            ..Self::default()
        }
    }

    pub fn status_line(&self) -> &str {
        self.header_lines.first().map_or("", String::as_str)
    }

    /// Header lines between the status line and the blank line
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.header_lines
            .iter()
            .skip(1)
            .take_while(|l| !l.is_empty())
            .map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers().find_map(|line| {
            let (n, v) = line.split_once(':')?;
            n.eq_ignore_ascii_case(name).then(|| v.trim())
        })
    }

    pub fn header_names(&self) -> Vec<&str> {
        self.headers()
            .filter_map(|line| line.split_once(':').map(|(n, _)| n))
            .collect()
    }

    pub fn headers_closed(&self) -> bool {
        self.header_lines.iter().any(String::is_empty)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Transport for RecordingTransport {
    async fn send_header_line(&mut self, line: &str) -> io::Result<()> {
        self.header_lines.push(line.to_string());
        Ok(())
    }

    async fn send_body(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.fail_after.is_some_and(|limit| self.body_writes >= limit) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer went away"));
        }
        self.body_writes += 1;
        self.body.extend_from_slice(bytes);
        Ok(())
    }

    async fn end_body(&mut self) -> io::Result<()> {
        self.ended = true;
        Ok(())
    }
}
