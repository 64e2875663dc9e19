//! HTTP protocol layer module
//!
//! Validators, conditional request evaluation, MIME lookup and response line
//! building. Nothing here touches the filesystem or the socket.

pub mod mime;
pub mod precondition;
pub mod request;
pub mod response;
pub mod validator;

// Re-export commonly used types
pub use request::RequestInfo;
