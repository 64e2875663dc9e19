//! Request handler module
//!
//! Static response path: resource resolution, response composition and
//! directory listings, plus the hyper-facing dispatch entry point.

pub mod composer;
pub mod listing;
pub mod resource;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
