//! Conditional request module
//!
//! Evaluates `If-Modified-Since`, `If-Match`, `If-Range`,
//! `If-Unmodified-Since` and `If-None-Match` against a resource's validators.
//! Checks run in that order and the first one that does not pass decides the
//! outcome.

use crate::http::request::RequestInfo;
use crate::http::validator::{parse_http_date, Validators};

/// Result of the precondition chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Serve the resource
    Proceed,
    /// 304, the client copy is current
    NotModified,
    /// 412, a precondition does not hold
    PreconditionFailed,
}

type Check = fn(&RequestInfo, &Validators) -> Outcome;

/// Evaluation order matters and is part of the observable behavior
const CHECKS: [Check; 5] = [
    if_modified_since,
    if_match,
    if_range,
    if_unmodified_since,
    if_none_match,
];

/// Run all checks, stopping at the first one that does not yield `Proceed`
pub fn evaluate(req: &RequestInfo, validators: &Validators) -> Outcome {
    CHECKS
        .iter()
        .map(|check| check(req, validators))
        .find(|outcome| *outcome != Outcome::Proceed)
        .unwrap_or(Outcome::Proceed)
}

/// Split an entity-tag list on spaces and commas
fn tokens(header: &str) -> impl Iterator<Item = &str> {
    header
        .split([' ', ','])
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn list_matches(header: &str, etag: &str) -> bool {
    tokens(header).any(|t| t == "*" || t == etag)
}

fn if_modified_since(req: &RequestInfo, v: &Validators) -> Outcome {
    match req.header("If-Modified-Since").and_then(parse_http_date) {
        Some(since) if since.timestamp() >= v.last_modified.timestamp() => Outcome::NotModified,
        _ => Outcome::Proceed,
    }
}

fn if_match(req: &RequestInfo, v: &Validators) -> Outcome {
    match req.header("If-Match") {
        Some(list) if !list_matches(list, &v.etag) => Outcome::PreconditionFailed,
        _ => Outcome::Proceed,
    }
}

/// Partial content is not supported, so any If-Range fails
fn if_range(req: &RequestInfo, _: &Validators) -> Outcome {
    if req.header("If-Range").is_some() {
        Outcome::PreconditionFailed
    } else {
        Outcome::Proceed
    }
}

fn if_unmodified_since(req: &RequestInfo, v: &Validators) -> Outcome {
    match req.header("If-Unmodified-Since").and_then(parse_http_date) {
        Some(since) if since.timestamp() < v.last_modified.timestamp() => {
            Outcome::PreconditionFailed
        }
        _ => Outcome::Proceed,
    }
}

fn if_none_match(req: &RequestInfo, v: &Validators) -> Outcome {
    match req.header("If-None-Match") {
        Some(list) if list_matches(list, &v.etag) => {
            if req.method.is_retrieval() {
                Outcome::NotModified
            } else {
                Outcome::PreconditionFailed
            }
        }
        _ => Outcome::Proceed,
    }
}
