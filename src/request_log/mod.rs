//! Per-request records
//!
//! A `RequestLog` is an immutable snapshot of one inbound request, taken by
//! the logging middleware before the request is routed any further.

mod error;
pub mod store;

pub use error::PersistError;
pub use store::RequestLogStore;

use chrono::{DateTime, Utc};
use hyper::body::Body;
use hyper::header::{HeaderMap, HOST};
use hyper::Request;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;

/// Peer address of the connection a request arrived on.
///
/// Inserted into request extensions by the connection layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientAddr(pub SocketAddr);

/// Snapshot of one HTTP request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestLog {
    pub method: String,
    pub uri: String,
    pub host: String,
    pub header: String,
    pub remote_addr: String,
    pub content_length: String,
    pub time: DateTime<Utc>,
}

impl RequestLog {
    /// Capture a request as it arrives
    pub fn from_request<B: Body>(req: &Request<B>) -> Self {
        let remote_addr = req
            .extensions()
            .get::<ClientAddr>()
            .map(|addr| addr.0.to_string())
            .unwrap_or_default();

        Self {
            method: req.method().to_string(),
            uri: req.uri().to_string(),
            host: request_host(req),
            header: render_headers(req.headers()),
            remote_addr,
            content_length: content_length(req.body()),
            time: Utc::now(),
        }
    }
}

/// Authority of an absolute-form URI, otherwise the Host header
fn request_host<B>(req: &Request<B>) -> String {
    if let Some(authority) = req.uri().authority() {
        return authority.to_string();
    }
    req.headers()
        .get(HOST)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

/// Exact body length, `-1` when it is not known up front (chunked)
fn content_length<B: Body>(body: &B) -> String {
    body.size_hint()
        .exact()
        .map_or_else(|| "-1".to_string(), |len| len.to_string())
}

/// Render every header on one line: `map[Accept:[*/*] X-Tag:[a b]]`
///
/// Names are canonicalized and sorted; repeated headers keep arrival order.
/// `Host` is left out, the record carries it in its own field.
pub fn render_headers(headers: &HeaderMap) -> String {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        if name == HOST {
            continue;
        }
        grouped
            .entry(canonical_header_name(name.as_str()))
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }

    let entries: Vec<String> = grouped
        .iter()
        .map(|(name, values)| format!("{name}:[{}]", values.join(" ")))
        .collect();
    format!("map[{}]", entries.join(" "))
}

/// `x-forwarded-for` -> `X-Forwarded-For`
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
            })
        })
        .collect::<Vec<_>>()
        .join("-")
}
