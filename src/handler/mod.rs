//! Request handler module
//!
//! Route handlers and the router that dispatches to them.

pub mod home;
pub mod router;

pub use router::Router;

use crate::logger::LogWriter;
use crate::middleware::LogToFile;
use crate::request_log::RequestLogStore;
use hyper::body::Body;
use std::sync::Arc;

/// Application routes, every one of them logged to file first
pub fn build_router<B>(
    store: Arc<RequestLogStore>,
    diagnostics: Arc<LogWriter>,
    access_log: bool,
) -> Router<B>
where
    B: Body + Send + 'static,
{
    Router::new()
        .route("/", home::home::<B>)
        .with_middleware(LogToFile::new(store, diagnostics, access_log))
}
