//! Request-to-file logging middleware
//!
//! Every request passing through is captured as a `RequestLog` and written
//! to its own file before the rest of the chain runs. A request whose record
//! cannot be written never reaches the handler.

use super::{HandlerFuture, Middleware, Next};
use crate::http;
use crate::logger::{self, LogWriter};
use crate::request_log::{RequestLog, RequestLogStore};
use hyper::body::Body;
use hyper::Request;
use std::sync::Arc;

pub struct LogToFile {
    store: Arc<RequestLogStore>,
    diagnostics: Arc<LogWriter>,
    access_log: bool,
}

impl LogToFile {
    pub const fn new(
        store: Arc<RequestLogStore>,
        diagnostics: Arc<LogWriter>,
        access_log: bool,
    ) -> Self {
        Self {
            store,
            diagnostics,
            access_log,
        }
    }
}

impl<B> Middleware<B> for LogToFile
where
    B: Body + Send + 'static,
{
    fn handle(&self, req: Request<B>, next: Next<B>) -> HandlerFuture {
        let record = RequestLog::from_request(&req);
        let store = Arc::clone(&self.store);
        let diagnostics = Arc::clone(&self.diagnostics);
        let access_log = self.access_log;

        Box::pin(async move {
            match store.persist(&record).await {
                Ok(path) => {
                    if access_log {
                        logger::log_record_persisted(
                            &diagnostics,
                            &record.method,
                            &record.uri,
                            &path,
                        );
                    }
                    next.run(req).await
                }
                Err(err) => {
                    logger::log_persist_failure(&diagnostics, &err);
                    http::build_persist_failure_response()
                }
            }
        })
    }
}
