//! Request middleware pipeline
//!
//! A route handler is wrapped by an ordered chain of middleware. Each
//! middleware receives the request together with a `Next` continuation and
//! either runs it or answers the request itself.

pub mod logging;

pub use logging::LogToFile;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Response future produced by handlers and middleware
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response<Full<Bytes>>> + Send>>;

/// Endpoint that produces the response for a request
pub trait Handler<B>: Send + Sync {
    fn call(&self, req: Request<B>) -> HandlerFuture;
}

impl<B, F, Fut> Handler<B> for F
where
    F: Fn(Request<B>) -> Fut + Send + Sync,
    Fut: Future<Output = Response<Full<Bytes>>> + Send + 'static,
{
    fn call(&self, req: Request<B>) -> HandlerFuture {
        Box::pin(self(req))
    }
}

/// Interceptor running before the handler
pub trait Middleware<B>: Send + Sync {
    fn handle(&self, req: Request<B>, next: Next<B>) -> HandlerFuture;
}

/// The rest of the chain after the current middleware
pub struct Next<B> {
    chain: Arc<[Arc<dyn Middleware<B>>]>,
    position: usize,
    endpoint: Arc<dyn Handler<B>>,
}

impl<B> Next<B> {
    pub fn new(chain: Arc<[Arc<dyn Middleware<B>>]>, endpoint: Arc<dyn Handler<B>>) -> Self {
        Self {
            chain,
            position: 0,
            endpoint,
        }
    }

    /// Run the next middleware, or the endpoint once the chain is exhausted
    pub fn run(self, req: Request<B>) -> HandlerFuture {
        match self.chain.get(self.position).cloned() {
            Some(middleware) => {
                let rest = Self {
                    chain: self.chain,
                    position: self.position + 1,
                    endpoint: self.endpoint,
                };
                middleware.handle(req, rest)
            }
            None => self.endpoint.call(req),
        }
    }
}
