//! Request routing dispatch module
//!
//! Maps exact request paths to handlers and wraps every registered handler
//! in the global middleware chain. Unmatched paths get the 404 response
//! without running any middleware.

use crate::http;
use crate::middleware::{Handler, HandlerFuture, Middleware, Next};
use hyper::Request;
use std::collections::HashMap;
use std::sync::Arc;

pub struct Router<B> {
    routes: HashMap<String, Arc<dyn Handler<B>>>,
    middleware: Arc<[Arc<dyn Middleware<B>>]>,
}

impl<B: 'static> Router<B> {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            middleware: Arc::from(Vec::new()),
        }
    }

    /// Register a handler for an exact path, any method
    #[must_use]
    pub fn route(mut self, path: &str, handler: impl Handler<B> + 'static) -> Self {
        self.routes.insert(path.to_string(), Arc::new(handler));
        self
    }

    /// Append a middleware that wraps every registered route
    #[must_use]
    pub fn with_middleware(mut self, middleware: impl Middleware<B> + 'static) -> Self {
        let mut chain = self.middleware.to_vec();
        chain.push(Arc::new(middleware));
        self.middleware = Arc::from(chain);
        self
    }

    /// Route a request through the middleware chain to its handler
    pub fn dispatch(&self, req: Request<B>) -> HandlerFuture {
        let handler = self.routes.get(req.uri().path()).cloned();
        match handler {
            Some(handler) => Next::new(Arc::clone(&self.middleware), handler).run(req),
            None => Box::pin(async { http::build_404_response() }),
        }
    }
}

impl<B: 'static> Default for Router<B> {
    fn default() -> Self {
        Self::new()
    }
}
