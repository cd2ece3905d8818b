// Connection handling module
// Serves one accepted TCP connection over HTTP/1.1

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;

use crate::handler::Router;
use crate::logger;
use crate::request_log::ClientAddr;

/// Per-connection behavior taken from configuration
#[derive(Debug, Clone, Copy)]
pub struct ConnectionOptions {
    pub keep_alive: bool,
    /// Log every accepted connection
    pub access_log: bool,
}

/// Serve a connection on its own task.
///
/// Each request on the connection gets the peer address attached as a
/// `ClientAddr` extension before it is dispatched through the router.
pub fn serve_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    router: Arc<Router<Incoming>>,
    options: ConnectionOptions,
) {
    if options.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(options.keep_alive);

        let service = service_fn(move |mut req: Request<Incoming>| {
            req.extensions_mut().insert(ClientAddr(peer_addr));
            let response = router.dispatch(req);
            async move { Ok::<_, Infallible>(response.await) }
        });

        if let Err(err) = builder.serve_connection(io, service).await {
            logger::log_connection_error(&err);
        }
    });
}
