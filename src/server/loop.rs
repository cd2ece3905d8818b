// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;

use hyper::body::Incoming;
use tokio::net::TcpListener;

use super::connection::{serve_connection, ConnectionOptions};
use crate::handler::Router;
use crate::logger;

/// Accept loop. Accept errors are logged and the loop keeps going.
pub async fn start_server_loop<F>(
    listener: TcpListener,
    router: &Arc<Router<Incoming>>,
    options: ConnectionOptions,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        serve_connection(stream, peer_addr, Arc::clone(router), options);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::build_router;
    use crate::logger::LogWriter;
    use crate::request_log::{RequestLog, RequestLogStore};
    use crate::server::bind_listener;
    use std::collections::HashSet;
    use std::net::SocketAddr;
    use std::path::Path;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    const OPTIONS: ConnectionOptions = ConnectionOptions {
        keep_alive: true,
        access_log: false,
    };

    struct TestServer {
        addr: SocketAddr,
        diagnostics: Arc<LogWriter>,
        stop: oneshot::Sender<()>,
        task: tokio::task::JoinHandle<()>,
    }

    impl TestServer {
        fn start(record_dir: &Path) -> Self {
            let listener = bind_listener("127.0.0.1:0".parse().unwrap(), 128).unwrap();
            let addr = listener.local_addr().unwrap();
            let diagnostics = Arc::new(LogWriter::in_memory());
            let store = Arc::new(RequestLogStore::new(record_dir));
            let router: Arc<Router<Incoming>> =
                Arc::new(build_router(store, Arc::clone(&diagnostics), false));
            let (stop, stopped) = oneshot::channel::<()>();

            let task = tokio::spawn(async move {
                start_server_loop(listener, &router, OPTIONS, async {
                    let _ = stopped.await;
                })
                .await;
            });

            Self {
                addr,
                diagnostics,
                stop,
                task,
            }
        }

        async fn shutdown(self) {
            let _ = self.stop.send(());
            self.task.await.unwrap();
        }
    }

    /// Send one request on a fresh connection, returning (client addr, raw response)
    async fn send(addr: SocketAddr, path: &str) -> (SocketAddr, String) {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let local = stream.local_addr().unwrap();
        let request = format!(
            "GET {path} HTTP/1.1\r\nHost: localhost\r\nAccept: */*\r\nConnection: close\r\n\r\n"
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        (local, response)
    }

    fn records(dir: &Path) -> Vec<RequestLog> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| {
                let content = std::fs::read_to_string(entry.unwrap().path()).unwrap();
                serde_json::from_str(&content).unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_home_request_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let server = TestServer::start(dir.path());

        let (client, response) = send(server.addr, "/?x=1").await;

        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        assert!(response.ends_with("Home Page"), "{response}");

        let records = records(dir.path());
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.method, "GET");
        assert_eq!(record.uri, "/?x=1");
        assert_eq!(record.host, "localhost");
        assert_eq!(record.remote_addr, client.to_string());
        assert_eq!(record.content_length, "0");
        assert!(record.header.contains("Accept:[*/*]"));
        assert!(!record.header.contains("Host:"), "{}", record.header);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let server = TestServer::start(dir.path());

        let (_, response) = send(server.addr, "/nope").await;

        assert!(response.starts_with("HTTP/1.1 404 Not Found"), "{response}");
        assert!(response.ends_with("\r\n\r\n404 page not found\n"), "{response}");
        assert!(records(dir.path()).is_empty());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_unwritable_directory_fails_request() {
        let dir = tempfile::tempdir().unwrap();
        let server = TestServer::start(&dir.path().join("missing"));

        let (_, response) = send(server.addr, "/").await;

        assert!(
            response.starts_with("HTTP/1.1 500 Internal Server Error"),
            "{response}"
        );
        assert!(response.ends_with("\r\n\r\n500"), "{response}");
        assert!(!response.contains("Home Page"));
        assert_eq!(server.diagnostics.error_lines().len(), 1);

        server.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_get_distinct_records() {
        const N: usize = 32;
        let dir = tempfile::tempdir().unwrap();
        let server = TestServer::start(dir.path());
        let addr = server.addr;

        let clients: Vec<_> = (0..N)
            .map(|i| tokio::spawn(async move { send(addr, &format!("/?n={i}")).await }))
            .collect();
        for client in clients {
            let (_, response) = client.await.unwrap();
            assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        }

        let uris: HashSet<String> = records(dir.path()).into_iter().map(|r| r.uri).collect();
        assert_eq!(uris.len(), N);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), N);

        server.shutdown().await;
    }
}
