use hyper::body::Incoming;
use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod middleware;
mod request_log;
mod server;

use handler::Router;
use request_log::RequestLogStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    // 创建 Tokio 运行时，根据 workers 配置设置线程数
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let diagnostics = logger::init(&cfg)?;
    let addr = cfg.get_socket_addr()?;

    // Records go straight into this directory, it has to exist up front
    tokio::fs::create_dir_all(&cfg.request_log.directory).await?;
    let store = Arc::new(RequestLogStore::new(&cfg.request_log.directory));

    let router: Arc<Router<Incoming>> = Arc::new(handler::build_router(
        store,
        diagnostics,
        cfg.logging.access_log,
    ));

    let listener = server::bind_listener(addr, cfg.performance.backlog)?;
    logger::log_server_start(&addr, &cfg);

    let options = server::ConnectionOptions {
        keep_alive: cfg.performance.keep_alive,
        access_log: cfg.logging.access_log,
    };
    server::start_server_loop(listener, &router, options, async {
        if let Err(e) = server::signal::shutdown_signal().await {
            logger::log_warning(&format!("Signal handlers unavailable: {e}"));
            std::future::pending::<()>().await;
        }
    })
    .await;

    Ok(())
}
