use std::sync::Arc;
use tokio_util::sync::CancellationToken;

mod config;
mod handler;
mod http;
mod logger;
mod render;
mod routing;
mod server;
mod store;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Worker thread count comes from config, defaulting to one per CPU core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("[CONFIG] Using {workers} worker threads"));
    } else {
        logger::log_info("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    let state = Arc::new(config::AppState::new(cfg));

    // Seed the post file on first run and surface an unreadable one at startup
    match state.store.load().await {
        Ok(posts) => logger::log_info(&format!(
            "[Store] {} posts in {}",
            posts.len(),
            state.store.path().display()
        )),
        Err(e) => logger::log_warning(&format!("[Store] {e}")),
    }

    logger::log_server_start(&listener.local_addr()?, &state.config);

    let shutdown = CancellationToken::new();
    server::start_signal_handler(shutdown.clone())?;

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run_server(listener, state, shutdown))
        .await
}
