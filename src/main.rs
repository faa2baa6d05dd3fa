use std::net::TcpListener;

use portfolio_api::{
    build_state,
    graceful_shutdown::shutdown_signal,
    run_server,
    settings::{AppConfig, LogFormat},
    telemetry::init_tracing,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => {
            init_tracing(cfg.log_format);
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            init_tracing(LogFormat::Pretty);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let server_addr = format!("{}:{}", config.host, config.port);

    let (app_state, worker) = match build_state(config).await {
        Ok(built) => built,
        Err(e) => {
            tracing::error!("Failed to initialise application: {:#}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "🚀 Starting {} v{} ({}) on {}",
        app_state.config.name,
        env!("CARGO_PKG_VERSION"),
        app_state.config.env,
        server_addr
    );

    let listener = TcpListener::bind(&server_addr)?;
    let server = run_server(listener, app_state)?;
    let handle = server.handle();

    let result = tokio::select! {
        res = server => res,
        _ = shutdown_signal() => {
            handle.stop(true).await;
            Ok(())
        },
    };

    worker.shutdown().await;
    tracing::info!("👋 Shutdown complete");

    result
}
