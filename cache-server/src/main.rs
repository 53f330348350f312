//! Process entry point: load configuration, build the backend stack,
//! install the metrics sink, and serve the cache and admin HTTP APIs on
//! their configured ports until shutdown.

use std::process::ExitCode;
use std::sync::Arc;

use cache_config::Settings;
use cache_server::state::{AdminState, CacheState};
use cache_server::{admin_app, cache_app};

fn init_tracing(settings: &cache_config::LoggingSettings) {
    let subscriber = tracing_subscriber::fmt().with_env_filter(settings.level.clone());
    if settings.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::var("CACHE_CONFIG").unwrap_or_else(|_| "cache.yaml".to_string());

    let settings = match Settings::load(std::path::Path::new(&config_path)) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("fatal: failed to load configuration from {config_path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&settings.logging);

    let cache_port = settings.server.port;
    let admin_port = settings.server.admin_port;

    let runtime = match settings.into_runtime().await {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(error = %err, "fatal: failed to build runtime");
            return ExitCode::FAILURE;
        }
    };

    let cache_state = CacheState::from_runtime(&runtime);
    let admin_state = AdminState {
        backend: runtime.backend.clone(),
        scrape_handle: Arc::new(runtime.scrape_handle),
        scrape_path: runtime.settings.metrics.scrape_path.clone(),
    };

    let cache_listener = match tokio::net::TcpListener::bind(("0.0.0.0", cache_port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, port = cache_port, "fatal: failed to bind cache port");
            return ExitCode::FAILURE;
        }
    };
    let admin_listener = match tokio::net::TcpListener::bind(("0.0.0.0", admin_port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, port = admin_port, "fatal: failed to bind admin port");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(port = cache_port, "cache API listening");
    tracing::info!(port = admin_port, "admin API listening");

    let cache_server = axum::serve(cache_listener, cache_app(cache_state))
        .with_graceful_shutdown(shutdown_signal());
    let admin_server = axum::serve(admin_listener, admin_app(admin_state))
        .with_graceful_shutdown(shutdown_signal());

    let (cache_result, admin_result) = tokio::join!(cache_server, admin_server);
    if let Err(err) = cache_result {
        tracing::error!(error = %err, "cache server exited with error");
        return ExitCode::FAILURE;
    }
    if let Err(err) = admin_result {
        tracing::error!(error = %err, "admin server exited with error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl_c signal handler");
    tracing::info!("shutdown signal received");
}
