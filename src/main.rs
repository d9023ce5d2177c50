mod config;
mod config_manager;
mod state;
mod routes;
mod error;
mod agent;
mod translate;
mod service_client;
mod frontend;
#[cfg(test)]
mod test_support;

use std::future::{Future, IntoFuture};
use std::pin::pin;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::frontend::FrontEnd;
use crate::service_client::TranslationServiceClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chat_mate=debug,tower_http=debug")),
        )
        .init();

    let config_path = config_manager::resolve_config_path();
    let config = Config::load(config_path.as_deref())?;
    match &config_path {
        Some(path) => info!("Loaded configuration from: {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Translation service, in the background
    let app_state = AppState::new(config.clone())?;
    let service_app = Router::new()
        .merge(routes::create_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let service_addr = format!("{}:{}", config.service.host, config.service.port);
    let service_listener = TcpListener::bind(&service_addr)
        .await
        .with_context(|| format!("Failed to bind translation service on {}", service_addr))?;
    info!("Translation service listening on {}", service_listener.local_addr()?);

    let service_shutdown = shutdown_rx.clone();
    let service = tokio::spawn(async move {
        axum::serve(service_listener, service_app)
            .with_graceful_shutdown(wait_for_shutdown(service_shutdown))
            .await
    });

    // Front-end only starts once the service answers its health check
    let client = TranslationServiceClient::new(config.service_url(), config.frontend.request_timeout())?;
    client
        .wait_until_ready(
            config.frontend.readiness_timeout(),
            config.frontend.readiness_interval(),
        )
        .await?;

    let frontend_app = frontend::create_routes(FrontEnd::new(client))
        .layer(TraceLayer::new_for_http());

    let frontend_addr = format!("{}:{}", config.frontend.host, config.frontend.port);
    let frontend_listener = TcpListener::bind(&frontend_addr)
        .await
        .with_context(|| format!("Failed to bind front-end on {}", frontend_addr))?;
    info!("Front-end available at http://{}", frontend_listener.local_addr()?);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutting down");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                warn!("Unable to listen for shutdown signal: {}", e);
                // Keep the sender alive so the servers keep running.
                std::future::pending::<()>().await;
            }
        }
    });

    let frontend = axum::serve(frontend_listener, frontend_app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()))
        .into_future();

    supervise(frontend, service, shutdown_rx).await
}

/// Drive the front-end to completion, failing as soon as the service task
/// ends outside of a requested shutdown.
async fn supervise<F>(
    frontend: F,
    mut service: JoinHandle<std::io::Result<()>>,
    shutdown: watch::Receiver<bool>,
) -> Result<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    let mut frontend = pin!(frontend);

    tokio::select! {
        result = &mut frontend => {
            result?;
            service.await??;
            Ok(())
        }
        result = &mut service => {
            if matches!(result, Ok(Ok(()))) && *shutdown.borrow() {
                frontend.await?;
                return Ok(());
            }

            let err = match result {
                Ok(Ok(())) => anyhow::anyhow!("Translation service stopped unexpectedly"),
                Ok(Err(e)) => anyhow::Error::new(e).context("Translation service failed"),
                Err(e) => anyhow::Error::new(e).context("Translation service task aborted"),
            };
            error!("{:#}", err);
            Err(err)
        }
    }
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}
