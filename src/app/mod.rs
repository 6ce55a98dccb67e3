//! Composition root: turns a validated [`ServiceConfig`] into a running server.

use std::sync::Arc;

use axum::Router;
use reqwest::Client;
use tokio::net::TcpListener;

use crate::adapters::http::{create_router, AppState};
use crate::config::ServiceConfig;
use crate::core::fallback::FallbackClient;
use crate::core::FallbackPolicy;
use crate::utils::error::Result;

pub fn build_fallback_client(config: &ServiceConfig) -> Result<FallbackClient> {
    let client = Client::builder().build()?;
    let users = FallbackClient::new(client, config.fallback_settings())?;

    tracing::info!(
        primary = %users.primary_url(),
        fallback = %users.fallback_url(),
        policy = %users.policy(),
        "Fallback client configured"
    );

    if users.policy() == FallbackPolicy::AnyFailure {
        tracing::warn!(
            "Fallback mode 'any_failure' also substitutes connection errors and timeouts; \
             outages of the primary host will be hidden"
        );
    }

    Ok(users)
}

pub fn build_router(config: &ServiceConfig) -> Result<Router> {
    let users = build_fallback_client(config)?;
    let state = Arc::new(AppState::new(Arc::new(users)));
    Ok(create_router(state))
}

/// Serves `router` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

pub async fn run(config: ServiceConfig) -> Result<()> {
    let router = build_router(&config)?;
    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("🚀 Listening on http://{}/v1/users", listener.local_addr()?);

    serve(listener, router, shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
