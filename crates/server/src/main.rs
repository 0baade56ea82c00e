mod api;
mod auth;
mod db;
#[cfg(test)]
mod memory_store;
mod metrics;
mod pages;
mod qr;
mod resolver;
mod state;
mod store;
mod transaction;

use crate::db::init_db;
use crate::state::AppState;
use crate::store::{CertificateStore, SeaOrmStore};
use anyhow::Result;
use certverify_common::AppConfig;
use certverify_common::models::Role;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env()?;
    let db = init_db(&config.database_url).await?;
    let store = Arc::new(SeaOrmStore::new(db));

    if let Some(user_id) = config.admin_bootstrap_user_id {
        store.grant_role(user_id, Role::Admin).await?;
        info!(user_id = %user_id, "bootstrap admin role ensured");
    }
    if config.public_base_url.is_none() {
        warn!("PUBLIC_BASE_URL not set, verification links will use the request origin");
    }

    let listen_addr = config.listen_addr.clone();
    let app = api::router(AppState::new(store, config));
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!("certificate service listening on {}", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", err);
        return;
    }
    info!("shutdown requested");
}
