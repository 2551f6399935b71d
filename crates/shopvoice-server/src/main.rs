mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use shopvoice_core::TtlCache;
use shopvoice_sync::{ClientSettings, ConfiguredSession, SyncPipeline};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = shopvoice_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if config.voiceflow_api_key.is_none() {
        tracing::warn!("VOICEFLOW_API_KEY not set; sync requests will report missing credentials");
    }

    let state = AppState {
        session: Arc::new(ConfiguredSession::from_config(&config)),
        pipeline: SyncPipeline::new(ClientSettings::from_config(&config)),
        page_cache: Arc::new(TtlCache::new(Duration::from_secs(config.cache_ttl_secs))),
    };
    let auth = AuthState::from_env(matches!(
        config.env,
        shopvoice_core::Environment::Development
    ))?;
    let app = build_app(state, auth);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, shop = %config.shop_url, "shopvoice server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
