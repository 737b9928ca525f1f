use std::sync::Arc;

use common_observability::GateMetrics;
use common_security::RoutePolicy;
use common_session::SessionGate;
use portal_shell::config::load_portal_config;
use portal_shell::identity::HttpIdentityClient;
use portal_shell::{build_router, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_portal_config()?;
    let metrics = GateMetrics::new()?;

    let gate = SessionGate::builder(config.credential_store())
        .with_config(config.gate_config())
        .with_metrics(metrics.clone())
        .build();
    let revalidation = gate.spawn_revalidation();

    let state = AppState {
        gate,
        policy: Arc::new(RoutePolicy::new(&config.landing_path)),
        identity: Arc::new(HttpIdentityClient::new(config.identity_base_url.clone())),
        metrics,
    };
    let app = build_router(state);

    let addr = config.bind_addr()?;
    info!(%addr, store_key = %config.store_key, "starting portal-shell");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    revalidation.shutdown().await;
    Ok(())
}
