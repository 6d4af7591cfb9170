use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use scholaris::logging::init_tracing;
use scholaris::metrics::init_metrics;
use scholaris::router::init_router;
use scholaris::state::init_app_state;
use scholaris_config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _log_guards = init_tracing().context("Failed to initialise logging")?;
    let metrics = init_metrics().context("Failed to install metrics recorder")?;

    let state = init_app_state().await?.with_metrics(metrics);
    let app = init_router(state);

    let server = ServerConfig::from_env();
    let listener = tokio::net::TcpListener::bind(server.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", server.bind_address()))?;

    info!("🚀 Server running on http://{}", server.bind_address());
    info!("📚 Swagger UI available at http://{}/swagger-ui", server.bind_address());

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
