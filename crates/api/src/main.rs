use anyhow::Context;

use campusdesk_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    campusdesk_observability::init();

    let config = AppConfig::from_env()?;
    if config.jwt_secret == AppConfig::DEV_JWT_SECRET {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
    }

    let app = campusdesk_api::app::build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        backend = config.backend_name(),
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
