use anyhow::Context;

use rewards_infra::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, rejected) = Config::from_env();
    rewards_observability::init(config.log_format);

    for e in rejected {
        tracing::warn!(error = %e, "ignoring invalid configuration value; using default");
    }

    let app = rewards_api::app::build_app(&config);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        default_account = %config.default_account,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
