use wallboard_core::snapshot::start_refresh_scheduler;
use wallboard_server::{api::app_router, build_state, config::Config, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing();
    let state = build_state(&config).await?;

    // Background refresh, one snapshot TTL apart
    start_refresh_scheduler(state.snapshot.clone(), state.settings.snapshot_cache_ttl);

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
