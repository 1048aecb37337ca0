use sketchline::{ServerBuilder, ServerConfig, SketchlineError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), SketchlineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let http = reqwest::Client::new();
    let words = config.word_catalog(&http);
    let store = config.store(&http);
    tracing::info!(
        catalog = config.supabase.is_some(),
        rounds = config.room.total_rounds,
        "configuration loaded"
    );

    let server = ServerBuilder::from_config(&config).build(words, store).await?;
    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "cannot listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await
}
