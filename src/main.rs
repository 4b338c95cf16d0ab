use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kanpo_feed::config::Config;
use kanpo_feed::pipeline;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kanpo_feed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::var("KANPO_CONFIG").unwrap_or_else(|_| "kanpo.toml".to_string());
    let config = Config::load_or_default(&config_path)?;
    info!("Archiving {} into {}", config.feed_url, config.archive_path.display());

    let report = pipeline::run(&config).await?;
    info!(
        "Run complete: {} fetched, {} added, {} archived{}",
        report.fetched,
        report.added,
        report.total,
        if report.page_error.is_some() {
            " (page not updated)"
        } else {
            ""
        }
    );

    Ok(())
}
