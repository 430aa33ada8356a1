//! Database migration command.

use persimmon_market::{MIGRATOR, MarketConfig, create_pool};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = MarketConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
