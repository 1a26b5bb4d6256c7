use std::sync::Arc;

use suggestion_purger::{config::Config, db::SuggestionsDB, schedule, Purger};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a missing .env is fine, the real environment still applies
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let db = SuggestionsDB::new(&config.mongodb_uri, &config.database, config.atomic_batches).await?;
    let purger = Purger::new(Arc::new(db));

    let mut sched = schedule::start_task(purger, &config).await?;

    tokio::signal::ctrl_c().await?;

    info!("shutting down suggestion purge task");
    sched.shutdown().await?;

    Ok(())
}
