use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Maintenance entry point: initialize the database schema and report
/// per-table record counts. Record administration itself happens through
/// whatever application consumes the store.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &vertrack::config::CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
    );

    let handle = vertrack::db::spawn(&cfg.basic.database_url).await;

    let features = handle.list_features().await?;
    let models = handle.list_models().await?;
    let executables = handle.list_executables().await?;
    let shared_libraries = handle.list_shared_libraries().await?;
    let unpacking_records = handle.list_unpacking_records().await?;

    info!(
        features = features.len(),
        models = models.len(),
        executables = executables.len(),
        shared_libraries = shared_libraries.len(),
        unpacking_records = unpacking_records.len(),
        "database schema initialized"
    );

    Ok(())
}
