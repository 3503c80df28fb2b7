use anyhow::Context;
use paydesk::config::{Config, RecordStoreConfig};
use paydesk::datasource::parse_sales_csv;
use paydesk::{api, init_db, PayrollService, RecordStore, Repository, RestRecordStore};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env().context("Configuration error")?;
    let store = open_store(&config).await?;

    let payroll = Arc::new(PayrollService::new(store, config.plan.clone()));
    let app = api::create_router(api::AppState::new(payroll));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    match &config.record_store {
        RecordStoreConfig::Sqlite { database_path } => {
            let pool = init_db(database_path)
                .await
                .context("Failed to initialize database")?;
            let repo = Repository::new(pool);

            if let Some(path) = &config.sales_import_csv {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("Failed to read {}", path))?;
                let records = parse_sales_csv(&bytes)?;
                let inserted = repo.insert_sales_batch(&records).await?;
                tracing::info!(
                    path = %path,
                    inserted,
                    already_present = records.len() - inserted,
                    "Imported sales ledger"
                );
            }

            Ok(Arc::new(repo))
        }
        RecordStoreConfig::Rest { base_url, api_key } => {
            if config.sales_import_csv.is_some() {
                tracing::warn!("SALES_IMPORT_CSV is ignored with the rest record store");
            }
            tracing::info!(base_url = %base_url, "Using hosted record store");
            Ok(Arc::new(RestRecordStore::new(
                base_url.clone(),
                api_key.clone(),
            )))
        }
    }
}
