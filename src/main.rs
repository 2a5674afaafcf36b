use std::sync::Arc;

use study_log::api::router;
use study_log::config::{Backend, Config};
use study_log::remote::{InMemoryTable, PostgrestTable, RecordTable};
use study_log::state::AppState;
use study_log::store::RecordStore;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "study_log=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new_from_env()?;

    let table: Arc<dyn RecordTable> = match config.backend {
        Backend::Supabase(pg) => {
            info!("using remote table {} at {}", pg.table, pg.url);
            Arc::new(PostgrestTable::new(pg)?)
        }
        Backend::Memory => {
            info!("using in-memory table");
            Arc::new(InMemoryTable::new())
        }
    };

    let store = Arc::new(RecordStore::new(table));
    tokio::spawn({
        let store = store.clone();
        async move { store.fetch_all().await }
    });

    let app = router(AppState { store });

    info!("listening on http://{}", config.bind);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
