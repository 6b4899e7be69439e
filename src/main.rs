use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use helpdesk::shared::core::primitives::{Clock, SystemClock, UuidV7Ids};
use helpdesk::shared::infrastructure::state_store::StateStore;
use helpdesk::shared::infrastructure::state_store::in_memory::InMemoryStateStore;
use helpdesk::shared::infrastructure::state_store::json_file::JsonFileStateStore;
use helpdesk::shell::config::Config;
use helpdesk::shell::http::router;
use helpdesk::shell::seed::seed_if_empty;
use helpdesk::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn StateStore> = match &config.data_path {
        Some(path) => Arc::new(JsonFileStateStore::open(path.clone()).await?),
        None => {
            tracing::warn!("HELPDESK_DATA_PATH not set, state lives in memory only");
            Arc::new(InMemoryStateStore::new())
        }
    };

    let clock = Arc::new(SystemClock);
    if config.seed_demo && seed_if_empty(store.as_ref(), clock.now()).await? {
        tracing::info!("seeded demo data");
    }

    let state = AppState::new(&config, store, clock, Arc::new(UuidV7Ids));
    let app = router(state);

    tracing::info!("REST on http://{}, GraphQL on http://{}/gql", config.addr, config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
