pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export the pipeline core
pub use logic::{
    CategoryManager, EntityPipeline, ItemManager, PipelineError, SubcategoryManager,
};

// Export model types
pub use model::{Category, Filter, Item, Page, Subcategory};

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

/// Run the server end to end; used by integration setups.
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let config = crate::config::AppConfig::load()?;

    let database_url = config.database_url()?;
    let postgres_store =
        crate::store::PostgresStore::new(&database_url, config.max_connections()).await?;

    postgres_store.migrate().await?;

    let store = Arc::new(postgres_store);
    let app = crate::api::routes::create_router().with_state(store);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}
