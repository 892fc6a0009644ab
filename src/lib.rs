pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod store;

// Export API types
pub use api::routes;
pub use api::ApiError;

// Export validation
pub use logic::{validate_variable, ValidationError};

// Export all model types
pub use model::*;

// Export store types
pub use store::{
    DefinitionStore, MappingStore, MemoryStore, PostgresStore, Store, StoreError, VariableStore,
};

use crate::config::{AppConfig, StoreBackend};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve the API on an already bound listener until the server stops
pub async fn serve_with_store<S: Store + 'static>(
    store: S,
    batch_mode: BatchMode,
    listener: TcpListener,
) -> anyhow::Result<()> {
    let app = routes::create_router::<S>(batch_mode).with_state(Arc::new(store));
    axum::serve(listener, app).await?;
    Ok(())
}

/// Connect the configured store and run the server
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    let batch_mode = config.mappings.batch_mode;

    match config.database.backend {
        StoreBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let store = PostgresStore::new(&config.database_url(), config.max_connections()).await?;

            log::info!("Running database migrations...");
            store.migrate().await?;

            log::info!("Designation service running on http://{} (postgres, {:?} batches)", bind_address, batch_mode);
            serve_with_store(store, batch_mode, listener).await
        }
        StoreBackend::Memory => {
            log::warn!("Using the in-memory store; data will not survive a restart");
            log::info!("Designation service running on http://{} (memory, {:?} batches)", bind_address, batch_mode);
            serve_with_store(MemoryStore::new(), batch_mode, listener).await
        }
    }
}
