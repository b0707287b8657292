pub mod calc;
pub mod cli;
pub mod config;
pub mod rest;
pub mod store;

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use config::TaskdConfig;
use store::persist::TaskFile;
use store::TaskStore;

/// Shared application state passed to every REST handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<TaskdConfig>,
    /// The one store instance. Handlers take the lock for the duration of a
    /// single operation; the store itself has no internal locking.
    pub store: Arc<RwLock<TaskStore>>,
    /// Persistence adapter for the task collection. Mutating handlers flush
    /// the full collection through this after a successful store call.
    pub task_file: Arc<TaskFile>,
    pub started_at: std::time::Instant,
}

impl AppContext {
    /// Seed the store from the task file and wire up shared state.
    ///
    /// A missing or malformed task file starts the store empty (the adapter
    /// logs a warning); the next-ID counter is recomputed from the loaded
    /// records.
    pub async fn init(config: TaskdConfig) -> Self {
        let task_file = TaskFile::at(config.tasks_file.clone());
        let store = TaskStore::from_records(task_file.load().await);
        info!(
            tasks = store.len(),
            path = %task_file.path().display(),
            "task store loaded"
        );

        Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(store)),
            task_file: Arc::new(task_file),
            started_at: std::time::Instant::now(),
        }
    }
}
