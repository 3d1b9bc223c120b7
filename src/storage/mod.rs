//! Storage backends for todos
//!
//! Defines the [`Repository`] capability consumed by the service and the tag
//! search, with an in-memory and a SQLite implementation.

mod memory;
mod retry;
mod sqlite;

pub use memory::InMemoryRepository;
pub use retry::{connect_with_retry, RetryPolicy};
pub use sqlite::SqliteRepository;

use crate::config::StorageSettings;
use crate::todos::{Result, Todo, TodoError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Storage abstraction for todos.
///
/// Implementations must be safe for concurrent reads: the tag search issues
/// one `find_by_tag` call per requested tag at the same time.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Backend name, used in logs
    fn name(&self) -> &'static str;

    /// Fetch a single todo
    async fn find_by_id(&self, id: &str) -> Result<Todo>;

    /// Fetch every todo, in no particular order
    async fn list_all(&self) -> Result<Vec<Todo>>;

    /// Store a new todo
    async fn add(&self, todo: Todo) -> Result<()>;

    /// Remove a todo. Removing a missing id is not an error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Replace the stored todo for `id`
    async fn update(&self, id: &str, todo: Todo) -> Result<()>;

    /// Todos carrying `tag`. Matching semantics are backend defined:
    /// exact element match in memory, substring match in SQLite.
    async fn find_by_tag(&self, tag: &str) -> Result<Vec<Todo>>;
}

/// Open the repository described by `settings`.
///
/// Without a DSN todos stay in memory. A SQLite DSN is opened with retries;
/// when every attempt fails the in-memory repository is used instead.
pub async fn open(settings: &StorageSettings) -> Arc<dyn Repository> {
    let Some(dsn) = settings.dsn().map(str::to_string) else {
        info!("No DSN configured, using in-memory storage");
        return Arc::new(InMemoryRepository::new());
    };

    let connected = connect_with_retry(settings.retry_policy(), || {
        let dsn = dsn.clone();
        async move {
            tokio::task::spawn_blocking(move || SqliteRepository::open_dsn(&dsn))
                .await
                .unwrap_or_else(|e| Err(TodoError::store(e)))
        }
    })
    .await;

    match connected {
        Ok(repo) => {
            info!("Connected to database {}", dsn);
            Arc::new(repo)
        }
        Err(e) => {
            warn!("DB connection failed: {}", e);
            warn!("Using in-memory storage");
            Arc::new(InMemoryRepository::new())
        }
    }
}
