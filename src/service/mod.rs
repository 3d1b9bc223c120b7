//! Todo service
//!
//! CRUD, completion and tag search on top of a [`Repository`], with
//! identifier validation in front of every mutation.

use crate::config::SearchSettings;
use crate::search::TagSearch;
use crate::storage::Repository;
use crate::todos::{check_tags, Result, Todo, TodoError};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Service facade shared by the HTTP handlers
#[derive(Clone)]
pub struct TodoService {
    /// Backing store
    repo: Arc<dyn Repository>,
    /// Tag fan-out search over the same store
    search: TagSearch,
    /// Deadline applied to every tag search
    search_timeout: Option<Duration>,
}

/// Reject identifiers that are not UUIDs
pub fn validate_id(id: &str) -> Result<()> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| TodoError::Validation(format!("provided ID is not a UUID: {id}")))
}

impl TodoService {
    /// Create a service with default search settings
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self {
            search: TagSearch::new(repo.clone()),
            repo,
            search_timeout: None,
        }
    }

    /// Apply search settings
    pub fn with_search_settings(mut self, settings: &SearchSettings) -> Self {
        self.search = self.search.with_channel_capacity(settings.channel_capacity);
        self.search_timeout = settings.timeout_ms.map(Duration::from_millis);
        self
    }

    /// Name of the backing store
    pub fn backend(&self) -> &'static str {
        self.repo.name()
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Todo> {
        self.repo.find_by_id(id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Todo>> {
        self.repo.list_all().await
    }

    /// Store a new todo under a freshly generated id.
    ///
    /// Any caller supplied id or completion time is discarded.
    pub async fn add(&self, todo: Todo) -> Result<Todo> {
        let mut todo = todo.normalize();
        check_tags(&todo.tags)?;
        todo.id = Uuid::new_v4().to_string();
        todo.completed_at = None;

        let id = todo.id.clone();
        self.repo.add(todo).await?;
        debug!("Added todo {}", id);

        self.find_by_id(&id).await
    }

    /// Delete an existing todo
    pub async fn delete(&self, id: &str) -> Result<()> {
        validate_id(id)?;
        self.repo.find_by_id(id).await?;
        self.repo.delete(id).await?;
        debug!("Deleted todo {}", id);
        Ok(())
    }

    /// Replace title, tags and completion time of an existing todo
    pub async fn update(&self, id: &str, todo: Todo) -> Result<Todo> {
        validate_id(id)?;
        let todo = todo.normalize();
        check_tags(&todo.tags)?;
        self.repo.update(id, todo).await?;
        self.find_by_id(id).await
    }

    /// Mark a todo as completed now. Completing twice keeps the first time.
    pub async fn complete(&self, id: &str) -> Result<Todo> {
        validate_id(id)?;
        let mut todo = self.repo.find_by_id(id).await?;
        if !todo.is_completed() {
            todo.completed_at = Some(Utc::now());
            self.repo.update(id, todo).await?;
        }
        self.find_by_id(id).await
    }

    /// Todos carrying at least one of `tags`, using the configured deadline
    pub async fn find_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> Result<Vec<Todo>> {
        self.find_by_tags_in(tags, &CancellationToken::new()).await
    }

    /// Same as [`Self::find_by_tags`], inside a caller supplied cancellation scope
    pub async fn find_by_tags_in<S: AsRef<str>>(
        &self,
        tags: &[S],
        scope: &CancellationToken,
    ) -> Result<Vec<Todo>> {
        match self.search_timeout {
            Some(limit) => tokio::time::timeout(limit, self.search.execute(tags, scope))
                .await
                .map_err(|_| TodoError::Cancelled(format!("tag search exceeded {limit:?}")))?,
            None => self.search.execute(tags, scope).await,
        }
    }
}
