//! Application state shared across handlers

use crate::config::Settings;
use crate::service::TodoService;
use crate::storage::Repository;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Todo service
    pub todos: TodoService,
}

impl AppState {
    /// Create new application state over a repository
    pub fn new(settings: Settings, repo: Arc<dyn Repository>) -> Self {
        let todos = TodoService::new(repo).with_search_settings(&settings.search);
        Self {
            settings: Arc::new(settings),
            todos,
        }
    }

    /// Name of the storage backend in use
    pub fn backend(&self) -> &'static str {
        self.todos.backend()
    }
}
