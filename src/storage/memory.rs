//! In-memory repository

use super::Repository;
use crate::todos::{check_tags, Result, Todo, TodoError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Todos kept in a map behind a reader/writer lock.
///
/// Any number of concurrent reads, exclusive writes. Tag lookups match
/// whole tags only.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    data: RwLock<HashMap<String, Todo>>,
}

impl InMemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

}

#[async_trait]
impl Repository for InMemoryRepository {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn find_by_id(&self, id: &str) -> Result<Todo> {
        self.data
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| TodoError::NotFound(id.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<Todo>> {
        Ok(self.data.read().await.values().cloned().collect())
    }

    async fn add(&self, todo: Todo) -> Result<()> {
        check_tags(&todo.tags)?;
        let mut data = self.data.write().await;
        if data.contains_key(&todo.id) {
            return Err(TodoError::Conflict(todo.id));
        }
        data.insert(todo.id.clone(), todo);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.data.write().await.remove(id);
        Ok(())
    }

    async fn update(&self, id: &str, mut todo: Todo) -> Result<()> {
        check_tags(&todo.tags)?;
        let mut data = self.data.write().await;
        let slot = data
            .get_mut(id)
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;
        todo.id = id.to_string();
        *slot = todo;
        Ok(())
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Vec<Todo>> {
        Ok(self
            .data
            .read()
            .await
            .values()
            .filter(|td| td.tags.iter().any(|t| t == tag))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use uuid::Uuid;

    fn todo(title: &str) -> Todo {
        Todo::new(title).with_id(Uuid::new_v4().to_string())
    }

    #[tokio::test]
    async fn test_add_and_find() {
        let repo = InMemoryRepository::new();
        let td = todo("some random title");
        repo.add(td.clone()).await.unwrap();

        let found = repo.find_by_id(&td.id).await.unwrap();
        assert_eq!(found.title, "some random title");
    }

    #[tokio::test]
    async fn test_add_duplicate_id_conflicts() {
        let repo = InMemoryRepository::new();
        let td = todo("first");
        repo.add(td.clone()).await.unwrap();

        let err = repo.add(td.clone()).await.unwrap_err();
        assert_eq!(err, TodoError::Conflict(td.id));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryRepository::new();
        let td = todo("to delete");
        repo.add(td.clone()).await.unwrap();
        repo.delete(&td.id).await.unwrap();

        assert!(matches!(
            repo.find_by_id(&td.id).await,
            Err(TodoError::NotFound(_))
        ));
        // deleting again is fine
        repo.delete(&td.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let repo = InMemoryRepository::new();
        let td = todo("Old title");
        repo.add(td.clone()).await.unwrap();

        repo.update(&td.id, Todo::new("New title")).await.unwrap();

        let found = repo.find_by_id(&td.id).await.unwrap();
        assert_eq!(found.title, "New title");
        assert_eq!(found.id, td.id);
    }

    #[tokio::test]
    async fn test_update_missing() {
        let repo = InMemoryRepository::new();
        let err = repo.update("nope", Todo::new("x")).await.unwrap_err();
        assert_eq!(err, TodoError::NotFound("nope".into()));
    }

    #[tokio::test]
    async fn test_find_by_tag_is_exact() {
        let repo = InMemoryRepository::new();
        repo.add(todo("a").with_tags(["golang"])).await.unwrap();
        repo.add(todo("b").with_tags(["go", "rust"])).await.unwrap();

        let found = repo.find_by_tag("go").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "b");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_list_all_after_concurrent_inserts() {
        let repo = Arc::new(InMemoryRepository::new());
        let writers = 7;
        let per_writer = 200;

        let handles: Vec<_> = (0..writers)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    for i in 0..per_writer {
                        repo.add(todo(&format!("Todo number {}", i + 1))).await?;
                    }
                    Ok::<_, TodoError>(())
                })
            })
            .collect();

        for result in futures::future::join_all(handles).await {
            result.unwrap().unwrap();
        }

        assert_eq!(repo.list_all().await.unwrap().len(), writers * per_writer);
    }

    #[tokio::test]
    async fn test_tag_with_separator_is_rejected() {
        let repo = InMemoryRepository::new();
        let err = repo
            .add(todo("x").with_tags(["home,work"]))
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
        assert!(repo.list_all().await.unwrap().is_empty());
    }
}
