//! Todo record

use super::tags::clean_tags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task with an identifier, title, tags and an optional completion time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Todo {
    /// Unique identifier, assigned by the service on creation
    pub id: String,
    /// Free text title
    pub title: String,
    /// Labels, normalized before being persisted
    pub tags: Vec<String>,
    /// When the todo was completed; `None` while still open
    pub completed_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Create an open todo without an identifier
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Whether the todo has been completed
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Normalized, deduplicated copy of the tags
    pub fn clean_tags(&self) -> Vec<String> {
        clean_tags(&self.tags)
    }

    /// Replace the tags with their normalized form
    pub fn normalize(mut self) -> Self {
        self.tags = self.clean_tags();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_todo_is_open() {
        let td = Todo::new("buy milk");
        assert_eq!(td.title, "buy milk");
        assert!(td.id.is_empty());
        assert!(!td.is_completed());
    }

    #[test]
    fn test_normalize_tags() {
        let td = Todo::new("x").with_tags(["Home", "home ", "Errands"]).normalize();
        assert_eq!(td.tags, vec!["home", "errands"]);
    }

    #[test]
    fn test_deserialize_partial_body() {
        let td: Todo = serde_json::from_str(r#"{"title":"only a title"}"#).unwrap();
        assert_eq!(td.title, "only a title");
        assert!(td.tags.is_empty());
        assert!(td.completed_at.is_none());
    }

    #[test]
    fn test_serialize_open_todo() {
        let td = Todo::new("t").with_id("1").with_tags(["a"]);
        let json = serde_json::to_value(&td).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["tags"][0], "a");
        assert!(json["completed_at"].is_null());
    }
}
