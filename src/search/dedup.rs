//! Fan-in: merge deliveries from every tag lookup into one result set

use crate::todos::{Result, Todo, TodoError};
use std::collections::HashMap;

/// What a tag lookup hands to the aggregator
#[derive(Debug)]
pub enum Delivery {
    /// A todo matching the lookup's tag
    Found(Todo),
    /// The lookup failed
    Failed { tag: String, error: TodoError },
}

/// Single-consumer accumulator keyed by todo id.
///
/// Only the aggregating task owns this, so no locking is involved. Duplicate
/// ids overwrite each other (last write wins). Only the first error is kept.
#[derive(Debug, Default)]
pub struct FanIn {
    unique: HashMap<String, Todo>,
    first_error: Option<TodoError>,
}

impl FanIn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take one delivery. Returns `true` when it carried the first error,
    /// meaning the caller should cancel the remaining lookups.
    pub fn accept(&mut self, delivery: Delivery) -> bool {
        match delivery {
            Delivery::Found(todo) => {
                self.unique.insert(todo.id.clone(), todo);
                false
            }
            Delivery::Failed { tag, error } => {
                if self.first_error.is_some() {
                    tracing::debug!(tag = %tag, error = %error, "ignoring error after first failure");
                    return false;
                }
                tracing::warn!(tag = %tag, error = %error, "tag lookup failed");
                self.first_error = Some(error);
                true
            }
        }
    }

    /// Record an error that did not come through the channel (a panicked lookup)
    pub fn fail(&mut self, error: TodoError) -> bool {
        self.accept(Delivery::Failed {
            tag: String::new(),
            error,
        })
    }

    pub fn has_failed(&self) -> bool {
        self.first_error.is_some()
    }

    /// Number of distinct todos collected so far
    pub fn collected(&self) -> usize {
        self.unique.len()
    }

    /// Either every collected todo or the first error, never both
    pub fn finish(self) -> Result<Vec<Todo>> {
        match self.first_error {
            Some(err) => Err(err),
            None => Ok(self.unique.into_values().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(id: &str, title: &str) -> Delivery {
        Delivery::Found(Todo::new(title).with_id(id))
    }

    #[test]
    fn test_dedup_by_id_last_write_wins() {
        let mut fan_in = FanIn::new();
        fan_in.accept(found("1", "first"));
        fan_in.accept(found("2", "other"));
        fan_in.accept(found("1", "second"));
        assert_eq!(fan_in.collected(), 2);

        let todos = fan_in.finish().unwrap();
        let one = todos.iter().find(|t| t.id == "1").unwrap();
        assert_eq!(one.title, "second");
    }

    #[test]
    fn test_first_error_wins() {
        let mut fan_in = FanIn::new();
        fan_in.accept(found("1", "kept only until failure"));

        let first = fan_in.accept(Delivery::Failed {
            tag: "a".into(),
            error: TodoError::Store("first".into()),
        });
        let second = fan_in.accept(Delivery::Failed {
            tag: "b".into(),
            error: TodoError::Store("second".into()),
        });

        assert!(first);
        assert!(!second);
        assert!(fan_in.has_failed());
        assert_eq!(fan_in.finish().unwrap_err(), TodoError::Store("first".into()));
    }

    #[test]
    fn test_empty_finish() {
        let fan_in = FanIn::new();
        assert_eq!(fan_in.collected(), 0);
        assert!(fan_in.finish().unwrap().is_empty());
    }
}
