//! SQLite repository
//!
//! Todos live in a single `todos` table and are read through the `v_todos`
//! view. Tags are stored comma-joined, so tag lookup is a substring match:
//! searching `go` also returns todos tagged `golang`. Tags containing the
//! separator are refused on write and never match on lookup.

use super::Repository;
use crate::todos::{check_tags, Result, Todo, TodoError, TAG_SEPARATOR};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS todos (
    id           TEXT PRIMARY KEY,
    title        TEXT NOT NULL,
    tags         TEXT NOT NULL DEFAULT '',
    completed_at TEXT
);
CREATE VIEW IF NOT EXISTS v_todos AS
    SELECT id, title, tags, completed_at FROM todos;
";

const SELECT_ALL: &str = "SELECT id, title, tags, completed_at FROM v_todos";

/// SQLite-backed repository.
///
/// A single connection is shared behind a mutex and every statement runs on
/// the blocking thread pool, so concurrent readers are serialized.
#[derive(Clone)]
pub struct SqliteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRepository {
    /// Open (or create) a database file and make sure the schema exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(TodoError::store)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open based on a DSN: `:memory:` or a file path
    pub fn open_dsn(dsn: &str) -> Result<Self> {
        if dsn == ":memory:" {
            Self::open_in_memory()
        } else {
            Self::open(dsn)
        }
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| TodoError::Store("sqlite connection lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(TodoError::store)?
    }
}

fn join_tags(tags: &[String]) -> Result<String> {
    check_tags(tags)?;
    Ok(tags.join(&TAG_SEPARATOR.to_string()))
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(TAG_SEPARATOR)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Escape LIKE wildcards so the tag is matched literally inside `%...%`.
fn like_pattern(tag: &str) -> String {
    let mut escaped = String::with_capacity(tag.len() + 2);
    escaped.push('%');
    for c in tag.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn scan(row: &Row<'_>) -> rusqlite::Result<Todo> {
    let tags: String = row.get(2)?;
    let completed_at: Option<DateTime<Utc>> = row.get(3)?;
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        tags: split_tags(&tags),
        completed_at,
    })
}

#[async_trait]
impl Repository for SqliteRepository {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn find_by_id(&self, id: &str) -> Result<Todo> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            conn.query_row(&format!("{SELECT_ALL} WHERE id = ?1"), [&id], scan)
                .optional()?
                .ok_or(TodoError::NotFound(id))
        })
        .await
    }

    async fn list_all(&self) -> Result<Vec<Todo>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(SELECT_ALL)?;
            let rows = stmt.query_map([], scan)?;
            // Unreadable rows are skipped rather than failing the listing
            let mut all = Vec::new();
            for row in rows {
                match row {
                    Ok(td) => all.push(td),
                    Err(e) => debug!("Skipping unreadable todo row: {}", e),
                }
            }
            Ok(all)
        })
        .await
    }

    async fn add(&self, todo: Todo) -> Result<()> {
        let tags = join_tags(&todo.tags)?;
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO todos (id, title, tags, completed_at) VALUES (?1, ?2, ?3, ?4)",
                params![todo.id, todo.title, tags, todo.completed_at],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM todos WHERE id = ?1", [&id])?;
            Ok(())
        })
        .await
    }

    async fn update(&self, id: &str, todo: Todo) -> Result<()> {
        let id = id.to_string();
        let tags = join_tags(&todo.tags)?;
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE todos SET title = ?1, tags = ?2, completed_at = ?3 WHERE id = ?4",
                params![todo.title, tags, todo.completed_at, id],
            )?;
            if changed == 0 {
                return Err(TodoError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Vec<Todo>> {
        // Would only ever match across two stored tags
        if tag.contains(TAG_SEPARATOR) {
            debug!(tag = %tag, "tag contains the separator, no match");
            return Ok(Vec::new());
        }
        let pattern = like_pattern(tag);
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_ALL} WHERE tags LIKE ?1 ESCAPE '\\'"))?;
            let rows = stmt.query_map([&pattern], scan)?;
            let found = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(found)
        })
        .await
    }
}
