//! Tag fan-out search against the SQLite backend.

use std::collections::HashSet;
use std::sync::Arc;
use todos_rs::storage::SqliteRepository;
use todos_rs::{TagQuery, TodoService, Todo};
use tokio_util::sync::CancellationToken;

async fn seeded() -> (tempfile::TempDir, TodoService) {
    let dir = tempfile::tempdir().unwrap();
    let repo = SqliteRepository::open(dir.path().join("todos.db")).unwrap();

    let svc = TodoService::new(Arc::new(repo));
    for (title, tags) in [
        ("rewrite parser", vec!["rust", "work"]),
        ("call plumber", vec!["home"]),
        ("review PR", vec!["work"]),
        ("learn golang", vec!["golang"]),
    ] {
        svc.add(Todo::new(title).with_tags(tags)).await.unwrap();
    }
    (dir, svc)
}

fn titles(todos: &[Todo]) -> HashSet<String> {
    todos.iter().map(|t| t.title.clone()).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_tags_in_parallel() {
    let (_dir, svc) = seeded().await;
    let query = TagQuery::from_param("WORK, home,work,rust");

    let found = svc.find_by_tags(query.tags.as_slice()).await.unwrap();

    assert_eq!(
        titles(&found),
        HashSet::from([
            "rewrite parser".to_string(),
            "call plumber".to_string(),
            "review PR".to_string(),
        ])
    );
}

#[tokio::test]
async fn substring_match_is_documented_behavior() {
    let (_dir, svc) = seeded().await;
    let found = svc.find_by_tags(&["go"]).await.unwrap();
    assert_eq!(titles(&found), HashSet::from(["learn golang".to_string()]));
}

#[tokio::test]
async fn cancelled_scope_is_reported() {
    let (_dir, svc) = seeded().await;
    let scope = CancellationToken::new();
    scope.cancel();

    let result = svc.find_by_tags_in(&["work"], &scope).await;
    assert!(matches!(result, Err(todos_rs::TodoError::Cancelled(_))));
}
