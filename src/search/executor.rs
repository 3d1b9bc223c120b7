//! Search execution: fan out one lookup per tag, fan in through a channel

use super::dedup::{Delivery, FanIn};
use crate::storage::Repository;
use crate::todos::{normalize_tag, Result, Todo, TodoError};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Default capacity of the channel between lookups and the aggregator
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// How a single tag lookup ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Every match was handed to the aggregator
    Completed,
    /// The lookup failed and reported its error
    Failed,
    /// The shared scope was cancelled before the lookup finished
    Abandoned,
}

/// Tag search executor that resolves several tags concurrently
#[derive(Clone)]
pub struct TagSearch {
    /// Repository queried once per tag
    repo: Arc<dyn Repository>,
    /// Capacity of the delivery channel
    channel_capacity: usize,
}

impl TagSearch {
    /// Create a new tag search over a repository
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self {
            repo,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Set the delivery channel capacity (at least 1)
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Find every todo carrying at least one of `tags`.
    ///
    /// Each tag is normalized and looked up in its own task; duplicates are
    /// looked up more than once and collapse in the result set. The first
    /// lookup failure observed by the aggregator cancels the other lookups
    /// and becomes the result. When several lookups fail at about the same
    /// time, which error wins is arbitrary.
    ///
    /// `scope` is the caller's cancellation scope. Cancelling it abandons the
    /// search with [`TodoError::Cancelled`] unless a lookup already failed.
    /// The output has no particular order.
    pub async fn execute<S: AsRef<str>>(
        &self,
        tags: &[S],
        scope: &CancellationToken,
    ) -> Result<Vec<Todo>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let scope = scope.child_token();
        // Dropping this future cancels every lookup still in flight
        let _guard = scope.clone().drop_guard();

        let (tx, mut rx) = mpsc::channel(self.channel_capacity);
        let mut lookups = JoinSet::new();
        for raw in tags {
            let tag = normalize_tag(raw.as_ref());
            lookups.spawn(lookup_tag(
                self.repo.clone(),
                tag,
                tx.clone(),
                scope.clone(),
            ));
        }
        drop(tx);

        info!(
            "Executing tag search on {} tags against {}",
            tags.len(),
            self.repo.name()
        );

        let mut fan_in = FanIn::new();
        while let Some(delivery) = rx.recv().await {
            if fan_in.accept(delivery) {
                scope.cancel();
            }
        }

        let mut abandoned = 0usize;
        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok(Outcome::Abandoned) => abandoned += 1,
                Ok(_) => {}
                Err(e) if e.is_panic() => {
                    error!("Tag lookup panicked: {}", e);
                    if fan_in.fail(TodoError::Store("tag lookup panicked".into())) {
                        scope.cancel();
                    }
                }
                Err(_) => abandoned += 1,
            }
        }

        if !fan_in.has_failed() && abandoned > 0 {
            return Err(TodoError::Cancelled(format!(
                "tag search abandoned {} of {} lookups",
                abandoned,
                tags.len()
            )));
        }

        debug!(
            "Tag search over {} tags found {} todos in {:?}",
            tags.len(),
            fan_in.collected(),
            start.elapsed()
        );

        fan_in.finish()
    }
}

/// Look up one tag and stream its matches to the aggregator
async fn lookup_tag(
    repo: Arc<dyn Repository>,
    tag: String,
    tx: mpsc::Sender<Delivery>,
    scope: CancellationToken,
) -> Outcome {
    let found = tokio::select! {
        biased;
        () = scope.cancelled() => {
            debug!(tag = %tag, "tag lookup cancelled before completion");
            return Outcome::Abandoned;
        }
        found = repo.find_by_tag(&tag) => found,
    };

    match found {
        Ok(todos) => {
            debug!(tag = %tag, count = todos.len(), "tag lookup returned");
            for todo in todos {
                tokio::select! {
                    biased;
                    () = scope.cancelled() => return Outcome::Abandoned,
                    sent = tx.send(Delivery::Found(todo)) => {
                        if sent.is_err() {
                            return Outcome::Abandoned;
                        }
                    }
                }
            }
            Outcome::Completed
        }
        Err(error) => {
            // Failures after cancellation are not reported
            tokio::select! {
                biased;
                () = scope.cancelled() => Outcome::Abandoned,
                sent = tx.send(Delivery::Failed { tag, error }) => {
                    if sent.is_err() {
                        Outcome::Abandoned
                    } else {
                        Outcome::Failed
                    }
                }
            }
        }
    }
}
