//! Deferred fetch tasks and execution strategy.
//!
//! Per-subscription queries are built as a list of zero-argument deferred
//! tasks first; how they execute — strictly sequential, batched, or fully
//! concurrent — is decided separately by an [`ExecutionPlan`]. Collected
//! output always follows task issue order, never completion order.

use std::future::Future;
use std::pin::Pin;

use futures::future::join_all;
use tracing::warn;

/// A deferred per-subscription fetch, already isolated: it always resolves
/// to a (possibly empty) result sequence. Consumed exactly once.
pub type FetchTask<T> = Pin<Box<dyn Future<Output = Vec<T>> + Send>>;

/// Wrap a fallible per-subscription query so that its failure never aborts
/// sibling tasks: on error, log a warning carrying the subscription id and
/// reason, and contribute an empty sequence instead.
pub fn isolate<T, E, F>(subscription_id: String, task: F) -> FetchTask<T>
where
    T: Send + 'static,
    E: std::fmt::Display,
    F: Future<Output = Result<Vec<T>, E>> + Send + 'static,
{
    Box::pin(async move {
        match task.await {
            Ok(rows) => rows,
            Err(error) => {
                warn!(
                    subscription_id = %subscription_id,
                    error = %error,
                    "subscription query failed, skipping its results"
                );
                Vec::new()
            }
        }
    })
}

/// How a task list is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPlan {
    /// One task at a time, each awaited before the next starts.
    Sequential,
    /// Consecutive batches of the given size; tasks within a batch run
    /// concurrently, with a hard barrier before the next batch.
    Batched(usize),
    /// Everything in flight at once.
    Concurrent,
}

impl ExecutionPlan {
    /// Derive the consumption-fetch plan from configuration.
    ///
    /// Day chunking forces sequential execution (each task already fans out
    /// into per-day sub-requests internally). Otherwise a configured batch
    /// size bounds the fan-out, and no configuration means a single
    /// all-concurrent batch.
    #[must_use]
    pub fn for_estimates(chunk_by_day: bool, subscription_batch_size: Option<usize>) -> Self {
        if chunk_by_day {
            Self::Sequential
        } else {
            match subscription_batch_size {
                Some(size) if size > 0 => Self::Batched(size),
                _ => Self::Concurrent,
            }
        }
    }

    /// Number of batches this plan issues for `task_count` tasks.
    #[must_use]
    pub fn batch_count(&self, task_count: usize) -> usize {
        match self {
            Self::Sequential => task_count,
            Self::Batched(size) => task_count.div_ceil((*size).max(1)),
            Self::Concurrent => usize::from(task_count > 0),
        }
    }
}

/// Drive a task list under the given plan.
///
/// Returns one result sequence per task, in issue order. Batch *k+1* is not
/// issued until every task of batch *k* has resolved.
pub async fn run<T>(tasks: Vec<FetchTask<T>>, plan: ExecutionPlan) -> Vec<Vec<T>> {
    match plan {
        ExecutionPlan::Sequential => {
            let mut results = Vec::with_capacity(tasks.len());
            for task in tasks {
                results.push(task.await);
            }
            results
        }
        ExecutionPlan::Batched(size) => {
            let size = size.max(1);
            let mut results = Vec::with_capacity(tasks.len());
            let mut pending = tasks.into_iter().peekable();
            while pending.peek().is_some() {
                let batch: Vec<_> = pending.by_ref().take(size).collect();
                results.extend(join_all(batch).await);
            }
            results
        }
        ExecutionPlan::Concurrent => join_all(tasks).await,
    }
}
