//! Fan-out of independent per-entry tasks with a join barrier.
//!
//! Every item becomes one spawned task. A task reports exactly one result
//! through a bounded channel sized to the number of items, and the
//! coordinator blocks until it has received one result per task. Results
//! arrive in completion order, so callers must merge them by key.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, warn};

/// Settings for a fan-out run.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Upper bound on tasks running their body at the same time.
    pub max_concurrent: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_concurrent: num_cpus::get(),
        }
    }
}

impl ExecutorConfig {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Use `jobs` if given, otherwise the CPU count.
    pub fn from_jobs(jobs: Option<usize>) -> Self {
        jobs.map(Self::new).unwrap_or_default()
    }
}

/// Run `task` once per item and collect every result.
///
/// `on_result` is called on the coordinating task for each result as it
/// arrives. The returned vector is shorter than `items` only when a task
/// died before reporting; the caller decides how to treat the missing keys.
pub async fn fan_out<I, T, F, Fut, C>(
    items: Vec<I>,
    config: &ExecutorConfig,
    task: F,
    mut on_result: C,
) -> Vec<T>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    C: FnMut(&T),
{
    let expected = items.len();
    if expected == 0 {
        return Vec::new();
    }

    let (sender, mut receiver) = mpsc::channel::<T>(expected);
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent.max(1)));

    for item in items {
        let sender = sender.clone();
        let semaphore = Arc::clone(&semaphore);
        let future = task(item);

        tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let output = future.await;
            // Capacity equals the task count, so this never waits.
            let _ = sender.send(output).await;
        });
    }
    drop(sender);

    let mut results = Vec::with_capacity(expected);
    while results.len() < expected {
        match receiver.recv().await {
            Some(output) => {
                on_result(&output);
                results.push(output);
            }
            None => {
                warn!(
                    "{} of {} tasks finished without reporting a result",
                    expected - results.len(),
                    expected
                );
                break;
            }
        }
    }

    debug!("Collected {} of {} task results", results.len(), expected);
    results
}
