//! Completion tracking for asynchronous build work.
//!
//! Stages run synchronously; only upstream language merges are asynchronous.
//! A [`CompletionGroup`] collects those units while stages run and is then
//! awaited once by the pipeline driver before the sink is finalized.
//!
//! [`CompletionGroup::wait`] takes the group by value, so every `start` has
//! necessarily happened before the driver begins waiting.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::debug;

use crate::error::{BuildError, BuildResult};

/// Group of in-flight asynchronous units producing `T`.
pub struct CompletionGroup<T> {
    tasks: JoinSet<(usize, BuildResult<T>)>,
    started: usize,
}

impl<T: Send + 'static> Default for CompletionGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> CompletionGroup<T> {
    /// Create an empty group.
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
            started: 0,
        }
    }

    /// Register and spawn one unit of work.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F>(&mut self, work: F)
    where
        F: Future<Output = BuildResult<T>> + Send + 'static,
    {
        let seq = self.started;
        self.started += 1;
        self.tasks.spawn(async move { (seq, work.await) });
        debug!("Started async unit #{}", seq);
    }

    /// Total number of units registered.
    pub fn started(&self) -> usize {
        self.started
    }

    /// Number of units still running.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every registered unit and return their outputs in
    /// registration order.
    ///
    /// An empty group completes immediately. The first failing unit fails
    /// the whole group; remaining units are aborted. With a `timeout`, units
    /// still running when it expires are aborted and `MergeTimeout` is
    /// returned.
    pub async fn wait(mut self, timeout: Option<Duration>) -> BuildResult<Vec<T>> {
        if self.started == 0 {
            return Ok(Vec::new());
        }

        let expected = self.started;
        let tasks = &mut self.tasks;
        let collect = async move {
            let mut done = Vec::with_capacity(expected);
            while let Some(joined) = tasks.join_next().await {
                let (seq, result) = joined.map_err(|e| BuildError::MergeTask(e.to_string()))?;
                debug!("Async unit #{} finished", seq);
                done.push((seq, result?));
            }
            Ok::<_, BuildError>(done)
        };

        let mut done = match timeout {
            Some(limit) => tokio::time::timeout(limit, collect)
                .await
                .map_err(|_| BuildError::MergeTimeout(limit))??,
            None => collect.await?,
        };

        done.sort_by_key(|(seq, _)| *seq);
        Ok(done.into_iter().map(|(_, output)| output).collect())
    }
}
