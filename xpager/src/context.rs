//! Query context shared by every stage of a page iteration
//!
//! The context bundles the query's id sequences with the collaborator
//! capabilities it reads through. It is owned by the caller, outlives the
//! iteration, and is only ever read by the pipeline. Every field is behind
//! an `Arc`, so stages running on the worker pool hold cheap clones instead
//! of borrowing it.

use rayon::ThreadPool;
use std::sync::Arc;
use xpager_core::{ArrayReader, AxisIndexer, JoinId};

/// Read-only description of one coordinate-bounded query
pub struct QueryContext<T> {
    obs_ids: Arc<[JoinId]>,
    var_ids: Arc<[JoinId]>,
    reader: Arc<dyn ArrayReader<T>>,
    indexer: Arc<dyn AxisIndexer>,
    pool: Arc<ThreadPool>,
}

impl<T> Clone for QueryContext<T> {
    fn clone(&self) -> Self {
        Self {
            obs_ids: Arc::clone(&self.obs_ids),
            var_ids: Arc::clone(&self.var_ids),
            reader: Arc::clone(&self.reader),
            indexer: Arc::clone(&self.indexer),
            pool: Arc::clone(&self.pool),
        }
    }
}

impl<T> QueryContext<T> {
    /// Create a context from the query's ordered id sequences and its
    /// collaborators
    pub fn new(
        obs_ids: impl Into<Arc<[JoinId]>>,
        var_ids: impl Into<Arc<[JoinId]>>,
        reader: Arc<dyn ArrayReader<T>>,
        indexer: Arc<dyn AxisIndexer>,
        pool: Arc<ThreadPool>,
    ) -> Self {
        Self {
            obs_ids: obs_ids.into(),
            var_ids: var_ids.into(),
            reader,
            indexer,
            pool,
        }
    }

    /// Replace the secondary-axis indexer
    pub fn with_indexer(mut self, indexer: Arc<dyn AxisIndexer>) -> Self {
        self.indexer = indexer;
        self
    }

    /// Ordered primary-axis ids of the query
    pub fn obs_ids(&self) -> &Arc<[JoinId]> {
        &self.obs_ids
    }

    /// Ordered secondary-axis ids of the query
    pub fn var_ids(&self) -> &Arc<[JoinId]> {
        &self.var_ids
    }

    /// Number of primary-axis ids in the query
    pub fn n_obs(&self) -> usize {
        self.obs_ids.len()
    }

    /// Number of secondary-axis ids in the query
    pub fn n_vars(&self) -> usize {
        self.var_ids.len()
    }

    pub fn reader(&self) -> &Arc<dyn ArrayReader<T>> {
        &self.reader
    }

    pub fn indexer(&self) -> &Arc<dyn AxisIndexer> {
        &self.indexer
    }

    /// Worker pool used for prefetch
    pub fn pool(&self) -> &Arc<ThreadPool> {
        &self.pool
    }
}

impl<T> std::fmt::Debug for QueryContext<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryContext")
            .field("n_obs", &self.n_obs())
            .field("n_vars", &self.n_vars())
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}
