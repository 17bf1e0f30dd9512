//! Collaborator interfaces consumed by the paging pipeline
//!
//! The backing array store and the secondary-axis indexer are owned
//! outside this workspace. The pipeline only needs the narrow capabilities
//! defined here, which keeps it independent of any storage engine.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::{JoinId, TripletBatch};

/// Opaque failure reported by a collaborator
pub type ReadError = Box<dyn core::error::Error + Send + Sync>;

/// Read capability of a backing sparse array store
///
/// Implementations must be safe for concurrent reads; the pipeline may
/// issue the read for one page while a previous page is still being
/// reindexed on another thread.
pub trait ArrayReader<T>: Send + Sync {
    /// Read every stored cell of `layer` whose coordinates lie in
    /// `primary` x `secondary`
    ///
    /// Cells may be returned in any order. Transient-failure policy
    /// (retries, timeouts) belongs to the implementation.
    fn read(
        &self,
        layer: &str,
        primary: &[JoinId],
        secondary: &[JoinId],
    ) -> Result<TripletBatch<T>, ReadError>;

    /// Full global extent of `layer` as (rows, cols)
    ///
    /// Used to size page dimensions on axes that keep global ids.
    fn shape(&self, layer: &str) -> Result<(u64, u64), ReadError>;
}

/// Maps global secondary-axis ids to positions in the query's id sequence
pub trait AxisIndexer: Send + Sync {
    /// Position of every id in `ids`, or `None` when an id is not part of
    /// the query
    ///
    /// The returned vector must have the same length as `ids`.
    fn position_of(&self, ids: &[JoinId]) -> Vec<Option<usize>>;
}
