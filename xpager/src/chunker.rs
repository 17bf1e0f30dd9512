//! Primary-axis chunk partitioning
//!
//! Splits the query's primary-axis ids into fixed-size, order-preserving
//! slices. Each slice becomes exactly one page, which is what bounds the
//! memory held by a page iteration.

use std::sync::Arc;
use xpager_core::{validate_page_size, validation::validate_chunk_boundaries, JoinId};

use crate::error::Result;

/// One page's worth of primary-axis ids, plus the full secondary-axis ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Ordinal of this chunk within the iteration
    pub index: usize,
    /// Primary-axis ids covered by this chunk
    pub primary: Arc<[JoinId]>,
    /// Secondary-axis ids of the whole query (shared, never sliced)
    pub secondary: Arc<[JoinId]>,
}

impl Chunk {
    /// Number of primary-axis ids in this chunk
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }
}

/// Lazy iterator over the chunks of a primary-axis id sequence
///
/// Yields `[0, S)`, `[S, 2S)`, ... until all ids are consumed. Build a new
/// partitioner to start over.
#[derive(Debug, Clone)]
pub struct ChunkPartitioner {
    primary: Arc<[JoinId]>,
    secondary: Arc<[JoinId]>,
    page_size: usize,
    next_start: usize,
    next_index: usize,
}

impl ChunkPartitioner {
    /// Create a partitioner, failing if `page_size` is zero
    pub fn new(
        primary: Arc<[JoinId]>,
        secondary: Arc<[JoinId]>,
        page_size: usize,
    ) -> Result<Self> {
        let page_size = validate_page_size(page_size)?;
        Ok(Self {
            primary,
            secondary,
            page_size,
            next_start: 0,
            next_index: 0,
        })
    }

    /// Configured page size
    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

impl Iterator for ChunkPartitioner {
    type Item = Chunk;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.primary.len();
        if self.next_start >= total {
            return None;
        }

        let start = self.next_start;
        let end = start.saturating_add(self.page_size).min(total);
        debug_assert!(validate_chunk_boundaries(start, end, total).is_ok());

        let chunk = Chunk {
            index: self.next_index,
            primary: Arc::from(&self.primary[start..end]),
            secondary: Arc::clone(&self.secondary),
        };

        self.next_start = end;
        self.next_index += 1;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for ChunkPartitioner {
    fn len(&self) -> usize {
        self.primary
            .len()
            .saturating_sub(self.next_start)
            .div_ceil(self.page_size)
    }
}

impl std::iter::FusedIterator for ChunkPartitioner {}
