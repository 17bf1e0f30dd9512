//! Coordinate triplets exchanged between pipeline stages

use alloc::vec::Vec;

use crate::{CoreError, JoinId};

/// Raw cells returned by one store read
///
/// Three parallel sequences, one entry per stored cell, in whatever order
/// the store produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct TripletBatch<T> {
    pub values: Vec<T>,
    pub primary: Vec<JoinId>,
    pub secondary: Vec<JoinId>,
}

impl<T> TripletBatch<T> {
    /// Create a batch, checking that the three sequences line up
    pub fn new(
        values: Vec<T>,
        primary: Vec<JoinId>,
        secondary: Vec<JoinId>,
    ) -> Result<Self, CoreError> {
        let batch = Self {
            values,
            primary,
            secondary,
        };
        batch.check_lengths()?;
        Ok(batch)
    }

    /// An empty batch
    pub fn empty() -> Self {
        Self {
            values: Vec::new(),
            primary: Vec::new(),
            secondary: Vec::new(),
        }
    }

    /// Number of stored cells
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Check that all three sequences have the same length
    pub fn check_lengths(&self) -> Result<(), CoreError> {
        if self.primary.len() != self.values.len() || self.secondary.len() != self.values.len() {
            return Err(CoreError::LengthMismatch);
        }
        Ok(())
    }

    /// Append one cell
    pub fn push(&mut self, value: T, primary: JoinId, secondary: JoinId) {
        self.values.push(value);
        self.primary.push(primary);
        self.secondary.push(secondary);
    }
}

impl<T> Default for TripletBatch<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// How the coordinates of one axis are expressed after reindexing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisIndexing {
    /// Zero-based position within the page's id sequence
    Positional,
    /// Global identifier from the backing store
    Global,
}

/// Cells of one page with coordinates ready for assembly
#[derive(Debug, Clone, PartialEq)]
pub struct ReindexedTriplet<T> {
    pub values: Vec<T>,
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    /// Declared (rows, cols) shape of the page
    pub shape: (usize, usize),
    /// Indexing of the (row, column) coordinates
    pub indexing: (AxisIndexing, AxisIndexing),
}

impl<T> ReindexedTriplet<T> {
    /// Number of stored cells
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}
