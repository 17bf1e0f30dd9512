//! Axis reindexing of raw store triplets
//!
//! Rewrites the global ids of a [`TripletBatch`] into matrix coordinates
//! for one page. The major axis of the output format is always mapped to
//! zero-based positions: rows within the chunk for CSR, columns within the
//! query's secondary ids for CSC. The offset array of a compressed page has
//! one entry per major element, so a major axis left in global ids would
//! size it to the whole store.
//!
//! The minor axis is mapped to positions only when `reindex_minor` is set;
//! otherwise its global ids are kept as coordinates and the page spans the
//! store's full extent on that axis.

use hashbrown::HashMap;
use xpager_core::{
    validation::extent_to_dimension, Axis, AxisIndexing, CoreError, JoinId, MatrixElement,
    MatrixFormat, ReindexedTriplet, TripletBatch,
};

use crate::chunker::Chunk;
use crate::context::QueryContext;
use crate::error::{PagerError, Result};

/// Format-dependent reindexing rules for one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reindexer {
    format: MatrixFormat,
    reindex_minor: bool,
    /// Global (rows, cols) extent of the layer being read
    extent: (usize, usize),
}

impl Reindexer {
    /// Create rules for a compressed output format
    ///
    /// `extent` is the layer's global shape, used for axes that keep
    /// global ids.
    pub fn new(format: MatrixFormat, reindex_minor: bool, extent: (u64, u64)) -> Result<Self> {
        if !format.is_compressed() {
            return Err(PagerError::InvalidArgument(CoreError::InvalidFormat));
        }
        Ok(Self {
            format,
            reindex_minor,
            extent: (extent_to_dimension(extent.0)?, extent_to_dimension(extent.1)?),
        })
    }

    pub fn format(&self) -> MatrixFormat {
        self.format
    }

    /// How coordinates on `axis` are expressed in assembled pages
    pub fn indexing(&self, axis: Axis) -> AxisIndexing {
        if self.format.major_axis() == Some(axis) || self.reindex_minor {
            AxisIndexing::Positional
        } else {
            AxisIndexing::Global
        }
    }

    /// Declared (rows, cols) shape of the page built from `chunk`
    pub fn page_shape(&self, chunk: &Chunk) -> (usize, usize) {
        let rows = match self.indexing(Axis::Primary) {
            AxisIndexing::Positional => chunk.len(),
            AxisIndexing::Global => self.extent.0,
        };
        let cols = match self.indexing(Axis::Secondary) {
            AxisIndexing::Positional => chunk.secondary.len(),
            AxisIndexing::Global => self.extent.1,
        };
        (rows, cols)
    }

    /// Rewrite `batch` into page coordinates for `chunk`
    pub fn reindex<T: MatrixElement>(
        &self,
        ctx: &QueryContext<T>,
        chunk: &Chunk,
        batch: TripletBatch<T>,
    ) -> Result<ReindexedTriplet<T>> {
        let _span = tracing::trace_span!("reindex", chunk = chunk.index, nnz = batch.nnz()).entered();
        batch.check_lengths()?;

        let rows = match self.indexing(Axis::Primary) {
            AxisIndexing::Positional => positions_in_chunk(chunk, &batch.primary)?,
            AxisIndexing::Global => global_coordinates(&batch.primary, self.extent.0)?,
        };
        let cols = match self.indexing(Axis::Secondary) {
            AxisIndexing::Positional => positions_in_query(ctx, &batch.secondary)?,
            AxisIndexing::Global => global_coordinates(&batch.secondary, self.extent.1)?,
        };

        Ok(ReindexedTriplet {
            values: batch.values,
            rows,
            cols,
            shape: self.page_shape(chunk),
            indexing: (self.indexing(Axis::Primary), self.indexing(Axis::Secondary)),
        })
    }
}

/// Position of every id within the chunk's primary slice, via a one-shot
/// index of that slice
fn positions_in_chunk(chunk: &Chunk, ids: &[JoinId]) -> Result<Vec<usize>> {
    let index: HashMap<JoinId, usize> = chunk
        .primary
        .iter()
        .enumerate()
        .map(|(pos, &id)| (id, pos))
        .collect();

    ids.iter()
        .map(|id| {
            index.get(id).copied().ok_or_else(|| {
                PagerError::Consistency(format!(
                    "store returned primary id {id} outside page {}",
                    chunk.index
                ))
            })
        })
        .collect()
}

/// Position of every id within the query's secondary ids, via the indexer
fn positions_in_query<T>(ctx: &QueryContext<T>, ids: &[JoinId]) -> Result<Vec<usize>> {
    let positions = ctx.indexer().position_of(ids);
    if positions.len() != ids.len() {
        return Err(PagerError::Consistency(format!(
            "indexer returned {} positions for {} ids",
            positions.len(),
            ids.len()
        )));
    }

    positions
        .into_iter()
        .zip(ids)
        .map(|(pos, &id)| pos.ok_or(PagerError::Core(CoreError::UnresolvedId(id))))
        .collect()
}

/// Global ids used directly as coordinates, checked against the extent
fn global_coordinates(ids: &[JoinId], extent: usize) -> Result<Vec<usize>> {
    ids.iter()
        .map(|&id| match usize::try_from(id) {
            Ok(coordinate) if coordinate < extent => Ok(coordinate),
            _ => Err(PagerError::Core(CoreError::CoordinateOutOfBounds)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use xpager_core::{ArrayReader, AxisIndexer, ReadError};

    struct Unused;

    impl ArrayReader<f32> for Unused {
        fn read(
            &self,
            _layer: &str,
            _primary: &[JoinId],
            _secondary: &[JoinId],
        ) -> std::result::Result<TripletBatch<f32>, ReadError> {
            Err("not used".into())
        }

        fn shape(&self, _layer: &str) -> std::result::Result<(u64, u64), ReadError> {
            Ok((100, 50))
        }
    }

    struct Lookup(Vec<JoinId>);

    impl AxisIndexer for Lookup {
        fn position_of(&self, ids: &[JoinId]) -> Vec<Option<usize>> {
            ids.iter()
                .map(|id| self.0.iter().position(|v| v == id))
                .collect()
        }
    }

    fn context() -> QueryContext<f32> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        QueryContext::new(
            vec![10u64, 11, 12, 13],
            vec![2u64, 7, 9],
            Arc::new(Unused),
            Arc::new(Lookup(vec![2, 7, 9])),
            Arc::new(pool),
        )
    }

    fn chunk() -> Chunk {
        Chunk {
            index: 1,
            primary: vec![12u64, 13].into(),
            secondary: vec![2u64, 7, 9].into(),
        }
    }

    fn batch() -> TripletBatch<f32> {
        TripletBatch::new(vec![1.5, 4.0], vec![13, 12], vec![7, 9]).unwrap()
    }

    #[test]
    fn test_csr_full_reindex() {
        let reindexer = Reindexer::new(MatrixFormat::Csr, true, (100, 50)).unwrap();
        let t = reindexer.reindex(&context(), &chunk(), batch()).unwrap();

        assert_eq!(t.rows, vec![1, 0]);
        assert_eq!(t.cols, vec![1, 2]);
        assert_eq!(t.shape, (2, 3));
        assert_eq!(
            t.indexing,
            (AxisIndexing::Positional, AxisIndexing::Positional)
        );
    }

    #[test]
    fn test_csr_keeps_global_columns() {
        let reindexer = Reindexer::new(MatrixFormat::Csr, false, (100, 50)).unwrap();
        let t = reindexer.reindex(&context(), &chunk(), batch()).unwrap();

        assert_eq!(t.rows, vec![1, 0]);
        assert_eq!(t.cols, vec![7, 9]);
        assert_eq!(t.shape, (2, 50));
    }

    #[test]
    fn test_csc_keeps_global_rows() {
        let reindexer = Reindexer::new(MatrixFormat::Csc, false, (100, 50)).unwrap();
        let t = reindexer.reindex(&context(), &chunk(), batch()).unwrap();

        assert_eq!(t.rows, vec![13, 12]);
        assert_eq!(t.cols, vec![1, 2]);
        assert_eq!(t.shape, (100, 3));
        assert_eq!(t.indexing, (AxisIndexing::Global, AxisIndexing::Positional));
    }

    #[test]
    fn test_csc_full_reindex() {
        let reindexer = Reindexer::new(MatrixFormat::Csc, true, (100, 50)).unwrap();
        let t = reindexer.reindex(&context(), &chunk(), batch()).unwrap();

        assert_eq!(t.rows, vec![1, 0]);
        assert_eq!(t.cols, vec![1, 2]);
        assert_eq!(t.shape, (2, 3));
    }

    #[test]
    fn test_rejects_coo() {
        let err = Reindexer::new(MatrixFormat::Coo, true, (1, 1)).unwrap_err();
        assert!(matches!(
            err,
            PagerError::InvalidArgument(CoreError::InvalidFormat)
        ));
    }

    #[test]
    fn test_unknown_primary_id() {
        let reindexer = Reindexer::new(MatrixFormat::Csr, true, (100, 50)).unwrap();
        let stray = TripletBatch::new(vec![1.0], vec![10], vec![2]).unwrap();
        let err = reindexer.reindex(&context(), &chunk(), stray).unwrap_err();
        assert!(matches!(err, PagerError::Consistency(_)));
    }

    #[test]
    fn test_unresolved_secondary_id() {
        let reindexer = Reindexer::new(MatrixFormat::Csr, true, (100, 50)).unwrap();
        let stray = TripletBatch::new(vec![1.0], vec![12], vec![8]).unwrap();
        let err = reindexer.reindex(&context(), &chunk(), stray).unwrap_err();
        assert!(matches!(err, PagerError::Core(CoreError::UnresolvedId(8))));
    }

    #[test]
    fn test_global_id_outside_extent() {
        let reindexer = Reindexer::new(MatrixFormat::Csr, false, (100, 8)).unwrap();
        let err = reindexer.reindex(&context(), &chunk(), batch()).unwrap_err();
        assert!(matches!(
            err,
            PagerError::Core(CoreError::CoordinateOutOfBounds)
        ));
    }
}
