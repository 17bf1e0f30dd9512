//! Paged iteration over the X matrix of a query
//!
//! Composes the stages of a page iteration:
//!
//! ```text
//! partition ─▶ read ─▶ [prefetch] ─▶ reindex ─▶ [prefetch] ─▶ assemble ─▶ [prefetch] ─▶ consumer
//! ```
//!
//! Every arrow is a pull. With prefetch enabled each stage keeps at most
//! one item in flight on the context's worker pool, so at most three pages
//! are being worked on at once, and pages still come out in chunk order.
//! Nothing is scheduled past the first failed page.

use std::sync::Arc;
use xpager_core::{
    chunk_count, JoinId, MatrixElement, MatrixFormat, PageOptions, ReindexedTriplet, TripletBatch,
};

use crate::chunker::{Chunk, ChunkPartitioner};
use crate::context::QueryContext;
use crate::error::{PagerError, Result};
use crate::matrix::{CompressedMatrix, CooMatrix};
use crate::prefetch::{prefetch_stage, Stage};
use crate::reader::read_chunk;
use crate::reindex::Reindexer;

/// One page of query results
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    /// Primary-axis ids of the page; row `i` of a positionally indexed
    /// page holds id `primary_ids[i]`
    pub primary_ids: Arc<[JoinId]>,
    /// Secondary-axis ids of the query
    pub secondary_ids: Arc<[JoinId]>,
    pub matrix: CompressedMatrix<T>,
}

impl<T> PageResult<T> {
    /// (primary ids, secondary ids) covered by this page
    pub fn coords(&self) -> (&[JoinId], &[JoinId]) {
        (&self.primary_ids, &self.secondary_ids)
    }

    /// Split into `((primary ids, secondary ids), matrix)`
    pub fn into_parts(self) -> ((Arc<[JoinId]>, Arc<[JoinId]>), CompressedMatrix<T>) {
        ((self.primary_ids, self.secondary_ids), self.matrix)
    }
}

/// Single-pass iterator over the pages of a query
///
/// Stops for good after yielding the first error. Dropping it early
/// abandons any pages still being prepared in the background.
pub struct PageIter<T> {
    /// Stage chain; dropped once the iteration ends or fails
    inner: Option<Stage<PageResult<T>>>,
    page_count: usize,
}

impl<T> PageIter<T> {
    /// Total number of pages the iteration was set up to produce
    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

impl<T> Iterator for PageIter<T> {
    type Item = Result<PageResult<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let inner = self.inner.as_mut()?;
        match inner.next() {
            Some(Ok(page)) => Some(Ok(page)),
            Some(Err(err)) => {
                tracing::debug!(error = %err, "paged iteration stopped on error");
                self.inner = None;
                Some(Err(err))
            }
            None => {
                self.inner = None;
                None
            }
        }
    }
}

impl<T> std::iter::FusedIterator for PageIter<T> {}

impl<T> std::fmt::Debug for PageIter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageIter")
            .field("page_count", &self.page_count)
            .field("finished", &self.inner.is_none())
            .finish()
    }
}

/// Iterate over the rows of the query's X matrix, one bounded page at a
/// time
///
/// All options are validated before any read is issued. Read, reindex
/// and assembly failures surface at the pull that would have produced the
/// affected page; pages already yielded stay valid.
///
/// # Example
///
/// ```rust,no_run
/// # use xpager::{x_sparse_iter, PageOptions, QueryContext, SparseMatrix};
/// # fn run(ctx: &QueryContext<f32>) -> xpager::Result<()> {
/// let options = PageOptions::for_layer("raw").with_page_size(1000);
/// for page in x_sparse_iter(ctx, &options)? {
///     let ((obs_ids, var_ids), matrix) = page?.into_parts();
///     // matrix[i, j] belongs to obs_ids[i] and var_ids[j]
///     assert_eq!(matrix.dimensions(), (obs_ids.len(), var_ids.len()));
/// }
/// # Ok(())
/// # }
/// ```
pub fn x_sparse_iter<T: MatrixElement>(
    ctx: &QueryContext<T>,
    options: &PageOptions,
) -> Result<PageIter<T>> {
    options.validate()?;

    let partitioner = ChunkPartitioner::new(
        Arc::clone(ctx.obs_ids()),
        Arc::clone(ctx.var_ids()),
        options.page_size,
    )?;
    let extent = ctx
        .reader()
        .shape(&options.layer)
        .map_err(|source| PagerError::upstream(None, source))?;
    let reindexer = Reindexer::new(options.format, options.reindex_minor, extent)?;

    let page_count = chunk_count(ctx.n_obs(), options.page_size)?;
    debug_assert_eq!(page_count, partitioner.len());
    let pool = ctx.pool();
    let prefetch = options.enable_prefetch;

    tracing::debug!(
        layer = %options.layer,
        pages = page_count,
        page_size = options.page_size,
        format = %options.format,
        prefetch,
        reindex_minor = options.reindex_minor,
        "starting paged sparse iteration"
    );

    let read_ctx = ctx.clone();
    let layer = options.layer.clone();
    let reads = prefetch_stage(
        partitioner,
        move |chunk: Chunk| read_chunk(&read_ctx, &layer, chunk),
        pool,
        prefetch,
    );

    let reindex_ctx = ctx.clone();
    let format = reindexer.format();
    let reindexed = prefetch_stage(
        reads,
        move |item: Result<(Chunk, TripletBatch<T>)>| -> Result<(Chunk, ReindexedTriplet<T>)> {
            let (chunk, batch) = item?;
            let triplet = reindexer.reindex(&reindex_ctx, &chunk, batch)?;
            Ok((chunk, triplet))
        },
        pool,
        prefetch,
    );

    let pages = prefetch_stage(
        reindexed,
        move |item: Result<(Chunk, ReindexedTriplet<T>)>| -> Result<PageResult<T>> {
            let (chunk, triplet) = item?;
            assemble(chunk, triplet, format)
        },
        pool,
        prefetch,
    );

    Ok(PageIter {
        inner: Some(pages),
        page_count,
    })
}

fn assemble<T: MatrixElement>(
    chunk: Chunk,
    triplet: ReindexedTriplet<T>,
    format: MatrixFormat,
) -> Result<PageResult<T>> {
    let matrix = CooMatrix::from_triplet(triplet)?.to_compressed(format)?;
    Ok(PageResult {
        primary_ids: chunk.primary,
        secondary_ids: chunk.secondary,
        matrix,
    })
}
