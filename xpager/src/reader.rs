//! Per-chunk reads against the backing array store

use xpager_core::{MatrixElement, TripletBatch};

use crate::chunker::Chunk;
use crate::context::QueryContext;
use crate::error::{PagerError, Result};

/// Issue exactly one store read for `chunk` and return its raw cells
///
/// The read is constrained to the chunk's primary ids and the query's full
/// secondary ids. Failures are not retried here; they are tagged with the
/// chunk index and handed back to the consumer.
pub fn read_chunk<T: MatrixElement>(
    ctx: &QueryContext<T>,
    layer: &str,
    chunk: Chunk,
) -> Result<(Chunk, TripletBatch<T>)> {
    let _span = tracing::trace_span!(
        "read_chunk",
        chunk = chunk.index,
        n_obs = chunk.len(),
        n_vars = chunk.secondary.len()
    )
    .entered();

    let batch = ctx
        .reader()
        .read(layer, &chunk.primary, &chunk.secondary)
        .map_err(|source| PagerError::upstream(Some(chunk.index), source))?;

    batch.check_lengths()?;
    tracing::trace!(nnz = batch.nnz(), "read_chunk: batch received");

    Ok((chunk, batch))
}
