//! xpager - Memory-bounded Paging of Sparse Query Results
//!
//! This library streams the X matrix of a coordinate-bounded query as a
//! sequence of bounded-size compressed sparse pages, without ever holding
//! the full result in memory.
//!
//! ## Architecture
//!
//! xpager splits definitions from execution:
//!
//! - **xpager-core**: Pure definitions, collaborator traits, and validation (no I/O)
//! - **xpager**: The paging pipeline, prefetch, reindexing and assembly
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use xpager::{x_sparse_iter, ArrayReader, AxisIndexer, PageOptions, QueryContext};
//!
//! fn example(
//!     store: Arc<dyn ArrayReader<f32>>,
//!     indexer: Arc<dyn AxisIndexer>,
//! ) -> xpager::Result<()> {
//!     let pool = Arc::new(rayon::ThreadPoolBuilder::new().build().unwrap());
//!     let ctx = QueryContext::new(vec![0u64, 5, 9], vec![1u64, 2], store, indexer, pool);
//!
//!     for page in x_sparse_iter(&ctx, &PageOptions::for_layer("raw").with_page_size(2))? {
//!         let page = page?;
//!         println!("{} rows, {} stored values", page.primary_ids.len(), page.matrix.data().len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded pages**: Each page covers at most `page_size` primary ids
//! - **Staged prefetch**: Read, reindex and assembly overlap on a shared pool
//! - **Positional reindexing**: Page coordinates index into the page's own ids
//! - **CSR / CSC output**: Pages are assembled in the requested layout

pub use xpager_core::{
    // Core traits
    ArrayReader, AxisIndexer, MatrixElement, MatrixOperations, ReadError, SparseMatrix,
    // Data model
    Axis, AxisIndexing, JoinId, MatrixFormat, PageOptions, ReindexedTriplet, TripletBatch,
    // Error handling
    CoreError, ErrorCategory,
    // Defaults
    DEFAULT_LAYER, DEFAULT_PAGE_SIZE,
};

pub mod chunker;
#[cfg(feature = "serde")]
pub mod config;
pub mod context;
pub mod error;
pub mod matrix;
pub mod pipeline;
pub mod prefetch;
pub mod reader;
pub mod reindex;

pub use chunker::{Chunk, ChunkPartitioner};
#[cfg(feature = "serde")]
pub use config::{options_from_json, options_to_json};
pub use context::QueryContext;
pub use error::{PagerError, Result};
pub use matrix::{CompressedMatrix, CooMatrix};
pub use pipeline::{x_sparse_iter, PageIter, PageResult};
pub use prefetch::{prefetch_stage, Prefetch, Stage};
pub use reader::read_chunk;
pub use reindex::Reindexer;
