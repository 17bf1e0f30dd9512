#![no_std]

//! xpager Core - Paginated Sparse Query Definitions
//!
//! This crate provides the pure definitions shared by the paging pipeline:
//! identifier and element types, output formats, iteration options, the
//! collaborator traits and validation. It performs no I/O.

extern crate alloc;

pub mod error;
pub mod format;
pub mod options;
pub mod traits;
pub mod triplet;
pub mod validation;

pub use error::*;
pub use format::constants::{DEFAULT_LAYER, DEFAULT_PAGE_SIZE};
pub use format::{Axis, MatrixFormat};
pub use options::PageOptions;
pub use traits::*;
pub use triplet::{AxisIndexing, ReindexedTriplet, TripletBatch};
pub use validation::{chunk_count, parse_axis, parse_format, validate_page_size};

/// Global identifier on either axis of the backing store
pub type JoinId = u64;
