//! Abstract interfaces for the xpager ecosystem
//!
//! This module defines the trait abstractions used by the paging pipeline.
//! Traits are pure interfaces - no concrete implementations.

pub mod backend;
pub mod element;
pub mod matrix;

pub use backend::{ArrayReader, AxisIndexer, ReadError};
pub use element::MatrixElement;
pub use matrix::{MatrixOperations, SparseMatrix};
