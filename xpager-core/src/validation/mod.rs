//! Validation utilities for page iteration
//!
//! This module contains pure validation functions with no I/O dependencies.

pub mod bounds;
pub mod parsing;

pub use bounds::{
    check_coordinate, chunk_count, extent_to_dimension, validate_chunk_boundaries,
    validate_page_size,
};
pub use parsing::{parse_axis, parse_format};
