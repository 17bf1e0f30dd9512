//! Page size and coordinate bounds validation
//!
//! Pure arithmetic checks used when partitioning a query, mapping store
//! extents onto page dimensions, and assembling pages.

use crate::CoreError;

/// Validate a page size
///
/// Pages hold at least one primary-axis id.
pub const fn validate_page_size(page_size: usize) -> Result<usize, CoreError> {
    if page_size == 0 {
        return Err(CoreError::InvalidPageSize);
    }
    Ok(page_size)
}

/// Number of pages needed to cover `len` ids at `page_size` ids per page
pub const fn chunk_count(len: usize, page_size: usize) -> Result<usize, CoreError> {
    match validate_page_size(page_size) {
        Ok(size) => Ok(len.div_ceil(size)),
        Err(e) => Err(e),
    }
}

/// Check that a coordinate lies inside a dimension
pub const fn check_coordinate(coordinate: usize, dimension: usize) -> Result<usize, CoreError> {
    if coordinate >= dimension {
        return Err(CoreError::CoordinateOutOfBounds);
    }
    Ok(coordinate)
}

/// Convert a store extent into an in-memory matrix dimension
///
/// Fails when the extent cannot be addressed on this platform.
pub fn extent_to_dimension(extent: u64) -> Result<usize, CoreError> {
    usize::try_from(extent).map_err(|_| CoreError::CoordinateOutOfBounds)
}

/// Validate chunk boundary constraints
///
/// Ensures that a chunk's [start, end) range is ordered and does not run
/// past the sequence it was cut from.
pub const fn validate_chunk_boundaries(
    start: usize,
    end: usize,
    total_size: usize,
) -> Result<(), CoreError> {
    if start > end || end > total_size {
        return Err(CoreError::CoordinateOutOfBounds);
    }
    Ok(())
}
