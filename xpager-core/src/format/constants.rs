//! Default values for page iteration

/// Default number of primary-axis ids per page (2^16)
pub const DEFAULT_PAGE_SIZE: usize = 1 << 16;

/// Default matrix layer name
pub const DEFAULT_LAYER: &str = "raw";
