//! Page iteration options

use alloc::string::{String, ToString};

use crate::format::constants::{DEFAULT_LAYER, DEFAULT_PAGE_SIZE};
use crate::{Axis, CoreError, MatrixFormat};

/// Configuration for one paged iteration over a query
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageOptions {
    /// Name of the matrix layer to read
    pub layer: String,
    /// Axis to page over; must be [`Axis::Primary`]
    pub paging_axis: Axis,
    /// Number of primary-axis ids per page
    pub page_size: usize,
    /// Layout of every emitted page
    pub format: MatrixFormat,
    /// Compute the next item of every stage ahead of time
    pub enable_prefetch: bool,
    /// Positionally reindex the minor axis as well as the major axis
    pub reindex_minor: bool,
}

impl PageOptions {
    /// Create options for a named layer
    pub fn for_layer(layer: &str) -> Self {
        Self {
            layer: layer.to_string(),
            ..Self::default()
        }
    }

    /// Set the layer name
    pub fn with_layer(mut self, layer: &str) -> Self {
        self.layer = layer.to_string();
        self
    }

    /// Set the paging axis
    pub fn with_paging_axis(mut self, axis: Axis) -> Self {
        self.paging_axis = axis;
        self
    }

    /// Set page size in primary-axis ids
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the output layout
    pub fn with_format(mut self, format: MatrixFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable staged prefetch
    pub fn with_prefetch(mut self, enabled: bool) -> Self {
        self.enable_prefetch = enabled;
        self
    }

    /// Enable or disable minor-axis reindexing
    pub fn with_reindex_minor(mut self, enabled: bool) -> Self {
        self.reindex_minor = enabled;
        self
    }

    /// Check the options before any I/O is issued
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.format.is_compressed() {
            return Err(CoreError::InvalidFormat);
        }
        if self.paging_axis != Axis::Primary {
            return Err(CoreError::InvalidAxis);
        }
        crate::validation::validate_page_size(self.page_size)?;
        Ok(())
    }
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            layer: DEFAULT_LAYER.to_string(),
            paging_axis: Axis::Primary,
            page_size: DEFAULT_PAGE_SIZE,
            format: MatrixFormat::Csr,
            enable_prefetch: true,
            reindex_minor: true,
        }
    }
}
