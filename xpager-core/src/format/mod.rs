//! Matrix layout and axis definitions
//!
//! This module contains the enums that describe how a page is laid out
//! and which axis of the query is paged.

pub mod constants;

/// Sparse matrix layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum MatrixFormat {
    /// Coordinate format (COO)
    Coo = 0,
    /// Compressed Sparse Row (CSR), row-major
    #[default]
    Csr = 1,
    /// Compressed Sparse Column (CSC), column-major
    Csc = 2,
}

impl MatrixFormat {
    /// Whether pages can be emitted in this layout
    pub const fn is_compressed(&self) -> bool {
        matches!(self, MatrixFormat::Csr | MatrixFormat::Csc)
    }

    /// The axis whose element count sizes the offset array
    ///
    /// Rows are the primary axis, so CSR pages are primary-major and CSC
    /// pages are secondary-major. COO has no major axis.
    pub const fn major_axis(&self) -> Option<Axis> {
        match self {
            MatrixFormat::Csr => Some(Axis::Primary),
            MatrixFormat::Csc => Some(Axis::Secondary),
            MatrixFormat::Coo => None,
        }
    }

    /// The complement of [`MatrixFormat::major_axis`]
    pub const fn minor_axis(&self) -> Option<Axis> {
        match self.major_axis() {
            Some(axis) => Some(axis.other()),
            None => None,
        }
    }
}

impl core::fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MatrixFormat::Coo => write!(f, "COO"),
            MatrixFormat::Csr => write!(f, "CSR"),
            MatrixFormat::Csc => write!(f, "CSC"),
        }
    }
}

impl core::str::FromStr for MatrixFormat {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::validation::parse_format(s)
    }
}

/// Query axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// Observations (rows); the only pageable axis
    #[default]
    Primary,
    /// Features (columns)
    Secondary,
}

impl Axis {
    /// The other axis
    pub const fn other(&self) -> Axis {
        match self {
            Axis::Primary => Axis::Secondary,
            Axis::Secondary => Axis::Primary,
        }
    }
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Axis::Primary => write!(f, "primary"),
            Axis::Secondary => write!(f, "secondary"),
        }
    }
}

impl core::str::FromStr for Axis {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::validation::parse_axis(s)
    }
}
