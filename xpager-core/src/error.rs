//! Error types for xpager core operations

/// Broad class of a failure, as seen by the consumer of a page iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad caller input, detected before any I/O
    InvalidArgument,
    /// The backing store failed to serve a read
    UpstreamReadFailure,
    /// An internal invariant failed; not retryable
    ConsistencyViolation,
}

/// Errors that can occur while validating or reindexing query data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// Output format is not a compressed format
    InvalidFormat,
    /// Only the primary axis may be paged
    InvalidAxis,
    /// Page size must be positive
    InvalidPageSize,
    /// Triplet sequences have different lengths
    LengthMismatch,
    /// An identifier could not be resolved to a position
    UnresolvedId(u64),
    /// A coordinate lies outside the matrix shape
    CoordinateOutOfBounds,
    /// A string option could not be parsed
    UnparsableValue,
}

impl CoreError {
    /// Classify this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            CoreError::InvalidFormat
            | CoreError::InvalidAxis
            | CoreError::InvalidPageSize
            | CoreError::UnparsableValue => ErrorCategory::InvalidArgument,
            CoreError::LengthMismatch
            | CoreError::UnresolvedId(_)
            | CoreError::CoordinateOutOfBounds => ErrorCategory::ConsistencyViolation,
        }
    }
}

impl core::fmt::Display for CoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CoreError::InvalidFormat => write!(f, "format must be 'csr' or 'csc'"),
            CoreError::InvalidAxis => write!(f, "axis must be zero (obs)"),
            CoreError::InvalidPageSize => write!(f, "page size must be positive"),
            CoreError::LengthMismatch => write!(f, "triplet sequences differ in length"),
            CoreError::UnresolvedId(id) => write!(f, "identifier {id} could not be resolved"),
            CoreError::CoordinateOutOfBounds => write!(f, "coordinate outside matrix shape"),
            CoreError::UnparsableValue => write!(f, "unparsable option value"),
        }
    }
}

impl core::error::Error for CoreError {}

/// Result type for core operations
pub type Result<T> = core::result::Result<T, CoreError>;
