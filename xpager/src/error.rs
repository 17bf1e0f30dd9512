//! Error types for page iteration

use thiserror::Error;
use xpager_core::{CoreError, ErrorCategory, ReadError};

#[derive(Error, Debug)]
pub enum PagerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(CoreError),

    #[error("{}", upstream_message(.chunk))]
    UpstreamRead {
        chunk: Option<usize>,
        #[source]
        source: ReadError,
    },

    #[error("consistency violation: {0}")]
    Core(CoreError),

    #[error("consistency violation: {0}")]
    Consistency(String),

    #[error("prefetch worker exited without producing a result")]
    WorkerLost,

    #[cfg(feature = "serde")]
    #[error("invalid options document: {0}")]
    Options(#[from] serde_json::Error),
}

fn upstream_message(chunk: &Option<usize>) -> String {
    match chunk {
        Some(index) => format!("read failed for page {index}"),
        None => "read failed during query setup".to_string(),
    }
}

impl PagerError {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            PagerError::InvalidArgument(_) => ErrorCategory::InvalidArgument,
            #[cfg(feature = "serde")]
            PagerError::Options(_) => ErrorCategory::InvalidArgument,
            PagerError::UpstreamRead { .. } => ErrorCategory::UpstreamReadFailure,
            PagerError::Core(_) | PagerError::Consistency(_) | PagerError::WorkerLost => {
                ErrorCategory::ConsistencyViolation
            }
        }
    }

    pub(crate) fn upstream(chunk: Option<usize>, source: ReadError) -> Self {
        PagerError::UpstreamRead { chunk, source }
    }
}

impl From<CoreError> for PagerError {
    fn from(err: CoreError) -> Self {
        match err.category() {
            ErrorCategory::InvalidArgument => PagerError::InvalidArgument(err),
            _ => PagerError::Core(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, PagerError>;
