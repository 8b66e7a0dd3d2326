//! Error types for ndkern

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using ndkern's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ndkern operations
#[derive(Error, Debug)]
pub enum Error {
    /// No kernel specialization exists for this input dtype pair
    #[error("Unsupported dtype combination {lhs:?} x {rhs:?} for operation '{op}'")]
    UnsupportedTypeCombination {
        /// Left-hand side dtype
        lhs: DType,
        /// Right-hand side dtype
        rhs: DType,
        /// The operation name
        op: &'static str,
    },

    /// No kernel specialization exists for this input dtype
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// Device memory allocation failed
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },

    /// A scheduled task failed after submission; surfaced when the caller
    /// inspects or waits on its completion event
    #[error("Asynchronous task failed: {message}")]
    AsyncTaskFailed {
        /// Failure description captured from the task
        message: String,
    },

    /// Backend plumbing error (thread pool construction and similar)
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create an unsupported type combination error
    pub fn unsupported_combination(lhs: DType, rhs: DType, op: &'static str) -> Self {
        Self::UnsupportedTypeCombination { lhs, rhs, op }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }
}
