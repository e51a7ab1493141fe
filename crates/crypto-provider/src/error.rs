use thiserror::Error;

use crate::algorithm::{AlgorithmId, Operation};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Unknown algorithm identifier: {0}")]
    UnknownAlgorithm(String),

    #[error("Algorithm {0} is not available in this build")]
    Unavailable(AlgorithmId),

    #[error("{algorithm} does not support {operation}")]
    Unsupported {
        algorithm: AlgorithmId,
        operation: Operation,
    },

    #[error("Key handle was not produced by {0}")]
    KeyMismatch(AlgorithmId),

    #[error("Malformed {what} for {algorithm}")]
    Malformed {
        algorithm: AlgorithmId,
        what: &'static str,
    },

    #[error("{operation} failed for {algorithm}: {reason}")]
    Operation {
        algorithm: AlgorithmId,
        operation: Operation,
        reason: String,
    },
}

impl ProviderError {
    /// Shorthand for [`ProviderError::Operation`].
    pub fn failed(
        algorithm: AlgorithmId,
        operation: Operation,
        reason: impl ToString,
    ) -> Self {
        ProviderError::Operation {
            algorithm,
            operation,
            reason: reason.to_string(),
        }
    }
}
