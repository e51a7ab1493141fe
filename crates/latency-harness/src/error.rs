use std::path::PathBuf;

use crypto_provider::{AlgorithmId, Operation, ProviderError};
use thiserror::Error;

/// Errors from the robust aggregator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Invalid trim parameters: {0}")]
    InvalidParameters(String),

    #[error("Sample {index} is not a finite, non-negative latency")]
    InvalidSample { index: usize },

    #[error("No samples remain after trimming {runs} runs")]
    EmptyWindow { runs: usize },

    #[error("Every central-window sample lies outside the fence [{lower}, {upper}]")]
    EmptyAggregate { lower: f64, upper: f64 },
}

/// Errors from a benchmark run.
///
/// `ProviderInit` and `OperationFailure` abort the whole run. `EmptyAggregate`
/// only ends the algorithm it occurred in.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Failed to initialise provider for {algorithm}: {source}")]
    ProviderInit {
        algorithm: AlgorithmId,
        #[source]
        source: ProviderError,
    },

    #[error("{algorithm} {operation} failed on run {run}: {source}")]
    OperationFailure {
        algorithm: AlgorithmId,
        operation: Operation,
        run: usize,
        #[source]
        source: ProviderError,
    },

    #[error("{algorithm} {operation}: no valid runs inside the fence [{lower}, {upper}]")]
    EmptyAggregate {
        algorithm: AlgorithmId,
        operation: Operation,
        lower: f64,
        upper: f64,
    },

    #[error("{algorithm} {operation}: {source}")]
    Stats {
        algorithm: AlgorithmId,
        operation: Operation,
        #[source]
        source: StatsError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BenchError {
    /// Attach the algorithm and operation to an aggregation failure.
    pub fn from_stats(algorithm: AlgorithmId, operation: Operation, source: StatsError) -> Self {
        match source {
            StatsError::EmptyAggregate { lower, upper } => BenchError::EmptyAggregate {
                algorithm,
                operation,
                lower,
                upper,
            },
            source => BenchError::Stats {
                algorithm,
                operation,
                source,
            },
        }
    }

    /// Whether the run can continue with the next algorithm.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BenchError::EmptyAggregate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_aggregate_is_recoverable() {
        let err = BenchError::from_stats(
            AlgorithmId::Kyber512,
            Operation::Encapsulate,
            StatsError::EmptyAggregate {
                lower: 1.0,
                upper: 2.0,
            },
        );
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "kyber512 encapsulation: no valid runs inside the fence [1, 2]"
        );
    }

    #[test]
    fn test_other_stats_errors_abort() {
        let err = BenchError::from_stats(
            AlgorithmId::Dilithium2,
            Operation::Keygen,
            StatsError::EmptyWindow { runs: 0 },
        );
        assert!(!err.is_recoverable());
        assert!(matches!(err, BenchError::Stats { .. }));
    }

    #[test]
    fn test_operation_failure_message() {
        let err = BenchError::OperationFailure {
            algorithm: AlgorithmId::Falcon512,
            operation: Operation::Verify,
            run: 7,
            source: ProviderError::failed(
                AlgorithmId::Falcon512,
                Operation::Verify,
                "signature rejected",
            ),
        };
        assert!(!err.is_recoverable());
        assert!(err.to_string().starts_with("falcon512 verifying failed on run 7"));
    }
}
