//! Sequential latency sampling
//!
//! A [`Sampler`] invokes a timed provider operation a fixed number of times,
//! one call after another, and converts each measured duration into a sample.
//! The first failing call aborts the experiment; nothing is retried.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

use crypto_provider::{AlgorithmId, Operation, ProviderError, Timed};

use crate::error::BenchError;

/// CPU frequency assumed when converting elapsed time to cycles.
pub const DEFAULT_CPU_FREQUENCY_HZ: f64 = 2.4e9;

/// How a measured duration becomes a sample value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimingMode {
    /// Wall-clock microseconds
    #[default]
    Wall,
    /// Estimated CPU cycles at a fixed clock rate
    Cycles {
        #[serde(default = "default_cpu_frequency_hz")]
        cpu_frequency_hz: f64,
    },
}

fn default_cpu_frequency_hz() -> f64 {
    DEFAULT_CPU_FREQUENCY_HZ
}

impl TimingMode {
    pub fn to_sample(&self, elapsed: Duration) -> f64 {
        let nanos = elapsed.as_nanos() as f64;
        match self {
            TimingMode::Wall => nanos / 1_000.0,
            TimingMode::Cycles { cpu_frequency_hz } => (nanos * cpu_frequency_hz / 1e9).floor(),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            TimingMode::Wall => "µs",
            TimingMode::Cycles { .. } => "cycles",
        }
    }

    /// Y axis label for plots.
    pub fn axis_label(&self) -> &'static str {
        match self {
            TimingMode::Wall => "Time (microseconds)",
            TimingMode::Cycles { .. } => "CPU cycles",
        }
    }
}

/// A failed call inside a sampling closure.
#[derive(Debug)]
pub struct SampleFailure {
    pub operation: Operation,
    pub source: ProviderError,
}

impl SampleFailure {
    pub fn new(operation: Operation, source: ProviderError) -> Self {
        Self { operation, source }
    }
}

/// Sample buffer of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSamples {
    pub operation: Operation,
    pub values: Vec<f64>,
}

/// Collects the timings of one run of an interleaved workflow.
pub struct RunRecorder<'a> {
    timing: TimingMode,
    buffers: &'a mut [OperationSamples],
}

impl RunRecorder<'_> {
    /// Unwrap a timed provider result, recording its duration when
    /// `operation` is one of the sampled operations.
    pub fn record<T>(
        &mut self,
        operation: Operation,
        result: Result<Timed<T>, ProviderError>,
    ) -> Result<T, SampleFailure> {
        let timed = result.map_err(|source| SampleFailure::new(operation, source))?;
        if let Some(buffer) = self.buffers.iter_mut().find(|b| b.operation == operation) {
            buffer.values.push(self.timing.to_sample(timed.elapsed));
        }
        Ok(timed.value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    algorithm: AlgorithmId,
    timing: TimingMode,
}

impl Sampler {
    pub fn new(algorithm: AlgorithmId, timing: TimingMode) -> Self {
        Self { algorithm, timing }
    }

    pub fn timing(&self) -> TimingMode {
        self.timing
    }

    /// Invoke `op` exactly `runs` times and return one sample per call.
    ///
    /// `op` receives the 0-based run index. Its output is dropped as soon as
    /// the duration has been recorded.
    pub fn sample<T, F>(
        &self,
        operation: Operation,
        runs: usize,
        mut op: F,
    ) -> Result<Vec<f64>, BenchError>
    where
        F: FnMut(usize) -> Result<Timed<T>, ProviderError>,
    {
        debug!(algorithm = %self.algorithm, %operation, runs, "Sampling");
        let mut values = Vec::with_capacity(runs);

        for run in 0..runs {
            let timed = op(run).map_err(|source| BenchError::OperationFailure {
                algorithm: self.algorithm,
                operation,
                run,
                source,
            })?;
            let value = self.timing.to_sample(timed.elapsed);
            trace!(run, value, "Sample");
            values.push(value);
        }

        Ok(values)
    }

    /// Run a multi-operation workflow `runs` times.
    ///
    /// Each run calls `run_once` with a [`RunRecorder`]; every
    /// [`RunRecorder::record`] call for an operation listed in `operations`
    /// adds a sample to that operation's buffer. Buffers are returned in the
    /// order of `operations`.
    pub fn sample_interleaved<F>(
        &self,
        runs: usize,
        operations: &[Operation],
        mut run_once: F,
    ) -> Result<Vec<OperationSamples>, BenchError>
    where
        F: FnMut(usize, &mut RunRecorder<'_>) -> Result<(), SampleFailure>,
    {
        debug!(algorithm = %self.algorithm, ?operations, runs, "Sampling interleaved");
        let mut buffers: Vec<OperationSamples> = operations
            .iter()
            .map(|&operation| OperationSamples {
                operation,
                values: Vec::with_capacity(runs),
            })
            .collect();

        for run in 0..runs {
            let mut recorder = RunRecorder {
                timing: self.timing,
                buffers: &mut buffers,
            };
            run_once(run, &mut recorder).map_err(|failure| BenchError::OperationFailure {
                algorithm: self.algorithm,
                operation: failure.operation,
                run,
                source: failure.source,
            })?;
        }

        Ok(buffers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed<T>(value: T, micros: u64) -> Result<Timed<T>, ProviderError> {
        Ok(Timed {
            value,
            elapsed: Duration::from_micros(micros),
        })
    }

    #[test]
    fn test_wall_microseconds() {
        let mode = TimingMode::Wall;
        assert_eq!(mode.to_sample(Duration::from_nanos(1_500)), 1.5);
        assert_eq!(mode.to_sample(Duration::from_millis(2)), 2_000.0);
    }

    #[test]
    fn test_cycles_truncate() {
        let mode = TimingMode::Cycles {
            cpu_frequency_hz: DEFAULT_CPU_FREQUENCY_HZ,
        };
        assert_eq!(mode.to_sample(Duration::from_nanos(1_000)), 2_400.0);
        assert_eq!(mode.to_sample(Duration::from_nanos(1)), 2.0);
    }

    #[test]
    fn test_timing_mode_toml_shape() {
        let wall: TimingMode = serde_json::from_str(r#"{"mode":"wall"}"#).unwrap();
        assert_eq!(wall, TimingMode::Wall);

        let cycles: TimingMode = serde_json::from_str(r#"{"mode":"cycles"}"#).unwrap();
        assert_eq!(
            cycles,
            TimingMode::Cycles {
                cpu_frequency_hz: 2.4e9
            }
        );
    }

    #[test]
    fn test_sample_invokes_exactly_runs_times() {
        let sampler = Sampler::new(AlgorithmId::Kyber512, TimingMode::Wall);
        let mut calls = Vec::new();

        let values = sampler
            .sample(Operation::Keygen, 5, |run| {
                calls.push(run);
                timed((), (run as u64 + 1) * 10)
            })
            .unwrap();

        assert_eq!(calls, vec![0, 1, 2, 3, 4]);
        assert_eq!(values, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn test_sample_aborts_on_first_failure() {
        let sampler = Sampler::new(AlgorithmId::Falcon512, TimingMode::Wall);
        let mut calls = 0;

        let err = sampler
            .sample(Operation::Sign, 10, |run| {
                calls += 1;
                if run == 3 {
                    Err(ProviderError::failed(
                        AlgorithmId::Falcon512,
                        Operation::Sign,
                        "rng failure",
                    ))
                } else {
                    timed((), 1)
                }
            })
            .unwrap_err();

        assert_eq!(calls, 4);
        assert!(matches!(
            err,
            BenchError::OperationFailure {
                operation: Operation::Sign,
                run: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_interleaved_records_only_requested_operations() {
        let sampler = Sampler::new(AlgorithmId::Kyber768, TimingMode::Wall);

        let buffers = sampler
            .sample_interleaved(3, &[Operation::Decapsulate], |run, recorder| {
                let key = recorder.record(Operation::Keygen, timed(run, 100))?;
                let ct = recorder.record(Operation::Encapsulate, timed(key * 2, 200))?;
                recorder.record(Operation::Decapsulate, timed(ct, 300 + run as u64))?;
                Ok(())
            })
            .unwrap();

        assert_eq!(buffers.len(), 1);
        assert_eq!(buffers[0].operation, Operation::Decapsulate);
        assert_eq!(buffers[0].values, vec![300.0, 301.0, 302.0]);
    }

    #[test]
    fn test_interleaved_failure_names_the_operation() {
        let sampler = Sampler::new(AlgorithmId::Dilithium2, TimingMode::Wall);

        let err = sampler
            .sample_interleaved(4, &[Operation::Sign, Operation::Verify], |run, recorder| {
                recorder.record(Operation::Sign, timed((), 5))?;
                if run == 2 {
                    return Err(SampleFailure::new(
                        Operation::Verify,
                        ProviderError::failed(AlgorithmId::Dilithium2, Operation::Verify, "rejected"),
                    ));
                }
                recorder.record(Operation::Verify, timed((), 5))?;
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(
            err,
            BenchError::OperationFailure {
                operation: Operation::Verify,
                run: 2,
                ..
            }
        ));
    }
}
