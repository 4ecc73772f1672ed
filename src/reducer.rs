//! Summation kernels and the repeated-trial timing harness.
//!
//! A kernel is anything implementing [`SumKernel`]. The benchmark runs the
//! same kernel over the same in-memory [`Sequence`] several times and reports
//! the mean wall-clock time of one pass.

use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::data::Sequence;
use crate::error::{Error, Result};

pub const DEFAULT_TRIALS: usize = 5;

/// A routine that reduces a slice of integers to its exact total.
pub trait SumKernel {
    fn name(&self) -> &str;

    /// Worker threads the kernel uses.
    fn threads(&self) -> usize {
        1
    }

    /// Whether the kernel splits work across a thread pool.
    fn is_parallel(&self) -> bool {
        false
    }

    fn sum(&self, values: &[i64]) -> i128;
}

/// Left-to-right accumulation starting from 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSum;

impl SumKernel for SequentialSum {
    fn name(&self) -> &str {
        "sequential"
    }

    fn sum(&self, values: &[i64]) -> i128 {
        let mut total: i128 = 0;
        for &v in values {
            total += i128::from(v);
        }
        total
    }
}

/// Shorthand for `SequentialSum.sum(values)`.
pub fn reduce(values: &[i64]) -> i128 {
    SequentialSum.sum(values)
}

/// Reduction over a dedicated rayon pool, optionally pinned one worker per core.
pub struct ParallelSum {
    pool: rayon::ThreadPool,
    threads: usize,
}

impl ParallelSum {
    pub fn new(threads: usize, pin_threads: bool) -> Result<Self> {
        let pool = build_pool(threads, pin_threads)?;
        Ok(Self { pool, threads })
    }
}

/// Dedicated pool of `threads` workers, optionally pinned one per core.
pub fn build_pool(threads: usize, pin_threads: bool) -> Result<rayon::ThreadPool> {
    if threads == 0 {
        return Err(Error::InvalidConfig("thread count must be positive".into()));
    }

    let next_worker = Arc::new(AtomicUsize::new(0));
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .start_handler(move |_| {
            if pin_threads {
                pin_current_thread(&next_worker);
            }
        })
        .build()?;

    info!(threads, pin_threads, "built thread pool");
    Ok(pool)
}

// Worker i goes to core i; surplus workers stay unpinned.
fn pin_current_thread(next_worker: &AtomicUsize) {
    let worker = next_worker.fetch_add(1, Ordering::SeqCst);
    match core_affinity::get_core_ids() {
        Some(core_ids) if worker < core_ids.len() => {
            if !core_affinity::set_for_current(core_ids[worker]) {
                warn!(worker, "failed to pin worker thread");
            }
        }
        Some(_) => debug!(worker, "more workers than cores, leaving unpinned"),
        None => warn!("core ids unavailable, thread pinning disabled"),
    }
}

impl SumKernel for ParallelSum {
    fn name(&self) -> &str {
        "parallel"
    }

    fn threads(&self) -> usize {
        self.threads
    }

    fn is_parallel(&self) -> bool {
        true
    }

    fn sum(&self, values: &[i64]) -> i128 {
        self.pool
            .install(|| values.par_iter().map(|&v| i128::from(v)).sum::<i128>())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    /// Timed passes averaged into the report.
    pub trials: usize,
    /// Untimed passes run first. They never count towards the average.
    pub warmup: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            // No warm-up: the first, cold pass is part of the average, the way
            // the lab programs measured it. Raise it to time a warm cache only.
            warmup: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    /// What was timed: `"sum"` or `"elementwise"`.
    pub operation: String,
    pub kernel: String,
    pub threads: usize,
    pub parallel: bool,
    pub elements: usize,
    /// `[rows, cols]` when the input was a grid.
    pub shape: Option<[usize; 2]>,
    pub warmup: usize,
    /// Sum for reductions, fingerprint of the results otherwise.
    pub total: i128,
    /// Seconds per timed trial, in execution order.
    pub trials: Vec<f64>,
    pub average_seconds: f64,
}

/// Kernel-independent facts attached to a report.
#[derive(Debug, Clone, Copy)]
pub struct KernelInfo<'a> {
    pub operation: &'a str,
    pub name: &'a str,
    pub threads: usize,
    pub parallel: bool,
}

/// First timed result of [`time_trials`] and the duration of every trial.
#[derive(Debug)]
pub struct Timed<R> {
    pub output: R,
    pub digest: i128,
    pub trials: Vec<f64>,
    pub average_seconds: f64,
}

impl<R> Timed<R> {
    pub fn into_report(
        self,
        info: KernelInfo<'_>,
        elements: usize,
        config: &BenchConfig,
    ) -> (BenchmarkReport, R) {
        let report = BenchmarkReport {
            operation: info.operation.to_string(),
            kernel: info.name.to_string(),
            threads: info.threads,
            parallel: info.parallel,
            elements,
            shape: None,
            warmup: config.warmup,
            total: self.digest,
            trials: self.trials,
            average_seconds: self.average_seconds,
        };
        (report, self.output)
    }
}

/// Run `pass` `config.warmup` times untimed, then `config.trials` times timed.
///
/// `digest` condenses each result; every trial must produce the digest of the
/// first one, otherwise the pass is not deterministic and an error is returned.
pub fn time_trials<R, F, D>(
    kernel: &str,
    config: &BenchConfig,
    mut pass: F,
    digest: D,
) -> Result<Timed<R>>
where
    F: FnMut() -> R,
    D: Fn(&R) -> i128,
{
    if config.trials == 0 {
        return Err(Error::InvalidConfig("at least one trial is required".into()));
    }

    for _ in 0..config.warmup {
        black_box(pass());
    }

    let mut durations = Vec::with_capacity(config.trials);
    let mut first: Option<(R, i128)> = None;

    for trial in 0..config.trials {
        let start = Instant::now();
        let output = black_box(pass());
        let elapsed = start.elapsed().as_secs_f64();
        debug!(kernel, trial, elapsed, "trial finished");

        let value = digest(&output);
        match first.as_ref().map(|(_, d)| *d) {
            None => first = Some((output, value)),
            Some(expected) if expected != value => {
                return Err(Error::NonDeterministic {
                    kernel: kernel.to_string(),
                    trial,
                    expected,
                    actual: value,
                })
            }
            Some(_) => {}
        }
        durations.push(elapsed);
    }

    let (output, first_digest) = first
        .ok_or_else(|| Error::InvalidConfig("at least one trial is required".into()))?;
    let average_seconds = durations.iter().sum::<f64>() / durations.len() as f64;
    Ok(Timed {
        output,
        digest: first_digest,
        trials: durations,
        average_seconds,
    })
}

/// Time `kernel` over `sequence` `config.trials` times and average the durations.
///
/// The sequence is shared by every trial and never reloaded. All trials must
/// agree on the total.
pub fn run_benchmark<K: SumKernel + ?Sized>(
    kernel: &K,
    sequence: &Sequence,
    config: &BenchConfig,
) -> Result<BenchmarkReport> {
    let values = sequence.as_slice();
    let timed = time_trials(
        kernel.name(),
        config,
        || kernel.sum(black_box(values)),
        |total| *total,
    )?;

    info!(
        kernel = kernel.name(),
        elements = values.len(),
        total = %timed.digest,
        average_seconds = timed.average_seconds,
        "benchmark finished"
    );

    let info = KernelInfo {
        operation: "sum",
        name: kernel.name(),
        threads: kernel.threads(),
        parallel: kernel.is_parallel(),
    };
    let (report, _) = timed.into_report(info, values.len(), config);
    Ok(report)
}

/// Check `report.total` against a fresh sequential reduction of `sequence`.
pub fn verify_against_sequential(report: &BenchmarkReport, sequence: &Sequence) -> Result<()> {
    let sequential = reduce(sequence.as_slice());
    if sequential != report.total {
        return Err(Error::Mismatch {
            kernel: report.kernel.clone(),
            sequential,
            actual: report.total,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Counts calls and returns a fixed total.
    struct StubKernel {
        calls: Cell<usize>,
        total: i128,
    }

    impl SumKernel for StubKernel {
        fn name(&self) -> &str {
            "stub"
        }

        fn sum(&self, _values: &[i64]) -> i128 {
            self.calls.set(self.calls.get() + 1);
            self.total
        }
    }

    /// Returns a different total on every call.
    struct DriftingKernel {
        calls: Cell<i128>,
    }

    impl SumKernel for DriftingKernel {
        fn name(&self) -> &str {
            "drifting"
        }

        fn sum(&self, _values: &[i64]) -> i128 {
            let n = self.calls.get();
            self.calls.set(n + 1);
            n
        }
    }

    #[test]
    fn test_reduce_known_values() {
        assert_eq!(reduce(&[1, 2, 3, 4, 5]), 15);
        assert_eq!(reduce(&[-5, 5, -1]), -1);
        assert_eq!(reduce(&[]), 0);
    }

    #[test]
    fn test_reduce_does_not_overflow() {
        let values = vec![i64::MAX; 4];
        assert_eq!(reduce(&values), 4 * i128::from(i64::MAX));
        let values = vec![i64::MIN; 3];
        assert_eq!(reduce(&values), 3 * i128::from(i64::MIN));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let values: Vec<i64> = (0..100_000).map(|i| (i * 7919) % 1000 - 500).collect();
        let kernel = ParallelSum::new(4, false).unwrap();
        assert_eq!(kernel.threads(), 4);
        assert_eq!(kernel.sum(&values), reduce(&values));
        assert_eq!(kernel.sum(&[]), 0);
    }

    #[test]
    fn test_parallel_rejects_zero_threads() {
        assert!(matches!(
            ParallelSum::new(0, false),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_benchmark_runs_requested_trials() {
        let seq = Sequence::from(vec![1, 2, 3, 4, 5]);
        let report = run_benchmark(&SequentialSum, &seq, &BenchConfig::default()).unwrap();
        assert_eq!(report.total, 15);
        assert_eq!(report.trials.len(), DEFAULT_TRIALS);
        assert_eq!(report.elements, 5);
        assert_eq!(report.kernel, "sequential");
        let mean = report.trials.iter().sum::<f64>() / report.trials.len() as f64;
        assert!((report.average_seconds - mean).abs() < 1e-12);
    }

    #[test]
    fn test_benchmark_empty_sequence() {
        let report =
            run_benchmark(&SequentialSum, &Sequence::default(), &BenchConfig::default()).unwrap();
        assert_eq!(report.total, 0);
        assert!(report.average_seconds.is_finite());
        assert!(report.average_seconds >= 0.0);
    }

    #[test]
    fn test_warmup_is_not_timed() {
        let stub = StubKernel {
            calls: Cell::new(0),
            total: 42,
        };
        let config = BenchConfig {
            trials: 5,
            warmup: 2,
        };
        let report = run_benchmark(&stub, &Sequence::from(vec![1]), &config).unwrap();
        assert_eq!(stub.calls.get(), 7);
        assert_eq!(report.trials.len(), 5);
        assert_eq!(report.warmup, 2);
        assert_eq!(report.total, 42);
    }

    #[test]
    fn test_injected_kernel_total_is_reported() {
        let stub = StubKernel {
            calls: Cell::new(0),
            total: -9,
        };
        let report = run_benchmark(&stub, &Sequence::default(), &BenchConfig::default()).unwrap();
        assert_eq!(report.total, -9);
        assert_eq!(report.kernel, "stub");
        assert_eq!(report.threads, 1);
    }

    #[test]
    fn test_divergent_trials_are_rejected() {
        let kernel = DriftingKernel {
            calls: Cell::new(0),
        };
        let err = run_benchmark(&kernel, &Sequence::default(), &BenchConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::NonDeterministic {
                trial: 1,
                expected: 0,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_trials_rejected() {
        let config = BenchConfig {
            trials: 0,
            warmup: 0,
        };
        let err = run_benchmark(&SequentialSum, &Sequence::default(), &config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_single_thread_parallel_kernel_is_flagged_parallel() {
        let kernel = ParallelSum::new(1, false).unwrap();
        let seq = Sequence::from(vec![1, 2, 3]);
        let report = run_benchmark(&kernel, &seq, &BenchConfig::default()).unwrap();
        assert!(report.parallel);
        assert_eq!(report.threads, 1);
        assert_eq!(report.operation, "sum");

        let report = run_benchmark(&SequentialSum, &seq, &BenchConfig::default()).unwrap();
        assert!(!report.parallel);
    }

    #[test]
    fn test_time_trials_keeps_first_output() {
        let mut calls = 0;
        let config = BenchConfig {
            trials: 3,
            warmup: 1,
        };
        let timed = time_trials(
            "vec",
            &config,
            || {
                calls += 1;
                vec![1, 2, 3]
            },
            |v| v.iter().map(|&x| i128::from(x)).sum(),
        )
        .unwrap();
        assert_eq!(calls, 4);
        assert_eq!(timed.output, vec![1, 2, 3]);
        assert_eq!(timed.digest, 6);
        assert_eq!(timed.trials.len(), 3);
    }

    #[test]
    fn test_verify_against_sequential() {
        let seq = Sequence::from(vec![10, 20, 30]);
        let good = StubKernel {
            calls: Cell::new(0),
            total: 60,
        };
        let report = run_benchmark(&good, &seq, &BenchConfig::default()).unwrap();
        assert!(verify_against_sequential(&report, &seq).is_ok());

        let bad = StubKernel {
            calls: Cell::new(0),
            total: 61,
        };
        let report = run_benchmark(&bad, &seq, &BenchConfig::default()).unwrap();
        assert!(matches!(
            verify_against_sequential(&report, &seq),
            Err(Error::Mismatch {
                sequential: 60,
                actual: 61,
                ..
            })
        ));
    }
}
