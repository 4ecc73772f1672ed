//! Element-wise add, subtract, multiply and divide over two equally shaped inputs.
//!
//! Division by zero yields NaN instead of failing. Sums, differences and
//! products are exact (`i128`).

use std::hint::black_box;

use rayon::prelude::*;
use tracing::info;

use crate::data::{Grid, Sequence};
use crate::error::{Error, Result};
use crate::reducer::{build_pool, time_trials, BenchConfig, BenchmarkReport, KernelInfo};

/// The four result vectors, index-aligned with the inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementwiseOutput {
    pub add: Vec<i128>,
    pub sub: Vec<i128>,
    pub mul: Vec<i128>,
    pub div: Vec<f64>,
}

impl ElementwiseOutput {
    fn zeroed(len: usize) -> Self {
        Self {
            add: vec![0; len],
            sub: vec![0; len],
            mul: vec![0; len],
            div: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.add.len()
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty()
    }

    /// Fingerprint of every result, used to check that trials agree.
    pub fn checksum(&self) -> i128 {
        let exact = self
            .add
            .iter()
            .chain(&self.sub)
            .chain(&self.mul)
            .fold(0i128, |acc, &v| acc.wrapping_add(v));
        self.div
            .iter()
            .fold(exact, |acc, d| acc.wrapping_add(i128::from(d.to_bits())))
    }
}

fn apply_one(a: i64, b: i64) -> (i128, i128, i128, f64) {
    let (wa, wb) = (i128::from(a), i128::from(b));
    let div = if b != 0 { a as f64 / b as f64 } else { f64::NAN };
    (wa + wb, wa - wb, wa * wb, div)
}

/// Computes all four operations for two slices of equal length.
pub trait ElementwiseKernel {
    fn name(&self) -> &str;

    fn threads(&self) -> usize {
        1
    }

    fn is_parallel(&self) -> bool {
        false
    }

    /// `left` and `right` have the same length.
    fn apply(&self, left: &[i64], right: &[i64]) -> ElementwiseOutput;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialOps;

impl ElementwiseKernel for SequentialOps {
    fn name(&self) -> &str {
        "sequential"
    }

    fn apply(&self, left: &[i64], right: &[i64]) -> ElementwiseOutput {
        let mut out = ElementwiseOutput::zeroed(left.len());
        for (i, (&a, &b)) in left.iter().zip(right).enumerate() {
            let (add, sub, mul, div) = apply_one(a, b);
            out.add[i] = add;
            out.sub[i] = sub;
            out.mul[i] = mul;
            out.div[i] = div;
        }
        out
    }
}

/// Same loop split over a dedicated rayon pool.
pub struct ParallelOps {
    pool: rayon::ThreadPool,
    threads: usize,
}

impl ParallelOps {
    pub fn new(threads: usize, pin_threads: bool) -> Result<Self> {
        let pool = build_pool(threads, pin_threads)?;
        Ok(Self { pool, threads })
    }
}

impl ElementwiseKernel for ParallelOps {
    fn name(&self) -> &str {
        "parallel"
    }

    fn threads(&self) -> usize {
        self.threads
    }

    fn is_parallel(&self) -> bool {
        true
    }

    fn apply(&self, left: &[i64], right: &[i64]) -> ElementwiseOutput {
        let mut out = ElementwiseOutput::zeroed(left.len());
        self.pool.install(|| {
            out.add
                .par_iter_mut()
                .zip(out.sub.par_iter_mut())
                .zip(out.mul.par_iter_mut())
                .zip(out.div.par_iter_mut())
                .zip(left.par_iter().zip(right.par_iter()))
                .for_each(|((((add, sub), mul), div), (&a, &b))| {
                    (*add, *sub, *mul, *div) = apply_one(a, b);
                });
        });
        out
    }
}

pub fn check_lengths(left: &Sequence, right: &Sequence) -> Result<()> {
    if left.len() != right.len() {
        return Err(Error::ShapeMismatch {
            left: format!("{} elements", left.len()),
            right: format!("{} elements", right.len()),
        });
    }
    Ok(())
}

pub fn check_shapes(left: &Grid, right: &Grid) -> Result<()> {
    if (left.rows(), left.cols()) != (right.rows(), right.cols()) {
        return Err(Error::ShapeMismatch {
            left: format!("{}x{}", left.rows(), left.cols()),
            right: format!("{}x{}", right.rows(), right.cols()),
        });
    }
    Ok(())
}

/// Time `kernel` over the same pair of operands `config.trials` times.
///
/// The report's `total` is the [`ElementwiseOutput::checksum`] of the results.
pub fn run_elementwise_benchmark<K: ElementwiseKernel + ?Sized>(
    kernel: &K,
    left: &[i64],
    right: &[i64],
    config: &BenchConfig,
) -> Result<(BenchmarkReport, ElementwiseOutput)> {
    if left.len() != right.len() {
        return Err(Error::ShapeMismatch {
            left: format!("{} elements", left.len()),
            right: format!("{} elements", right.len()),
        });
    }

    let timed = time_trials(
        kernel.name(),
        config,
        || kernel.apply(black_box(left), black_box(right)),
        ElementwiseOutput::checksum,
    )?;
    info!(
        kernel = kernel.name(),
        elements = left.len(),
        average_seconds = timed.average_seconds,
        "elementwise benchmark finished"
    );

    let info = KernelInfo {
        operation: "elementwise",
        name: kernel.name(),
        threads: kernel.threads(),
        parallel: kernel.is_parallel(),
    };
    Ok(timed.into_report(info, left.len(), config))
}

/// Table of the first `count` results, NaN quotients printed as `NaN`.
pub fn preview(output: &ElementwiseOutput, count: usize) -> String {
    let mut lines = vec![
        format!(
            "{:>6} | {:>12} | {:>12} | {:>14} | {:>10}",
            "Index", "Add", "Sub", "Mul", "Div"
        ),
        format!(
            "{:-<7}+{:-<14}+{:-<14}+{:-<16}+{:-<11}",
            "", "", "", "", ""
        ),
    ];
    for i in 0..count.min(output.len()) {
        let div = output.div[i];
        let div = if div.is_nan() {
            "NaN".to_string()
        } else {
            format!("{div:.2}")
        };
        lines.push(format!(
            "{:>6} | {:>12} | {:>12} | {:>14} | {:>10}",
            i + 1,
            output.add[i],
            output.sub[i],
            output.mul[i],
            div
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ops() {
        let out = SequentialOps.apply(&[6, -4, 7], &[3, 2, 0]);
        assert_eq!(out.add, vec![9, -2, 7]);
        assert_eq!(out.sub, vec![3, -6, 7]);
        assert_eq!(out.mul, vec![18, -8, 0]);
        assert_eq!(out.div[0], 2.0);
        assert_eq!(out.div[1], -2.0);
        assert!(out.div[2].is_nan());
    }

    #[test]
    fn test_products_do_not_overflow() {
        let out = SequentialOps.apply(&[i64::MAX], &[i64::MAX]);
        assert_eq!(out.mul[0], i128::from(i64::MAX) * i128::from(i64::MAX));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let left: Vec<i64> = (0..50_000).map(|i| (i * 31) % 1000 - 500).collect();
        let right: Vec<i64> = (0..50_000).map(|i| (i * 17) % 7 - 3).collect();
        let seq = SequentialOps.apply(&left, &right);
        let par = ParallelOps::new(3, false).unwrap().apply(&left, &right);
        assert_eq!(seq.add, par.add);
        assert_eq!(seq.sub, par.sub);
        assert_eq!(seq.mul, par.mul);
        assert_eq!(seq.checksum(), par.checksum());
    }

    #[test]
    fn test_benchmark_reports_checksum() {
        let left = [1, 2, 3, 4];
        let right = [4, 3, 2, 0];
        let (report, out) =
            run_elementwise_benchmark(&SequentialOps, &left, &right, &BenchConfig::default())
                .unwrap();
        assert_eq!(report.operation, "elementwise");
        assert_eq!(report.elements, 4);
        assert_eq!(report.trials.len(), 5);
        assert_eq!(report.total, out.checksum());
        assert!(!report.parallel);
    }

    #[test]
    fn test_benchmark_rejects_length_mismatch() {
        let err = run_elementwise_benchmark(&SequentialOps, &[1, 2], &[1], &BenchConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_empty_operands() {
        let (report, out) =
            run_elementwise_benchmark(&SequentialOps, &[], &[], &BenchConfig::default()).unwrap();
        assert!(out.is_empty());
        assert_eq!(report.total, 0);
        assert!(report.average_seconds.is_finite());
    }

    #[test]
    fn test_shape_checks() {
        let a = Grid::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let b = Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert!(check_shapes(&a, &a).is_ok());
        assert!(matches!(
            check_shapes(&a, &b),
            Err(Error::ShapeMismatch { .. })
        ));

        let short = Sequence::from(vec![1]);
        let long = Sequence::from(vec![1, 2]);
        assert!(check_lengths(&short, &long).is_err());
    }

    #[test]
    fn test_preview_table() {
        let out = SequentialOps.apply(&[10, 5], &[4, 0]);
        let text = preview(&out, 5);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("14") && lines[2].contains("2.50"));
        assert!(lines[3].trim_end().ends_with("NaN"));
    }
}
