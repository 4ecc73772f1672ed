//! Uniform random input data for the summation benchmarks.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::data::{Grid, Sequence, ValueRange};
use crate::error::{Error, Result};

pub const DEFAULT_ARRAY_LEN: usize = 100_001;
pub const DEFAULT_ARRAY_RANGE: (i64, i64) = (1, 100);
pub const DEFAULT_ARRAY_PATH: &str = "array.txt";

pub const DEFAULT_GRID_ROWS: usize = 350;
pub const DEFAULT_GRID_COLS: usize = 350;
pub const DEFAULT_GRID_RANGE: (i64, i64) = (1, 1000);
pub const DEFAULT_GRID_PATH: &str = "matrix.txt";

/// `len` values drawn independently and uniformly from `range`.
pub fn generate_sequence<R: Rng + ?Sized>(len: usize, range: ValueRange, rng: &mut R) -> Sequence {
    let dist = Uniform::new_inclusive(range.lo(), range.hi());
    let seq: Sequence = dist.sample_iter(rng).take(len).collect();
    debug!(len, lo = range.lo(), hi = range.hi(), "generated sequence");
    seq
}

/// `rows` x `cols` values drawn independently and uniformly from `range`.
pub fn generate_grid<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    range: ValueRange,
    rng: &mut R,
) -> Result<Grid> {
    let dist = Uniform::new_inclusive(range.lo(), range.hi());
    let len = rows
        .checked_mul(cols)
        .ok_or_else(|| Error::InvalidConfig(format!("grid {rows}x{cols} is too large")))?;
    let cells: Vec<i64> = (0..len).map(|_| dist.sample(rng)).collect();
    debug!(rows, cols, lo = range.lo(), hi = range.hi(), "generated grid");
    Grid::from_parts(rows, cols, cells)
}

/// Randomness source for the generator binaries: seeded when asked, OS entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    }
}

/// Summary of one generator run, printed by the binaries.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub path: String,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub elements: usize,
    pub range: ValueRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_sequence_length_and_range() {
        let range = ValueRange::new(1, 100).unwrap();
        for len in [0, 1, 7, 10_000] {
            let seq = generate_sequence(len, range, &mut seeded());
            assert_eq!(seq.len(), len);
            assert!(seq.iter().all(|&v| range.contains(v)));
        }
    }

    #[test]
    fn test_single_value_range() {
        let range = ValueRange::new(-3, -3).unwrap();
        let seq = generate_sequence(50, range, &mut seeded());
        assert!(seq.iter().all(|&v| v == -3));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let range = ValueRange::new(0, 1).unwrap();
        let seq = generate_sequence(2_000, range, &mut seeded());
        assert!(seq.iter().any(|&v| v == 0));
        assert!(seq.iter().any(|&v| v == 1));
    }

    #[test]
    fn test_seed_reproduces() {
        let range = ValueRange::new(1, 1000).unwrap();
        let a = generate_sequence(100, range, &mut make_rng(Some(7)));
        let b = generate_sequence(100, range, &mut make_rng(Some(7)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_grid_shape_and_range() {
        let range = ValueRange::new(1, 1000).unwrap();
        let grid = generate_grid(4, 3, range, &mut seeded()).unwrap();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 3);
        assert!(grid.iter_rows().all(|row| row.len() == 3));
        assert!(grid
            .iter_rows()
            .flatten()
            .all(|&v| range.contains(v)));
    }
}
