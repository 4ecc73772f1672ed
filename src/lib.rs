//! Sequential vs parallel array summation benchmarks.
//!
//! Random input sets are generated once and stored as plain text
//! (see [`format`]); the summation binaries load them back and time a
//! [`reducer::SumKernel`] over several identical trials. The same harness
//! times the element-wise kernels of [`elementwise`] over pairs of arrays or
//! matrices.

pub mod cli;
pub mod data;
pub mod elementwise;
pub mod error;
pub mod format;
pub mod generator;
pub mod logging;
pub mod reducer;
pub mod report;

pub use data::{Grid, Sequence, ValueRange};
pub use error::{Error, ErrorKind, Result};
pub use reducer::{reduce, run_benchmark, BenchConfig, BenchmarkReport, SumKernel};
