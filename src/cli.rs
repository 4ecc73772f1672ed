//! Command-line options shared by the benchmark binaries.

use std::path::PathBuf;

use clap::builder::TypedValueParser;
use clap::{Args, ValueEnum};
use tracing::info;

use crate::data::{Sequence, ValueRange};
use crate::elementwise::{ElementwiseKernel, ParallelOps, SequentialOps};
use crate::error::Result;
use crate::format::parse_array;
use crate::generator::{self, DEFAULT_ARRAY_PATH, DEFAULT_ARRAY_RANGE};
use crate::reducer::{BenchConfig, DEFAULT_TRIALS};
use crate::report::OutputFormat;

/// Where the summed array comes from.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Array file to sum
    #[arg(short, long, default_value = DEFAULT_ARRAY_PATH, conflicts_with = "generate")]
    pub input: PathBuf,

    /// Sum N freshly generated values instead of reading a file
    #[arg(short, long, value_name = "N")]
    pub generate: Option<usize>,

    /// Smallest generated value (with --generate)
    #[arg(long, default_value_t = DEFAULT_ARRAY_RANGE.0, allow_negative_numbers = true)]
    pub lo: i64,

    /// Largest generated value (with --generate)
    #[arg(long, default_value_t = DEFAULT_ARRAY_RANGE.1, allow_negative_numbers = true)]
    pub hi: i64,

    /// RNG seed (with --generate)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl InputArgs {
    pub fn load(&self) -> Result<Sequence> {
        match self.generate {
            Some(len) => {
                let range = ValueRange::new(self.lo, self.hi)?;
                let mut rng = generator::make_rng(self.seed);
                info!(len, "generating input in memory");
                Ok(generator::generate_sequence(len, range, &mut rng))
            }
            None => parse_array(&self.input),
        }
    }
}

/// Timing and output options.
#[derive(Args, Debug, Clone)]
pub struct BenchArgs {
    /// Timed trials to average
    #[arg(short, long, default_value_t = DEFAULT_TRIALS, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub trials: usize,

    /// Untimed passes before the timed trials
    #[arg(short, long, default_value_t = 0)]
    pub warmup: usize,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

impl BenchArgs {
    pub fn config(&self) -> BenchConfig {
        BenchConfig {
            trials: self.trials,
            warmup: self.warmup,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum KernelChoice {
    #[default]
    Sequential,
    /// Rayon pool
    Parallel,
}

/// Which element-wise kernel to time.
#[derive(Args, Debug, Clone)]
pub struct KernelArgs {
    #[arg(short, long, value_enum, default_value_t = KernelChoice::Sequential)]
    pub kernel: KernelChoice,

    /// Worker threads for the parallel kernel (defaults to the logical CPUs)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Pin each worker thread to its own core
    #[arg(long)]
    pub pin: bool,
}

impl KernelArgs {
    pub fn build(&self) -> Result<Box<dyn ElementwiseKernel>> {
        Ok(match self.kernel {
            KernelChoice::Sequential => Box::new(SequentialOps),
            KernelChoice::Parallel => {
                Box::new(ParallelOps::new(thread_count(self.threads), self.pin)?)
            }
        })
    }
}

/// `requested`, or the number of logical CPUs.
pub fn thread_count(requested: Option<usize>) -> usize {
    requested.unwrap_or_else(|| std::thread::available_parallelism().map_or(1, |n| n.get()))
}
