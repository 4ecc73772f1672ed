// Random array generator
// Writes N integers drawn uniformly from [lo, hi] to a single space-separated
// line, overwriting the target file. Feeds sum_sequential / sum_parallel.
//
// Usage:
//   generate_array [--len N] [--lo LO] [--hi HI] [--output PATH] [--seed S]
//
// With no flags: 100001 values in [1, 100] written to array.txt.

use std::path::PathBuf;
use std::process::ExitCode;

use array_sum::error::Result;
use array_sum::format::write_array_file;
use array_sum::generator::{
    self, GenerationSummary, DEFAULT_ARRAY_LEN, DEFAULT_ARRAY_PATH, DEFAULT_ARRAY_RANGE,
};
use array_sum::{logging, ValueRange};
use clap::Parser;
use tracing::error;

#[derive(Parser, Debug)]
#[command(about = "Generate a random integer array file")]
struct Args {
    /// Number of elements
    #[arg(short = 'n', long, default_value_t = DEFAULT_ARRAY_LEN)]
    len: usize,

    /// Smallest value (inclusive)
    #[arg(long, default_value_t = DEFAULT_ARRAY_RANGE.0, allow_negative_numbers = true)]
    lo: i64,

    /// Largest value (inclusive)
    #[arg(long, default_value_t = DEFAULT_ARRAY_RANGE.1, allow_negative_numbers = true)]
    hi: i64,

    /// Output file, overwritten if present
    #[arg(short, long, default_value = DEFAULT_ARRAY_PATH)]
    output: PathBuf,

    /// Fix the RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn run(args: &Args) -> Result<()> {
    let range = ValueRange::new(args.lo, args.hi)?;
    let mut rng = generator::make_rng(args.seed);
    let sequence = generator::generate_sequence(args.len, range, &mut rng);
    write_array_file(&args.output, &sequence)?;

    let summary = GenerationSummary {
        path: args.output.display().to_string(),
        rows: None,
        cols: None,
        elements: sequence.len(),
        range,
    };
    if args.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "Array of {} elements saved to {}",
            summary.elements, summary.path
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = ?e.kind(), "generate_array failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
