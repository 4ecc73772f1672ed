// Sequential array sum benchmark
// Loads an array (from file or generated in memory), sums it with a plain
// left-to-right loop and reports the total plus the mean time of one pass.
//
// Usage:
//   sum_sequential [--input PATH | --generate N] [--trials T] [--warmup W] [--format human|csv|json]
//
// Output (human):
//   Array size: 100001 elements
//   Sum of elements: 5049537
//   Average execution time (5 runs): 0.000071 seconds

use std::process::ExitCode;

use array_sum::cli::{BenchArgs, InputArgs};
use array_sum::error::Result;
use array_sum::logging;
use array_sum::reducer::{run_benchmark, SequentialSum};
use array_sum::report::render;
use clap::Parser;
use tracing::error;

#[derive(Parser, Debug)]
#[command(about = "Time a sequential sum over an integer array")]
struct Args {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    bench: BenchArgs,
}

fn run(args: &Args) -> Result<()> {
    let sequence = args.input.load()?;
    let report = run_benchmark(&SequentialSum, &sequence, &args.bench.config())?;
    println!("{}", render(&report, args.bench.format)?);
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = ?e.kind(), "sum_sequential failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
