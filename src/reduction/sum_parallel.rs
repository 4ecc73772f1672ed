// Parallel array sum benchmark (Rayon)
// Same protocol as sum_sequential, but the reduction runs on a dedicated
// Rayon pool of T workers (the Rust counterpart of `omp parallel for
// reduction(+:sum)`).
//
// Usage:
//   sum_parallel [--threads T] [--pin] [--verify] [--input PATH | --generate N]
//                [--trials T] [--warmup W] [--format human|csv|json]
//
//   --pin     pin worker i to core i
//   --verify  recompute the total sequentially and fail (exit 1) on mismatch

use std::process::ExitCode;

use array_sum::cli::{thread_count, BenchArgs, InputArgs};
use array_sum::error::Result;
use array_sum::logging;
use array_sum::reducer::{run_benchmark, verify_against_sequential, ParallelSum};
use array_sum::report::render;
use clap::Parser;
use tracing::error;

#[derive(Parser, Debug)]
#[command(about = "Time a parallel (Rayon) sum over an integer array")]
struct Args {
    /// Worker threads (defaults to the number of logical CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Pin each worker thread to its own core
    #[arg(long)]
    pin: bool,

    /// Cross-check the total against the sequential kernel
    #[arg(long)]
    verify: bool,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    bench: BenchArgs,
}

fn run(args: &Args) -> Result<()> {
    let kernel = ParallelSum::new(thread_count(args.threads), args.pin)?;

    let sequence = args.input.load()?;
    let report = run_benchmark(&kernel, &sequence, &args.bench.config())?;
    if args.verify {
        verify_against_sequential(&report, &sequence)?;
    }
    println!("{}", render(&report, args.bench.format)?);
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = ?e.kind(), "sum_parallel failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
