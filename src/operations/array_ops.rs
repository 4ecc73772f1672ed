// Element-wise array operations benchmark
// Reads two arrays of equal length and times add, sub, mul and div over every
// index pair. A zero divisor gives NaN.
//
// Usage:
//   array_ops [--left PATH] [--right PATH] [--kernel sequential|parallel]
//             [--threads T] [--pin] [--preview N]
//             [--trials T] [--warmup W] [--format human|csv|json]
//
// Generate the inputs with:
//   generate_array --output array1.txt && generate_array --output array2.txt

use std::path::PathBuf;
use std::process::ExitCode;

use array_sum::cli::{BenchArgs, KernelArgs};
use array_sum::elementwise::{check_lengths, preview, run_elementwise_benchmark};
use array_sum::error::Result;
use array_sum::format::parse_array;
use array_sum::logging;
use array_sum::report::{render, OutputFormat};
use clap::Parser;
use tracing::error;

#[derive(Parser, Debug)]
#[command(about = "Time element-wise add/sub/mul/div over two integer arrays")]
struct Args {
    /// First operand
    #[arg(long, default_value = "array1.txt")]
    left: PathBuf,

    /// Second operand
    #[arg(long, default_value = "array2.txt")]
    right: PathBuf,

    /// Result rows to print after the summary (human format only)
    #[arg(long, default_value_t = 20)]
    preview: usize,

    #[command(flatten)]
    kernel: KernelArgs,

    #[command(flatten)]
    bench: BenchArgs,
}

fn run(args: &Args) -> Result<()> {
    let left = parse_array(&args.left)?;
    let right = parse_array(&args.right)?;
    check_lengths(&left, &right)?;

    let kernel = args.kernel.build()?;
    let (report, output) = run_elementwise_benchmark(
        kernel.as_ref(),
        left.as_slice(),
        right.as_slice(),
        &args.bench.config(),
    )?;
    println!("{}", render(&report, args.bench.format)?);
    if args.bench.format == OutputFormat::Human && args.preview > 0 {
        println!("\nFirst {} results:", args.preview.min(output.len()));
        println!("{}", preview(&output, args.preview));
    }
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = ?e.kind(), "array_ops failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
