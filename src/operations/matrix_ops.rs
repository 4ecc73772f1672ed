// Element-wise matrix operations benchmark
// Reads two "R C" grid files of the same shape and times add, sub, mul and
// div cell by cell. A zero divisor gives NaN.
//
// Usage:
//   matrix_ops [--left PATH] [--right PATH] [--kernel sequential|parallel]
//              [--threads T] [--pin] [--preview N]
//              [--trials T] [--warmup W] [--format human|csv|json]

use std::path::PathBuf;
use std::process::ExitCode;

use array_sum::cli::{BenchArgs, KernelArgs};
use array_sum::elementwise::{check_shapes, preview, run_elementwise_benchmark};
use array_sum::error::Result;
use array_sum::format::parse_grid;
use array_sum::logging;
use array_sum::report::{render, OutputFormat};
use clap::Parser;
use tracing::error;

#[derive(Parser, Debug)]
#[command(about = "Time element-wise add/sub/mul/div over two integer matrices")]
struct Args {
    /// First operand
    #[arg(long, default_value = "matrix1.txt")]
    left: PathBuf,

    /// Second operand
    #[arg(long, default_value = "matrix2.txt")]
    right: PathBuf,

    /// Result cells to print after the summary (human format only)
    #[arg(long, default_value_t = 5)]
    preview: usize,

    #[command(flatten)]
    kernel: KernelArgs,

    #[command(flatten)]
    bench: BenchArgs,
}

fn run(args: &Args) -> Result<()> {
    let left = parse_grid(&args.left)?;
    let right = parse_grid(&args.right)?;
    check_shapes(&left, &right)?;

    let kernel = args.kernel.build()?;
    let (mut report, output) = run_elementwise_benchmark(
        kernel.as_ref(),
        left.as_slice(),
        right.as_slice(),
        &args.bench.config(),
    )?;
    report.shape = Some([left.rows(), left.cols()]);
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
            error!(kind = ?e.kind(), "matrix_ops failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
