// Random matrix generator
// Writes an R x C grid of integers drawn uniformly from [lo, hi]: a "R C"
// header line, then one line per row. The target file is overwritten.
//
// Usage:
//   generate_matrix [--rows R] [--cols C] [--lo LO] [--hi HI] [--output PATH] [--seed S]
//
// With no flags: 350 x 350 values in [1, 1000] written to matrix.txt.

use std::path::PathBuf;
use std::process::ExitCode;

use array_sum::error::Result;
use array_sum::format::write_grid_file;
use array_sum::generator::{
    self, GenerationSummary, DEFAULT_GRID_COLS, DEFAULT_GRID_PATH, DEFAULT_GRID_RANGE,
    DEFAULT_GRID_ROWS,
};
use array_sum::{logging, ValueRange};
use clap::Parser;
use tracing::error;

#[derive(Parser, Debug)]
#[command(about = "Generate a random integer matrix file")]
struct Args {
    #[arg(short, long, default_value_t = DEFAULT_GRID_ROWS)]
    rows: usize,

    #[arg(short, long, default_value_t = DEFAULT_GRID_COLS)]
    cols: usize,

    /// Smallest value (inclusive)
    #[arg(long, default_value_t = DEFAULT_GRID_RANGE.0, allow_negative_numbers = true)]
    lo: i64,

    /// Largest value (inclusive)
    #[arg(long, default_value_t = DEFAULT_GRID_RANGE.1, allow_negative_numbers = true)]
    hi: i64,

    /// Output file, overwritten if present
    #[arg(short, long, default_value = DEFAULT_GRID_PATH)]
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
    let grid = generator::generate_grid(args.rows, args.cols, range, &mut rng)?;
    write_grid_file(&args.output, &grid)?;

    let summary = GenerationSummary {
        path: args.output.display().to_string(),
        rows: Some(grid.rows()),
        cols: Some(grid.cols()),
        elements: grid.len(),
        range,
    };
    if args.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "Matrix {}x{} ({} elements in total) saved to {}",
            grid.rows(),
            grid.cols(),
            summary.elements,
            summary.path
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
            error!(kind = ?e.kind(), "generate_matrix failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
