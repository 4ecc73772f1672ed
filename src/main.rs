// Main benchmark runner
// Generates the input array once, then runs the sequential and parallel
// summation binaries against it. The element-wise benchmarks are run one at
// a time.

use std::env;
use std::process::{Command, ExitCode};

use array_sum::logging;
use tracing::{error, info};

static ALL_STEPS: [(&str, &str); 3] = [
    ("generate_array", "Generating input array"),
    ("sum_sequential", "Sequential sum benchmark"),
    ("sum_parallel", "Parallel sum benchmark"),
];

static OPS_STEPS: [(&str, &str); 2] = [
    ("array_ops", "Element-wise array operations"),
    ("matrix_ops", "Element-wise matrix operations"),
];

fn main() -> ExitCode {
    logging::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let steps: &[(&str, &str)] = match args[1].as_str() {
        "generate" => &ALL_STEPS[..1],
        "sequential" => &ALL_STEPS[1..2],
        "parallel" => &ALL_STEPS[2..],
        "array-ops" => &OPS_STEPS[..1],
        "matrix-ops" => &OPS_STEPS[1..],
        "all" => &ALL_STEPS[..],
        "help" | "--help" | "-h" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        other => {
            println!("Unknown command: {}", other);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    // Arguments after a single-binary command are forwarded to that binary.
    let extra: &[String] = if steps.len() == 1 { &args[2..] } else { &[] };
    for (i, (bin, title)) in steps.iter().enumerate() {
        if i > 0 {
            println!("\n");
        }
        if !run_binary(bin, title, extra) {
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn print_usage() {
    println!("Rust Array Sum Benchmarks (sequential vs parallel)");
    println!();
    println!("Usage: cargo run --release --bin run_all_benchmarks <command> [args...]");
    println!();
    println!("Commands:");
    println!("  generate    - Write a random array to array.txt");
    println!("  sequential  - Time a sequential sum over array.txt (5 runs)");
    println!("  parallel    - Time a Rayon parallel sum over array.txt (5 runs)");
    println!("  array-ops   - Time add/sub/mul/div over array1.txt and array2.txt");
    println!("  matrix-ops  - Time add/sub/mul/div over matrix1.txt and matrix2.txt");
    println!("  all         - Generate, then run both sums");
    println!("  help        - Show this help message");
    println!();
    println!("You can also run individual binaries directly:");
    println!("  cargo run --release --bin generate_array -- [--len N] [--lo LO] [--hi HI]");
    println!("  cargo run --release --bin generate_matrix -- [--rows R] [--cols C]");
    println!("  cargo run --release --bin sum_sequential -- [--input PATH] [--format csv]");
    println!("  cargo run --release --bin sum_parallel -- [--threads T] [--verify]");
    println!("  cargo run --release --bin array_ops -- [--kernel parallel] [--preview N]");
    println!("  cargo run --release --bin matrix_ops -- [--left A] [--right B]");
}

fn run_binary(bin: &str, title: &str, extra: &[String]) -> bool {
    println!("{}...", title);
    println!("{}\n", "=".repeat(title.len() + 3));

    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--release", "--quiet", "--bin", bin]);
    if !extra.is_empty() {
        cmd.arg("--").args(extra);
    }
    info!(bin, ?extra, "launching benchmark binary");

    match cmd.status() {
        Ok(status) if status.success() => true,
        Ok(status) => {
            error!(bin, %status, "benchmark binary failed");
            eprintln!("{} failed!", bin);
            false
        }
        Err(e) => {
            error!(bin, error = %e, "could not launch cargo");
            eprintln!("Failed to run {}: {}", bin, e);
            false
        }
    }
}
