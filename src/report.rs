//! Rendering of benchmark results for stdout.

use clap::ValueEnum;

use crate::error::Result;
use crate::reducer::BenchmarkReport;

/// Results an element-wise pass produces per input element.
const OPS_PER_ELEMENT: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Readable summary lines
    #[default]
    Human,
    /// CSV lines matching the rest of the benchmark suite
    Csv,
    /// The full report as one JSON object
    Json,
}

pub fn render(report: &BenchmarkReport, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Human => render_human(report),
        OutputFormat::Csv => render_csv(report),
        OutputFormat::Json => serde_json::to_string(report)?,
    })
}

fn is_sum(report: &BenchmarkReport) -> bool {
    report.operation == "sum"
}

fn render_human(report: &BenchmarkReport) -> String {
    let mut lines = vec![match report.shape {
        Some([rows, cols]) => format!("Matrix size: {rows}x{cols} ({} elements)", report.elements),
        None => format!("Array size: {} elements", report.elements),
    }];
    if report.parallel {
        lines.push(format!("Threads: {}", report.threads));
    }
    if is_sum(report) {
        lines.push(format!("Sum of elements: {}", report.total));
    } else {
        lines.push(format!("Checksum: {}", report.total));
    }
    lines.push(format!(
        "Average execution time ({} runs): {:.6} seconds",
        report.trials.len(),
        report.average_seconds
    ));
    if !is_sum(report) && report.average_seconds > 0.0 {
        let ops = OPS_PER_ELEMENT * report.elements as f64 / report.average_seconds;
        lines.push(format!("Throughput: {ops:.2} operations/sec"));
    }
    lines.join("\n")
}

fn render_csv(report: &BenchmarkReport) -> String {
    let prefix = format!(
        "{},rust,kernel={},N={},T={},threads={},warmup={}",
        report.operation,
        report.kernel,
        report.elements,
        report.trials.len(),
        report.threads,
        report.warmup
    );
    let label = if is_sum(report) { "total" } else { "checksum" };
    format!(
        "{prefix},avg_time,{:.6},sec\n{prefix},{label},{},int",
        report.average_seconds, report.total
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BenchmarkReport {
        BenchmarkReport {
            operation: "sum".into(),
            kernel: "sequential".into(),
            threads: 1,
            parallel: false,
            elements: 5,
            shape: None,
            warmup: 0,
            total: 15,
            trials: vec![0.000_001; 5],
            average_seconds: 0.000_001_4,
        }
    }

    #[test]
    fn test_human_output() {
        let text = render(&sample(), OutputFormat::Human).unwrap();
        assert_eq!(
            text,
            "Array size: 5 elements\n\
             Sum of elements: 15\n\
             Average execution time (5 runs): 0.000001 seconds"
        );
    }

    #[test]
    fn test_human_output_names_threads() {
        let mut report = sample();
        report.kernel = "parallel".into();
        report.parallel = true;
        report.threads = 8;
        assert!(render(&report, OutputFormat::Human)
            .unwrap()
            .contains("Threads: 8"));
    }

    #[test]
    fn test_single_thread_parallel_run_still_names_threads() {
        let mut report = sample();
        report.kernel = "parallel".into();
        report.parallel = true;
        let text = render(&report, OutputFormat::Human).unwrap();
        assert!(text.contains("Threads: 1"));

        let text = render(&sample(), OutputFormat::Human).unwrap();
        assert!(!text.contains("Threads"));
    }

    #[test]
    fn test_csv_output() {
        let text = render(&sample(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "sum,rust,kernel=sequential,N=5,T=5,threads=1,warmup=0,avg_time,0.000001,sec",
                "sum,rust,kernel=sequential,N=5,T=5,threads=1,warmup=0,total,15,int",
            ]
        );
    }

    #[test]
    fn test_elementwise_matrix_output() {
        let mut report = sample();
        report.operation = "elementwise".into();
        report.shape = Some([2, 3]);
        report.elements = 6;
        report.total = 99;
        report.average_seconds = 0.5;

        let text = render(&report, OutputFormat::Human).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Matrix size: 2x3 (6 elements)");
        assert_eq!(lines[1], "Checksum: 99");
        assert_eq!(lines[3], "Throughput: 48.00 operations/sec");

        let csv = render(&report, OutputFormat::Csv).unwrap();
        assert!(csv.starts_with("elementwise,rust,kernel=sequential,N=6,"));
        assert!(csv.ends_with(",checksum,99,int"));
    }

    #[test]
    fn test_json_output() {
        let text = render(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["operation"], "sum");
        assert_eq!(value["kernel"], "sequential");
        assert_eq!(value["parallel"], false);
        assert_eq!(value["total"], 15);
        assert_eq!(value["trials"].as_array().unwrap().len(), 5);
    }
}
