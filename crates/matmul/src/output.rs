//! CLI output formatting.

use std::io::{self, Write};

use matmul_core::model::Matrix;
use matmul_core::report::MatrixInfo;
use matmul_orchestration::PipelineOutcome;

use crate::ui;

/// Format elapsed milliseconds for display.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_millis(ms: i64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.3}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let remaining = (ms % 60_000) as f64 / 1000.0;
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        out.push('-');
    }
    out.chars().rev().collect()
}

fn format_info(info: &MatrixInfo) -> String {
    format!(
        "avg {}  min {}  max {}",
        format_number(info.average),
        format_number(info.minimum),
        format_number(info.maximum)
    )
}

/// How a finished run is printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportPresenter {
    pub json: bool,
    pub quiet: bool,
    pub show_matrices: bool,
}

impl ReportPresenter {
    /// Write the outcome of a local run.
    pub fn present<W: Write>(&self, out: &mut W, outcome: &PipelineOutcome) -> io::Result<()> {
        if self.json {
            serde_json::to_writer_pretty(&mut *out, &outcome.report)?;
            writeln!(out)?;
            return Ok(());
        }
        if self.quiet {
            return writeln!(out, "{}", outcome.report.result_matrix);
        }

        let report = &outcome.report;
        writeln!(out, "{}", ui::header("Matrix Multiplication Report"))?;
        writeln!(out, "{}", ui::field("Calculation", outcome.id.as_str()))?;
        writeln!(out, "{}", ui::field("Size", &format!("{0}x{0}", report.size)))?;
        writeln!(out, "{}", ui::field("Mode", &outcome.mode.to_string()))?;
        writeln!(out, "{}", ui::field("Duration", &format_millis(report.elapsed_millis())))?;
        writeln!(out, "{}", ui::field("Matrix A", &format_info(&report.input_matrix_a)))?;
        writeln!(out, "{}", ui::field("Matrix B", &format_info(&report.input_matrix_b)))?;
        writeln!(out, "{}", ui::field("Result", &format_info(&report.result_matrix)))?;

        if self.show_matrices {
            if let Some((calculation, product)) = &outcome.matrices {
                write_matrix(out, "A", calculation.a())?;
                write_matrix(out, "B", calculation.b())?;
                write_matrix(out, "A x B", product)?;
            }
        }
        Ok(())
    }
}

fn write_matrix<W: Write>(out: &mut W, name: &str, matrix: &Matrix) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", ui::header(name))?;
    write!(out, "{matrix}")
}

/// Write a value as one line of JSON, for phase pipelines.
pub fn write_json_line<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use matmul_core::model::{CalculationId, MatrixCalculation};
    use matmul_core::report::Report;
    use matmul_orchestration::ExecutionMode;

    fn outcome(with_matrices: bool) -> PipelineOutcome {
        let info = MatrixInfo {
            average: 121_672,
            minimum: 78_312,
            maximum: 168_397,
        };
        let matrices = with_matrices.then(|| {
            let calc =
                MatrixCalculation::new(Matrix::zeros(2), Matrix::zeros(2)).unwrap();
            (calc, Matrix::zeros(2))
        });
        PipelineOutcome {
            id: CalculationId::from("calc-1"),
            mode: ExecutionMode::Parallel { workers: 5 },
            report: Report {
                size: 50,
                input_matrix_a: info,
                input_matrix_b: info,
                result_matrix: info,
                start_timestamp: 1_000,
                end_timestamp: 1_250,
            },
            matrices,
        }
    }

    fn render(presenter: ReportPresenter, outcome: &PipelineOutcome) -> String {
        let mut buf = Vec::new();
        presenter.present(&mut buf, outcome).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn format_millis_ranges() {
        assert_eq!(format_millis(250), "250ms");
        assert_eq!(format_millis(1_500), "1.500s");
        assert_eq!(format_millis(61_000), "1m1.0s");
    }

    #[test]
    fn format_number_separators() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(121_672), "121,672");
        assert_eq!(format_number(-1_234_567), "-1,234,567");
    }

    #[test]
    fn json_output_is_the_report() {
        let o = outcome(false);
        let text = render(
            ReportPresenter {
                json: true,
                ..ReportPresenter::default()
            },
            &o,
        );
        let parsed: Report = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, o.report);
    }

    #[test]
    fn quiet_output_is_result_info() {
        let text = render(
            ReportPresenter {
                quiet: true,
                ..ReportPresenter::default()
            },
            &outcome(false),
        );
        assert_eq!(
            text.trim(),
            "MatrixInfo(Average = 121672, Minimum = 78312, Maximum = 168397)"
        );
    }

    #[test]
    fn human_output() {
        let text = render(ReportPresenter::default(), &outcome(false));
        assert!(text.contains("calc-1"));
        assert!(text.contains("50x50"));
        assert!(text.contains("parallel (5 workers)"));
        assert!(text.contains("250ms"));
        assert!(text.contains("121,672"));
    }

    #[test]
    fn matrices_only_when_requested() {
        let o = outcome(true);
        let plain = render(ReportPresenter::default(), &o);
        assert!(!plain.contains("2x2 Matrix"));

        let shown = render(
            ReportPresenter {
                show_matrices: true,
                ..ReportPresenter::default()
            },
            &o,
        );
        assert!(shown.contains("2x2 Matrix"));
    }

    #[test]
    fn json_line_has_no_inner_newlines() {
        let mut buf = Vec::new();
        write_json_line(&mut buf, &outcome(false).report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.matches('\n').count(), 1);
    }
}
