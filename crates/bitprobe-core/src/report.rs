//! Markdown rendering of a [`RunReport`].

use crate::aggregate::Outcome;
use crate::pipeline::RunReport;

/// Render a run as a markdown document: a per-test table followed by the summary.
pub fn generate_report(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str("# bitprobe — Randomness Test Report\n\n");
    out.push_str(&format!(
        "- Input: `{}`\n- Bits: {} of {} requested (offset {})\n\n",
        report.input_file.display(),
        report.loaded_length,
        report.requested_length,
        report.offset
    ));

    out.push_str("| Test | Status | p-value | Auxiliary | Details |\n");
    out.push_str("|------|--------|---------|-----------|---------|\n");
    for r in &report.results {
        let (pval, aux, details) = match &r.outcome {
            Outcome::Value(v) => (
                format!("{:.6}", v.decisive),
                v.auxiliary
                    .as_ref()
                    .map(|a| {
                        a.iter()
                            .map(|p| format!("{p:.4}"))
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_else(|| "—".to_string()),
                String::new(),
            ),
            Outcome::Error { kind, message } => {
                ("—".to_string(), "—".to_string(), format!("{kind}: {message}"))
            }
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            r.name,
            r.status,
            pval,
            aux,
            details.replace('|', "\\|")
        ));
    }

    let s = &report.summary;
    out.push_str("\n## Summary\n\n");
    if s.total_count == 0 {
        out.push_str("No tests were successfully completed.\n");
        return out;
    }
    out.push_str(&format!(
        "- Tests run: {}\n- Passed: {} ({:.1}%)\n- Failed: {} ({:.1}%)\n- Errors: {} ({:.1}%)\n",
        s.total_count,
        s.pass_count,
        s.pass_percent(),
        s.fail_count,
        s.fail_percent(),
        s.error_count,
        s.error_percent()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Summary, TestResult, TestValue};
    use crate::error::{DispatchError, TestFault};
    use crate::transcript::Transcript;
    use std::path::PathBuf;

    fn report(results: Vec<TestResult>) -> RunReport {
        RunReport {
            input_file: PathBuf::from("data.txt"),
            requested_length: 100,
            loaded_length: 100,
            offset: 0,
            summary: Summary::from_results(&results),
            results,
            transcript: Transcript::new(),
        }
    }

    #[test]
    fn table_rows_cover_values_and_errors() {
        let md = generate_report(&report(vec![
            TestResult::from_value(
                "serial",
                TestValue {
                    decisive: 0.42,
                    auxiliary: Some(vec![0.5]),
                },
            ),
            TestResult::from_error(
                "rank",
                &DispatchError::from(TestFault::InsufficientData { needed: 38912, got: 100 }),
            ),
        ]));
        assert!(md.contains("| serial | PASS | 0.420000 | 0.5000 |  |"));
        assert!(md.contains("| rank | ERROR | — | — | TestInvocationFault: insufficient data"));
        assert!(md.contains("- Errors: 1 (50.0%)"));
    }

    #[test]
    fn empty_run_says_so() {
        let md = generate_report(&report(vec![]));
        assert!(md.contains("No tests were successfully completed."));
    }
}
