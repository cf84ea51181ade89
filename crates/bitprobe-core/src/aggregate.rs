//! Result classification and summary counts.

use serde::Serialize;

use crate::error::{DispatchError, TestFault};
use crate::registry::RawValue;
use crate::transcript::Transcript;

/// A decisive value strictly above this level passes.
pub const SIGNIFICANCE_LEVEL: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Pass,
    Fail,
    Error,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A test's numeric result with the decisive value split off.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestValue {
    pub decisive: f64,
    /// Remaining tuple elements; `None` when the test returned a single value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary: Option<Vec<f64>>,
}

impl TryFrom<RawValue> for TestValue {
    type Error = TestFault;

    /// Non-finite decisive values and empty tuples cannot be classified.
    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        let (decisive, auxiliary) = match raw {
            RawValue::Scalar(p) => (p, None),
            RawValue::Tuple(mut ps) => {
                if ps.is_empty() {
                    return Err(TestFault::NonNumeric("empty tuple".to_string()));
                }
                let first = ps.remove(0);
                (first, Some(ps))
            }
        };
        if !decisive.is_finite() {
            return Err(TestFault::NonNumeric(decisive.to_string()));
        }
        Ok(Self {
            decisive,
            auxiliary,
        })
    }
}

/// Pass/fail for a decisive value.
pub fn classify(decisive: f64) -> TestStatus {
    if decisive > SIGNIFICANCE_LEVEL {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Value(TestValue),
    Error { kind: String, message: String },
}

/// Outcome of one selected test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    pub outcome: Outcome,
}

impl TestResult {
    pub fn from_value(name: impl Into<String>, value: TestValue) -> Self {
        Self {
            name: name.into(),
            status: classify(value.decisive),
            outcome: Outcome::Value(value),
        }
    }

    pub fn from_error(name: impl Into<String>, err: &DispatchError) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Error,
            outcome: Outcome::Error {
                kind: err.kind().to_string(),
                message: err.to_string(),
            },
        }
    }

    pub fn decisive(&self) -> Option<f64> {
        match &self.outcome {
            Outcome::Value(v) => Some(v.decisive),
            Outcome::Error { .. } => None,
        }
    }
}

/// Counts over one run's results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total_count: usize,
    pub pass_count: usize,
    pub fail_count: usize,
    pub error_count: usize,
}

impl Summary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let total_count = results.len();
        let pass_count = results
            .iter()
            .filter(|r| r.status == TestStatus::Pass)
            .count();
        let error_count = results
            .iter()
            .filter(|r| r.status == TestStatus::Error)
            .count();
        Self::from_counts(total_count, pass_count, error_count)
    }

    /// `fail_count` is derived as `total - pass - error`.
    pub fn from_counts(total_count: usize, pass_count: usize, error_count: usize) -> Self {
        Self {
            total_count,
            pass_count,
            fail_count: total_count.saturating_sub(pass_count + error_count),
            error_count,
        }
    }

    fn percent(&self, count: usize) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            count as f64 / self.total_count as f64 * 100.0
        }
    }

    pub fn pass_percent(&self) -> f64 {
        self.percent(self.pass_count)
    }

    pub fn fail_percent(&self) -> f64 {
        self.percent(self.fail_count)
    }

    pub fn error_percent(&self) -> f64 {
        self.percent(self.error_count)
    }

    /// Append the summary block to a transcript.
    pub fn write_to(&self, transcript: &mut Transcript) {
        transcript.blank();
        transcript.separator('=', 40);
        transcript.line("SUMMARY OF RESULTS");
        transcript.separator('=', 40);
        if self.total_count == 0 {
            transcript.line("No tests were successfully completed.");
            return;
        }
        transcript.line(format!("Tests run: {}", self.total_count));
        transcript.line(format!(
            "Tests passed: {} ({:.1}%)",
            self.pass_count,
            self.pass_percent()
        ));
        transcript.line(format!(
            "Tests failed: {} ({:.1}%)",
            self.fail_count,
            self.fail_percent()
        ));
        if self.error_count > 0 {
            transcript.line(format!(
                "Tests with errors: {} ({:.1}%)",
                self.error_count,
                self.error_percent()
            ));
        }
    }
}
