//! End-to-end operations: matrix → formatted artifact, and bit file → test run.
//!
//! Both entry points take a plain config struct and return everything the
//! caller needs to present, including the transcript. Nothing here prints.

use std::path::PathBuf;

use serde::Serialize;

use crate::aggregate::{Summary, TestResult};
use crate::bits::BitSequence;
use crate::dispatch::Dispatcher;
use crate::error::PrepError;
use crate::format::{OutputFormat, SavedArtifact, describe, render, save_artifact};
use crate::loader::{BitWindow, load_window};
use crate::matrix::load_matrix;
use crate::registry::{ModuleCatalog, Registry};
use crate::transcript::Transcript;
use crate::traversal::{SubsetSpec, TraversalOrder, extract};

// ═══════════════════════════════════════════════════════════════════════════════
// Conversion
// ═══════════════════════════════════════════════════════════════════════════════

/// Parameters of a matrix-to-bitstream conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertConfig {
    pub input: PathBuf,
    /// Where to save the rendered text; `None` only renders.
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub order: TraversalOrder,
    pub subset: SubsetSpec,
}

/// Result of [`convert`].
#[derive(Debug, Clone)]
pub struct Conversion {
    pub array_name: String,
    pub source_shape: (usize, usize),
    /// Shape of the matrix that was traversed (after any subset reshape).
    pub working_shape: (usize, usize),
    pub bits: BitSequence,
    pub text: String,
    pub saved: Option<SavedArtifact>,
    pub transcript: Transcript,
}

/// Load the primary matrix, extract and render its bit sequence, and save it
/// when an output path is configured.
pub fn convert(config: &ConvertConfig) -> Result<Conversion, PrepError> {
    let mut transcript = Transcript::new();

    let named = load_matrix(&config.input)?;
    transcript.line(format!(
        "Selected file: {}",
        config
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.input.display().to_string())
    ));
    let (rows, cols) = named.matrix.shape();
    transcript.line(format!(
        "Found array '{}' with shape: ({rows}, {cols})",
        named.name
    ));

    let extraction = extract(&named.matrix, config.order, config.subset, &mut transcript)?;
    let text = render(&extraction.bits, config.format);
    transcript.line(describe(&extraction.bits, config.format, &text));

    let bits = extraction.bits;
    transcript.line(format!(
        "Processed binary sequence has {} zeros and {} ones",
        bits.zeros(),
        bits.ones()
    ));
    transcript.line(format!(
        "Proportion of ones: {:.6}",
        bits.proportion_of_ones()
    ));

    let saved = match &config.output {
        Some(path) => Some(save_artifact(path, &text, &mut transcript)?),
        None => None,
    };

    Ok(Conversion {
        array_name: named.name,
        source_shape: (rows, cols),
        working_shape: extraction.shape,
        bits,
        text,
        saved,
        transcript,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test run
// ═══════════════════════════════════════════════════════════════════════════════

/// Parameters of a test run over a persisted bit stream.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_file: PathBuf,
    pub bit_length: usize,
    /// Names to run, in order. Defaults to every registered name.
    pub tests: Vec<String>,
    pub offset: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from(crate::format::COMPANION_FILE_NAME),
            bit_length: 1_000_000,
            tests: Registry::canonical()
                .names()
                .into_iter()
                .map(String::from)
                .collect(),
            offset: 0,
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input_file: PathBuf,
    pub requested_length: usize,
    pub loaded_length: usize,
    pub offset: usize,
    pub results: Vec<TestResult>,
    pub summary: Summary,
    #[serde(skip)]
    pub transcript: Transcript,
}

/// Load the configured window and dispatch the selected tests over it.
///
/// Only a failure to read the input file is returned as an error; every
/// per-test fault ends up in the report as an ERROR result.
pub fn run_selected_tests(
    config: &RunConfig,
    registry: &Registry,
    catalog: &dyn ModuleCatalog,
) -> Result<RunReport, PrepError> {
    let mut transcript = Transcript::new();
    transcript.line(format!("Testing file: {}", config.input_file.display()));
    transcript.line(format!("Bit length: {}", config.bit_length));
    transcript.line(format!("Offset: {}", config.offset));
    transcript.line(format!("Selected tests: {}", config.tests.join(", ")));
    transcript.separator('-', 80);

    let window = load_window(
        &config.input_file,
        config.bit_length,
        config.offset,
        &mut transcript,
    )?;
    note_window(&window, config, &mut transcript);

    let mut dispatcher = Dispatcher::new(registry, catalog);
    let dispatched = dispatcher.dispatch(config.tests.as_slice(), &window.bits);
    transcript.append(dispatched.transcript);

    let summary = Summary::from_results(&dispatched.results);
    summary.write_to(&mut transcript);

    Ok(RunReport {
        input_file: config.input_file.clone(),
        requested_length: config.bit_length,
        loaded_length: window.len(),
        offset: window.offset,
        results: dispatched.results,
        summary,
        transcript,
    })
}

fn note_window(window: &BitWindow, config: &RunConfig, transcript: &mut Transcript) {
    if window.shortfall().is_some() {
        transcript.warn(format!(
            "Input file contains only {} bits, but {} were requested.",
            window.len(),
            config.bit_length
        ));
    }
    transcript.line(format!(
        "Loaded {} bits from {} (offset: {})",
        window.len(),
        config.input_file.display(),
        window.offset
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::TestStatus;
    use crate::error::TestFault;
    use crate::registry::{
        ArgumentProfile, StaticCatalog, TestCallable, TestModule, TestOutput, TestSpec,
    };
    use std::fs;

    fn ones_ratio(bits: &[u8], _: bool) -> Result<TestOutput, TestFault> {
        if bits.is_empty() {
            return Err(TestFault::InsufficientData { needed: 1, got: 0 });
        }
        let ones = bits.iter().filter(|&&b| b == 1).count();
        Ok(TestOutput::scalar(ones as f64 / bits.len() as f64))
    }

    fn fixture() -> (Registry, StaticCatalog) {
        let registry = Registry::from_specs([TestSpec {
            name: "ratio",
            module: "stats",
            callable: "ones_ratio",
            profile: ArgumentProfile::Standard,
        }]);
        let catalog = StaticCatalog::new().with_module(
            TestModule::new("stats").export("ones_ratio", TestCallable::Unary(ones_ratio)),
        );
        (registry, catalog)
    }

    #[test]
    fn convert_writes_primary_and_companion() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("m.json");
        fs::write(&input, r#"{"__header__": "x", "grid": [[1, 1], [0, 0]]}"#).unwrap();
        let output = dir.path().join("out.txt");

        let conv = convert(&ConvertConfig {
            input,
            output: Some(output.clone()),
            format: OutputFormat::Compact,
            order: TraversalOrder::ColumnMajor,
            subset: SubsetSpec::disabled(),
        })
        .unwrap();

        assert_eq!(conv.array_name, "grid");
        assert_eq!(conv.text, "1010");
        assert_eq!(fs::read_to_string(&output).unwrap(), "1010");
        assert_eq!(fs::read_to_string(dir.path().join("data.txt")).unwrap(), "1010");
        assert!(conv.transcript.contains("Found array 'grid' with shape: (2, 2)"));
        assert!(conv.transcript.contains("Processed binary sequence has 2 zeros and 2 ones"));
        assert!(conv.transcript.contains("Proportion of ones: 0.500000"));
    }

    #[test]
    fn convert_rejects_bad_subset_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("m.json");
        fs::write(&input, "[[1, 0], [0, 1]]").unwrap();
        let output = dir.path().join("out.txt");
        let err = convert(&ConvertConfig {
            input,
            output: Some(output.clone()),
            subset: SubsetSpec::of(0),
            ..ConvertConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, PrepError::InvalidSubsetSize(0)));
        assert!(!output.exists());
    }

    #[test]
    fn run_reports_shortfall_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bits.txt");
        fs::write(&input, "0110100111").unwrap();
        let (registry, catalog) = fixture();

        let report = run_selected_tests(
            &RunConfig {
                input_file: input,
                bit_length: 20,
                tests: vec!["ratio".into(), "missing".into()],
                offset: 0,
            },
            &registry,
            &catalog,
        )
        .unwrap();

        assert_eq!(report.loaded_length, 10);
        assert_eq!(report.results[0].status, TestStatus::Pass);
        assert_eq!(report.results[1].status, TestStatus::Error);
        assert_eq!(report.summary.total_count, 2);
        let t = &report.transcript;
        assert!(t.contains("Warning: Input file contains only 10 bits, but 20 were requested."));
        assert!(t.contains("Tests with errors: 1 (50.0%)"));
    }

    #[test]
    fn run_fails_only_on_unreadable_input() {
        let (registry, catalog) = fixture();
        let config = RunConfig {
            input_file: PathBuf::from("/nonexistent/bits.txt"),
            ..RunConfig::default()
        };
        assert!(run_selected_tests(&config, &registry, &catalog).is_err());
    }

    #[test]
    fn default_run_selects_full_registry() {
        assert_eq!(RunConfig::default().tests.len(), 15);
    }
}
