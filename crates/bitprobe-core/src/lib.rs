//! # bitprobe-core
//!
//! Prepares numeric matrices as bit sequences for statistical randomness
//! testing, and runs a battery of named tests over a persisted bit stream.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bitprobe_core::{ConvertConfig, OutputFormat, TraversalOrder, convert};
//!
//! let conversion = convert(&ConvertConfig {
//!     input: "grid.json".into(),
//!     output: Some("out/bits.txt".into()),
//!     format: OutputFormat::Compact,
//!     order: TraversalOrder::ColumnMajor,
//!     ..ConvertConfig::default()
//! })
//! .unwrap();
//! print!("{}", conversion.transcript);
//! ```
//!
//! ## Architecture
//!
//! Matrix → traversal/subset → formatter → text file → loader (offset/length
//! window) → dispatcher (registry + module catalog) → aggregator.
//!
//! Test implementations are not part of this crate. They are handed to the
//! [`Dispatcher`] through a [`ModuleCatalog`]; the [`Registry`] maps each
//! canonical test name to a module, an export and an [`ArgumentProfile`].

pub mod aggregate;
pub mod bits;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod loader;
pub mod matrix;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod transcript;
pub mod traversal;

pub use aggregate::{
    Outcome, SIGNIFICANCE_LEVEL, Summary, TestResult, TestStatus, TestValue, classify,
};
pub use bits::BitSequence;
pub use dispatch::{DispatchReport, Dispatcher};
pub use error::{DispatchError, PrepError, TestFault};
pub use format::{COMPANION_FILE_NAME, OutputFormat, SavedArtifact, render, save_artifact};
pub use loader::{BitWindow, load_window};
pub use matrix::{METADATA_PREFIX, NamedMatrix, SourceMatrix, load_matrix};
pub use pipeline::{
    ConvertConfig, Conversion, RunConfig, RunReport, convert, run_selected_tests,
};
pub use registry::{
    ArgumentProfile, BLOCK_FREQUENCY_BLOCK_SIZE, CANONICAL_TESTS, ModuleCatalog, RawValue,
    Registry, StaticCatalog, TestCallable, TestModule, TestOutput, TestSpec,
};
pub use report::generate_report;
pub use transcript::Transcript;
pub use traversal::{DEFAULT_SUBSET_SIZE, SubsetSpec, TraversalOrder, extract};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
