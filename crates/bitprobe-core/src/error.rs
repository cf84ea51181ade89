//! Error types for the preparation pipeline and the test harness.
//!
//! [`PrepError`] covers faults that halt an operation (matrix load, subset
//! extraction, artifact I/O, bit-stream load). [`TestFault`] and
//! [`DispatchError`] are scoped to a single test: the dispatcher records them
//! as an ERROR outcome and moves on to the next selected name.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal faults of the conversion pipeline and the bit-stream loader.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PrepError {
    /// Matrix source file is missing or unreadable.
    #[error("input not found: {path}: {source}")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The container holds nothing but metadata entries.
    #[error("no valid array found in {path}")]
    NoArrayFound { path: PathBuf },

    /// The primary entry exists but is not a rectangular numeric array.
    #[error("malformed matrix '{name}': {reason}")]
    MalformedMatrix { name: String, reason: String },

    /// Requested subset size is zero or negative.
    #[error("invalid subset size {0}: subset size must be positive")]
    InvalidSubsetSize(i64),

    /// Reading or writing a text artifact failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PrepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A fault raised by a test callable, or by coercing its return value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TestFault {
    #[error("insufficient data: need {needed} bits, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("computation failed: {0}")]
    Computation(String),

    #[error("test panicked: {0}")]
    Panicked(String),

    #[error("argument profile {profile} cannot be applied to `{callable}`")]
    ProfileMismatch { profile: String, callable: String },

    #[error("result is not numeric: {0}")]
    NonNumeric(String),
}

impl TestFault {
    /// Short tag naming the fault type, written next to the message in the transcript.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "InsufficientData",
            Self::InvalidParameter(_) => "InvalidParameter",
            Self::Computation(_) => "Computation",
            Self::Panicked(_) => "Panic",
            Self::ProfileMismatch { .. } => "ProfileMismatch",
            Self::NonNumeric(_) => "NonNumericResult",
        }
    }
}

/// Per-test failure to resolve or run a registry entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("unknown test: {0}")]
    UnknownTest(String),

    #[error("test module '{module}' not found")]
    ModuleNotFound { module: String },

    #[error("failed to load test module '{module}': {reason}")]
    ModuleLoad { module: String, reason: String },

    #[error("callable `{callable}` not found in module '{module}'")]
    CallableNotFound {
        module: String,
        callable: String,
        /// What `available` lists, e.g. `"methods in FrequencyTest"` or `"types"`.
        scope: String,
        available: Vec<String>,
    },

    #[error(transparent)]
    Fault(#[from] TestFault),
}

impl DispatchError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTest(_) => "UnknownTest",
            Self::ModuleNotFound { .. } | Self::ModuleLoad { .. } => "ModuleResolutionError",
            Self::CallableNotFound { .. } => "CallableResolutionError",
            Self::Fault(TestFault::NonNumeric(_)) => "NonNumericResult",
            Self::Fault(_) => "TestInvocationFault",
        }
    }
}
