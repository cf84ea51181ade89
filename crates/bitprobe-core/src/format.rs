//! Text encodings of a bit sequence and artifact persistence.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::bits::BitSequence;
use crate::error::PrepError;
use crate::transcript::Transcript;

/// Fixed name of the copy written next to every saved artifact.
pub const COMPANION_FILE_NAME: &str = "data.txt";

/// Text encodings accepted by the converter.
///
/// `Binary` and `Compact` render identically; both names are kept because
/// both are accepted configuration values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Digits concatenated with no separator.
    #[default]
    Binary,
    /// One digit per line.
    AsciiLines,
    /// Same rendering as `Binary`.
    Compact,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::AsciiLines => "01-ascii",
            Self::Compact => "no-whitespace",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary" => Ok(Self::Binary),
            "01-ascii" | "ascii-lines" | "ascii" => Ok(Self::AsciiLines),
            "no-whitespace" | "compact" => Ok(Self::Compact),
            _ => Err(format!(
                "unknown output format '{s}' (expected binary, 01-ascii or no-whitespace)"
            )),
        }
    }
}

/// Render `bits` in the given encoding. Never fails; empty input renders empty.
pub fn render(bits: &BitSequence, format: OutputFormat) -> String {
    match format {
        OutputFormat::Binary | OutputFormat::Compact => bits.to_string(),
        OutputFormat::AsciiLines => bits
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Describe what [`render`] produced, for the conversion transcript.
pub fn describe(bits: &BitSequence, format: OutputFormat, text: &str) -> String {
    match format {
        OutputFormat::Binary => format!("Generated binary string of length {}", text.len()),
        OutputFormat::AsciiLines => {
            format!("Generated ASCII 0/1 sequence with {} lines", bits.len())
        }
        OutputFormat::Compact => {
            format!("Generated compact binary string of length {}", text.len())
        }
    }
}

/// Paths written by [`save_artifact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub primary: PathBuf,
    pub companion: PathBuf,
}

/// Write `text` to `primary` and an identical copy to [`COMPANION_FILE_NAME`]
/// in the same directory.
pub fn save_artifact(
    primary: &Path,
    text: &str,
    transcript: &mut Transcript,
) -> Result<SavedArtifact, PrepError> {
    fs::write(primary, text).map_err(|e| PrepError::io(primary, e))?;
    transcript.line(format!("Successfully saved to: {}", primary.display()));

    let dir = primary
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let companion = dir.join(COMPANION_FILE_NAME);
    if companion != primary {
        fs::write(&companion, text).map_err(|e| PrepError::io(&companion, e))?;
    }
    transcript.line(format!(
        "Test data saved to: {COMPANION_FILE_NAME} in same directory"
    ));

    Ok(SavedArtifact {
        primary: primary.to_path_buf(),
        companion,
    })
}
