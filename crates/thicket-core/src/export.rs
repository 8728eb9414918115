//! Reading issue snapshots produced by a tracker's export command.
//!
//! Two shapes are accepted:
//!
//! - a JSON array of issue objects (`[{"id": ...}, ...]`), and
//! - JSON Lines: one issue object per line, blank lines ignored.
//!
//! The shape is chosen by the first non-whitespace byte.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use anyhow::Context;
use tracing::{debug, instrument};

use crate::error::ErrorCode;
use crate::model::Issue;

/// Failure while decoding an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to read issue export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid issue on line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid issue array: {0}")]
    Array(#[source] serde_json::Error),
}

impl ExportError {
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Io(err) if err.kind() == ErrorKind::NotFound => ErrorCode::ExportNotFound,
            Self::Io(err) if err.kind() == ErrorKind::InvalidData => ErrorCode::ExportParseError,
            Self::Io(_) => ErrorCode::InternalUnexpected,
            Self::Line { .. } | Self::Array(_) => ErrorCode::ExportParseError,
        }
    }
}

/// Decode an export from any reader.
///
/// # Errors
///
/// Returns [`ExportError`] on I/O failure or malformed JSON. Line numbers
/// in [`ExportError::Line`] are 1-based.
pub fn parse_export(reader: impl Read) -> Result<Vec<Issue>, ExportError> {
    let mut reader = BufReader::new(reader);
    let mut skipped_lines = 0;
    let is_array = loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(pos) = buf.iter().position(|b| !b.is_ascii_whitespace()) {
            let first = buf[pos];
            break first == b'[';
        }
        skipped_lines += buf.iter().filter(|b| **b == b'\n').count();
        let len = buf.len();
        reader.consume(len);
    };

    if is_array {
        return serde_json::from_reader(reader).map_err(ExportError::Array);
    }

    let mut issues = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let issue = serde_json::from_str(trimmed)
            .map_err(|source| ExportError::Line {
                line: skipped_lines + i + 1,
                source,
            })?;
        issues.push(issue);
    }
    Ok(issues)
}

/// Decode an export file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded. The
/// underlying [`ExportError`] stays reachable through `downcast_ref`.
#[instrument]
pub fn load_export(path: &Path) -> anyhow::Result<Vec<Issue>> {
    let file = File::open(path)
        .map_err(ExportError::from)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let issues =
        parse_export(file).with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(count = issues.len(), "loaded issue export");
    Ok(issues)
}
