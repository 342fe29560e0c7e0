//! Error taxonomy for the miner.
//!
//! Mirrors the teacher's dependency-free style: no `thiserror`/`anyhow`, just
//! a plain enum with hand-written `Display` and `Error` impls.

use std::fmt;
use std::path::PathBuf;

/// A fatal error that aborts mining before or during a run.
///
/// `MalformedRecord` (per-line decode failures) is deliberately not a
/// variant here: those are recovered locally and only ever surface as a
/// count in [`crate::decode::DecodeReport`].
#[derive(Debug)]
pub enum MinerError {
    /// A database or neighborhood source could not be read.
    SourceUnavailable { path: PathBuf, source: std::io::Error },
    /// `minSup`, `maxLength`, or `maxGap` parsed but is out of range.
    ParameterRangeError(String),
}

impl fmt::Display for MinerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinerError::SourceUnavailable { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            MinerError::ParameterRangeError(msg) => write!(f, "parameter out of range: {msg}"),
        }
    }
}

impl std::error::Error for MinerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MinerError::SourceUnavailable { source, .. } => Some(source),
            MinerError::ParameterRangeError(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MinerError>;
