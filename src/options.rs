//! Mining parameters.
//!
//! A small, `Debug`-derivable bag of knobs fixed for the lifetime of a run,
//! in the spirit of the teacher's `DbOptions`.

use crate::error::{MinerError, Result};

/// The user-supplied `minSup` threshold, before conversion to an absolute
/// sequence count.
#[derive(Debug, Clone, PartialEq)]
pub enum MinSupSpec {
    /// Absolute minimum number of witnessing sequences.
    Absolute(i64),
    /// Fraction of the database size.
    Relative(f64),
}

impl MinSupSpec {
    /// Parses a `minSup` given as a string: a value containing a decimal
    /// point is relative, otherwise it is absolute.
    pub fn parse(text: &str) -> Result<MinSupSpec> {
        if text.contains('.') {
            text.parse::<f64>()
                .map(MinSupSpec::Relative)
                .map_err(|_| MinerError::ParameterRangeError(format!("not a number: {text}")))
        } else {
            text.parse::<i64>()
                .map(MinSupSpec::Absolute)
                .map_err(|_| MinerError::ParameterRangeError(format!("not a number: {text}")))
        }
    }
}

/// Converts a `minSup` specification to an absolute sequence count,
/// rejecting non-positive results.
pub fn resolve_min_sup(spec: &MinSupSpec, database_len: usize) -> Result<usize> {
    let resolved = match spec {
        MinSupSpec::Absolute(n) => *n,
        MinSupSpec::Relative(frac) => (database_len as f64 * frac).floor() as i64,
    };
    if resolved <= 0 {
        return Err(MinerError::ParameterRangeError(format!(
            "minSup resolved to {resolved}, must be positive"
        )));
    }
    Ok(resolved as usize)
}

/// Parameters governing one mining run.
#[derive(Debug, Clone)]
pub struct MinerOptions {
    pub min_sup: MinSupSpec,
    pub separator: String,
    pub max_length: usize,
    pub max_gap: usize,
}

impl Default for MinerOptions {
    fn default() -> Self {
        MinerOptions {
            min_sup: MinSupSpec::Absolute(1),
            separator: "\t".to_owned(),
            max_length: usize::MAX,
            max_gap: usize::MAX,
        }
    }
}

/// Parses a `maxLength`/`maxGap` CLI argument, treating absent as
/// unbounded and rejecting negative values.
pub fn parse_bound(text: Option<&str>) -> Result<usize> {
    match text {
        None => Ok(usize::MAX),
        Some(text) => {
            let value: i64 = text
                .parse()
                .map_err(|_| MinerError::ParameterRangeError(format!("not an integer: {text}")))?;
            if value < 0 {
                return Err(MinerError::ParameterRangeError(format!(
                    "bound must be non-negative, got {value}"
                )));
            }
            Ok(value as usize)
        }
    }
}
