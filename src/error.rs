//! Error types shared by every adaptation component.

use thiserror::Error;

/// Errors raised by configuration and call-contract violations.
///
/// All of them are programmer errors: they surface synchronously at the
/// offending call and are never recovered from inside the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{context} length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("dimension mismatch in {op}: {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },
}

pub type Result<T> = std::result::Result<T, EsError>;

pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EsError::InvalidArgument(format!(
            "{name} must be finite and > 0, got {value}"
        )))
    }
}

pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EsError::InvalidArgument(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

pub(crate) fn ensure_len(context: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(EsError::LengthMismatch {
            context,
            expected,
            got,
        })
    }
}
