//! Error type shared by every fallible entry point.
//!
//! Everything here is a precondition failure: bad configuration, mismatched
//! buffer lengths, or an argument outside the model's numerical domain. All
//! of them are raised before any hot loop starts.

use thiserror::Error;

/// Crate-wide error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JvError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("shape mismatch for {what}: expected length {expected}, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("grid is not strictly increasing at index {index}")]
    NonIncreasingGrid { index: usize },

    #[error("numerical domain error: {0}")]
    Domain(String),

    #[error("offer distribution error: {0}")]
    Distribution(String),
}

pub type Result<T> = std::result::Result<T, JvError>;

impl JvError {
    pub(crate) fn param(name: &'static str, reason: impl Into<String>) -> Self {
        JvError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn check_len(what: &'static str, expected: usize, got: usize) -> Result<()> {
        if expected == got {
            Ok(())
        } else {
            Err(JvError::ShapeMismatch {
                what,
                expected,
                got,
            })
        }
    }
}
