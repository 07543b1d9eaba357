//! Error type shared by generators, distance matrices, and queries.

use std::fmt;

/// Everything that can go wrong is an input problem; nothing here is retried.
#[derive(Clone, Debug, PartialEq)]
pub enum PointError {
    /// Negative counts, non-finite coordinates, inverted ranges.
    InvalidParams { reason: String },
    /// Two coordinate tables (or a table and the 2D point type) disagree on column count.
    ShapeMismatch { left: usize, right: usize },
    /// Row/column/grid index outside `0..len`.
    IndexOutOfRange { index: usize, len: usize },
    /// A reduction over a set with no points.
    EmptySet { what: &'static str },
}

impl PointError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid input: {reason}"),
            Self::ShapeMismatch { left, right } => write!(
                f,
                "shape mismatch: coordinate columns differ ({left} vs {right})"
            ),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::EmptySet { what } => write!(f, "empty point set: {what}"),
        }
    }
}

impl std::error::Error for PointError {}
