//! Error taxonomy for the inference engine
//!
//! Structural violations (shape, configuration, comparand) fail the whole
//! call. Per-timepoint numerical problems never surface here: the affected
//! timepoint carries NaN and the series completes.

use thiserror::Error;

/// Errors returned by matrix construction, tests and permutation runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusterPermError {
    #[error("Shape mismatch in {context}: expected {expected} {axis}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        axis: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Ragged matrix: frame {frame} has {actual} subjects, frame 0 has {expected}")]
    RaggedFrame {
        frame: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Design {design} requires {required}")]
    ComparandMismatch {
        design: &'static str,
        required: &'static str,
    },

    #[error("Empirical distribution is empty")]
    EmptyDistribution,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ClusterPermError>;

impl ClusterPermError {
    pub(crate) fn frames(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            context,
            axis: "frames",
            expected,
            actual,
        }
    }

    pub(crate) fn subjects(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            context,
            axis: "subjects",
            expected,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message_names_axis() {
        let err = ClusterPermError::frames("paired t-test", 5, 4);
        let msg = err.to_string();
        assert!(msg.contains("paired t-test"));
        assert!(msg.contains("expected 5 frames"));
        assert!(msg.contains("got 4"));
    }

    #[test]
    fn test_ragged_frame_message() {
        let err = ClusterPermError::RaggedFrame {
            frame: 2,
            expected: 3,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Ragged matrix: frame 2 has 1 subjects, frame 0 has 3"
        );
    }
}
