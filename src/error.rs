//! Error types for the frame solver

use thiserror::Error;

use crate::elements::{ElementId, NodeId};

/// Main error type for frame analysis operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("Element {element} has zero length")]
    DegenerateElement { element: ElementId },

    #[error("Node {0} not found in model")]
    NodeNotFound(NodeId),

    #[error("Element {0} not found in model")]
    ElementNotFound(ElementId),

    #[error("Structural singularity: {0}")]
    StructuralSingularity(String),

    #[error("Geometric stiffness iteration did not converge after {iterations} iterations (relative change {error:.3e})")]
    NonConvergence { iterations: usize, error: f64 },

    #[error("Eigen-extraction did not converge after {iterations} iterations ({converged} of {requested} modes converged)")]
    EigenNonConvergence {
        iterations: usize,
        converged: usize,
        requested: usize,
    },

    #[error("Numerical degeneracy: {0}")]
    NumericalDegeneracy(String),
}

impl FrameError {
    /// Convenience constructor for validation failures
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InputValidation(msg.into())
    }

    /// True for errors raised before any matrix is assembled
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InputValidation(_)
                | Self::DegenerateElement { .. }
                | Self::NodeNotFound(_)
                | Self::ElementNotFound(_)
        )
    }
}

/// Result type for frame analysis operations
pub type FrameResult<T> = Result<T, FrameError>;
