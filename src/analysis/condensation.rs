//! Condensation (model reduction) configuration

use serde::{Deserialize, Serialize};

use crate::elements::NodeId;

/// How non-retained DOFs are eliminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CondensationMethod {
    /// No reduction: the free-DOF stiffness and mass are returned as they are
    #[default]
    None,
    /// Guyan reduction; eliminated DOFs carry no inertia
    Static,
    /// Paz dynamic reduction at the frequency of the first listed mode
    Dynamic,
    /// Modal reduction reproducing the listed modes exactly
    Modal,
}

/// DOFs kept at one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetainedDofs {
    /// Node
    pub node: NodeId,
    /// Flags [DX, DY, DZ, RX, RY, RZ]
    pub dofs: [bool; 6],
}

impl RetainedDofs {
    /// Retain a selection of DOFs at a node
    pub fn new(node: NodeId, dofs: [bool; 6]) -> Self {
        Self { node, dofs }
    }

    /// Retain the three translations of a node
    pub fn translations(node: NodeId) -> Self {
        Self::new(node, [true, true, true, false, false, false])
    }
}

/// Requested reduction of the model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CondensationSpec {
    /// Reduction method
    pub method: CondensationMethod,
    /// DOFs kept in the reduced model, in output order
    pub retained: Vec<RetainedDofs>,
    /// Zero-based mode indices used by the dynamic and modal methods
    #[serde(default)]
    pub modes: Vec<usize>,
}

impl CondensationSpec {
    /// Create a specification for the given method and retained DOFs
    pub fn new(method: CondensationMethod, retained: Vec<RetainedDofs>) -> Self {
        Self {
            method,
            retained,
            modes: Vec::new(),
        }
    }

    /// Guyan reduction to the given DOFs
    pub fn guyan(retained: Vec<RetainedDofs>) -> Self {
        Self::new(CondensationMethod::Static, retained)
    }

    /// Set the modes used by dynamic and modal reduction
    pub fn with_modes(mut self, modes: Vec<usize>) -> Self {
        self.modes = modes;
        self
    }
}
