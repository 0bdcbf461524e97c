//! Prescribed (enforced) displacements at restrained nodes

use serde::{Deserialize, Serialize};

use crate::elements::NodeId;

/// Enforced displacements at a node, in global coordinates
///
/// Values only act on DOFs the node's reaction restrains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrescribedDisplacement {
    /// Node
    pub node: NodeId,
    /// Values [DX, DY, DZ, RX, RY, RZ]
    pub values: [f64; 6],
}

impl PrescribedDisplacement {
    /// Create a prescribed displacement from all six components
    pub fn new(node: NodeId, values: [f64; 6]) -> Self {
        Self { node, values }
    }

    /// Translation only
    pub fn translation(node: NodeId, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(node, [dx, dy, dz, 0.0, 0.0, 0.0])
    }
}
