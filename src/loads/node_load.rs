//! Node loads - forces and moments applied directly to nodes

use serde::{Deserialize, Serialize};

use crate::elements::NodeId;

/// A load applied directly to a node, in global coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeLoad {
    /// Loaded node
    pub node: NodeId,
    /// Force in X direction
    pub fx: f64,
    /// Force in Y direction
    pub fy: f64,
    /// Force in Z direction
    pub fz: f64,
    /// Moment about X axis
    pub mx: f64,
    /// Moment about Y axis
    pub my: f64,
    /// Moment about Z axis
    pub mz: f64,
}

impl NodeLoad {
    /// Create a new node load with all components
    pub fn new(node: NodeId, fx: f64, fy: f64, fz: f64, mx: f64, my: f64, mz: f64) -> Self {
        Self {
            node,
            fx,
            fy,
            fz,
            mx,
            my,
            mz,
        }
    }

    /// Create a force-only node load
    pub fn force(node: NodeId, fx: f64, fy: f64, fz: f64) -> Self {
        Self::new(node, fx, fy, fz, 0.0, 0.0, 0.0)
    }

    /// Create a moment-only node load
    pub fn moment(node: NodeId, mx: f64, my: f64, mz: f64) -> Self {
        Self::new(node, 0.0, 0.0, 0.0, mx, my, mz)
    }

    /// Get the load as an array [FX, FY, FZ, MX, MY, MZ]
    pub fn as_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }
}
