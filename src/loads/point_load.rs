//! Concentrated loads on element spans

use serde::{Deserialize, Serialize};

use crate::elements::ElementId;

/// Direction in the element's local coordinate system
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LocalAxis {
    /// Along the element (axial)
    X,
    /// Local y
    Y,
    /// Local z
    Z,
}

impl LocalAxis {
    /// Index of the axis (0, 1, 2)
    pub fn index(self) -> usize {
        match self {
            LocalAxis::X => 0,
            LocalAxis::Y => 1,
            LocalAxis::Z => 2,
        }
    }
}

/// A concentrated force at a point along an element, in local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanLoad {
    /// Loaded element
    pub element: ElementId,
    /// Force along local x
    pub px: f64,
    /// Force along local y
    pub py: f64,
    /// Force along local z
    pub pz: f64,
    /// Distance from node 1
    pub x: f64,
}

impl SpanLoad {
    /// Create a new span load
    pub fn new(element: ElementId, px: f64, py: f64, pz: f64, x: f64) -> Self {
        Self {
            element,
            px,
            py,
            pz,
            x,
        }
    }

    /// Get the force as an array [px, py, pz]
    pub fn as_array(&self) -> [f64; 3] {
        [self.px, self.py, self.pz]
    }
}
