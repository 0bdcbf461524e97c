//! Distributed loads on elements

use serde::{Deserialize, Serialize};

use super::point_load::LocalAxis;
use crate::elements::ElementId;

/// A uniform load over the full element length, in local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformLoad {
    /// Loaded element
    pub element: ElementId,
    /// Intensity along local x (force per length)
    pub wx: f64,
    /// Intensity along local y
    pub wy: f64,
    /// Intensity along local z
    pub wz: f64,
}

impl UniformLoad {
    /// Create a new uniform load
    pub fn new(element: ElementId, wx: f64, wy: f64, wz: f64) -> Self {
        Self { element, wx, wy, wz }
    }

    /// Get the intensities as an array [wx, wy, wz]
    pub fn as_array(&self) -> [f64; 3] {
        [self.wx, self.wy, self.wz]
    }
}

/// A linearly varying load over part of an element, in local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrapezoidalLoad {
    /// Loaded element
    pub element: ElementId,
    /// Local direction of the load
    pub axis: LocalAxis,
    /// Start position (distance from node 1)
    pub x1: f64,
    /// End position (distance from node 1)
    pub x2: f64,
    /// Intensity at x1
    pub w1: f64,
    /// Intensity at x2
    pub w2: f64,
}

impl TrapezoidalLoad {
    /// Create a new trapezoidal load
    pub fn new(element: ElementId, axis: LocalAxis, x1: f64, x2: f64, w1: f64, w2: f64) -> Self {
        Self {
            element,
            axis,
            x1,
            x2,
            w1,
            w2,
        }
    }

    /// Check if the load is uniform (constant magnitude)
    pub fn is_uniform(&self) -> bool {
        (self.w1 - self.w2).abs() < 1e-12
    }

    /// Get the total force from this load
    pub fn total_force(&self) -> f64 {
        (self.w1 + self.w2) / 2.0 * (self.x2 - self.x1)
    }

    /// Distance from node 1 to the load resultant
    pub fn centroid(&self) -> f64 {
        let span = self.x2 - self.x1;
        let sum = self.w1 + self.w2;
        if sum.abs() < 1e-300 {
            return self.x1 + span / 2.0;
        }
        self.x1 + span * (self.w1 + 2.0 * self.w2) / (3.0 * sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangular_resultant() {
        let load = TrapezoidalLoad::new(1, LocalAxis::Y, 0.0, 3.0, 0.0, 2.0);
        assert!((load.total_force() - 3.0).abs() < 1e-12);
        assert!((load.centroid() - 2.0).abs() < 1e-12);
        assert!(!load.is_uniform());
    }
}
