//! Frame element - 3D beam-column between two nodes

use serde::{Deserialize, Serialize};

use super::{Material, NodeId, Section};

/// Caller-assigned element identifier
pub type ElementId = u32;

/// A 3D frame element (beam or column)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Caller-assigned identifier
    pub id: ElementId,
    /// Start node (node 1)
    pub n1: NodeId,
    /// End node (node 2)
    pub n2: NodeId,
    /// Cross-section properties
    pub section: Section,
    /// Material properties
    pub material: Material,
    /// Roll angle about the longitudinal axis (radians)
    #[serde(default)]
    pub roll: f64,
}

impl Element {
    /// Create a new element with zero roll
    pub fn new(id: ElementId, n1: NodeId, n2: NodeId, section: Section, material: Material) -> Self {
        Self {
            id,
            n1,
            n2,
            section,
            material,
            roll: 0.0,
        }
    }

    /// Set the roll angle about the longitudinal axis
    pub fn with_roll(mut self, roll: f64) -> Self {
        self.roll = roll;
        self
    }

    /// Mass per unit length
    pub fn mass_per_length(&self) -> f64 {
        self.material.density * self.section.ax
    }

    /// Shear deformation factors (phi_y, phi_z) for a flexible length
    ///
    /// phi_y governs bending in the local x-y plane, phi_z in the x-z plane.
    pub fn shear_factors(&self, length: f64, shear: bool) -> (f64, f64) {
        if !shear {
            return (0.0, 0.0);
        }
        let s = &self.section;
        let m = &self.material;
        let l2 = length * length;
        (
            12.0 * m.e * s.iz / (m.g * s.asy * l2),
            12.0 * m.e * s.iy / (m.g * s.asz * l2),
        )
    }
}
