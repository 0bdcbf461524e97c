//! Section properties for frame elements

use serde::{Deserialize, Serialize};

/// Cross-section properties for frame elements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area
    pub ax: f64,
    /// Effective shear area in local y direction
    pub asy: f64,
    /// Effective shear area in local z direction
    pub asz: f64,
    /// Torsional constant
    pub jx: f64,
    /// Moment of inertia about local y-axis
    pub iy: f64,
    /// Moment of inertia about local z-axis
    pub iz: f64,
}

impl Section {
    /// Create a new section with all properties given explicitly
    pub fn new(ax: f64, asy: f64, asz: f64, jx: f64, iy: f64, iz: f64) -> Self {
        Self {
            ax,
            asy,
            asz,
            jx,
            iy,
            iz,
        }
    }

    /// Create a solid rectangular section
    ///
    /// `width` runs along local y, `depth` along local z.
    pub fn rectangular(width: f64, depth: f64) -> Self {
        let ax = width * depth;
        let iy = width * depth.powi(3) / 12.0;
        let iz = depth * width.powi(3) / 12.0;

        // Torsional constant for rectangle (approximate)
        let (a_dim, b_dim) = if width > depth { (width, depth) } else { (depth, width) };
        let jx = a_dim * b_dim.powi(3) / 3.0 * (1.0 - 0.63 * b_dim / a_dim);

        Self {
            ax,
            asy: ax * 5.0 / 6.0,
            asz: ax * 5.0 / 6.0,
            jx,
            iy,
            iz,
        }
    }

    /// Create a solid circular section
    pub fn circular(diameter: f64) -> Self {
        let r = diameter / 2.0;
        let ax = std::f64::consts::PI * r.powi(2);
        let i = std::f64::consts::PI * r.powi(4) / 4.0;

        Self {
            ax,
            asy: 0.9 * ax,
            asz: 0.9 * ax,
            jx: 2.0 * i,
            iy: i,
            iz: i,
        }
    }

    /// Create a thin-walled circular tube
    pub fn tube(outer_diameter: f64, wall_thickness: f64) -> Self {
        let r_o = outer_diameter / 2.0;
        let r_i = r_o - wall_thickness;
        let ax = std::f64::consts::PI * (r_o.powi(2) - r_i.powi(2));
        let i = std::f64::consts::PI * (r_o.powi(4) - r_i.powi(4)) / 4.0;

        Self {
            ax,
            asy: 0.5 * ax,
            asz: 0.5 * ax,
            jx: 2.0 * i,
            iy: i,
            iz: i,
        }
    }

    /// Get the polar moment of inertia
    pub fn ip(&self) -> f64 {
        self.iy + self.iz
    }

    /// Check that every property is usable by the stiffness formulation
    pub(crate) fn validate(&self, shear: bool) -> Result<(), String> {
        let positive = [
            ("Ax", self.ax),
            ("Jx", self.jx),
            ("Iy", self.iy),
            ("Iz", self.iz),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(format!("section property {name} must be positive, got {value}"));
            }
        }
        if shear && !(self.asy > 0.0 && self.asz > 0.0) {
            return Err(format!(
                "shear areas must be positive when shear deformation is enabled (Asy={}, Asz={})",
                self.asy, self.asz
            ));
        }
        Ok(())
    }
}

impl Default for Section {
    fn default() -> Self {
        // 200mm x 200mm rectangle
        Self::rectangular(0.2, 0.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_section() {
        let section = Section::rectangular(0.3, 0.5);
        let expected_a = 0.3 * 0.5;
        let expected_iy = 0.3 * 0.5_f64.powi(3) / 12.0;

        assert!((section.ax - expected_a).abs() < 1e-10);
        assert!((section.iy - expected_iy).abs() < 1e-10);
        assert!((section.asy - expected_a * 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_circular_section() {
        let section = Section::circular(0.5);
        let r: f64 = 0.25;
        let expected_a = std::f64::consts::PI * r.powi(2);

        assert!((section.ax - expected_a).abs() < 1e-10);
        assert!((section.iy - section.iz).abs() < 1e-10);
        assert!((section.jx - section.ip()).abs() < 1e-12);
    }

    #[test]
    fn test_shear_areas_required_only_with_shear() {
        let section = Section::new(1.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        assert!(section.validate(false).is_ok());
        assert!(section.validate(true).is_err());
    }
}
