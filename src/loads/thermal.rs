//! Thermal loads - temperature changes across element sections

use serde::{Deserialize, Serialize};

use crate::elements::ElementId;

/// Temperature change on the four faces of an element's section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalLoad {
    /// Loaded element
    pub element: ElementId,
    /// Coefficient of thermal expansion
    pub alpha: f64,
    /// Section depth along local y
    pub hy: f64,
    /// Section depth along local z
    pub hz: f64,
    /// Temperature change on the +y face
    pub ty_pos: f64,
    /// Temperature change on the -y face
    pub ty_neg: f64,
    /// Temperature change on the +z face
    pub tz_pos: f64,
    /// Temperature change on the -z face
    pub tz_neg: f64,
}

impl ThermalLoad {
    /// Create a new thermal load
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        element: ElementId,
        alpha: f64,
        hy: f64,
        hz: f64,
        ty_pos: f64,
        ty_neg: f64,
        tz_pos: f64,
        tz_neg: f64,
    ) -> Self {
        Self {
            element,
            alpha,
            hy,
            hz,
            ty_pos,
            ty_neg,
            tz_pos,
            tz_neg,
        }
    }

    /// Uniform temperature change over the whole section
    pub fn uniform(element: ElementId, alpha: f64, hy: f64, hz: f64, delta_t: f64) -> Self {
        Self::new(element, alpha, hy, hz, delta_t, delta_t, delta_t, delta_t)
    }

    /// Free axial strain
    pub fn axial_strain(&self) -> f64 {
        self.alpha * (self.ty_pos + self.ty_neg + self.tz_pos + self.tz_neg) / 4.0
    }

    /// Free rate of change of the rotation about local z (d theta_z / dx)
    pub fn curvature_z(&self) -> f64 {
        -self.alpha * (self.ty_pos - self.ty_neg) / self.hy
    }

    /// Free rate of change of the rotation about local y (d theta_y / dx)
    pub fn curvature_y(&self) -> f64 {
        self.alpha * (self.tz_pos - self.tz_neg) / self.hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_temperature_has_no_curvature() {
        let load = ThermalLoad::uniform(1, 1.2e-5, 0.3, 0.3, 40.0);
        assert!((load.axial_strain() - 4.8e-4).abs() < 1e-15);
        assert_eq!(load.curvature_y(), 0.0);
        assert_eq!(load.curvature_z(), 0.0);
    }

    #[test]
    fn test_hot_top_face_curves_down() {
        let load = ThermalLoad::new(1, 1e-5, 0.5, 0.5, 0.0, 0.0, 20.0, 0.0);
        // Hot +z face: w'' < 0, so theta_y' = -w'' > 0
        assert!(load.curvature_y() > 0.0);
    }
}
