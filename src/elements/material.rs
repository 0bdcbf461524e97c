//! Material properties

use serde::{Deserialize, Serialize};

/// Elastic material properties of a frame element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity
    pub e: f64,
    /// Shear modulus
    pub g: f64,
    /// Mass density (mass per unit volume)
    pub density: f64,
}

impl Material {
    /// Create a new material with given properties
    pub fn new(e: f64, g: f64, density: f64) -> Self {
        Self { e, g, density }
    }

    /// Create a new isotropic material from E and nu
    /// G is calculated as E / (2 * (1 + nu))
    pub fn isotropic(e: f64, nu: f64, density: f64) -> Self {
        let g = e / (2.0 * (1.0 + nu));
        Self::new(e, g, density)
    }

    /// Structural steel in SI units (Pa, kg/m³)
    pub fn steel() -> Self {
        Self {
            e: 200e9,
            g: 77e9,
            density: 7850.0,
        }
    }

    /// Aluminum 6061-T6 in SI units
    pub fn aluminum() -> Self {
        Self {
            e: 68.9e9,
            g: 26e9,
            density: 2700.0,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(self.e > 0.0) || !(self.g > 0.0) {
            return Err(format!(
                "elastic and shear moduli must be positive (E={}, G={})",
                self.e, self.g
            ));
        }
        if !(self.density >= 0.0) {
            return Err(format!("density must be non-negative, got {}", self.density));
        }
        Ok(())
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isotropic_material() {
        let mat = Material::isotropic(200e9, 0.3, 7850.0);
        let expected_g = 200e9 / (2.0 * 1.3);
        assert!((mat.g - expected_g).abs() < 1.0);
    }

    #[test]
    fn test_negative_density_rejected() {
        let mat = Material::new(1.0, 1.0, -1.0);
        assert!(mat.validate().is_err());
    }
}
