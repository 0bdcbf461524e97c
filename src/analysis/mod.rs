//! Analysis options and dynamic configuration

mod condensation;
mod dynamic;

use serde::{Deserialize, Serialize};

pub use condensation::{CondensationMethod, CondensationSpec, RetainedDofs};
pub use dynamic::{AddedInertia, AddedMass, DynamicConfig, ModalMethod};

/// Options for static analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Include shear deformation (Timoshenko beam theory)
    pub shear: bool,
    /// Include geometric stiffness (iterated on element axial forces)
    pub geometric: bool,
    /// Display scale for deformed shapes; carried through for consumers
    pub exaggeration: f64,
    /// Sampling increment along elements for internal forces
    pub dx: f64,
    /// Convergence tolerance of the geometric stiffness iteration
    pub tolerance: f64,
    /// Maximum iterations of the geometric stiffness iteration
    pub max_iterations: usize,
    /// Solve independent load cases on the rayon thread pool
    pub parallel: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            shear: false,
            geometric: false,
            exaggeration: 1.0,
            dx: 1.0,
            tolerance: 1e-9,
            max_iterations: 50,
            parallel: true,
        }
    }
}

impl AnalysisOptions {
    /// Create options for a first-order elastic analysis
    pub fn linear() -> Self {
        Self::default()
    }

    /// Create options with geometric stiffness enabled
    pub fn geometric() -> Self {
        Self {
            geometric: true,
            ..Self::default()
        }
    }

    /// Enable or disable shear deformation
    pub fn with_shear(mut self, shear: bool) -> Self {
        self.shear = shear;
        self
    }

    /// Enable or disable geometric stiffness
    pub fn with_geometric(mut self, geometric: bool) -> Self {
        self.geometric = geometric;
        self
    }

    /// Set the internal force sampling increment
    pub fn with_dx(mut self, dx: f64) -> Self {
        self.dx = dx;
        self
    }

    /// Set the display scale
    pub fn with_exaggeration(mut self, exaggeration: f64) -> Self {
        self.exaggeration = exaggeration;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Solve load cases sequentially
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(self.dx > 0.0) || !self.dx.is_finite() {
            return Err(format!("internal force increment dx must be positive, got {}", self.dx));
        }
        if self.geometric {
            if !(self.tolerance > 0.0) {
                return Err(format!("tolerance must be positive, got {}", self.tolerance));
            }
            if self.max_iterations == 0 {
                return Err("max_iterations must be at least 1".to_string());
            }
        }
        Ok(())
    }
}
