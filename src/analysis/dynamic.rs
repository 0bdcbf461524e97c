//! Modal analysis configuration and extra inertia

use serde::{Deserialize, Serialize};

use crate::elements::{ElementId, NodeId};

/// Eigen-extraction method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModalMethod {
    /// Subspace iteration with a Rayleigh-Ritz projection
    #[default]
    Subspace,
    /// Stodola matrix iteration with mass-orthogonal deflation
    Stodola,
}

/// Options for modal analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicConfig {
    /// Number of modes to extract
    pub modes: usize,
    /// Extraction method
    pub method: ModalMethod,
    /// Lumped (true) or consistent (false) mass
    pub lumped: bool,
    /// Relative eigenvalue convergence tolerance
    pub tolerance: f64,
    /// Eigenvalue shift; K + shift*M is factorized (needed for free-floating models)
    pub shift: f64,
    /// Display scale for mode shapes; carried through for consumers
    pub exaggeration: f64,
    /// Iteration budget of the eigen-extraction
    pub max_iterations: usize,
}

impl Default for DynamicConfig {
    fn default() -> Self {
        Self {
            modes: 6,
            method: ModalMethod::Subspace,
            lumped: false,
            tolerance: 1e-9,
            shift: 0.0,
            exaggeration: 1.0,
            max_iterations: 200,
        }
    }
}

impl DynamicConfig {
    /// Create a config extracting `modes` modes with default settings
    pub fn modes(modes: usize) -> Self {
        Self {
            modes,
            ..Self::default()
        }
    }

    /// Select the extraction method
    pub fn with_method(mut self, method: ModalMethod) -> Self {
        self.method = method;
        self
    }

    /// Use lumped mass
    pub fn lumped(mut self) -> Self {
        self.lumped = true;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Set the eigenvalue shift
    pub fn with_shift(mut self, shift: f64) -> Self {
        self.shift = shift;
        self
    }

    /// Set the iteration budget
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.modes == 0 {
            return Err("at least one mode must be requested".to_string());
        }
        if !(self.tolerance > 0.0) {
            return Err(format!("modal tolerance must be positive, got {}", self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err("modal max_iterations must be at least 1".to_string());
        }
        if !self.shift.is_finite() {
            return Err("modal shift must be finite".to_string());
        }
        Ok(())
    }
}

/// Extra mass and rotary inertia concentrated at a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AddedInertia {
    /// Node
    pub node: NodeId,
    /// Translational mass
    pub mass: f64,
    /// Rotary inertia about global X
    pub ixx: f64,
    /// Rotary inertia about global Y
    pub iyy: f64,
    /// Rotary inertia about global Z
    pub izz: f64,
}

impl AddedInertia {
    /// Create a new nodal inertia
    pub fn new(node: NodeId, mass: f64, ixx: f64, iyy: f64, izz: f64) -> Self {
        Self {
            node,
            mass,
            ixx,
            iyy,
            izz,
        }
    }

    /// Point mass without rotary inertia
    pub fn point_mass(node: NodeId, mass: f64) -> Self {
        Self::new(node, mass, 0.0, 0.0, 0.0)
    }
}

/// Extra non-structural mass carried by an element, lumped at its ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AddedMass {
    /// Element
    pub element: ElementId,
    /// Total extra mass of the element
    pub mass: f64,
}

impl AddedMass {
    /// Create a new element mass
    pub fn new(element: ElementId, mass: f64) -> Self {
        Self { element, mass }
    }
}
