//! Load cases

use serde::{Deserialize, Serialize};

use super::{NodeLoad, PrescribedDisplacement, SpanLoad, ThermalLoad, TrapezoidalLoad, UniformLoad};

/// A load case groups every load applied in one static analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    /// Gravitational acceleration [gx, gy, gz]; produces self-weight
    #[serde(default)]
    pub gravity: [f64; 3],
    /// Concentrated nodal forces and moments
    #[serde(default)]
    pub node_loads: Vec<NodeLoad>,
    /// Uniform loads over full elements
    #[serde(default)]
    pub uniform_loads: Vec<UniformLoad>,
    /// Partial trapezoidal loads
    #[serde(default)]
    pub trapezoidal_loads: Vec<TrapezoidalLoad>,
    /// Concentrated loads along element spans
    #[serde(default)]
    pub span_loads: Vec<SpanLoad>,
    /// Temperature loads
    #[serde(default)]
    pub thermal_loads: Vec<ThermalLoad>,
    /// Enforced displacements at restrained DOFs
    #[serde(default)]
    pub prescribed: Vec<PrescribedDisplacement>,
}

impl LoadCase {
    /// Create an empty load case
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gravitational acceleration
    pub fn with_gravity(mut self, gx: f64, gy: f64, gz: f64) -> Self {
        self.gravity = [gx, gy, gz];
        self
    }

    /// Add a node load
    pub fn with_node_load(mut self, load: NodeLoad) -> Self {
        self.node_loads.push(load);
        self
    }

    /// Add a uniform element load
    pub fn with_uniform_load(mut self, load: UniformLoad) -> Self {
        self.uniform_loads.push(load);
        self
    }

    /// Add a trapezoidal element load
    pub fn with_trapezoidal_load(mut self, load: TrapezoidalLoad) -> Self {
        self.trapezoidal_loads.push(load);
        self
    }

    /// Add a concentrated span load
    pub fn with_span_load(mut self, load: SpanLoad) -> Self {
        self.span_loads.push(load);
        self
    }

    /// Add a thermal load
    pub fn with_thermal_load(mut self, load: ThermalLoad) -> Self {
        self.thermal_loads.push(load);
        self
    }

    /// Add a prescribed displacement
    pub fn with_prescribed(mut self, displacement: PrescribedDisplacement) -> Self {
        self.prescribed.push(displacement);
        self
    }

    /// True if gravity is non-zero
    pub fn has_gravity(&self) -> bool {
        self.gravity.iter().any(|g| *g != 0.0)
    }
}
