//! Frame Solver - A native Rust 3D frame analysis library
//!
//! Beam-element frame analysis in the Frame3DD tradition, supporting:
//! - Euler-Bernoulli or Timoshenko (shear-deformable) frame elements
//! - Point, uniform, trapezoidal, span, thermal and self-weight loads
//! - Prescribed support displacements
//! - Linear static analysis and geometric-stiffness iteration
//! - Internal force and deflection distributions along elements
//! - Modal analysis (subspace iteration or Stodola)
//! - Static, dynamic and modal condensation
//!
//! ## Example
//! ```rust
//! use frame_solver::prelude::*;
//!
//! let mut builder = Model::builder();
//! builder.add_node(Node::new(1, 0.0, 0.0, 0.0)).unwrap();
//! builder.add_node(Node::new(2, 4.0, 0.0, 0.0)).unwrap();
//! builder
//!     .add_element(Element::new(1, 1, 2, Section::rectangular(0.1, 0.2), Material::steel()))
//!     .unwrap();
//! builder.add_reaction(Reaction::fixed(1)).unwrap();
//! let model = builder.build().unwrap();
//!
//! let case = LoadCase::new().with_node_load(NodeLoad::force(2, 0.0, 0.0, -10_000.0));
//! let result = model.solve_static(&case).unwrap();
//!
//! let tip = result.displacement(2).unwrap();
//! assert!(tip.dz < 0.0);
//! ```

pub mod analysis;
pub mod assembly;
pub mod condensation;
pub mod elements;
pub mod error;
pub mod internal_forces;
pub mod loads;
pub mod mass;
pub mod math;
pub mod modal;
pub mod model;
pub mod results;
pub mod solver;
pub mod static_analysis;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{
        AddedInertia, AddedMass, AnalysisOptions, CondensationMethod, CondensationSpec,
        DynamicConfig, ModalMethod, RetainedDofs,
    };
    pub use crate::condensation::{CondensedDof, CondensedMode, CondensedModel};
    pub use crate::elements::{Element, ElementId, Material, Node, NodeId, Reaction, Section};
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::loads::{
        LoadCase, LocalAxis, NodeLoad, PrescribedDisplacement, SpanLoad, ThermalLoad,
        TrapezoidalLoad, UniformLoad,
    };
    pub use crate::mass::{MassSummary, NodeMass};
    pub use crate::modal::{ModalAnalysis, ModalResult};
    pub use crate::model::{Model, ModelBuilder};
    pub use crate::results::{
        AnalysisSummary, ElementEndForces, InternalForcePoint, InternalForceSeries,
        NodeDisplacement, ReactionForce, StaticResult,
    };
}
