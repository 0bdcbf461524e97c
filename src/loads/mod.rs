//! Load types and load cases

mod distributed;
mod load_case;
mod node_load;
mod point_load;
mod prescribed;
mod thermal;

pub use distributed::{TrapezoidalLoad, UniformLoad};
pub use load_case::LoadCase;
pub use node_load::NodeLoad;
pub use point_load::{LocalAxis, SpanLoad};
pub use prescribed::PrescribedDisplacement;
pub use thermal::ThermalLoad;
