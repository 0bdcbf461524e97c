//! Structural elements module

mod element;
mod material;
mod node;
mod reaction;
mod section;

pub use element::{Element, ElementId};
pub use material::Material;
pub use node::{Node, NodeId};
pub use reaction::Reaction;
pub use section::Section;
