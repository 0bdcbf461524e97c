//! Frame model - validated geometry, topology and restraints

use std::collections::HashMap;

use log::debug;

use crate::analysis::AnalysisOptions;
use crate::elements::{Element, ElementId, Node, NodeId, Reaction};
use crate::error::{FrameError, FrameResult};
use crate::math::{self, Mat12, Mat3};

/// Degrees of freedom per node: DX, DY, DZ, RX, RY, RZ
pub const DOF_PER_NODE: usize = 6;

/// Derived element geometry, computed once at build time
#[derive(Debug, Clone)]
pub struct ElementGeometry {
    /// Index of node 1 in the model's node list
    pub i: usize,
    /// Index of node 2 in the model's node list
    pub j: usize,
    /// Node-to-node length
    pub length: f64,
    /// Flexible length, node distance minus both rigid joint radii
    pub effective_length: f64,
    /// Local axes as rows, in global components
    pub rotation: Mat3,
    /// 12x12 block-diagonal transformation
    pub transform: Mat12,
}

impl ElementGeometry {
    /// Global DOF numbers of the element's twelve local DOFs
    pub fn dofs(&self) -> [usize; 12] {
        let mut dofs = [0; 12];
        for k in 0..DOF_PER_NODE {
            dofs[k] = self.i * DOF_PER_NODE + k;
            dofs[k + DOF_PER_NODE] = self.j * DOF_PER_NODE + k;
        }
        dofs
    }
}

/// A validated, immutable frame model
///
/// Analyses borrow the model read-only, so one model can serve many load
/// cases and modal runs concurrently.
#[derive(Debug, Clone)]
pub struct Model {
    nodes: Vec<Node>,
    node_index: HashMap<NodeId, usize>,
    elements: Vec<Element>,
    element_index: HashMap<ElementId, usize>,
    geometry: Vec<ElementGeometry>,
    reactions: Vec<Reaction>,
    restraints: Vec<[bool; 6]>,
    options: AnalysisOptions,
}

impl Model {
    /// Build a model from complete node, reaction and element lists
    pub fn build(
        nodes: Vec<Node>,
        reactions: Vec<Reaction>,
        elements: Vec<Element>,
        options: AnalysisOptions,
    ) -> FrameResult<Self> {
        options.validate().map_err(FrameError::InputValidation)?;
        if nodes.is_empty() {
            return Err(FrameError::invalid("model has no nodes"));
        }

        let mut node_index = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            validate_node(node)?;
            if node_index.insert(node.id, idx).is_some() {
                return Err(FrameError::invalid(format!("duplicate node id {}", node.id)));
            }
        }

        let mut restraints = vec![[false; 6]; nodes.len()];
        let mut supported = vec![false; nodes.len()];
        for reaction in &reactions {
            let idx = *node_index
                .get(&reaction.node)
                .ok_or(FrameError::NodeNotFound(reaction.node))?;
            if supported[idx] {
                return Err(FrameError::invalid(format!(
                    "node {} has more than one reaction record",
                    reaction.node
                )));
            }
            supported[idx] = true;
            restraints[idx] = reaction.as_array();
        }

        let mut element_index = HashMap::with_capacity(elements.len());
        let mut geometry = Vec::with_capacity(elements.len());
        for (idx, element) in elements.iter().enumerate() {
            if element_index.insert(element.id, idx).is_some() {
                return Err(FrameError::invalid(format!("duplicate element id {}", element.id)));
            }
            geometry.push(element_geometry(element, &nodes, &node_index, options.shear)?);
        }

        debug!(
            "built model: {} nodes, {} elements, {} supported nodes",
            nodes.len(),
            elements.len(),
            reactions.len()
        );

        Ok(Self {
            nodes,
            node_index,
            elements,
            element_index,
            geometry,
            reactions,
            restraints,
            options,
        })
    }

    /// Start an incremental model definition
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    // ========================
    // Accessors
    // ========================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Geometry of the element at `idx` (position in `elements()`)
    pub fn geometry(&self, idx: usize) -> &ElementGeometry {
        &self.geometry[idx]
    }

    /// Restraint flags per node, in node order
    pub fn restraints(&self) -> &[[bool; 6]] {
        &self.restraints
    }

    /// Total number of DOFs (6 per node)
    pub fn num_dofs(&self) -> usize {
        self.nodes.len() * DOF_PER_NODE
    }

    /// Position of a node in `nodes()`
    pub fn node_index(&self, id: NodeId) -> FrameResult<usize> {
        self.node_index.get(&id).copied().ok_or(FrameError::NodeNotFound(id))
    }

    /// Position of an element in `elements()`
    pub fn element_index(&self, id: ElementId) -> FrameResult<usize> {
        self.element_index
            .get(&id)
            .copied()
            .ok_or(FrameError::ElementNotFound(id))
    }

    /// Get a node by id
    pub fn node(&self, id: NodeId) -> FrameResult<&Node> {
        Ok(&self.nodes[self.node_index(id)?])
    }

    /// Get an element by id
    pub fn element(&self, id: ElementId) -> FrameResult<&Element> {
        Ok(&self.elements[self.element_index(id)?])
    }

    /// Global DOF number of component `k` of node `id`
    pub fn dof(&self, id: NodeId, k: usize) -> FrameResult<usize> {
        Ok(self.node_index(id)? * DOF_PER_NODE + k)
    }

    /// Copy of this model analysed with different options
    pub fn with_options(&self, options: AnalysisOptions) -> FrameResult<Self> {
        Self::build(
            self.nodes.clone(),
            self.reactions.clone(),
            self.elements.clone(),
            options,
        )
    }
}

fn validate_node(node: &Node) -> FrameResult<()> {
    if !node.coords().iter().all(|c| c.is_finite()) {
        return Err(FrameError::invalid(format!(
            "node {} has non-finite coordinates",
            node.id
        )));
    }
    if node.radius.is_nan() || node.radius < 0.0 {
        return Err(FrameError::invalid(format!(
            "node {} has negative rigid radius {}",
            node.id, node.radius
        )));
    }
    Ok(())
}

fn element_geometry(
    element: &Element,
    nodes: &[Node],
    node_index: &HashMap<NodeId, usize>,
    shear: bool,
) -> FrameResult<ElementGeometry> {
    if element.n1 == element.n2 {
        return Err(FrameError::invalid(format!(
            "element {} connects node {} to itself",
            element.id, element.n1
        )));
    }
    let i = *node_index
        .get(&element.n1)
        .ok_or(FrameError::NodeNotFound(element.n1))?;
    let j = *node_index
        .get(&element.n2)
        .ok_or(FrameError::NodeNotFound(element.n2))?;

    element
        .material
        .validate()
        .map_err(|msg| FrameError::invalid(format!("element {}: {msg}", element.id)))?;
    element
        .section
        .validate(shear)
        .map_err(|msg| FrameError::invalid(format!("element {}: {msg}", element.id)))?;
    if !element.roll.is_finite() {
        return Err(FrameError::invalid(format!(
            "element {} has a non-finite roll angle",
            element.id
        )));
    }

    let (n1, n2) = (&nodes[i], &nodes[j]);
    let rotation = math::rotation_matrix(&n1.position(), &n2.position(), element.roll)
        .ok_or(FrameError::DegenerateElement { element: element.id })?;
    let length = n1.distance_to(n2);
    let effective_length = length - n1.radius - n2.radius;
    if effective_length <= 0.0 {
        return Err(FrameError::invalid(format!(
            "element {}: rigid joint radii ({} + {}) leave no flexible length (L = {length})",
            element.id, n1.radius, n2.radius
        )));
    }

    Ok(ElementGeometry {
        i,
        j,
        length,
        effective_length,
        rotation,
        transform: math::transformation_matrix(&rotation),
    })
}

/// Incremental model definition with the same validation as `Model::build`
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    nodes: Vec<Node>,
    reactions: Vec<Reaction>,
    elements: Vec<Element>,
    options: AnalysisOptions,
}

impl ModelBuilder {
    /// Create a new empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the model
    pub fn add_node(&mut self, node: Node) -> FrameResult<()> {
        if self.nodes.iter().any(|n| n.id == node.id) {
            return Err(FrameError::invalid(format!("duplicate node id {}", node.id)));
        }
        validate_node(&node)?;
        self.nodes.push(node);
        Ok(())
    }

    /// Add an element between two existing nodes
    pub fn add_element(&mut self, element: Element) -> FrameResult<()> {
        for id in [element.n1, element.n2] {
            if !self.nodes.iter().any(|n| n.id == id) {
                return Err(FrameError::NodeNotFound(id));
            }
        }
        if self.elements.iter().any(|e| e.id == element.id) {
            return Err(FrameError::invalid(format!(
                "duplicate element id {}",
                element.id
            )));
        }
        self.elements.push(element);
        Ok(())
    }

    /// Add a reaction at an existing node
    pub fn add_reaction(&mut self, reaction: Reaction) -> FrameResult<()> {
        if !self.nodes.iter().any(|n| n.id == reaction.node) {
            return Err(FrameError::NodeNotFound(reaction.node));
        }
        if self.reactions.iter().any(|r| r.node == reaction.node) {
            return Err(FrameError::invalid(format!(
                "node {} has more than one reaction record",
                reaction.node
            )));
        }
        self.reactions.push(reaction);
        Ok(())
    }

    /// Set the analysis options
    pub fn options(&mut self, options: AnalysisOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Validate everything and produce the model
    pub fn build(self) -> FrameResult<Model> {
        Model::build(self.nodes, self.reactions, self.elements, self.options)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::elements::{Material, Section};

    pub(crate) fn beam_element(id: ElementId, n1: NodeId, n2: NodeId) -> Element {
        Element::new(id, n1, n2, Section::rectangular(0.1, 0.2), Material::steel())
    }

    #[test]
    fn test_builder_rejects_duplicates() {
        let mut builder = Model::builder();
        builder.add_node(Node::new(1, 0.0, 0.0, 0.0)).unwrap();
        assert!(builder.add_node(Node::new(1, 1.0, 0.0, 0.0)).is_err());
        builder.add_node(Node::new(2, 1.0, 0.0, 0.0)).unwrap();
        builder.add_reaction(Reaction::fixed(1)).unwrap();
        assert!(builder.add_reaction(Reaction::pinned(1)).is_err());
        assert_eq!(
            builder.add_element(beam_element(1, 1, 3)),
            Err(FrameError::NodeNotFound(3))
        );
    }

    #[test]
    fn test_zero_length_element() {
        let result = Model::build(
            vec![Node::new(1, 0.0, 0.0, 0.0), Node::new(2, 0.0, 0.0, 0.0)],
            vec![Reaction::fixed(1)],
            vec![beam_element(7, 1, 2)],
            AnalysisOptions::default(),
        );
        assert_eq!(result.unwrap_err(), FrameError::DegenerateElement { element: 7 });
    }

    #[test]
    fn test_rigid_radius_shortens_flexible_length() {
        let model = Model::build(
            vec![
                Node::new(1, 0.0, 0.0, 0.0).with_radius(0.25),
                Node::new(2, 3.0, 4.0, 0.0),
            ],
            vec![Reaction::fixed(1)],
            vec![beam_element(1, 1, 2)],
            AnalysisOptions::default(),
        )
        .unwrap();
        let geom = model.geometry(0);
        assert!((geom.length - 5.0).abs() < 1e-12);
        assert!((geom.effective_length - 4.75).abs() < 1e-12);
        assert_eq!(geom.dofs()[6], 6);
    }

    #[test]
    fn test_radii_consuming_element_rejected() {
        let result = Model::build(
            vec![
                Node::new(1, 0.0, 0.0, 0.0).with_radius(0.6),
                Node::new(2, 1.0, 0.0, 0.0).with_radius(0.6),
            ],
            vec![],
            vec![beam_element(1, 1, 2)],
            AnalysisOptions::default(),
        );
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_reaction_on_missing_node() {
        let result = Model::build(
            vec![Node::new(1, 0.0, 0.0, 0.0), Node::new(2, 1.0, 0.0, 0.0)],
            vec![Reaction::fixed(9)],
            vec![beam_element(1, 1, 2)],
            AnalysisOptions::default(),
        );
        assert_eq!(result.unwrap_err(), FrameError::NodeNotFound(9));
    }
}
