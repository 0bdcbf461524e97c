//! Result types for frame analysis

use serde::{Deserialize, Serialize};

use crate::elements::{ElementId, NodeId};
use crate::math::Vec12;

/// Displacement results at a node, in global axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    pub node: NodeId,
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Displacement in Z direction
    pub dz: f64,
    /// Rotation about X axis
    pub rx: f64,
    /// Rotation about Y axis
    pub ry: f64,
    /// Rotation about Z axis
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, DZ, RX, RY, RZ]
    pub fn from_array(node: NodeId, arr: [f64; 6]) -> Self {
        Self {
            node,
            dx: arr[0],
            dy: arr[1],
            dz: arr[2],
            rx: arr[3],
            ry: arr[4],
            rz: arr[5],
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }

    /// Get rotation magnitude
    pub fn rotation_magnitude(&self) -> f64 {
        (self.rx.powi(2) + self.ry.powi(2) + self.rz.powi(2)).sqrt()
    }
}

/// Reaction forces at a supported node, in global axes
///
/// Components along unrestrained directions are zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionForce {
    pub node: NodeId,
    /// Reaction force in X direction
    pub fx: f64,
    /// Reaction force in Y direction
    pub fy: f64,
    /// Reaction force in Z direction
    pub fz: f64,
    /// Reaction moment about X axis
    pub mx: f64,
    /// Reaction moment about Y axis
    pub my: f64,
    /// Reaction moment about Z axis
    pub mz: f64,
}

impl ReactionForce {
    /// Create from array [FX, FY, FZ, MX, MY, MZ]
    pub fn from_array(node: NodeId, arr: [f64; 6]) -> Self {
        Self {
            node,
            fx: arr[0],
            fy: arr[1],
            fz: arr[2],
            mx: arr[3],
            my: arr[4],
            mz: arr[5],
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }

    /// Get total force magnitude
    pub fn force_magnitude(&self) -> f64 {
        (self.fx.powi(2) + self.fy.powi(2) + self.fz.powi(2)).sqrt()
    }

    /// Get total moment magnitude
    pub fn moment_magnitude(&self) -> f64 {
        (self.mx.powi(2) + self.my.powi(2) + self.mz.powi(2)).sqrt()
    }
}

/// Forces acting on an element at its two ends, in local axes
///
/// Each end holds [Nx, Vy, Vz, Tx, My, Mz] as forces exerted by the node on
/// the element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementEndForces {
    pub element: ElementId,
    pub n1: NodeId,
    pub n2: NodeId,
    pub start: [f64; 6],
    pub end: [f64; 6],
}

impl ElementEndForces {
    /// Create from the local 12-component end force vector
    pub fn from_local(element: ElementId, n1: NodeId, n2: NodeId, f: &Vec12) -> Self {
        let mut start = [0.0; 6];
        let mut end = [0.0; 6];
        start.copy_from_slice(&f.as_slice()[..6]);
        end.copy_from_slice(&f.as_slice()[6..]);
        Self {
            element,
            n1,
            n2,
            start,
            end,
        }
    }

    /// Local 12-component end force vector
    pub fn as_vector(&self) -> Vec12 {
        Vec12::from_fn(|k, _| if k < 6 { self.start[k] } else { self.end[k - 6] })
    }

    /// Mean axial force, positive in tension
    pub fn axial_tension(&self) -> f64 {
        (self.end[0] - self.start[0]) / 2.0
    }
}

/// Internal forces and local deflections at one point along an element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InternalForcePoint {
    /// Distance from node 1
    pub x: f64,
    /// Axial force (positive = tension)
    pub nx: f64,
    /// Shear force in local y direction
    pub vy: f64,
    /// Shear force in local z direction
    pub vz: f64,
    /// Torsion
    pub tx: f64,
    /// Bending moment about local y axis
    pub my: f64,
    /// Bending moment about local z axis
    pub mz: f64,
    /// Axial displacement
    pub dx: f64,
    /// Transverse displacement along local y
    pub dy: f64,
    /// Transverse displacement along local z
    pub dz: f64,
    /// Twist about the element axis
    pub rx: f64,
}

/// Sampled internal forces along one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalForceSeries {
    pub element: ElementId,
    pub points: Vec<InternalForcePoint>,
}

impl InternalForceSeries {
    fn peak(&self, f: impl Fn(&InternalForcePoint) -> f64) -> f64 {
        self.points.iter().map(|p| f(p).abs()).fold(0.0, f64::max)
    }

    /// Largest absolute axial force along the element
    pub fn max_axial(&self) -> f64 {
        self.peak(|p| p.nx)
    }

    /// Largest absolute bending moment about either local axis
    pub fn max_moment(&self) -> f64 {
        self.peak(|p| p.my).max(self.peak(|p| p.mz))
    }

    /// Largest transverse deflection magnitude
    pub fn max_deflection(&self) -> f64 {
        self.peak(|p| p.dy.hypot(p.dz))
    }
}

/// Results of one static load case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticResult {
    /// Displacements at every node, in node order
    pub displacements: Vec<NodeDisplacement>,
    /// End forces of every element, in element order
    pub end_forces: Vec<ElementEndForces>,
    /// Reactions at every supported node
    pub reactions: Vec<ReactionForce>,
    /// Internal force distributions, in element order
    pub internal_forces: Vec<InternalForceSeries>,
    /// Number of solves performed (1 for a linear analysis)
    pub iterations: usize,
    /// Relative residual of the final solve
    pub equilibrium_error: f64,
    /// Display scale for deformed shapes
    pub exaggeration: f64,
}

impl StaticResult {
    pub fn displacement(&self, node: NodeId) -> Option<&NodeDisplacement> {
        self.displacements.iter().find(|d| d.node == node)
    }

    pub fn reaction(&self, node: NodeId) -> Option<&ReactionForce> {
        self.reactions.iter().find(|r| r.node == node)
    }

    pub fn element_forces(&self, element: ElementId) -> Option<&ElementEndForces> {
        self.end_forces.iter().find(|f| f.element == element)
    }

    pub fn internal(&self, element: ElementId) -> Option<&InternalForceSeries> {
        self.internal_forces.iter().find(|s| s.element == element)
    }

    /// Sum of reaction forces and moments about the global origin
    pub fn reaction_resultant(&self, positions: impl Fn(NodeId) -> [f64; 3]) -> [f64; 6] {
        let mut total = [0.0; 6];
        for r in &self.reactions {
            let [x, y, z] = positions(r.node);
            total[0] += r.fx;
            total[1] += r.fy;
            total[2] += r.fz;
            total[3] += r.mx + y * r.fz - z * r.fy;
            total[4] += r.my + z * r.fx - x * r.fz;
            total[5] += r.mz + x * r.fy - y * r.fx;
        }
        total
    }

    /// Extreme values over the whole case
    pub fn summary(&self) -> AnalysisSummary {
        let mut summary = AnalysisSummary {
            num_nodes: self.displacements.len(),
            num_elements: self.end_forces.len(),
            iterations: self.iterations,
            equilibrium_error: self.equilibrium_error,
            ..AnalysisSummary::default()
        };
        for d in &self.displacements {
            let mag = d.translation_magnitude();
            if mag > summary.max_displacement {
                summary.max_displacement = mag;
                summary.max_disp_node = Some(d.node);
            }
            let rot = d.rotation_magnitude();
            if rot > summary.max_rotation {
                summary.max_rotation = rot;
                summary.max_rotation_node = Some(d.node);
            }
        }
        for r in &self.reactions {
            let mag = r.force_magnitude();
            if mag > summary.max_reaction {
                summary.max_reaction = mag;
                summary.max_reaction_node = Some(r.node);
            }
            summary.max_reaction_moment = summary.max_reaction_moment.max(r.moment_magnitude());
        }
        for series in &self.internal_forces {
            if series.max_axial() > summary.max_axial {
                summary.max_axial = series.max_axial();
                summary.max_axial_element = Some(series.element);
            }
            if series.max_moment() > summary.max_moment {
                summary.max_moment = series.max_moment();
                summary.max_moment_element = Some(series.element);
            }
        }
        summary
    }
}

/// Summary of analysis results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Maximum displacement
    pub max_displacement: f64,
    /// Node with maximum displacement
    pub max_disp_node: Option<NodeId>,
    /// Maximum rotation magnitude
    pub max_rotation: f64,
    pub max_rotation_node: Option<NodeId>,
    /// Maximum reaction force
    pub max_reaction: f64,
    /// Node with maximum reaction
    pub max_reaction_node: Option<NodeId>,
    /// Maximum reaction moment magnitude
    pub max_reaction_moment: f64,
    /// Maximum element axial force
    pub max_axial: f64,
    /// Element with maximum axial
    pub max_axial_element: Option<ElementId>,
    /// Maximum element moment
    pub max_moment: f64,
    /// Element with maximum moment
    pub max_moment_element: Option<ElementId>,
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of elements
    pub num_elements: usize,
    pub iterations: usize,
    pub equilibrium_error: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_forces_round_trip_and_tension() {
        let f = Vec12::from_fn(|k, _| k as f64);
        let forces = ElementEndForces::from_local(3, 1, 2, &f);
        assert_eq!(forces.as_vector(), f);
        assert_eq!(forces.axial_tension(), 3.0);
    }

    #[test]
    fn test_reaction_resultant_moment() {
        let result = StaticResult {
            displacements: vec![],
            end_forces: vec![],
            reactions: vec![ReactionForce::from_array(1, [0.0, 0.0, 10.0, 0.0, 0.0, 0.0])],
            internal_forces: vec![],
            iterations: 1,
            equilibrium_error: 0.0,
            exaggeration: 1.0,
        };
        let total = result.reaction_resultant(|_| [2.0, 0.0, 0.0]);
        assert_eq!(total[2], 10.0);
        assert_eq!(total[4], -20.0);
    }

    #[test]
    fn test_summary_picks_extremes() {
        let result = StaticResult {
            displacements: vec![
                NodeDisplacement::from_array(1, [0.0; 6]),
                NodeDisplacement::from_array(2, [0.0, -0.3, 0.4, 0.0, 0.0, 0.0]),
                NodeDisplacement::from_array(3, [0.1, 0.0, 0.0, 0.0, 0.06, -0.08]),
            ],
            end_forces: vec![],
            reactions: vec![
                ReactionForce::from_array(1, [3.0, 0.0, 4.0, 0.0, 0.0, 0.0]),
                ReactionForce::from_array(4, [0.0, 1.0, 0.0, 0.0, 6.0, 8.0]),
            ],
            internal_forces: vec![],
            iterations: 1,
            equilibrium_error: 0.0,
            exaggeration: 1.0,
        };
        let summary = result.summary();
        assert_eq!(summary.max_disp_node, Some(2));
        assert!((summary.max_displacement - 0.5).abs() < 1e-12);
        assert_eq!(summary.max_rotation_node, Some(3));
        assert!((summary.max_rotation - 0.1).abs() < 1e-12);
        assert_eq!(summary.max_reaction_node, Some(1));
        assert!((summary.max_reaction - 5.0).abs() < 1e-12);
        assert!((summary.max_reaction_moment - 10.0).abs() < 1e-12);
    }
}
