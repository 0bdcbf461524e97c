//! Global mass assembly and mass properties

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::{AddedInertia, AddedMass, DynamicConfig};
use crate::assembly::scatter;
use crate::elements::NodeId;
use crate::error::{FrameError, FrameResult};
use crate::math::mass::{consistent_mass, lumped_mass};
use crate::math::transform::to_global;
use crate::math::{Mat, Mat3, Vec3};
use crate::model::{Model, DOF_PER_NODE};

/// Mass diagonal of one node, [m_x, m_y, m_z, I_xx, I_yy, I_zz]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeMass {
    pub node: NodeId,
    pub values: [f64; 6],
}

/// Mass properties of the whole structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassSummary {
    /// Structural plus extra element plus added nodal mass
    pub total_mass: f64,
    /// Σ ρ·Ax·L over all elements
    pub structural_mass: f64,
    /// Diagonal of the assembled mass matrix, per node
    pub node_mass: Vec<NodeMass>,
    /// Centre of mass in global coordinates
    pub center: [f64; 3],
    /// Inertia tensor about the centre of mass, in global axes
    pub inertia: [[f64; 3]; 3],
}

/// Assembles the global mass matrix of a model
pub struct MassAssembler<'a> {
    model: &'a Model,
    lumped: bool,
    inertias: &'a [AddedInertia],
    element_masses: &'a [AddedMass],
}

impl<'a> MassAssembler<'a> {
    /// Create an assembler; validates the added masses against the model
    pub fn new(
        model: &'a Model,
        config: &DynamicConfig,
        inertias: &'a [AddedInertia],
        element_masses: &'a [AddedMass],
    ) -> FrameResult<Self> {
        for added in inertias {
            model.node_index(added.node)?;
            let values = [added.mass, added.ixx, added.iyy, added.izz];
            if values.iter().any(|v| v.is_nan() || *v < 0.0) {
                return Err(FrameError::invalid(format!(
                    "added inertia at node {} must be non-negative",
                    added.node
                )));
            }
        }
        for added in element_masses {
            model.element_index(added.element)?;
            if added.mass.is_nan() || added.mass < 0.0 {
                return Err(FrameError::invalid(format!(
                    "added mass on element {} must be non-negative",
                    added.element
                )));
            }
        }
        Ok(Self {
            model,
            lumped: config.lumped,
            inertias,
            element_masses,
        })
    }

    /// Extra element mass per element, in element order
    fn extra_element_mass(&self) -> FrameResult<Vec<f64>> {
        let mut extra = vec![0.0; self.model.elements().len()];
        for added in self.element_masses {
            extra[self.model.element_index(added.element)?] += added.mass;
        }
        Ok(extra)
    }

    /// Assemble the global mass matrix
    pub fn mass(&self) -> FrameResult<Mat> {
        let model = self.model;
        let n = model.num_dofs();
        let mut m = Mat::zeros(n, n);
        let extra = self.extra_element_mass()?;

        for (idx, element) in model.elements().iter().enumerate() {
            let geom = model.geometry(idx);
            let local = if self.lumped {
                lumped_mass(element, geom.length)
            } else {
                consistent_mass(element, geom.length)
            };
            scatter(&mut m, &to_global(&local, &geom.transform), geom);

            if extra[idx] > 0.0 {
                for node in [geom.i, geom.j] {
                    for k in 0..3 {
                        let dof = node * DOF_PER_NODE + k;
                        m[(dof, dof)] += extra[idx] / 2.0;
                    }
                }
            }
        }

        for added in self.inertias {
            let base = model.dof(added.node, 0)?;
            let diag = [added.mass, added.mass, added.mass, added.ixx, added.iyy, added.izz];
            for (k, value) in diag.iter().enumerate() {
                m[(base + k, base + k)] += value;
            }
        }

        debug!(
            "assembled {} {n}x{n} mass matrix",
            if self.lumped { "lumped" } else { "consistent" }
        );
        Ok(m)
    }

    /// Mass properties, from lumped point masses at the nodes
    pub fn summary(&self, m: &Mat) -> FrameResult<MassSummary> {
        let model = self.model;
        let extra = self.extra_element_mass()?;
        let nodes = model.nodes();

        let mut point_mass = vec![0.0; nodes.len()];
        let mut rotary = vec![[0.0; 3]; nodes.len()];
        let mut structural_mass = 0.0;
        for (idx, element) in model.elements().iter().enumerate() {
            let geom = model.geometry(idx);
            let mass = element.mass_per_length() * geom.length;
            structural_mass += mass;
            point_mass[geom.i] += (mass + extra[idx]) / 2.0;
            point_mass[geom.j] += (mass + extra[idx]) / 2.0;
        }
        for added in self.inertias {
            let idx = model.node_index(added.node)?;
            point_mass[idx] += added.mass;
            rotary[idx][0] += added.ixx;
            rotary[idx][1] += added.iyy;
            rotary[idx][2] += added.izz;
        }

        let total_mass: f64 = point_mass.iter().sum();
        let mut center = Vec3::zeros();
        if total_mass > 0.0 {
            for (node, mass) in nodes.iter().zip(&point_mass) {
                center += node.position() * *mass;
            }
            center /= total_mass;
        }

        let mut inertia = Mat3::zeros();
        for ((node, mass), rot) in nodes.iter().zip(&point_mass).zip(&rotary) {
            let r = node.position() - center;
            inertia += (Mat3::identity() * r.dot(&r) - r * r.transpose()) * *mass;
            inertia += Mat3::from_diagonal(&Vec3::from(*rot));
        }

        let node_mass = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| {
                let mut values = [0.0; 6];
                for (k, value) in values.iter_mut().enumerate() {
                    let dof = idx * DOF_PER_NODE + k;
                    *value = m[(dof, dof)];
                }
                NodeMass {
                    node: node.id,
                    values,
                }
            })
            .collect();

        debug!("total mass {total_mass:.6e}, structural mass {structural_mass:.6e}");

        Ok(MassSummary {
            total_mass,
            structural_mass,
            node_mass,
            center: [center.x, center.y, center.z],
            inertia: [
                [inertia[(0, 0)], inertia[(0, 1)], inertia[(0, 2)]],
                [inertia[(1, 0)], inertia[(1, 1)], inertia[(1, 2)]],
                [inertia[(2, 0)], inertia[(2, 1)], inertia[(2, 2)]],
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisOptions;
    use crate::elements::{Node, Reaction};
    use crate::model::tests::beam_element;
    use approx::assert_relative_eq;

    fn bar() -> Model {
        Model::build(
            vec![Node::new(1, 0.0, 0.0, 0.0), Node::new(2, 4.0, 0.0, 0.0)],
            vec![Reaction::fixed(1)],
            vec![beam_element(1, 1, 2)],
            AnalysisOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_summary_mass_center_and_total() {
        let model = bar();
        let inertias = [AddedInertia::point_mass(2, 100.0)];
        let extra = [AddedMass::new(1, 20.0)];
        let config = DynamicConfig::default().lumped();
        let assembler = MassAssembler::new(&model, &config, &inertias, &extra).unwrap();
        let m = assembler.mass().unwrap();
        let summary = assembler.summary(&m).unwrap();

        let structural = model.elements()[0].mass_per_length() * 4.0;
        assert_relative_eq!(summary.structural_mass, structural, max_relative = 1e-12);
        assert_relative_eq!(summary.total_mass, structural + 120.0, max_relative = 1e-12);
        let expected_x = ((structural + 20.0) / 2.0 * 4.0 + 100.0 * 4.0) / summary.total_mass;
        assert_relative_eq!(summary.center[0], expected_x, max_relative = 1e-12);
        assert_relative_eq!(summary.node_mass[1].values[0], (structural + 20.0) / 2.0 + 100.0, max_relative = 1e-12);
        // Masses on the X axis have no inertia about X
        assert_relative_eq!(summary.inertia[0][0], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_consistent_mass_total_translation() {
        let model = bar();
        let config = DynamicConfig::default();
        let assembler = MassAssembler::new(&model, &config, &[], &[]).unwrap();
        let m = assembler.mass().unwrap();
        let mut r = crate::math::DVec::zeros(12);
        r[1] = 1.0;
        r[7] = 1.0;
        let total = (r.transpose() * &m * &r)[(0, 0)];
        assert_relative_eq!(total, model.elements()[0].mass_per_length() * 4.0, max_relative = 1e-12);
    }

    #[test]
    fn test_negative_added_mass_rejected() {
        let model = bar();
        let inertias = [AddedInertia::point_mass(2, -1.0)];
        let result = MassAssembler::new(&model, &DynamicConfig::default(), &inertias, &[]);
        assert!(result.is_err());
    }
}
