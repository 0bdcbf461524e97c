//! Matrix condensation to a set of retained DOFs

use std::f64::consts::PI;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::analysis::{AddedInertia, AddedMass, CondensationMethod, CondensationSpec, DynamicConfig};
use crate::elements::NodeId;
use crate::error::{FrameError, FrameResult};
use crate::math::{submatrix, Mat};
use crate::modal::{extract_modes, ModalAnalyzer};
use crate::model::{Model, DOF_PER_NODE};

/// One DOF of a condensed model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CondensedDof {
    pub node: NodeId,
    /// Component 0..6: DX, DY, DZ, RX, RY, RZ
    pub dof: usize,
}

/// Reduced stiffness and mass on the retained DOFs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondensedModel {
    pub method: CondensationMethod,
    /// Row/column meaning of the matrices
    pub dofs: Vec<CondensedDof>,
    pub stiffness: Mat,
    pub mass: Mat,
}

/// A mode of a condensed model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondensedMode {
    pub mode: usize,
    pub frequency: f64,
    pub circular_frequency: f64,
    pub period: f64,
    /// Mass-normalized shape on the condensed DOFs
    pub shape: Vec<f64>,
}

impl CondensedModel {
    /// Number of retained DOFs
    pub fn size(&self) -> usize {
        self.dofs.len()
    }

    /// Natural modes of the condensed stiffness/mass pair
    pub fn modes(&self, config: &DynamicConfig) -> FrameResult<Vec<CondensedMode>> {
        config.validate().map_err(FrameError::InputValidation)?;
        let solution = extract_modes(&self.stiffness, &self.mass, config)?;
        Ok(solution
            .values
            .iter()
            .enumerate()
            .map(|(mode, &omega2)| {
                let circular = omega2.max(0.0).sqrt();
                CondensedMode {
                    mode,
                    frequency: circular / (2.0 * PI),
                    circular_frequency: circular,
                    period: if circular > 0.0 { 2.0 * PI / circular } else { f64::INFINITY },
                    shape: solution.vectors.column(mode).iter().copied().collect(),
                }
            })
            .collect())
    }
}

/// Transformation T = [I; −D_bb⁻¹·D_ba] for D = K − ω²·M, rows in free-DOF order
fn reduction_basis(k: &Mat, m: &Mat, retained: &[usize], omega2: f64) -> FrameResult<Mat> {
    let n = k.nrows();
    let mut is_retained = vec![false; n];
    for &r in retained {
        is_retained[r] = true;
    }
    let eliminated: Vec<usize> = (0..n).filter(|i| !is_retained[*i]).collect();

    let mut t = Mat::zeros(n, retained.len());
    for (col, &r) in retained.iter().enumerate() {
        t[(r, col)] = 1.0;
    }
    if eliminated.is_empty() {
        return Ok(t);
    }

    let d = if omega2 != 0.0 { k - m * omega2 } else { k.clone() };
    let d_bb = submatrix(&d, &eliminated, &eliminated);
    let d_ba = submatrix(&d, &eliminated, retained);
    let coupling = d_bb.lu().solve(&d_ba).ok_or_else(|| {
        FrameError::StructuralSingularity(
            "eliminated DOFs cannot be condensed out; their block is singular".into(),
        )
    })?;
    for (row, &b) in eliminated.iter().enumerate() {
        for col in 0..retained.len() {
            t[(b, col)] = -coupling[(row, col)];
        }
    }
    Ok(t)
}

impl Model {
    /// Reduce the free-DOF stiffness and mass to the retained DOFs
    pub fn condense(
        &self,
        reduction: &CondensationSpec,
        config: &DynamicConfig,
        inertias: &[AddedInertia],
        element_masses: &[AddedMass],
    ) -> FrameResult<CondensedModel> {
        let analyzer = ModalAnalyzer::new(self, config, inertias, element_masses)?;
        let partition = analyzer.partition();
        let system = analyzer.free_system()?;

        if reduction.method == CondensationMethod::None {
            let dofs = partition
                .free()
                .iter()
                .map(|&dof| CondensedDof {
                    node: self.nodes()[dof / DOF_PER_NODE].id,
                    dof: dof % DOF_PER_NODE,
                })
                .collect();
            return Ok(CondensedModel {
                method: reduction.method,
                dofs,
                stiffness: system.k,
                mass: system.m,
            });
        }

        // Retained DOFs as positions among the free DOFs
        let mut dofs = Vec::new();
        let mut retained = Vec::new();
        for r in &reduction.retained {
            for (k, _) in r.dofs.iter().enumerate().filter(|(_, keep)| **keep) {
                let global = self.dof(r.node, k)?;
                let pos = partition.free_position(global).ok_or_else(|| {
                    FrameError::invalid(format!(
                        "retained DOF {k} of node {} is restrained",
                        r.node
                    ))
                })?;
                if retained.contains(&pos) {
                    return Err(FrameError::invalid(format!(
                        "DOF {k} of node {} is retained twice",
                        r.node
                    )));
                }
                retained.push(pos);
                dofs.push(CondensedDof { node: r.node, dof: k });
            }
        }
        if retained.is_empty() {
            return Err(FrameError::invalid("condensation needs at least one retained DOF"));
        }

        let modes_needed = reduction.modes.iter().max().map_or(0, |m| m + 1);
        let modal = if modes_needed > 0 && reduction.method != CondensationMethod::Static {
            let mut modal_config = config.clone();
            modal_config.modes = modal_config.modes.max(modes_needed);
            Some(extract_modes(&system.k, &system.m, &modal_config)?)
        } else {
            None
        };

        let (stiffness, mass) = match (reduction.method, &modal) {
            (CondensationMethod::Modal, Some(solution)) => {
                if reduction.modes.len() != retained.len() {
                    return Err(FrameError::invalid(format!(
                        "modal condensation needs as many modes ({}) as retained DOFs ({})",
                        reduction.modes.len(),
                        retained.len()
                    )));
                }
                let p = Mat::from_fn(retained.len(), reduction.modes.len(), |i, j| {
                    solution.vectors[(retained[i], reduction.modes[j])]
                });
                let p_inv = p.try_inverse().ok_or_else(|| {
                    FrameError::NumericalDegeneracy(
                        "mode shapes are linearly dependent at the retained DOFs".into(),
                    )
                })?;
                let omega2 = Mat::from_diagonal(&nalgebra::DVector::from_iterator(
                    reduction.modes.len(),
                    reduction.modes.iter().map(|&m| solution.values[m]),
                ));
                let p_inv_t = p_inv.transpose();
                (&p_inv_t * omega2 * &p_inv, &p_inv_t * &p_inv)
            }
            (CondensationMethod::Modal, None) => {
                return Err(FrameError::invalid("modal condensation needs a list of modes"));
            }
            (method, _) => {
                let omega2 = match (method, &modal) {
                    (CondensationMethod::Dynamic, Some(solution)) => solution.values[reduction.modes[0]].max(0.0),
                    _ => 0.0,
                };
                debug!("condensing at omega^2 = {omega2:.6e}");
                let t = reduction_basis(&system.k, &system.m, &retained, omega2)?;
                let t_t = t.transpose();
                (&t_t * &system.k * &t, &t_t * &system.m * &t)
            }
        };

        info!(
            "condensed {} free DOFs to {} with {:?} reduction",
            partition.free().len(),
            retained.len(),
            reduction.method
        );

        Ok(CondensedModel {
            method: reduction.method,
            dofs,
            stiffness: (&stiffness + stiffness.transpose()) * 0.5,
            mass: (&mass + mass.transpose()) * 0.5,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reduction_basis_of_spring_chain() {
        // Springs 1-2-3: chain of two unit springs, retaining the end DOF
        let k = Mat::from_row_slice(2, 2, &[2.0, -1.0, -1.0, 1.0]);
        let m = Mat::identity(2, 2);
        let t = reduction_basis(&k, &m, &[1], 0.0).unwrap();
        assert_relative_eq!(t[(0, 0)], 0.5);
        assert_relative_eq!(t[(1, 0)], 1.0);
        let kc = t.transpose() * &k * &t;
        assert_relative_eq!(kc[(0, 0)], 0.5);
    }

    #[test]
    fn test_singular_eliminated_block() {
        let k = Mat::from_row_slice(2, 2, &[0.0, 0.0, 0.0, 1.0]);
        let m = Mat::identity(2, 2);
        assert!(matches!(
            reduction_basis(&k, &m, &[1], 0.0),
            Err(FrameError::StructuralSingularity(_))
        ));
    }
}
