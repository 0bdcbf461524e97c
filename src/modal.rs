//! Modal analysis: natural frequencies, mode shapes and participation

use std::f64::consts::PI;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::analysis::{AddedInertia, AddedMass, DynamicConfig, ModalMethod};
use crate::assembly::GlobalAssembler;
use crate::error::{FrameError, FrameResult};
use crate::mass::{MassAssembler, MassSummary};
use crate::math::eigen::{self, EigenControl, EigenSolution};
use crate::math::{submatrix, DVec, Mat};
use crate::model::{Model, DOF_PER_NODE};
use crate::results::NodeDisplacement;
use crate::solver::DofPartition;

/// One natural mode of vibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalResult {
    /// 0-based mode index, in ascending frequency
    pub mode: usize,
    /// Natural frequency (Hz)
    pub frequency: f64,
    /// Circular frequency (rad/s)
    pub circular_frequency: f64,
    /// Period (s)
    pub period: f64,
    /// Participation factors φᵀ·M·r for unit translations along X, Y, Z
    pub participation: [f64; 3],
    /// Mass-normalized mode shape at every node
    pub shape: Vec<NodeDisplacement>,
}

/// Modal analysis output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalAnalysis {
    pub mass: MassSummary,
    pub modes: Vec<ModalResult>,
    /// Eigen-solver iterations used
    pub iterations: usize,
    /// Display scale for mode shapes
    pub exaggeration: f64,
}

impl ModalAnalysis {
    pub fn frequencies(&self) -> Vec<f64> {
        self.modes.iter().map(|m| m.frequency).collect()
    }
}

/// Lowest modes of the free-DOF pair (K + shift·M)·φ = λ·M·φ
///
/// Values in the returned solution are ω², with the shift removed.
pub(crate) fn extract_modes(k: &Mat, m: &Mat, config: &DynamicConfig) -> FrameResult<EigenSolution> {
    let n = k.nrows();
    if config.modes > n {
        return Err(FrameError::invalid(format!(
            "requested {} modes but the model has only {n} free DOFs",
            config.modes
        )));
    }
    let shifted = if config.shift != 0.0 {
        k + m * config.shift
    } else {
        k.clone()
    };
    let control = EigenControl {
        modes: config.modes,
        tolerance: config.tolerance,
        max_iterations: config.max_iterations,
    };
    let mut solution = match config.method {
        ModalMethod::Subspace => eigen::subspace(&shifted, m, control)?,
        ModalMethod::Stodola => eigen::stodola(&shifted, m, control)?,
    };
    eigen::check_missed_modes(&shifted, m, &solution, config.tolerance);

    for value in solution.values.iter_mut() {
        *value -= config.shift;
    }
    Ok(solution)
}

/// Runs the eigen-extraction on a model's free DOFs
pub struct ModalAnalyzer<'a> {
    model: &'a Model,
    config: &'a DynamicConfig,
    mass: MassAssembler<'a>,
    partition: DofPartition,
}

/// Free-DOF stiffness and mass with the full mass matrix
pub(crate) struct FreeSystem {
    pub k: Mat,
    pub m: Mat,
    pub m_full: Mat,
}

impl<'a> ModalAnalyzer<'a> {
    pub fn new(
        model: &'a Model,
        config: &'a DynamicConfig,
        inertias: &'a [AddedInertia],
        element_masses: &'a [AddedMass],
    ) -> FrameResult<Self> {
        config.validate().map_err(FrameError::InputValidation)?;
        Ok(Self {
            model,
            config,
            mass: MassAssembler::new(model, config, inertias, element_masses)?,
            partition: DofPartition::of(model),
        })
    }

    pub fn partition(&self) -> &DofPartition {
        &self.partition
    }

    /// Assemble the free-DOF stiffness and mass
    pub(crate) fn free_system(&self) -> FrameResult<FreeSystem> {
        let k_full = GlobalAssembler::new(self.model).stiffness(None);
        let m_full = self.mass.mass()?;
        let free = self.partition.free();
        Ok(FreeSystem {
            k: submatrix(&k_full, free, free),
            m: submatrix(&m_full, free, free),
            m_full,
        })
    }

    /// Solve for the requested modes
    pub fn run(&self) -> FrameResult<ModalAnalysis> {
        let system = self.free_system()?;
        let summary = self.mass.summary(&system.m_full)?;
        let solution = extract_modes(&system.k, &system.m, self.config)?;
        debug!("{} modes extracted in {} iterations", solution.values.len(), solution.iterations);

        let n_nodes = self.model.nodes().len();
        let modes = solution
            .values
            .iter()
            .enumerate()
            .map(|(mode, &omega2)| {
                let full = self.partition.expand(&solution.vectors.column(mode).into_owned());
                self.mode_result(mode, omega2, &full, &system.m_full, n_nodes)
            })
            .collect::<Vec<_>>();

        for mode in &modes {
            info!(
                "mode {}: f = {:.6} Hz, participation {:?}",
                mode.mode, mode.frequency, mode.participation
            );
        }

        Ok(ModalAnalysis {
            mass: summary,
            modes,
            iterations: solution.iterations,
            exaggeration: self.config.exaggeration,
        })
    }

    fn mode_result(&self, mode: usize, omega2: f64, phi: &DVec, m_full: &Mat, n_nodes: usize) -> ModalResult {
        let circular = omega2.max(0.0).sqrt();
        let m_phi = m_full * phi;
        let mut participation = [0.0; 3];
        for (dir, value) in participation.iter_mut().enumerate() {
            *value = (0..n_nodes).map(|node| m_phi[node * DOF_PER_NODE + dir]).sum();
        }

        let shape = self
            .model
            .nodes()
            .iter()
            .enumerate()
            .map(|(idx, node)| {
                let mut values = [0.0; 6];
                for (k, value) in values.iter_mut().enumerate() {
                    *value = phi[idx * DOF_PER_NODE + k];
                }
                NodeDisplacement::from_array(node.id, values)
            })
            .collect();

        ModalResult {
            mode,
            frequency: circular / (2.0 * PI),
            circular_frequency: circular,
            period: if circular > 0.0 { 2.0 * PI / circular } else { f64::INFINITY },
            participation,
            shape,
        }
    }
}

impl Model {
    /// Natural frequencies and mode shapes
    pub fn solve_modal(
        &self,
        config: &DynamicConfig,
        inertias: &[AddedInertia],
        element_masses: &[AddedMass],
    ) -> FrameResult<ModalAnalysis> {
        ModalAnalyzer::new(self, config, inertias, element_masses)?.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisOptions;
    use crate::elements::{Element, Material, Node, Reaction, Section};
    use approx::assert_relative_eq;

    /// Axial rod of `n` elements fixed at node 1, only axial DOFs free
    fn rod(n: usize) -> Model {
        let nodes = (0..=n).map(|i| Node::new(i as u32 + 1, i as f64, 0.0, 0.0)).collect();
        let mut reactions = vec![Reaction::fixed(1)];
        for i in 1..=n {
            reactions.push(Reaction::new(i as u32 + 1, false, true, true, true, true, true));
        }
        let elements = (0..n)
            .map(|i| {
                Element::new(
                    i as u32 + 1,
                    i as u32 + 1,
                    i as u32 + 2,
                    Section::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0),
                    Material::new(1.0, 1.0, 1.0),
                )
            })
            .collect();
        Model::build(nodes, reactions, elements, AnalysisOptions::default()).unwrap()
    }

    #[test]
    fn test_lumped_rod_frequencies() {
        // Fixed-free lumped rod: spring-mass chain with a half mass at the tip
        let model = rod(1);
        let config = DynamicConfig::modes(1).lumped();
        let result = model.solve_modal(&config, &[], &[]).unwrap();
        // k = 1, m = 0.5
        assert_relative_eq!(result.modes[0].circular_frequency, 2.0_f64.sqrt(), max_relative = 1e-9);
        assert_relative_eq!(result.modes[0].period, 2.0 * PI / 2.0_f64.sqrt(), max_relative = 1e-9);
    }

    #[test]
    fn test_mode_shapes_mass_normalized() {
        let model = rod(6);
        let config = DynamicConfig::modes(2).with_tolerance(1e-12);
        let inertias = [AddedInertia::point_mass(7, 0.5)];
        let analyzer = ModalAnalyzer::new(&model, &config, &inertias, &[]).unwrap();
        let result = analyzer.run().unwrap();
        let system = analyzer.free_system().unwrap();
        for mode in &result.modes {
            let phi = DVec::from_iterator(
                model.num_dofs(),
                mode.shape.iter().flat_map(|d| d.as_array()),
            );
            let norm = (phi.transpose() * &system.m_full * &phi)[(0, 0)];
            assert_relative_eq!(norm, 1.0, max_relative = 1e-8);
            // Pure axial motion along X
            assert!(mode.participation[0].abs() > 0.0);
            assert_relative_eq!(mode.participation[1], 0.0, epsilon = 1e-12);
        }
        assert!(result.modes[0].frequency < result.modes[1].frequency);
    }

    #[test]
    fn test_shift_does_not_change_frequencies() {
        let model = rod(5);
        let plain = model.solve_modal(&DynamicConfig::modes(2), &[], &[]).unwrap();
        let shifted = model
            .solve_modal(&DynamicConfig::modes(2).with_shift(0.1), &[], &[])
            .unwrap();
        for (a, b) in plain.modes.iter().zip(&shifted.modes) {
            assert_relative_eq!(a.frequency, b.frequency, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_too_many_modes_rejected() {
        let model = rod(2);
        let err = model.solve_modal(&DynamicConfig::modes(5), &[], &[]).unwrap_err();
        assert!(err.is_validation());
    }
}
