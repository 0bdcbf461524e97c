//! Static analysis driver: linear and geometric-stiffness iterated solves

use log::{debug, info};
use rayon::prelude::*;

use crate::assembly::{gather, AssembledLoads, GlobalAssembler};
use crate::error::{FrameError, FrameResult};
use crate::internal_forces::InternalForceEvaluator;
use crate::loads::LoadCase;
use crate::math::transform::vector_to_local;
use crate::math::{DVec, Mat, Vec12};
use crate::model::{Model, DOF_PER_NODE};
use crate::results::{ElementEndForces, NodeDisplacement, ReactionForce, StaticResult};
use crate::solver::{DofPartition, Factorization, LinearSystem, Solution};

/// State shared by every load case of one model
struct StaticAnalysis<'a> {
    model: &'a Model,
    assembler: GlobalAssembler<'a>,
    partition: DofPartition,
    k_elastic: Mat,
    /// Factorization of the elastic free block; shared by all cases
    factorization: FrameResult<Factorization>,
}

impl<'a> StaticAnalysis<'a> {
    fn new(model: &'a Model) -> Self {
        let assembler = GlobalAssembler::new(model);
        let partition = DofPartition::of(model);
        let k_elastic = assembler.stiffness(None);
        let factorization = LinearSystem::new(&k_elastic, &partition).factorize();
        Self {
            model,
            assembler,
            partition,
            k_elastic,
            factorization,
        }
    }

    fn run(&self, case: &LoadCase) -> FrameResult<StaticResult> {
        let loads = self.assembler.loads(case)?;
        let prescribed = self.partition.prescribed(self.model, &case.prescribed)?;
        let factorization = self.factorization.as_ref().map_err(|e| e.clone())?;

        let linear = LinearSystem::new(&self.k_elastic, &self.partition).solve(
            &loads.forces,
            &prescribed,
            Some(factorization),
        )?;

        let (solution, tensions, iterations) = if self.model.options().geometric {
            self.iterate_geometric(&loads, &prescribed, linear)?
        } else {
            (linear, None, 1)
        };

        Ok(self.collect(&loads, solution, tensions.as_deref(), iterations))
    }

    /// Local end forces of every element for a displacement vector
    fn end_forces(
        &self,
        loads: &AssembledLoads,
        displacements: &DVec,
        tensions: Option<&[f64]>,
    ) -> Vec<Vec12> {
        (0..self.model.elements().len())
            .map(|idx| {
                let geom = self.model.geometry(idx);
                let d_local = vector_to_local(&gather(displacements, geom), &geom.transform);
                let k = self.assembler.element_stiffness(idx, tensions.map(|t| t[idx]));
                k * d_local + loads.elements[idx].fixed_end_forces()
            })
            .collect()
    }

    fn tensions(forces: &[Vec12]) -> Vec<f64> {
        forces.iter().map(|f| (f[6] - f[0]) / 2.0).collect()
    }

    /// Re-solve with K + Kg(T) until the displacements settle
    fn iterate_geometric(
        &self,
        loads: &AssembledLoads,
        prescribed: &DVec,
        linear: Solution,
    ) -> FrameResult<(Solution, Option<Vec<f64>>, usize)> {
        let options = self.model.options();
        let mut previous = linear;
        let mut tensions = Self::tensions(&self.end_forces(loads, &previous.displacements, None));
        let mut change = f64::INFINITY;

        for iteration in 1..=options.max_iterations {
            let k = self.assembler.stiffness(Some(&tensions));
            let current = LinearSystem::new(&k, &self.partition).solve(&loads.forces, prescribed, None)?;

            let norm = current.displacements.norm();
            change = if norm > 0.0 {
                (&current.displacements - &previous.displacements).norm() / norm
            } else {
                0.0
            };
            debug!("geometric iteration {iteration}: relative change {change:.3e}");

            if change < options.tolerance {
                return Ok((current, Some(tensions), iteration + 1));
            }
            tensions = Self::tensions(&self.end_forces(loads, &current.displacements, Some(&tensions)));
            previous = current;
        }

        // The linear pass plus one solve per iteration
        Err(FrameError::NonConvergence {
            iterations: options.max_iterations + 1,
            error: change,
        })
    }

    fn collect(
        &self,
        loads: &AssembledLoads,
        solution: Solution,
        tensions: Option<&[f64]>,
        iterations: usize,
    ) -> StaticResult {
        let model = self.model;
        let options = model.options();
        let d = &solution.displacements;

        let displacements = model
            .nodes()
            .iter()
            .enumerate()
            .map(|(idx, node)| NodeDisplacement::from_array(node.id, node_block(d, idx)))
            .collect();

        let reactions = model
            .nodes()
            .iter()
            .enumerate()
            .filter(|(idx, _)| model.restraints()[*idx].iter().any(|r| *r))
            .map(|(idx, node)| ReactionForce::from_array(node.id, node_block(&solution.reactions, idx)))
            .collect();

        let forces = self.end_forces(loads, d, tensions);
        let mut end_forces = Vec::with_capacity(forces.len());
        let mut internal_forces = Vec::with_capacity(forces.len());
        for (idx, (element, f)) in model.elements().iter().zip(&forces).enumerate() {
            let geom = model.geometry(idx);
            end_forces.push(ElementEndForces::from_local(element.id, element.n1, element.n2, f));
            let d_local = vector_to_local(&gather(d, geom), &geom.transform);
            let evaluator = InternalForceEvaluator::new(
                element,
                geom.length,
                options.shear,
                *f,
                d_local,
                &loads.elements[idx],
            );
            internal_forces.push(evaluator.evaluate(options.dx));
        }

        StaticResult {
            displacements,
            end_forces,
            reactions,
            internal_forces,
            iterations,
            equilibrium_error: solution.equilibrium_error,
            exaggeration: options.exaggeration,
        }
    }
}

fn node_block(v: &DVec, idx: usize) -> [f64; 6] {
    let mut block = [0.0; 6];
    for (k, value) in block.iter_mut().enumerate() {
        *value = v[idx * DOF_PER_NODE + k];
    }
    block
}

impl Model {
    /// Run a static analysis of one load case
    pub fn solve_static(&self, case: &LoadCase) -> FrameResult<StaticResult> {
        let result = StaticAnalysis::new(self).run(case)?;
        info!(
            "static case solved in {} iteration(s), equilibrium error {:.3e}",
            result.iterations, result.equilibrium_error
        );
        Ok(result)
    }

    /// Run independent load cases, in parallel when the options allow it
    ///
    /// The stiffness matrix and its factorization are computed once and
    /// shared. Each case reports its own outcome.
    pub fn solve_static_cases(&self, cases: &[LoadCase]) -> Vec<FrameResult<StaticResult>> {
        let analysis = StaticAnalysis::new(self);
        info!(
            "solving {} load case(s){}",
            cases.len(),
            if self.options().parallel { " in parallel" } else { "" }
        );
        if self.options().parallel {
            cases.par_iter().map(|case| analysis.run(case)).collect()
        } else {
            cases.iter().map(|case| analysis.run(case)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisOptions;
    use crate::elements::{Node, Reaction};
    use crate::loads::{NodeLoad, PrescribedDisplacement};
    use crate::model::tests::beam_element;
    use approx::assert_relative_eq;

    fn cantilever(options: AnalysisOptions) -> Model {
        Model::build(
            vec![Node::new(1, 0.0, 0.0, 0.0), Node::new(2, 3.0, 0.0, 0.0)],
            vec![Reaction::fixed(1)],
            vec![beam_element(1, 1, 2)],
            options,
        )
        .unwrap()
    }

    #[test]
    fn test_linear_cantilever_tip() {
        let model = cantilever(AnalysisOptions::default());
        let case = LoadCase::new().with_node_load(NodeLoad::force(2, 0.0, 0.0, -1000.0));
        let result = model.solve_static(&case).unwrap();
        let element = &model.elements()[0];
        let ei = element.material.e * element.section.iy;
        let tip = result.displacement(2).unwrap();
        assert_relative_eq!(tip.dz, -1000.0 * 27.0 / (3.0 * ei), max_relative = 1e-9);
        let reaction = result.reaction(1).unwrap();
        assert_relative_eq!(reaction.fz, 1000.0, max_relative = 1e-9);
        assert_relative_eq!(reaction.my, -3000.0, max_relative = 1e-9);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_cases_share_factorization_and_fail_independently() {
        let model = cantilever(AnalysisOptions::default());
        let good = LoadCase::new().with_node_load(NodeLoad::force(2, 10.0, 0.0, 0.0));
        let bad = LoadCase::new().with_node_load(NodeLoad::force(5, 10.0, 0.0, 0.0));
        let results = model.solve_static_cases(&[good.clone(), bad, good]);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err(), &FrameError::NodeNotFound(5));
        assert_eq!(results[0], results[2]);
    }

    #[test]
    fn test_prescribed_on_free_dof_rejected() {
        let model = cantilever(AnalysisOptions::default());
        let case = LoadCase::new().with_prescribed(PrescribedDisplacement::translation(2, 0.01, 0.0, 0.0));
        assert!(model.solve_static(&case).unwrap_err().is_validation());
    }

    #[test]
    fn test_unsupported_structure_is_singular() {
        let model = Model::build(
            vec![Node::new(1, 0.0, 0.0, 0.0), Node::new(2, 3.0, 0.0, 0.0)],
            vec![],
            vec![beam_element(1, 1, 2)],
            AnalysisOptions::default(),
        )
        .unwrap();
        let case = LoadCase::new().with_node_load(NodeLoad::force(2, 1.0, 0.0, 0.0));
        assert!(matches!(
            model.solve_static(&case),
            Err(FrameError::StructuralSingularity(_)) | Err(FrameError::NumericalDegeneracy(_))
        ));
    }

    #[test]
    fn test_geometric_iteration_limit() {
        let options = AnalysisOptions::geometric().with_max_iter(1).with_tolerance(1e-30);
        let model = cantilever(options);
        let case = LoadCase::new()
            .with_node_load(NodeLoad::force(2, -1e5, 0.0, -1e3));
        assert!(matches!(
            model.solve_static(&case),
            Err(FrameError::NonConvergence { iterations: 2, .. })
        ));
    }
}
