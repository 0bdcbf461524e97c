//! Boundary conditions and the linear solve

use log::{debug, warn};
use nalgebra::{Cholesky, Dyn};

use crate::error::{FrameError, FrameResult};
use crate::loads::PrescribedDisplacement;
use crate::math::{submatrix, subvector, DVec, Mat};
use crate::model::{Model, DOF_PER_NODE};

/// Smallest acceptable ratio of the smallest squared Cholesky pivot to the
/// largest stiffness diagonal
const PIVOT_RATIO_LIMIT: f64 = 1e-13;
/// Relative residual below which iterative refinement stops
const REFINEMENT_TARGET: f64 = 1e-12;
const MAX_REFINEMENT_STEPS: usize = 3;

/// Split of the global DOFs into free and restrained sets
#[derive(Debug, Clone)]
pub struct DofPartition {
    free: Vec<usize>,
    restrained: Vec<usize>,
    /// Position of each global DOF in `free`, if free
    free_position: Vec<Option<usize>>,
}

impl DofPartition {
    /// Partition from per-node restraint flags
    pub fn new(restraints: &[[bool; 6]]) -> Self {
        let n = restraints.len() * DOF_PER_NODE;
        let mut free = Vec::with_capacity(n);
        let mut restrained = Vec::new();
        let mut free_position = vec![None; n];
        for (node, flags) in restraints.iter().enumerate() {
            for (k, &fixed) in flags.iter().enumerate() {
                let dof = node * DOF_PER_NODE + k;
                if fixed {
                    restrained.push(dof);
                } else {
                    free_position[dof] = Some(free.len());
                    free.push(dof);
                }
            }
        }
        Self {
            free,
            restrained,
            free_position,
        }
    }

    /// Partition of a model's restraints
    pub fn of(model: &Model) -> Self {
        Self::new(model.restraints())
    }

    pub fn free(&self) -> &[usize] {
        &self.free
    }

    pub fn restrained(&self) -> &[usize] {
        &self.restrained
    }

    pub fn num_dofs(&self) -> usize {
        self.free_position.len()
    }

    /// Position of a global DOF among the free DOFs
    pub fn free_position(&self, dof: usize) -> Option<usize> {
        self.free_position[dof]
    }

    pub fn is_free(&self, dof: usize) -> bool {
        self.free_position[dof].is_some()
    }

    /// Scatter a free-DOF vector into a full-size vector (zeros elsewhere)
    pub fn expand(&self, free_values: &DVec) -> DVec {
        let mut full = DVec::zeros(self.num_dofs());
        for (pos, &dof) in self.free.iter().enumerate() {
            full[dof] = free_values[pos];
        }
        full
    }

    /// Full-size vector of prescribed displacements
    ///
    /// Non-zero values are only accepted on restrained DOFs.
    pub fn prescribed(
        &self,
        model: &Model,
        prescribed: &[PrescribedDisplacement],
    ) -> FrameResult<DVec> {
        let mut values = DVec::zeros(self.num_dofs());
        for p in prescribed {
            let base = model.dof(p.node, 0)?;
            for (k, &value) in p.values.iter().enumerate() {
                if value == 0.0 {
                    continue;
                }
                if self.is_free(base + k) {
                    return Err(FrameError::invalid(format!(
                        "prescribed displacement on node {} component {k} requires that DOF to be restrained",
                        p.node
                    )));
                }
                values[base + k] = value;
            }
        }
        Ok(values)
    }
}

/// Cholesky factorization of the free-free stiffness block
#[derive(Debug, Clone)]
pub struct Factorization {
    k_ff: Mat,
    cholesky: Option<Cholesky<f64, Dyn>>,
}

impl Factorization {
    /// Factorize a free-free stiffness block
    ///
    /// An empty block (every DOF restrained) is accepted and solves trivially.
    pub fn new(k_ff: Mat) -> FrameResult<Self> {
        if k_ff.nrows() == 0 {
            return Ok(Self {
                k_ff,
                cholesky: None,
            });
        }

        let cholesky = k_ff.clone().cholesky().ok_or_else(|| {
            FrameError::StructuralSingularity(
                "stiffness matrix is not positive definite; check restraints and element connectivity"
                    .into(),
            )
        })?;

        let l = cholesky.l_dirty();
        if (0..k_ff.nrows()).any(|i| !l[(i, i)].is_finite()) {
            return Err(FrameError::StructuralSingularity(
                "stiffness factorization produced non-finite pivots".into(),
            ));
        }
        let min_pivot = (0..k_ff.nrows())
            .map(|i| l[(i, i)] * l[(i, i)])
            .fold(f64::INFINITY, f64::min);
        let max_diag = k_ff.diagonal().amax();
        let ratio = min_pivot / max_diag;
        debug!("factorized {0}x{0} stiffness, pivot ratio {ratio:.3e}", k_ff.nrows());
        if !(ratio >= PIVOT_RATIO_LIMIT) {
            return Err(FrameError::NumericalDegeneracy(format!(
                "pivot ratio {ratio:.3e} is below {PIVOT_RATIO_LIMIT:e}; the structure is nearly a mechanism"
            )));
        }

        Ok(Self {
            k_ff,
            cholesky: Some(cholesky),
        })
    }

    /// Solve K_ff·x = b with iterative refinement
    ///
    /// Returns the solution and the final relative residual ‖b − K x‖ / ‖b‖.
    pub fn solve(&self, b: &DVec) -> (DVec, f64) {
        let Some(cholesky) = &self.cholesky else {
            return (DVec::zeros(0), 0.0);
        };
        let b_norm = b.norm();
        if b_norm == 0.0 {
            return (DVec::zeros(b.len()), 0.0);
        }

        let mut x = cholesky.solve(b);
        let mut residual = b - &self.k_ff * &x;
        let mut error = residual.norm() / b_norm;
        let mut steps = 0;
        while error > REFINEMENT_TARGET && steps < MAX_REFINEMENT_STEPS {
            x += cholesky.solve(&residual);
            residual = b - &self.k_ff * &x;
            error = residual.norm() / b_norm;
            steps += 1;
        }
        if steps > 0 {
            debug!("{steps} refinement steps, relative residual {error:.3e}");
        }
        if error > REFINEMENT_TARGET {
            warn!("relative equilibrium error {error:.3e} after refinement");
        }
        (x, error)
    }
}

/// Displacements and reactions of one linear solve
#[derive(Debug, Clone)]
pub struct Solution {
    /// Full displacement vector
    pub displacements: DVec,
    /// K·D − F, zero at free DOFs
    pub reactions: DVec,
    /// Relative residual of the free-DOF system
    pub equilibrium_error: f64,
}

/// Linear system K·D = F subject to a DOF partition
pub struct LinearSystem<'a> {
    k: &'a Mat,
    partition: &'a DofPartition,
}

impl<'a> LinearSystem<'a> {
    pub fn new(k: &'a Mat, partition: &'a DofPartition) -> Self {
        Self { k, partition }
    }

    /// Extract the free-free block of K
    pub fn free_block(&self) -> Mat {
        submatrix(self.k, self.partition.free(), self.partition.free())
    }

    /// Factorize the free-free block of K
    pub fn factorize(&self) -> FrameResult<Factorization> {
        Factorization::new(self.free_block())
    }

    /// Solve for displacements and reactions
    ///
    /// `factorization` must come from this system's K; pass `None` to
    /// factorize here.
    pub fn solve(
        &self,
        forces: &DVec,
        prescribed: &DVec,
        factorization: Option<&Factorization>,
    ) -> FrameResult<Solution> {
        let free = self.partition.free();
        let restrained = self.partition.restrained();

        let owned;
        let factor = match factorization {
            Some(f) => f,
            None => {
                owned = self.factorize()?;
                &owned
            }
        };

        let d_r = subvector(prescribed, restrained);
        let mut rhs = subvector(forces, free);
        if d_r.iter().any(|v| *v != 0.0) {
            rhs -= submatrix(self.k, free, restrained) * &d_r;
        }

        let (d_f, equilibrium_error) = factor.solve(&rhs);

        let mut displacements = prescribed.clone();
        for (pos, &dof) in free.iter().enumerate() {
            displacements[dof] = d_f[pos];
        }

        let mut reactions = DVec::zeros(self.partition.num_dofs());
        for &dof in restrained {
            reactions[dof] = self.k.row(dof).dot(&displacements.transpose()) - forces[dof];
        }

        Ok(Solution {
            displacements,
            reactions,
            equilibrium_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spring_pair() -> (Mat, DofPartition) {
        // Two nodes; only DX of node 2 is free, springs k = 2 between them
        let mut k = Mat::zeros(12, 12);
        for i in 0..6 {
            k[(i, i)] = 2.0;
            k[(i + 6, i + 6)] = 2.0;
            k[(i, i + 6)] = -2.0;
            k[(i + 6, i)] = -2.0;
        }
        let mut restraints = [[true; 6]; 2];
        restraints[1][0] = false;
        (k, DofPartition::new(&restraints))
    }

    #[test]
    fn test_partition_counts() {
        let (_, partition) = spring_pair();
        assert_eq!(partition.free(), &[6]);
        assert_eq!(partition.restrained().len(), 11);
        assert_eq!(partition.free_position(6), Some(0));
        assert!(!partition.is_free(0));
    }

    #[test]
    fn test_solve_with_reactions() {
        let (k, partition) = spring_pair();
        let mut f = DVec::zeros(12);
        f[6] = 10.0;
        let sol = LinearSystem::new(&k, &partition)
            .solve(&f, &DVec::zeros(12), None)
            .unwrap();
        assert_relative_eq!(sol.displacements[6], 5.0, epsilon = 1e-12);
        assert_relative_eq!(sol.reactions[0], -10.0, epsilon = 1e-12);
        assert_eq!(sol.reactions[6], 0.0);
        assert!(sol.equilibrium_error < 1e-12);
    }

    #[test]
    fn test_prescribed_displacement_moves_to_rhs() {
        let (k, partition) = spring_pair();
        let mut prescribed = DVec::zeros(12);
        prescribed[0] = 0.5;
        let sol = LinearSystem::new(&k, &partition)
            .solve(&DVec::zeros(12), &prescribed, None)
            .unwrap();
        assert_relative_eq!(sol.displacements[0], 0.5);
        assert_relative_eq!(sol.displacements[6], 0.5, epsilon = 1e-12);
        assert_relative_eq!(sol.reactions[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mechanism_is_singular() {
        let k = Mat::zeros(12, 12);
        let partition = DofPartition::new(&[[false; 6], [true; 6]]);
        let err = LinearSystem::new(&k, &partition).factorize().unwrap_err();
        assert!(matches!(err, FrameError::StructuralSingularity(_)));
    }

    #[test]
    fn test_near_mechanism_is_degenerate() {
        let mut k = Mat::identity(2, 2);
        k[(1, 1)] = 1e-15;
        let err = Factorization::new(k).unwrap_err();
        assert!(matches!(err, FrameError::NumericalDegeneracy(_)));
    }
}
