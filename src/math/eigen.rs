//! Generalized symmetric eigenproblem solvers: K·φ = λ·M·φ
//!
//! Both solvers expect K positive definite and M positive semi-definite,
//! restricted to the free DOFs. Eigenvectors are mass-normalized.

use log::{debug, warn};
use nalgebra::{Cholesky, Dyn};

use super::{DVec, Mat};
use crate::error::{FrameError, FrameResult};

/// Lowest eigenpairs of a generalized eigenproblem
#[derive(Debug, Clone)]
pub struct EigenSolution {
    /// Eigenvalues in ascending order
    pub values: Vec<f64>,
    /// Mass-normalized eigenvectors, one per column
    pub vectors: Mat,
    /// Iterations used
    pub iterations: usize,
}

/// Iteration limits shared by both solvers
#[derive(Debug, Clone, Copy)]
pub struct EigenControl {
    pub modes: usize,
    pub tolerance: f64,
    pub max_iterations: usize,
}

fn factor_stiffness(k: &Mat) -> FrameResult<Cholesky<f64, Dyn>> {
    k.clone().cholesky().ok_or_else(|| {
        FrameError::StructuralSingularity(
            "stiffness matrix is not positive definite; the structure may be a mechanism".into(),
        )
    })
}

/// Solve a small dense generalized problem Kr·q = λ·Mr·q
///
/// Returns eigenvalues ascending and Mr-normalized eigenvectors.
fn reduced_eigen(kr: &Mat, mr: &Mat) -> FrameResult<(Vec<f64>, Mat)> {
    let l = mr
        .clone()
        .cholesky()
        .ok_or_else(|| FrameError::NumericalDegeneracy("reduced mass matrix is singular".into()))?
        .l();
    let degenerate = || FrameError::NumericalDegeneracy("reduced mass factor is singular".into());

    let b = l.solve_lower_triangular(kr).ok_or_else(degenerate)?;
    let a = l.solve_lower_triangular(&b.transpose()).ok_or_else(degenerate)?;
    let a = (&a + a.transpose()) * 0.5;
    let size = a.nrows();

    let eig = a.symmetric_eigen();
    let mut order: Vec<usize> = (0..eig.eigenvalues.len()).collect();
    order.sort_by(|&i, &j| eig.eigenvalues[i].total_cmp(&eig.eigenvalues[j]));

    let values = order.iter().map(|&i| eig.eigenvalues[i]).collect();
    let z = Mat::from_fn(size, order.len(), |r, c| eig.eigenvectors[(r, order[c])]);
    let q = l.tr_solve_lower_triangular(&z).ok_or_else(degenerate)?;
    Ok((values, q))
}

/// Starting vectors for subspace iteration
///
/// The first column is the mass diagonal; the rest are unit vectors at the
/// DOFs with the smallest stiffness-to-mass ratio.
fn starting_subspace(k: &Mat, m: &Mat, q: usize) -> Mat {
    let n = k.nrows();
    let mut ratios: Vec<(usize, f64)> = (0..n)
        .filter(|&i| m[(i, i)] > 0.0)
        .map(|i| (i, k[(i, i)] / m[(i, i)]))
        .collect();
    ratios.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut x = Mat::zeros(n, q);
    for i in 0..n {
        x[(i, 0)] = m[(i, i)];
    }
    for (col, (dof, _)) in (1..q).zip(ratios.iter()) {
        x[(*dof, col)] = 1.0;
    }
    x
}

/// Subspace iteration with Rayleigh-Ritz projection
pub fn subspace(k: &Mat, m: &Mat, control: EigenControl) -> FrameResult<EigenSolution> {
    let n = k.nrows();
    let p = control.modes;
    let massive = (0..n).filter(|&i| m[(i, i)] > 0.0).count();
    if p > massive {
        return Err(FrameError::invalid(format!(
            "requested {p} modes but only {massive} DOFs carry mass"
        )));
    }
    let q = (2 * p).max(p + 8).min(massive);

    let chol = factor_stiffness(k)?;
    let mut x = starting_subspace(k, m, q);
    let mut previous = vec![0.0; q];

    for iteration in 1..=control.max_iterations {
        let y = m * &x;
        let x_bar = chol.solve(&y);
        let kr = x_bar.transpose() * &y;
        let mr = x_bar.transpose() * m * &x_bar;
        let (values, q_vecs) = reduced_eigen(&kr, &mr)?;
        x = &x_bar * q_vecs;

        let converged = (0..p)
            .filter(|&i| (values[i] - previous[i]).abs() <= control.tolerance * values[i].abs())
            .count();
        debug!("subspace iteration {iteration}: {converged}/{p} modes converged");

        if converged == p {
            return Ok(EigenSolution {
                values: values[..p].to_vec(),
                vectors: x.columns(0, p).into_owned(),
                iterations: iteration,
            });
        }
        if iteration == control.max_iterations {
            return Err(FrameError::EigenNonConvergence {
                iterations: iteration,
                converged,
                requested: p,
            });
        }
        previous = values;
    }

    Err(FrameError::EigenNonConvergence {
        iterations: control.max_iterations,
        converged: 0,
        requested: p,
    })
}

/// Remove the M-projection of `x` onto each found mode
fn deflate(x: &mut DVec, m: &Mat, found: &[DVec]) {
    for phi in found {
        let c = phi.dot(&(m * &*x));
        x.axpy(-c, phi, 1.0);
    }
}

/// Inverse matrix iteration (Stodola) with M-orthogonal deflation
pub fn stodola(k: &Mat, m: &Mat, control: EigenControl) -> FrameResult<EigenSolution> {
    let n = k.nrows();
    let p = control.modes;
    let chol = factor_stiffness(k)?;

    let mut values = Vec::with_capacity(p);
    let mut found: Vec<DVec> = Vec::with_capacity(p);
    let mut total_iterations = 0;

    for mode in 0..p {
        let mut x = DVec::from_fn(n, |i, _| 1.0 + (i + mode) as f64 / n as f64);
        deflate(&mut x, m, &found);
        let mut lambda = 0.0;
        let mut converged = false;

        for _ in 0..control.max_iterations {
            total_iterations += 1;
            let mut next = chol.solve(&(m * &x));
            deflate(&mut next, m, &found);

            let mass_norm = next.dot(&(m * &next));
            if mass_norm.is_nan() || mass_norm <= 0.0 {
                return Err(FrameError::NumericalDegeneracy(format!(
                    "iteration vector for mode {} has no mass",
                    mode + 1
                )));
            }
            next /= mass_norm.sqrt();
            let updated = next.dot(&(k * &next));

            converged = (updated - lambda).abs() <= control.tolerance * updated.abs();
            lambda = updated;
            x = next;
            if converged {
                break;
            }
        }

        if !converged {
            return Err(FrameError::EigenNonConvergence {
                iterations: total_iterations,
                converged: mode,
                requested: p,
            });
        }
        debug!("stodola mode {}: lambda = {lambda:.6e}", mode + 1);
        values.push(lambda);
        found.push(x);
    }

    let mut vectors = Mat::zeros(n, p);
    for (col, phi) in found.iter().enumerate() {
        vectors.set_column(col, phi);
    }
    Ok(EigenSolution {
        values,
        vectors,
        iterations: total_iterations,
    })
}

/// Number of eigenvalues of K·φ = λ·M·φ below `sigma`
///
/// Counts the negative pivots of the LDLᵀ factorization of K − σ·M.
/// Returns `None` if a pivot is exactly zero (σ is an eigenvalue).
pub fn sturm_count(k: &Mat, m: &Mat, sigma: f64) -> Option<usize> {
    let mut a = k - m * sigma;
    let n = a.nrows();
    let mut negative = 0;
    for j in 0..n {
        let pivot = a[(j, j)];
        if pivot == 0.0 || !pivot.is_finite() {
            return None;
        }
        if pivot < 0.0 {
            negative += 1;
        }
        for i in (j + 1)..n {
            let factor = a[(i, j)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in (j + 1)..n {
                a[(i, c)] -= factor * a[(j, c)];
            }
        }
    }
    Some(negative)
}

/// Warn when the Sturm sequence shows eigenvalues missed below the highest one found
pub fn check_missed_modes(k: &Mat, m: &Mat, solution: &EigenSolution, tolerance: f64) {
    let Some(&highest) = solution.values.last() else {
        return;
    };
    let sigma = highest * (1.0 + tolerance.max(1e-6) * 10.0);
    match sturm_count(k, m, sigma) {
        Some(count) if count > solution.values.len() => warn!(
            "Sturm check: {count} eigenvalues below {sigma:.6e} but only {} modes found; modes may have been missed",
            solution.values.len()
        ),
        Some(_) => debug!("Sturm check passed"),
        None => debug!("Sturm check skipped: shift coincides with an eigenvalue"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Fixed-free spring-mass chain with unit springs and masses
    fn chain(n: usize) -> (Mat, Mat) {
        let mut k = Mat::zeros(n, n);
        for i in 0..n {
            k[(i, i)] = if i + 1 < n { 2.0 } else { 1.0 };
            if i + 1 < n {
                k[(i, i + 1)] = -1.0;
                k[(i + 1, i)] = -1.0;
            }
        }
        (k, Mat::identity(n, n))
    }

    fn exact_chain(n: usize, mode: usize) -> f64 {
        let angle = (2 * mode + 1) as f64 * std::f64::consts::PI / (2.0 * (2 * n + 1) as f64);
        4.0 * angle.sin().powi(2)
    }

    fn control(modes: usize) -> EigenControl {
        EigenControl {
            modes,
            tolerance: 1e-12,
            max_iterations: 500,
        }
    }

    #[test]
    fn test_subspace_matches_chain_eigenvalues() {
        let (k, m) = chain(20);
        let sol = subspace(&k, &m, control(3)).unwrap();
        for mode in 0..3 {
            assert_relative_eq!(sol.values[mode], exact_chain(20, mode), max_relative = 1e-8);
        }
        let check = sol.vectors.transpose() * &m * &sol.vectors;
        assert_relative_eq!(check, Mat::identity(3, 3), epsilon = 1e-8);
    }

    #[test]
    fn test_stodola_matches_subspace() {
        let (k, m) = chain(8);
        let a = subspace(&k, &m, control(2)).unwrap();
        let b = stodola(&k, &m, control(2)).unwrap();
        for mode in 0..2 {
            assert_relative_eq!(a.values[mode], b.values[mode], max_relative = 1e-8);
        }
    }

    #[test]
    fn test_sturm_count() {
        let (k, m) = chain(6);
        let between = (exact_chain(6, 1) + exact_chain(6, 2)) / 2.0;
        assert_eq!(sturm_count(&k, &m, between), Some(2));
        assert_eq!(sturm_count(&k, &m, 0.0), Some(0));
    }

    #[test]
    fn test_singular_stiffness_reported() {
        let k = Mat::zeros(3, 3);
        let m = Mat::identity(3, 3);
        assert!(matches!(
            subspace(&k, &m, control(1)),
            Err(FrameError::StructuralSingularity(_))
        ));
    }

    #[test]
    fn test_iteration_limit_reported() {
        let (k, m) = chain(30);
        let limited = EigenControl {
            modes: 4,
            tolerance: 1e-14,
            max_iterations: 1,
        };
        assert!(matches!(
            subspace(&k, &m, limited),
            Err(FrameError::EigenNonConvergence { iterations: 1, .. })
        ));
    }
}
