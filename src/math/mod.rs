//! Mathematical utilities for frame element calculations

pub mod eigen;
pub mod loads;
pub mod mass;
pub mod transform;

use nalgebra::{DMatrix, DVector, Matrix3, Matrix4, SMatrix, SVector, Vector3};

use crate::elements::Element;

pub use transform::{rotation_matrix, transformation_matrix};

pub type Mat = DMatrix<f64>;
pub type DVec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Mat4 = Matrix4<f64>;
pub type Vec3 = Vector3<f64>;

/// 12x12 matrix for element stiffness and mass
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for element forces/displacements
pub type Vec12 = SVector<f64, 12>;

/// Plane in which an element bends
///
/// Bending blocks are written for the x-y plane convention, where the
/// rotation is the slope of the transverse displacement (theta_z = v').
/// In the x-z plane theta_y = -w', so rotational rows and columns flip sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BendingPlane {
    /// Displacement v along local y, rotation about local z
    XY,
    /// Displacement w along local z, rotation about local y
    XZ,
}

impl BendingPlane {
    /// Local DOF indices of (translation 1, rotation 1, translation 2, rotation 2)
    pub fn dofs(self) -> [usize; 4] {
        match self {
            BendingPlane::XY => [1, 5, 7, 11],
            BendingPlane::XZ => [2, 4, 8, 10],
        }
    }

    /// Sign applied to each of the four DOFs relative to the x-y convention
    pub fn signs(self) -> [f64; 4] {
        match self {
            BendingPlane::XY => [1.0, 1.0, 1.0, 1.0],
            BendingPlane::XZ => [1.0, -1.0, 1.0, -1.0],
        }
    }
}

/// Add a 4x4 bending block (x-y convention) into a 12x12 element matrix
pub fn scatter_bending(k: &mut Mat12, block: &Mat4, plane: BendingPlane) {
    let dofs = plane.dofs();
    let signs = plane.signs();
    for a in 0..4 {
        for b in 0..4 {
            k[(dofs[a], dofs[b])] += signs[a] * signs[b] * block[(a, b)];
        }
    }
}

/// Add a two-DOF coupling [[diag, off], [off, diag]] between local DOFs i and j
pub fn scatter_pair(k: &mut Mat12, i: usize, j: usize, diag: f64, off: f64) {
    k[(i, i)] += diag;
    k[(j, j)] += diag;
    k[(i, j)] += off;
    k[(j, i)] += off;
}

/// Elastic bending block for flexural rigidity `ei`, length `l` and
/// shear factor `phi` (zero for Euler-Bernoulli)
pub fn bending_stiffness(ei: f64, l: f64, phi: f64) -> Mat4 {
    let c = ei / (l * l * l * (1.0 + phi));
    let l2 = l * l;

    #[rustfmt::skip]
    let block = Mat4::new(
        12.0 * c,      6.0 * l * c,               -12.0 * c,     6.0 * l * c,
        6.0 * l * c,   (4.0 + phi) * l2 * c,      -6.0 * l * c,  (2.0 - phi) * l2 * c,
        -12.0 * c,     -6.0 * l * c,              12.0 * c,      -6.0 * l * c,
        6.0 * l * c,   (2.0 - phi) * l2 * c,      -6.0 * l * c,  (4.0 + phi) * l2 * c,
    );
    block
}

/// Geometric bending block for axial tension `t` (negative in compression)
pub fn bending_geometric(t: f64, l: f64, phi: f64) -> Mat4 {
    let d = (1.0 + phi).powi(2);
    let a = t / l * (1.2 + 2.0 * phi + phi * phi) / d;
    let b = t / 10.0 / d;
    let c = t * l * (2.0 / 15.0 + phi / 6.0 + phi * phi / 12.0) / d;
    let e = -t * l * (1.0 / 30.0 + phi / 6.0 + phi * phi / 12.0) / d;

    #[rustfmt::skip]
    let block = Mat4::new(
        a,   b,   -a,  b,
        b,   c,   -b,  e,
        -a,  -b,  a,   -b,
        b,   e,   -b,  c,
    );
    block
}

/// Compute the local stiffness matrix of a 3D frame element
///
/// # Arguments
/// * `element` - Element section and material
/// * `length` - Flexible length (node distance minus rigid joint radii)
/// * `shear` - Include shear deformation
///
/// # Returns
/// 12x12 local stiffness matrix in DOF order
/// [u1, v1, w1, θx1, θy1, θz1, u2, v2, w2, θx2, θy2, θz2]
pub fn element_stiffness(element: &Element, length: f64, shear: bool) -> Mat12 {
    let s = &element.section;
    let e = element.material.e;
    let g = element.material.g;
    let (phi_y, phi_z) = element.shear_factors(length, shear);

    let mut k = Mat12::zeros();
    let ea_l = e * s.ax / length;
    let gj_l = g * s.jx / length;
    scatter_pair(&mut k, 0, 6, ea_l, -ea_l);
    scatter_pair(&mut k, 3, 9, gj_l, -gj_l);
    scatter_bending(&mut k, &bending_stiffness(e * s.iz, length, phi_y), BendingPlane::XY);
    scatter_bending(&mut k, &bending_stiffness(e * s.iy, length, phi_z), BendingPlane::XZ);
    k
}

/// Compute the local geometric stiffness matrix of a frame element
///
/// # Arguments
/// * `element` - Element section and material
/// * `length` - Flexible length
/// * `tension` - Axial force, positive in tension
/// * `shear` - Include shear deformation
pub fn geometric_stiffness(element: &Element, length: f64, tension: f64, shear: bool) -> Mat12 {
    if tension == 0.0 {
        return Mat12::zeros();
    }
    let s = &element.section;
    let (phi_y, phi_z) = element.shear_factors(length, shear);

    let mut k = Mat12::zeros();
    let kt = tension * s.ip() / (s.ax * length);
    scatter_pair(&mut k, 3, 9, kt, -kt);
    scatter_bending(&mut k, &bending_geometric(tension, length, phi_y), BendingPlane::XY);
    scatter_bending(&mut k, &bending_geometric(tension, length, phi_z), BendingPlane::XZ);
    k
}

/// Extract a sub-matrix from selected rows and columns
pub fn submatrix(m: &Mat, rows: &[usize], cols: &[usize]) -> Mat {
    Mat::from_fn(rows.len(), cols.len(), |i, j| m[(rows[i], cols[j])])
}

/// Extract selected entries of a vector
pub fn subvector(v: &DVec, rows: &[usize]) -> DVec {
    DVec::from_fn(rows.len(), |i, _| v[rows[i]])
}

/// Largest absolute difference between two matrices' symmetric counterparts
pub fn asymmetry(m: &Mat) -> f64 {
    let mut worst = 0.0_f64;
    for i in 0..m.nrows() {
        for j in (i + 1)..m.ncols() {
            worst = worst.max((m[(i, j)] - m[(j, i)]).abs());
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Section};
    use approx::assert_relative_eq;

    fn sample_element() -> Element {
        Element::new(
            1,
            1,
            2,
            Section::new(0.01, 0.008, 0.006, 1e-5, 1e-4, 2e-4),
            Material::new(200e9, 77e9, 7850.0),
        )
    }

    #[test]
    fn test_local_stiffness_symmetry() {
        for shear in [false, true] {
            let k = element_stiffness(&sample_element(), 10.0, shear);
            for i in 0..12 {
                for j in 0..12 {
                    assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_local_stiffness_classic_terms() {
        let element = sample_element();
        let l = 4.0;
        let k = element_stiffness(&element, l, false);
        let e = element.material.e;
        let s = element.section;

        assert_relative_eq!(k[(0, 0)], e * s.ax / l, max_relative = 1e-12);
        assert_relative_eq!(k[(1, 1)], 12.0 * e * s.iz / l.powi(3), max_relative = 1e-12);
        assert_relative_eq!(k[(2, 4)], -6.0 * e * s.iy / l.powi(2), max_relative = 1e-12);
        assert_relative_eq!(k[(5, 11)], 2.0 * e * s.iz / l, max_relative = 1e-12);
        assert_relative_eq!(k[(4, 10)], 2.0 * e * s.iy / l, max_relative = 1e-12);
    }

    #[test]
    fn test_stiffness_has_rigid_body_null_space() {
        let k = element_stiffness(&sample_element(), 3.0, true);
        // Rigid translation along y and rigid rotation about z
        let mut translation = Vec12::zeros();
        translation[1] = 1.0;
        translation[7] = 1.0;
        let mut rotation = Vec12::zeros();
        rotation[5] = 1.0;
        rotation[11] = 1.0;
        rotation[7] = 3.0;
        assert!((k * translation).norm() < 1e-3);
        assert!((k * rotation).norm() < 1e-3);
    }

    #[test]
    fn test_shear_softens_bending() {
        let element = sample_element();
        let k_eb = element_stiffness(&element, 1.0, false);
        let k_t = element_stiffness(&element, 1.0, true);
        assert!(k_t[(1, 1)] < k_eb[(1, 1)]);
        assert_relative_eq!(k_t[(0, 0)], k_eb[(0, 0)]);
    }

    #[test]
    fn test_geometric_stiffness_classic_terms() {
        let element = sample_element();
        let kg = geometric_stiffness(&element, 5.0, 1000.0, false);
        assert_relative_eq!(kg[(1, 1)], 6.0 * 1000.0 / (5.0 * 5.0), max_relative = 1e-12);
        assert_relative_eq!(kg[(5, 5)], 2.0 * 1000.0 * 5.0 / 15.0, max_relative = 1e-12);
        assert_relative_eq!(kg[(5, 11)], -1000.0 * 5.0 / 30.0, max_relative = 1e-12);
        assert_relative_eq!(kg[(2, 4)], -100.0, max_relative = 1e-12);
        assert_eq!(geometric_stiffness(&element, 5.0, 0.0, false), Mat12::zeros());
    }
}
