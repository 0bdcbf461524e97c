//! Coordinate transformations between element-local and global axes

use super::{Mat12, Mat3, Vec12, Vec3};

/// Direction cosines below this are treated as a vertical element
const VERTICAL_TOLERANCE: f64 = 1e-9;

/// Compute the 3x3 rotation matrix of an element
///
/// Rows are the local x, y and z axes expressed in global components.
/// Local x runs from `p1` to `p2`. For a non-vertical element with zero
/// roll, local y lies in the global horizontal plane and local z has a
/// positive global Z component. For a vertical element, local y is the
/// global Y axis rotated by the roll angle.
///
/// Returns `None` when the two points coincide.
pub fn rotation_matrix(p1: &Vec3, p2: &Vec3, roll: f64) -> Option<Mat3> {
    let d = p2 - p1;
    let length = d.norm();
    if length < f64::EPSILON {
        return None;
    }

    let cx = d.x / length;
    let cy = d.y / length;
    let cz = d.z / length;
    let (sp, cp) = roll.sin_cos();

    let den = (1.0 - cz * cz).max(0.0).sqrt();

    #[rustfmt::skip]
    let r = if den < VERTICAL_TOLERANCE {
        Mat3::new(
            0.0,        0.0,  cz,
            -cz * sp,   cp,   0.0,
            -cz * cp,   -sp,  0.0,
        )
    } else {
        Mat3::new(
            cx,                               cy,                               cz,
            (-cx * cz * sp - cy * cp) / den,  (-cy * cz * sp + cx * cp) / den,  sp * den,
            (-cx * cz * cp + cy * sp) / den,  (-cy * cz * cp - cx * sp) / den,  cp * den,
        )
    };
    Some(r)
}

/// Build the 12x12 block-diagonal transformation matrix from a rotation
pub fn transformation_matrix(r: &Mat3) -> Mat12 {
    let mut t = Mat12::zeros();
    for block in 0..4 {
        t.fixed_view_mut::<3, 3>(block * 3, block * 3).copy_from(r);
    }
    t
}

/// Transform a local element matrix to global axes: Tᵀ·k·T
pub fn to_global(k_local: &Mat12, t: &Mat12) -> Mat12 {
    t.transpose() * k_local * t
}

/// Transform a global element vector to local axes
pub fn vector_to_local(v_global: &Vec12, t: &Mat12) -> Vec12 {
    t * v_global
}

/// Transform a local element vector to global axes
pub fn vector_to_global(v_local: &Vec12, t: &Mat12) -> Vec12 {
    t.transpose() * v_local
}
