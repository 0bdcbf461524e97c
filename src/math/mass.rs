//! Element mass matrices

use super::{scatter_bending, scatter_pair, BendingPlane, Mat12, Mat4};
use crate::elements::Element;

/// Translational consistent mass block for total mass `m` and length `l`
fn translational_block(m: f64, l: f64) -> Mat4 {
    let c = m / 420.0;
    let l2 = l * l;

    #[rustfmt::skip]
    let block = Mat4::new(
        156.0 * c,     22.0 * l * c,   54.0 * c,      -13.0 * l * c,
        22.0 * l * c,  4.0 * l2 * c,   13.0 * l * c,  -3.0 * l2 * c,
        54.0 * c,      13.0 * l * c,   156.0 * c,     -22.0 * l * c,
        -13.0 * l * c, -3.0 * l2 * c,  -22.0 * l * c, 4.0 * l2 * c,
    );
    block
}

/// Rotary inertia block for mass moment density `rho_i` (density times I)
fn rotary_block(rho_i: f64, l: f64) -> Mat4 {
    let c = rho_i / (30.0 * l);
    let l2 = l * l;

    #[rustfmt::skip]
    let block = Mat4::new(
        36.0 * c,      3.0 * l * c,   -36.0 * c,     3.0 * l * c,
        3.0 * l * c,   4.0 * l2 * c,  -3.0 * l * c,  -l2 * c,
        -36.0 * c,     -3.0 * l * c,  36.0 * c,      -3.0 * l * c,
        3.0 * l * c,   -l2 * c,       -3.0 * l * c,  4.0 * l2 * c,
    );
    block
}

/// Consistent local mass matrix of a frame element
///
/// Includes translational and rotary inertia in both bending planes, axial
/// mass and torsional polar inertia.
pub fn consistent_mass(element: &Element, length: f64) -> Mat12 {
    let rho = element.material.density;
    let s = &element.section;
    let m = rho * s.ax * length;

    let mut k = Mat12::zeros();
    scatter_pair(&mut k, 0, 6, m / 3.0, m / 6.0);
    let jp = rho * s.ip() * length;
    scatter_pair(&mut k, 3, 9, jp / 3.0, jp / 6.0);

    let translation = translational_block(m, length);
    scatter_bending(&mut k, &(translation + rotary_block(rho * s.iz, length)), BendingPlane::XY);
    scatter_bending(&mut k, &(translation + rotary_block(rho * s.iy, length)), BendingPlane::XZ);
    k
}

/// Lumped (diagonal) local mass matrix of a frame element
pub fn lumped_mass(element: &Element, length: f64) -> Mat12 {
    let rho = element.material.density;
    let s = &element.section;
    let half_mass = rho * s.ax * length / 2.0;
    let half = |i: f64| rho * i * length / 2.0;

    let node = [half_mass, half_mass, half_mass, half(s.ip()), half(s.iy), half(s.iz)];
    let mut k = Mat12::zeros();
    for (i, value) in node.iter().enumerate() {
        k[(i, i)] = *value;
        k[(i + 6, i + 6)] = *value;
    }
    k
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Section};
    use crate::math::Vec12;
    use approx::assert_relative_eq;

    fn beam() -> Element {
        Element::new(
            1,
            1,
            2,
            Section::new(0.02, 0.0, 0.0, 2e-5, 3e-5, 4e-5),
            Material::new(70e9, 26e9, 2700.0),
        )
    }

    fn rigid_translation(dir: usize) -> Vec12 {
        let mut v = Vec12::zeros();
        v[dir] = 1.0;
        v[dir + 6] = 1.0;
        v
    }

    #[test]
    fn test_consistent_mass_preserves_total_mass() {
        let element = beam();
        let l = 3.0;
        let m = consistent_mass(&element, l);
        let total = element.mass_per_length() * l;
        for dir in 0..3 {
            let r = rigid_translation(dir);
            assert_relative_eq!((r.transpose() * m * r)[(0, 0)], total, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_consistent_mass_is_symmetric() {
        let m = consistent_mass(&beam(), 2.5);
        assert_relative_eq!(m, m.transpose(), epsilon = 1e-12);
    }

    #[test]
    fn test_lumped_mass_is_diagonal() {
        let element = beam();
        let m = lumped_mass(&element, 2.0);
        let total = element.mass_per_length() * 2.0;
        assert_relative_eq!(m[(0, 0)] + m[(6, 6)], total, max_relative = 1e-12);
        assert_relative_eq!(m[(4, 4)], 2700.0 * 3e-5, max_relative = 1e-12);
        assert_eq!(m[(0, 6)], 0.0);
    }
}
