//! Equivalent nodal loads for element span loads
//!
//! All vectors are in the element's local axes and DOF order
//! [u1, v1, w1, θx1, θy1, θz1, u2, v2, w2, θx2, θy2, θz2]. The returned
//! vectors are the nodal loads equivalent to the span load; the fixed-end
//! forces are their negation.

use super::{BendingPlane, Vec12};
use crate::elements::Element;
use crate::loads::{LocalAxis, ThermalLoad};

/// Four-point Gauss-Legendre abscissae and weights on [-1, 1]
const GAUSS_4: [(f64, f64); 4] = [
    (-0.861_136_311_594_052_6, 0.347_854_845_137_453_9),
    (-0.339_981_043_584_856_3, 0.652_145_154_862_546_1),
    (0.339_981_043_584_856_3, 0.652_145_154_862_546_1),
    (0.861_136_311_594_052_6, 0.347_854_845_137_453_9),
];

/// Loaded span geometry: length and shear factors of both bending planes
#[derive(Debug, Clone, Copy)]
pub struct Span {
    pub length: f64,
    pub phi_y: f64,
    pub phi_z: f64,
}

impl Span {
    pub fn new(length: f64, phi_y: f64, phi_z: f64) -> Self {
        Self {
            length,
            phi_y,
            phi_z,
        }
    }

    /// Span of an element with shear factors taken at `length`
    pub fn of(element: &Element, length: f64, shear: bool) -> Self {
        let (phi_y, phi_z) = element.shear_factors(length, shear);
        Self::new(length, phi_y, phi_z)
    }

    fn phi(&self, plane: BendingPlane) -> f64 {
        match plane {
            BendingPlane::XY => self.phi_y,
            BendingPlane::XZ => self.phi_z,
        }
    }
}

/// Shear-flexible beam shape functions at position `x`
///
/// Returns (N1, N2, N3, N4) weighting (translation 1, rotation 1,
/// translation 2, rotation 2) in the x-y plane convention.
pub fn bending_shape(x: f64, length: f64, phi: f64) -> [f64; 4] {
    let xi = x / length;
    let xi2 = xi * xi;
    let xi3 = xi2 * xi;
    let d = 1.0 + phi;
    [
        (1.0 - 3.0 * xi2 + 2.0 * xi3 + phi * (1.0 - xi)) / d,
        length * (xi - 2.0 * xi2 + xi3 + phi / 2.0 * (xi - xi2)) / d,
        (3.0 * xi2 - 2.0 * xi3 + phi * xi) / d,
        length * (-xi2 + xi3 - phi / 2.0 * (xi - xi2)) / d,
    ]
}

fn plane_of(axis: LocalAxis) -> Option<BendingPlane> {
    match axis {
        LocalAxis::X => None,
        LocalAxis::Y => Some(BendingPlane::XY),
        LocalAxis::Z => Some(BendingPlane::XZ),
    }
}

/// Add a transverse or axial force `p` acting at `x` into `eq`
fn add_point(eq: &mut Vec12, axis: LocalAxis, p: f64, x: f64, span: &Span) {
    match plane_of(axis) {
        None => {
            let xi = x / span.length;
            eq[0] += p * (1.0 - xi);
            eq[6] += p * xi;
        }
        Some(plane) => {
            let n = bending_shape(x, span.length, span.phi(plane));
            let dofs = plane.dofs();
            let signs = plane.signs();
            for i in 0..4 {
                eq[dofs[i]] += signs[i] * n[i] * p;
            }
        }
    }
}

/// Equivalent nodal loads of a linearly varying load from `x1` to `x2`
///
/// The integrand is at most quartic, so four Gauss points integrate it
/// exactly.
pub fn trapezoidal_equivalent(
    axis: LocalAxis,
    x1: f64,
    x2: f64,
    w1: f64,
    w2: f64,
    span: &Span,
) -> Vec12 {
    let mut eq = Vec12::zeros();
    let half = (x2 - x1) / 2.0;
    if half <= 0.0 {
        return eq;
    }
    let mid = (x1 + x2) / 2.0;
    for (g, wt) in GAUSS_4 {
        let x = mid + half * g;
        let t = (x - x1) / (x2 - x1);
        let w = w1 + (w2 - w1) * t;
        add_point(&mut eq, axis, w * wt * half, x, span);
    }
    eq
}

/// Equivalent nodal loads of a load uniform over the whole span
pub fn uniform_equivalent(w: [f64; 3], span: &Span) -> Vec12 {
    [LocalAxis::X, LocalAxis::Y, LocalAxis::Z]
        .into_iter()
        .filter(|axis| w[axis.index()] != 0.0)
        .map(|axis| {
            let wi = w[axis.index()];
            trapezoidal_equivalent(axis, 0.0, span.length, wi, wi, span)
        })
        .sum()
}

/// Equivalent nodal loads of a concentrated force at distance `x` from node 1
pub fn point_equivalent(p: [f64; 3], x: f64, span: &Span) -> Vec12 {
    let mut eq = Vec12::zeros();
    for axis in [LocalAxis::X, LocalAxis::Y, LocalAxis::Z] {
        let pi = p[axis.index()];
        if pi != 0.0 {
            add_point(&mut eq, axis, pi, x, span);
        }
    }
    eq
}

/// Equivalent nodal loads of a temperature change
///
/// Restraining the free thermal strain and curvatures requires end forces
/// of magnitude EAε and EI·κ; the equivalent loads are their reactions.
pub fn thermal_equivalent(element: &Element, load: &ThermalLoad) -> Vec12 {
    let e = element.material.e;
    let s = &element.section;
    let n = e * s.ax * load.axial_strain();
    let mz = e * s.iz * load.curvature_z();
    let my = e * s.iy * load.curvature_y();

    let mut eq = Vec12::zeros();
    eq[0] = -n;
    eq[6] = n;
    eq[5] = -mz;
    eq[11] = mz;
    eq[4] = -my;
    eq[10] = my;
    eq
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Section};
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_fixed_end_values() {
        let l = 6.0;
        let w = -2.5;
        let eq = uniform_equivalent([0.0, w, w], &Span::new(l, 0.0, 0.0));
        assert_relative_eq!(eq[1], w * l / 2.0, epsilon = 1e-12);
        assert_relative_eq!(eq[5], w * l * l / 12.0, epsilon = 1e-12);
        assert_relative_eq!(eq[11], -w * l * l / 12.0, epsilon = 1e-12);
        assert_relative_eq!(eq[2], w * l / 2.0, epsilon = 1e-12);
        assert_relative_eq!(eq[4], -w * l * l / 12.0, epsilon = 1e-12);
        assert_relative_eq!(eq[10], w * l * l / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_moments_unchanged_by_shear() {
        let l = 2.0;
        let eq = uniform_equivalent([0.0, 1.0, 0.0], &Span::new(l, 0.8, 0.0));
        assert_relative_eq!(eq[5], l * l / 12.0, epsilon = 1e-12);
        assert_relative_eq!(eq[1] + eq[7], l, epsilon = 1e-12);
    }

    #[test]
    fn test_midspan_point_load() {
        let l = 4.0;
        let p = 10.0;
        let eq = point_equivalent([3.0, p, 0.0], l / 2.0, &Span::new(l, 0.0, 0.0));
        assert_relative_eq!(eq[1], p / 2.0, epsilon = 1e-12);
        assert_relative_eq!(eq[5], p * l / 8.0, epsilon = 1e-12);
        assert_relative_eq!(eq[11], -p * l / 8.0, epsilon = 1e-12);
        assert_relative_eq!(eq[0], 1.5, epsilon = 1e-12);
        assert_relative_eq!(eq[6], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_partial_triangular_load_resultant() {
        let span = Span::new(5.0, 0.0, 0.0);
        let eq = trapezoidal_equivalent(LocalAxis::Y, 1.0, 4.0, 0.0, 6.0, &span);
        // Resultant 9 at x = 3
        assert_relative_eq!(eq[1] + eq[7], 9.0, epsilon = 1e-12);
        let moment_about_node1 = eq[5] + eq[11] + eq[7] * 5.0;
        assert_relative_eq!(moment_about_node1, 27.0, epsilon = 1e-10);
    }

    #[test]
    fn test_thermal_axial_load() {
        let element = Element::new(
            1,
            1,
            2,
            Section::new(0.01, 0.0, 0.0, 1e-6, 1e-5, 1e-5),
            Material::new(200e9, 80e9, 0.0),
        );
        let load = ThermalLoad::uniform(1, 1e-5, 0.2, 0.2, 10.0);
        let eq = thermal_equivalent(&element, &load);
        assert_relative_eq!(eq[6], 200e9 * 0.01 * 1e-4, max_relative = 1e-12);
        assert_relative_eq!(eq[0], -eq[6]);
        assert_eq!(eq[5], 0.0);
    }
}
