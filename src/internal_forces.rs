//! Internal force and deflection distributions along elements
//!
//! Forces are taken on the positive face of a cut at distance x from node 1:
//! equilibrium of the segment [0, x] under the node-1 end forces and the span
//! loads on it. Deflections integrate curvature and shear strain from the
//! node-1 displacements and are corrected linearly to close on node 2.

use crate::assembly::ElementLoads;
use crate::elements::Element;
use crate::loads::LocalAxis;
use crate::math::Vec12;
use crate::results::{InternalForcePoint, InternalForceSeries};

/// Internal forces at one section
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SectionForces {
    n: f64,
    vy: f64,
    vz: f64,
    t: f64,
    my: f64,
    mz: f64,
}

/// Resultant ∫w ds and first moment ∫w·(x − s) ds of a linear load from
/// `a` to `b` acting on the segment [0, x]
fn linear_load_integrals(x: f64, a: f64, b: f64, w1: f64, w2: f64) -> (f64, f64) {
    if x <= a || b <= a {
        return (0.0, 0.0);
    }
    let k = (w2 - w1) / (b - a);
    let c = x.min(b) - a;
    let big_x = x - a;
    let resultant = w1 * c + k * c * c / 2.0;
    let moment = w1 * (big_x * c - c * c / 2.0) + k * (big_x * c * c / 2.0 - c * c * c / 3.0);
    (resultant, moment)
}

/// Evaluates internal forces and deflections of one loaded element
pub struct InternalForceEvaluator<'a> {
    element: &'a Element,
    length: f64,
    shear: bool,
    end_forces: Vec12,
    displacements: Vec12,
    loads: &'a ElementLoads,
}

impl<'a> InternalForceEvaluator<'a> {
    /// `end_forces` and `displacements` are the element's local vectors.
    pub fn new(
        element: &'a Element,
        length: f64,
        shear: bool,
        end_forces: Vec12,
        displacements: Vec12,
        loads: &'a ElementLoads,
    ) -> Self {
        Self {
            element,
            length,
            shear,
            end_forces,
            displacements,
            loads,
        }
    }

    fn forces_at(&self, x: f64) -> SectionForces {
        let f = &self.end_forces;
        // [∫w ds, ∫w (x - s) ds] along local x, y, z
        let mut resultant = [0.0; 3];
        let mut moment = [0.0; 3];

        for axis in 0..3 {
            let w = self.loads.uniform[axis];
            if w != 0.0 {
                let (r, m) = linear_load_integrals(x, 0.0, self.length, w, w);
                resultant[axis] += r;
                moment[axis] += m;
            }
        }
        for t in &self.loads.trapezoidal {
            let axis = t.axis.index();
            let (r, m) = linear_load_integrals(x, t.x1, t.x2, t.w1, t.w2);
            resultant[axis] += r;
            moment[axis] += m;
        }
        for p in &self.loads.span {
            if x > p.x {
                for (axis, value) in p.as_array().iter().enumerate() {
                    resultant[axis] += value;
                    moment[axis] += value * (x - p.x);
                }
            }
        }

        let (ix, iy, iz) = (
            LocalAxis::X.index(),
            LocalAxis::Y.index(),
            LocalAxis::Z.index(),
        );
        SectionForces {
            n: -f[0] - resultant[ix],
            vy: -f[1] - resultant[iy],
            vz: -f[2] - resultant[iz],
            t: -f[3],
            my: -f[4] - f[2] * x - moment[iz],
            mz: -f[5] + f[1] * x + moment[iy],
        }
    }

    /// `max(1, floor(length / dx))` sample positions at multiples of `dx`
    pub fn sample_positions(length: f64, dx: f64) -> Vec<f64> {
        let n = ((length / dx).floor() as usize).max(1);
        (0..n).map(|k| (k as f64 * dx).min(length)).collect()
    }

    /// Evaluate forces and deflections at multiples of `dx`
    pub fn evaluate(&self, dx: f64) -> InternalForceSeries {
        let e = self.element.material.e;
        let g = self.element.material.g;
        let s = &self.element.section;
        let (kz_thermal, ky_thermal) = self.loads.thermal_curvature();
        let eps_thermal = self.loads.thermal_strain();
        let shear = self.shear;

        // Rates of the integrated quantities at x:
        // [u', φ', θz', θy', γy, γz]
        let rates = |x: f64| -> ([f64; 6], SectionForces) {
            let q = self.forces_at(x);
            let (gy, gz) = if shear {
                (q.vy / (g * s.asy), q.vz / (g * s.asz))
            } else {
                (0.0, 0.0)
            };
            (
                [
                    q.n / (e * s.ax) + eps_thermal,
                    q.t / (g * s.jx),
                    q.mz / (e * s.iz) + kz_thermal,
                    q.my / (e * s.iy) + ky_thermal,
                    gy,
                    gz,
                ],
                q,
            )
        };

        let d = &self.displacements;
        let samples = Self::sample_positions(self.length, dx);
        // Integrate through to the far end so the result closes on node 2
        let mut xs = samples.clone();
        if xs.last().map_or(true, |&last| self.length - last > 1e-9 * self.length) {
            xs.push(self.length);
        }

        // State: u, φ, θz, θy, v, w
        let mut state = [d[0], d[3], d[5], d[4], d[1], d[2]];
        let mut states = Vec::with_capacity(xs.len());
        let mut sections = Vec::with_capacity(xs.len());

        let (mut r0, q0) = rates(xs[0]);
        states.push(state);
        sections.push(q0);

        for window in xs.windows(2) {
            let (x0, x1) = (window[0], window[1]);
            let h = x1 - x0;
            let (rm, _) = rates((x0 + x1) / 2.0);
            let (r1, q1) = rates(x1);
            let simpson = |k: usize| h / 6.0 * (r0[k] + 4.0 * rm[k] + r1[k]);
            // ∫θ over the step for θ quadratic in x
            let slope_integral = |theta0: f64, k: usize| theta0 * h + h * h / 6.0 * (r0[k] + 2.0 * rm[k]);

            let dv = slope_integral(state[2], 2) + simpson(4);
            let dw = -slope_integral(state[3], 3) + simpson(5);
            state[0] += simpson(0);
            state[1] += simpson(1);
            state[2] += simpson(2);
            state[3] += simpson(3);
            state[4] += dv;
            state[5] += dw;

            states.push(state);
            sections.push(q1);
            r0 = r1;
        }

        // Close on the node-2 local displacements
        let target = [d[6], d[9], d[11], d[10], d[7], d[8]];
        let last = states[states.len() - 1];
        let end = xs[xs.len() - 1];
        let drift: Vec<f64> = (0..6).map(|k| last[k] - target[k]).collect();

        let points = samples
            .iter()
            .zip(states.iter().zip(sections.iter()))
            .map(|(&x, (st, q))| {
                let frac = if end > 0.0 { x / end } else { 0.0 };
                let corrected = |k: usize| st[k] - drift[k] * frac;
                InternalForcePoint {
                    x,
                    nx: q.n,
                    vy: q.vy,
                    vz: q.vz,
                    tx: q.t,
                    my: q.my,
                    mz: q.mz,
                    dx: corrected(0),
                    dy: corrected(4),
                    dz: corrected(5),
                    rx: corrected(1),
                }
            })
            .collect();

        InternalForceSeries {
            element: self.element.id,
            points,
        }
    }
}
