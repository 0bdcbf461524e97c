//! Global stiffness and load assembly

use log::debug;

use crate::elements::Element;
use crate::error::{FrameError, FrameResult};
use crate::loads::{LoadCase, SpanLoad, ThermalLoad, TrapezoidalLoad};
use crate::math::loads::{self as eqv, Span};
use crate::math::transform::{to_global, vector_to_global};
use crate::math::{self, DVec, Mat, Mat12, Vec12, Vec3};
use crate::model::{ElementGeometry, Model};

/// Span loads acting on one element for one load case, in local axes
#[derive(Debug, Clone, Default)]
pub struct ElementLoads {
    /// Uniform load per length over the whole element (explicit plus self-weight)
    pub uniform: [f64; 3],
    pub trapezoidal: Vec<TrapezoidalLoad>,
    pub span: Vec<SpanLoad>,
    pub thermal: Vec<ThermalLoad>,
    /// Equivalent nodal loads of everything above
    pub equivalent: Vec12,
}

impl ElementLoads {
    /// Fixed-end forces, the negated equivalent loads
    pub fn fixed_end_forces(&self) -> Vec12 {
        -self.equivalent
    }

    /// Free thermal axial strain
    pub fn thermal_strain(&self) -> f64 {
        self.thermal.iter().map(ThermalLoad::axial_strain).sum()
    }

    /// Free thermal rates of rotation (about local z, about local y)
    pub fn thermal_curvature(&self) -> (f64, f64) {
        self.thermal.iter().fold((0.0, 0.0), |(kz, ky), t| {
            (kz + t.curvature_z(), ky + t.curvature_y())
        })
    }
}

/// Load vector of one case plus the per-element span loads behind it
#[derive(Debug, Clone)]
pub struct AssembledLoads {
    /// Global nodal load vector including equivalent span loads
    pub forces: DVec,
    /// Span loads per element, in element order
    pub elements: Vec<ElementLoads>,
}

/// Builds global matrices and vectors from a model
pub struct GlobalAssembler<'a> {
    model: &'a Model,
}

impl<'a> GlobalAssembler<'a> {
    /// Create an assembler for a model
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Local stiffness of an element, plus geometric stiffness for `tension`
    pub fn element_stiffness(&self, idx: usize, tension: Option<f64>) -> Mat12 {
        let element = &self.model.elements()[idx];
        let geom = self.model.geometry(idx);
        let shear = self.model.options().shear;
        let mut k = math::element_stiffness(element, geom.effective_length, shear);
        if let Some(t) = tension {
            k += math::geometric_stiffness(element, geom.effective_length, t, shear);
        }
        k
    }

    /// Assemble the global stiffness matrix
    ///
    /// `tensions` holds one axial force per element when geometric stiffness
    /// is to be included.
    pub fn stiffness(&self, tensions: Option<&[f64]>) -> Mat {
        let n = self.model.num_dofs();
        let mut k = Mat::zeros(n, n);
        for idx in 0..self.model.elements().len() {
            let tension = tensions.map(|t| t[idx]);
            let local = self.element_stiffness(idx, tension);
            let geom = self.model.geometry(idx);
            scatter(&mut k, &to_global(&local, &geom.transform), geom);
        }
        debug!("assembled {n}x{n} global stiffness");
        k
    }

    /// Assemble the global load vector of a load case
    ///
    /// Validates every load against the model before anything is assembled.
    pub fn loads(&self, case: &LoadCase) -> FrameResult<AssembledLoads> {
        self.validate(case)?;

        let model = self.model;
        let shear = model.options().shear;
        let mut forces = DVec::zeros(model.num_dofs());

        for load in &case.node_loads {
            let base = model.dof(load.node, 0)?;
            for (k, value) in load.as_array().iter().enumerate() {
                forces[base + k] += value;
            }
        }

        let mut elements: Vec<ElementLoads> = vec![ElementLoads::default(); model.elements().len()];

        if case.has_gravity() {
            let g = Vec3::from(case.gravity);
            for (idx, element) in model.elements().iter().enumerate() {
                let local = model.geometry(idx).rotation * (g * element.mass_per_length());
                for axis in 0..3 {
                    elements[idx].uniform[axis] += local[axis];
                }
            }
        }
        for load in &case.uniform_loads {
            let idx = model.element_index(load.element)?;
            for (axis, w) in load.as_array().iter().enumerate() {
                elements[idx].uniform[axis] += w;
            }
        }
        for load in &case.trapezoidal_loads {
            elements[model.element_index(load.element)?].trapezoidal.push(*load);
        }
        for load in &case.span_loads {
            elements[model.element_index(load.element)?].span.push(*load);
        }
        for load in &case.thermal_loads {
            elements[model.element_index(load.element)?].thermal.push(*load);
        }

        for (idx, loads) in elements.iter_mut().enumerate() {
            let element = &model.elements()[idx];
            let geom = model.geometry(idx);
            loads.equivalent = equivalent_loads(element, geom, loads, shear);
            if loads.equivalent.iter().all(|v| *v == 0.0) {
                continue;
            }
            let global = vector_to_global(&loads.equivalent, &geom.transform);
            for (local_dof, dof) in geom.dofs().iter().enumerate() {
                forces[*dof] += global[local_dof];
            }
        }

        Ok(AssembledLoads { forces, elements })
    }

    fn validate(&self, case: &LoadCase) -> FrameResult<()> {
        let model = self.model;

        finite(&case.gravity, "gravity")?;
        for load in &case.node_loads {
            model.node_index(load.node)?;
            finite(&load.as_array(), &format!("point load at node {}", load.node))?;
        }
        for load in &case.uniform_loads {
            model.element_index(load.element)?;
            finite(&load.as_array(), &format!("uniform load on element {}", load.element))?;
        }
        for load in &case.trapezoidal_loads {
            let length = self.length_of(load.element)?;
            finite(&[load.x1, load.x2, load.w1, load.w2], "trapezoidal load")?;
            if !(load.x1 >= 0.0 && load.x1 < load.x2 && load.x2 <= length * (1.0 + 1e-12)) {
                return Err(FrameError::invalid(format!(
                    "trapezoidal load on element {} needs 0 <= x1 < x2 <= {length}, got x1 = {}, x2 = {}",
                    load.element, load.x1, load.x2
                )));
            }
        }
        for load in &case.span_loads {
            let length = self.length_of(load.element)?;
            finite(&load.as_array(), "span load")?;
            if !(load.x >= 0.0 && load.x <= length * (1.0 + 1e-12)) {
                return Err(FrameError::invalid(format!(
                    "span load on element {} at x = {} lies outside 0..{length}",
                    load.element, load.x
                )));
            }
        }
        for load in &case.thermal_loads {
            model.element_index(load.element)?;
            if !(load.hy > 0.0 && load.hz > 0.0) {
                return Err(FrameError::invalid(format!(
                    "thermal load on element {} needs positive depths, got hy = {}, hz = {}",
                    load.element, load.hy, load.hz
                )));
            }
            finite(
                &[load.alpha, load.ty_pos, load.ty_neg, load.tz_pos, load.tz_neg],
                "thermal load",
            )?;
        }
        for prescribed in &case.prescribed {
            model.node_index(prescribed.node)?;
            finite(&prescribed.values, "prescribed displacement")?;
        }
        Ok(())
    }

    fn length_of(&self, id: crate::elements::ElementId) -> FrameResult<f64> {
        Ok(self.model.geometry(self.model.element_index(id)?).length)
    }
}

fn finite(values: &[f64], what: &str) -> FrameResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(FrameError::invalid(format!("{what} has non-finite values")))
    }
}

/// Equivalent nodal loads of all span loads on an element, in local axes
pub fn equivalent_loads(
    element: &Element,
    geom: &ElementGeometry,
    loads: &ElementLoads,
    shear: bool,
) -> Vec12 {
    let span = Span::of(element, geom.length, shear);
    let mut eq = Vec12::zeros();
    if loads.uniform.iter().any(|w| *w != 0.0) {
        eq += eqv::uniform_equivalent(loads.uniform, &span);
    }
    for t in &loads.trapezoidal {
        eq += eqv::trapezoidal_equivalent(t.axis, t.x1, t.x2, t.w1, t.w2, &span);
    }
    for p in &loads.span {
        eq += eqv::point_equivalent(p.as_array(), p.x.min(geom.length), &span);
    }
    for t in &loads.thermal {
        eq += eqv::thermal_equivalent(element, t);
    }
    eq
}

/// Scatter-add a global 12x12 element matrix into a global matrix
pub fn scatter(global: &mut Mat, k: &Mat12, geom: &ElementGeometry) {
    let dofs = geom.dofs();
    for (a, &ra) in dofs.iter().enumerate() {
        for (b, &cb) in dofs.iter().enumerate() {
            global[(ra, cb)] += k[(a, b)];
        }
    }
}

/// Gather the global displacements of an element's twelve DOFs
pub fn gather(global: &DVec, geom: &ElementGeometry) -> Vec12 {
    let dofs = geom.dofs();
    Vec12::from_fn(|k, _| global[dofs[k]])
}
