//! Wireframe sampling of parametric surfaces.
//!
//! Both curve families visit the same `(steps_t + 1) x (steps_v + 1)` grid of
//! parameter pairs, endpoints included, using integer step counters so the
//! final sample sits at the end of each range regardless of rounding.

use log::debug;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{SurfaceError, SurfaceResult};
use crate::geometry::{Polyline, SurfaceWireframe};
use crate::surface::{ParametricSurface, SurfaceKind};

/// Angular resolution of a sampling pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleGrid {
    pub steps_t: u32,
    pub steps_v: u32,
}

impl SampleGrid {
    pub fn new(steps_t: u32, steps_v: u32) -> Self {
        Self { steps_t, steps_v }
    }

    pub fn validate(&self) -> SurfaceResult<()> {
        if self.steps_t < 1 || self.steps_v < 1 {
            return Err(SurfaceError::Configuration {
                steps_t: self.steps_t,
                steps_v: self.steps_v,
            });
        }
        Ok(())
    }

    /// Points produced per curve family
    pub fn point_count(&self) -> usize {
        (self.steps_t as usize + 1) * (self.steps_v as usize + 1)
    }
}

impl Default for SampleGrid {
    fn default() -> Self {
        Self::new(30, 30)
    }
}

/// Parameter values `0, span/steps, ..., span`
fn parameter_values(span: f32, steps: u32) -> Vec<f32> {
    let step = span / steps as f32;
    (0..=steps)
        .map(|i| if i == steps { span } else { i as f32 * step })
        .collect()
}

fn evaluate<S: ParametricSurface>(surface: &S, t: f32, v: f32) -> SurfaceResult<Point3<f32>> {
    let p = surface.point(t, v)?;
    if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
        return Err(SurfaceError::Domain { v });
    }
    Ok(p)
}

/// Trace the constant-t curves: for each t, a full sweep over v.
pub fn sample_t<S: ParametricSurface>(surface: &S, grid: &SampleGrid) -> SurfaceResult<Polyline> {
    grid.validate()?;
    let ts = parameter_values(surface.t_span(), grid.steps_t);
    let vs = parameter_values(surface.v_span(), grid.steps_v);

    let mut points = Vec::with_capacity(grid.point_count());
    for &t in &ts {
        for &v in &vs {
            points.push(evaluate(surface, t, v)?);
        }
    }
    Ok(Polyline::new(points, vs.len()))
}

/// Trace the constant-v curves: for each v, a full sweep over t.
pub fn sample_v<S: ParametricSurface>(surface: &S, grid: &SampleGrid) -> SurfaceResult<Polyline> {
    grid.validate()?;
    let ts = parameter_values(surface.t_span(), grid.steps_t);
    let vs = parameter_values(surface.v_span(), grid.steps_v);

    let mut points = Vec::with_capacity(grid.point_count());
    for &v in &vs {
        for &t in &ts {
            points.push(evaluate(surface, t, v)?);
        }
    }
    Ok(Polyline::new(points, ts.len()))
}

/// Sample both curve families of a surface.
///
/// Either both families are returned or the first error is, never a
/// partial wireframe.
pub fn generate_surface<S: ParametricSurface>(
    surface: &S,
    grid: &SampleGrid,
) -> SurfaceResult<SurfaceWireframe> {
    grid.validate()?;
    let t = sample_t(surface, grid)?;
    let v = sample_v(surface, grid)?;
    debug!(
        "sampled {}x{} grid: {} + {} vertices",
        grid.steps_t,
        grid.steps_v,
        t.len(),
        v.len()
    );
    Ok(SurfaceWireframe { t, v })
}

impl SurfaceKind {
    /// Sample whichever surface this is
    pub fn generate(&self, grid: &SampleGrid) -> SurfaceResult<SurfaceWireframe> {
        match self {
            Self::Virich(params) => generate_surface(params, grid),
            Self::Sphere(sphere) => generate_surface(sphere, grid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{ShapeParameters, SphereParameters};
    use std::f32::consts::TAU;

    #[test]
    fn test_grid_validation() {
        assert!(SampleGrid::new(1, 1).validate().is_ok());
        assert_eq!(
            SampleGrid::new(0, 4).validate(),
            Err(SurfaceError::Configuration { steps_t: 0, steps_v: 4 })
        );
        assert!(SampleGrid::new(4, 0).validate().is_err());
    }

    #[test]
    fn test_parameter_values_hit_endpoint() {
        let values = parameter_values(TAU, 7);
        assert_eq!(values.len(), 8);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[7], TAU);
    }

    #[test]
    fn test_reference_scenario() {
        let params = ShapeParameters::new(1.5, 3.0, 2.0, 4.0);
        let grid = SampleGrid::new(4, 4);
        let polyline = sample_t(&params, &grid).unwrap();
        assert_eq!(polyline.len(), 25);
        assert_eq!(polyline.sweep_len(), 5);

        let first = polyline.points()[0];
        assert_eq!(first, params.point(0.0, 0.0).unwrap());
        assert!((first.x - 0.3).abs() < 1e-6);
        assert_eq!(first.y, 0.0);
        assert_eq!(first.z, 0.0);
    }

    #[test]
    fn test_minimal_grid() {
        let params = ShapeParameters::default();
        let wireframe = generate_surface(&params, &SampleGrid::new(1, 1)).unwrap();
        assert_eq!(wireframe.t.len(), 4);
        assert_eq!(wireframe.v.len(), 4);
    }

    #[test]
    fn test_zero_grid_rejected() {
        let params = ShapeParameters::default();
        assert_eq!(
            generate_surface(&params, &SampleGrid::new(0, 0)),
            Err(SurfaceError::Configuration { steps_t: 0, steps_v: 0 })
        );
    }

    #[test]
    fn test_degenerate_shape_rejected() {
        let params = ShapeParameters::new(0.0, 0.0, 2.0, 4.0);
        let err = generate_surface(&params, &SampleGrid::default()).unwrap_err();
        assert!(matches!(err, SurfaceError::Domain { .. }));
    }

    #[test]
    fn test_inner_sweeps_follow_loop_order() {
        let params = ShapeParameters::default();
        let grid = SampleGrid::new(3, 5);
        let t_family = sample_t(&params, &grid).unwrap();
        let v_family = sample_v(&params, &grid).unwrap();

        assert_eq!(t_family.sweep_len(), 6);
        assert_eq!(v_family.sweep_len(), 4);
        // t index i, v index j sits at i * 6 + j in the t family and
        // at j * 4 + i in the v family
        for i in 0..4 {
            for j in 0..6 {
                assert_eq!(t_family.points()[i * 6 + j], v_family.points()[j * 4 + i]);
            }
        }
    }

    #[test]
    fn test_sphere_latitude_sweeps() {
        let sphere = SphereParameters { radius: 1.0 };
        let wireframe = generate_surface(&sphere, &SampleGrid::new(2, 4)).unwrap();
        // first latitude sweep is the north pole
        for p in wireframe.t.sweeps().next().unwrap() {
            assert!((p.y - 1.0).abs() < 1e-6);
        }
        // the last longitude sweep closes the loop at phi = 2pi
        let last = wireframe.v.sweeps().last().unwrap();
        let first = wireframe.v.sweeps().next().unwrap();
        for (a, b) in last.iter().zip(first) {
            assert!((a - b).norm() < 1e-5);
        }
    }
}
