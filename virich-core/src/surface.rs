//! Closed-form surfaces the sampler can trace.
//!
//! A surface maps a rectangular parameter domain `[0, t_span] x [0, v_span]`
//! onto 3D space. The Virich cyclic surface is the primary shape; the sphere
//! is kept as a simpler reference shape.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::error::{SurfaceError, SurfaceResult};

/// A surface parameterised over `(t, v)`.
pub trait ParametricSurface {
    /// Upper end of the t range; sampling starts at 0
    fn t_span(&self) -> f32;

    /// Upper end of the v range; sampling starts at 0
    fn v_span(&self) -> f32;

    /// Evaluate the surface at one parameter pair
    fn point(&self, t: f32, v: f32) -> SurfaceResult<Point3<f32>>;
}

/// Shape constants of a Virich cyclic surface.
///
/// `scale` is applied uniformly to every coordinate so the surface fits the
/// scene framing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeParameters {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub scale: f32,
}

impl ShapeParameters {
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self {
            a,
            b,
            c,
            d,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// `d^2 - c^2`
    pub fn k(&self) -> f32 {
        self.wide_k() as f32
    }

    /// Profile function `f(v) = ab / sqrt(a^2 sin^2 v + b^2 cos^2 v)`.
    ///
    /// Fails when the denominator vanishes or when `f(v)` is zero, since the
    /// point formulas divide by it.
    pub fn profile(&self, v: f32) -> SurfaceResult<f32> {
        self.wide_profile(v).map(|f| f as f32)
    }

    // Evaluated in f64 so products such as `ab` neither underflow nor overflow
    // for shapes whose constants are representable in f32.
    fn wide_profile(&self, v: f32) -> SurfaceResult<f64> {
        let (a, b) = (f64::from(self.a), f64::from(self.b));
        let (sin_v, cos_v) = f64::from(v).sin_cos();
        let denom_sq = a * a * sin_v * sin_v + b * b * cos_v * cos_v;
        if denom_sq.is_nan() || denom_sq == 0.0 {
            return Err(SurfaceError::Domain { v });
        }

        let f = a * b / denom_sq.sqrt();
        if f == 0.0 || !f.is_finite() {
            return Err(SurfaceError::Domain { v });
        }
        Ok(f)
    }

    fn wide_k(&self) -> f64 {
        let (c, d) = (f64::from(self.c), f64::from(self.d));
        d * d - c * c
    }
}

impl Default for ShapeParameters {
    fn default() -> Self {
        Self {
            a: 1.5,
            b: 3.0,
            c: 2.0,
            d: 4.0,
            scale: 0.2,
        }
    }
}

impl ParametricSurface for ShapeParameters {
    fn t_span(&self) -> f32 {
        TAU
    }

    fn v_span(&self) -> f32 {
        TAU
    }

    fn point(&self, t: f32, v: f32) -> SurfaceResult<Point3<f32>> {
        let fv = self.wide_profile(v)?;
        let k = self.wide_k();
        let (sin_t, cos_t) = f64::from(t).sin_cos();
        let (sin_v, cos_v) = f64::from(v).sin_cos();

        let half = 0.5 * f64::from(self.scale);
        let radial = fv * (1.0 + cos_t) + k * (1.0 - cos_t) / fv;

        Ok(Point3::new(
            (half * radial * cos_v) as f32,
            (half * radial * sin_v) as f32,
            (half * (fv - k / fv) * sin_t) as f32,
        ))
    }
}

/// A sphere traced by latitude (t over `[0, pi]`) and longitude
/// (v over `[0, 2pi]`), with the poles on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereParameters {
    pub radius: f32,
}

impl Default for SphereParameters {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

impl ParametricSurface for SphereParameters {
    fn t_span(&self) -> f32 {
        PI
    }

    fn v_span(&self) -> f32 {
        TAU
    }

    fn point(&self, theta: f32, phi: f32) -> SurfaceResult<Point3<f32>> {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        Ok(Point3::new(
            self.radius * sin_theta * cos_phi,
            self.radius * cos_theta,
            self.radius * sin_theta * sin_phi,
        ))
    }
}

/// Which surface a scene shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurfaceKind {
    Virich(ShapeParameters),
    Sphere(SphereParameters),
}

impl Default for SurfaceKind {
    fn default() -> Self {
        Self::Virich(ShapeParameters::default())
    }
}

impl SurfaceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Virich(_) => "virich",
            Self::Sphere(_) => "sphere",
        }
    }
}
