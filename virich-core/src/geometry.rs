/// Geometry primitives for wireframe rendering
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An ordered run of 3D points connected in display order.
///
/// The points are grouped into sweeps of `sweep_len` points each: one sweep
/// per value of the outer sampling parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point3<f32>>,
    sweep_len: usize,
}

impl Polyline {
    pub fn new(points: Vec<Point3<f32>>, sweep_len: usize) -> Self {
        debug_assert!(sweep_len > 0 && points.len() % sweep_len == 0);
        Self { points, sweep_len }
    }

    pub fn points(&self) -> &[Point3<f32>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points in each sweep of the inner parameter
    pub fn sweep_len(&self) -> usize {
        self.sweep_len
    }

    /// Iterate over the sweeps, one slice per outer parameter value
    pub fn sweeps(&self) -> std::slice::Chunks<'_, Point3<f32>> {
        self.points.chunks(self.sweep_len)
    }

    /// Flatten into `[x0, y0, z0, x1, ...]` for vertex upload
    pub fn to_flat(&self) -> Vec<f32> {
        flatten(&self.points)
    }

    /// Split into flat vertex arrays, one per line strip
    pub fn strips(&self, layout: StripLayout) -> Vec<Vec<f32>> {
        match layout {
            StripLayout::Concatenated => vec![self.to_flat()],
            StripLayout::PerSweep => self.sweeps().map(flatten).collect(),
        }
    }
}

fn flatten(points: &[Point3<f32>]) -> Vec<f32> {
    let mut flat = Vec::with_capacity(points.len() * 3);
    for p in points {
        flat.extend_from_slice(&[p.x, p.y, p.z]);
    }
    flat
}

/// How a polyline family is split into line strips.
///
/// `Concatenated` draws every sweep as one strip, which joins the end of
/// each sweep to the start of the next with a connecting segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripLayout {
    Concatenated,
    #[default]
    PerSweep,
}

impl FromStr for StripLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concat" | "concatenated" => Ok(Self::Concatenated),
            "sweep" | "per_sweep" | "per-sweep" => Ok(Self::PerSweep),
            other => Err(format!("unknown strip layout '{}' (expected concat or sweep)", other)),
        }
    }
}

/// Both curve families of a sampled surface
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceWireframe {
    /// Constant-t curves: outer loop over t, inner over v
    pub t: Polyline,
    /// Constant-v curves: outer loop over v, inner over t
    pub v: Polyline,
}

impl SurfaceWireframe {
    /// Flat vertex arrays for every strip of both families, t family first
    pub fn strips(&self, layout: StripLayout) -> Vec<Vec<f32>> {
        let mut strips = self.t.strips(layout);
        strips.extend(self.v.strips(layout));
        strips
    }

    pub fn vertex_count(&self) -> usize {
        self.t.len() + self.v.len()
    }

    /// Largest distance of any vertex from the origin
    pub fn bounding_radius(&self) -> f32 {
        self.t
            .points()
            .iter()
            .chain(self.v.points())
            .map(|p| p.coords.norm())
            .fold(0.0, f32::max)
    }
}
