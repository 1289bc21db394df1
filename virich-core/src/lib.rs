/// Virich Core Library - Surface sampling and view logic
///
/// This library provides the stateless core for wireframe rendering of a
/// Virich cyclic surface: the parametric sampler, view transforms, the
/// trackball rotation widget and the render adapter boundary.

pub mod config;
pub mod error;
pub mod geometry;
pub mod params;
pub mod projection;
pub mod render;
pub mod sampler;
pub mod surface;
pub mod trackball;
pub mod transform;

// Re-export commonly used types
pub use config::SceneConfig;
pub use error::{ConfigError, RenderError, SurfaceError};
pub use geometry::{Polyline, StripLayout, SurfaceWireframe};
pub use projection::{Camera, ProjectionMode};
pub use render::{BufferHandle, RenderAdapter, Rgba, Session, SessionError};
pub use sampler::{generate_surface, sample_t, sample_v, SampleGrid};
pub use surface::{ParametricSurface, ShapeParameters, SphereParameters, SurfaceKind};
pub use trackball::TrackballRotator;
pub use transform::Transform;
