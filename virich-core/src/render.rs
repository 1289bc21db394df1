//! Boundary between sampled wireframes and a drawing backend.
//!
//! A backend only has to store flat vertex arrays and draw them as line
//! strips under a transform and a flat colour. [`Session`] owns everything
//! else a viewer needs between frames.

use log::{debug, info};
use nalgebra::Matrix4;
use thiserror::Error;

use crate::config::SceneConfig;
use crate::error::{RenderError, SurfaceError};
use crate::geometry::SurfaceWireframe;
use crate::projection::Camera;
use crate::trackball::TrackballRotator;

/// RGBA colour with components in `0.0..=1.0`
pub type Rgba = [f32; 4];

/// An uploaded vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferHandle {
    pub id: usize,
    pub vertex_count: usize,
}

/// A drawing backend able to render line strips.
pub trait RenderAdapter {
    type Error: std::error::Error + From<RenderError> + 'static;

    /// Store one buffer per vertex array (`[x, y, z, ...]`)
    fn upload(&mut self, vertex_arrays: &[Vec<f32>]) -> Result<Vec<BufferHandle>, Self::Error>;

    /// Clear colour and depth before a frame
    fn clear(&mut self, background: Rgba) -> Result<(), Self::Error>;

    /// Draw each buffer as one line strip
    fn draw_line_strips(
        &mut self,
        handles: &[BufferHandle],
        mvp: &Matrix4<f32>,
        color: Rgba,
    ) -> Result<(), Self::Error>;

    /// Finish the frame, presenting it where the backend needs that
    fn present(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Number of vertices in a flat array
pub fn vertex_count(vertices: &[f32]) -> Result<usize, RenderError> {
    if vertices.len() % 3 != 0 {
        return Err(RenderError::MisalignedVertices(vertices.len()));
    }
    Ok(vertices.len() / 3)
}

/// Failure to start a viewer session
#[derive(Debug, Error)]
pub enum SessionError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Render(E),
}

/// A sampled surface living on a backend, plus the view state around it.
pub struct Session<R: RenderAdapter> {
    adapter: R,
    handles: Vec<BufferHandle>,
    config: SceneConfig,
    camera: Camera,
    trackball: TrackballRotator,
}

impl<R: RenderAdapter> Session<R> {
    /// Sample the configured surface once and upload it
    pub fn new(
        mut adapter: R,
        config: SceneConfig,
        viewport: (f32, f32),
    ) -> Result<Self, SessionError<R::Error>> {
        let wireframe = config.surface.generate(&config.grid)?;
        let strips = wireframe.strips(config.layout);
        let handles = adapter.upload(&strips).map_err(SessionError::Render)?;
        info!(
            "uploaded {} surface: {} strips, {} vertices",
            config.surface.name(),
            handles.len(),
            wireframe.vertex_count()
        );

        let (width, height) = viewport;
        let camera = config.camera.with_aspect(width / height);
        let trackball = TrackballRotator::new(width, height, config.view_distance);

        Ok(Self {
            adapter,
            handles,
            config,
            camera,
            trackball,
        })
    }

    pub fn adapter(&self) -> &R {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut R {
        &mut self.adapter
    }

    pub fn handles(&self) -> &[BufferHandle] {
        &self.handles
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn trackball(&self) -> &TrackballRotator {
        &self.trackball
    }

    pub fn trackball_mut(&mut self) -> &mut TrackballRotator {
        &mut self.trackball
    }

    /// Follow a viewport size change
    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera = self.camera.with_aspect(width / height);
        self.trackball.resize(width, height);
    }

    /// Projection, framing and view rotation combined
    pub fn mvp(&self) -> Matrix4<f32> {
        self.camera.scene_matrix(&self.trackball.view_matrix())
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Clear, draw both curve families and present
    pub fn draw(&mut self) -> Result<(), R::Error> {
        let mvp = self.mvp();
        self.adapter.clear(self.config.background)?;
        self.adapter
            .draw_line_strips(&self.handles, &mvp, self.config.color)?;
        self.adapter.present()?;
        debug!("drew {} line strips", self.handles.len());
        Ok(())
    }
}

/// Summary of a wireframe as handed to a backend
pub fn describe(wireframe: &SurfaceWireframe) -> String {
    format!(
        "{} t-curves x {} points, {} v-curves x {} points",
        wireframe.t.len() / wireframe.t.sweep_len(),
        wireframe.t.sweep_len(),
        wireframe.v.len() / wireframe.v.sweep_len(),
        wireframe.v.sweep_len()
    )
}
