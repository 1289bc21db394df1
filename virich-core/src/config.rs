//! Scene configuration.
//!
//! Everything a viewer needs to sample and frame one surface. Every section
//! falls back to the reference scene when missing, so a config file only
//! has to name what it changes:
//!
//! ```json
//! {
//!   "surface": { "kind": "virich", "a": 2.0 },
//!   "grid": { "steps_t": 40, "steps_v": 40 },
//!   "layout": "concatenated"
//! }
//! ```

use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::geometry::StripLayout;
use crate::projection::Camera;
use crate::render::Rgba;
use crate::sampler::SampleGrid;
use crate::surface::SurfaceKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Surface to sample and its shape constants
    pub surface: SurfaceKind,
    /// Sampling resolution of both parameters
    pub grid: SampleGrid,
    /// One strip per curve or one strip per family
    pub layout: StripLayout,
    /// Wireframe colour
    pub color: Rgba,
    /// Clear colour
    pub background: Rgba,
    /// Projection and fixed framing
    pub camera: Camera,
    /// Extra distance the trackball pulls the view back
    pub view_distance: f32,
    /// Keep rotating between interactions
    pub spin: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceKind::default(),
            grid: SampleGrid::default(),
            layout: StripLayout::default(),
            color: [1.0, 1.0, 0.0, 1.0],
            background: [0.0, 0.0, 0.0, 1.0],
            camera: Camera::default(),
            view_distance: 0.0,
            spin: false,
        }
    }
}

impl SceneConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Json {
            path: display.clone(),
            source,
        })?;
        config.validate()?;
        info!("Loaded scene config from {}", display);
        Ok(config)
    }

    /// Reject configurations that cannot be sampled at all
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        Ok(())
    }
}
