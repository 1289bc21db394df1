//! Error types for the surface core.

use thiserror::Error;

/// Errors raised while sampling a surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    /// The profile function `f(v)` has no usable value at `v`.
    #[error("profile function undefined at v = {v}: shape parameters leave the denominator at zero")]
    Domain { v: f32 },

    /// A sample grid with zero steps along one of its axes.
    #[error("invalid sample grid {steps_t}x{steps_v}: both step counts must be at least 1")]
    Configuration { steps_t: u32, steps_v: u32 },
}

/// Errors raised while loading or overriding a scene configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid parameter string {input:?}: {reason}")]
    Params { input: String, reason: String },

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Errors raised by a render adapter.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown buffer handle {0}")]
    UnknownBuffer(usize),

    #[error("vertex data length {0} is not a multiple of 3")]
    MisalignedVertices(usize),

    #[error("render backend failure: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;
