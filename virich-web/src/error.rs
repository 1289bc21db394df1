//! Failures at the WebGL boundary.

use thiserror::Error;
use virich_core::{RenderError, SurfaceError};
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("browser does not support WebGL")]
    ContextUnavailable,

    #[error("no canvas element with id '{0}'")]
    MissingCanvas(String),

    #[error("error in {stage} shader: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("link error in program: {0}")]
    ProgramLink(String),

    #[error("shader program has no {0}")]
    MissingLocation(&'static str),

    #[error("could not allocate a vertex buffer")]
    BufferAllocation,

    #[error("invalid scene config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl WebError {
    /// Markup shown in place of the canvas when the viewer cannot start
    pub fn user_message(&self) -> String {
        match self {
            Self::ContextUnavailable | Self::MissingCanvas(_) => {
                "<p>Sorry, could not get a WebGL graphics context.</p>".to_string()
            }
            other => format!(
                "<p>Sorry, could not initialize the WebGL graphics context: {}</p>",
                other
            ),
        }
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_message() {
        assert_eq!(
            WebError::ContextUnavailable.user_message(),
            "<p>Sorry, could not get a WebGL graphics context.</p>"
        );
    }

    #[test]
    fn test_init_message_carries_log() {
        let err = WebError::ShaderCompile {
            stage: "vertex",
            log: "0:3: syntax error".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "<p>Sorry, could not initialize the WebGL graphics context: \
             error in vertex shader: 0:3: syntax error</p>"
        );
    }
}
