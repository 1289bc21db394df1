/// Virich Web - WebGL2 wireframe viewer compiled to WASM
///
/// The page owns the canvas and forwards pointer events; everything else
/// (sampling, upload, trackball and drawing) happens here.
use log::info;
use virich_core::{SceneConfig, Session, SessionError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

pub mod error;
pub mod gl;

pub use error::WebError;
pub use gl::WebGlAdapter;

#[wasm_bindgen]
pub struct WebRenderer {
    session: Session<WebGlAdapter>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Attach to a canvas and upload the configured surface.
    ///
    /// On failure the element `holder_id` is replaced with a message for
    /// the user and the error is rethrown to the caller.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        holder_id: &str,
        config_json: Option<String>,
    ) -> Result<WebRenderer, JsValue> {
        match Self::build(canvas_id, config_json.as_deref()) {
            Ok(mut renderer) => {
                renderer.render()?;
                Ok(renderer)
            }
            Err(err) => {
                show_failure(holder_id, &err);
                Err(err.into())
            }
        }
    }

    /// Draw one frame
    pub fn render(&mut self) -> Result<(), JsValue> {
        self.session.draw().map_err(JsValue::from)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.session.trackball_mut().pointer_down(x, y);
    }

    /// Drag the trackball and redraw when the view changed
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Result<(), JsValue> {
        if self.session.trackball_mut().pointer_move(x, y) {
            self.render()?;
        }
        Ok(())
    }

    pub fn pointer_up(&mut self) {
        self.session.trackball_mut().pointer_up();
    }

    /// Return to the initial view
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.session.trackball_mut().reset();
        self.render()
    }

    /// Follow a canvas size change
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        let (width, height) = (width.max(1), height.max(1));
        self.session
            .adapter()
            .set_viewport(width as i32, height as i32);
        self.session.resize(width as f32, height as f32);
        self.render()
    }
}

impl WebRenderer {
    fn build(canvas_id: &str, config_json: Option<&str>) -> Result<WebRenderer, WebError> {
        let config = match config_json {
            Some(text) => SceneConfig::from_json(text)?,
            None => SceneConfig::default(),
        };
        config.grid.validate()?;

        let canvas = find_canvas(canvas_id)?;
        let gl = canvas
            .get_context("webgl2")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<WebGl2RenderingContext>().ok())
            .ok_or(WebError::ContextUnavailable)?;

        let adapter = WebGlAdapter::new(gl)?;
        let (width, height) = (canvas.width().max(1), canvas.height().max(1));
        adapter.set_viewport(width as i32, height as i32);

        let session = Session::new(adapter, config, (width as f32, height as f32))
            .map_err(|err| match err {
                SessionError::Surface(e) => WebError::Surface(e),
                SessionError::Render(e) => e,
            })?;
        info!("WebGL viewer ready on #{}", canvas_id);

        Ok(WebRenderer { session })
    }
}

fn find_canvas(canvas_id: &str) -> Result<HtmlCanvasElement, WebError> {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(canvas_id))
        .and_then(|element| element.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or_else(|| WebError::MissingCanvas(canvas_id.to_string()))
}

fn show_failure(holder_id: &str, err: &WebError) {
    let holder = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(holder_id));
    if let Some(holder) = holder {
        holder.set_inner_html(&err.user_message());
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    Ok(())
}
