//! WebGL2 line strip backend.

use log::debug;
use nalgebra::Matrix4;
use virich_core::render::vertex_count;
use virich_core::{BufferHandle, RenderAdapter, RenderError, Rgba, Transform};
use web_sys::{
    WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
};

use crate::error::WebError;

pub const VERTEX_SHADER: &str = r#"
attribute vec3 vertex;
uniform mat4 ModelViewProjectionMatrix;

void main() {
    gl_Position = ModelViewProjectionMatrix * vec4(vertex, 1.0);
}
"#;

pub const FRAGMENT_SHADER: &str = r#"
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

uniform vec4 color;

void main() {
    gl_FragColor = color;
}
"#;

/// Compiled program and the locations the draw loop feeds
pub struct ShaderProgram {
    program: WebGlProgram,
    attrib_vertex: u32,
    mvp: WebGlUniformLocation,
    color: WebGlUniformLocation,
}

impl ShaderProgram {
    pub fn new(gl: &Gl, vertex_src: &str, fragment_src: &str) -> Result<Self, WebError> {
        let program = create_program(gl, vertex_src, fragment_src)?;

        let attrib_vertex = gl.get_attrib_location(&program, "vertex");
        let attrib_vertex =
            u32::try_from(attrib_vertex).map_err(|_| WebError::MissingLocation("vertex attribute"))?;
        let mvp = gl
            .get_uniform_location(&program, "ModelViewProjectionMatrix")
            .ok_or(WebError::MissingLocation("ModelViewProjectionMatrix uniform"))?;
        let color = gl
            .get_uniform_location(&program, "color")
            .ok_or(WebError::MissingLocation("color uniform"))?;

        Ok(Self {
            program,
            attrib_vertex,
            mvp,
            color,
        })
    }

    pub fn use_program(&self, gl: &Gl) {
        gl.use_program(Some(&self.program));
    }
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, WebError> {
    let stage = if kind == Gl::VERTEX_SHADER { "vertex" } else { "fragment" };
    let shader = gl.create_shader(kind).ok_or(WebError::ShaderCompile {
        stage,
        log: "could not create shader object".to_string(),
    })?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(WebError::ShaderCompile { stage, log })
    }
}

/// Compile both stages and link them into one program
pub fn create_program(gl: &Gl, vertex_src: &str, fragment_src: &str) -> Result<WebGlProgram, WebError> {
    let vsh = compile_shader(gl, Gl::VERTEX_SHADER, vertex_src)?;
    let fsh = compile_shader(gl, Gl::FRAGMENT_SHADER, fragment_src)?;

    let program = gl
        .create_program()
        .ok_or_else(|| WebError::ProgramLink("could not create program object".to_string()))?;
    gl.attach_shader(&program, &vsh);
    gl.attach_shader(&program, &fsh);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(WebError::ProgramLink(log))
    }
}

/// Render adapter drawing into a WebGL2 context
pub struct WebGlAdapter {
    gl: Gl,
    shader: ShaderProgram,
    buffers: Vec<(WebGlBuffer, usize)>,
}

impl WebGlAdapter {
    pub fn new(gl: Gl) -> Result<Self, WebError> {
        let shader = ShaderProgram::new(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        shader.use_program(&gl);
        gl.enable(Gl::DEPTH_TEST);
        Ok(Self {
            gl,
            shader,
            buffers: Vec::new(),
        })
    }

    pub fn set_viewport(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }
}

impl Drop for WebGlAdapter {
    fn drop(&mut self) {
        for (buffer, _) in &self.buffers {
            self.gl.delete_buffer(Some(buffer));
        }
    }
}

impl RenderAdapter for WebGlAdapter {
    type Error = WebError;

    fn upload(&mut self, vertex_arrays: &[Vec<f32>]) -> Result<Vec<BufferHandle>, WebError> {
        let mut handles = Vec::with_capacity(vertex_arrays.len());
        for vertices in vertex_arrays {
            let count = vertex_count(vertices)?;
            let buffer = self.gl.create_buffer().ok_or(WebError::BufferAllocation)?;
            self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
            let data = js_sys::Float32Array::from(vertices.as_slice());
            self.gl
                .buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &data, Gl::STREAM_DRAW);

            handles.push(BufferHandle {
                id: self.buffers.len(),
                vertex_count: count,
            });
            self.buffers.push((buffer, count));
        }
        debug!("uploaded {} vertex buffers", handles.len());
        Ok(handles)
    }

    fn clear(&mut self, background: Rgba) -> Result<(), WebError> {
        let [r, g, b, a] = background;
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
        Ok(())
    }

    fn draw_line_strips(
        &mut self,
        handles: &[BufferHandle],
        mvp: &Matrix4<f32>,
        color: Rgba,
    ) -> Result<(), WebError> {
        let gl = &self.gl;
        let shader = &self.shader;
        gl.uniform_matrix4fv_with_f32_array(
            Some(&shader.mvp),
            false,
            &Transform::to_column_major(mvp),
        );
        gl.uniform4fv_with_f32_array(Some(&shader.color), &color);

        for handle in handles {
            let (buffer, count) = self
                .buffers
                .get(handle.id)
                .ok_or(RenderError::UnknownBuffer(handle.id))?;
            gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
            gl.vertex_attrib_pointer_with_i32(shader.attrib_vertex, 3, Gl::FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(shader.attrib_vertex);
            gl.draw_arrays(Gl::LINE_STRIP, 0, handle.vertex_count.min(*count) as i32);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_interface_names() {
        assert!(VERTEX_SHADER.contains("attribute vec3 vertex;"));
        assert!(VERTEX_SHADER.contains("uniform mat4 ModelViewProjectionMatrix;"));
        assert!(FRAGMENT_SHADER.contains("uniform vec4 color;"));
    }
}
