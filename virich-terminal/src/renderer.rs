/// ASCII line rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use std::io::Write;
use virich_core::projection::project_to_screen;
use virich_core::render::vertex_count;
use virich_core::{BufferHandle, RenderAdapter, RenderError, Rgba};

/// Character luminosity ramp for depth shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Character, depth and colour cells of one frame
struct CellGrid {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl CellGrid {
    fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    fn reset(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    fn draw_strip(&mut self, points: &[Point3<f32>], mvp: &Matrix4<f32>, color: Color) {
        let projected: Vec<Option<(f32, f32, f32)>> = points
            .iter()
            .map(|p| project_to_screen(p, mvp, self.width as u32, self.height as u32))
            .collect();

        if let [Some(single)] = projected.as_slice() {
            self.plot(single.0, single.1, single.2, color);
            return;
        }

        for pair in projected.windows(2) {
            // Segments with a clipped end are dropped
            if let (Some(from), Some(to)) = (pair[0], pair[1]) {
                self.draw_segment(from, to, color);
            }
        }
    }

    /// Walk a screen-space segment one cell at a time
    fn draw_segment(&mut self, from: (f32, f32, f32), to: (f32, f32, f32), color: Color) {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        for i in 0..=steps {
            let s = i as f32 / steps as f32;
            self.plot(
                from.0 + dx * s,
                from.1 + dy * s,
                from.2 + (to.2 - from.2) * s,
                color,
            );
        }
    }

    fn plot(&mut self, x: f32, y: f32, depth: f32, color: Color) {
        let (x, y) = (x.floor() as i64, y.floor() as i64);
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }

        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = shade(depth);
            self.color_buffer[idx] = color;
        }
    }
}

/// ASCII renderer that draws line strips into a character grid
pub struct AsciiRenderer {
    cells: CellGrid,
    background: Color,
    buffers: Vec<Vec<Point3<f32>>>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: CellGrid::new(width, height),
            background: Color::Reset,
            buffers: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    /// Resize the character grid; uploaded buffers are kept
    pub fn resize(&mut self, width: usize, height: usize) {
        self.cells = CellGrid::new(width, height);
    }

    /// Current frame as plain text, one line per row
    pub fn to_text(&self) -> String {
        let cells = &self.cells;
        let mut text = String::with_capacity((cells.width + 1) * cells.height);
        for row in cells.char_buffer.chunks(cells.width.max(1)) {
            text.extend(row.iter());
            text.push('\n');
        }
        text
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let cells = &self.cells;
        let mut current = None;
        for y in 0..cells.height {
            for x in 0..cells.width {
                let idx = y * cells.width + x;
                let color = match cells.char_buffer[idx] {
                    ' ' => self.background,
                    _ => cells.color_buffer[idx],
                };
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(cells.char_buffer[idx]))?;
            }
            if y + 1 < cells.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderAdapter for AsciiRenderer {
    type Error = RenderError;

    fn upload(&mut self, vertex_arrays: &[Vec<f32>]) -> Result<Vec<BufferHandle>, RenderError> {
        let mut handles = Vec::with_capacity(vertex_arrays.len());
        for vertices in vertex_arrays {
            let count = vertex_count(vertices)?;
            let points = vertices
                .chunks_exact(3)
                .map(|c| Point3::new(c[0], c[1], c[2]))
                .collect();
            handles.push(BufferHandle {
                id: self.buffers.len(),
                vertex_count: count,
            });
            self.buffers.push(points);
        }
        Ok(handles)
    }

    fn clear(&mut self, background: Rgba) -> Result<(), RenderError> {
        self.background = to_color(background);
        self.cells.reset();
        Ok(())
    }

    fn draw_line_strips(
        &mut self,
        handles: &[BufferHandle],
        mvp: &Matrix4<f32>,
        color: Rgba,
    ) -> Result<(), RenderError> {
        let color = to_color(color);
        for handle in handles {
            let points = self
                .buffers
                .get(handle.id)
                .ok_or(RenderError::UnknownBuffer(handle.id))?;
            let count = handle.vertex_count.min(points.len());
            self.cells.draw_strip(&points[..count], mvp, color);
        }
        Ok(())
    }
}

/// Nearer cells get denser characters
fn shade(depth: f32) -> char {
    let nearness = (1.0 - (depth + 1.0) / 2.0).clamp(0.0, 1.0);
    let index = (nearness * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

fn to_color(rgba: Rgba) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(rgba[0]),
        g: channel(rgba[1]),
        b: channel(rgba[2]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YELLOW: Rgba = [1.0, 1.0, 0.0, 1.0];

    fn renderer_with(vertices: Vec<f32>) -> (AsciiRenderer, Vec<BufferHandle>) {
        let mut renderer = AsciiRenderer::new(20, 10);
        let handles = renderer.upload(&[vertices]).unwrap();
        renderer.clear([0.0, 0.0, 0.0, 1.0]).unwrap();
        (renderer, handles)
    }

    #[test]
    fn test_horizontal_strip() {
        let (mut renderer, handles) = renderer_with(vec![-0.5, 0.0, 0.0, 0.5, 0.0, 0.0]);
        renderer
            .draw_line_strips(&handles, &Matrix4::identity(), YELLOW)
            .unwrap();

        let text = renderer.to_text();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[5].trim().len(), 11);
        assert!(rows[4].trim().is_empty());
        assert_eq!(renderer.cells.color_buffer[5 * 20 + 10], Color::Rgb { r: 255, g: 255, b: 0 });
    }

    #[test]
    fn test_clipped_segment_dropped() {
        let (mut renderer, handles) = renderer_with(vec![0.0, 0.0, 0.0, 3.0, 0.0, 0.0]);
        renderer
            .draw_line_strips(&handles, &Matrix4::identity(), YELLOW)
            .unwrap();
        assert!(renderer.to_text().trim().is_empty());
    }

    #[test]
    fn test_nearer_line_wins() {
        let mut renderer = AsciiRenderer::new(20, 10);
        let handles = renderer
            .upload(&[
                vec![-0.5, 0.0, 0.8, 0.5, 0.0, 0.8],
                vec![-0.5, 0.0, -0.8, 0.5, 0.0, -0.8],
            ])
            .unwrap();
        renderer.clear([0.0; 4]).unwrap();
        renderer
            .draw_line_strips(&handles, &Matrix4::identity(), YELLOW)
            .unwrap();
        assert_eq!(renderer.cells.char_buffer[5 * 20 + 10], shade(-0.8));
        assert_ne!(shade(-0.8), shade(0.8));
    }

    #[test]
    fn test_redraw_keeps_uploaded_buffers() {
        let (mut renderer, handles) = renderer_with(vec![-0.5, 0.0, 0.0, 0.5, 0.0, 0.0]);
        renderer
            .draw_line_strips(&handles, &Matrix4::identity(), YELLOW)
            .unwrap();
        let first = renderer.to_text();

        renderer.clear([0.0, 0.0, 0.0, 1.0]).unwrap();
        assert!(renderer.to_text().trim().is_empty());
        renderer
            .draw_line_strips(&handles, &Matrix4::identity(), YELLOW)
            .unwrap();
        assert_eq!(renderer.to_text(), first);
        assert_eq!(renderer.buffers[0].len(), 2);
    }

    #[test]
    fn test_unknown_handle() {
        let mut renderer = AsciiRenderer::new(4, 4);
        let bogus = BufferHandle { id: 3, vertex_count: 2 };
        assert!(matches!(
            renderer.draw_line_strips(&[bogus], &Matrix4::identity(), YELLOW),
            Err(RenderError::UnknownBuffer(3))
        ));
    }

    #[test]
    fn test_upload_rejects_partial_vertex() {
        let mut renderer = AsciiRenderer::new(4, 4);
        assert!(renderer.upload(&[vec![0.0, 1.0]]).is_err());
    }

    #[test]
    fn test_shade_extremes() {
        assert_eq!(shade(-1.0), '@');
        assert_eq!(shade(1.0), '.');
    }
}
