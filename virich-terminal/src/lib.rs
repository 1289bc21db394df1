/// Terminal-based wireframe viewer for parametric surfaces
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use log::{debug, info};
use nalgebra::Vector3;
use std::io::{stdout, Write};
use std::time::{Duration, Instant};
use virich_core::{RenderError, SceneConfig, Session, SessionError};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// Rotation applied per key press, in radians
const KEY_STEP: f32 = 0.1;

/// Rows reserved for the status line
const STATUS_ROWS: u16 = 1;

/// Main application struct for terminal surface viewing
pub struct TerminalApp {
    session: Session<AsciiRenderer>,
    running: bool,
    dirty: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: SceneConfig) -> Result<Self, SessionError<RenderError>> {
        let (cols, rows) = terminal::size().map_err(|e| SessionError::Render(e.into()))?;
        let rows = rows.saturating_sub(STATUS_ROWS).max(1);
        Self::with_size(config, cols, rows)
    }

    /// Build the app for a fixed character grid
    pub fn with_size(
        config: SceneConfig,
        cols: u16,
        rows: u16,
    ) -> Result<Self, SessionError<RenderError>> {
        let renderer = AsciiRenderer::new(cols as usize, rows as usize);
        let session = Session::new(renderer, config, viewport(cols, rows))?;

        Ok(Self {
            session,
            running: true,
            dirty: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn session(&self) -> &Session<AsciiRenderer> {
        &self.session
    }

    pub fn run(&mut self) -> Result<(), RenderError> {
        info!(
            "Entering viewer with {} strips",
            self.session.handles().len()
        );
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        let cleanup = execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        );
        let raw_mode = terminal::disable_raw_mode();

        first_error(result, cleanup, raw_mode)
    }

    fn main_loop(&mut self) -> Result<(), RenderError> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Drain pending input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            if self.session.config().spin {
                self.session
                    .trackball_mut()
                    .rotate_by(Vector3::new(0.4, 1.0, 0.0), 0.02);
                self.dirty = true;
            }

            if self.dirty {
                self.render()?;
                self.dirty = false;
                self.frame_count += 1;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Apply one terminal event to the view state
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => {
                let rows = rows.saturating_sub(STATUS_ROWS).max(1);
                debug!("terminal resized to {}x{}", cols, rows);
                self.session
                    .adapter_mut()
                    .resize(cols as usize, rows as usize);
                let (width, height) = viewport(cols, rows);
                self.session.resize(width, height);
                self.dirty = true;
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        let trackball = self.session.trackball_mut();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                return;
            }
            KeyCode::Char('w') | KeyCode::Up => trackball.rotate_by(Vector3::x(), -KEY_STEP),
            KeyCode::Char('s') | KeyCode::Down => trackball.rotate_by(Vector3::x(), KEY_STEP),
            KeyCode::Char('a') | KeyCode::Left => trackball.rotate_by(Vector3::y(), -KEY_STEP),
            KeyCode::Char('d') | KeyCode::Right => trackball.rotate_by(Vector3::y(), KEY_STEP),
            KeyCode::Char('e') => trackball.rotate_by(Vector3::z(), KEY_STEP),
            KeyCode::Char('r') => trackball.reset(),
            _ => return,
        }
        self.dirty = true;
    }

    fn handle_mouse(&mut self, MouseEvent { kind, column, row, .. }: MouseEvent) {
        let (x, y) = (column as f32, row as f32 * CELL_ASPECT);
        let trackball = self.session.trackball_mut();
        match kind {
            MouseEventKind::Down(MouseButton::Left) => trackball.pointer_down(x, y),
            MouseEventKind::Drag(MouseButton::Left) => {
                if trackball.pointer_move(x, y) {
                    self.dirty = true;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => trackball.pointer_up(),
            _ => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn render(&mut self) -> Result<(), RenderError> {
        self.session.draw()?;

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.session.adapter().draw(&mut stdout)?;

        // Status line below the frame
        let status_row = self.session.adapter().height() as u16;
        queue!(
            stdout,
            cursor::MoveTo(0, status_row),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Virich {} | FPS: {:.1} | Drag=Rotate WASD/Arrows=Rotate E=Roll R=Reset Q=Quit",
                self.session.config().surface.name(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Character grid size in square units for the camera and trackball
fn viewport(cols: u16, rows: u16) -> (f32, f32) {
    (cols.max(1) as f32, rows.max(1) as f32 * CELL_ASPECT)
}

/// The loop error outranks any failure while restoring the terminal
fn first_error(
    result: Result<(), RenderError>,
    cleanup: std::io::Result<()>,
    raw_mode: std::io::Result<()>,
) -> Result<(), RenderError> {
    result?;
    cleanup?;
    raw_mode?;
    Ok(())
}
