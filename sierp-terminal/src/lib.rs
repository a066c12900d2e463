/// Terminal viewer for the Sierpinski tetrahedron morph
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use sierp_core::{MeshBuffers, MeshGenerator, Playback, Regime};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod camera;
pub mod renderer;

pub use camera::{OrbitCamera, ProjectionMode};
pub use renderer::{AsciiRenderer, ShadingOptions};

/// Radians per orbit key press
const ORBIT_STEP: f32 = 0.1;

/// Timeline units per scrub key press
const SCRUB_STEP: f64 = 0.05;

/// Speed units per speed key press
const SPEED_STEP: f64 = 0.1;

/// Rows reserved for the status line
const STATUS_ROWS: u16 = 1;

/// Main application struct for terminal rendering
pub struct TerminalApp {
    generator: MeshGenerator,
    playback: Playback,
    buffers: MeshBuffers,
    camera: OrbitCamera,
    renderer: AsciiRenderer,
    shading: ShadingOptions,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Create a viewer sized to the current terminal
    pub fn new(generator: MeshGenerator, playback: Playback) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(generator, playback, width, height))
    }

    /// Create a viewer for a terminal of `width` x `height` cells
    pub fn with_size(
        generator: MeshGenerator,
        playback: Playback,
        width: u16,
        height: u16,
    ) -> Self {
        let height = height.saturating_sub(STATUS_ROWS);
        let buffers = generator.generate(playback.time());

        Self {
            generator,
            playback,
            buffers,
            camera: OrbitCamera::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            shading: ShadingOptions::default(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        let mut previous = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            // Advance the timeline by the wall time since the last frame
            let elapsed = frame_start - previous;
            previous = frame_start;
            if self.playback.advance(elapsed) {
                self.regenerate();
            }

            self.render()?;

            self.frame_count += 1;
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

    fn regenerate(&mut self) {
        self.buffers = self.generator.generate(self.playback.time());
    }

    fn set_time(&mut self, time: f64) {
        self.playback.set_time(time);
        self.regenerate();
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                let height = height.saturating_sub(STATUS_ROWS);
                self.camera.resize(width as u32, height as u32);
                self.renderer.resize(width as usize, height as usize);
                execute!(stdout(), terminal::Clear(ClearType::All))?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Apply one key press to the viewer state
    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char(' ') => {
                self.playback.toggle_play();
                self.regenerate();
            }
            KeyCode::Char('l') => self.playback.toggle_loop(),
            KeyCode::Char(']') => self.set_time(self.playback.time() + SCRUB_STEP),
            KeyCode::Char('[') => self.set_time(self.playback.time() - SCRUB_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.playback.set_speed(self.playback.speed() + SPEED_STEP)
            }
            KeyCode::Char('-') => self.playback.set_speed(self.playback.speed() - SPEED_STEP),
            KeyCode::Char('c') => self.shading.use_color = !self.shading.use_color,
            KeyCode::Char('b') => self.shading.use_lambert = !self.shading.use_lambert,
            KeyCode::Char('f') => self.shading.use_depth = !self.shading.use_depth,
            KeyCode::Char('o') => self.camera.toggle_projection(),
            KeyCode::Char('r') => self.camera.reset(),
            KeyCode::Char('z') => self.camera.zoom(0.9),
            KeyCode::Char('x') => self.camera.zoom(1.1),
            KeyCode::Char('w') | KeyCode::Up => self.camera.orbit(0.0, ORBIT_STEP),
            KeyCode::Char('s') | KeyCode::Down => self.camera.orbit(0.0, -ORBIT_STEP),
            KeyCode::Char('a') | KeyCode::Left => self.camera.orbit(-ORBIT_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.camera.orbit(ORBIT_STEP, 0.0),
            _ => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    /// One-line summary of the timeline and frame
    pub fn status(&self) -> String {
        let time = self.playback.time();
        let state = match (self.playback.is_playing(), self.playback.is_looping()) {
            (true, true) => "playing (loop)",
            (true, false) => "playing",
            (false, true) => "paused (loop)",
            (false, false) => "paused",
        };
        format!(
            "t={time:.2}/{max:.0} depth={depth} speed={speed:.1} {state} | {triangles} triangles | FPS {fps:.1} | \
             space=play l=loop [ ]=scrub -/+=speed c/b/f=color/light/depth o=proj r=reset q=quit",
            max = self.generator.config().max_time(),
            depth = Regime::from_time(time).depth().max(0),
            speed = self.playback.speed(),
            triangles = self.buffers.triangle_count(),
            fps = self.fps,
        )
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        self.renderer
            .render_buffers(&self.buffers, &self.camera, self.shading);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        let (width, height) = terminal::size()?;
        let mut status = self.status();
        status.truncate(width as usize);
        queue!(
            stdout,
            cursor::MoveTo(0, height.saturating_sub(STATUS_ROWS)),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn app() -> TerminalApp {
        TerminalApp::with_size(MeshGenerator::default(), Playback::default(), 80, 25)
    }

    #[test]
    fn test_scrub_regenerates_frame() {
        let mut app = app();
        app.handle_key(KeyCode::Char(']'));
        assert_relative_eq!(app.playback().time(), 1.55, epsilon = 1e-12);
        assert_eq!(
            app.buffers(),
            &MeshGenerator::default().generate(app.playback().time())
        );

        app.handle_key(KeyCode::Char('['));
        app.handle_key(KeyCode::Char('['));
        assert_relative_eq!(app.playback().time(), 1.45, epsilon = 1e-12);
    }

    #[test]
    fn test_scrub_stays_on_timeline() {
        let mut app = app();
        for _ in 0..40 {
            app.handle_key(KeyCode::Char('['));
        }
        assert_eq!(app.playback().time(), 0.0);
        assert_eq!(app.buffers().triangle_count(), 4);
    }

    #[test]
    fn test_speed_keys() {
        let mut app = app();
        app.handle_key(KeyCode::Char('+'));
        assert_relative_eq!(app.playback().speed(), 0.6, epsilon = 1e-12);
        app.handle_key(KeyCode::Char('-'));
        app.handle_key(KeyCode::Char('-'));
        assert_relative_eq!(app.playback().speed(), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_toggles() {
        let mut app = app();
        app.handle_key(KeyCode::Char(' '));
        assert!(app.playback().is_playing());
        app.handle_key(KeyCode::Char('l'));
        assert!(app.playback().is_looping());

        app.handle_key(KeyCode::Char('c'));
        app.handle_key(KeyCode::Char('b'));
        app.handle_key(KeyCode::Char('f'));
        assert_eq!(
            app.shading,
            ShadingOptions {
                use_color: false,
                use_lambert: false,
                use_depth: false,
            }
        );

        let mode = app.camera.mode;
        app.handle_key(KeyCode::Char('o'));
        assert_ne!(app.camera.mode, mode);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.handle_key(KeyCode::Char('x'));
        assert!(app.is_running());
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.is_running());

        let mut app = self::app();
        app.handle_key(KeyCode::Esc);
        assert!(!app.is_running());
    }

    #[test]
    fn test_status_line() {
        let app = app();
        let status = app.status();
        assert!(status.starts_with("t=1.50/8 depth=0 speed=0.5 paused"));
        assert!(status.contains("24 triangles"));
    }
}
