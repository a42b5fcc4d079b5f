/// Terminal-based bed mesh viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use nalgebra::Matrix4;
use std::io::{self, stdout, Write};
use web_time::{Duration, Instant};
use bedmesh_core::{
    format_offset, Camera, CameraRig, GridPoint, OrbitControls, PickHandler, ProjectionMode, Session,
    Transform, Viewpoint, ViewpointController,
};

pub mod renderer;

pub use renderer::{AsciiRenderer, Marker};

/// Grid shown when nothing is piped in, in the canonical signed format.
pub const SAMPLE_GRID: &str = "\
+1.291 +0.767 +0.205 -0.436 -1.064
+1.300 +0.731 +0.139 -0.506 -1.143
+1.204 +0.620 -0.003 -0.628 -1.270
+1.076 +0.501 -0.079 -0.703 -1.312
+0.975 +0.406 -0.156 -0.782 -1.406";

const HELP_LINES: &[&str] = &[
    "Interactive Controls",
    "- Click or Enter on points to highlight data",
    "- Arrows move the point cursor",
    "- W/A/S/D to rotate, scroll or +/- to zoom",
    "- 1/2/3: isometric / top / side view, O ortho",
    "- P interaction, L labels, ? help, Q quit",
    "Esc: got it",
];

const ORBIT_STEP: f32 = 0.25;

/// Main application struct for terminal bed mesh rendering
pub struct TerminalApp {
    session: Session,
    orbit: OrbitControls,
    camera: Camera,
    renderer: AsciiRenderer,
    cursor: (usize, usize),
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// The session must already hold a grid.
    pub fn new(session: Session) -> io::Result<Self> {
        if session.grid().is_none() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "no grid loaded",
            ));
        }
        let (width, height) = terminal::size()?;

        let mut camera = Camera::new(width as u32, height as u32);
        // Terminal cells are roughly twice as tall as they are wide.
        camera.set_viewport(width as u32, height as u32 * 2);

        Ok(Self {
            orbit: OrbitControls::new(session.camera()),
            session,
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            cursor: (0, 0),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.update(frame_start);

            // Render
            self.render()?;

            // Frame timing
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

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.renderer.resize(width as usize, height as usize);
                self.camera.set_viewport(width as u32, height as u32 * 2);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, .. }: KeyEvent) {
        match code {
            KeyCode::Char('q') => {
                self.running = false;
            }
            KeyCode::Esc => {
                if self.session.interaction().help_visible() {
                    self.session.interaction_mut().dismiss_help();
                } else {
                    self.running = false;
                }
            }
            KeyCode::Char('w') => self.orbit.rotate(0.0, -ORBIT_STEP),
            KeyCode::Char('s') => self.orbit.rotate(0.0, ORBIT_STEP),
            KeyCode::Char('a') => self.orbit.rotate(-ORBIT_STEP, 0.0),
            KeyCode::Char('d') => self.orbit.rotate(ORBIT_STEP, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.orbit.dolly(0.9),
            KeyCode::Char('-') => self.orbit.dolly(1.1),
            KeyCode::Char('1') => self.apply_viewpoint(Viewpoint::Isometric),
            KeyCode::Char('2') => self.apply_viewpoint(Viewpoint::Top),
            KeyCode::Char('3') => self.apply_viewpoint(Viewpoint::Side),
            KeyCode::Char('o') => {
                self.camera.mode = match self.camera.mode {
                    ProjectionMode::Perspective => ProjectionMode::Orthographic,
                    ProjectionMode::Orthographic => ProjectionMode::Perspective,
                };
            }
            KeyCode::Char('p') => self.session.interaction_mut().toggle_interactive(),
            KeyCode::Char('l') => self.session.interaction_mut().toggle_labels(),
            KeyCode::Char('?') | KeyCode::Char('h') => {
                self.session.interaction_mut().show_help(Instant::now());
            }
            KeyCode::Up => self.move_cursor(-1, 0),
            KeyCode::Down => self.move_cursor(1, 0),
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),
            KeyCode::Enter => {
                if let Some(vertex) = self.cursor_vertex() {
                    self.session.on_pick(vertex);
                }
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(vertex) = self.pick(mouse.column, mouse.row) {
                    self.session.on_pick(vertex);
                }
            }
            MouseEventKind::Moved => match self.pick(mouse.column, mouse.row) {
                Some(vertex) => self.session.on_hover_enter(vertex),
                None => {
                    if self.session.interaction().hovered().is_some() {
                        self.session.on_hover_leave();
                    }
                }
            },
            MouseEventKind::ScrollUp => self.orbit.dolly(0.9),
            MouseEventKind::ScrollDown => self.orbit.dolly(1.1),
            _ => {}
        }
    }

    fn apply_viewpoint(&mut self, viewpoint: Viewpoint) {
        ViewpointController::apply(viewpoint, &mut self.orbit);
        self.session.apply_viewpoint(viewpoint);
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let Some(matrix) = self.session.matrix() else {
            return;
        };
        let row = self.cursor.0.saturating_add_signed(d_row).min(matrix.rows() - 1);
        let col = self.cursor.1.saturating_add_signed(d_col).min(matrix.cols() - 1);
        self.cursor = (row, col);
        if let Some(vertex) = self.cursor_vertex() {
            self.session.on_hover_enter(vertex);
        }
    }

    fn cursor_vertex(&self) -> Option<u32> {
        self.session
            .mesh()
            .and_then(|mesh| mesh.vertex_index(self.cursor.0, self.cursor.1))
    }

    fn pick(&self, column: u16, row: u16) -> Option<u32> {
        let mesh = self.session.mesh()?;
        self.renderer
            .pick_vertex(mesh, &self.model_matrix(), &self.camera, column, row)
    }

    fn model_matrix(&self) -> Matrix4<f32> {
        Transform::surface_to_world()
    }

    fn update(&mut self, now: Instant) {
        if self.orbit.update() {
            self.session.set_pose(self.orbit.pose());
        }
        self.session.tick(now);
        self.camera.set_state(self.orbit.pose());
    }

    fn render(&mut self) -> io::Result<()> {
        let model = self.model_matrix();

        // Clear renderer
        self.renderer.clear();

        if let Some(mesh) = self.session.mesh() {
            self.renderer.render_surface(mesh, &model, &self.camera);

            let interaction = self.session.interaction();
            let mut markers: Vec<(u32, Marker)> = Vec::new();
            if mesh.is_points_only() {
                markers.extend((0..mesh.vertex_count() as u32).map(|v| (v, Marker::Point)));
            }
            let mut mark = |point: Option<GridPoint>, marker| {
                if let Some(vertex) = point.and_then(|p| mesh.vertex_index(p.row, p.col)) {
                    markers.push((vertex, marker));
                }
            };
            mark(interaction.hovered(), Marker::Hovered);
            mark(interaction.selected(), Marker::Selected);
            self.renderer.render_markers(mesh, &model, &self.camera, &markers);

            if interaction.labels_visible() {
                if let Some(matrix) = self.session.matrix() {
                    for point in matrix.points() {
                        let Some(vertex) = mesh.vertex_index(point.row, point.col) else {
                            continue;
                        };
                        if let Some((x, y)) =
                            self.renderer
                                .vertex_screen_position(mesh, vertex, &model, &self.camera)
                        {
                            self.renderer
                                .label(x + 1, y, &format_offset(point.value), value_color(point.value));
                        }
                    }
                }
            }
        }

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;
        self.draw_overlay(&mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn draw_overlay<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "bedmesh | FPS: {:.1} | interaction: {} | 1/2/3 views, ? help, Q quit",
                self.fps,
                if self.session.interaction().is_interactive() { "on" } else { "off" }
            )),
            ResetColor
        )?;

        if let Some(summary) = self.session.summary() {
            queue!(
                out,
                cursor::MoveTo(0, 1),
                SetForegroundColor(Color::Grey),
                Print(format!(
                    "{}x{} grid | min {} | max {} | spread {:.3}",
                    summary.rows,
                    summary.cols,
                    format_offset(summary.range.min),
                    format_offset(summary.range.max),
                    summary.spread()
                )),
                ResetColor
            )?;
        }

        if self.session.interaction().help_visible() {
            for (i, line) in HELP_LINES.iter().enumerate() {
                queue!(
                    out,
                    cursor::MoveTo(2, 3 + i as u16),
                    SetForegroundColor(if i == 0 { Color::White } else { Color::Grey }),
                    Print(format!("{line:<46}")),
                    ResetColor
                )?;
            }
        }

        if let Some(point) = self.session.interaction().focus() {
            let bottom = self.renderer.height().saturating_sub(1) as u16;
            queue!(
                out,
                cursor::MoveTo(0, bottom),
                SetForegroundColor(value_color(point.value)),
                Print(point.to_string()),
                ResetColor
            )?;
        }

        Ok(())
    }
}

/// Sign coloring used for value text: red above zero, blue below.
fn value_color(value: f64) -> Color {
    if value > 0.0 {
        Color::Red
    } else if value < 0.0 {
        Color::Blue
    } else {
        Color::Grey
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn app(text: &str) -> TerminalApp {
        let mut session = Session::default();
        session.submit(text, Instant::now()).unwrap();
        let mut camera = Camera::new(80, 80);
        camera.set_viewport(80, 80);
        TerminalApp {
            orbit: OrbitControls::new(session.camera()),
            session,
            camera,
            renderer: AsciiRenderer::new(80, 40),
            cursor: (0, 0),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    fn press(app: &mut TerminalApp, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_sample_grid_parses() {
        let matrix = bedmesh_core::parse(SAMPLE_GRID).unwrap();
        assert_eq!((matrix.rows(), matrix.cols()), (5, 5));
    }

    #[test]
    fn test_value_color() {
        assert_eq!(value_color(0.1), Color::Red);
        assert_eq!(value_color(-0.1), Color::Blue);
        assert_eq!(value_color(0.0), Color::Grey);
    }

    #[test]
    fn test_escape_dismisses_help_then_quits() {
        let mut app = app("+1 +2\n+3 +4");
        assert!(app.session.interaction().help_visible());
        press(&mut app, KeyCode::Esc);
        assert!(!app.session.interaction().help_visible());
        assert!(app.running);
        press(&mut app, KeyCode::Esc);
        assert!(!app.running);
    }

    #[test]
    fn test_cursor_hovers_and_enter_selects() {
        let mut app = app("+1 +2\n+3 +4");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.cursor, (1, 1));
        assert_eq!(app.session.interaction().hovered(), Some(GridPoint::new(1, 1, 4.0)));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.interaction().selected(), Some(GridPoint::new(1, 1, 4.0)));
    }

    #[test]
    fn test_toggles_and_presets() {
        let mut app = app("+1 +2\n+3 +4");
        press(&mut app, KeyCode::Char('l'));
        assert!(app.session.interaction().labels_visible());
        press(&mut app, KeyCode::Char('p'));
        assert!(!app.session.interaction().is_interactive());
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.interaction().selected(), None);

        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.camera.mode, ProjectionMode::Orthographic);

        press(&mut app, KeyCode::Char('2'));
        app.update(Instant::now());
        assert_eq!(app.camera.state(), Viewpoint::Top.pose());
        assert_eq!(app.session.camera(), Viewpoint::Top.pose());
    }

    #[test]
    fn test_render_into_buffer() {
        let mut app = app("+1 +2\n+3 +4");
        app.update(Instant::now());
        app.session.on_pick(0);
        let model = app.model_matrix();
        let mesh = app.session.mesh().unwrap();
        let vertex = app
            .renderer
            .vertex_screen_position(mesh, 0, &model, &app.camera)
            .unwrap();
        assert_eq!(app.pick(vertex.0 as u16, vertex.1 as u16), Some(0));
    }
}
