use crate::color::Palette;
use particle_life::{AppConfig, Simulation, SimulationConfig};
use std::fs;
use std::path::Path;

/// File written by the matrix export key
pub const MATRIX_EXPORT_FILE: &str = "matrix.txt";

/// Focus state for parameter editing in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    Beta,
    Boundary,
    Colors,
    Friction,
    Particles,
    Radius,
    Search,
    Speed,
}

impl Focus {
    /// Tab cycles through parameters in display order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None => Focus::Particles,
            Focus::Particles => Focus::Colors,
            Focus::Colors => Focus::Radius,
            Focus::Radius => Focus::Beta,
            Focus::Beta => Focus::Friction,
            Focus::Friction => Focus::Boundary,
            Focus::Boundary => Focus::Search,
            Focus::Search => Focus::Speed,
            Focus::Speed => Focus::Particles,
        }
    }

    /// Shift+Tab cycles backwards
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Particles => Focus::Speed,
            Focus::Colors => Focus::Particles,
            Focus::Radius => Focus::Colors,
            Focus::Beta => Focus::Radius,
            Focus::Friction => Focus::Beta,
            Focus::Boundary => Focus::Friction,
            Focus::Search => Focus::Boundary,
            Focus::Speed => Focus::Search,
        }
    }

    /// Check if focus is on a parameter
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None)
    }
}

/// Main application state
pub struct App {
    pub simulation: Simulation,
    pub palette: Palette,
    pub focus: Focus,
    pub paused: bool,
    pub fullscreen_mode: bool,
    pub steps_per_frame: usize,
    pub show_help: bool,
    pub help_scroll: u16,
    /// One-line feedback shown in the status box
    pub status_message: Option<String>,
    seed: Option<u64>,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self, particle_life::ConfigError> {
        let simulation = build_simulation(config.simulation.clone(), config.seed)?;
        Ok(Self {
            palette: Palette::new(config.simulation.color_count),
            simulation,
            focus: Focus::None,
            paused: false,
            fullscreen_mode: false,
            steps_per_frame: config.steps_per_frame.clamp(1, 20),
            show_help: false,
            help_scroll: 0,
            status_message: None,
            seed: config.seed,
        })
    }

    /// Run simulation steps for current frame
    pub fn tick(&mut self) {
        if !self.paused {
            for _ in 0..self.steps_per_frame {
                self.simulation.step();
            }
        }
    }

    /// Rebuild the simulation from an edited config, keeping the old one on error
    fn restart_with(&mut self, config: SimulationConfig) {
        match build_simulation(config, self.seed) {
            Ok(simulation) => {
                self.palette = Palette::new(simulation.config().color_count);
                self.simulation = simulation;
                self.status_message = None;
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    fn adjust_config(&mut self, up: bool) {
        let mut config = self.simulation.config().clone();
        let sign = if up { 1.0 } else { -1.0 };
        match self.focus {
            Focus::None | Focus::Speed => return,
            Focus::Particles => config.adjust_particle_count(if up { 250 } else { -250 }),
            Focus::Colors => config.adjust_color_count(if up { 1 } else { -1 }),
            Focus::Radius => config.adjust_max_radius(0.01 * sign),
            Focus::Beta => config.adjust_beta(0.05 * sign),
            Focus::Friction => config.adjust_friction_half_life(0.01 * sign),
            Focus::Boundary => config.boundary = config.boundary.next(),
            Focus::Search => config.neighbor_search = config.neighbor_search.next(),
        }
        self.restart_with(config);
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        if self.focus == Focus::Speed {
            self.increase_speed();
        } else {
            self.adjust_config(true);
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        if self.focus == Focus::Speed {
            self.decrease_speed();
        } else {
            self.adjust_config(false);
        }
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Stage a new attraction matrix; it takes effect on the next step
    pub fn regenerate_matrix(&mut self) {
        self.simulation.regenerate_matrix();
        self.status_message = Some("new matrix".to_string());
    }

    pub fn reset_particles(&mut self) {
        self.simulation.reset_particles();
    }

    /// Write the active matrix as text
    pub fn export_matrix(&mut self, path: &Path) {
        let text = self.simulation.matrix().to_string();
        self.status_message = Some(match fs::write(path, text) {
            Ok(()) => format!("saved {}", path.display()),
            Err(e) => format!("export failed: {}", e),
        });
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    pub fn increase_speed(&mut self) {
        self.steps_per_frame = (self.steps_per_frame + 1).min(20);
    }

    pub fn decrease_speed(&mut self) {
        self.steps_per_frame = self.steps_per_frame.saturating_sub(1).max(1);
    }
}

pub fn build_simulation(
    config: SimulationConfig,
    seed: Option<u64>,
) -> Result<Simulation, particle_life::ConfigError> {
    match seed {
        Some(seed) => Simulation::with_seed(config, seed),
        None => Simulation::new(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use particle_life::BoundaryMode;

    fn test_app() -> App {
        let config = AppConfig {
            simulation: SimulationConfig {
                particle_count: 50,
                color_count: 3,
                ..Default::default()
            },
            steps_per_frame: 2,
            seed: Some(3),
            ..Default::default()
        };
        App::new(&config).unwrap()
    }

    #[test]
    fn test_tick_respects_pause() {
        let mut app = test_app();
        app.tick();
        assert_eq!(app.simulation.tick(), 2);
        app.toggle_pause();
        app.tick();
        assert_eq!(app.simulation.tick(), 2);
    }

    #[test]
    fn test_focus_cycle_round_trip() {
        let mut focus = Focus::Particles;
        for _ in 0..8 {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Particles);
        assert_eq!(Focus::Particles.prev().next(), Focus::Particles);
    }

    #[test]
    fn test_adjusting_colors_restarts_simulation() {
        let mut app = test_app();
        app.tick();
        app.focus = Focus::Colors;
        app.adjust_focused_up();
        assert_eq!(app.simulation.config().color_count, 4);
        assert_ne!(app.palette.color(3), ratatui::style::Color::White);
        assert_eq!(app.simulation.tick(), 0);

        app.focus = Focus::Boundary;
        app.adjust_focused_up();
        assert_eq!(app.simulation.config().boundary, BoundaryMode::Open);
    }

    #[test]
    fn test_speed_bounds() {
        let mut app = test_app();
        app.focus = Focus::Speed;
        for _ in 0..50 {
            app.adjust_focused_up();
        }
        assert_eq!(app.steps_per_frame, 20);
        for _ in 0..50 {
            app.adjust_focused_down();
        }
        assert_eq!(app.steps_per_frame, 1);
    }

    #[test]
    fn test_export_matrix_writes_text() {
        let mut app = test_app();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.txt");
        app.export_matrix(&path);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(text, app.simulation.matrix().to_text(2));
    }
}
