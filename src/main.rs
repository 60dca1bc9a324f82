mod app;
mod braille;
mod color;
mod ui;

use app::{App, Focus, MATRIX_EXPORT_FILE};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use particle_life::presets::PresetManager;
use particle_life::presets::Preset;
use particle_life::{AppConfig, AttractionMatrix, BoundaryMode, NeighborSearch, Simulation};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "particle-life")]
#[command(about = "Particle life simulation in the terminal")]
struct Args {
    // === Sources ===
    /// Load settings from a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from a named preset (classic, sparse, dense, "wide reach", slippery, "open field")
    #[arg(long)]
    preset: Option<String>,

    /// Write the resolved settings to a JSON config file
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,

    /// Store the resolved settings as a user preset under this name
    #[arg(long = "save-preset")]
    save_preset: Option<String>,

    /// Remove a user preset and exit
    #[arg(long = "delete-preset")]
    delete_preset: Option<String>,

    /// Start from an attraction matrix text file (one row per line)
    #[arg(long = "import-matrix")]
    import_matrix: Option<PathBuf>,

    // === Simulation Parameters ===
    /// Number of particles
    #[arg(short = 'n', long)]
    particles: Option<usize>,

    /// Number of particle colors (1-12)
    #[arg(short = 'k', long)]
    colors: Option<usize>,

    /// Time step per tick in seconds
    #[arg(long)]
    dt: Option<f64>,

    /// Interaction cutoff radius in domain units
    #[arg(short = 'r', long = "max-radius")]
    max_radius: Option<f64>,

    /// Velocity half-life in seconds
    #[arg(long = "friction-half-life")]
    friction_half_life: Option<f64>,

    /// Fraction of the radius that is pure repulsion (0-1, exclusive)
    #[arg(long)]
    beta: Option<f64>,

    /// Boundary mode (periodic, open)
    #[arg(long)]
    boundary: Option<String>,

    /// Neighbor search (grid, brute)
    #[arg(long = "neighbor-search")]
    neighbor_search: Option<String>,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation speed (steps per frame, 1-20)
    #[arg(long)]
    speed: Option<usize>,

    // === Headless ===
    /// Run without the terminal UI
    #[arg(long, default_value = "false")]
    headless: bool,

    /// Number of ticks to run in headless mode
    #[arg(long, default_value = "1000")]
    steps: u64,

    /// Write the attraction matrix as text after a headless run
    #[arg(long = "export-matrix")]
    export_matrix: Option<PathBuf>,

    /// Write log output to this file (the terminal UI otherwise discards it)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn parse_boundary(s: &str) -> BoundaryMode {
    match s.to_lowercase().as_str() {
        "open" | "unbounded" | "plane" => BoundaryMode::Open,
        _ => BoundaryMode::Periodic,
    }
}

fn parse_search(s: &str) -> NeighborSearch {
    match s.to_lowercase().as_str() {
        "brute" | "bruteforce" | "brute-force" | "all" => NeighborSearch::BruteForce,
        _ => NeighborSearch::Grid,
    }
}

/// File first, then preset, then individual flags
fn resolve_config(args: &Args) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };

    if let Some(name) = &args.preset {
        let presets = PresetManager::new();
        let preset = presets.find(name).ok_or_else(|| {
            format!(
                "unknown preset '{}' (available: {})",
                name,
                presets.preset_names().join(", ")
            )
        })?;
        info!("using preset {}", preset.name);
        config.simulation = preset.config.clone();
    }

    let sim = &mut config.simulation;
    if let Some(n) = args.particles {
        sim.particle_count = n;
    }
    if let Some(k) = args.colors {
        sim.color_count = k;
    }
    if let Some(dt) = args.dt {
        sim.dt = dt;
    }
    if let Some(r) = args.max_radius {
        sim.max_radius = r;
    }
    if let Some(h) = args.friction_half_life {
        sim.friction_half_life = h;
    }
    if let Some(beta) = args.beta {
        sim.beta = beta;
    }
    if let Some(b) = &args.boundary {
        sim.boundary = parse_boundary(b);
    }
    if let Some(s) = &args.neighbor_search {
        sim.neighbor_search = parse_search(s);
    }
    if let Some(speed) = args.speed {
        config.steps_per_frame = speed.clamp(1, 20);
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    config.simulation.validate()?;
    Ok(config)
}

fn load_matrix(path: &Path) -> Result<AttractionMatrix, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let matrix = AttractionMatrix::parse(&text)?;
    info!("loaded {}x{} matrix from {}", matrix.size(), matrix.size(), path.display());
    Ok(matrix)
}

/// Stage an imported matrix so the first step already uses it
fn apply_import(
    simulation: &mut Simulation,
    path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = path {
        simulation.set_matrix(load_matrix(path)?)?;
    }
    Ok(())
}

fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None if args.headless => {
            builder.target(env_logger::Target::Stderr);
        }
        // Anything written to the terminal would land on the alternate screen
        None => return Ok(()),
    }
    builder.try_init()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    if let Some(name) = &args.delete_preset {
        PresetManager::new().delete_preset(name)?;
        println!("deleted preset {}", name);
        return Ok(());
    }

    let config = resolve_config(&args)?;
    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        info!("saved config to {}", path.display());
    }
    if let Some(name) = &args.save_preset {
        let preset = Preset::new(
            name.as_str(),
            "Saved from the command line",
            config.simulation.clone(),
        );
        PresetManager::new().save_preset(preset)?;
        info!("saved preset {}", name);
    }

    if args.headless {
        return run_headless(&config, &args);
    }

    let mut app = App::new(&config)?;
    apply_import(&mut app.simulation, args.import_matrix.as_deref())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_headless(config: &AppConfig, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let steps = args.steps;
    let mut simulation = app::build_simulation(config.simulation.clone(), config.seed)?;
    apply_import(&mut simulation, args.import_matrix.as_deref())?;
    let report_every = (steps / 10).max(1);
    let start = Instant::now();

    for _ in 0..steps {
        simulation.step();
        if simulation.tick() % report_every == 0 {
            let stats = simulation.stats();
            info!("tick {} mean speed {:.5}", stats.tick, stats.mean_speed);
        }
    }
    info!("{} ticks in {:.2?}", steps, start.elapsed());

    let stats = simulation.stats();
    print!("{}", simulation.matrix());
    println!("tick: {}", stats.tick);
    println!("mean speed: {:.6}", stats.mean_speed);
    println!("color counts: {:?}", stats.color_counts);

    if let Some(path) = &args.export_matrix {
        std::fs::write(path, simulation.matrix().to_string())?;
        info!("wrote matrix to {}", path.display());
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                // Only process Press events
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    KeyCode::Char(' ') => app.toggle_pause(),
                    KeyCode::Char('r') | KeyCode::Char('R') => app.regenerate_matrix(),
                    KeyCode::Char('p') | KeyCode::Char('P') => app.reset_particles(),
                    KeyCode::Char('x') | KeyCode::Char('X') => {
                        app.export_matrix(Path::new(MATRIX_EXPORT_FILE))
                    }
                    KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                    KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                        app.toggle_help()
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        app.increase_speed();
                        app.focus = Focus::Speed;
                    }
                    KeyCode::Char('-') | KeyCode::Char('_') => {
                        app.decrease_speed();
                        app.focus = Focus::Speed;
                    }

                    // Navigation
                    KeyCode::Tab => app.next_focus(),
                    KeyCode::BackTab => app.prev_focus(),
                    KeyCode::Up | KeyCode::Right => {
                        if !app.show_help && app.focus.is_param() {
                            app.adjust_focused_up();
                        }
                    }
                    KeyCode::Down | KeyCode::Left => {
                        if !app.show_help && app.focus.is_param() {
                            app.adjust_focused_down();
                        }
                    }
                    KeyCode::Esc => {
                        if app.show_help {
                            app.toggle_help();
                        } else {
                            app.focus = Focus::None;
                        }
                    }
                    KeyCode::Char('j') | KeyCode::Char('J') => {
                        if app.show_help {
                            app.scroll_help_down(ui::HELP_CONTENT_LINES);
                        }
                    }
                    KeyCode::Char('k') | KeyCode::Char('K') => {
                        if app.show_help {
                            app.scroll_help_up();
                        }
                    }
                    _ => {}
                }
            }
        }

        app.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use particle_life::SimulationConfig;

    #[test]
    fn test_imported_matrix_applies_on_first_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.txt");
        std::fs::write(&path, "0.50 -0.25\n1.00 0.00\n").unwrap();

        let config = SimulationConfig {
            particle_count: 20,
            color_count: 2,
            ..Default::default()
        };
        let mut simulation = Simulation::with_seed(config, 1).unwrap();
        apply_import(&mut simulation, Some(&path)).unwrap();
        assert!(simulation.has_pending_matrix());

        simulation.step();
        assert_eq!(
            simulation.matrix_snapshot(),
            vec![vec![0.5, -0.25], vec![1.0, 0.0]]
        );
    }

    #[test]
    fn test_import_rejects_wrong_size_and_bad_text() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimulationConfig {
            particle_count: 20,
            color_count: 3,
            ..Default::default()
        };
        let mut simulation = Simulation::with_seed(config, 1).unwrap();

        let small = dir.path().join("small.txt");
        std::fs::write(&small, "0.1 0.2\n0.3 0.4\n").unwrap();
        assert!(apply_import(&mut simulation, Some(&small)).is_err());

        let garbage = dir.path().join("garbage.txt");
        std::fs::write(&garbage, "a b c\n").unwrap();
        assert!(apply_import(&mut simulation, Some(&garbage)).is_err());

        assert!(!simulation.has_pending_matrix());
        assert!(apply_import(&mut simulation, None).is_ok());
    }

    #[test]
    fn test_cli_flags_override_preset() {
        let args = Args::parse_from([
            "particle-life",
            "--preset",
            "open field",
            "--particles",
            "42",
            "--boundary",
            "periodic",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.simulation.particle_count, 42);
        assert_eq!(config.simulation.boundary, BoundaryMode::Periodic);
        assert_eq!(config.simulation.neighbor_search, NeighborSearch::BruteForce);
    }
}
