mod app;
mod braille;
mod brush;
mod color;
mod config;
mod error;
mod grid;
mod logging;
mod particle;
mod resolver;
mod scheduler;
mod settings;
mod simulation;
mod ui;

use app::{App, Focus};
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "pixel-sand")]
#[command(about = "Falling sand, water and magic dust simulation in the terminal")]
struct Args {
    /// Gravity (-10 to 10, negative = particles fall upward)
    #[arg(short = 'g', long, allow_hyphen_values = true)]
    gravity: Option<f32>,

    /// Wind strength in columns per gust (0-10)
    #[arg(short = 'w', long)]
    wind: Option<f32>,

    /// Size of one grid cell in Braille dots (1-10)
    #[arg(short = 'c', long = "cell-size")]
    cell_size: Option<u16>,

    /// Number of column bands updated in parallel (1-64)
    #[arg(long)]
    workers: Option<usize>,

    /// Simulation speed (ticks per frame, 1-10)
    #[arg(long)]
    speed: Option<usize>,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Config file to load at startup and write with `S`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,
}

/// Load the config file if present, then layer CLI overrides on top
fn resolve_config(args: &Args, path: &Path) -> Result<AppConfig, error::SimError> {
    let mut config = if path.exists() {
        AppConfig::load_from_file(path)?
    } else {
        AppConfig::default()
    };

    if let Some(gravity) = args.gravity {
        config.params.gravity = gravity;
    }
    if let Some(wind) = args.wind {
        config.params.wind = wind;
    }
    if let Some(cell_size) = args.cell_size {
        config.params.cell_size = cell_size;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(speed) = args.speed {
        config.ticks_per_frame = speed;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    config.params = config.params.clamped();
    config.workers = config.workers.clamp(1, scheduler::MAX_WORKERS);
    config.ticks_per_frame = config.ticks_per_frame.clamp(1, app::MAX_TICKS_PER_FRAME);
    Ok(config)
}

fn frame_rect(width: u16, height: u16) -> Rect {
    Rect {
        x: 0,
        y: 0,
        width,
        height,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let _logger = logging::setup(&args.log_level)?;

    let config_path = args.config.clone().unwrap_or_else(AppConfig::default_path);
    let config = resolve_config(&args, &config_path)?;
    log::info!(
        "starting: gravity={} wind={} cell_size={} workers={} speed={}",
        config.params.gravity,
        config.params.wind,
        config.params.cell_size,
        config.workers,
        config.ticks_per_frame
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Get initial terminal size and create app
    let size = terminal.size()?;
    let (canvas_width, canvas_height) =
        ui::get_canvas_size(frame_rect(size.width, size.height), false);

    let res = match App::new(canvas_width, canvas_height, &config, config_path) {
        Ok(mut app) => run_app(&mut terminal, &mut app).map_err(Box::<dyn std::error::Error>::from),
        Err(err) => Err(err.into()),
    };

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Recompute the canvas after the layout changed
fn refit_canvas(app: &mut App, width: u16, height: u16) {
    let (canvas_width, canvas_height) =
        ui::get_canvas_size(frame_rect(width, height), app.fullscreen_mode);
    app.resize(canvas_width, canvas_height);
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout
        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    match key.code {
                        // System controls
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Char('x') | KeyCode::Char('X') => app.clear(),
                        KeyCode::Char('v') | KeyCode::Char('V') => {
                            app.toggle_fullscreen();
                            let size = terminal.size()?;
                            refit_canvas(app, size.width, size.height);
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                            app.toggle_help()
                        }
                        KeyCode::Char('s') | KeyCode::Char('S') => app.save_config(),
                        KeyCode::Char('+') | KeyCode::Char('=') => {
                            app.increase_speed();
                            app.focus = Focus::Speed;
                        }
                        KeyCode::Char('-') | KeyCode::Char('_') => {
                            app.decrease_speed();
                            app.focus = Focus::Speed;
                        }

                        // Brush
                        KeyCode::Char('m') | KeyCode::Char('M') => {
                            app.brush.toggle_magic();
                            app.focus = Focus::Material;
                        }
                        KeyCode::Char('u') | KeyCode::Char('U') => {
                            app.brush.toggle_glue();
                            app.focus = Focus::Glue;
                        }
                        KeyCode::Char('d') | KeyCode::Char('D') => {
                            app.cycle_dust();
                            app.focus = Focus::Dust;
                        }
                        KeyCode::Char('c') | KeyCode::Char('C') => {
                            app.cycle_sand_color();
                            app.focus = Focus::SandColor;
                        }

                        // Parameters: lowercase lowers, uppercase raises
                        KeyCode::Char('g') => {
                            app.adjust_gravity(-0.5);
                            app.focus = Focus::Gravity;
                        }
                        KeyCode::Char('G') => {
                            app.adjust_gravity(0.5);
                            app.focus = Focus::Gravity;
                        }
                        KeyCode::Char('w') => {
                            app.adjust_wind(-0.5);
                            app.focus = Focus::Wind;
                        }
                        KeyCode::Char('W') => {
                            app.adjust_wind(0.5);
                            app.focus = Focus::Wind;
                        }
                        KeyCode::Char('z') => {
                            app.adjust_cell_size(-1);
                            app.focus = Focus::CellSize;
                        }
                        KeyCode::Char('Z') => {
                            app.adjust_cell_size(1);
                            app.focus = Focus::CellSize;
                        }

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_up();
                                } else {
                                    app.scroll_controls_up();
                                }
                            }
                        }
                        KeyCode::Down => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_down();
                                } else {
                                    let term_size = terminal.size().unwrap_or_default();
                                    let visible = ui::get_controls_visible_lines(term_size.height);
                                    app.scroll_controls_down(ui::CONTROLS_CONTENT_LINES.saturating_sub(visible));
                                }
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else if app.focus.is_param() {
                                app.focus = Focus::Controls;
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
                Event::Mouse(mouse) => {
                    let primary = match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left)
                        | MouseEventKind::Drag(MouseButton::Left) => true,
                        MouseEventKind::Down(MouseButton::Right)
                        | MouseEventKind::Drag(MouseButton::Right) => false,
                        MouseEventKind::Up(_) => {
                            app.release();
                            continue;
                        }
                        _ => continue,
                    };
                    let size = terminal.size()?;
                    let position = ui::to_canvas(
                        mouse.column,
                        mouse.row,
                        frame_rect(size.width, size.height),
                        app.fullscreen_mode,
                    );
                    // Pouring happens in `app.tick()` for as long as the button is held
                    app.hold(position, primary);
                }
                Event::Resize(width, height) => refit_canvas(app, width, height),
                _ => {}
            }
        }

        // Run simulation ticks
        app.tick();
    }
}
