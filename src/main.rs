mod ambient;
mod app;
mod banana;
mod braille;
mod breeze;
mod config;
mod controller;
mod driver;
mod effect;
mod orbit;
mod popcorn;
mod simulation;
mod sprite;
mod surface;
mod ui;

use app::App;
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
use effect::Effect;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use sprite::Sprite;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "banana-swarm")]
#[command(about = "A swarm of animated bananas in the terminal")]
struct Args {
    /// Number of bananas (1-1000)
    #[arg(short = 'b', long)]
    bananas: Option<usize>,

    /// World pixels per Braille dot (1-16); larger values shrink the bananas
    #[arg(short = 'r', long = "pixel-ratio")]
    pixel_ratio: Option<f32>,

    /// Frame period in milliseconds (8-100)
    #[arg(long = "frame-ms")]
    frame_ms: Option<u64>,

    /// Sprite image (PNG, GIF, ...) used instead of the builtin banana
    #[arg(long)]
    sprite: Option<PathBuf>,

    /// Seed for a reproducible swarm
    #[arg(long)]
    seed: Option<u64>,

    /// Effect shown first (drift, spin, wobble, stretch, popcorn, breeze, orbit)
    #[arg(short = 'e', long)]
    effect: Option<String>,

    /// Config file (defaults to the per-user config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the effective settings back to the config file
    #[arg(long = "save-config")]
    save_config: bool,

    /// Write logs to this file (level from RUST_LOG, default info)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Start without the sidebar
    #[arg(long)]
    fullscreen: bool,
}

/// Log to a file so the alternate screen stays clean
fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::create(path)
        .map_err(|e| format!("Failed to create log file {}: {}", path.display(), e))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Config file first, then command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config_path = args.config.clone().or_else(AppConfig::default_path);
    let mut config = match &config_path {
        Some(path) => AppConfig::load_or_default(path)?,
        None => AppConfig::default(),
    };

    if let Some(bananas) = args.bananas {
        config.banana_count = bananas;
    }
    if let Some(ratio) = args.pixel_ratio {
        config.pixel_ratio = ratio;
    }
    if let Some(frame_ms) = args.frame_ms {
        config.frame_millis = frame_ms;
    }
    if let Some(sprite) = &args.sprite {
        config.sprite_path = Some(sprite.clone());
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(name) = &args.effect {
        config.start_effect =
            Effect::from_name(name).ok_or_else(|| format!("Unknown effect: {}", name))?;
    }
    if args.fullscreen {
        config.fullscreen = true;
    }
    let config = config.clamped();

    if args.save_config {
        let path = config_path.ok_or("Could not determine config directory")?;
        config.save_to_file(&path)?;
        log::info!("Saved config to {}", path.display());
    }

    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = resolve_config(&args)?;

    // Load the sprite before touching the terminal so failures print normally
    let sprite = match &config.sprite_path {
        Some(path) => Sprite::load(path)?,
        None => Sprite::builtin(),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Get initial terminal size and create app
    let size = terminal.size()?;
    let (canvas_width, canvas_height) =
        ui::get_canvas_size(frame_rect(size.width, size.height), config.fullscreen);
    let mut app = App::new(canvas_width, canvas_height, &config, sprite);
    log::info!(
        "Starting with {} bananas on a {}x{} canvas",
        app.swarm.len(),
        canvas_width,
        canvas_height
    );

    // Run the app
    let res = run_app(&mut terminal, &mut app, Duration::from_millis(config.frame_millis));

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("Run failed: {}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn frame_rect(width: u16, height: u16) -> Rect {
    Rect {
        x: 0,
        y: 0,
        width,
        height,
    }
}

/// Match the canvas to the current terminal size and layout
fn sync_canvas<B: ratatui::backend::Backend>(terminal: &Terminal<B>, app: &mut App) -> io::Result<()> {
    let size = terminal.size()?;
    let (canvas_width, canvas_height) =
        ui::get_canvas_size(frame_rect(size.width, size.height), app.fullscreen_mode);
    app.resize(canvas_width, canvas_height);
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    frame_duration: Duration,
) -> io::Result<()> {
    let mut scheduler = FrameScheduler::new(Instant::now(), frame_duration);

    loop {
        if let Some(timestamp_ms) = scheduler.due(Instant::now()) {
            app.tick(timestamp_ms);
            terminal.draw(|frame| ui::render(frame, app))?;
        }

        // Events arriving before the deadline are handled without ticking
        if event::poll(scheduler.timeout(Instant::now()))? {
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
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        // The banana-hand control
                        KeyCode::Enter | KeyCode::Char(' ') => {
                            app.advance_mode();
                        }
                        KeyCode::Char('v') | KeyCode::Char('V') => {
                            app.toggle_fullscreen();
                            sync_canvas(terminal, app)?;
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
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
                        KeyCode::Up => app.scroll_controls_up(),
                        KeyCode::Down => {
                            let term_size = terminal.size().unwrap_or_default();
                            let visible = ui::get_controls_visible_lines(term_size.height);
                            app.scroll_controls_down(ui::CONTROLS_CONTENT_LINES.saturating_sub(visible));
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left) && !app.show_help {
                        let size = terminal.size()?;
                        let canvas = ui::canvas_inner(frame_rect(size.width, size.height), app.fullscreen_mode);
                        if canvas.contains(ratatui::layout::Position::new(mouse.column, mouse.row)) {
                            app.advance_mode();
                        }
                    }
                }
                Event::Resize(width, height) => {
                    let (canvas_width, canvas_height) =
                        ui::get_canvas_size(frame_rect(width, height), app.fullscreen_mode);
                    app.resize(canvas_width, canvas_height);
                }
                _ => {}
            }
        }
    }
}

/// The host scheduler: one tick per frame period with a monotonic timestamp,
/// however many input events wake the loop in between
struct FrameScheduler {
    start: Instant,
    next_frame: Instant,
    period: Duration,
}

impl FrameScheduler {
    fn new(start: Instant, period: Duration) -> Self {
        Self {
            start,
            next_frame: start,
            period,
        }
    }

    /// Milliseconds since start when a frame is due at `now`
    fn due(&mut self, now: Instant) -> Option<f64> {
        if now < self.next_frame {
            return None;
        }
        // A loop that fell a whole period behind resyncs instead of bursting
        let next = self.next_frame + self.period;
        self.next_frame = if next <= now { now + self.period } else { next };
        Some(now.duration_since(self.start).as_secs_f64() * 1000.0)
    }

    /// How long to wait for input before the next frame is due
    fn timeout(&self, now: Instant) -> Duration {
        self.next_frame.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(16);

    #[test]
    fn test_first_frame_is_immediate() {
        let start = Instant::now();
        let mut scheduler = FrameScheduler::new(start, PERIOD);
        assert_eq!(scheduler.timeout(start), Duration::ZERO);
        assert_eq!(scheduler.due(start), Some(0.0));
        assert_eq!(scheduler.timeout(start), PERIOD);
    }

    #[test]
    fn test_keeps_cadence() {
        let start = Instant::now();
        let mut scheduler = FrameScheduler::new(start, PERIOD);
        scheduler.due(start);
        assert!(scheduler.due(start + Duration::from_millis(15)).is_none());
        let timestamp = scheduler.due(start + Duration::from_millis(17));
        assert!(timestamp.is_some_and(|ms| (ms - 17.0).abs() < 1e-9));
        assert_eq!(scheduler.timeout(start + Duration::from_millis(17)), Duration::from_millis(15));
    }

    #[test]
    fn test_resyncs_after_stall() {
        let start = Instant::now();
        let mut scheduler = FrameScheduler::new(start, PERIOD);
        scheduler.due(start);
        let late = start + Duration::from_millis(500);
        assert!(scheduler.due(late).is_some());
        assert!(scheduler.due(late).is_none());
        assert_eq!(scheduler.timeout(late), PERIOD);
    }

    #[test]
    fn test_input_bursts_do_not_tick() {
        let config = AppConfig {
            banana_count: 4,
            seed: Some(9),
            ..Default::default()
        };
        let mut app = App::new(40, 10, &config, Sprite::builtin());
        app.advance_mode();

        let start = Instant::now();
        let mut scheduler = FrameScheduler::new(start, PERIOD);
        // Mouse-motion wakeups within one frame period
        for offset in [0u64, 1, 2, 3, 5, 8, 13] {
            if let Some(timestamp_ms) = scheduler.due(start + Duration::from_millis(offset)) {
                app.tick(timestamp_ms);
            }
        }
        assert_eq!(app.driver.frames_rendered(), 1);
    }
}
