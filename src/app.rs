use crate::braille::BrailleCell;
use crate::config::AppConfig;
use crate::controller::{ModeController, Transition};
use crate::driver::{DriverState, FrameDriver};
use crate::effect::Effect;
use crate::simulation::Swarm;
use crate::sprite::Sprite;
use crate::surface::{BrailleSurface, Surface};

/// Main application state
pub struct App {
    pub swarm: Swarm,
    pub controller: ModeController,
    pub driver: FrameDriver,
    pub surface: BrailleSurface,
    pub sprite: Sprite,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    canvas_size: (u16, u16),
}

impl App {
    pub fn new(canvas_width: u16, canvas_height: u16, config: &AppConfig, sprite: Sprite) -> Self {
        let surface = BrailleSurface::new(canvas_width, canvas_height, config.pixel_ratio);
        let (width, height) = surface.size();
        Self {
            swarm: Swarm::new(config.banana_count, width, height, config.seed),
            controller: ModeController::starting_at(config.start_effect),
            driver: FrameDriver::new(),
            surface,
            sprite,
            fullscreen_mode: config.fullscreen,
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            canvas_size: (canvas_width, canvas_height),
        }
    }

    /// Run one display frame at `timestamp_ms`
    pub fn tick(&mut self, timestamp_ms: f64) -> DriverState {
        self.driver.run_frame(
            &mut self.swarm,
            self.controller.active(),
            self.controller.is_visible(),
            timestamp_ms,
            &mut self.surface,
            &self.sprite,
        )
    }

    /// Canvas click or the banana-hand control
    pub fn advance_mode(&mut self) -> Transition {
        self.controller.advance(&mut self.swarm)
    }

    pub fn is_visible(&self) -> bool {
        self.controller.is_visible()
    }

    pub fn active_effect(&self) -> Option<Effect> {
        self.controller.active()
    }

    /// Effect the next visible trigger will show
    pub fn upcoming_effect(&self) -> Effect {
        self.controller.last_effect().next()
    }

    pub fn canvas_cells(&self) -> Vec<BrailleCell> {
        self.surface.cells()
    }

    /// Toggle fullscreen mode
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

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Scroll controls box up
    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    /// Scroll controls box down
    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }

    /// Resize surface and swarm to match new canvas size
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        if self.canvas_size == (canvas_width, canvas_height) {
            return;
        }
        self.canvas_size = (canvas_width, canvas_height);
        self.surface.resize(canvas_width, canvas_height);
        let (width, height) = self.surface.size();
        self.swarm.resize(width, height);
        log::info!("Canvas resized to {}x{} cells", canvas_width, canvas_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let config = AppConfig {
            banana_count: 10,
            seed: Some(5),
            ..Default::default()
        };
        App::new(60, 20, &config, Sprite::builtin())
    }

    #[test]
    fn test_starts_hidden() {
        let mut app = app();
        assert!(!app.is_visible());
        assert_eq!(app.tick(0.0), DriverState::Hidden);
        assert!(app.canvas_cells().is_empty());
        assert_eq!(app.upcoming_effect(), Effect::Drift);
    }

    #[test]
    fn test_trigger_shows_and_draws() {
        let mut app = app();
        assert_eq!(app.advance_mode(), Transition::Shown(Effect::Drift));
        assert_eq!(app.tick(0.0), DriverState::Running);
        assert!(!app.canvas_cells().is_empty());

        assert_eq!(app.advance_mode(), Transition::Hidden);
        assert_eq!(app.tick(16.0), DriverState::Hidden);
        assert_eq!(app.upcoming_effect(), Effect::Spin);
    }

    #[test]
    fn test_start_effect_from_config() {
        let config = AppConfig {
            banana_count: 3,
            seed: Some(6),
            start_effect: Effect::Breeze,
            ..Default::default()
        };
        let mut app = App::new(40, 10, &config, Sprite::builtin());
        assert_eq!(app.advance_mode(), Transition::Shown(Effect::Breeze));
    }

    #[test]
    fn test_resize_tracks_surface() {
        let mut app = app();
        app.resize(30, 10);
        assert_eq!(app.surface.size(), (30.0 * 2.0 * 4.0, 10.0 * 4.0 * 4.0));
        assert_eq!((app.swarm.width, app.swarm.height), app.surface.size());
    }

    #[test]
    fn test_help_scroll_resets() {
        let mut app = app();
        app.toggle_help();
        app.scroll_help_down(10);
        app.scroll_help_down(10);
        assert_eq!(app.help_scroll, 2);
        app.toggle_help();
        app.toggle_help();
        assert_eq!(app.help_scroll, 0);
    }
}
