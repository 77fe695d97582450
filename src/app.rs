use crate::braille;
use crate::brush::Brush;
use crate::config::AppConfig;
use crate::error::SimError;
use crate::simulation::Simulation;
use rand::rngs::ThreadRng;
use std::path::PathBuf;

pub const MAX_TICKS_PER_FRAME: usize = 10;

/// Focus state for parameter editing in the sidebar
/// Alphabetically ordered for consistent UI display
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    // Alphabetical order
    CellSize,
    Dust,
    Glue,
    Gravity,
    Material,
    SandColor,
    Speed,
    Wind,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters in alphabetical order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::CellSize,
            Focus::CellSize => Focus::Dust,
            Focus::Dust => Focus::Glue,
            Focus::Glue => Focus::Gravity,
            Focus::Gravity => Focus::Material,
            Focus::Material => Focus::SandColor,
            Focus::SandColor => Focus::Speed,
            Focus::Speed => Focus::Wind,
            Focus::Wind => Focus::CellSize, // Loop back
        }
    }

    /// Shift+Tab cycles through parameters in reverse alphabetical order
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Wind,
            Focus::CellSize => Focus::Wind, // Loop back
            Focus::Dust => Focus::CellSize,
            Focus::Glue => Focus::Dust,
            Focus::Gravity => Focus::Glue,
            Focus::Material => Focus::Gravity,
            Focus::SandColor => Focus::Material,
            Focus::Speed => Focus::SandColor,
            Focus::Wind => Focus::Speed,
        }
    }

    /// Line index in the parameters box for this focus
    pub fn line_index(&self) -> u16 {
        match self {
            Focus::None | Focus::Controls => 0,
            Focus::CellSize => 0,
            Focus::Dust => 1,
            Focus::Glue => 2,
            Focus::Gravity => 3,
            Focus::Material => 4,
            Focus::SandColor => 5,
            Focus::Speed => 6,
            Focus::Wind => 7,
        }
    }

    /// Check if focus is on a parameter (not Controls or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }
}

/// Main application state
pub struct App {
    pub simulation: Simulation,
    pub brush: Brush,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub ticks_per_frame: usize,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    /// Where `S` writes the current settings
    pub config_path: PathBuf,
    /// One-line feedback shown in the status box
    pub message: Option<String>,
    /// Button held over the canvas: character position and whether it is the primary button
    pub pointer: Option<(u16, u16, bool)>,
    rng: ThreadRng,
}

impl App {
    pub fn new(
        canvas_width: u16,
        canvas_height: u16,
        config: &AppConfig,
        config_path: PathBuf,
    ) -> Result<Self, SimError> {
        let (width, height) = braille::viewport_dots(canvas_width, canvas_height);
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            simulation: Simulation::new(width, height, config.params, config.workers, seed)?,
            brush: config.brush,
            focus: Focus::Controls,
            fullscreen_mode: false,
            ticks_per_frame: config.ticks_per_frame.clamp(1, MAX_TICKS_PER_FRAME),
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            config_path,
            message: None,
            pointer: None,
            rng: rand::thread_rng(),
        })
    }

    /// Pour under a held button, then run simulation ticks for the current frame
    pub fn tick(&mut self) {
        if let Some((cx, cy, primary)) = self.pointer {
            self.pour(cx, cy, primary);
        }
        if !self.simulation.paused {
            for _ in 0..self.ticks_per_frame {
                self.simulation.advance_tick();
            }
        }
    }

    /// Spawn into every grid cell under the canvas character at (cx, cy).
    /// `primary` pours sand or magic dust, otherwise water.
    /// Returns how many particles were created.
    pub fn pour(&mut self, cx: u16, cy: u16, primary: bool) -> usize {
        let cell_size = self.simulation.params().cell_size;
        let dust = self.simulation.params().dust;
        let mut spawned = 0;
        for (x, y) in braille::cells_under_char(cx, cy, cell_size) {
            let (kind, color, glued) = if primary {
                self.brush.primary(dust, &mut self.rng)
            } else {
                self.brush.secondary()
            };
            if self.simulation.spawn(x, y, kind, color, glued) {
                spawned += 1;
            }
        }
        spawned
    }

    /// Start or move a held button; `None` when the pointer left the canvas
    pub fn hold(&mut self, position: Option<(u16, u16)>, primary: bool) {
        self.pointer = position.map(|(cx, cy)| (cx, cy, primary));
    }

    pub fn release(&mut self) {
        self.pointer = None;
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::CellSize => self.adjust_cell_size(1),
            Focus::Dust => self.cycle_dust(),
            Focus::Glue => self.brush.toggle_glue(),
            Focus::Gravity => self.adjust_gravity(0.5),
            Focus::Material => self.brush.toggle_magic(),
            Focus::SandColor => self.brush.sand_color = self.brush.sand_color.next(),
            Focus::Speed => self.increase_speed(),
            Focus::Wind => self.adjust_wind(0.5),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::CellSize => self.adjust_cell_size(-1),
            Focus::Dust => self.cycle_dust_prev(),
            Focus::Glue => self.brush.toggle_glue(),
            Focus::Gravity => self.adjust_gravity(-0.5),
            Focus::Material => self.brush.toggle_magic(),
            Focus::SandColor => self.brush.sand_color = self.brush.sand_color.prev(),
            Focus::Speed => self.decrease_speed(),
            Focus::Wind => self.adjust_wind(-0.5),
        }
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.simulation.toggle_pause();
    }

    /// Remove every particle
    pub fn clear(&mut self) {
        self.simulation.clear();
        self.message = Some("Cleared".to_string());
    }

    pub fn adjust_gravity(&mut self, delta: f32) {
        let mut params = *self.simulation.params();
        params.adjust_gravity(delta);
        self.simulation
            .set_parameters(params.gravity, params.wind, params.cell_size);
    }

    pub fn adjust_wind(&mut self, delta: f32) {
        let mut params = *self.simulation.params();
        params.adjust_wind(delta);
        self.simulation
            .set_parameters(params.gravity, params.wind, params.cell_size);
    }

    /// Changing the cell size rebuilds the grid, discarding every particle
    pub fn adjust_cell_size(&mut self, delta: i32) {
        let params = *self.simulation.params();
        let cell_size = params.adjusted_cell_size(delta);
        if cell_size != params.cell_size {
            self.simulation
                .set_parameters(params.gravity, params.wind, cell_size);
            self.message = Some(format!(
                "Grid {}x{}",
                self.simulation.cols(),
                self.simulation.rows()
            ));
        }
    }

    pub fn cycle_dust(&mut self) {
        let dust = self.simulation.params().dust.next();
        self.simulation.set_dust(dust);
    }

    pub fn cycle_dust_prev(&mut self) {
        let dust = self.simulation.params().dust.prev();
        self.simulation.set_dust(dust);
    }

    pub fn cycle_sand_color(&mut self) {
        self.brush.sand_color = self.brush.sand_color.next();
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

    /// Resize simulation to match new canvas size
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        let (width, height) = braille::viewport_dots(canvas_width, canvas_height);
        self.simulation.set_viewport(width, height);
    }

    /// Increase ticks per frame
    pub fn increase_speed(&mut self) {
        self.ticks_per_frame = (self.ticks_per_frame + 1).min(MAX_TICKS_PER_FRAME);
    }

    /// Decrease ticks per frame
    pub fn decrease_speed(&mut self) {
        self.ticks_per_frame = self.ticks_per_frame.saturating_sub(1).max(1);
    }

    /// Current settings as a config file
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            params: *self.simulation.params(),
            workers: self.simulation.workers(),
            ticks_per_frame: self.ticks_per_frame,
            seed: None,
            brush: self.brush,
            ..AppConfig::default()
        }
    }

    /// Write current settings to `config_path`
    pub fn save_config(&mut self) {
        match self.to_config().save_to_file(&self.config_path) {
            Ok(()) => self.message = Some("Config saved".to_string()),
            Err(err) => {
                log::warn!("saving config to {} failed: {}", self.config_path.display(), err);
                self.message = Some("Save failed (see log)".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleKind;
    use crate::settings::MagicDust;

    fn app() -> App {
        let config = AppConfig {
            workers: 2,
            seed: Some(5),
            ..AppConfig::default()
        };
        App::new(20, 10, &config, PathBuf::from("unused.json")).unwrap()
    }

    #[test]
    fn test_new_sizes_grid_from_canvas() {
        let app = app();
        assert_eq!((app.simulation.cols(), app.simulation.rows()), (40, 40));
        assert_eq!(app.simulation.seed(), 5);
        assert_eq!(app.simulation.workers(), 2);
    }

    #[test]
    fn test_pour_fills_cells_under_character() {
        let mut app = app();
        assert_eq!(app.pour(0, 0, true), 8);
        assert_eq!(app.pour(0, 0, true), 0);
        assert_eq!(app.pour(1, 0, false), 8);

        let counts = app.simulation.counts();
        assert_eq!(counts[&ParticleKind::Sand], 8);
        assert_eq!(counts[&ParticleKind::Water], 8);
    }

    #[test]
    fn test_pour_magic_dust_with_glue() {
        let mut app = app();
        app.brush.toggle_magic();
        app.brush.toggle_glue();
        app.pour(3, 3, true);

        let particles = app.simulation.particles();
        assert_eq!(particles.len(), 8);
        assert!(particles
            .iter()
            .all(|p| p.kind == ParticleKind::MagicDust && p.glued()));
    }

    #[test]
    fn test_pour_outside_grid_is_ignored() {
        let mut app = app();
        assert_eq!(app.pour(500, 500, true), 0);
    }

    #[test]
    fn test_tick_respects_pause() {
        let mut app = app();
        app.ticks_per_frame = 3;
        app.tick();
        assert_eq!(app.simulation.tick(), 3);

        app.toggle_pause();
        app.tick();
        assert_eq!(app.simulation.tick(), 3);
    }

    #[test]
    fn test_held_button_pours_every_frame() {
        let mut app = app();
        app.toggle_pause();
        app.hold(Some((0, 0)), false);
        app.tick();
        assert_eq!(app.simulation.particle_count(), 8);

        // Cells under the pointer are full; unpausing lets them drain and refill
        app.toggle_pause();
        app.tick();
        app.tick();
        assert!(app.simulation.particle_count() > 8);

        app.release();
        let count = app.simulation.particle_count();
        app.tick();
        assert_eq!(app.simulation.particle_count(), count);
    }

    #[test]
    fn test_hold_outside_canvas_stops_pouring() {
        let mut app = app();
        app.hold(Some((2, 2)), true);
        app.hold(None, true);
        app.tick();
        assert_eq!(app.simulation.particle_count(), 0);
    }

    #[test]
    fn test_cell_size_change_clears_grid() {
        let mut app = app();
        app.pour(2, 2, true);
        app.focus = Focus::CellSize;
        app.adjust_focused_up();

        assert_eq!(app.simulation.params().cell_size, 2);
        assert_eq!((app.simulation.cols(), app.simulation.rows()), (20, 20));
        assert_eq!(app.simulation.particle_count(), 0);
    }

    #[test]
    fn test_gravity_adjust_keeps_particles() {
        let mut app = app();
        app.pour(2, 2, true);
        app.focus = Focus::Gravity;
        app.adjust_focused_down();
        app.adjust_focused_down();

        assert_eq!(app.simulation.params().gravity, 0.0);
        assert_eq!(app.simulation.particle_count(), 8);
    }

    #[test]
    fn test_focus_cycles() {
        let mut focus = Focus::Controls;
        for _ in 0..8 {
            focus = focus.next();
            assert!(focus.is_param());
        }
        assert_eq!(focus, Focus::Wind);
        assert_eq!(focus.next(), Focus::CellSize);
        assert_eq!(Focus::CellSize.prev(), Focus::Wind);
    }

    #[test]
    fn test_dust_cycle_updates_params() {
        let mut app = app();
        app.cycle_dust();
        assert_eq!(app.simulation.params().dust, MagicDust::FairySparkles);
        app.cycle_dust_prev();
        assert_eq!(app.simulation.params().dust, MagicDust::StarDust);
    }

    #[test]
    fn test_speed_bounds() {
        let mut app = app();
        for _ in 0..20 {
            app.increase_speed();
        }
        assert_eq!(app.ticks_per_frame, MAX_TICKS_PER_FRAME);
        for _ in 0..20 {
            app.decrease_speed();
        }
        assert_eq!(app.ticks_per_frame, 1);
    }

    #[test]
    fn test_save_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.config_path = dir.path().join("config.json");
        app.adjust_wind(2.0);
        app.save_config();

        let saved = AppConfig::load_from_file(&app.config_path).unwrap();
        assert_eq!(saved.params.wind, 2.0);
        assert_eq!(saved.workers, 2);
        assert_eq!(app.message.as_deref(), Some("Config saved"));
    }
}
