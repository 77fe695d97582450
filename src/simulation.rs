use crate::color::Rgb;
use crate::error::SimError;
use crate::grid::Grid;
use crate::particle::{Particle, ParticleKind};
use crate::scheduler::TickScheduler;
use crate::settings::{MagicDust, SimParams};
use std::collections::HashMap;

/// Falling sand simulation state
pub struct Simulation {
    grid: Grid,
    params: SimParams,
    scheduler: TickScheduler,
    /// Drawable area in Braille dots; grid dimensions derive from it
    viewport: (usize, usize),
    tick: u64,
    seed: u64,
    pub paused: bool,
}

impl Simulation {
    pub fn new(
        viewport_width: usize,
        viewport_height: usize,
        params: SimParams,
        workers: usize,
        seed: u64,
    ) -> Result<Self, SimError> {
        let params = params.clamped();
        let (cols, rows) = grid_dimensions(viewport_width, viewport_height, params.cell_size);
        log::info!(
            "grid {}x{} (viewport {}x{}, cell size {}), seed {}",
            cols,
            rows,
            viewport_width,
            viewport_height,
            params.cell_size,
            seed
        );
        Ok(Self {
            grid: Grid::new(cols, rows),
            params,
            scheduler: TickScheduler::new(workers)?,
            viewport: (viewport_width, viewport_height),
            tick: 0,
            seed,
            paused: false,
        })
    }

    /// Simulation over an exact `cols x rows` grid with a cell size of one dot
    #[allow(dead_code)]
    pub fn with_grid(
        cols: usize,
        rows: usize,
        params: SimParams,
        workers: usize,
        seed: u64,
    ) -> Result<Self, SimError> {
        let params = SimParams {
            cell_size: 1,
            ..params
        };
        Self::new(cols, rows, params, workers, seed)
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn workers(&self) -> usize {
        self.scheduler.workers()
    }

    #[allow(dead_code)]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Create a particle at (x, y) if that cell is in bounds and empty
    pub fn spawn(&mut self, x: i64, y: i64, kind: ParticleKind, color: Rgb, glued: bool) -> bool {
        if !self.grid.in_bounds(x, y) {
            return false;
        }
        self.grid
            .place(Particle::new(x as usize, y as usize, kind, color, glued))
    }

    /// Apply new physical constants between ticks.
    /// A cell size change rebuilds the grid and discards every particle.
    pub fn set_parameters(&mut self, gravity: f32, wind: f32, cell_size: u16) {
        let next = SimParams {
            gravity,
            wind,
            cell_size,
            dust: self.params.dust,
        }
        .clamped();
        let resize = next.cell_size != self.params.cell_size;
        if next != self.params {
            log::debug!(
                "parameters: gravity {:.1}, wind {:.1}, cell size {}",
                next.gravity,
                next.wind,
                next.cell_size
            );
        }
        self.params = next;
        if resize {
            self.rebuild_grid();
        }
    }

    pub fn set_dust(&mut self, dust: MagicDust) {
        self.params.dust = dust;
    }

    /// Track the drawable area; the grid is rebuilt only if its dimensions change
    pub fn set_viewport(&mut self, width: usize, height: usize) {
        if (width, height) != self.viewport {
            self.viewport = (width, height);
            self.rebuild_grid();
        }
    }

    fn rebuild_grid(&mut self) {
        let (cols, rows) = grid_dimensions(self.viewport.0, self.viewport.1, self.params.cell_size);
        log::info!(
            "grid resized to {}x{} (cell size {}), {} particles discarded",
            cols,
            rows,
            self.params.cell_size,
            self.grid.count()
        );
        self.grid.resize(cols, rows);
    }

    /// Run one partitioned update pass; returns after every band finished
    pub fn advance_tick(&mut self) {
        self.tick += 1;
        self.scheduler
            .run_tick(&self.grid, &self.params, self.tick, self.seed);
    }

    /// Every particle as (x, y, colour), for rendering between ticks
    pub fn snapshot(&self) -> Vec<(usize, usize, Rgb)> {
        self.grid.snapshot()
    }

    #[allow(dead_code)]
    pub fn get(&self, x: usize, y: usize) -> Result<Option<Particle>, SimError> {
        self.grid.get(x, y)
    }

    #[allow(dead_code)]
    pub fn particles(&self) -> Vec<Particle> {
        self.grid.particles()
    }

    pub fn particle_count(&self) -> usize {
        self.grid.count()
    }

    pub fn counts(&self) -> HashMap<ParticleKind, usize> {
        self.grid.count_by_kind()
    }

    /// Remove every particle, keeping the grid dimensions
    pub fn clear(&mut self) {
        self.grid.clear();
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

/// Grid columns and rows for a viewport in dots, never smaller than 1x1
pub fn grid_dimensions(width: usize, height: usize, cell_size: u16) -> (usize, usize) {
    let cell = cell_size.max(1) as usize;
    ((width / cell).max(1), (height / cell).max(1))
}
