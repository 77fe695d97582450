use crate::color::Rgb;
use crate::error::SimError;
use crate::particle::{Particle, ParticleKind};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

/// Cell occupancy shared by every worker during a tick.
///
/// Each cell sits behind its own mutex and cells are stored column-major
/// (`x * rows + y`), so one band of columns is one contiguous run of cells.
/// A move holds the source lock and only *tries* the destination lock, so
/// no thread ever waits for a lock while holding another.
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<Mutex<Option<Particle>>>,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Self {
        let cells = (0..cols * rows).map(|_| Mutex::new(None)).collect();
        Self { cols, rows, cells }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.cols && (y as usize) < self.rows
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x * self.rows + y
    }

    #[inline]
    fn lock(&self, x: usize, y: usize) -> MutexGuard<'_, Option<Particle>> {
        // A worker that panicked mid-move leaves a consistent cell behind;
        // occupancy is always written as a whole value.
        self.cells[self.index(x, y)]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, x: usize, y: usize) -> Result<(), SimError> {
        if x < self.cols && y < self.rows {
            Ok(())
        } else {
            Err(SimError::OutOfBounds {
                x: x as i64,
                y: y as i64,
                cols: self.cols,
                rows: self.rows,
            })
        }
    }

    /// Copy of the particle at (x, y)
    pub fn get(&self, x: usize, y: usize) -> Result<Option<Particle>, SimError> {
        self.check(x, y)?;
        Ok(*self.lock(x, y))
    }

    /// True only for in-bounds, unoccupied cells
    pub fn is_empty(&self, x: i64, y: i64) -> bool {
        self.in_bounds(x, y) && self.lock(x as usize, y as usize).is_none()
    }

    /// Put a particle into its own (x, y) cell if that cell is free
    pub fn place(&self, particle: Particle) -> bool {
        if self.check(particle.x, particle.y).is_err() {
            return false;
        }
        let mut cell = self.lock(particle.x, particle.y);
        if cell.is_some() {
            return false;
        }
        *cell = Some(particle);
        true
    }

    /// Mutate the particle at (x, y) in place, under its cell lock.
    /// Returns `None` when the cell is empty or out of bounds.
    pub fn update<R>(&self, x: usize, y: usize, f: impl FnOnce(&mut Particle) -> R) -> Option<R> {
        if self.check(x, y).is_err() {
            return None;
        }
        self.lock(x, y).as_mut().map(f)
    }

    /// Relocate the occupant of (from_x, from_y) to (to_x, to_y).
    ///
    /// Succeeds only if the source is occupied and the destination is in
    /// bounds, empty, and not locked by another worker at this instant.
    /// The particle's own coordinates are updated with the cells.
    pub fn try_move(&self, from_x: usize, from_y: usize, to_x: i64, to_y: i64) -> bool {
        if self.check(from_x, from_y).is_err() || !self.in_bounds(to_x, to_y) {
            return false;
        }
        let (to_x, to_y) = (to_x as usize, to_y as usize);
        if (to_x, to_y) == (from_x, from_y) {
            return false;
        }

        let mut source = self.lock(from_x, from_y);
        let Some(mut particle) = *source else {
            return false;
        };

        let to_idx = self.index(to_x, to_y);
        let mut dest = match self.cells[to_idx].try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            // Another worker is touching the destination: treat as blocked
            Err(TryLockError::WouldBlock) => return false,
        };
        if dest.is_some() {
            return false;
        }

        particle.x = to_x;
        particle.y = to_y;
        *dest = Some(particle);
        *source = None;
        true
    }

    /// Swap in an all-empty grid of the new dimensions
    pub fn resize(&mut self, cols: usize, rows: usize) {
        *self = Grid::new(cols, rows);
    }

    /// Empty every cell, keeping the dimensions
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell.get_mut().unwrap_or_else(PoisonError::into_inner) = None;
        }
    }

    /// Every occupied cell as (x, y, colour), column by column
    pub fn snapshot(&self) -> Vec<(usize, usize, Rgb)> {
        self.particles()
            .into_iter()
            .map(|p| (p.x, p.y, p.color))
            .collect()
    }

    pub fn particles(&self) -> Vec<Particle> {
        self.cells
            .iter()
            .filter_map(|cell| *cell.lock().unwrap_or_else(PoisonError::into_inner))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.particles().len()
    }

    pub fn count_by_kind(&self) -> HashMap<ParticleKind, usize> {
        let mut counts = HashMap::new();
        for p in self.particles() {
            *counts.entry(p.kind).or_insert(0) += 1;
        }
        counts
    }
}
