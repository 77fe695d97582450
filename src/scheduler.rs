use crate::error::SimError;
use crate::grid::Grid;
use crate::resolver::resolve;
use crate::settings::SimParams;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::ops::Range;

pub const DEFAULT_WORKERS: usize = 4;
pub const MAX_WORKERS: usize = 64;

/// Split `[0, cols)` into `workers` contiguous, disjoint column bands.
/// Every band but the last is `cols / workers` wide; the last one takes the
/// remainder so no column is ever left out of a tick.
pub fn partition(cols: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let width = cols / workers;
    (0..workers)
        .map(|i| {
            let start = i * width;
            let end = if i + 1 == workers { cols } else { start + width };
            start..end
        })
        .collect()
}

/// Per-band RNG seed, distinct for every (tick, band) pair
fn band_seed(seed: u64, tick: u64, band: usize) -> u64 {
    seed.wrapping_add(tick.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add(band as u64)
}

/// Runs the movement resolver over the grid, one column band per worker.
///
/// Workers only ever write through `Grid::try_move` and per-cell updates, so
/// a grain crossing into a neighbouring band races with that band's worker at
/// worst for one cell, and the cell lock decides who wins.
pub struct TickScheduler {
    pool: ThreadPool,
    workers: usize,
}

impl TickScheduler {
    pub fn new(workers: usize) -> Result<Self, SimError> {
        let workers = workers.clamp(1, MAX_WORKERS);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("band-worker-{}", i))
            .build()?;
        log::info!("tick scheduler started with {} band workers", workers);
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// One full pass: fork a task per band, return once every band is done.
    ///
    /// Within a band columns go left to right and each column bottom to top.
    pub fn run_tick(&self, grid: &Grid, params: &SimParams, tick: u64, seed: u64) {
        let rows = grid.rows();
        let bands = partition(grid.cols(), self.workers);

        self.pool.scope(|scope| {
            for (band, columns) in bands.into_iter().enumerate() {
                if columns.is_empty() {
                    continue;
                }
                scope.spawn(move |_| {
                    let mut rng = StdRng::seed_from_u64(band_seed(seed, tick, band));
                    for x in columns {
                        for y in (0..rows).rev() {
                            resolve(grid, x, y, params, tick, &mut rng);
                        }
                    }
                });
            }
        });
    }
}
