use crate::grid::Grid;
use crate::particle::{BlockedFlow, ParticleKind, GRAVITY_ACCEL, WIND_CHANCE};
use crate::settings::SimParams;
use rand::seq::SliceRandom;
use rand::Rng;

/// Resolve the particle at (x, y) for one tick.
///
/// Does nothing for empty cells, glued particles, and particles already
/// resolved during `tick` (a particle that moved into a cell the worker has
/// not reached yet keeps its stamp and is skipped there).
pub fn resolve<R: Rng + ?Sized>(
    grid: &Grid,
    x: usize,
    y: usize,
    params: &SimParams,
    tick: u64,
    rng: &mut R,
) {
    let started = grid
        .update(x, y, |p| {
            if p.glued() || p.last_tick == tick {
                return None;
            }
            p.last_tick = tick;
            p.fall_speed += params.gravity * GRAVITY_ACCEL;
            Some((p.kind, p.fall_speed))
        })
        .flatten();
    let Some((kind, fall_speed)) = started else {
        return;
    };

    let (mut x, mut y) = (x, y);

    // fall_speed only decides whether the particle may step at all;
    // the step itself is always a single row.
    let last_row = (grid.rows() - 1) as f32;
    let target_y = (y as f32 + fall_speed).min(last_row);

    if target_y >= 0.0 {
        let direction = params.fall_direction();
        let new_y = y as i64 + direction;

        if grid.in_bounds(x as i64, new_y) {
            if kind.wind_affected() && rng.gen::<f32>() < WIND_CHANCE {
                x = blow(grid, x, y, params, rng);
            }
            (x, y) = fall(grid, x, y, new_y, kind, rng);
        }
    }

    if kind.cycles_color() {
        let palette = params.dust.palette();
        grid.update(x, y, |p| {
            if p.advance_color_cycle() {
                if let Some(color) = palette.choose(rng) {
                    p.color = *color;
                }
            }
        });
    }
}

/// Wind gust: a whole-column hop left or right along the current row
fn blow<R: Rng + ?Sized>(grid: &Grid, x: usize, y: usize, params: &SimParams, rng: &mut R) -> usize {
    let sign = if rng.gen::<bool>() { 1 } else { -1 };
    let offset = sign * params.wind_columns();
    let new_x = x as i64 + offset;
    if offset != 0 && grid.try_move(x, y, new_x, y as i64) {
        new_x as usize
    } else {
        x
    }
}

/// Step toward `new_y`, or escape sideways when that cell is taken.
/// With zero gravity `new_y == y` and the particle blocks itself.
/// Left is always tried before right. Returns the final position.
fn fall<R: Rng + ?Sized>(
    grid: &Grid,
    x: usize,
    y: usize,
    new_y: i64,
    kind: ParticleKind,
    rng: &mut R,
) -> (usize, usize) {
    let (xi, yi) = (x as i64, y as i64);

    if grid.try_move(x, y, xi, new_y) {
        return (x, new_y as usize);
    }

    match kind.blocked_flow() {
        BlockedFlow::Lateral => {
            for dx in [-1, 1] {
                if grid.try_move(x, y, xi + dx, yi) {
                    return ((xi + dx) as usize, y);
                }
            }
        }
        BlockedFlow::Diagonal => {
            let chance = kind.spread_chance();
            for dx in [-1, 1] {
                // Roll only for open cells so the random sequence matches what was tried
                if grid.is_empty(xi + dx, new_y)
                    && rng.gen::<f32>() < chance
                    && grid.try_move(x, y, xi + dx, new_y)
                {
                    return ((xi + dx) as usize, new_y as usize);
                }
            }
        }
    }

    (x, y)
}
