use crate::color::Rgb;
use serde::{Deserialize, Serialize};

/// Ticks between magic dust colour changes
pub const COLOR_CYCLE_TICKS: u32 = 5;

/// Chance per tick that a sand grain or mote is pushed by the wind
pub const WIND_CHANCE: f32 = 0.05;

/// fall_speed of a freshly spawned particle
pub const INITIAL_FALL_SPEED: f32 = 0.5;

/// Gravity-to-acceleration factor applied every tick
pub const GRAVITY_ACCEL: f32 = 0.1;

/// Material of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    Sand,
    Water,
    MagicDust,
}

/// How a particle escapes when the cell it falls into is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockedFlow {
    /// Slide to (x-1, y+dir) or (x+1, y+dir), each gated by a spread roll
    Diagonal,
    /// Flow to (x-1, y) or (x+1, y), always attempted
    Lateral,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 3] = [
        ParticleKind::Sand,
        ParticleKind::Water,
        ParticleKind::MagicDust,
    ];

    pub fn name(&self) -> &str {
        match self {
            ParticleKind::Sand => "Sand",
            ParticleKind::Water => "Water",
            ParticleKind::MagicDust => "Magic Dust",
        }
    }

    /// Probability a blocked particle takes a diagonal step.
    /// Water flows laterally without rolling, so its value is informational.
    pub fn spread_chance(&self) -> f32 {
        match self {
            ParticleKind::Water => 0.2,
            ParticleKind::Sand | ParticleKind::MagicDust => 0.05,
        }
    }

    pub fn blocked_flow(&self) -> BlockedFlow {
        match self {
            ParticleKind::Water => BlockedFlow::Lateral,
            ParticleKind::Sand | ParticleKind::MagicDust => BlockedFlow::Diagonal,
        }
    }

    pub fn wind_affected(&self) -> bool {
        !matches!(self, ParticleKind::Water)
    }

    pub fn cycles_color(&self) -> bool {
        matches!(self, ParticleKind::MagicDust)
    }
}

/// One grain, droplet or mote. Lives in exactly one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: usize,
    pub y: usize,
    pub kind: ParticleKind,
    pub color: Rgb,
    glued: bool,
    /// Accumulated fall velocity, never reset
    pub fall_speed: f32,
    pub color_cycle_counter: u32,
    /// Last tick this particle was resolved in (0 = never)
    pub(crate) last_tick: u64,
}

impl Particle {
    pub fn new(x: usize, y: usize, kind: ParticleKind, color: Rgb, glued: bool) -> Self {
        Self {
            x,
            y,
            kind,
            color,
            glued,
            fall_speed: INITIAL_FALL_SPEED,
            color_cycle_counter: 0,
            last_tick: 0,
        }
    }

    pub fn glued(&self) -> bool {
        self.glued
    }

    /// Advance the colour cycle; returns true when a new colour is due
    pub fn advance_color_cycle(&mut self) -> bool {
        self.color_cycle_counter = self.color_cycle_counter.wrapping_add(1);
        self.color_cycle_counter % COLOR_CYCLE_TICKS == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_table() {
        assert_eq!(ParticleKind::Sand.spread_chance(), 0.05);
        assert_eq!(ParticleKind::Water.spread_chance(), 0.2);
        assert_eq!(ParticleKind::MagicDust.spread_chance(), 0.05);

        assert_eq!(ParticleKind::Water.blocked_flow(), BlockedFlow::Lateral);
        assert_eq!(ParticleKind::Sand.blocked_flow(), BlockedFlow::Diagonal);

        assert!(ParticleKind::Sand.wind_affected());
        assert!(ParticleKind::MagicDust.wind_affected());
        assert!(!ParticleKind::Water.wind_affected());

        assert!(ParticleKind::MagicDust.cycles_color());
        assert!(!ParticleKind::Sand.cycles_color());
    }

    #[test]
    fn test_new_particle_state() {
        let p = Particle::new(3, 4, ParticleKind::Sand, Rgb::new(1, 2, 3), true);
        assert_eq!((p.x, p.y), (3, 4));
        assert!(p.glued());
        assert_eq!(p.fall_speed, INITIAL_FALL_SPEED);
        assert_eq!(p.last_tick, 0);
    }

    #[test]
    fn test_color_cycle_every_fifth_tick() {
        let mut p = Particle::new(0, 0, ParticleKind::MagicDust, Rgb::default(), false);
        let due: Vec<bool> = (0..10).map(|_| p.advance_color_cycle()).collect();
        assert_eq!(
            due,
            vec![false, false, false, false, true, false, false, false, false, true]
        );
    }
}
