use crate::color::{Rgb, FAIRY_SPARKLES, RAINBOW_MIST, STAR_DUST};
use serde::{Deserialize, Serialize};

pub const GRAVITY_RANGE: (f32, f32) = (-10.0, 10.0);
pub const WIND_RANGE: (f32, f32) = (0.0, 10.0);
pub const CELL_SIZE_RANGE: (u16, u16) = (1, 10);

/// Magic dust palette - the colours a mote cycles through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MagicDust {
    /// Gold and pastel sparkle
    #[default]
    StarDust,
    /// Purples and pinks
    FairySparkles,
    /// Vibrant neon
    RainbowMist,
}

impl MagicDust {
    pub fn name(&self) -> &str {
        match self {
            MagicDust::StarDust => "Star Dust",
            MagicDust::FairySparkles => "Fairy Sparkles",
            MagicDust::RainbowMist => "Rainbow Mist",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            MagicDust::StarDust => MagicDust::FairySparkles,
            MagicDust::FairySparkles => MagicDust::RainbowMist,
            MagicDust::RainbowMist => MagicDust::StarDust,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            MagicDust::StarDust => MagicDust::RainbowMist,
            MagicDust::FairySparkles => MagicDust::StarDust,
            MagicDust::RainbowMist => MagicDust::FairySparkles,
        }
    }

    pub fn palette(&self) -> &'static [Rgb] {
        match self {
            MagicDust::StarDust => &STAR_DUST,
            MagicDust::FairySparkles => &FAIRY_SPARKLES,
            MagicDust::RainbowMist => &RAINBOW_MIST,
        }
    }
}

/// Physical constants read by every resolver invocation during a tick.
///
/// Only written between ticks; the tick itself sees `&SimParams`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// Signed: positive pulls toward the bottom row, negative toward the top (-10 to 10)
    pub gravity: f32,
    /// Lateral gust strength, truncated to whole columns (0 to 10)
    pub wind: f32,
    /// Braille dots per grid cell edge (1 to 10)
    pub cell_size: u16,
    /// Palette magic dust re-colours from
    pub dust: MagicDust,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            wind: 0.0,
            cell_size: 1,
            dust: MagicDust::default(),
        }
    }
}

impl SimParams {
    /// Clamp every field into its valid range
    pub fn clamped(self) -> Self {
        Self {
            gravity: self.gravity.clamp(GRAVITY_RANGE.0, GRAVITY_RANGE.1),
            wind: self.wind.clamp(WIND_RANGE.0, WIND_RANGE.1),
            cell_size: self.cell_size.clamp(CELL_SIZE_RANGE.0, CELL_SIZE_RANGE.1),
            dust: self.dust,
        }
    }

    /// Vertical step for one tick: +1, -1, or 0 when weightless.
    /// A zero step makes the particle its own blocker, so it only slides.
    pub fn fall_direction(&self) -> i64 {
        if self.gravity > 0.0 {
            1
        } else if self.gravity < 0.0 {
            -1
        } else {
            0
        }
    }

    /// Whole-column wind offset magnitude
    pub fn wind_columns(&self) -> i64 {
        self.wind as i64
    }

    pub fn adjust_gravity(&mut self, delta: f32) {
        self.gravity = (self.gravity + delta).clamp(GRAVITY_RANGE.0, GRAVITY_RANGE.1);
    }

    pub fn adjust_wind(&mut self, delta: f32) {
        self.wind = (self.wind + delta).clamp(WIND_RANGE.0, WIND_RANGE.1);
    }

    /// Returns the new cell size; the caller is responsible for resizing the grid
    pub fn adjusted_cell_size(&self, delta: i32) -> u16 {
        (self.cell_size as i32 + delta).clamp(CELL_SIZE_RANGE.0 as i32, CELL_SIZE_RANGE.1 as i32)
            as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fall_direction_follows_gravity_sign() {
        let mut params = SimParams::default();
        assert_eq!(params.fall_direction(), 1);
        params.gravity = -3.5;
        assert_eq!(params.fall_direction(), -1);
        params.gravity = 0.0;
        assert_eq!(params.fall_direction(), 0);
    }

    #[test]
    fn test_adjust_clamps() {
        let mut params = SimParams::default();
        params.adjust_gravity(100.0);
        assert_eq!(params.gravity, 10.0);
        params.adjust_wind(-5.0);
        assert_eq!(params.wind, 0.0);
        assert_eq!(params.adjusted_cell_size(-4), 1);
        assert_eq!(params.adjusted_cell_size(50), 10);
    }

    #[test]
    fn test_wind_truncates() {
        let params = SimParams {
            wind: 2.9,
            ..SimParams::default()
        };
        assert_eq!(params.wind_columns(), 2);
    }

    #[test]
    fn test_clamped() {
        let params = SimParams {
            gravity: -40.0,
            wind: 12.0,
            cell_size: 0,
            dust: MagicDust::RainbowMist,
        }
        .clamped();
        assert_eq!(params.gravity, -10.0);
        assert_eq!(params.wind, 10.0);
        assert_eq!(params.cell_size, 1);
        assert_eq!(params.dust, MagicDust::RainbowMist);
    }

    #[test]
    fn test_dust_cycle() {
        let dust = MagicDust::StarDust;
        assert_eq!(dust.next().next().next(), dust);
        assert_eq!(dust.prev(), MagicDust::RainbowMist);
        assert_eq!(dust.palette().len(), 3);
    }

    #[test]
    fn test_dust_palettes_are_distinct() {
        assert_eq!(MagicDust::StarDust.palette()[0], Rgb::new(255, 215, 0));
        assert_eq!(MagicDust::FairySparkles.palette(), &FAIRY_SPARKLES);
        assert_eq!(MagicDust::RainbowMist.palette(), &RAINBOW_MIST);
        assert_ne!(MagicDust::StarDust.palette(), MagicDust::RainbowMist.palette());
    }
}
