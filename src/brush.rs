use crate::color::{Rgb, SAND_PALETTE, WATER_COLOR};
use crate::particle::ParticleKind;
use crate::settings::MagicDust;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How freshly poured sand is coloured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SandColor {
    /// Hue advances by one degree for every grain
    #[default]
    Rainbow,
    /// Index into `SAND_PALETTE`
    Fixed(usize),
}

impl SandColor {
    pub fn name(&self) -> String {
        match self {
            SandColor::Rainbow => "Rainbow".to_string(),
            SandColor::Fixed(i) => format!("#{}", (*i).min(SAND_PALETTE.len() - 1) + 1),
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SandColor::Rainbow => SandColor::Fixed(0),
            SandColor::Fixed(i) if *i >= SAND_PALETTE.len() - 1 => SandColor::Rainbow,
            SandColor::Fixed(i) => SandColor::Fixed(i + 1),
        }
    }

    /// Pull an out-of-range palette index back onto the last colour
    pub fn clamped(self) -> Self {
        match self {
            SandColor::Fixed(i) => SandColor::Fixed(i.min(SAND_PALETTE.len() - 1)),
            SandColor::Rainbow => SandColor::Rainbow,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SandColor::Rainbow => SandColor::Fixed(SAND_PALETTE.len() - 1),
            SandColor::Fixed(0) => SandColor::Rainbow,
            SandColor::Fixed(i) => SandColor::Fixed((*i).min(SAND_PALETTE.len()) - 1),
        }
    }
}

/// What the pointer pours: kind, colour and glue of each spawned particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Brush {
    /// Primary button pours magic dust instead of sand
    pub magic: bool,
    /// Sand and dust poured from now on are glued in place
    pub glue: bool,
    pub sand_color: SandColor,
    #[serde(skip)]
    pub(crate) hue: u32,
}

impl Brush {
    /// Particle for the primary button: sand or magic dust
    pub fn primary<R: Rng + ?Sized>(&mut self, dust: MagicDust, rng: &mut R) -> (ParticleKind, Rgb, bool) {
        if self.magic {
            let color = dust.palette().choose(rng).copied().unwrap_or_default();
            (ParticleKind::MagicDust, color, self.glue)
        } else {
            (ParticleKind::Sand, self.next_sand_color(), self.glue)
        }
    }

    /// Particle for the secondary button: water, never glued
    pub fn secondary(&self) -> (ParticleKind, Rgb, bool) {
        (ParticleKind::Water, WATER_COLOR, false)
    }

    fn next_sand_color(&mut self) -> Rgb {
        match self.sand_color {
            SandColor::Rainbow => {
                let color = Rgb::from_hue(self.hue);
                self.hue = (self.hue + 1) % 360;
                color
            }
            SandColor::Fixed(i) => SAND_PALETTE[i.min(SAND_PALETTE.len() - 1)],
        }
    }

    /// Colour the next sand grain would get, without advancing the hue
    pub fn preview(&self) -> Rgb {
        match self.sand_color {
            SandColor::Rainbow => Rgb::from_hue(self.hue),
            SandColor::Fixed(i) => SAND_PALETTE[i.min(SAND_PALETTE.len() - 1)],
        }
    }

    pub fn toggle_magic(&mut self) {
        self.magic = !self.magic;
    }

    pub fn toggle_glue(&mut self) {
        self.glue = !self.glue;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rainbow_advances_hue() {
        let mut brush = Brush::default();
        let mut rng = StdRng::seed_from_u64(0);
        let (_, first, _) = brush.primary(MagicDust::StarDust, &mut rng);
        let (_, second, _) = brush.primary(MagicDust::StarDust, &mut rng);
        assert_eq!(first, Rgb::from_hue(0));
        assert_eq!(second, Rgb::from_hue(1));
        assert_eq!(brush.preview(), Rgb::from_hue(2));
    }

    #[test]
    fn test_fixed_sand_color() {
        let mut brush = Brush {
            sand_color: SandColor::Fixed(3),
            glue: true,
            ..Brush::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let (kind, color, glued) = brush.primary(MagicDust::StarDust, &mut rng);
        assert_eq!(kind, ParticleKind::Sand);
        assert_eq!(color, SAND_PALETTE[3]);
        assert!(glued);
    }

    #[test]
    fn test_magic_dust_from_active_palette() {
        let mut brush = Brush::default();
        brush.toggle_magic();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let (kind, color, _) = brush.primary(MagicDust::RainbowMist, &mut rng);
            assert_eq!(kind, ParticleKind::MagicDust);
            assert!(MagicDust::RainbowMist.palette().contains(&color));
        }
    }

    #[test]
    fn test_water_is_never_glued() {
        let mut brush = Brush::default();
        brush.toggle_glue();
        assert_eq!(brush.secondary(), (ParticleKind::Water, WATER_COLOR, false));
    }

    #[test]
    fn test_sand_color_cycle_wraps() {
        let last = SandColor::Fixed(SAND_PALETTE.len() - 1);
        assert_eq!(last.next(), SandColor::Rainbow);
        assert_eq!(SandColor::Rainbow.prev(), last);
        assert_eq!(SandColor::Fixed(0).prev(), SandColor::Rainbow);
        assert_eq!(SandColor::Rainbow.next(), SandColor::Fixed(0));
    }

    #[test]
    fn test_out_of_range_sand_color() {
        let huge = SandColor::Fixed(usize::MAX);
        assert_eq!(huge.next(), SandColor::Rainbow);
        assert_eq!(huge.prev(), SandColor::Fixed(SAND_PALETTE.len() - 1));
        assert_eq!(huge.clamped(), SandColor::Fixed(SAND_PALETTE.len() - 1));
        assert_eq!(SandColor::Fixed(2).clamped(), SandColor::Fixed(2));
        assert_eq!(SandColor::Rainbow.clamped(), SandColor::Rainbow);
    }
}
