use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// 24-bit particle colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Fully saturated, full value colour for a hue in degrees (wraps at 360)
    pub fn from_hue(hue: u32) -> Self {
        let h = (hue % 360) as f32 / 60.0;
        let x = 1.0 - (h % 2.0 - 1.0).abs();
        let (r, g, b) = match h as u32 {
            0 => (1.0, x, 0.0),
            1 => (x, 1.0, 0.0),
            2 => (0.0, 1.0, x),
            3 => (0.0, x, 1.0),
            4 => (x, 0.0, 1.0),
            _ => (1.0, 0.0, x),
        };
        Self::new(
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        )
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

pub const WATER_COLOR: Rgb = Rgb::new(64, 164, 223);

/// Fixed sand colours selectable from the brush (reds through violets)
pub const SAND_PALETTE: [Rgb; 30] = [
    // Reds / pinks / magentas
    Rgb::new(255, 0, 50),
    Rgb::new(255, 51, 0),
    Rgb::new(255, 0, 150),
    Rgb::new(255, 40, 200),
    Rgb::new(255, 51, 153),
    Rgb::new(255, 0, 255),
    Rgb::new(255, 20, 255),
    Rgb::new(255, 80, 255),
    // Oranges / golds
    Rgb::new(255, 90, 0),
    Rgb::new(255, 150, 0),
    Rgb::new(255, 153, 51),
    Rgb::new(255, 180, 0),
    Rgb::new(255, 204, 0),
    // Yellows / limes
    Rgb::new(255, 240, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(100, 255, 0),
    Rgb::new(0, 255, 64),
    // Greens / cyans
    Rgb::new(0, 255, 130),
    Rgb::new(0, 255, 180),
    Rgb::new(0, 255, 240),
    Rgb::new(0, 255, 255),
    Rgb::new(0, 240, 255),
    Rgb::new(0, 200, 255),
    // Blues / violets
    Rgb::new(0, 130, 255),
    Rgb::new(0, 102, 255),
    Rgb::new(120, 0, 255),
    Rgb::new(180, 30, 255),
    Rgb::new(240, 0, 255),
    Rgb::new(255, 102, 204),
    Rgb::new(255, 0, 255),
];

/// Magic dust palettes, one per `MagicDust` variant
pub const STAR_DUST: [Rgb; 3] = [
    Rgb::new(255, 215, 0),
    Rgb::new(255, 223, 186),
    Rgb::new(255, 182, 193),
];

pub const FAIRY_SPARKLES: [Rgb; 3] = [
    Rgb::new(75, 0, 130),
    Rgb::new(123, 104, 238),
    Rgb::new(216, 191, 216),
];

pub const RAINBOW_MIST: [Rgb; 3] = [
    Rgb::new(255, 0, 255),
    Rgb::new(0, 255, 255),
    Rgb::new(255, 105, 180),
];

/// Running sum of colours, used to blend every particle under one Braille character
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorAccumulator {
    r: u32,
    g: u32,
    b: u32,
    count: u32,
}

impl ColorAccumulator {
    pub fn add(&mut self, c: Rgb) {
        self.r += c.r as u32;
        self.g += c.g as u32;
        self.b += c.b as u32;
        self.count += 1;
    }

    pub fn average(&self) -> Option<Rgb> {
        if self.count == 0 {
            return None;
        }
        Some(Rgb::new(
            (self.r / self.count) as u8,
            (self.g / self.count) as u8,
            (self.b / self.count) as u8,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(Rgb::from_hue(0), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::from_hue(120), Rgb::new(0, 255, 0));
        assert_eq!(Rgb::from_hue(240), Rgb::new(0, 0, 255));
        assert_eq!(Rgb::from_hue(60), Rgb::new(255, 255, 0));
    }

    #[test]
    fn test_hue_wraps() {
        assert_eq!(Rgb::from_hue(360), Rgb::from_hue(0));
        assert_eq!(Rgb::from_hue(725), Rgb::from_hue(5));
    }

    #[test]
    fn test_accumulator_average() {
        let mut acc = ColorAccumulator::default();
        assert_eq!(acc.average(), None);
        acc.add(Rgb::new(200, 0, 100));
        acc.add(Rgb::new(0, 100, 100));
        assert_eq!(acc.average(), Some(Rgb::new(100, 50, 100)));
    }

    #[test]
    fn test_ratatui_conversion() {
        let c: Color = WATER_COLOR.into();
        assert_eq!(c, Color::Rgb(64, 164, 223));
    }
}
