use crate::color::{ColorAccumulator, Rgb};
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

pub const DOTS_PER_CHAR_X: usize = 2;
pub const DOTS_PER_CHAR_Y: usize = 4;

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy, Debug)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Render a grid snapshot to Braille characters.
///
/// Each grid cell covers `cell_size x cell_size` dots. A character lights
/// every dot that falls on an occupied cell and takes the average colour of
/// those dots.
pub fn render_to_braille(
    snapshot: &[(usize, usize, Rgb)],
    cols: usize,
    rows: usize,
    cell_size: u16,
    canvas_width: u16,
    canvas_height: u16,
) -> Vec<BrailleCell> {
    let cell = cell_size.max(1) as usize;

    // Dense lookup so each dot is a single index
    let mut colors: Vec<Option<Rgb>> = vec![None; cols * rows];
    for &(x, y, color) in snapshot {
        if x < cols && y < rows {
            colors[y * cols + x] = Some(color);
        }
    }

    let mut cells = Vec::new();

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            let mut blend = ColorAccumulator::default();

            let base_dx = cx as usize * DOTS_PER_CHAR_X;
            let base_dy = cy as usize * DOTS_PER_CHAR_Y;

            for dx in 0..DOTS_PER_CHAR_X {
                for dy in 0..DOTS_PER_CHAR_Y {
                    let gx = (base_dx + dx) / cell;
                    let gy = (base_dy + dy) / cell;
                    if gx >= cols || gy >= rows {
                        continue;
                    }
                    if let Some(color) = colors[gy * cols + gx] {
                        pattern |= BRAILLE_DOTS[dx][dy];
                        blend.add(color);
                    }
                }
            }

            // Only emit cells that have at least one dot
            if let Some(avg) = blend.average() {
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                    color: avg.into(),
                });
            }
        }
    }

    cells
}

/// Drawable area in dots for a canvas of `canvas_width x canvas_height` characters
pub fn viewport_dots(canvas_width: u16, canvas_height: u16) -> (usize, usize) {
    (
        canvas_width as usize * DOTS_PER_CHAR_X,
        canvas_height as usize * DOTS_PER_CHAR_Y,
    )
}

/// Grid cells lying under the Braille character at canvas position (cx, cy)
pub fn cells_under_char(cx: u16, cy: u16, cell_size: u16) -> Vec<(i64, i64)> {
    let cell = cell_size.max(1) as usize;
    let x0 = cx as usize * DOTS_PER_CHAR_X / cell;
    let x1 = (cx as usize * DOTS_PER_CHAR_X + DOTS_PER_CHAR_X - 1) / cell;
    let y0 = cy as usize * DOTS_PER_CHAR_Y / cell;
    let y1 = (cy as usize * DOTS_PER_CHAR_Y + DOTS_PER_CHAR_Y - 1) / cell;

    let mut out = Vec::new();
    // Bottom rows first, so a column poured in one event settles in order
    for y in (y0..=y1).rev() {
        for x in x0..=x1 {
            out.push((x as i64, y as i64));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braille_pattern() {
        // Test that single dot patterns work correctly
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        // All dots should give 0xFF
        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn test_single_particle_lights_one_dot() {
        let red = Rgb::new(255, 0, 0);
        let cells = render_to_braille(&[(1, 3, red)], 4, 8, 1, 2, 2);

        assert_eq!(cells.len(), 1);
        assert_eq!((cells[0].x, cells[0].y), (0, 0));
        assert_eq!(cells[0].char, '\u{2880}'); // right column, bottom row
        assert_eq!(cells[0].color, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn test_colors_are_averaged() {
        let snapshot = [(0, 0, Rgb::new(200, 0, 0)), (1, 0, Rgb::new(0, 0, 100))];
        let cells = render_to_braille(&snapshot, 2, 4, 1, 1, 1);

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].char, '\u{2809}');
        assert_eq!(cells[0].color, Color::Rgb(100, 0, 50));
    }

    #[test]
    fn test_large_cells_fill_whole_characters() {
        let snapshot = [(0, 0, Rgb::new(10, 20, 30))];
        let cells = render_to_braille(&snapshot, 1, 1, 4, 3, 3);

        // A 4x4-dot cell spans two characters across and one down
        assert_eq!(cells.len(), 2);
        assert!(cells.iter().all(|c| c.char == '\u{28FF}'));
    }

    #[test]
    fn test_cells_under_char() {
        assert_eq!(
            cells_under_char(1, 0, 1),
            vec![(2, 3), (3, 3), (2, 2), (3, 2), (2, 1), (3, 1), (2, 0), (3, 0)]
        );
        assert_eq!(cells_under_char(3, 2, 4), vec![(1, 2)]);
        assert_eq!(cells_under_char(0, 0, 3), vec![(0, 1), (0, 0)]);
        assert_eq!(cells_under_char(0, 0, 10), vec![(0, 0)]);
    }

    #[test]
    fn test_viewport_dots() {
        assert_eq!(viewport_dots(80, 24), (160, 96));
    }
}
