use crate::color::Palette;
use particle_life::ParticleView;
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

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Plot normalized particle positions onto a canvas of Braille characters.
///
/// A cell takes the color of the last particle plotted into it.
pub fn render_to_braille(
    particles: &[ParticleView],
    canvas_width: u16,
    canvas_height: u16,
    palette: &Palette,
) -> Vec<BrailleCell> {
    if canvas_width == 0 || canvas_height == 0 {
        return Vec::new();
    }
    let width = canvas_width as usize;
    let height = canvas_height as usize;

    // Braille effective resolution
    let dots_x = width * 2;
    let dots_y = height * 4;

    let mut patterns = vec![0u8; width * height];
    let mut colors: Vec<Option<usize>> = vec![None; width * height];

    for p in particles {
        let bx = ((p.x * dots_x as f64) as usize).min(dots_x - 1);
        let by = ((p.y * dots_y as f64) as usize).min(dots_y - 1);
        let idx = (by / 4) * width + bx / 2;
        patterns[idx] |= BRAILLE_DOTS[bx % 2][by % 4];
        colors[idx] = Some(p.color);
    }

    patterns
        .iter()
        .zip(&colors)
        .enumerate()
        .filter(|&(_, (&pattern, _))| pattern != 0)
        .map(|(idx, (&pattern, color))| BrailleCell {
            x: (idx % width) as u16,
            y: (idx / width) as u16,
            char: char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' '),
            color: color.map_or(Color::White, |c| palette.color(c)),
        })
        .collect()
}
