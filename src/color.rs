use ratatui::style::Color;

/// Fully saturated color at the given hue (degrees), lightness 50%
fn hue_to_rgb(hue: f32) -> Color {
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    Color::Rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

/// One color per particle class, evenly spaced around the hue wheel
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(color_count: usize) -> Self {
        let k = color_count.max(1) as f32;
        let colors = (0..color_count)
            .map(|i| hue_to_rgb(360.0 * i as f32 / k))
            .collect();
        Self { colors }
    }

    pub fn color(&self, index: usize) -> Color {
        self.colors.get(index).copied().unwrap_or(Color::White)
    }
}

/// Ramp for attraction coefficients: white → green for positive, white → red for negative
pub fn value_color(v: f64) -> Color {
    let mag = v.abs().min(1.0);
    let fade = (255.0 - 255.0 * mag) as u8;
    if v >= 0.0 {
        Color::Rgb(fade, 255, fade)
    } else {
        Color::Rgb(255, fade, fade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_primary_hues() {
        let palette = Palette::new(3);
        assert_eq!(palette.color(0), Color::Rgb(255, 0, 0));
        assert_eq!(palette.color(1), Color::Rgb(0, 255, 0));
        assert_eq!(palette.color(2), Color::Rgb(0, 0, 255));
        assert_eq!(palette.color(9), Color::White);
    }

    #[test]
    fn test_value_color_ramp() {
        assert_eq!(value_color(0.0), Color::Rgb(255, 255, 255));
        assert_eq!(value_color(1.0), Color::Rgb(0, 255, 0));
        assert_eq!(value_color(-1.0), Color::Rgb(255, 0, 0));
        assert_eq!(value_color(-3.0), Color::Rgb(255, 0, 0));
    }
}
