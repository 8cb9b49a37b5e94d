use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Colour of regression overlays.
pub const REGRESSION_COLOR: Color32 = Color32::RED;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
///
/// Hues stay out of the red band so data never looks like a regression line.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 40.0 + (i as f32 / n as f32) * 280.0;
            let hsl = Hsl::new(hue, 0.70, 0.50);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Series colours: source index → Color32
// ---------------------------------------------------------------------------

/// Colours keyed by source position so the legend follows input order.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    colors: Vec<Color32>,
}

impl SeriesColors {
    pub fn new(n: usize) -> Self {
        Self {
            colors: generate_palette(n),
        }
    }

    pub fn color_for(&self, index: usize) -> Color32 {
        self.colors.get(index).copied().unwrap_or(Color32::GRAY)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(5).len(), 5);
    }

    #[test]
    fn out_of_range_is_gray() {
        let colors = SeriesColors::new(2);
        assert_ne!(colors.color_for(0), colors.color_for(1));
        assert_eq!(colors.color_for(9), Color32::GRAY);
    }
}
