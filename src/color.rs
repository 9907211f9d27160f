use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
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
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the labels of a category breakdown to distinct colours so the bar
/// chart and its legend stay in sync.
#[derive(Debug, Clone, Default)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
}

impl CategoryColors {
    /// Build a colour map for the breakdown's labels in display order.
    pub fn new<'a>(labels: impl Iterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.collect();
        let palette = generate_palette(labels.len());
        CategoryColors {
            mapping: labels
                .into_iter()
                .zip(palette)
                .map(|(label, color)| (label.to_string(), color))
                .collect(),
        }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Diverging colormap for the correlation grid
// ---------------------------------------------------------------------------

/// Map a Pearson coefficient in [-1, 1] onto a blue → white → red ramp.
/// NaN (undefined correlation) renders as gray.
pub fn correlation_color(r: f64) -> Color32 {
    if r.is_nan() {
        return Color32::GRAY;
    }
    let r = r.clamp(-1.0, 1.0) as f32;

    let blue = LinSrgb::new(0.13f32, 0.30, 0.75);
    let white = LinSrgb::new(0.92f32, 0.92, 0.92);
    let red = LinSrgb::new(0.80f32, 0.15, 0.15);

    let mixed = if r < 0.0 {
        white.mix(blue, -r)
    } else {
        white.mix(red, r)
    };
    let srgb: Srgb = Srgb::from_linear(mixed);
    Color32::from_rgb(
        (srgb.red * 255.0) as u8,
        (srgb.green * 255.0) as u8,
        (srgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colors() {
        let palette = generate_palette(11);
        assert_eq!(palette.len(), 11);
        assert_ne!(palette[0], palette[5]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn category_colors_are_stable_per_label() {
        let colors = CategoryColors::new(["West", "East", "Others"].into_iter());
        assert_eq!(colors.color_for("West"), colors.color_for("West"));
        assert_eq!(colors.color_for("unknown"), Color32::GRAY);
    }

    #[test]
    fn correlation_ramp_endpoints() {
        assert_eq!(correlation_color(f64::NAN), Color32::GRAY);
        let negative = correlation_color(-1.0);
        let positive = correlation_color(1.0);
        assert!(negative.b() > negative.r());
        assert!(positive.r() > positive.b());
    }
}
