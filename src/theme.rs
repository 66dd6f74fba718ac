use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ChartTheme – explicit styling configuration
// ---------------------------------------------------------------------------

/// Styling shared by the dashboard and the batch renderer: the categorical
/// series palette plus the diverging endpoints of the correlation colormap.
/// Always passed explicitly to the renderers; there is no process-wide
/// styling state. The batch binary can override it from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartTheme {
    pub series_colors: Vec<[u8; 3]>,
    pub background: [u8; 3],
    /// Diverging correlation colormap: r = −1 → `negative`, 0 → `midpoint`,
    /// +1 → `positive`.
    pub negative: [u8; 3],
    pub midpoint: [u8; 3],
    pub positive: [u8; 3],
}

impl Default for ChartTheme {
    fn default() -> Self {
        ChartTheme {
            series_colors: vec![
                [0x3b, 0x82, 0xf6], // blue
                [0x22, 0xc5, 0x5e], // green
                [0xf9, 0x73, 0x16], // orange
                [0xef, 0x44, 0x44], // red
                [0x8b, 0x5c, 0xf6], // purple
                [0x06, 0xb6, 0xd4], // cyan
                [0x14, 0xb8, 0xa6], // teal
                [0xf5, 0x9e, 0x0b], // amber
            ],
            background: [0xff, 0xff, 0xff],
            negative: [0xd7, 0x30, 0x27],
            midpoint: [0xff, 0xff, 0xff],
            positive: [0x45, 0x75, 0xb4],
        }
    }
}

impl ChartTheme {
    /// Load a theme override from a JSON file; absent fields keep defaults.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading theme file {}", path.display()))?;
        serde_json::from_str(&text).context("parsing theme JSON")
    }

    /// Categorical series colour, cycling past the end of the palette.
    pub fn series(&self, index: usize) -> Color32 {
        if self.series_colors.is_empty() {
            return Color32::LIGHT_BLUE;
        }
        let [r, g, b] = self.series_colors[index % self.series_colors.len()];
        Color32::from_rgb(r, g, b)
    }

    pub fn series_rgb(&self, index: usize) -> [u8; 3] {
        if self.series_colors.is_empty() {
            return [100, 149, 237];
        }
        self.series_colors[index % self.series_colors.len()]
    }

    /// Diverging colour for a correlation coefficient in [−1, 1]; `NaN`
    /// renders as neutral gray.
    pub fn correlation_color(&self, r: f64) -> Color32 {
        if r.is_nan() {
            return Color32::GRAY;
        }
        let r = r.clamp(-1.0, 1.0);
        if r < 0.0 {
            lerp_rgb(self.midpoint, self.negative, -r as f32)
        } else {
            lerp_rgb(self.midpoint, self.positive, r as f32)
        }
    }
}

fn lerp_rgb(from: [u8; 3], to: [u8; 3], t: f32) -> Color32 {
    let a = Srgb::new(
        from[0] as f32 / 255.0,
        from[1] as f32 / 255.0,
        from[2] as f32 / 255.0,
    )
    .into_linear();
    let b = Srgb::new(
        to[0] as f32 / 255.0,
        to[1] as f32 / 255.0,
        to[2] as f32 / 255.0,
    )
    .into_linear();
    let mixed: Srgb = Srgb::from_linear(a.mix(b, t.clamp(0.0, 1.0)));
    Color32::from_rgb(
        (mixed.red * 255.0).round() as u8,
        (mixed.green * 255.0).round() as u8,
        (mixed.blue * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Generated palettes – for categories beyond the fixed series colours
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn distinct_colors(n: usize) -> Vec<Color32> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_colormap_hits_its_endpoints() {
        let theme = ChartTheme::default();
        assert_eq!(theme.correlation_color(0.0), Color32::WHITE);
        let strong_negative = theme.correlation_color(-1.0);
        let strong_positive = theme.correlation_color(1.0);
        assert_eq!(
            strong_negative,
            Color32::from_rgb(0xd7, 0x30, 0x27)
        );
        assert_eq!(
            strong_positive,
            Color32::from_rgb(0x45, 0x75, 0xb4)
        );
        assert_eq!(theme.correlation_color(f64::NAN), Color32::GRAY);
    }

    #[test]
    fn series_colors_cycle() {
        let theme = ChartTheme::default();
        let n = theme.series_colors.len();
        assert_eq!(theme.series(0), theme.series(n));
    }

    #[test]
    fn distinct_colors_are_distinct() {
        let colors = distinct_colors(6);
        assert_eq!(colors.len(), 6);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
