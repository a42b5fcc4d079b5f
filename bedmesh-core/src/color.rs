/// Value-to-color mapping for surface vertices
use crate::config::SurfaceConfig;

/// Linear RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to 0..=255 for terminal or CSS output.
    pub fn to_u8(self) -> (u8, u8, u8) {
        let scale = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (scale(self.r), scale(self.g), scale(self.b))
    }
}

/// Hue (in turns) for a normalized value: `hue_span` at 0, red at 1.
pub fn hue_for(normalized: f64, config: &SurfaceConfig) -> f32 {
    (1.0 - normalized.clamp(0.0, 1.0) as f32) * config.hue_span
}

/// Color for a normalized value in `[0, 1]`.
pub fn value_color(normalized: f64, config: &SurfaceConfig) -> Rgb {
    hsl_to_rgb(hue_for(normalized, config), config.saturation, config.lightness)
}

/// HSL to RGB; hue in turns, saturation and lightness in `[0, 1]`.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb {
    if saturation <= 0.0 {
        return Rgb::new(lightness, lightness, lightness);
    }

    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;

    Rgb::new(
        hue_channel(p, q, hue + 1.0 / 3.0),
        hue_channel(p, q, hue),
        hue_channel(p, q, hue - 1.0 / 3.0),
    )
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-4 && (a.g - b.g).abs() < 1e-4 && (a.b - b.b).abs() < 1e-4
    }

    #[test]
    fn test_primary_hues() {
        assert!(close(hsl_to_rgb(0.0, 1.0, 0.5), Rgb::new(1.0, 0.0, 0.0)));
        assert!(close(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), Rgb::new(0.0, 1.0, 0.0)));
        assert!(close(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), Rgb::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_ends_of_scale() {
        let config = SurfaceConfig::default();
        // Max is red, min is blue-ish (hue 0.6).
        assert!(close(value_color(1.0, &config), Rgb::new(1.0, 0.0, 0.0)));
        let low = value_color(0.0, &config);
        assert!(low.b > 0.99 && low.r < 0.01);
        assert!((hue_for(0.0, &config) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_hue_decreases_with_value() {
        let config = SurfaceConfig::default();
        let hues: Vec<f32> = (0..=10).map(|i| hue_for(i as f64 / 10.0, &config)).collect();
        assert!(hues.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_to_u8() {
        assert_eq!(Rgb::new(1.0, 0.5, 0.0).to_u8(), (255, 128, 0));
    }
}
