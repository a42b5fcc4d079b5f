/// Viewer configuration with defaults matching the stock viewer
use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Vertical exaggeration applied to offsets.
pub const DEFAULT_HEIGHT_SCALE: f32 = 0.1;
/// Hue (in turns) assigned to the lowest value; the highest is always 0 (red).
pub const DEFAULT_HUE_SPAN: f32 = 0.6;
/// How long the help overlay stays up before hiding itself.
pub const DEFAULT_HELP_TIMEOUT: Duration = Duration::from_secs(5);

/// Which text grammar the parser accepts.
///
/// Exactly one grammar is active per parse; inputs written in the other
/// convention are rejected with a dedicated error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridFormat {
    /// Rows of sign-prefixed values: `+0.125 -0.050 +0.010`.
    #[default]
    Signed,
    /// Firmware dumps where each row starts with its index: ` 0 +0.125 -0.050`.
    RowIndexed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub format: GridFormat,
}

/// Surface generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub height_scale: f32,
    pub hue_span: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            height_scale: DEFAULT_HEIGHT_SCALE,
            hue_span: DEFAULT_HUE_SPAN,
            saturation: 1.0,
            lightness: 0.5,
        }
    }
}

/// Everything a session needs, grouped so hosts can pass one JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub parser: ParserConfig,
    pub surface: SurfaceConfig,
    pub help_timeout: Duration,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            surface: SurfaceConfig::default(),
            help_timeout: DEFAULT_HELP_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.parser.format, GridFormat::Signed);
        assert!((config.surface.height_scale - 0.1).abs() < 1e-6);
        assert_eq!(config.help_timeout, Duration::from_secs(5));
    }
}
