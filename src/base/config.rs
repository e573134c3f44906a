//! Adapter configuration.

use serde::Deserialize;

/// Width used by `windows.create` when the caller leaves it out.
pub const DEFAULT_WINDOW_WIDTH: u32 = 800;
/// Height used by `windows.create` when the caller leaves it out.
pub const DEFAULT_WINDOW_HEIGHT: u32 = 600;

/// Configuration shared by the API adapters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShimConfig {
    /// Width of windows created without an explicit width.
    pub default_window_width: u32,
    /// Height of windows created without an explicit height.
    pub default_window_height: u32,
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            default_window_width: DEFAULT_WINDOW_WIDTH,
            default_window_height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

impl ShimConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default window width.
    pub fn default_window_width(mut self, width: u32) -> Self {
        self.default_window_width = width;
        self
    }

    /// Set the default window height.
    pub fn default_window_height(mut self, height: u32) -> Self {
        self.default_window_height = height;
        self
    }

    /// Parse a config from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_platform() {
        let config = ShimConfig::default();
        assert_eq!(config.default_window_width, 800);
        assert_eq!(config.default_window_height, 600);
    }

    #[test]
    fn test_from_json_partial() {
        let config = ShimConfig::from_json(r#"{"defaultWindowHeight": 480}"#).unwrap();
        assert_eq!(config.default_window_width, 800);
        assert_eq!(config.default_window_height, 480);
    }

    #[test]
    fn test_builder_setters() {
        let config = ShimConfig::new()
            .default_window_width(1024)
            .default_window_height(768);
        assert_eq!(config.default_window_width, 1024);
        assert_eq!(config.default_window_height, 768);
    }
}
