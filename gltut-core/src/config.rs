//! Demo configuration.
//!
//! Every field has a default matching the stock demos, so running without a
//! config file gives an 800x600 core 3.2 window and the two sample textures.
//! A JSON file named by `GLTUT_CONFIG` may override any subset of fields.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::blur::BoxBlur;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "GLTUT_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub gl_major: u8,
    pub gl_minor: u8,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "OpenGL".to_string(),
            width: 800,
            height: 600,
            gl_major: 3,
            gl_minor: 2,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Bound to texture unit 0.
    pub primary: PathBuf,
    /// Bound to texture unit 1.
    pub secondary: PathBuf,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            primary: PathBuf::from("../png/sample.png"),
            secondary: PathBuf::from("../png/sample2.png"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub textures: TextureConfig,
    pub blur: BoxBlur,
    /// `log` level filter name, e.g. `"info"` or `"debug"`.
    pub log_level: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            textures: TextureConfig::default(),
            blur: BoxBlur::default(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    Invalid { path: PathBuf, msg: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Json { path, source } => {
                write!(f, "cannot parse config {}: {}", path.display(), source)
            }
            ConfigError::Invalid { path, msg } => {
                write!(f, "invalid config {}: {}", path.display(), msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json { source, .. } => Some(source),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl DemoConfig {
    /// Loads the file named by [`CONFIG_ENV`], or the defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|msg| ConfigError::Invalid {
            path: path.to_path_buf(),
            msg,
        })?;
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            ));
        }
        if (self.window.gl_major, self.window.gl_minor) < (3, 2) {
            return Err(format!(
                "core profile needs OpenGL 3.2 or newer, got {}.{}",
                self.window.gl_major, self.window.gl_minor
            ));
        }
        self.blur.check()?;
        match self.log_level.parse::<log::LevelFilter>() {
            Ok(log::LevelFilter::Off) => {
                return Err("log level `off` would hide fatal errors".to_string());
            }
            Ok(_) => {}
            Err(_) => return Err(format!("unknown log level `{}`", self.log_level)),
        }
        Ok(())
    }

    /// Parsed [`log_level`](Self::log_level), falling back to `Info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_demo() {
        let config = DemoConfig::default();
        assert_eq!(config.window.title, "OpenGL");
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert_eq!((config.window.gl_major, config.window.gl_minor), (3, 2));
        assert_eq!(config.textures.primary, PathBuf::from("../png/sample.png"));
        assert_eq!(config.textures.secondary, PathBuf::from("../png/sample2.png"));
        assert_eq!(config.blur, BoxBlur::default());
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides_fields() {
        let config = DemoConfig::parse(
            r#"{
                "window": { "width": 1024 },
                "textures": { "primary": "assets/a.png" },
                "blur": { "radius": 2 },
                "log_level": "debug"
            }"#,
        )
        .unwrap();

        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.textures.primary, PathBuf::from("assets/a.png"));
        assert_eq!(config.textures.secondary, PathBuf::from("../png/sample2.png"));
        assert_eq!(config.blur.radius, 2);
        assert_eq!(config.blur.step_h, 1.0 / 300.0);
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(DemoConfig::parse("{}").unwrap(), DemoConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = DemoConfig::default();
        config.window.height = 0;
        assert!(config.validate().is_err());

        let mut config = DemoConfig::default();
        config.window.gl_minor = 1;
        assert!(config.validate().is_err());

        let mut config = DemoConfig::default();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_huge_blur_radius() {
        let config = DemoConfig::parse(r#"{"blur":{"radius":40000}}"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("40000"));
    }

    #[test]
    fn test_validation_rejects_silenced_logging() {
        let config = DemoConfig::parse(r#"{"log_level":"off"}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DemoConfig::load(Path::new("/nonexistent/gltut.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/gltut.json"));
    }
}
