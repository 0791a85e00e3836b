//! Optional `travels.toml` configuration.
//!
//! Every key has a default, so a missing file or a partial one is fine.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{ensure, Context};
use serde::Deserialize;
use travels_core::Size;

/// File read from the working directory when `--config` is not given.
pub(crate) const DEFAULT_PATH: &str = "travels.toml";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    /// Pixels per map cell.
    pub(crate) tile_size: Size,
    /// Pixels of the drawn frame.
    pub(crate) viewport: Size,
    /// Steps per second of game time.
    pub(crate) refresh_hz: u32,
    /// `tracing` filter used unless `RUST_LOG` is set.
    pub(crate) log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            tile_size: Size::new(8, 8),
            viewport: Size::new(80, 56),
            refresh_hz: 30,
            log_filter: "info".to_owned(),
        }
    }
}

impl CliConfig {
    /// Loads `path`, or [`DEFAULT_PATH`] when it exists.
    ///
    /// An explicitly requested file must exist.
    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_PATH), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config `{}`", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config `{}`", path.display()))
    }

    fn parse(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        ensure!(config.refresh_hz > 0, "refresh_hz must be positive");
        ensure!(
            config.tile_size.area() > 0,
            "tile_size must be at least one pixel"
        );
        Ok(config)
    }

    /// Game time that passes per step.
    pub(crate) fn tick(&self) -> Duration {
        Duration::from_secs(1) / self.refresh_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = CliConfig::parse("refresh_hz = 60\n").expect("valid config");
        assert_eq!(config.refresh_hz, 60);
        assert_eq!(config.tile_size, Size::new(8, 8));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn sizes_are_tables() {
        let config = CliConfig::parse("viewport = { width = 40, height = 24 }\n")
            .expect("valid config");
        assert_eq!(config.viewport, Size::new(40, 24));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(CliConfig::parse("refresh_hz = 0\n").is_err());
        assert!(CliConfig::parse("tile_size = { width = 0, height = 8 }\n").is_err());
        assert!(CliConfig::parse("speed = 3\n").is_err(), "unknown keys");
    }

    #[test]
    fn tick_divides_a_second() {
        let config = CliConfig {
            refresh_hz: 4,
            ..CliConfig::default()
        };
        assert_eq!(config.tick(), Duration::from_millis(250));
    }

    #[test]
    fn explicit_paths_must_exist() {
        let error = CliConfig::load(Some(Path::new("does/not/exist.toml")))
            .expect_err("file is missing");
        assert!(error.to_string().starts_with("failed to read config"));
    }
}
