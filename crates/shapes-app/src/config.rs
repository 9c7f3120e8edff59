//! `shapes.toml`: window and canvas sizes, scheduler limits, log filter and
//! an optional startup script. Every key is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use shapes_lang::SchedulerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("invalid config {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub window: WindowConfig,
    pub canvas: CanvasConfig,
    pub scheduler: SchedulerSection,
    pub log: LogConfig,
    pub startup: StartupConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self { Self { width: 1200.0, height: 800.0 } }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
    /// Colour name or `#rrggbb`.
    pub background: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0, background: "white".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerSection {
    pub max_catch_up: u32,
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self { max_catch_up: SchedulerConfig::default().max_catch_up }
    }
}

impl From<&SchedulerSection> for SchedulerConfig {
    fn from(s: &SchedulerSection) -> Self { SchedulerConfig { max_catch_up: s.max_catch_up } }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directives.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self { Self { filter: "info".into() } }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StartupConfig {
    /// Command script run once the window is up. Relative paths are taken
    /// from the config file's directory.
    pub script: Option<PathBuf>,
}

impl Config {
    pub fn from_toml(source: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(source)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        if let (Some(script), Some(dir)) = (&config.startup.script, path.parent()) {
            if script.is_relative() {
                config.startup.script = Some(dir.join(script));
            }
        }
        Ok(config)
    }

    /// Read `path`. A missing file gives the defaults when `required` is
    /// false; any other failure is an error.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_toml(&source, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io { path: path.to_path_buf(), source }),
        }
    }
}
