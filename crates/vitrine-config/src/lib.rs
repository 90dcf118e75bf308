//! Configuration for the vitrine showcase.
//!
//! The configuration lives in `config.toml` inside the platform config
//! directory. Every field has a default, so a partial file (or none at all)
//! is valid.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vitrine_core::{BranchSettings, RevealPolicy, TrailSettings};

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// One section of the showcase page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Draw the branch field behind this section.
    #[serde(default)]
    pub hero: bool,
}

impl SectionConfig {
    fn new(id: &str, title: &str, body: &str, hero: bool) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            hero,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target frames per second.
    pub fps: u32,
    /// Log level name (`off`, `error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
    pub trail: TrailSettings,
    pub branches: BranchSettings,
    pub reveal: RevealPolicy,
    pub sections: Vec<SectionConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 30,
            log_level: "info".to_string(),
            trail: TrailSettings::default(),
            branches: BranchSettings::default(),
            reveal: RevealPolicy::default(),
            sections: default_sections(),
        }
    }
}

fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new(
            "hero",
            "Studio Vitrine",
            "Interfaces that feel alive. Scroll to explore.",
            true,
        ),
        SectionConfig::new(
            "about",
            "About",
            "We design and build small, fast, carefully animated products. \
             Every pixel earns its place and every animation has a budget.",
            false,
        ),
        SectionConfig::new(
            "work",
            "Selected work",
            "Realtime dashboards, storefronts and launch pages for teams who \
             care about the details. Motion is used to guide, never to distract.",
            false,
        ),
        SectionConfig::new(
            "contact",
            "Contact",
            "Say hello at hello@vitrine.example and tell us what you are building.",
            false,
        ),
    ]
}

impl Config {
    /// Path of the configuration file, if a home directory can be resolved.
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "vitrine").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load the configuration from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load the configuration from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the effects cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".into()));
        }
        if self.trail.capacity == 0 || self.trail.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "trail capacity and batch_size must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.trail.smoothing) {
            return Err(ConfigError::Invalid(format!(
                "trail smoothing {} is outside 0..=1",
                self.trail.smoothing
            )));
        }
        if !(self.reveal.threshold > 0.0 && self.reveal.threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "reveal threshold {} is outside (0, 1]",
                self.reveal.threshold
            )));
        }
        if let Some(id) = duplicate_id(&self.sections) {
            return Err(ConfigError::Invalid(format!("duplicate section id `{id}`")));
        }
        Ok(())
    }

    /// Time budget of one frame.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// Parsed log level, falling back to `Info` for unknown names.
    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

fn duplicate_id(sections: &[SectionConfig]) -> Option<&str> {
    sections.iter().enumerate().find_map(|(i, section)| {
        sections[..i]
            .iter()
            .any(|earlier| earlier.id == section.id)
            .then_some(section.id.as_str())
    })
}
