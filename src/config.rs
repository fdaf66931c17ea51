//! Project configuration loaded from `strata.toml`.
//!
//! The project root is the config file's parent directory; `[build]`
//! paths are normalized against it. CLI options override file values.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::{BuildArgs, Cli, Commands};
use crate::log;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),
}

/// Root configuration structure representing strata.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,
}

/// `[build]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Source asset directory.
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Output directory.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Write asset-manifest.json after the build.
    #[serde(default = "default_true")]
    pub manifest: bool,

    /// Clean output before building (CLI only).
    #[serde(skip)]
    pub clean: bool,
}

fn default_source() -> PathBuf {
    PathBuf::from("assets")
}

fn default_output() -> PathBuf {
    PathBuf::from("public")
}

const fn default_true() -> bool {
    true
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
            manifest: true,
            clean: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            build: BuildConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// A missing config file is not an error - defaults apply, rooted at
    /// the current directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let config_path = cwd.join(&cli.config);

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else {
            crate::debug!("config"; "{} not found, using defaults", cli.config.display());
            Self::default()
        };

        config.root = config_path.parent().map_or(cwd, Path::to_path_buf);
        config.config_path = config_path;
        config.normalize_paths();
        config.apply_cli(cli);

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let (config, _) = Self::parse_with_ignored(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {}, ignoring:", path.display());
            for field in &ignored {
                eprintln!("- {field}");
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Resolve relative `[build]` paths against the project root.
    fn normalize_paths(&mut self) {
        if self.build.source.is_relative() {
            self.build.source = self.root.join(&self.build.source);
        }
        if self.build.output.is_relative() {
            self.build.output = self.root.join(&self.build.output);
        }
    }

    /// Apply CLI overrides on top of the file values.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(source) = &cli.source {
            self.build.source = self.root.join(source);
        }
        if let Some(output) = &cli.output {
            self.build.output = self.root.join(output);
        }

        if let Commands::Build { build_args } = &cli.command {
            self.apply_build_args(build_args);
        }
    }

    fn apply_build_args(&mut self, args: &BuildArgs) {
        self.build.clean = args.clean;
        if let Some(manifest) = args.manifest {
            self.build.manifest = manifest;
        }
    }

    /// Get path relative to the project root (for display).
    pub fn root_relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}
