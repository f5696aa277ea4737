//! Shared configuration loader for the marksmith toolchain.
//!
//! `defaults/marksmith.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`MarksmithConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use marksmith_core::RendererOptions;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/marksmith.default.toml");

/// File name picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "marksmith.toml";

/// Top-level configuration consumed by marksmith applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MarksmithConfig {
    pub render: RenderConfig,
    pub convert: ConvertConfig,
    pub inspect: InspectConfig,
}

/// Mirrors the renderer's construction options.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub highlight: bool,
    pub load_additional_languages: bool,
    pub external_links_new_tab: bool,
    pub lazy_images: bool,
    #[serde(default)]
    pub syntax_dir: Option<PathBuf>,
    #[serde(default)]
    pub file_types: BTreeMap<String, String>,
}

impl From<&RenderConfig> for RendererOptions {
    fn from(config: &RenderConfig) -> Self {
        RendererOptions {
            highlight: config.highlight,
            load_additional_languages: config.load_additional_languages,
            dynamic_file_types: config.file_types.clone(),
            syntax_dir: config.syntax_dir.clone(),
            external_links_new_tab: config.external_links_new_tab,
            lazy_images: config.lazy_images,
        }
    }
}

impl From<RenderConfig> for RendererOptions {
    fn from(config: RenderConfig) -> Self {
        RendererOptions::from(&config)
    }
}

/// Output knobs for the convert command.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub standalone: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub custom_css: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub default_transform: String,
    pub pretty_json: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MarksmithConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MarksmithConfig, ConfigError> {
    Loader::new().build()
}
