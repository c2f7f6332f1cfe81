//! Render settings from a config file and `TERR__*` environment variables.
//!
//! ```rust
//! use terr_core::MissingPolicy;
//! use terr_core::config::ConfigLoader;
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("errors.toml");
//! std::fs::write(&path, "strict = false\nmissing_marker = \"<unset>\"\n")?;
//!
//! // Environment variables win over the file.
//! let options = ConfigLoader::new()
//!     .file(&path)
//!     .env([("TERR__MISSING_MARKER", "<?>")])
//!     .load_options()?;
//! assert_eq!(options.missing(), &MissingPolicy::Marker("<?>".into()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::options::{DEFAULT_MISSING_MARKER, RenderOptions};
use config::{Config, Environment, File, Map};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Looked up in the working directory (`terr.toml`, `terr.json`, ...) when no file is given.
const DEFAULT_CONFIG_NAME: &str = "terr";
const ENV_PREFIX: &str = "TERR";

/// Custom error type for config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Attaches a human-readable context to config failures.
pub trait ConfigErrorExt<T> {
    /// # Errors
    /// Propagates the underlying error with `context` attached.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConfigError>;
}

impl<T> ConfigErrorExt<T> for Result<T, ConfigError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                ConfigError::Config { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> ConfigErrorExt<T> for Result<T, config::ConfigError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConfigError> {
        self.map_err(|source| ConfigError::Config { source, context: Some(context.into()) })
    }
}

impl From<config::ConfigError> for ConfigError {
    #[inline]
    fn from(source: config::ConfigError) -> Self {
        Self::Config { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}

/// Render settings as they appear in a config file.
///
/// ```toml
/// strict = false
/// missing_marker = "<unset>"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Fail on missing values (`true`) or fill them with `missing_marker`.
    pub strict: bool,
    pub missing_marker: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { strict: true, missing_marker: DEFAULT_MISSING_MARKER.to_owned() }
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        if config.strict {
            Self::strict()
        } else {
            Self::with_marker(config.missing_marker.clone())
        }
    }
}

impl From<RenderConfig> for RenderOptions {
    fn from(config: RenderConfig) -> Self {
        if config.strict { Self::strict() } else { Self::with_marker(config.missing_marker) }
    }
}

/// Builds a [`RenderConfig`] from up to two layers, lowest first:
///
/// 1. **File**: the path given to [`ConfigLoader::file`], which must exist.
///    Without one, a `terr.*` file in the working directory is read if present.
/// 2. **Environment**: `TERR__STRICT` and `TERR__MISSING_MARKER`, read from the
///    process environment or from the pairs given to [`ConfigLoader::env`].
///
/// Settings missing from every layer keep their [`RenderConfig::default`] value.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env: Option<Map<String, String>>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads settings from `path`; loading fails if it does not exist.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Reads `TERR__*` overrides from `vars` instead of the process environment.
    #[must_use]
    pub fn env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// # Errors
    /// Returns a [`ConfigError`] if the given file is missing, a layer cannot
    /// be parsed, or a setting has the wrong type.
    pub fn load(&self) -> Result<RenderConfig, ConfigError> {
        let file = self.file.as_deref().map_or_else(
            || File::with_name(DEFAULT_CONFIG_NAME).required(false),
            |path| File::from(path).required(true),
        );
        let env = Environment::with_prefix(ENV_PREFIX).separator("__").source(self.env.clone());

        info!(
            file = ?self.file,
            env = if self.env.is_some() { "explicit" } else { "process" },
            "Loading render config"
        );

        Config::builder()
            .add_source(file)
            .add_source(env)
            .build()
            .context("Failed to build config")?
            .try_deserialize::<RenderConfig>()
            .context("Failed to deserialize config")
    }

    /// Loads the settings and converts them into [`RenderOptions`].
    ///
    /// # Errors
    /// See [`ConfigLoader::load`].
    pub fn load_options(&self) -> Result<RenderOptions, ConfigError> {
        self.load().map(RenderOptions::from)
    }
}
