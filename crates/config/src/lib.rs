//! Configuration for pericope.
//!
//! Settings are layered, later layers winning:
//! 1. Built-in defaults.
//! 2. A config file (TOML, YAML or JSON, chosen by extension). Without an
//!    explicit path, `config.toml` in the platform config directory is used
//!    if it exists.
//! 3. Environment variables prefixed with `PERICOPE_`, nested keys separated
//!    by `__` (e.g. `PERICOPE_SOURCE__BASE_URL`).

pub mod error;

use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

const ENV_PREFIX: &str = "PERICOPE_";
const CONFIG_FILE: &str = "config.toml";
const CACHE_FILE: &str = "passages.db";

/// Translation used when nothing more specific applies.
pub const DEFAULT_TRANSLATION: &str = "NIVUK";
pub const DEFAULT_BASE_URL: &str = "https://www.biblegateway.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Translation for locales with no entry in `locales`.
    pub default_translation: String,
    /// Locale (`en_GB`) or language (`it`) to translation code.
    pub locales: BTreeMap<String, String>,
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub render: RenderConfig,
}
impl Default for Config {
    fn default() -> Self {
        let locales = [
            ("en_US", "NIV"),
            ("en_GB", "NIVUK"),
            ("it", "CEI"),
            ("es", "RVR1960"),
            ("de", "LUTH1545"),
            ("fr", "LSG"),
            ("pt", "ARC"),
        ];
        Self {
            default_translation: DEFAULT_TRANSLATION.to_string(),
            locales: locales.into_iter().map(|(l, t)| (l.to_string(), t.to_string())).collect(),
            source: SourceConfig::default(),
            cache: CacheConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub user_agent: Option<String>,
    /// Transport timeout for one passage request; unset waits as long as the
    /// transport does.
    pub timeout_secs: Option<u64>,
}
impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            timeout_secs: None,
        }
    }
}
impl SourceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// SQLite cache file; defaults to the platform cache directory.
    pub path: Option<PathBuf>,
}
impl CacheConfig {
    pub fn path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| project_dirs().map(|dirs| dirs.cache_dir().join(CACHE_FILE)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Append ` (TRANSLATION)` to citation links.
    pub show_version: bool,
    /// `upon` template for the line following a quoted passage, replacing the
    /// built-in one. Variable: `link`.
    pub attribution: Option<String>,
}
impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_version: true,
            attribution: None,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "pericope", "pericope")
}

impl Config {
    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// The layered configuration sources, without extracting them.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            figment = match file.extension().and_then(|ext| ext.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                    figment.merge(Yaml::file(file))
                },
                Some(ext) if ext.eq_ignore_ascii_case("json") => figment.merge(Json::file(file)),
                _ => figment.merge(Toml::file(file)),
            };
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads and validates the configuration.
    ///
    /// An explicit `file` must exist; the default file is optional.
    #[instrument]
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = match file {
            Some(file) if !file.exists() => exn::bail!(ErrorKind::NotFound(file.to_path_buf())),
            Some(file) => Some(file.to_path_buf()),
            None => Self::default_path().filter(|path| path.exists()),
        };
        tracing::debug!(file = ?file, "Loading configuration");
        let config: Config = Self::figment(file.as_deref()).extract().or_raise(|| ErrorKind::Load)?;
        config.validate()
    }

    pub fn validate(self) -> Result<Self> {
        if self.default_translation.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("default_translation"));
        }
        if self.locales.values().any(|translation| translation.trim().is_empty()) {
            exn::bail!(ErrorKind::Invalid("locales"));
        }
        if self.source.base_url.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("source.base_url"));
        }
        if self.render.attribution.as_deref().is_some_and(|t| t.trim().is_empty()) {
            exn::bail!(ErrorKind::Invalid("render.attribution"));
        }
        if self.source.timeout_secs == Some(0) {
            exn::bail!(ErrorKind::Invalid("source.timeout_secs"));
        }
        Ok(self)
    }

    /// Resolves the translation for a locale such as `en_GB` or `pt-BR`.
    ///
    /// Tries the exact locale, then its language (`en_GB` → `en`), then falls
    /// back to [`default_translation`](Self::default_translation).
    pub fn translation_for(&self, locale: Option<&str>) -> &str {
        let Some(locale) = locale.map(str::trim).filter(|l| !l.is_empty()) else {
            return &self.default_translation;
        };
        let language = locale.split(['_', '-']).next().unwrap_or(locale);
        self.locales
            .get(locale)
            .or_else(|| self.locales.get(&locale.replace('-', "_")))
            .or_else(|| self.locales.get(language))
            .unwrap_or(&self.default_translation)
    }
}
