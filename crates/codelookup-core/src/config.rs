//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults, `config.toml`, `config.<env>.toml`
//! and `APP_*` env vars (`__` separates nested keys). Provides helpers to
//! expand `~` and `${VAR}` and to resolve relative paths against the
//! directory the configuration was loaded from.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Score an entry must strictly exceed to be returned.
pub const DEFAULT_THRESHOLD: f64 = 0.12;
/// Hard upper bound on the number of results a single search returns.
pub const MAX_RESULT_LIMIT: usize = 50;
/// No document by default; the embedded fallback list answers diagnosis queries.
pub const DEFAULT_DIAGNOSIS_SOURCE: &str = "";

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    pub fn load_from(base_dir: &Path) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(base_dir, &env_name)
    }

    pub fn load_for_env(base_dir: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file_exact(base_dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file_exact(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file_exact(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file_exact(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base_dir: base_dir.to_path_buf() };
        config.settings()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// Typed view of every section, defaults filled in and ranges checked.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub corpus: CorpusSettings,
    pub search: SearchSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    /// File path or `http(s)://` URL of the diagnosis document. Empty disables it.
    pub diagnosis_source: String,
    pub use_fallback: bool,
    pub request_timeout_secs: u64,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            diagnosis_source: DEFAULT_DIAGNOSIS_SOURCE.to_string(),
            use_fallback: true,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub threshold: f64,
    pub limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD, limit: MAX_RESULT_LIMIT }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.corpus.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig("corpus.request_timeout_secs must be greater than 0".into()));
        }
        if !(0.0..1.0).contains(&self.search.threshold) {
            return Err(Error::InvalidConfig(format!(
                "search.threshold must be in [0, 1), got {}",
                self.search.threshold
            )));
        }
        if self.search.limit == 0 || self.search.limit > MAX_RESULT_LIMIT {
            return Err(Error::InvalidConfig(format!(
                "search.limit must be between 1 and {}, got {}",
                MAX_RESULT_LIMIT, self.search.limit
            )));
        }
        Ok(())
    }
}

/// Expand `$VAR`/`${VAR}` and a leading `~`. Unset variables leave the input
/// untouched; the result is not canonicalized.
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Expanded `p`, joined onto `base` unless already absolute.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
