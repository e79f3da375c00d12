//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Nested keys come from double underscores, e.g. `APP_RETRIEVAL__INDEX_PATH`.
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    /// Same layering as [`Config::load`] but with config files looked up in `dir`.
    pub fn load_from(dir: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        Ok(Self { figment })
    }

    /// Retrieval settings from the `retrieval` table, defaults filling any gaps.
    pub fn retrieval(&self) -> Result<RetrievalSettings> {
        let settings: RetrievalSettings = Figment::from(Serialized::defaults(RetrievalSettings::default()))
            .merge(self.figment.focus("retrieval"))
            .extract()
            .map_err(|e| Error::InvalidConfig(format!("Failed to get 'retrieval': {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }
}

/// What to do when the persisted index exists but does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CorruptIndexPolicy {
    /// Refuse to open.
    Fail,
    /// Move the bad file aside, then start from an empty index.
    #[default]
    Backup,
    /// Start from an empty index, overwriting the bad file on next save.
    Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub index_path: String,
    pub dimensions: usize,
    pub chunk_size: usize,
    pub default_k: usize,
    pub max_k: usize,
    pub fragments_per_document: usize,
    pub max_excerpt_chars: usize,
    pub vector_weight: f64,
    pub bm25_k1: f64,
    pub bm25_b: f64,
    pub on_corrupt: CorruptIndexPolicy,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            index_path: "data/index.json".to_string(),
            dimensions: 1024,
            chunk_size: 800,
            default_k: 5,
            max_k: 20,
            fragments_per_document: 3,
            max_excerpt_chars: 2000,
            vector_weight: 0.5,
            bm25_k1: 1.2,
            bm25_b: 0.75,
            on_corrupt: CorruptIndexPolicy::Backup,
        }
    }
}

impl RetrievalSettings {
    pub fn validate(&self) -> Result<()> {
        if self.dimensions == 0 {
            return Err(Error::InvalidConfig("dimensions must be positive".into()));
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be positive".into()));
        }
        if self.default_k == 0 || self.max_k == 0 {
            return Err(Error::InvalidConfig("default_k and max_k must be at least 1".into()));
        }
        if self.fragments_per_document == 0 || self.max_excerpt_chars == 0 {
            return Err(Error::InvalidConfig(
                "fragments_per_document and max_excerpt_chars must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.vector_weight) {
            return Err(Error::InvalidConfig(format!("vector_weight {} outside [0, 1]", self.vector_weight)));
        }
        if self.bm25_k1 < 0.0 || !(0.0..=1.0).contains(&self.bm25_b) {
            return Err(Error::InvalidConfig("bm25_k1 must be >= 0 and bm25_b within [0, 1]".into()));
        }
        Ok(())
    }

    pub fn lexical_weight(&self) -> f64 {
        1.0 - self.vector_weight
    }

    /// The index file location, expanded and resolved against `base`.
    pub fn resolved_index_path(&self, base: &Path) -> PathBuf {
        resolve_with_base(base, &self.index_path)
    }
}

/// `$VAR`/`${VAR}` then a leading `~`, no canonicalization. Unknown
/// variables leave the input untouched.
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let raw = input.as_ref();
    let with_vars = shellexpand::env(raw).unwrap_or(std::borrow::Cow::Borrowed(raw));
    PathBuf::from(shellexpand::tilde(&with_vars).as_ref())
}

/// Expanded `path`, joined onto `base` unless it is already absolute.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, path: S) -> PathBuf {
    let expanded = expand_path(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}
