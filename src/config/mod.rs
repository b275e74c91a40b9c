//! Configuration management.
//!
//! Settings come from four layers, highest priority first:
//!
//! 1. Explicit command-line flags
//! 2. Environment variables (`ITX_*`)
//! 3. The config file at `~/.infotexts/config.json`
//! 4. Built-in defaults
//!
//! This module also finds the project store a command should work on.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::language::{self, Language};
use crate::model::project::STORE_FILE_NAME;
use crate::translate::google::DEFAULT_TIMEOUT_SECS;
use crate::translate::TranslatePolicy;

/// Overrides the directory holding `config.json`.
pub const ENV_HOME: &str = "ITX_HOME";
pub const ENV_TRANSLATE_ENDPOINT: &str = "ITX_TRANSLATE_ENDPOINT";
pub const ENV_TRANSLATE_TIMEOUT: &str = "ITX_TRANSLATE_TIMEOUT";
pub const ENV_TRANSLATE_POLICY: &str = "ITX_TRANSLATE_POLICY";
pub const ENV_DEFAULT_TARGET: &str = "ITX_DEFAULT_TARGET";
pub const ENV_TMPDIR: &str = "ITX_TMPDIR";
pub const ENV_PROJECT: &str = "ITX_PROJECT";

/// Contents of `config.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_policy: Option<TranslatePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_root: Option<PathBuf>,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub translate_endpoint: Option<String>,
    pub translate_policy: Option<TranslatePolicy>,
    pub temp_root: Option<PathBuf>,
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// `None` means the translator's built-in endpoint.
    pub translate_endpoint: Option<String>,
    pub translate_timeout: Duration,
    pub translate_policy: TranslatePolicy,
    pub default_target: Option<String>,
    /// Parent of the per-process scratch directory.
    pub temp_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            translate_endpoint: None,
            translate_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            translate_policy: TranslatePolicy::default(),
            default_target: None,
            temp_root: std::env::temp_dir(),
        }
    }
}

impl Settings {
    /// Resolve settings from flags, the process environment and the config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the config file is unreadable or a value
    /// does not parse.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let file = load_file_settings()?;
        Self::resolve(overrides, &file, |key| std::env::var(key).ok())
    }

    /// Layer `overrides`, `env` and `file` over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if an environment value does not parse.
    pub fn resolve<F>(overrides: &Overrides, file: &FileSettings, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let translate_endpoint = overrides
            .translate_endpoint
            .clone()
            .or_else(|| env(ENV_TRANSLATE_ENDPOINT))
            .or_else(|| file.translate_endpoint.clone());

        let translate_timeout = match env(ENV_TRANSLATE_TIMEOUT) {
            Some(raw) => raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                Error::Config(format!("{ENV_TRANSLATE_TIMEOUT} must be a number of seconds, got '{raw}'"))
            })?,
            None => file
                .translate_timeout_secs
                .map_or(defaults.translate_timeout, Duration::from_secs),
        };

        let translate_policy = match overrides.translate_policy {
            Some(policy) => policy,
            None => match env(ENV_TRANSLATE_POLICY) {
                Some(raw) => raw
                    .parse::<TranslatePolicy>()
                    .map_err(|e: Error| Error::Config(format!("{ENV_TRANSLATE_POLICY}: {e}")))?,
                None => file.translate_policy.unwrap_or(defaults.translate_policy),
            },
        };

        let default_target = env(ENV_DEFAULT_TARGET).or_else(|| file.default_target.clone());

        let temp_root = overrides
            .temp_root
            .clone()
            .or_else(|| env(ENV_TMPDIR).map(PathBuf::from))
            .or_else(|| file.temp_root.clone())
            .unwrap_or(defaults.temp_root);

        Ok(Self {
            translate_endpoint,
            translate_timeout,
            translate_policy,
            default_target,
            temp_root,
        })
    }

    /// Target language: the explicit one, else the configured default.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if neither is given or the name is
    /// not a supported language.
    pub fn target_language(&self, explicit: Option<&str>) -> Result<&'static Language> {
        let name = explicit.or(self.default_target.as_deref()).ok_or_else(|| {
            Error::InvalidArgument("No target language; pass --to <language>".to_string())
        })?;
        language::resolve(name).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "Unsupported target language '{name}' (see `itx languages`)"
            ))
        })
    }
}

/// The directory holding `config.json`: `$ITX_HOME`, else `~/.infotexts`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var(ENV_HOME) {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }
    directories::BaseDirs::new().map(|b| b.home_dir().join(".infotexts"))
}

/// Get the config file path.
fn config_path() -> Result<PathBuf> {
    global_config_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or(Error::Config("Could not determine home directory".into()))
}

/// Load `config.json`, or defaults if there is none.
///
/// # Errors
///
/// Returns `Error::Config` if the file exists but cannot be read or parsed.
pub fn load_file_settings() -> Result<FileSettings> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(FileSettings::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
}

/// Resolve the project store a command should use.
///
/// Priority:
/// 1. `explicit` from `--project`; a directory means its `project-store`
/// 2. `ITX_PROJECT` environment variable
/// 3. The nearest `project-store` walking up from the current directory
///
/// Only the third step checks that the file exists.
#[must_use]
pub fn resolve_project_store(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(normalize_store_path(path));
    }

    if let Ok(path) = std::env::var(ENV_PROJECT) {
        if !path.trim().is_empty() {
            return Some(normalize_store_path(Path::new(&path)));
        }
    }

    std::env::current_dir()
        .ok()
        .and_then(|cwd| discover_project_store(&cwd))
}

/// Walk up from `start` looking for a `project-store` file.
#[must_use]
pub fn discover_project_store(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let candidate = dir.join(STORE_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

fn normalize_store_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(STORE_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}
