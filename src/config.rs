// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! `config.toml` loading.
//!
//! ```toml
//! version = 1
//!
//! [dataset]
//! path = "docs/logic/assets/functions.js"
//!
//! [navigation]
//! entry_points = ["usecase.OrderCreateUseCase.CreateOrder"]
//!
//! [ui]
//! toast_seconds = 4
//! show_callers = true
//!
//! [log]
//! level = "info"
//! dir = "/tmp/callnav"
//! ```

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const APP_NAME: &str = "callnav";
pub const CONFIG_VERSION: i64 = 1;
pub const CONFIG_PATH_ENV: &str = "CALLNAV_CONFIG_PATH";
pub const DEFAULT_TOAST_SECONDS: u64 = 4;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_ENTRY_POINTS: &[&str] = &["main.main"];

#[derive(Debug)]
pub enum ConfigError {
    NoConfigDir,
    Io { path: PathBuf, source: io::Error },
    Toml { path: PathBuf, source: toml::de::Error },
    MissingVersion { path: PathBuf },
    UnsupportedVersion { path: PathBuf, version: i64 },
    Invalid { path: PathBuf, field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConfigDir => write!(
                f,
                "cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file"
            ),
            Self::Io { path, source } => write!(f, "read config file {}: {source}", path.display()),
            Self::Toml { path, source } => {
                write!(f, "parse TOML config {}: {source}", path.display())
            }
            Self::MissingVersion { path } => write!(
                f,
                "config file {} is not versioned; add `version = {CONFIG_VERSION}`",
                path.display()
            ),
            Self::UnsupportedVersion { path, version } => write!(
                f,
                "unsupported config version {version} in {}; expected version = {CONFIG_VERSION}",
                path.display()
            ),
            Self::Invalid { path, field, reason } => {
                write!(f, "{field} in {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Toml { source, .. } => Some(source),
            Self::NoConfigDir
            | Self::MissingVersion { .. }
            | Self::UnsupportedVersion { .. }
            | Self::Invalid { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub dataset: DatasetSection,
    #[serde(default)]
    pub navigation: NavigationSection,
    #[serde(default)]
    pub ui: UiSection,
    #[serde(default)]
    pub log: LogSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            dataset: DatasetSection::default(),
            navigation: NavigationSection::default(),
            ui: UiSection::default(),
            log: LogSection::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DatasetSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NavigationSection {
    pub entry_points: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UiSection {
    pub toast_seconds: Option<u64>,
    pub show_callers: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LogSection {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        let config_root = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Io { path: path.to_owned(), source }),
        };
        Self::parse(&raw, path)
    }

    pub fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(raw)
            .map_err(|source| ConfigError::Toml { path: path.to_owned(), source })?;
        let version = table
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| ConfigError::MissingVersion { path: path.to_owned() })?;
        if version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion { path: path.to_owned(), version });
        }

        let config: Config = toml::from_str(raw)
            .map_err(|source| ConfigError::Toml { path: path.to_owned(), source })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| ConfigError::Invalid {
            path: path.to_owned(),
            field,
            reason: reason.to_owned(),
        };

        if self.ui.toast_seconds == Some(0) {
            return Err(invalid("ui.toast_seconds", "must be positive"));
        }
        if let Some(entry_points) = &self.navigation.entry_points {
            if entry_points.iter().any(|name| name.trim().is_empty()) {
                return Err(invalid("navigation.entry_points", "names must not be empty"));
            }
        }
        if let Some(level) = &self.log.level {
            if level.trim().is_empty() {
                return Err(invalid("log.level", "must not be empty"));
            }
        }
        Ok(())
    }

    pub fn dataset_path(&self) -> Option<&Path> {
        self.dataset.path.as_deref()
    }

    pub fn entry_points(&self) -> Vec<String> {
        match &self.navigation.entry_points {
            Some(names) => names.clone(),
            None => DEFAULT_ENTRY_POINTS.iter().map(|name| (*name).to_owned()).collect(),
        }
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.ui.toast_seconds.unwrap_or(DEFAULT_TOAST_SECONDS))
    }

    pub fn show_callers(&self) -> bool {
        self.ui.show_callers.unwrap_or(true)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> PathBuf {
        match &self.log.dir {
            Some(dir) => dir.clone(),
            None => dirs::cache_dir().unwrap_or_else(env::temp_dir).join(APP_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use rstest::rstest;

    use super::{Config, ConfigError, CONFIG_VERSION};

    fn parse(raw: &str) -> Result<Config, ConfigError> {
        Config::parse(raw, Path::new("config.toml"))
    }

    #[test]
    fn minimal_file_uses_defaults() {
        let config = parse("version = 1").expect("config");
        assert_eq!(config, Config::default());
        assert_eq!(config.entry_points(), vec!["main.main".to_owned()]);
        assert_eq!(config.toast_duration(), Duration::from_secs(4));
        assert!(config.show_callers());
        assert_eq!(config.log_level(), "info");
        assert!(config.dataset_path().is_none());
    }

    #[test]
    fn reads_every_section() {
        let config = parse(
            r#"
version = 1

[dataset]
path = "docs/functions.js"

[navigation]
entry_points = ["usecase.OrderCreateUseCase.CreateOrder", "CreateOrder"]

[ui]
toast_seconds = 5
show_callers = false

[log]
level = "callnav=debug"
dir = "/tmp/callnav-logs"
"#,
        )
        .expect("config");

        assert_eq!(config.dataset_path(), Some(Path::new("docs/functions.js")));
        assert_eq!(config.entry_points().len(), 2);
        assert_eq!(config.toast_duration(), Duration::from_secs(5));
        assert!(!config.show_callers());
        assert_eq!(config.log_level(), "callnav=debug");
        assert_eq!(config.log_dir(), Path::new("/tmp/callnav-logs"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("callnav-config-that-does-not-exist.toml");
        assert_eq!(Config::load(&path).expect("defaults"), Config::default());
    }

    #[rstest]
    #[case::unversioned("[ui]\nshow_callers = true")]
    #[case::wrong_version("version = 2")]
    #[case::zero_toast("version = 1\n[ui]\ntoast_seconds = 0")]
    #[case::blank_entry_point("version = 1\n[navigation]\nentry_points = [\" \"]")]
    #[case::not_toml("version = ")]
    #[case::wrong_type("version = 1\n[ui]\nshow_callers = \"yes\"")]
    fn rejects_bad_files(#[case] raw: &str) {
        assert!(parse(raw).is_err());
    }

    #[test]
    fn version_error_names_expected_version() {
        let err = parse("version = 7").expect_err("version");
        assert!(matches!(err, ConfigError::UnsupportedVersion { version: 7, .. }));
        assert!(err.to_string().contains(&format!("version = {CONFIG_VERSION}")));
    }
}
