//! Run configuration loaded from TOML.
//!
//! Lookup order: an explicit path, then `./dcc.toml`, then built-in defaults.
//! Every value is explicit; nothing is read from process-wide state here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::browser::{
    BrowserOptions, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_NETWORK_IDLE_TIMEOUT,
    DEFAULT_PROCESS_TIMEOUT,
};
use crate::engine::{
    DiffProperty, MatchPolicy, MatchThresholds, UnitScale, DEFAULT_CRITICAL_THRESHOLD,
    DEFAULT_MATERIALITY,
};
use crate::figma::{FigmaAuth, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::viewport::check_distinct;
use crate::Viewport;

/// File picked up from the working directory when no path is given.
pub const LOCAL_CONFIG_FILE: &str = "dcc.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub matching: MatchingConfig,
    pub diff: DiffConfig,
    pub report: ReportConfig,
    pub units: UnitScale,
    pub figma: FigmaConfig,
    pub browser: BrowserConfig,
    pub viewports: Vec<Viewport>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matching: MatchingConfig::default(),
            diff: DiffConfig::default(),
            report: ReportConfig::default(),
            units: UnitScale::default(),
            figma: FigmaConfig::default(),
            browser: BrowserConfig::default(),
            viewports: Viewport::presets(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchingConfig {
    pub policy: MatchPolicy,
    pub name_threshold: f64,
    pub size_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let thresholds = MatchThresholds::default();
        Self {
            policy: MatchPolicy::default(),
            name_threshold: thresholds.name,
            size_threshold: thresholds.size,
        }
    }
}

impl MatchingConfig {
    pub fn thresholds(&self) -> MatchThresholds {
        MatchThresholds {
            name: self.name_threshold,
            size: self.size_threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    pub materiality: f64,
    pub properties: Vec<DiffProperty>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            materiality: DEFAULT_MATERIALITY,
            properties: vec![DiffProperty::Width, DiffProperty::Height],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub critical_threshold: f64,
    pub out_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
            out_dir: PathBuf::from("dcc-report"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FigmaConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_token: Option<String>,
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            token: None,
            oauth_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl FigmaConfig {
    /// Credentials configured in the file; a personal token wins over OAuth.
    pub fn auth(&self) -> Option<FigmaAuth> {
        let non_empty = |t: &Option<String>| t.as_ref().filter(|t| !t.trim().is_empty()).cloned();
        non_empty(&self.token)
            .map(FigmaAuth::PersonalAccessToken)
            .or_else(|| non_empty(&self.oauth_token).map(FigmaAuth::OAuthToken))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    pub node_command: String,
    pub headless: bool,
    #[serde(with = "humantime_serde")]
    pub navigation_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub network_idle_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub process_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            node_command: "node".to_string(),
            headless: true,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            network_idle_timeout: DEFAULT_NETWORK_IDLE_TIMEOUT,
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
        }
    }
}

impl BrowserConfig {
    pub fn options(&self, screenshot_dir: Option<PathBuf>) -> BrowserOptions {
        BrowserOptions {
            node_command: self.node_command.clone(),
            headless: self.headless,
            navigation_timeout: self.navigation_timeout,
            network_idle_timeout: self.network_idle_timeout,
            process_timeout: self.process_timeout,
            screenshot_dir,
        }
    }
}

impl Config {
    /// File that [`Config::load`] reads for `path`, if any.
    pub fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
        match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let local = PathBuf::from(LOCAL_CONFIG_FILE);
                local.is_file().then_some(local)
            }
        }
    }

    /// Loads the explicit file, else `./dcc.toml`, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::resolve_path(path) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit_interval("matching.name_threshold", self.matching.name_threshold)?;
        check_unit_interval("matching.size_threshold", self.matching.size_threshold)?;
        check_non_negative("diff.materiality", self.diff.materiality)?;
        check_non_negative("report.critical_threshold", self.report.critical_threshold)?;
        self.units
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("units: {}", e)))?;

        if self.viewports.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one viewport must be configured".to_string(),
            ));
        }
        if let Some(bad) = self.viewports.iter().find(|v| !v.is_valid()) {
            return Err(ConfigError::Invalid(format!(
                "viewport '{}' must have a name and positive width/height",
                bad.name
            )));
        }
        check_distinct(&self.viewports).map_err(ConfigError::Invalid)?;

        for (name, value) in [
            ("browser.navigation_timeout", self.browser.navigation_timeout),
            ("browser.network_idle_timeout", self.browser.network_idle_timeout),
            ("browser.process_timeout", self.browser.process_timeout),
            ("figma.timeout", self.figma.timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigError::Invalid(format!("{name} must be greater than zero")));
            }
        }
        Ok(())
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{name} must be between 0 and 1, got {value}"
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{name} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}
