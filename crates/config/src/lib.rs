#![doc = include_str!("../README.md")]
//! # Sample Config
//! ```yaml
#![doc = include_str!("../../../sample_config.yaml")]
//! ```

mod error;
mod interpolate;

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use tracing_subscriber::filter::LevelFilter;

pub use error::ConfigError;
pub use interpolate::Interpolator;

pub const DEFAULT_CONFIG_FILE: &str = "/usr/src/script/config/resource_availability_config.yml";
pub const DEFAULT_TEMPLATE_FILE: &str =
    "/usr/src/script/resource_availability/config/resource_availability_config.template.yml";

#[derive(Debug, Deserialize, Clone)]
pub struct AvailabilityConfig {
    pub inventory: InventorySettings,
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct InventorySettings {
    pub server: String,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub use_tls: bool,

    pub username: String,
    pub password: String,
    pub domain: String,
}

fn default_port() -> u16 {
    8029
}

impl InventorySettings {
    pub fn base_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{scheme}://{}:{}/", self.server, self.port)
    }
}

impl fmt::Debug for InventorySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InventorySettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("username", &"<redacted>")
            .field("password", &"<redacted>")
            .field("domain", &self.domain)
            .finish()
    }
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub family_model_list: Vec<ResourceFilter>,

    /// Seconds relative to now, may be negative
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub start_offset: i64,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub end_offset: i64,

    pub output_file: PathBuf,

    /// Check every resource before querying and drop the ones the inventory no longer knows
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub skip_missing_resources: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoggingLevel {
    ERROR,
    WARN,
    #[default]
    INFO,
    DEBUG,
    TRACE,
    OFF,
}

impl<'de> Deserialize<'de> for LoggingLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = String::deserialize(deserializer)?;

        Ok(match v.to_ascii_uppercase().as_str() {
            "ERROR" => Self::ERROR,
            "WARN" => Self::WARN,
            "INFO" => Self::INFO,
            "DEBUG" => Self::DEBUG,
            "TRACE" => Self::TRACE,
            "OFF" => Self::OFF,
            other => Err(serde::de::Error::custom(format!(
                "Bad logging level specifier {other}"
            )))?,
        })
    }
}

impl From<LoggingLevel> for LevelFilter {
    fn from(value: LoggingLevel) -> Self {
        match value {
            LoggingLevel::ERROR => LevelFilter::ERROR,
            LoggingLevel::WARN => LevelFilter::WARN,
            LoggingLevel::INFO => LevelFilter::INFO,
            LoggingLevel::DEBUG => LevelFilter::DEBUG,
            LoggingLevel::TRACE => LevelFilter::TRACE,
            LoggingLevel::OFF => LevelFilter::OFF,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub max_level: LoggingLevel,
}

/// A `<family>:<model>` search term. Either half may be empty, but not both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceFilter {
    pub family: String,
    pub model: String,
}

impl FromStr for ResourceFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (family, model) = s.split_once(':').ok_or(ConfigError::InvalidFilter {
            raw: s.to_owned(),
            reason: "expected `<family>:<model>`",
        })?;

        if family.is_empty() && model.is_empty() {
            return Err(ConfigError::InvalidFilter {
                raw: s.to_owned(),
                reason: "family and model cannot both be empty",
            });
        }

        Ok(ResourceFilter {
            family: family.to_owned(),
            model: model.to_owned(),
        })
    }
}

impl<'de> Deserialize<'de> for ResourceFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let base = String::deserialize(deserializer)?;
        base.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ResourceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.family, self.model)
    }
}

/// Where the config lives and whether the template should replace it.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
    pub template_file: PathBuf,
    pub overwrite: bool,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            template_file: PathBuf::from(DEFAULT_TEMPLATE_FILE),
            overwrite: false,
        }
    }
}

/// Copies the template over the config file when the config is missing or
/// `overwrite` is set. Returns whether a copy happened.
pub fn prepare_config_file(paths: &ConfigPaths) -> Result<bool, ConfigError> {
    if !paths.overwrite && paths.config_file.is_file() {
        return Ok(false);
    }

    std::fs::copy(&paths.template_file, &paths.config_file).map_err(|e| {
        ConfigError::TemplateCopy {
            from: paths.template_file.clone(),
            to: paths.config_file.clone(),
            source: e,
        }
    })?;

    Ok(true)
}

/// Bootstraps the config file from its template if needed, then reads and
/// resolves it.
pub fn load_config(
    paths: &ConfigPaths,
    interpolator: &Interpolator,
) -> Result<AvailabilityConfig, ConfigError> {
    prepare_config_file(paths)?;
    read_config(&paths.config_file, interpolator)
}

pub fn read_config(
    path: &Path,
    interpolator: &Interpolator,
) -> Result<AvailabilityConfig, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config(&data, &path.display().to_string(), interpolator)
}

/// Parses `data`, resolving interpolation markers before the typed
/// deserialization so markers may stand in for numbers and lists too.
pub fn parse_config(
    data: &str,
    origin: &str,
    interpolator: &Interpolator,
) -> Result<AvailabilityConfig, ConfigError> {
    let yaml_error = |source| ConfigError::Yaml {
        path: origin.to_owned(),
        source,
    };

    let mut value: serde_yaml::Value = serde_yaml::from_str(data).map_err(yaml_error)?;
    interpolator.resolve(&mut value)?;

    serde_yaml::from_value(value).map_err(yaml_error)
}
