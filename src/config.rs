use qtians_core::insight::DEFAULT_GEMINI_MODEL;
use qtians_core::{Endpoints, GroupCatalog};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// AI insight configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Gemini API key
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model name (default: gemini-3-flash-preview)
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
        }
    }
}

impl InsightConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the history cache and submitter profile
    pub data_dir: ConfigValue<PathBuf>,
    /// Per-request timeout for spreadsheet and AI calls
    pub request_timeout_secs: ConfigValue<u64>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Spreadsheet endpoints
    pub endpoints: Endpoints,
    /// Chapel and village enumerations
    pub groups: GroupCatalog,
    /// AI insight configuration
    pub insight: InsightConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    endpoints: Option<Endpoints>,
    groups: Option<GroupCatalog>,
    insight: Option<InsightConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut request_timeout_secs = ConfigValue::new(30, ConfigSource::Default);
        let mut config_file = None;
        let mut endpoints = Endpoints::default();
        let mut groups = GroupCatalog::default();
        let mut insight = InsightConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(secs) = file_config.request_timeout_secs {
                request_timeout_secs = ConfigValue::new(secs, ConfigSource::File);
            }
            if let Some(e) = file_config.endpoints {
                endpoints = e;
            }
            if let Some(g) = file_config.groups {
                groups = g;
            }
            if let Some(i) = file_config.insight {
                insight = i;
            }
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("QT_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(secs) = std::env::var("QT_REQUEST_TIMEOUT_SECS") {
            let secs = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv("QT_REQUEST_TIMEOUT_SECS", secs))?;
            request_timeout_secs = ConfigValue::new(secs, ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("QT_PRIMARY_URL") {
            endpoints.primary = Some(url);
        }
        if let Ok(url) = std::env::var("QT_BACKUP_URL") {
            endpoints.backup = Some(url);
        }
        if let Ok(key) = std::env::var("QT_INSIGHT_API_KEY") {
            insight.api_key = Some(key);
        }

        Ok(Self {
            data_dir,
            request_timeout_secs,
            config_file,
            endpoints,
            groups,
            insight,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.value.max(1))
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/qtians/
    /// - macOS: ~/Library/Application Support/qtians/
    /// - Windows: %APPDATA%/qtians/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("qtians")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/qtians/
    /// - macOS: ~/Library/Application Support/qtians/
    /// - Windows: %APPDATA%/qtians/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("qtians")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidEnv(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidEnv(var, value) => {
                write!(f, "Invalid value '{}' for {}", value, var)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
