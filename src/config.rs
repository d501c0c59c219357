use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::association::{DEFAULT_HIDDEN_CATEGORIES, DEFAULT_PALETTE};
use crate::error::{Error, Result};
use crate::meetings::{NextMeetingRule, DEFAULT_ALLOWED_MEETING_TYPES, RECENT_LIMIT};

/// Origin of the council CMS when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8027";

/// Environment variable overriding the API origin
pub const API_URL_ENV: &str = "COUNCILHUB_API_URL";

/// Environment variable naming a YAML config file
pub const CONFIG_PATH_ENV: &str = "COUNCILHUB_CONFIG";

/// Settings file under `$HOME/.councilhub`, or relative to the working
/// directory when no home is known
pub fn default_settings_path() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".councilhub")
        .join("settings.toml")
}

/// Client and view configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub hidden_categories: Vec<String>,
    pub allowed_meeting_types: Vec<String>,
    pub recent_limit: usize,
    pub next_meeting_rule: NextMeetingRule,
    pub category_palette: Vec<String>,
    pub settings_path: PathBuf,
}

impl Config {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            hidden_categories: to_strings(DEFAULT_HIDDEN_CATEGORIES),
            allowed_meeting_types: to_strings(DEFAULT_ALLOWED_MEETING_TYPES),
            recent_limit: RECENT_LIMIT,
            next_meeting_rule: NextMeetingRule::default(),
            category_palette: to_strings(DEFAULT_PALETTE),
            settings_path: default_settings_path(),
        }
    }

    /// Load a YAML file; keys it leaves out keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// The API origin as a parsed URL
    pub fn api_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.api_base_url)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.api_url().map_err(|_| {
            Error::Config(format!("API URL is not an absolute URL: {}", self.api_base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "API URL must use http or https: {}",
                self.api_base_url
            )));
        }

        if self.recent_limit == 0 {
            return Err(Error::Config("recent_limit must be at least 1".to_string()));
        }

        let hex = Regex::new(r"^#[0-9a-fA-F]{6}$").map_err(|e| Error::Config(e.to_string()))?;
        if let Some(bad) = self.category_palette.iter().find(|c| !hex.is_match(c)) {
            return Err(Error::Config(format!(
                "Invalid palette colour '{}'. Expected #rrggbb",
                bad
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Builder for creating configurations
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            config: Config::from_file(path)?,
        })
    }

    /// Start from the file named by `COUNCILHUB_CONFIG` (if any), then apply
    /// `COUNCILHUB_API_URL`
    pub fn from_env() -> Result<Self> {
        let builder = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path)?,
            _ => Self::new(),
        };
        Ok(builder.env_overrides())
    }

    /// Apply `COUNCILHUB_API_URL` when set
    pub fn env_overrides(self) -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => self.api_base_url(url),
            _ => self,
        }
    }

    /// Set the API origin
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    /// Set the category names hidden from the content hub
    pub fn hidden_categories(mut self, names: Vec<String>) -> Self {
        self.config.hidden_categories = names;
        self
    }

    /// Set the meeting types listed on the meetings overview
    pub fn allowed_meeting_types(mut self, names: Vec<String>) -> Self {
        self.config.allowed_meeting_types = names;
        self
    }

    /// Set how many past meetings the recent list holds
    pub fn recent_limit(mut self, limit: usize) -> Self {
        self.config.recent_limit = limit;
        self
    }

    pub fn next_meeting_rule(mut self, rule: NextMeetingRule) -> Self {
        self.config.next_meeting_rule = rule;
        self
    }

    /// Set the category colour palette
    pub fn category_palette(mut self, colors: Vec<String>) -> Self {
        self.config.category_palette = colors;
        self
    }

    pub fn settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.settings_path = path.into();
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
