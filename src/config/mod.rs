//! Configuration management for brightfeed.
//!
//! Configuration is read from `~/.config/brightfeed/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod interval;

pub use interval::{format_interval, parse_interval};

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_FEED_URL: &str = "https://www.bright.nl/rss.xml";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub poll: PollConfig,
    pub http: HttpConfig,
    pub image: ImageConfig,
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    /// Title markers that make the newest item ineligible.
    pub exclude_titles: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            exclude_titles: vec!["RTL Nieuws".to_string(), "RTL Weer".to_string()],
        }
    }
}

/// What to do when a tick fires while the previous cycle is still running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Start another cycle anyway.
    #[default]
    Allow,
    /// Skip the tick.
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval: String,
    pub run_on_start: bool,
    pub overlap: OverlapPolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: "5m".to_string(),
            run_on_start: true,
            overlap: OverlapPolicy::Allow,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("brightfeed/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Name the image handle is registered under.
    pub name: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            name: "bright-article-image".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub url: Option<String>,
}

impl Config {
    /// Load configuration from `config_path`.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/brightfeed/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("brightfeed").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.feed.url)
            .map_err(|e| ConfigError::Invalid(format!("feed.url '{}': {}", self.feed.url, e)))?;

        if let Some(hook) = &self.webhook.url {
            url::Url::parse(hook)
                .map_err(|e| ConfigError::Invalid(format!("webhook.url '{}': {}", hook, e)))?;
        }

        self.poll_interval()?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Result<Duration, ConfigError> {
        let secs = parse_interval(&self.poll.interval).map_err(ConfigError::Invalid)?;
        if secs == 0 {
            return Err(ConfigError::Invalid("poll.interval must be positive".into()));
        }
        Ok(Duration::from_secs(secs))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# brightfeed configuration

[feed]
# Feed that is polled
url = "https://www.bright.nl/rss.xml"

# If the newest item's title contains one of these (case-sensitive),
# the second item is announced instead
exclude_titles = ["RTL Nieuws", "RTL Weer"]

[poll]
# Poll period: "30s", "5m", "1h", "1d" or plain seconds
interval = "5m"

# Check once immediately at startup
run_on_start = true

# "allow" starts a new check even if the previous one is still running,
# "skip" drops that tick
overlap = "allow"

[http]
timeout_secs = 10
user_agent = "brightfeed/0.1.0"

[image]
# Name the article image is registered under
name = "bright-article-image"

[webhook]
# POST every new_article event as JSON to this URL
# url = "http://localhost:8080/hooks/new_article"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
