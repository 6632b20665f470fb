use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrightError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch feed {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Failed to fetch image {url}: {reason}")]
    ImageFetch { url: String, reason: String },

    #[error("Delivery to {subscriber} failed: {reason}")]
    Delivery { subscriber: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BrightError>;

impl From<crate::config::ConfigError> for BrightError {
    fn from(e: crate::config::ConfigError) -> Self {
        BrightError::Config(e.to_string())
    }
}
