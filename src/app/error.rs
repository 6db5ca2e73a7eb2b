use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("WebDriver endpoint unavailable at {endpoint}: {reason}")]
    EndpointUnavailable { endpoint: String, reason: String },

    #[error("Timed out after {waited:?} waiting for `{selector}`")]
    Timeout { selector: String, waited: Duration },

    #[error("Invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl HarvestError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HarvestError::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
