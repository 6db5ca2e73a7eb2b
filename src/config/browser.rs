use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`BrowserConfig::endpoint`].
pub const ENDPOINT_ENV: &str = "SELENIUM_ENDPOINT";

pub const DEFAULT_ENDPOINT: &str = "http://localhost:4444/wd/hub";

/// Which automation backend drives the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BrowserBackend {
    /// Remote WebDriver session (Selenium hub or chromedriver)
    #[default]
    Webdriver,
    /// Locally launched Chromium over the DevTools protocol
    Chrome,
}

/// Configuration for the browser session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Backend used when `--browser` is not given (default: webdriver)
    pub backend: BrowserBackend,

    /// Remote WebDriver address (default: http://localhost:4444/wd/hub)
    pub endpoint: String,

    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Extra command-line arguments passed to the browser
    pub args: Vec<String>,

    /// Timeout for the endpoint status probe in seconds (default: 5)
    pub preflight_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            backend: BrowserBackend::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            headless: true,
            args: vec![
                "--disable-dev-shm-usage".to_string(),
                "--no-sandbox".to_string(),
            ],
            preflight_timeout_secs: 5,
        }
    }
}

impl BrowserConfig {
    /// Arguments for the browser process, including the headless switch.
    pub fn browser_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        if self.headless {
            args.push("--headless=new".to_string());
        }
        args.extend(self.args.iter().cloned());
        args
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
    }
}
