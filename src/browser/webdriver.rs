use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tracing::{debug, info};

use crate::app::{HarvestError, Result};
use crate::browser::{text_xpath, BrowserSession, Locator};
use crate::config::BrowserConfig;

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";
const SCROLL_INTO_VIEW: &str = "arguments[0].scrollIntoView({block: 'center'});";
const SYNTHETIC_CLICK: &str = "arguments[0].click();";

/// Remote WebDriver session driven through thirtyfour
pub struct WebDriverSession {
    driver: Option<WebDriver>,
}

impl WebDriverSession {
    /// Probe the endpoint, then open a Chrome session on it
    pub async fn connect(config: &BrowserConfig) -> Result<Self> {
        preflight(
            &config.endpoint,
            Duration::from_secs(config.preflight_timeout_secs),
        )
        .await?;

        let mut caps = DesiredCapabilities::chrome();
        for arg in config.browser_args() {
            caps.add_arg(&arg)?;
        }

        info!(endpoint = %config.endpoint, "Opening WebDriver session");
        let driver = WebDriver::new(config.endpoint.as_str(), caps).await?;

        Ok(Self {
            driver: Some(driver),
        })
    }

    fn driver(&self) -> Result<&WebDriver> {
        self.driver
            .as_ref()
            .ok_or_else(|| HarvestError::Browser("WebDriver session already closed".to_string()))
    }
}

/// Check that the endpoint answers `/status` and reports itself ready
async fn preflight(endpoint: &str, timeout: Duration) -> Result<()> {
    let url = status_url(endpoint);
    let unavailable = |reason: String| HarvestError::EndpointUnavailable {
        endpoint: endpoint.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("harvester/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    let status = response.status();
    let body = response.text().await?;
    check_status(status, &body).map_err(unavailable)?;

    debug!(endpoint, "WebDriver endpoint ready");
    Ok(())
}

fn status_url(endpoint: &str) -> String {
    format!("{}/status", endpoint.trim_end_matches('/'))
}

/// Accept a `/status` answer only on a success code with a ready body
fn check_status(status: reqwest::StatusCode, body: &str) -> std::result::Result<(), String> {
    if !status.is_success() {
        return Err(format!("status endpoint returned {}", status));
    }
    parse_status(body)
}

/// Interpret a WebDriver `/status` body.
///
/// Only an explicit `"ready": false` is treated as unavailable; bodies that
/// omit the flag are accepted.
pub fn parse_status(body: &str) -> std::result::Result<(), String> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| format!("invalid status response: {}", e))?;

    let status = value.get("value").unwrap_or(&value);
    match status.get("ready").and_then(|r| r.as_bool()) {
        Some(false) => {
            let message = status
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("endpoint is not ready");
            Err(message.to_string())
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    type Element = WebElement;

    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.driver()?.goto(url).await?;
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.driver()?.execute(SCROLL_TO_BOTTOM, Vec::new()).await?;
        Ok(())
    }

    async fn find(&mut self, locator: &Locator) -> Result<Vec<WebElement>> {
        let driver = self.driver()?;
        let elements = match locator {
            Locator::Css(selector) => driver.find_all(By::Css(selector.clone())).await?,
            Locator::Text { tag, phrase } => {
                driver.find_all(By::XPath(text_xpath(tag, phrase))).await?
            }
        };
        Ok(elements)
    }

    async fn is_interactable(&mut self, element: &WebElement) -> bool {
        matches!(element.is_displayed().await, Ok(true))
            && matches!(element.is_enabled().await, Ok(true))
    }

    async fn click(&mut self, element: &WebElement) -> Result<()> {
        let driver = self.driver()?;
        let arg = element.to_json()?;
        driver.execute(SCROLL_INTO_VIEW, vec![arg.clone()]).await?;
        driver.execute(SYNTHETIC_CLICK, vec![arg]).await?;
        Ok(())
    }

    async fn count(&mut self, selector: &str) -> Result<usize> {
        Ok(self.driver()?.find_all(By::Css(selector.to_string())).await?.len())
    }

    async fn page_source(&mut self) -> Result<String> {
        Ok(self.driver()?.source().await?)
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(driver) = self.driver.take() {
            driver.quit().await?;
            debug!("WebDriver session closed");
        }
        Ok(())
    }
}
