use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::app::{HarvestError, Result};
use crate::browser::{text_xpath, BrowserSession, Locator};
use crate::config::BrowserConfig;

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight)";

const IS_INTERACTABLE: &str = r#"
    function() {
        const rect = this.getBoundingClientRect();
        const style = window.getComputedStyle(this);
        return !this.disabled
            && rect.width > 0 && rect.height > 0
            && style.visibility !== 'hidden' && style.display !== 'none';
    }
"#;

const SYNTHETIC_CLICK: &str = "function() { this.click(); }";

/// Chrome-based session using chromiumoxide
pub struct ChromeSession {
    browser: Browser,
    page: Option<Page>,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    /// Launch a local Chromium and open a blank page
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut builder = LaunchConfig::builder();
        for arg in &config.args {
            builder = builder.arg(arg.as_str());
        }

        if !config.headless {
            builder = builder.with_head();
        }

        let launch_config = builder
            .build()
            .map_err(|e| HarvestError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (mut browser, mut handler) = Browser::launch(launch_config).await.map_err(|e| {
            HarvestError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // Drive the CDP connection until the session closes
        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = shut_down(&mut browser, &handler).await;
                return Err(HarvestError::Browser(format!("Failed to create page: {}", e)));
            }
        };

        info!("Launched local Chromium");
        Ok(Self {
            browser,
            page: Some(page),
            handler,
        })
    }

    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| HarvestError::Browser("Browser page already closed".to_string()))
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    type Element = Element;

    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.page()?
            .goto(url)
            .await
            .map_err(|e| HarvestError::Browser(format!("Navigation failed: {}", e)))?;
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.page()?
            .evaluate(SCROLL_TO_BOTTOM)
            .await
            .map_err(|e| HarvestError::Browser(format!("Script execution failed: {}", e)))?;
        Ok(())
    }

    async fn find(&mut self, locator: &Locator) -> Result<Vec<Element>> {
        let page = self.page()?;
        let found = match locator {
            Locator::Css(selector) => page.find_elements(selector.as_str()).await,
            Locator::Text { tag, phrase } => page.find_xpaths(text_xpath(tag, phrase)).await,
        };
        found.map_err(|e| HarvestError::Browser(format!("Lookup of {} failed: {}", locator, e)))
    }

    async fn is_interactable(&mut self, element: &Element) -> bool {
        match element.call_js_fn(IS_INTERACTABLE, false).await {
            Ok(returns) => returns
                .result
                .value
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            Err(e) => {
                debug!("Visibility check failed: {}", e);
                false
            }
        }
    }

    async fn click(&mut self, element: &Element) -> Result<()> {
        element
            .scroll_into_view()
            .await
            .map_err(|e| HarvestError::Browser(format!("Failed to scroll element: {}", e)))?;
        element
            .call_js_fn(SYNTHETIC_CLICK, false)
            .await
            .map_err(|e| HarvestError::Browser(format!("Click failed: {}", e)))?;
        Ok(())
    }

    async fn count(&mut self, selector: &str) -> Result<usize> {
        let script = format!(
            "document.querySelectorAll({}).length",
            serde_json::to_string(selector)?
        );
        let count: usize = self
            .page()?
            .evaluate(script)
            .await
            .map_err(|e| HarvestError::Browser(format!("Script execution failed: {}", e)))?
            .into_value()
            .map_err(|e| HarvestError::Browser(format!("Failed to parse result: {:?}", e)))?;
        Ok(count)
    }

    async fn page_source(&mut self) -> Result<String> {
        self.page()?
            .content()
            .await
            .map_err(|e| HarvestError::Browser(format!("Failed to read page content: {}", e)))
    }

    async fn close(&mut self) -> Result<()> {
        let Some(page) = self.page.take() else {
            return Ok(());
        };

        let _ = page.close().await;
        let closed = shut_down(&mut self.browser, &self.handler).await;

        debug!("Chromium closed");
        closed
    }
}

/// Close the browser process and stop its CDP handler task
async fn shut_down(browser: &mut Browser, handler: &JoinHandle<()>) -> Result<()> {
    let closed = browser
        .close()
        .await
        .map(|_| ())
        .map_err(|e| HarvestError::Browser(format!("Failed to close browser: {}", e)));
    let _ = browser.wait().await;
    handler.abort();
    closed
}
