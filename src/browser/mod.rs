//! Browser automation capability.
//!
//! The fetcher only talks to [`BrowserSession`], so the page-loading and
//! comment-expansion logic runs the same against a remote WebDriver hub, a
//! locally launched Chromium, or a scripted fake in tests.
//!
//! ```text
//! PageFetcher → BrowserSession ─┬─ WebDriverSession (thirtyfour)
//!                               └─ ChromeSession    (chromiumoxide)
//! ```

mod chrome;
#[cfg(test)]
pub(crate) mod fake;
mod webdriver;

pub use chrome::ChromeSession;
pub use webdriver::{parse_status, WebDriverSession};

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::app::{HarvestError, Result};

/// How to look up elements on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// A CSS selector
    Css(String),
    /// Elements of `tag` whose normalized text contains `phrase`, ignoring case
    Text { tag: String, phrase: String },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn text(tag: impl Into<String>, phrase: impl Into<String>) -> Self {
        Locator::Text {
            tag: tag.into(),
            phrase: phrase.into(),
        }
    }

    /// Whether rendered `text` satisfies a text locator. CSS locators never
    /// match on text.
    pub fn matches_text(&self, text: &str) -> bool {
        match self {
            Locator::Css(_) => false,
            Locator::Text { phrase, .. } => {
                let needle = normalize_whitespace(phrase).to_lowercase();
                !needle.is_empty() && normalize_whitespace(text).to_lowercase().contains(&needle)
            }
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "{}", selector),
            Locator::Text { tag, phrase } => write!(f, "{} containing \"{}\"", tag, phrase),
        }
    }
}

/// An open browser session against a single page.
#[async_trait]
pub trait BrowserSession: Send {
    type Element: Send + Sync;

    /// Load `url` in the session's page
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Scroll the window to the bottom of the document
    async fn scroll_to_bottom(&mut self) -> Result<()>;

    /// All elements matching `locator`, in document order
    async fn find(&mut self, locator: &Locator) -> Result<Vec<Self::Element>>;

    /// Whether the element is displayed and enabled. Lookup failures count as
    /// not interactable.
    async fn is_interactable(&mut self, element: &Self::Element) -> bool;

    /// Scroll the element into view and dispatch a synthetic click
    async fn click(&mut self, element: &Self::Element) -> Result<()>;

    /// Number of elements matching a CSS selector
    async fn count(&mut self, selector: &str) -> Result<usize>;

    /// The full rendered document markup
    async fn page_source(&mut self) -> Result<String>;

    /// Release the session. Safe to call more than once.
    async fn close(&mut self) -> Result<()>;

    async fn pause(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Poll until at least one element matches `selector`.
    ///
    /// Performs at most `timeout / poll + 1` checks with a `poll` pause
    /// between them and fails with [`HarvestError::Timeout`] if none match.
    async fn wait_for(&mut self, selector: &str, timeout: Duration, poll: Duration) -> Result<()> {
        let attempts = poll_attempts(timeout, poll);

        for attempt in 0..attempts {
            if self.count(selector).await? > 0 {
                debug!(selector, attempt, "Element present");
                return Ok(());
            }
            if attempt + 1 < attempts {
                self.pause(poll).await;
            }
        }

        Err(HarvestError::Timeout {
            selector: selector.to_string(),
            waited: timeout,
        })
    }
}

/// Number of presence checks that fit in `timeout` at the given interval.
pub fn poll_attempts(timeout: Duration, poll: Duration) -> u64 {
    let poll_ms = poll.as_millis().max(1);
    let steps = timeout.as_millis() / poll_ms;
    u64::try_from(steps).unwrap_or(u64::MAX - 1) + 1
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// XPath selecting `tag` elements whose normalized text contains `phrase`,
/// case-insensitively for every cased character in the phrase.
pub fn text_xpath(tag: &str, phrase: &str) -> String {
    let needle = normalize_whitespace(phrase).to_lowercase();

    let mut upper = String::new();
    let mut lower = String::new();
    for c in needle.chars() {
        let mut upper_chars = c.to_uppercase();
        // translate() maps one character to one character
        if let (Some(u), None) = (upper_chars.next(), upper_chars.next()) {
            if u != c && !upper.contains(u) {
                upper.push(u);
                lower.push(c);
            }
        }
    }

    format!(
        "//{}[contains(translate(normalize-space(.), {}, {}), {})]",
        tag,
        xpath_literal(&upper),
        xpath_literal(&lower),
        xpath_literal(&needle)
    )
}

fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }

    let parts = value
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect::<Vec<_>>()
        .join(", \"'\", ");
    format!("concat({})", parts)
}
