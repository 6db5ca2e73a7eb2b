use std::time::Duration;

use tracing::{debug, info};

use crate::app::Result;
use crate::browser::{BrowserSession, Locator};
use crate::config::ExpanderConfig;

/// Outcome of a comment expansion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    /// Iterations started, at most the click budget
    pub iterations: u32,
    /// Iterations that ended in a successful click
    pub clicks: u32,
    /// Whether a comment entry was present once expansion stopped
    pub comments_present: bool,
}

/// Clicks "show more" controls until none are left or the budget runs out
pub struct CommentExpander {
    config: ExpanderConfig,
    poll_interval: Duration,
}

impl CommentExpander {
    pub fn new(config: ExpanderConfig, poll_interval: Duration) -> Self {
        Self {
            config,
            poll_interval,
        }
    }

    pub async fn expand<S: BrowserSession>(&self, session: &mut S) -> Result<ExpansionReport> {
        let mut report = ExpansionReport::default();

        for _ in 0..self.config.max_clicks {
            report.iterations += 1;

            if !self.click_show_more(session).await {
                debug!(iteration = report.iterations, "Nothing left to expand");
                break;
            }
            report.clicks += 1;
        }

        match session
            .wait_for(
                &self.config.comment_selector,
                self.config.comment_wait(),
                self.poll_interval,
            )
            .await
        {
            Ok(()) => report.comments_present = true,
            Err(e) if e.is_timeout() => info!("No comments rendered: {}", e),
            Err(e) => debug!("Comment presence check failed: {}", e),
        }

        Ok(report)
    }

    /// One expansion step: selectors in priority order, then the text
    /// fallback.
    async fn click_show_more<S: BrowserSession>(&self, session: &mut S) -> bool {
        for selector in &self.config.show_more_selectors {
            if self.click_first(session, &Locator::css(selector.as_str())).await {
                return true;
            }
        }

        let fallback = Locator::text(
            self.config.fallback_tag.as_str(),
            self.config.fallback_phrase.as_str(),
        );
        self.click_first(session, &fallback).await
    }

    /// Click the first interactable match. Lookup and click failures only
    /// mean this locator produced no click.
    async fn click_first<S: BrowserSession>(&self, session: &mut S, locator: &Locator) -> bool {
        let elements = match session.find(locator).await {
            Ok(elements) => elements,
            Err(e) => {
                debug!(%locator, "Lookup failed: {}", e);
                return false;
            }
        };

        for element in &elements {
            if !session.is_interactable(element).await {
                continue;
            }

            match session.click(element).await {
                Ok(()) => {
                    debug!(%locator, "Clicked show-more control");
                    session.pause(self.config.settle_delay()).await;
                    return true;
                }
                Err(e) => debug!(%locator, "Click failed: {}", e),
            }
        }

        false
    }
}
