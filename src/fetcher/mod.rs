//! Page loading for a single article.
//!
//! ```text
//! navigate → wait for article → scroll × N → expand comments → page source
//! ```
//!
//! [`PageFetcher::fetch`] always releases the session, whether or not the
//! page loaded.

pub mod expander;

pub use expander::{CommentExpander, ExpansionReport};

use tracing::{info, warn};

use crate::app::Result;
use crate::browser::BrowserSession;
use crate::config::{Config, ExpanderConfig, FetchConfig};

pub struct PageFetcher {
    config: FetchConfig,
    expander: CommentExpander,
}

impl PageFetcher {
    pub fn new(config: FetchConfig, expander: ExpanderConfig) -> Self {
        let expander = CommentExpander::new(expander, config.poll_interval());
        Self { config, expander }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.fetch.clone(), config.expander.clone())
    }

    /// Load the article and return its fully rendered markup.
    ///
    /// Fails if the article container never appears within the configured
    /// wait. The session is left open.
    pub async fn load_article_html<S: BrowserSession>(
        &self,
        session: &mut S,
        url: &str,
    ) -> Result<String> {
        info!(url, "Loading article");
        session.navigate(url).await?;
        session
            .wait_for(
                &self.config.ready_selector,
                self.config.wait(),
                self.config.poll_interval(),
            )
            .await?;

        // Trigger scroll-driven lazy loading
        for _ in 0..self.config.scroll_count {
            session.scroll_to_bottom().await?;
            session.pause(self.config.scroll_pause()).await;
        }

        let report = self.expander.expand(session).await?;
        info!(
            clicks = report.clicks,
            iterations = report.iterations,
            comments_present = report.comments_present,
            "Comment expansion finished"
        );

        session.page_source().await
    }

    /// Like [`load_article_html`](Self::load_article_html), then close the
    /// session on every path. A close failure is logged and never replaces
    /// the load result.
    pub async fn fetch<S: BrowserSession>(&self, session: &mut S, url: &str) -> Result<String> {
        let result = self.load_article_html(session, url).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::browser::fake::{FakeControl, FakeSession};

    const URL: &str = "https://vnexpress.net/sample-4866122.html";

    fn fetcher() -> PageFetcher {
        PageFetcher::from_config(&Config::default())
    }

    fn rendered_page() -> FakeSession {
        FakeSession::new()
            .with_present("article.fck_detail", 1)
            .with_present("#list_comment .comment_item, .comment_item", 2)
            .with_source("<html><body><article class=\"fck_detail\"></article></body></html>")
    }

    #[tokio::test]
    async fn test_fetch_returns_source_and_closes() {
        let mut session = rendered_page();
        let html = fetcher().fetch(&mut session, URL).await.unwrap();

        assert!(html.contains("fck_detail"));
        assert_eq!(session.navigated, vec![URL.to_string()]);
        assert_eq!(session.close_calls, 1);
    }

    #[tokio::test]
    async fn test_scrolls_with_pause_between_each() {
        let mut session = rendered_page();
        fetcher().fetch(&mut session, URL).await.unwrap();

        assert_eq!(session.scrolls, 4);
        assert_eq!(
            &session.pauses[..4],
            &[Duration::from_millis(1500); 4][..]
        );
    }

    #[tokio::test]
    async fn test_missing_article_is_fatal_and_releases_session() {
        let mut session = FakeSession::new().with_source("<html></html>");
        let err = fetcher().fetch(&mut session, URL).await.unwrap_err();

        assert!(err.is_timeout());
        assert!(session.is_closed());
        assert_eq!(session.scrolls, 0);
        assert!(session.clicks.is_empty());
    }

    #[tokio::test]
    async fn test_navigation_failure_releases_session() {
        let mut session = rendered_page().failing_navigation();
        assert!(fetcher().fetch(&mut session, URL).await.is_err());
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn test_expands_comments_before_reading_source() {
        let mut session = rendered_page().with_control(FakeControl::css("a.view_more_comment", 2));
        fetcher().fetch(&mut session, URL).await.unwrap();
        assert_eq!(session.clicks, vec![0, 0]);
    }

    #[tokio::test]
    async fn test_failed_comment_check_still_saves_page() {
        let mut session = FakeSession::new()
            .with_present("article.fck_detail", 1)
            .failing_count("#list_comment .comment_item, .comment_item", "unexpected alert open")
            .with_source("<html><article class=\"fck_detail\"></article></html>");

        let html = fetcher().fetch(&mut session, URL).await.unwrap();
        assert!(html.contains("fck_detail"));
        assert!(session.is_closed());
    }

    #[test]
    fn test_load_leaves_session_open() {
        let mut session = rendered_page();
        let html = tokio_test::block_on(fetcher().load_article_html(&mut session, URL)).unwrap();
        assert!(!html.is_empty());
        assert!(!session.is_closed());
    }

    #[test]
    fn test_custom_scroll_count() {
        let fetch = FetchConfig {
            scroll_count: 1,
            ..Default::default()
        };
        let fetcher = PageFetcher::new(fetch, ExpanderConfig::default());
        let mut session = rendered_page();
        tokio_test::block_on(fetcher.fetch(&mut session, URL)).unwrap();
        assert_eq!(session.scrolls, 1);
    }
}
