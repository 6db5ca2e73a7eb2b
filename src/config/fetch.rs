use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for loading the article page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Element whose presence means the article rendered
    pub ready_selector: String,

    /// How long to wait for `ready_selector` in seconds (default: 15)
    pub wait_secs: u64,

    /// Number of scroll-to-bottom passes (default: 4)
    pub scroll_count: u32,

    /// Pause after each scroll in milliseconds (default: 1500)
    pub scroll_pause_ms: u64,

    /// Interval between presence checks in milliseconds (default: 250)
    pub poll_interval_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            ready_selector: "article.fck_detail".to_string(),
            wait_secs: 15,
            scroll_count: 4,
            scroll_pause_ms: 1500,
            poll_interval_ms: 250,
        }
    }
}

impl FetchConfig {
    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }

    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Configuration for expanding the comment section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpanderConfig {
    /// Maximum expansion iterations (default: 10)
    pub max_clicks: u32,

    /// Pause after a successful click in milliseconds (default: 1500)
    pub settle_delay_ms: u64,

    /// "Show more" controls, in priority order
    pub show_more_selectors: Vec<String>,

    /// Tag searched by the text fallback
    pub fallback_tag: String,

    /// Phrase the fallback looks for, matched case-insensitively
    pub fallback_phrase: String,

    /// Selector for a rendered comment entry
    pub comment_selector: String,

    /// Best-effort wait for the first comment in seconds (default: 15)
    pub comment_wait_secs: u64,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            max_clicks: 10,
            settle_delay_ms: 1500,
            show_more_selectors: vec![
                "a.view_more_comment".to_string(),
                "a.view_more".to_string(),
                ".view_more_cmt a".to_string(),
                ".comment_more a".to_string(),
                "a.view-all-comment".to_string(),
                "a.view_all_comment".to_string(),
                "a.show_more_comment".to_string(),
                "a.view_all_reply".to_string(),
            ],
            fallback_tag: "a".to_string(),
            fallback_phrase: "xem thêm".to_string(),
            comment_selector: "#list_comment .comment_item, .comment_item".to_string(),
            comment_wait_secs: 15,
        }
    }
}

impl ExpanderConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn comment_wait(&self) -> Duration {
        Duration::from_secs(self.comment_wait_secs)
    }
}
