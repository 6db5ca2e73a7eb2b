//! Scripted in-memory session for exercising the fetcher without a browser.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::app::{HarvestError, Result};
use crate::browser::{BrowserSession, Locator};

/// A clickable control on the fake page.
#[derive(Debug, Clone)]
pub(crate) struct FakeControl {
    pub selector: Option<String>,
    pub tag: String,
    pub text: String,
    pub visible: bool,
    pub broken: bool,
    /// Successful clicks before the control disappears
    pub remaining: u32,
}

impl FakeControl {
    pub fn css(selector: &str, clicks: u32) -> Self {
        Self {
            selector: Some(selector.to_string()),
            tag: "a".to_string(),
            text: String::new(),
            visible: true,
            broken: false,
            remaining: clicks,
        }
    }

    pub fn text(tag: &str, text: &str, clicks: u32) -> Self {
        Self {
            selector: None,
            tag: tag.to_string(),
            text: text.to_string(),
            visible: true,
            broken: false,
            remaining: clicks,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeSession {
    pub controls: Vec<FakeControl>,
    present: HashMap<String, (usize, u32)>,
    pub source: String,
    pub fail_navigation: bool,
    count_errors: HashMap<String, String>,
    pub navigated: Vec<String>,
    pub scrolls: u32,
    /// Indexes into `controls`, in click order
    pub clicks: Vec<usize>,
    pub pauses: Vec<Duration>,
    pub count_calls: u32,
    pub close_calls: u32,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_control(mut self, control: FakeControl) -> Self {
        self.controls.push(control);
        self
    }

    pub fn with_present(self, selector: &str, count: usize) -> Self {
        self.with_present_after(selector, count, 0)
    }

    /// `selector` reports `count` matches once `count` has been queried
    /// `after_calls` times.
    pub fn with_present_after(mut self, selector: &str, count: usize, after_calls: u32) -> Self {
        self.present.insert(selector.to_string(), (count, after_calls));
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    /// `count` on `selector` fails with a browser error
    pub fn failing_count(mut self, selector: &str, message: &str) -> Self {
        self.count_errors
            .insert(selector.to_string(), message.to_string());
        self
    }

    pub fn is_closed(&self) -> bool {
        self.close_calls > 0
    }

    fn matches(control: &FakeControl, locator: &Locator) -> bool {
        if control.remaining == 0 {
            return false;
        }
        match locator {
            Locator::Css(selector) => control.selector.as_deref() == Some(selector.as_str()),
            Locator::Text { tag, .. } => control.tag == *tag && locator.matches_text(&control.text),
        }
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Element = usize;

    async fn navigate(&mut self, url: &str) -> Result<()> {
        if self.fail_navigation {
            return Err(HarvestError::Browser(format!("Navigation failed: {}", url)));
        }
        self.navigated.push(url.to_string());
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.scrolls += 1;
        Ok(())
    }

    async fn find(&mut self, locator: &Locator) -> Result<Vec<usize>> {
        Ok(self
            .controls
            .iter()
            .enumerate()
            .filter(|(_, control)| Self::matches(control, locator))
            .map(|(index, _)| index)
            .collect())
    }

    async fn is_interactable(&mut self, element: &usize) -> bool {
        self.controls.get(*element).is_some_and(|c| c.visible)
    }

    async fn click(&mut self, element: &usize) -> Result<()> {
        let control = self
            .controls
            .get_mut(*element)
            .ok_or_else(|| HarvestError::Browser("stale element".into()))?;
        if control.broken {
            return Err(HarvestError::Browser("element is not clickable".into()));
        }
        control.remaining = control.remaining.saturating_sub(1);
        self.clicks.push(*element);
        Ok(())
    }

    async fn count(&mut self, selector: &str) -> Result<usize> {
        self.count_calls += 1;
        if let Some(message) = self.count_errors.get(selector) {
            return Err(HarvestError::Browser(message.clone()));
        }
        match self.present.get_mut(selector) {
            Some((count, 0)) => Ok(*count),
            Some((_, after)) => {
                *after -= 1;
                Ok(0)
            }
            None => Ok(0),
        }
    }

    async fn page_source(&mut self) -> Result<String> {
        Ok(self.source.clone())
    }

    async fn close(&mut self) -> Result<()> {
        self.close_calls += 1;
        Ok(())
    }

    async fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}
