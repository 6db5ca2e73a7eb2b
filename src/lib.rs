//! # Harvester
//!
//! Download a VnExpress article through a browser session, expand its lazily
//! loaded comment threads, and dump the article and comments as JSON.
//!
//! ## Architecture
//!
//! Two stages connected only by the saved markup file:
//!
//! ```text
//! Fetcher → page.html → Extractor → JSON
//! ```
//!
//! - [`fetcher`]: loads the page, scrolls, clicks "show more" controls
//! - [`extractor`]: maps saved markup to [`Article`](domain::Article)
//!
//! ## Quick Start
//!
//! ```bash
//! # Download and extract (Selenium hub at SELENIUM_ENDPOINT)
//! harvester --url https://vnexpress.net/some-article-123.html
//!
//! # Re-extract an existing snapshot into a file
//! harvester --extract --html-file page.html --output article.json
//!
//! # Use a local Chromium instead of a WebDriver hub
//! harvester --download --browser chrome
//! ```

/// Error type and result alias.
pub mod app;

/// Browser automation capability.
///
/// - [`BrowserSession`](browser::BrowserSession): async trait the fetcher drives
/// - [`WebDriverSession`](browser::WebDriverSession): remote WebDriver via thirtyfour
/// - [`ChromeSession`](browser::ChromeSession): local Chromium via chromiumoxide
pub mod browser;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from TOML with environment overrides.
pub mod config;

/// Core domain models: [`Article`](domain::Article) and [`Comment`](domain::Comment).
pub mod domain;

/// CSS-selector field extraction over saved markup.
pub mod extractor;

/// Page loading and comment expansion.
pub mod fetcher;
