//! Field extraction from saved VnExpress article markup.
//!
//! Every field is optional on the page. A selector with no match yields an
//! empty string or list, so the result always has the full [`Article`]
//! shape.

use scraper::{ElementRef, Html, Selector};

use crate::app::{HarvestError, Result};
use crate::browser::normalize_whitespace;
use crate::domain::{Article, Comment};

pub const TITLE: &str = "h1.title-detail";
pub const DESCRIPTION: &str = "p.description";
pub const PUBLISHED_AT: &str = "span.date";
pub const AUTHOR: &str = "p.Normal strong, p.author_mail strong";
/// The lead paragraph shares the article container but is not body text
pub const BODY: &str = "article.fck_detail p:not(.description)";
pub const TAGS: &str = "footer .tag_item a, div.list-tag a";

pub const COMMENT_ITEM: &str = "#list_comment .comment_item, .comment_item";
pub const COMMENT_AUTHOR: &str = ".nickname, .txt-name";
pub const COMMENT_CONTENT: &str = "p.full_content, p.content_more, p.content_less";
pub const COMMENT_TIME: &str = ".time-com";

/// Compiled selectors for the article and comment fields
pub struct Extractor {
    title: Selector,
    description: Selector,
    published_at: Selector,
    author: Selector,
    body: Selector,
    tags: Selector,
    comment_item: Selector,
    comment_author: Selector,
    comment_content: Selector,
    comment_time: Selector,
}

impl Extractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            title: compile(TITLE)?,
            description: compile(DESCRIPTION)?,
            published_at: compile(PUBLISHED_AT)?,
            author: compile(AUTHOR)?,
            body: compile(BODY)?,
            tags: compile(TAGS)?,
            comment_item: compile(COMMENT_ITEM)?,
            comment_author: compile(COMMENT_AUTHOR)?,
            comment_content: compile(COMMENT_CONTENT)?,
            comment_time: compile(COMMENT_TIME)?,
        })
    }

    /// Parse `html` and extract the article together with its comments
    pub fn extract(&self, html: &str, url: &str) -> Article {
        let document = Html::parse_document(html);
        let mut article = self.extract_article(&document, url);
        article.comments = self.extract_comments(&document);
        article
    }

    /// Article fields, without comments
    pub fn extract_article(&self, document: &Html, url: &str) -> Article {
        Article {
            url: url.to_string(),
            title: first_text(document.select(&self.title)),
            description: first_text(document.select(&self.description)),
            published_at: first_text(document.select(&self.published_at)),
            author: first_text(document.select(&self.author)),
            body: document
                .select(&self.body)
                .map(trimmed_text)
                .filter(|p| !p.is_empty())
                .collect(),
            tags: document.select(&self.tags).map(trimmed_text).collect(),
            comments: Vec::new(),
        }
    }

    /// Every comment item in document order, replies included as siblings
    pub fn extract_comments(&self, document: &Html) -> Vec<Comment> {
        document
            .select(&self.comment_item)
            .map(|item| Comment {
                author: first_text(item.select(&self.comment_author)),
                content: item
                    .select(&self.comment_content)
                    .next()
                    .map(spaced_text)
                    .unwrap_or_default(),
                time: first_text(item.select(&self.comment_time)),
            })
            .filter(|comment| !comment.is_blank())
            .collect()
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| HarvestError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn first_text<'a>(mut matches: impl Iterator<Item = ElementRef<'a>>) -> String {
    matches.next().map(trimmed_text).unwrap_or_default()
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text nodes joined by spaces with whitespace runs collapsed
fn spaced_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}
