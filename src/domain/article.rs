use serde::{Deserialize, Serialize};

/// A single article as extracted from a saved page.
///
/// Field order is the serialized order; keep it stable so repeated
/// extractions produce identical JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub description: String,
    /// Free text as rendered on the page, never parsed.
    pub published_at: String,
    pub author: String,
    pub body: Vec<String>,
    pub tags: Vec<String>,
    pub comments: Vec<Comment>,
}

impl Article {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Render as pretty JSON with non-ASCII characters kept literal.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub content: String,
    pub time: String,
}

impl Comment {
    /// Structural noise matched by the item selector has neither an author
    /// nor any content.
    pub fn is_blank(&self) -> bool {
        self.author.is_empty() && self.content.is_empty()
    }
}
