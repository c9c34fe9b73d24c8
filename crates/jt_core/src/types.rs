use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single feed item, as flattened out of an RSS/Atom entry.
///
/// `link` is the identity used for dedupe; two items with the same link are
/// the same article no matter which feed they came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub source: String,
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            link: link.into(),
            summary: String::new(),
            published_at: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_builder() {
        let article = Article::new("Hackaday", "New hotend", "https://example.com/1")
            .with_summary("A summary");
        assert_eq!(article.source, "Hackaday");
        assert_eq!(article.summary, "A summary");
        assert!(article.published_at.is_none());
    }

    #[test]
    fn test_article_roundtrip() {
        let article = Article::new("Prusa", "MK5", "https://example.com/mk5")
            .with_published_at(Utc::now());
        let json = serde_json::to_string(&article).unwrap();
        let back: Article = serde_json::from_str(&json).unwrap();
        assert_eq!(back, article);
    }
}
