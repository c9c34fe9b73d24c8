use jt_core::Article;

/// Case-insensitive keyword match over title + summary. An empty keyword
/// list matches everything, which is what a single-topic source list wants.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// The topic list used by the builtin catalog.
    pub fn default_keywords() -> Vec<String> {
        [
            "3d", "printing", "impression", "imprimante", "fdm", "résine", "resin", "sla",
            "klipper", "voron", "bambu", "creality", "prusa", "filament",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    pub fn matches(&self, article: &Article) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let haystack = format!("{} {}", article.title, article.summary).to_lowercase();
        self.keywords.iter().any(|k| haystack.contains(k))
    }
}

impl Default for KeywordFilter {
    fn default() -> Self {
        Self::new(Self::default_keywords())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, summary: &str) -> Article {
        Article::new("src", title, "https://example.com/x").with_summary(summary)
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let filter = KeywordFilter::default();
        assert!(filter.matches(&article("New KLIPPER release", "")));
        assert!(filter.matches(&article("Benchy time", "printed on a Voron")));
        assert!(!filter.matches(&article("Baking bread", "sourdough starter tips")));
    }

    #[test]
    fn test_match_looks_at_summary_too() {
        let filter = KeywordFilter::new(vec!["resin".to_string()]);
        assert!(filter.matches(&article("Weekend project", "cleaning Resin prints safely")));
        assert!(!filter.matches(&article("Weekend project", "wood carving")));
    }

    #[test]
    fn test_empty_keywords_match_everything() {
        let filter = KeywordFilter::new(vec![]);
        assert!(filter.matches(&article("anything", "at all")));
    }
}
