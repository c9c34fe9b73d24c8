use std::sync::Arc;

use async_trait::async_trait;
use jt_core::{Article, Error, Result};
use serde::{Deserialize, Serialize};

pub mod gemini;
pub mod ollama;
pub mod template;

pub use gemini::GeminiModel;
pub use ollama::OllamaModel;
pub use template::TemplateModel;

/// A generative backend that turns an article into a short newsroom script
/// and can pull structured facts out of it.
#[async_trait]
pub trait ScriptModel: Send + Sync {
    fn name(&self) -> &str;

    /// Write the presenter dialogue for one article.
    async fn newsroom_script(&self, article: &Article) -> Result<String>;

    /// Extract a summary, keywords and a relevance score from an article.
    async fn extract(&self, article: &Article) -> Result<Extraction>;
}

/// Structured facts extracted from an article. `relevance_score` is 0..=10.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Extraction {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_relevance")]
    pub relevance_score: u8,
}

fn default_relevance() -> u8 {
    5
}

impl Extraction {
    /// Parse a model response that is supposed to contain a JSON object.
    ///
    /// Models wrap JSON in prose more often than not, so the outermost
    /// `{...}` span is scanned out of the text first. Anything unparseable
    /// falls back to an extraction built from the article itself.
    pub fn from_model_response(text: &str, article: &Article) -> Self {
        if let Some(json) = scan_json_object(text) {
            if let Ok(mut extraction) = serde_json::from_str::<Extraction>(json) {
                extraction.relevance_score = extraction.relevance_score.min(10);
                if extraction.summary.is_empty() {
                    extraction.summary = truncated_summary(article);
                }
                return extraction;
            }
        }
        Self::fallback(article)
    }

    /// What the pipeline uses when the model is unreachable or talks junk.
    pub fn fallback(article: &Article) -> Self {
        Self {
            summary: truncated_summary(article),
            keywords: vec!["3d printing".to_string(), "innovation".to_string()],
            relevance_score: 5,
        }
    }
}

fn truncated_summary(article: &Article) -> String {
    let text = if article.summary.is_empty() {
        &article.title
    } else {
        &article.summary
    };
    text.chars().take(200).collect()
}

/// Find the outermost `{...}` span in a blob of model output.
pub(crate) fn scan_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// The shared newsroom prompt. The cast and their roles come from the show
/// format; models only fill in the dialogue.
pub(crate) fn newsroom_prompt(article: &Article) -> String {
    format!(
        "Rédige un script de JT court et dynamique (45 secondes).\n\n\
         INFO : {}\n\
         SOURCE : {}\n\
         RÉSUMÉ : {}\n\n\
         Présentatrices :\n\
         - KATE (directe, lance le scoop avec énergie)\n\
         - ANGIE (calme, vérifie les faits)\n\
         - ÉLISE (geek, traduit si la source est étrangère)\n\
         - LÉA (enthousiaste, conclut en invitant les abonnés à partager leurs impressions)\n\n\
         Format : une réplique par ligne, \"Nom : texte\".",
        article.title, article.source, article.summary
    )
}

/// The extraction prompt asks for JSON only; see `Extraction::from_model_response`
/// for how forgiving the parse actually is.
pub(crate) fn extraction_prompt(article: &Article) -> String {
    format!(
        "Analyze this 3D printing news item and extract key information.\n\n\
         Title: {}\n\
         Content: {}\n\n\
         Respond with a JSON object only, with fields:\n\
         \"summary\" (2-3 sentences), \"keywords\" (5-7 strings),\n\
         \"relevance_score\" (integer 0-10).",
        article.title,
        article.summary.chars().take(500).collect::<String>()
    )
}

/// Build a model backend by name.
pub fn create_model(kind: &str, config: &crate::Config) -> Result<Arc<dyn ScriptModel>> {
    match kind {
        "gemini" => Ok(Arc::new(GeminiModel::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        )?)),
        "ollama" => Ok(Arc::new(OllamaModel::new(
            config.ollama_host.clone(),
            config.ollama_model.clone(),
        ))),
        "template" => Ok(Arc::new(TemplateModel::new())),
        other => Err(Error::Inference(format!(
            "unknown model: {} (expected gemini, ollama or template)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> Article {
        Article::new("Hackaday", "A new toolchanger", "https://example.com/tc")
            .with_summary("A toolchanger built from printed parts.")
    }

    #[test]
    fn test_scan_json_object() {
        assert_eq!(scan_json_object(r#"noise {"a": 1} trailer"#), Some(r#"{"a": 1}"#));
        assert_eq!(
            scan_json_object(r#"{"outer": {"inner": 2}}"#),
            Some(r#"{"outer": {"inner": 2}}"#)
        );
        assert_eq!(scan_json_object("no braces here"), None);
        assert_eq!(scan_json_object("} reversed {"), None);
    }

    #[test]
    fn test_extraction_from_clean_json() {
        let text = r#"{"summary": "Short.", "keywords": ["a", "b"], "relevance_score": 8}"#;
        let extraction = Extraction::from_model_response(text, &article());
        assert_eq!(extraction.summary, "Short.");
        assert_eq!(extraction.keywords, vec!["a", "b"]);
        assert_eq!(extraction.relevance_score, 8);
    }

    #[test]
    fn test_extraction_from_wrapped_json() {
        let text = "Sure! Here you go:\n{\"summary\": \"Short.\", \"relevance_score\": 3}\nHope it helps.";
        let extraction = Extraction::from_model_response(text, &article());
        assert_eq!(extraction.summary, "Short.");
        assert_eq!(extraction.relevance_score, 3);
        assert!(extraction.keywords.is_empty());
    }

    #[test]
    fn test_extraction_score_is_clamped() {
        let text = r#"{"summary": "s", "relevance_score": 99}"#;
        let extraction = Extraction::from_model_response(text, &article());
        assert_eq!(extraction.relevance_score, 10);
    }

    #[test]
    fn test_extraction_fallback_on_junk() {
        let extraction = Extraction::from_model_response("I cannot do that.", &article());
        assert_eq!(extraction, Extraction::fallback(&article()));
        assert!(extraction.summary.starts_with("A toolchanger"));
        assert_eq!(extraction.relevance_score, 5);
    }

    #[test]
    fn test_fallback_uses_title_when_no_summary() {
        let bare = Article::new("Prusa", "MK5 announced", "https://example.com/mk5");
        let extraction = Extraction::fallback(&bare);
        assert_eq!(extraction.summary, "MK5 announced");
    }

    #[test]
    fn test_create_model() {
        let config = crate::Config {
            gemini_api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert_eq!(create_model("template", &config).unwrap().name(), "template");
        assert_eq!(create_model("gemini", &config).unwrap().name(), "gemini");
        assert_eq!(create_model("ollama", &config).unwrap().name(), "ollama");
        assert!(create_model("gpt9", &config).is_err());
    }

    #[test]
    fn test_gemini_requires_key() {
        let config = crate::Config::default();
        assert!(create_model("gemini", &config).is_err());
    }
}
