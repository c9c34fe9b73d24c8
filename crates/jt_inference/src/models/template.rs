use async_trait::async_trait;
use jt_core::{Article, Result};

use super::{Extraction, ScriptModel};

/// Offline model. Builds the script straight from the article fields, so the
/// pipeline works with no API key and no local model running.
#[derive(Debug, Default)]
pub struct TemplateModel;

impl TemplateModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScriptModel for TemplateModel {
    fn name(&self) -> &str {
        "template"
    }

    async fn newsroom_script(&self, article: &Article) -> Result<String> {
        let recap = if article.summary.is_empty() {
            "les détails arrivent".to_string()
        } else {
            article.summary.chars().take(200).collect()
        };
        Ok(format!(
            "Kate : Gros scoop du côté de {} : {} !\n\
             Angie : On a vérifié, voici ce qu'on sait : {}\n\
             Élise : La source complète est ici : {}\n\
             Léa : Et vous, partagez vos impressions en commentaire !",
            article.source, article.title, recap, article.link
        ))
    }

    async fn extract(&self, article: &Article) -> Result<Extraction> {
        Ok(Extraction::fallback(article))
    }
}

/// The one-liner delivered when a remote model failed mid-run. The headline
/// still goes out, just without the staged dialogue.
pub fn fallback_line(article: &Article) -> String {
    format!(
        "Kate : On a un souci technique, mais l'info est là : {}",
        article.title
    )
}
