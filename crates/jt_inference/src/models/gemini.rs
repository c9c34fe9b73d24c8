use std::fmt;

use async_trait::async_trait;
use jt_core::{Article, Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{extraction_prompt, newsroom_prompt, Extraction, ScriptModel};

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Gemini over the generativelanguage HTTP API.
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiModel {
    pub fn new(api_key: Option<String>, model: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Inference("Gemini API key is required".to_string()))?;
        Ok(Self {
            client: Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent?key={}",
                self.base_url, self.model, self.api_key
            ))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        let text = response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Inference("Gemini returned an empty response".to_string()))?;

        Ok(text)
    }
}

impl fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiModel")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl ScriptModel for GeminiModel {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn newsroom_script(&self, article: &Article) -> Result<String> {
        self.generate(newsroom_prompt(article)).await
    }

    async fn extract(&self, article: &Article) -> Result<Extraction> {
        let text = self.generate(extraction_prompt(article)).await?;
        Ok(Extraction::from_model_response(&text, article))
    }
}
