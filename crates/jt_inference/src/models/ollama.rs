use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use jt_core::{Article, Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{extraction_prompt, newsroom_prompt, Extraction, ScriptModel};

const DEFAULT_HOST: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "phi3:3.8b";

// Local models on modest hardware can take minutes per request.
const REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// A model served by a local Ollama instance.
pub struct OllamaModel {
    client: Client,
    host: String,
    model: String,
}

impl OllamaModel {
    pub fn new(host: Option<String>, model: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            host: host
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            model: model
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.host))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Inference(format!(
                "Ollama returned {}",
                response.status()
            )));
        }

        let body = response.json::<GenerateResponse>().await?;
        let text = body.response.trim().to_string();
        if text.is_empty() {
            return Err(Error::Inference("Ollama returned an empty response".to_string()));
        }
        Ok(text)
    }
}

impl fmt::Debug for OllamaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaModel")
            .field("host", &self.host)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl ScriptModel for OllamaModel {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn newsroom_script(&self, article: &Article) -> Result<String> {
        self.generate(&newsroom_prompt(article)).await
    }

    async fn extract(&self, article: &Article) -> Result<Extraction> {
        match self.generate(&extraction_prompt(article)).await {
            Ok(text) => Ok(Extraction::from_model_response(&text, article)),
            Err(e) => {
                tracing::warn!("⚠️ Ollama extraction failed: {}", e);
                Ok(Extraction::fallback(article))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let model = OllamaModel::new(None, None);
        assert_eq!(model.host, DEFAULT_HOST);
        assert_eq!(model.model, DEFAULT_MODEL);

        let model = OllamaModel::new(
            Some("http://gpu-box:11434".to_string()),
            Some("llama3".to_string()),
        );
        assert_eq!(model.host, "http://gpu-box:11434");
        assert_eq!(model.model, "llama3");
    }

    #[test]
    fn test_empty_strings_fall_back_to_defaults() {
        let model = OllamaModel::new(Some(String::new()), Some(String::new()));
        assert_eq!(model.host, DEFAULT_HOST);
        assert_eq!(model.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"model": "phi3:3.8b", "response": "Kate : Scoop !", "done": true}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.response, "Kate : Scoop !");
    }
}
