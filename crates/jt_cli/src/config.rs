use std::path::Path;

use jt_core::{Error, Result};
use jt_feeds::FeedSource;
use serde::{Deserialize, Serialize};

/// Runtime configuration: an optional JSON file, then environment
/// overrides on top. Secrets only ever come from the file or the
/// environment, never from CLI arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub gemini: GeminiConfig,
    pub ollama: OllamaConfig,
    /// Replaces the builtin keyword list when set.
    pub keywords: Option<Vec<String>>,
    /// Replaces the builtin source catalog when set.
    pub sources: Option<Vec<FeedSource>>,
    /// Entries read per feed per poll.
    pub per_feed: Option<usize>,
    /// Drop articles the model scores below this (0-10). Off when unset.
    pub min_relevance: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub chat_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: Option<String>,
    pub model: Option<String>,
}

impl Config {
    /// Load the config file if one was given, then apply env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    Error::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                serde_json::from_slice(&bytes)
                    .map_err(|e| Error::Config(format!("invalid {}: {}", path.display(), e)))?
            }
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok().filter(|v| !v.is_empty()));
        Ok(config)
    }

    fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(token) = get("TELEGRAM_BOT_TOKEN") {
            self.telegram.token = Some(token);
        }
        if let Some(ids) = get("TELEGRAM_CHAT_IDS") {
            self.telegram.chat_ids = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(host) = get("OLLAMA_HOST") {
            self.ollama.host = Some(host);
        }
        if let Some(model) = get("OLLAMA_MODEL") {
            self.ollama.model = Some(model);
        }
    }

    pub fn inference(&self) -> jt_inference::Config {
        jt_inference::Config {
            gemini_api_key: self.gemini.api_key.clone(),
            gemini_model: self.gemini.model.clone(),
            ollama_host: self.ollama.host.clone(),
            ollama_model: self.ollama.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "telegram": {"token": "123:abc", "chat_ids": ["1", "2"]},
                "ollama": {"model": "llama3"},
                "keywords": ["voron"],
                "per_feed": 2,
                "min_relevance": 5
            }"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.telegram.chat_ids, vec!["1", "2"]);
        assert_eq!(config.ollama.model.as_deref(), Some("llama3"));
        assert_eq!(config.keywords, Some(vec!["voron".to_string()]));
        assert_eq!(config.per_feed, Some(2));
        assert_eq!(config.min_relevance, Some(5));
        assert!(config.sources.is_none());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/config.json"))).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config {
            telegram: TelegramConfig {
                token: Some("from-file".to_string()),
                chat_ids: vec!["9".to_string()],
            },
            ..Default::default()
        };

        config.apply_env(|name| match name {
            "TELEGRAM_BOT_TOKEN" => Some("from-env".to_string()),
            "TELEGRAM_CHAT_IDS" => Some("1, 2, ,3".to_string()),
            "GEMINI_API_KEY" => Some("gkey".to_string()),
            _ => None,
        });

        assert_eq!(config.telegram.token.as_deref(), Some("from-env"));
        assert_eq!(config.telegram.chat_ids, vec!["1", "2", "3"]);
        assert_eq!(config.gemini.api_key.as_deref(), Some("gkey"));
    }

    #[test]
    fn test_env_absent_keeps_file_values() {
        let mut config = Config {
            telegram: TelegramConfig {
                token: Some("from-file".to_string()),
                chat_ids: vec!["9".to_string()],
            },
            ..Default::default()
        };
        config.apply_env(|_| None);
        assert_eq!(config.telegram.token.as_deref(), Some("from-file"));
        assert_eq!(config.telegram.chat_ids, vec!["9"]);
    }
}
