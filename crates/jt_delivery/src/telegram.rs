use std::fmt;

use async_trait::async_trait;
use jt_core::{Article, Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Sink;

const API_BASE: &str = "https://api.telegram.org";

// Telegram rejects messages longer than this.
const MAX_MESSAGE_LEN: usize = 4096;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Posts to one or more Telegram chats through the Bot API.
///
/// Fan-out is per chat: a failing chat id is logged and skipped, and the
/// delivery only errors when every chat failed.
pub struct TelegramSink {
    client: Client,
    token: String,
    chat_ids: Vec<String>,
    base_url: String,
}

impl TelegramSink {
    pub fn new(token: impl Into<String>, chat_ids: Vec<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::Delivery("Telegram bot token is required".to_string()));
        }
        if chat_ids.is_empty() {
            return Err(Error::Delivery(
                "at least one Telegram chat id is required".to_string(),
            ));
        }
        Ok(Self {
            client: Client::new(),
            token,
            chat_ids,
            base_url: API_BASE.to_string(),
        })
    }

    /// Point the sink at a self-hosted Bot API server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn send_to_chat(&self, chat_id: &str, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: false,
        };

        let response = self
            .client
            .post(format!("{}/bot{}/sendMessage", self.base_url, self.token))
            .json(&payload)
            .send()
            .await?
            .json::<ApiResponse>()
            .await?;

        if !response.ok {
            return Err(Error::Delivery(format!(
                "Telegram rejected the message: {}",
                response.description.as_deref().unwrap_or("no description")
            )));
        }
        Ok(())
    }

    async fn fan_out(&self, text: &str) -> Result<()> {
        let text = truncate_message(text);
        let mut failures = 0;
        for chat_id in &self.chat_ids {
            if let Err(e) = self.send_to_chat(chat_id, &text).await {
                warn!("❌ Telegram send to {} failed: {}", chat_id, e);
                failures += 1;
            }
        }
        if failures == self.chat_ids.len() {
            return Err(Error::Delivery("all Telegram chats failed".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for TelegramSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSink")
            .field("token", &"<redacted>")
            .field("chat_ids", &self.chat_ids.len())
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl Sink for TelegramSink {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn deliver(&self, article: &Article, script: &str) -> Result<()> {
        self.fan_out(&format_message(article, script)).await
    }

    async fn broadcast(&self, text: &str) -> Result<()> {
        self.fan_out(text).await
    }
}

/// The message layout used for every scripted article.
pub fn format_message(article: &Article, script: &str) -> String {
    format!(
        "📺 *JT IMPRESSION 3D*\n\n\
         {}\n\n\
         🔗 [Source : {}]({})\n\
         🌍 _Script généré par la rédaction_",
        script, article.source, article.link
    )
}

fn truncate_message(text: &str) -> String {
    if text.chars().count() <= MAX_MESSAGE_LEN {
        text.to_string()
    } else {
        text.chars().take(MAX_MESSAGE_LEN).collect()
    }
}
