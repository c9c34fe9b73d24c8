use async_trait::async_trait;
use jt_core::{Article, Result};

use crate::Sink;

/// Prints deliveries to stdout. This is what `--dry-run` swaps in for
/// Telegram.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn deliver(&self, article: &Article, script: &str) -> Result<()> {
        println!("--------------------------------------------------");
        println!("📰 {} — {}", article.source, article.title);
        println!("🔗 {}", article.link);
        println!();
        println!("{}", script);
        Ok(())
    }

    async fn broadcast(&self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}
