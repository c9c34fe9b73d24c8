use async_trait::async_trait;
use jt_core::{Article, Result};

pub mod console;
pub mod digest;
pub mod telegram;

pub use console::ConsoleSink;
pub use digest::{build_digest, QUIET_DIGEST};
pub use telegram::TelegramSink;

/// Somewhere finished items go. A sink failure never aborts the run; the
/// pipeline logs it and moves on to the next sink or item.
#[async_trait]
pub trait Sink: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one scripted article.
    async fn deliver(&self, article: &Article, script: &str) -> Result<()>;

    /// Send a standalone text, e.g. the daily digest.
    async fn broadcast(&self, text: &str) -> Result<()>;
}
