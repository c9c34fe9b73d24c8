use chrono::{DateTime, Duration, Utc};
use jt_core::Article;

/// Sent instead of a digest when the window came up empty.
pub const QUIET_DIGEST: &str =
    "☕ Rien de neuf dans le monde de la 3D ces dernières 24h.";

/// Build the recap message for everything published inside the window.
///
/// Items with no publication date cannot qualify. Returns `None` when
/// nothing qualifies; the caller decides whether to send `QUIET_DIGEST`.
pub fn build_digest(
    articles: &[Article],
    window: Duration,
    now: DateTime<Utc>,
) -> Option<String> {
    let cutoff = now - window;
    let recent: Vec<&Article> = articles
        .iter()
        .filter(|a| a.published_at.map(|d| d > cutoff).unwrap_or(false))
        .collect();

    if recent.is_empty() {
        return None;
    }

    let mut message = String::from("🤖 *RÉCAP IMPRESSION 3D*\n\n");
    for article in recent {
        message.push_str(&format!(
            "📍 *{}*\n👉 {}\n[Lien vers l'actu]({})\n\n",
            article.source, article.title, article.link
        ));
    }
    Some(message)
}
