use std::sync::Arc;
use std::time::Duration;

use jt_core::{Article, Result, SeenStore};
use jt_delivery::Sink;
use jt_inference::{fallback_line, ScriptModel};
use tracing::{error, info, warn};

use crate::fetch::FeedFetcher;
use crate::filter::KeywordFilter;
use crate::sources::{default_sources, FeedSource};

/// How many articles go out per pass. The originals posted at most a
/// handful per run to avoid flooding the chat.
const DEFAULT_PER_RUN: usize = 3;

/// One pipeline instance: sources in, scripted deliveries out.
///
/// A run is strictly sequential. Failures are handled at the granularity
/// where they occur: a dead feed is skipped, a mute model gets a fallback
/// line, a failing sink is skipped. Only a delivered article is marked
/// seen, so anything that slipped through is retried next run.
pub struct Newsroom {
    sources: Vec<FeedSource>,
    fetcher: FeedFetcher,
    filter: KeywordFilter,
    store: Arc<dyn SeenStore>,
    model: Arc<dyn ScriptModel>,
    sinks: Vec<Arc<dyn Sink>>,
    per_run: usize,
    min_relevance: Option<u8>,
}

/// What one pass did, for the log line at the end.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RunReport {
    pub scanned_sources: usize,
    pub failed_sources: usize,
    pub fetched: usize,
    pub fresh: usize,
    pub skipped: usize,
    pub delivered: usize,
}

impl Newsroom {
    pub fn new(store: Arc<dyn SeenStore>, model: Arc<dyn ScriptModel>) -> Result<Self> {
        Ok(Self {
            sources: default_sources(),
            fetcher: FeedFetcher::new()?,
            filter: KeywordFilter::default(),
            store,
            model,
            sinks: Vec::new(),
            per_run: DEFAULT_PER_RUN,
            min_relevance: None,
        })
    }

    pub fn add_sink(&mut self, sink: Arc<dyn Sink>) {
        self.sinks.push(sink);
    }

    pub fn set_sources(&mut self, sources: Vec<FeedSource>) {
        self.sources = sources;
    }

    pub fn set_filter(&mut self, filter: KeywordFilter) {
        self.filter = filter;
    }

    pub fn set_fetcher(&mut self, fetcher: FeedFetcher) {
        self.fetcher = fetcher;
    }

    pub fn set_per_run(&mut self, per_run: usize) {
        self.per_run = per_run.max(1);
    }

    /// Score every candidate with the model and drop anything under the
    /// threshold (0-10). `None` delivers without scoring.
    pub fn set_min_relevance(&mut self, min_relevance: Option<u8>) {
        self.min_relevance = min_relevance;
    }

    pub fn sources(&self) -> &[FeedSource] {
        &self.sources
    }

    /// Fetch every source, skipping the ones that fail.
    pub async fn fetch_all(&self) -> (Vec<Article>, usize) {
        let mut articles = Vec::new();
        let mut failed = 0;
        for source in &self.sources {
            match self.fetcher.fetch(source).await {
                Ok(mut fetched) => articles.append(&mut fetched),
                Err(e) => {
                    warn!("📡 {} failed: {}", source.name, e);
                    failed += 1;
                }
            }
        }
        (articles, failed)
    }

    /// One full pass: fetch, filter, dedupe, score, script, deliver, flush.
    pub async fn run_once(&self) -> Result<RunReport> {
        info!("📡 Scanning {} sources...", self.sources.len());
        let (articles, failed_sources) = self.fetch_all().await;

        let mut report = RunReport {
            scanned_sources: self.sources.len(),
            failed_sources,
            fetched: articles.len(),
            ..Default::default()
        };
        self.process(articles, &mut report).await?;

        info!(
            "✅ Run complete: {} fetched, {} fresh, {} skipped, {} delivered",
            report.fetched, report.fresh, report.skipped, report.delivered
        );
        Ok(report)
    }

    /// The network-free half of a run, split out so tests can feed it
    /// hand-built articles.
    pub(crate) async fn process(
        &self,
        articles: Vec<Article>,
        report: &mut RunReport,
    ) -> Result<()> {
        let mut fresh = Vec::new();
        for article in articles {
            if !self.filter.matches(&article) {
                continue;
            }
            if self.store.contains(&article.link).await? {
                continue;
            }
            // The same story can show up in several feeds within one run.
            if fresh.iter().any(|a: &Article| a.link == article.link) {
                continue;
            }
            fresh.push(article);
        }
        report.fresh = fresh.len();
        info!("📊 {} fresh articles found", report.fresh);

        let mut slots = self.per_run;
        for article in fresh {
            if slots == 0 {
                break;
            }

            if let Some(min) = self.min_relevance {
                match self.model.extract(&article).await {
                    Ok(extraction) if extraction.relevance_score < min => {
                        info!(
                            "⏭️ Skipping {} (relevance {} < {})",
                            article.title, extraction.relevance_score, min
                        );
                        // A low score is a verdict, not a glitch: mark the
                        // link seen so it is not re-scored every run.
                        self.store.insert(&article.link).await?;
                        report.skipped += 1;
                        continue;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(
                            "🤖 {} scoring failed, delivering anyway: {}",
                            self.model.name(),
                            e
                        );
                    }
                }
            }
            slots -= 1;

            info!("✨ Scripting: {}", article.title);
            let script = match self.model.newsroom_script(&article).await {
                Ok(script) => script,
                Err(e) => {
                    warn!("🤖 {} model failed, using fallback: {}", self.model.name(), e);
                    fallback_line(&article)
                }
            };

            let mut delivered = false;
            for sink in &self.sinks {
                match sink.deliver(&article, &script).await {
                    Ok(()) => delivered = true,
                    Err(e) => warn!("📤 {} delivery failed: {}", sink.name(), e),
                }
            }

            if delivered {
                self.store.insert(&article.link).await?;
                report.delivered += 1;
            }
        }

        self.store.flush().await?;
        Ok(())
    }

    /// Poll forever. A failing run is logged and the loop keeps going.
    pub async fn watch(&self, interval: Duration) -> Result<()> {
        info!("🔁 Watching every {}s", interval.as_secs());
        loop {
            if let Err(e) = self.run_once().await {
                error!("❌ Run failed: {}", e);
            }
            tokio::time::sleep(interval).await;
        }
    }
}
