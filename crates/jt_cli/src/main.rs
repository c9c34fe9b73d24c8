use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use jt_core::{Error, Result};
use jt_delivery::{build_digest, ConsoleSink, Sink, TelegramSink, QUIET_DIGEST};
use jt_feeds::{FeedFetcher, KeywordFilter, Newsroom};
use tracing::info;

mod config;
mod duration;

use config::Config;
use duration::HumanDuration;

#[derive(Parser, Debug)]
#[command(name = "jt3d", version, about = "3D-printing news pipeline: poll feeds, dedupe, script, deliver")]
struct Cli {
    /// Optional JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seen-link store: memory, json:<path> or sqlite:<path>
    #[arg(long, default_value = "json:articles_seen.json")]
    store: String,

    /// Script model: template, gemini or ollama
    #[arg(long, default_value = "template")]
    model: String,

    /// Print deliveries to stdout instead of posting to Telegram
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one pipeline pass
    Run {
        /// Maximum articles delivered per pass
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
    /// Poll forever at a fixed interval
    Watch {
        /// e.g. 1h, 30m, 1h15m30s; a bare number is seconds
        #[arg(long, default_value = "1h")]
        interval: HumanDuration,
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
    /// Send a recap of everything published in the last N hours
    Digest {
        #[arg(long, default_value_t = 24)]
        hours: i64,
    },
    /// List the feed catalog
    Sources,
}

fn make_sink(cli: &Cli, config: &Config) -> Result<Arc<dyn Sink>> {
    if cli.dry_run {
        return Ok(Arc::new(ConsoleSink::new()));
    }
    let token = config.telegram.token.clone().ok_or_else(|| {
        Error::Config(
            "no Telegram token configured (set TELEGRAM_BOT_TOKEN or use --dry-run)".to_string(),
        )
    })?;
    Ok(Arc::new(TelegramSink::new(
        token,
        config.telegram.chat_ids.clone(),
    )?))
}

/// Every command that polls feeds goes through here so config tuning
/// applies uniformly.
fn make_fetcher(config: &Config) -> Result<FeedFetcher> {
    let mut fetcher = FeedFetcher::new()?;
    if let Some(per_feed) = config.per_feed {
        fetcher = fetcher.with_per_feed(per_feed);
    }
    Ok(fetcher)
}

async fn build_newsroom(cli: &Cli, config: &Config, limit: usize) -> Result<Newsroom> {
    let store = jt_storage::create_store(&cli.store).await?;
    info!("💾 Store ready ({}, {} links known)", cli.store, store.len().await?);

    let model = jt_inference::create_model(&cli.model, &config.inference())?;
    info!("🧠 Script model ready ({})", model.name());

    let mut room = Newsroom::new(store, model)?;
    room.add_sink(make_sink(cli, config)?);
    if let Some(sources) = &config.sources {
        room.set_sources(sources.clone());
    }
    if let Some(keywords) = &config.keywords {
        room.set_filter(KeywordFilter::new(keywords.clone()));
    }
    room.set_fetcher(make_fetcher(config)?);
    room.set_min_relevance(config.min_relevance);
    room.set_per_run(limit);
    info!("📰 Newsroom ready ({} sources)", room.sources().len());
    Ok(room)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Run { limit } => {
            let room = build_newsroom(&cli, &config, *limit).await?;
            room.run_once().await?;
        }
        Commands::Watch { interval, limit } => {
            let room = build_newsroom(&cli, &config, *limit).await?;
            room.watch(interval.0).await?;
        }
        Commands::Digest { hours } => {
            let sink = make_sink(&cli, &config)?;
            let sources = config
                .sources
                .clone()
                .unwrap_or_else(jt_feeds::default_sources);
            let fetcher = make_fetcher(&config)?;

            info!("📡 Building digest from {} sources...", sources.len());
            let mut articles = Vec::new();
            let mut failed = 0;
            for source in &sources {
                match fetcher.fetch(source).await {
                    Ok(mut fetched) => articles.append(&mut fetched),
                    Err(e) => {
                        tracing::warn!("📡 {} failed: {}", source.name, e);
                        failed += 1;
                    }
                }
            }
            info!("📊 {} articles fetched ({} sources failed)", articles.len(), failed);

            let window = chrono::Duration::hours(*hours);
            match build_digest(&articles, window, chrono::Utc::now()) {
                Some(digest) => sink.broadcast(&digest).await?,
                None => sink.broadcast(QUIET_DIGEST).await?,
            }
        }
        Commands::Sources => {
            let sources = config
                .sources
                .clone()
                .unwrap_or_else(jt_feeds::default_sources);
            for source in sources {
                println!("{} — {}", source.name, source.url);
            }
        }
    }

    Ok(())
}
