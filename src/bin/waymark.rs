//! Headless sampling agent binary.
//!
//! Loads config, generates the session identity, installs the offline asset
//! cache when enabled, renders previously stored samples, then hands off to
//! the minute-aligned scheduler. The display table goes to stdout; all
//! tracing output goes to stderr.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use waymark::acquire::Acquirer;
use waymark::assets::AssetCache;
use waymark::display::{DisplaySink, TextTableSink};
use waymark::store::{PostgrestStore, SampleStore};
use waymark::{Scheduler, Session, SyncPipeline, TrackConfig, bootstrap};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Tracing to stderr only; stdout is reserved for the display table.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var_os("WAYMARK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(TrackConfig::default_config_path);
    let config = if config_path.is_file() {
        tracing::info!(path = %config_path.display(), "loading config");
        TrackConfig::from_file(&config_path)?
    } else {
        tracing::info!(path = %config_path.display(), "no config file; using defaults");
        TrackConfig::default()
    };

    let mut session = Session::new();
    tracing::info!(session_id = %session.id(), "session started");

    if config.cache.enabled {
        let cache = AssetCache::new(&config.cache)?;
        if let Err(e) = cache.install().await {
            tracing::warn!(error = %e, "asset cache install failed; continuing without it");
        }
    }

    let store: Arc<dyn SampleStore> = Arc::new(PostgrestStore::new(&config.store)?);
    let mut sink: Box<dyn DisplaySink> = Box::new(TextTableSink::stdout());

    bootstrap::load_existing(store.as_ref(), sink.as_mut(), &mut session).await;

    let acquirer = Acquirer::from_config(&config.sampler);
    let pipeline = SyncPipeline::new(session, acquirer, sink, Arc::clone(&store));
    let scheduler = Scheduler::new(pipeline, Duration::from_secs(config.schedule.period_secs));

    scheduler.run().await?;
    Ok(())
}
