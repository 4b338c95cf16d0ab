use std::time::Duration;

use anyhow::Context;
use tracing::{error, info};

use crate::archive::Archive;
use crate::config::Config;
use crate::entry::normalize;
use crate::fetcher::Fetcher;
use crate::merge::merge;
use crate::patcher::{patch_regions, Markers, PatchError, Region};
use crate::render::{render_entries, render_latest};

/// Outcome of one run.
#[derive(Debug)]
pub struct RunReport {
    /// Complete entries in the fetched feed.
    pub fetched: usize,
    /// Entries not previously archived.
    pub added: usize,
    /// Entries in the archive after the run.
    pub total: usize,
    /// The feed could not be fetched; the run continued with no new entries.
    pub fetch_failed: bool,
    /// Why the page was not updated, if it wasn't.
    pub page_error: Option<PatchError>,
}

/// Fetches the feed, merges it into the archive and refreshes the page.
///
/// Fetch failures and page errors are logged and reported but do not stop
/// the run; only archive and rendering failures are returned as errors.
pub async fn run(config: &Config) -> anyhow::Result<RunReport> {
    let fetcher = Fetcher::new(
        config.feed_url.as_str(),
        Duration::from_secs(config.request_timeout),
    )?;

    info!("1. Fetching entries from {}", fetcher.url());
    let (new_entries, fetch_failed) = match fetcher.fetch().await {
        Ok(raw) => (normalize(raw), false),
        Err(e) => {
            error!("Failed to fetch feed '{}': {}", fetcher.url(), e);
            (Vec::new(), true)
        }
    };
    let fetched = new_entries.len();
    info!("   => {} entries in feed", fetched);

    let archive = Archive::new(&config.archive_path);
    let old_entries = archive.load()?;
    info!(
        "2. Loaded {} entries from {}",
        old_entries.len(),
        archive.path().display()
    );

    let merged = merge(new_entries, old_entries);
    info!("3. Added {} new entries", merged.added);
    info!("   => {} entries sorted newest first", merged.entries.len());

    archive
        .save(&merged.entries)
        .with_context(|| format!("failed to save {}", archive.path().display()))?;
    info!(
        "4. Saved {} entries to {}",
        merged.entries.len(),
        archive.path().display()
    );

    let shown = match config.page.max_entries {
        Some(limit) => &merged.entries[..limit.min(merged.entries.len())],
        None => &merged.entries[..],
    };
    let fragment = render_entries(shown).context("failed to render article list")?;

    // The viewer always shows the newest archived issue, regardless of max_entries
    let latest = match &config.page.latest {
        Some(latest) => {
            let html = render_latest(&merged.entries).context("failed to render latest issue")?;
            Some((latest, html))
        }
        None => None,
    };

    let mut regions = vec![Region {
        markers: Markers {
            start: &config.page.start_marker,
            end: &config.page.end_marker,
        },
        fragment: &fragment,
    }];
    regions.extend(latest.iter().map(|(latest, html)| Region {
        markers: Markers {
            start: &latest.start_marker,
            end: &latest.end_marker,
        },
        fragment: html,
    }));

    let page_error = match patch_regions(&config.page.path, &regions) {
        Ok(()) => {
            info!("5. Updated {} with {} entries", config.page.path.display(), shown.len());
            None
        }
        Err(e) => {
            error!("5. Could not update {}: {}", config.page.path.display(), e);
            Some(e)
        }
    };

    Ok(RunReport {
        fetched,
        added: merged.added,
        total: merged.entries.len(),
        fetch_failed,
        page_error,
    })
}
