use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Settings;
use crate::emitter::{self, SitemapPaths};
use crate::http::HttpClient;
use crate::paginator;
use crate::resolver::{self, ResolveStats};

pub struct RunSummary {
    pub pages_fetched: u32,
    pub ids: usize,
    pub resolve: ResolveStats,
    pub paths: SitemapPaths,
}

impl RunSummary {
    pub fn print(&self) {
        println!(
            "Indexed {} pages, {} unique press releases.",
            self.pages_fetched, self.ids
        );
        println!(
            "Resolved {} ({} skipped).",
            self.resolve.resolved, self.resolve.skipped
        );
        println!("Wrote {}", self.paths.html.display());
        println!("Wrote {}", self.paths.json.display());
        println!("Wrote {}", self.paths.text.display());
    }
}

/// Discover → resolve → emit. Each stage finishes before the next starts.
pub async fn run(client: &HttpClient, settings: &Settings) -> Result<RunSummary> {
    let discovery = paginator::discover(client, settings)
        .await
        .context("index discovery failed")?;

    if discovery.ids.is_empty() {
        warn!("No press releases found on the index pages");
    }
    let urls = discovery.ids.detail_urls(&settings.detail_base_url);
    info!("Resolving {} press-release pages", urls.len());
    let (records, stats) = resolver::resolve_all(
        client,
        urls,
        settings.concurrency,
        settings.failure_policy,
    )
    .await
    .context("press-release resolution failed")?;

    let paths = SitemapPaths::new(&settings.output_dir, &settings.sitemap_suffix);
    emitter::write_all(&records, &paths).context("writing sitemaps failed")?;

    Ok(RunSummary {
        pages_fetched: discovery.pages_fetched,
        ids: discovery.ids.len(),
        resolve: stats,
        paths,
    })
}
