use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::FailurePolicy;
use crate::error::ArchiveError;
use crate::extract;
use crate::http::HttpClient;
use crate::model::ExtractedRecord;

/// Resolution stats returned alongside the records.
#[derive(Debug, Default)]
pub struct ResolveStats {
    pub total: usize,
    pub resolved: usize,
    pub skipped: usize,
}

/// Pull the title and PDF link out of one fetched detail page.
pub fn resolve_page(url: &str, body: &str) -> Result<ExtractedRecord, ArchiveError> {
    let artifact_url = extract::pdf_link(body).ok_or_else(|| ArchiveError::Extraction {
        url: url.to_string(),
        pattern: "PDF link",
    })?;
    Ok(ExtractedRecord {
        title: extract::title(body),
        detail_url: url.to_string(),
        artifact_url,
    })
}

async fn resolve_one(client: &HttpClient, url: &str) -> Result<ExtractedRecord, ArchiveError> {
    let body = client.get_text(url).await?;
    resolve_page(url, &body)
}

/// Fetch and resolve every detail page with at most `concurrency` requests
/// in flight. Records come back in the same order as `urls`.
///
/// Fetch errors always abort. Extraction errors abort under
/// [`FailurePolicy::Abort`] and are logged and skipped under
/// [`FailurePolicy::Skip`]. Aborting cancels the outstanding tasks.
pub async fn resolve_all(
    client: &HttpClient,
    urls: Vec<String>,
    concurrency: usize,
    policy: FailurePolicy,
) -> Result<(Vec<ExtractedRecord>, ResolveStats), ArchiveError> {
    let total = urls.len();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    let pb = ProgressBar::new(total as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
    {
        pb.set_style(style.progress_chars("=> "));
    }

    let mut tasks = JoinSet::new();
    for (idx, url) in urls.into_iter().enumerate() {
        let client = client.clone();
        let sem = Arc::clone(&semaphore);
        tasks.spawn(async move {
            // The semaphore is never closed, so acquire only fails after drop.
            let _permit = sem.acquire_owned().await.ok();
            let result = resolve_one(&client, &url).await;
            (idx, url, result)
        });
    }

    let mut slots: Vec<Option<ExtractedRecord>> = vec![None; total];
    let mut stats = ResolveStats {
        total,
        ..Default::default()
    };

    while let Some(joined) = tasks.join_next().await {
        let (idx, url, result) = match joined {
            Ok(done) => done,
            Err(e) if e.is_cancelled() => continue,
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        };
        pb.inc(1);

        match result {
            Ok(record) => {
                stats.resolved += 1;
                slots[idx] = Some(record);
            }
            Err(e) if e.is_extraction() && policy == FailurePolicy::Skip => {
                warn!("Skipping {}: {}", url, e);
                stats.skipped += 1;
            }
            Err(e) => {
                warn!("Resolution failed for {}: {}", url, e);
                tasks.abort_all();
                pb.finish_and_clear();
                return Err(e);
            }
        }
    }

    pb.finish_and_clear();
    info!(
        "Resolved {} detail pages ({} ok, {} skipped)",
        stats.total, stats.resolved, stats.skipped
    );

    Ok((slots.into_iter().flatten().collect(), stats))
}
