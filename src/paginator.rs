use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::ArchiveError;
use crate::extract;
use crate::http::HttpClient;
use crate::identifiers::IdentifierSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVerdict {
    /// Keep paginating.
    Fresh,
    /// Same non-empty ids as the previous page: the index ran out and is
    /// serving its last page again.
    Repeat,
}

/// Remembers the previous page's id sequence for the repeat check.
#[derive(Debug, Default)]
pub struct PageRepeatTracker {
    previous: Vec<String>,
}

impl PageRepeatTracker {
    pub fn observe(&mut self, page: &[String]) -> PageVerdict {
        if !self.previous.is_empty() && page == self.previous.as_slice() {
            return PageVerdict::Repeat;
        }
        self.previous = page.to_vec();
        PageVerdict::Fresh
    }
}

/// Outcome of walking the index.
#[derive(Debug)]
pub struct Discovery {
    pub ids: IdentifierSet,
    pub pages_fetched: u32,
    /// False when the page bound cut discovery short.
    pub exhausted: bool,
}

pub fn page_url(base: &str, page: u32) -> String {
    format!("{}{}", base, page)
}

/// Fetch index pages 1.. in order until a page repeats its predecessor or
/// the configured bound is reached. Any fetch failure aborts discovery.
pub async fn discover(client: &HttpClient, settings: &Settings) -> Result<Discovery, ArchiveError> {
    let mut ids = IdentifierSet::new();
    let mut tracker = PageRepeatTracker::default();
    let mut pages_fetched = 0;
    let mut exhausted = false;

    for page in 1..settings.number_of_pages {
        let url = page_url(&settings.indices_url, page);
        info!("Page URL: {}", url);
        let body = client.get_text(&url).await?;
        pages_fetched += 1;

        let links = extract::news_links(&body);
        if let Some(first) = links.first() {
            debug!(page, href_prefix = %first.href_prefix, "first press-release link");
        }
        let page_ids: Vec<String> = links.into_iter().map(|l| l.numeric_id).collect();
        // The repeated page is not merged; its ids are already in the set.
        if tracker.observe(&page_ids) == PageVerdict::Repeat {
            info!(page, "page repeats its predecessor, index exhausted");
            exhausted = true;
            break;
        }
        let seen_before = page_ids.iter().filter(|id| ids.contains(id)).count();
        let added = ids.extend_from_page(&page_ids);
        info!(page, found = page_ids.len(), new = added, seen_before, "indexed page");
    }

    if !exhausted {
        warn!(
            "Reached page bound {} without a repeated page; more press releases may exist",
            settings.number_of_pages
        );
    }
    info!("Number of IDs: {}", ids.len());

    Ok(Discovery {
        ids,
        pages_fetched,
        exhausted,
    })
}
