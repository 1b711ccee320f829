use std::time::Duration;

use tracing::debug;

use crate::config::Settings;
use crate::error::ArchiveError;

/// Shared HTTP client for index and detail pages.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(settings: &Settings) -> Result<Self, ArchiveError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ArchiveError::Config(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// GET `url` and decode the body as UTF-8 text. Non-2xx is an error.
    pub async fn get_text(&self, url: &str) -> Result<String, ArchiveError> {
        let fetch_err = |source: reqwest::Error| ArchiveError::Fetch {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().await.map_err(fetch_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ArchiveError::Status {
                url: url.to_string(),
                status,
            });
        }
        // Decoded strictly: no charset sniffing, no replacement characters.
        let bytes = resp.bytes().await.map_err(fetch_err)?;
        let body = String::from_utf8(bytes.to_vec()).map_err(|source| ArchiveError::Decode {
            url: url.to_string(),
            source,
        })?;
        debug!(url, bytes = body.len(), "fetched");
        Ok(body)
    }
}
