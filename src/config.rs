use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::ArchiveError;
use crate::extract::DETAIL_BASE_URL;

const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What the resolver does when a detail page lacks its PDF link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// First extraction failure aborts the whole batch.
    #[default]
    Abort,
    /// Log the failing page and keep going.
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(ArchiveError::Config(format!(
                "on_extraction_error must be 'abort' or 'skip', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    main: RawMain,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    convento_indices: String,
    number_of_pages: u32,
    sitemap_suffix: String,
    #[serde(default)]
    concurrency: Option<usize>,
    #[serde(default)]
    output_dir: Option<PathBuf>,
    #[serde(default)]
    on_extraction_error: Option<String>,
    #[serde(default)]
    user_agent: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    detail_base_url: Option<String>,
}

/// Run settings, read once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Index base URL ending in `page=`; the page number is appended verbatim.
    pub indices_url: String,
    /// Exclusive upper bound: pages `1..number_of_pages` are attempted.
    pub number_of_pages: u32,
    pub sitemap_suffix: String,
    pub concurrency: usize,
    pub output_dir: PathBuf,
    pub failure_policy: FailurePolicy,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Prefix the news id is appended to for each press-release page.
    pub detail_base_url: String,
}

impl Settings {
    /// Load the `[main]` section of an INI file, with `CONVENTO_MAIN__*`
    /// environment variables taking precedence.
    pub fn load(path: &Path) -> Result<Self, ArchiveError> {
        let raw: RawConfig = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini))
            .add_source(
                Environment::with_prefix("CONVENTO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        Self::from_raw(raw.main)
    }

    fn from_raw(raw: RawMain) -> Result<Self, ArchiveError> {
        let indices_url = raw.convento_indices.trim().to_string();
        if indices_url.is_empty() {
            return Err(ArchiveError::Config("convento_indices is empty".into()));
        }
        if raw.number_of_pages < 2 {
            return Err(ArchiveError::Config(format!(
                "number_of_pages must be at least 2 (pages 1..n-1 are fetched), got {}",
                raw.number_of_pages
            )));
        }
        let sitemap_suffix = raw.sitemap_suffix.trim().to_string();
        if sitemap_suffix.is_empty() {
            return Err(ArchiveError::Config("sitemap_suffix is empty".into()));
        }

        let concurrency = raw.concurrency.unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(ArchiveError::Config("concurrency must be at least 1".into()));
        }

        let failure_policy = match raw.on_extraction_error.as_deref() {
            Some(s) => s.parse()?,
            None => FailurePolicy::default(),
        };

        Ok(Settings {
            indices_url,
            number_of_pages: raw.number_of_pages,
            sitemap_suffix,
            concurrency,
            output_dir: raw.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            failure_policy,
            user_agent: raw
                .user_agent
                .unwrap_or_else(|| concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into()),
            timeout_secs: raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            detail_base_url: raw
                .detail_base_url
                .unwrap_or_else(|| DETAIL_BASE_URL.to_string()),
        })
    }

    /// Settings for tests that point the index at a mock server.
    #[cfg(test)]
    pub fn for_index(indices_url: &str, number_of_pages: u32) -> Self {
        Settings {
            indices_url: indices_url.to_string(),
            number_of_pages,
            sitemap_suffix: "test".into(),
            concurrency: 2,
            output_dir: PathBuf::from("."),
            failure_policy: FailurePolicy::Abort,
            user_agent: "convento_archiver/test".into(),
            timeout_secs: 5,
            detail_base_url: DETAIL_BASE_URL.to_string(),
        }
    }
}
