use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the archiver stages.
///
/// A missing `<title>` is not an error: it is carried as `None` on the record.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("body of {url} is not valid UTF-8")]
    Decode {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("no {pattern} found in {url}")]
    Extraction { url: String, pattern: &'static str },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArchiveError {
    pub fn is_extraction(&self) -> bool {
        matches!(self, ArchiveError::Extraction { .. })
    }
}

impl From<config::ConfigError> for ArchiveError {
    fn from(e: config::ConfigError) -> Self {
        ArchiveError::Config(e.to_string())
    }
}
