use serde::{Deserialize, Serialize};

/// One press release joined with its PDF copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub title: Option<String>,
    pub detail_url: String,
    pub artifact_url: String,
}
