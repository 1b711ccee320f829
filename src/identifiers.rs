use std::collections::BTreeSet;

use crate::extract::detail_url;

/// Unique news ids collected across index pages, kept sorted so every run
/// emits records in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    ids: BTreeSet<String>,
}

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one page's ids; returns how many were not seen before.
    pub fn extend_from_page(&mut self, page: &[String]) -> usize {
        let before = self.ids.len();
        self.ids.extend(page.iter().cloned());
        self.ids.len() - before
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn detail_urls(&self, base: &str) -> Vec<String> {
        self.iter().map(|id| detail_url(base, id)).collect()
    }
}

impl FromIterator<String> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
