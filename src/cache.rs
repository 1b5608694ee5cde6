// In-memory list of known projects and labels used by autocomplete.
//
// Both lists are replaced wholesale by whoever fetches them; there is no
// incremental update. One cache belongs to one editing session.
use crate::model::RefKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Maximum number of suggestions returned by a search.
pub const MAX_RESULTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheItem {
    pub id: String,
    pub title: String,
}

impl CacheItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCache {
    #[serde(default)]
    projects: Vec<CacheItem>,
    #[serde(default)]
    labels: Vec<CacheItem>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a `{ "projects": [...], "labels": [...] }` document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse reference list")
    }

    pub fn set_projects(&mut self, items: Vec<CacheItem>) {
        self.projects = items;
    }

    pub fn set_labels(&mut self, items: Vec<CacheItem>) {
        self.labels = items;
    }

    pub fn projects(&self) -> &[CacheItem] {
        &self.projects
    }

    pub fn labels(&self) -> &[CacheItem] {
        &self.labels
    }

    pub fn search_projects(&self, query: &str) -> Vec<CacheItem> {
        Self::search_list(&self.projects, query)
    }

    pub fn search_labels(&self, query: &str) -> Vec<CacheItem> {
        Self::search_list(&self.labels, query)
    }

    pub fn search(&self, kind: RefKind, query: &str) -> Vec<CacheItem> {
        match kind {
            RefKind::Project => self.search_projects(query),
            RefKind::Label => self.search_labels(query),
        }
    }

    // Case-insensitive substring match in storage order. An empty query
    // returns the first items unranked.
    fn search_list(items: &[CacheItem], query: &str) -> Vec<CacheItem> {
        let needle = query.to_lowercase();
        items
            .iter()
            .filter(|item| needle.is_empty() || item.title.to_lowercase().contains(&needle))
            .take(MAX_RESULTS)
            .cloned()
            .collect()
    }
}
