//! # Catalog View
//!
//! Read-only view over the media list the host hands us at load time.
//! The core only filters it; it never fetches or mutates catalog data.

use super::media::{MediaItem, MediaType};
use crate::board::error::BoardResult;
use std::path::Path;

/// Maximum number of search results shown in the picker
pub const SEARCH_RESULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<MediaItem>,
}

impl Catalog {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self { items }
    }

    /// Parse the host-supplied JSON list
    pub fn from_json(json: &str) -> BoardResult<Self> {
        let items: Vec<MediaItem> = serde_json::from_str(json)?;
        Ok(Self::new(items))
    }

    pub fn load(path: &Path) -> BoardResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::debug!("Loaded {} catalog items from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items of one media type, in catalog order
    pub fn of_type(&self, media_type: MediaType) -> impl Iterator<Item = &MediaItem> {
        self.items
            .iter()
            .filter(move |item| item.media_type == media_type)
    }

    /// Case-insensitive substring search over one media type.
    ///
    /// Results keep catalog order and are capped at `SEARCH_RESULT_LIMIT`.
    /// A blank query matches nothing.
    pub fn search(&self, media_type: MediaType, query: &str) -> Vec<MediaItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.of_type(media_type)
            .filter(|item| item.title.to_lowercase().contains(&needle))
            .take(SEARCH_RESULT_LIMIT)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(media_type: MediaType, title: &str) -> MediaItem {
        MediaItem {
            media_type,
            source: "tmdb".to_string(),
            source_id: title.len().to_string(),
            title: title.to_string(),
            status: "planned".to_string(),
        }
    }

    #[test]
    fn search_should_filter_by_type_and_ignore_case() {
        let catalog = Catalog::new(vec![
            item(MediaType::Movie, "The Matrix"),
            item(MediaType::Tv, "Matrix Reloaded Show"),
            item(MediaType::Movie, "matrix revolutions"),
        ]);

        let results = catalog.search(MediaType::Movie, "MATRIX");
        let titles: Vec<&str> = results.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["The Matrix", "matrix revolutions"]);
    }

    #[test]
    fn search_should_cap_results_in_catalog_order() {
        let items = (0..15)
            .map(|i| item(MediaType::Book, &format!("Book {i}")))
            .collect();
        let catalog = Catalog::new(items);

        let results = catalog.search(MediaType::Book, "book");
        assert_eq!(results.len(), SEARCH_RESULT_LIMIT);
        assert_eq!(results[0].title, "Book 0");
        assert_eq!(results[9].title, "Book 9");
    }

    #[test]
    fn blank_query_should_match_nothing() {
        let catalog = Catalog::new(vec![item(MediaType::Game, "Hades")]);
        assert!(catalog.search(MediaType::Game, "  ").is_empty());
    }

    #[test]
    fn catalog_should_parse_host_json() {
        let json = r#"[{"media_type":"anime","source":"mal","source_id":"1","title":"Bebop","status":"completed"}]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.items()[0].media_type, MediaType::Anime);
    }
}
