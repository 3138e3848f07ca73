//! # Media Models
//!
//! Catalog entries and the inline references that point at them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker separating a parent identifier from its sub-item index
pub const HIERARCHY_MARKER: &str = "_s";

/// Kind of catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Anime,
    Manga,
    Game,
    Book,
}

impl MediaType {
    pub const ALL: [MediaType; 6] = [
        MediaType::Movie,
        MediaType::Tv,
        MediaType::Anime,
        MediaType::Manga,
        MediaType::Game,
        MediaType::Book,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Anime => "anime",
            MediaType::Manga => "manga",
            MediaType::Game => "game",
            MediaType::Book => "book",
        }
    }

    /// Human readable label for pickers
    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Movie => "Movie",
            MediaType::Tv => "TV Series",
            MediaType::Anime => "Anime",
            MediaType::Manga => "Manga",
            MediaType::Game => "Game",
            MediaType::Book => "Book",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown media type '{s}'"))
    }
}

/// One entry of the host-supplied catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub media_type: MediaType,
    pub source: String,
    pub source_id: String,
    pub title: String,
    #[serde(default)]
    pub status: String,
}

/// Source identifier, either flat or a parent/sub-item pair such as a season
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceId {
    Flat(String),
    Hierarchical { parent: String, sub_index: u32 },
}

impl SourceId {
    /// Split on the first hierarchy marker. Identifiers whose halves are
    /// empty or whose sub-index is not a number stay flat.
    pub fn parse(raw: &str) -> Self {
        if let Some((parent, sub)) = raw.split_once(HIERARCHY_MARKER) {
            if !parent.is_empty() {
                if let Ok(sub_index) = sub.parse::<u32>() {
                    return SourceId::Hierarchical {
                        parent: parent.to_string(),
                        sub_index,
                    };
                }
            }
        }
        SourceId::Flat(raw.to_string())
    }
}

/// A catalog reference parsed out of free text
#[derive(Debug, Clone, PartialEq)]
pub struct MediaReference {
    pub media_type: MediaType,
    pub source: String,
    pub source_id: String,
    pub title: String,
    pub status: String,
}

impl MediaReference {
    /// Internal detail route for this reference
    pub fn detail_path(&self) -> String {
        match SourceId::parse(&self.source_id) {
            SourceId::Flat(id) => format!("/{}/{}/{}/", self.source, self.media_type, id),
            SourceId::Hierarchical { parent, sub_index } => {
                format!("/{}/season/{}/{}/", self.source, parent, sub_index)
            }
        }
    }
}

impl From<&MediaItem> for MediaReference {
    fn from(item: &MediaItem) -> Self {
        Self {
            media_type: item.media_type,
            source: item.source.clone(),
            source_id: item.source_id.clone(),
            title: item.title.clone(),
            status: item.status.clone(),
        }
    }
}

/// Activity phrase used when a post only carries a catalog item
pub fn activity_phrase(status: &str, media_type: MediaType) -> &'static str {
    use MediaType::*;
    match (status, media_type) {
        ("planned" | "", Movie | Tv | Anime) => "plans to watch",
        ("planned" | "", Game) => "plans to play",
        ("planned" | "", Manga | Book) => "plans to read",
        ("ongoing", Movie | Tv | Anime) => "is watching",
        ("ongoing", Game) => "is playing",
        ("ongoing", Manga | Book) => "is reading",
        ("completed", Movie | Tv | Anime) => "watched",
        ("completed", Game) => "completed",
        ("completed", Manga | Book) => "read",
        ("dropped", _) => "dropped",
        ("on_hold", _) => "put on hold",
        _ => "is interacting with",
    }
}
