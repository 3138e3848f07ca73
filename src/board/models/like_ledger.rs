//! # Client Like State
//!
//! Per-device record of which posts were already liked. A device adds at
//! most one like to a post; nothing on the store side checks this.

use super::post::PostId;
use crate::board::error::BoardResult;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Local persistence for the "already liked" flag
pub trait LikeLedger: Send {
    fn is_liked(&self, post_id: &PostId) -> bool;

    fn mark_liked(&mut self, post_id: &PostId) -> BoardResult<()>;

    /// Clear the flag, used when an optimistic like is rolled back
    fn unmark_liked(&mut self, post_id: &PostId) -> BoardResult<()>;
}

/// Ledger kept only in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryLikeLedger {
    liked: BTreeSet<PostId>,
}

impl MemoryLikeLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LikeLedger for MemoryLikeLedger {
    fn is_liked(&self, post_id: &PostId) -> bool {
        self.liked.contains(post_id)
    }

    fn mark_liked(&mut self, post_id: &PostId) -> BoardResult<()> {
        self.liked.insert(post_id.clone());
        Ok(())
    }

    fn unmark_liked(&mut self, post_id: &PostId) -> BoardResult<()> {
        self.liked.remove(post_id);
        Ok(())
    }
}

/// Ledger persisted as a JSON array of post ids
#[derive(Debug)]
pub struct FileLikeLedger {
    path: PathBuf,
    liked: BTreeSet<PostId>,
}

impl FileLikeLedger {
    /// Open the ledger, starting empty when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> BoardResult<Self> {
        let path = path.into();
        let liked = match std::fs::read_to_string(&path) {
            Ok(json) if json.trim().is_empty() => BTreeSet::new(),
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!("Like ledger {:?} holds {} entries", path, liked.len());
        Ok(Self { path, liked })
    }

    fn persist(&self) -> BoardResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(&self.liked)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl LikeLedger for FileLikeLedger {
    fn is_liked(&self, post_id: &PostId) -> bool {
        self.liked.contains(post_id)
    }

    fn mark_liked(&mut self, post_id: &PostId) -> BoardResult<()> {
        if self.liked.insert(post_id.clone()) {
            self.persist()?;
        }
        Ok(())
    }

    fn unmark_liked(&mut self, post_id: &PostId) -> BoardResult<()> {
        if self.liked.remove(post_id) {
            self.persist()?;
        }
        Ok(())
    }
}
