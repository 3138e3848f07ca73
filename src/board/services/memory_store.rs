//! # In-Memory Document Store
//!
//! A local stand-in for the remote store. Reads return children in key order
//! like the real service, which is why feed loads must re-sort. Offline mode
//! and artificial latency make failure and ordering paths reproducible.

use super::store::{ChildQuery, DocumentStore, StorePath};
use crate::board::error::{BoardError, BoardResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// One recorded `overwrite` call
#[derive(Debug, Clone, PartialEq)]
pub struct OverwriteCall {
    pub path: StorePath,
    pub value: Value,
}

#[derive(Debug)]
pub struct MemoryStore {
    root: Mutex<Value>,
    next_key: AtomicU64,
    offline: AtomicBool,
    latency: Mutex<Option<Duration>>,
    overwrites: Mutex<Vec<OverwriteCall>>,
    request_count: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_root(Value::Object(Map::new()))
    }

    /// Start from an existing document tree
    pub fn with_root(root: Value) -> Self {
        Self {
            root: Mutex::new(root),
            next_key: AtomicU64::new(1),
            offline: AtomicBool::new(false),
            latency: Mutex::new(None),
            overwrites: Mutex::new(Vec::new()),
            request_count: AtomicU64::new(0),
        }
    }

    /// Fail every following call with a network error
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Delay every following call
    pub fn set_latency(&self, latency: Option<Duration>) {
        if let Ok(mut guard) = self.latency.lock() {
            *guard = latency;
        }
    }

    /// Overwrites in the order they reached the store
    pub fn overwrites(&self) -> Vec<OverwriteCall> {
        self.overwrites
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Number of calls made, including failed ones
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the value at `path`
    pub fn value_at(&self, path: &StorePath) -> Value {
        self.root
            .lock()
            .ok()
            .and_then(|root| lookup(&root, path).cloned())
            .unwrap_or(Value::Null)
    }

    async fn begin_request(&self) -> BoardResult<()> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        let latency = self.latency.lock().ok().and_then(|guard| *guard);
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(BoardError::Network("store is offline".to_string()));
        }
        Ok(())
    }

    fn generate_key(&self) -> String {
        let n = self.next_key.fetch_add(1, Ordering::SeqCst);
        format!("-M{n:010}")
    }

    fn lock_root(&self) -> BoardResult<std::sync::MutexGuard<'_, Value>> {
        self.root
            .lock()
            .map_err(|_| BoardError::Network("store state poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup<'a>(root: &'a Value, path: &StorePath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| node.get(segment.as_str()))
}

/// Walk to `path`, creating objects along the way
fn slot<'a>(root: &'a mut Value, path: &StorePath) -> &'a mut Value {
    path.segments().iter().fold(root, |node, segment| {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        match node {
            Value::Object(map) => map.entry(segment.clone()).or_insert(Value::Null),
            _ => unreachable!("node was just made an object"),
        }
    })
}

/// Children sorted by key, optionally filtered to the last N by a field
fn query_children(node: &Value, query: Option<&ChildQuery>) -> Value {
    let Value::Object(children) = node else {
        return node.clone();
    };

    let mut entries: Vec<(&String, &Value)> = children.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    if let Some(query) = query {
        let mut by_field = entries.clone();
        by_field.sort_by_key(|(_, child)| {
            child
                .get(query.order_by.as_str())
                .and_then(Value::as_i64)
                .unwrap_or(i64::MIN)
        });
        let skip = by_field.len().saturating_sub(query.limit_to_last);
        let kept: Vec<&String> = by_field.iter().skip(skip).map(|(key, _)| *key).collect();
        entries.retain(|(key, _)| kept.contains(key));
    }

    Value::Object(
        entries
            .into_iter()
            .map(|(key, child)| (key.clone(), child.clone()))
            .collect(),
    )
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, path: &StorePath, query: Option<&ChildQuery>) -> BoardResult<Value> {
        self.begin_request().await?;
        let root = self.lock_root()?;
        Ok(lookup(&root, path)
            .map(|node| query_children(node, query))
            .unwrap_or(Value::Null))
    }

    async fn create(&self, path: &StorePath, document: Value) -> BoardResult<String> {
        self.begin_request().await?;
        let key = self.generate_key();
        let mut root = self.lock_root()?;
        *slot(&mut root, &path.child(&key)) = document;
        tracing::debug!("MemoryStore created {}/{}", path, key);
        Ok(key)
    }

    async fn overwrite(&self, path: &StorePath, value: Value) -> BoardResult<()> {
        self.begin_request().await?;
        {
            let mut root = self.lock_root()?;
            *slot(&mut root, path) = value.clone();
        }
        if let Ok(mut calls) = self.overwrites.lock() {
            calls.push(OverwriteCall {
                path: path.clone(),
                value,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn read_should_return_null_for_missing_paths() {
        let store = MemoryStore::new();
        let value = store.read(&StorePath::posts(), None).await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn create_should_generate_increasing_keys() {
        let store = MemoryStore::new();
        let first = store
            .create(&StorePath::posts(), json!({"timestamp": 1}))
            .await
            .unwrap();
        let second = store
            .create(&StorePath::posts(), json!({"timestamp": 2}))
            .await
            .unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn query_should_keep_last_children_by_field_in_key_order() {
        let store = MemoryStore::with_root(json!({
            "posts": {
                "a": {"timestamp": 5},
                "b": {"timestamp": 1},
                "c": {"timestamp": 9}
            }
        }));
        let value = store
            .read(&StorePath::posts(), Some(&ChildQuery::last_by("timestamp", 2)))
            .await
            .unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn overwrite_should_record_calls_and_update_tree() {
        let store = MemoryStore::with_root(json!({"posts": {"p1": {"likes": 0}}}));
        let path = StorePath::posts().child("p1").child("likes");
        store.overwrite(&path, json!(1)).await.unwrap();

        assert_eq!(store.value_at(&path), json!(1));
        assert_eq!(
            store.overwrites(),
            vec![OverwriteCall {
                path,
                value: json!(1)
            }]
        );
    }

    #[tokio::test]
    async fn offline_store_should_fail_with_network_error() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let result = store.read(&StorePath::posts(), None).await;
        assert!(matches!(result, Err(BoardError::Network(_))));
        assert_eq!(store.request_count(), 1);
    }
}
