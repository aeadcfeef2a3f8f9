use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

pub const USERS_QUERY: &str = "users";

struct Entry {
    generation: u64,
    value: Value,
}

/// Keyed cache of query results shared by the console views.
///
/// Each key carries a generation counter bumped on invalidation. A fetch that
/// started before an invalidation cannot repopulate the key with stale data.
#[derive(Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<String, Entry>>,
    generations: RwLock<HashMap<String, u64>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self, key: &str) -> u64 {
        self.generations
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let current = self.generation(key);
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(key).filter(|e| e.generation == current)?;
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Stores `value` if `key` has not been invalidated since `generation`
    /// was read. Returns whether the value was kept.
    pub fn put<T: Serialize>(&self, key: &str, generation: u64, value: &T) -> bool {
        if generation != self.generation(key) {
            return false;
        }
        let Ok(value) = serde_json::to_value(value) else {
            return false;
        };
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), Entry { generation, value });
        true
    }

    pub fn invalidate(&self, key: &str) {
        *self
            .generations
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(key.to_string())
            .or_insert(0) += 1;
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        tracing::debug!("Invalidated query cache key {}", key);
    }
}
