//! Suggestion cache
//!
//! Memoizes parsed suggestions by `ApplicationData::cache_key`. Unbounded by
//! default: entries live as long as the process. An optional capacity turns
//! it into a least-recently-used cache.

use std::collections::{HashMap, VecDeque};

use crate::application::SuggestionResult;

#[derive(Debug, Default)]
pub struct SuggestionCache {
    entries: HashMap<String, SuggestionResult>,
    /// Keys from least to most recently used; only maintained when bounded
    recency: VecDeque<String>,
    capacity: Option<usize>,
}

impl SuggestionCache {
    /// Create a new empty, unbounded cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache that holds at most `capacity` entries
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    pub fn get(&mut self, key: &str) -> Option<SuggestionResult> {
        let hit = self.entries.get(key).cloned();
        if hit.is_some() {
            self.touch(key);
        }
        hit
    }

    /// Store `value`, replacing any previous entry for `key`
    pub fn put(&mut self, key: String, value: SuggestionResult) {
        let replaced = self.entries.insert(key.clone(), value).is_some();
        let Some(capacity) = self.capacity else {
            return;
        };

        if replaced {
            self.touch(&key);
            return;
        }

        self.recency.push_back(key);
        while self.entries.len() > capacity {
            match self.recency.pop_front() {
                Some(oldest) => {
                    log::debug!("Evicting cached suggestion ({} entries)", self.entries.len());
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    fn touch(&mut self, key: &str) {
        if self.capacity.is_none() {
            return;
        }
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            if let Some(k) = self.recency.remove(pos) {
                self.recency.push_back(k);
            }
        }
    }
}
