// Translation memo caches.
// Bounded LRU maps for per-text and per-entity translation results.

use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use lru::LruCache;

use crate::config::DEFAULT_TRANSLATION_CACHE_SIZE;

/// Process-lifetime memo keyed by `(key, target language)`.
///
/// Only successful results are inserted; least recently used entries are
/// evicted once `capacity` is reached.
pub struct MemoCache<V> {
    entries: Mutex<LruCache<String, V>>,
}

impl<V: Clone> MemoCache<V> {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_TRANSLATION_CACHE_SIZE))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Cache key for `key` translated into `target`.
    pub fn cache_key(key: &str, target: &str) -> String {
        format!("{}:{}", key, target)
    }

    pub fn get(&self, key: &str, target: &str) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(&Self::cache_key(key, target)).cloned()
    }

    pub fn insert(&self, key: &str, target: &str, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.put(Self::cache_key(key, target), value);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Text-level cache: `text:target` → translated text.
pub type TranslationCache = MemoCache<String>;
