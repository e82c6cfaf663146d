//! Process-lifetime in-memory knowledge cache.

use broker_application::ports::knowledge_cache::KnowledgeCache;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Exact-text cache with no eviction and no expiry.
///
/// Reads share the lock; each `put` replaces one entry atomically.
#[derive(Debug, Default)]
pub struct InMemoryKnowledgeCache {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKnowledgeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KnowledgeCache for InMemoryKnowledgeCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, answer: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), answer.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_put_then_get() {
        let cache = InMemoryKnowledgeCache::new();
        assert!(cache.get("What is Rust?").is_none());

        cache.put("What is Rust?", "a language");
        assert_eq!(cache.get("What is Rust?").as_deref(), Some("a language"));
        assert!(cache.get("what is rust?").is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let cache = InMemoryKnowledgeCache::new();
        cache.put("q", "first");
        cache.put("q", "second");
        assert_eq!(cache.get("q").as_deref(), Some("second"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_writers() {
        let cache = Arc::new(InMemoryKnowledgeCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.put(&format!("q{i}"), &format!("a{i}")))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 8);
        assert_eq!(cache.get("q3").as_deref(), Some("a3"));
    }
}
