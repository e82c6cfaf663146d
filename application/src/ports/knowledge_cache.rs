//! Knowledge cache port
//!
//! Exact-text answer cache keyed by the pronoun-resolved query.

/// Answer store consulted before SIMPLE dispatch
///
/// Entries are overwritten on repeat success and never expire.
pub trait KnowledgeCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn put(&self, key: &str, answer: &str);
}

/// Cache that never remembers anything
pub struct NoCache;

impl KnowledgeCache for NoCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn put(&self, _key: &str, _answer: &str) {}
}
