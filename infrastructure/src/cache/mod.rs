//! Knowledge cache adapters.

mod memory;

pub use memory::InMemoryKnowledgeCache;
