//! Conversation context used for pronoun resolution.
//!
//! The broker keeps one [`ConversationContext`] for its whole lifetime. It
//! remembers the last known subject named by the user and small facts about
//! that subject picked out of resolver replies.

pub mod conversation;

pub use conversation::{CURRENT_SUBJECT, ConversationContext, SubjectCatalog};
