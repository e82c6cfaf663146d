//! Conversation context: the broker's memory of who is being talked about.

use regex::{NoExpand, Regex};
use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};

/// Key holding the most recently mentioned known subject
pub const CURRENT_SUBJECT: &str = "current_subject";

pub(crate) static PRONOUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:he|she|they|it)\b").expect("pronoun pattern is valid"));

static BIRTH_OR_AGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is).*\b(born|age)\b.*?(\d{4})").expect("birth pattern is valid")
});

/// Closed list of subjects the broker recognises by name
#[derive(Debug, Clone)]
pub struct SubjectCatalog {
    names: Vec<String>,
    pattern: Option<Regex>,
}

impl SubjectCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| Into::<String>::into(n).trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();

        let pattern = if names.is_empty() {
            None
        } else {
            let alternatives = names
                .iter()
                .map(|n| regex::escape(n))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives)).ok()
        };

        Self { names, pattern }
    }

    pub fn baseline() -> Self {
        Self::new(["Steven Spielberg", "Albert Einstein", "Elon Musk"])
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The known subject mentioned last in `text`, spelled as in the catalog
    pub fn last_mention(&self, text: &str) -> Option<&str> {
        let found = self.pattern.as_ref()?.find_iter(text).last()?;
        let found = found.as_str().to_lowercase();
        self.names
            .iter()
            .find(|n| n.to_lowercase() == found)
            .map(String::as_str)
    }
}

impl Default for SubjectCatalog {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Process-lifetime conversation memory shared by every query on a broker.
///
/// All operations may be called unconditionally; when their pattern does not
/// match they leave the context untouched.
#[derive(Debug, Default)]
pub struct ConversationContext {
    entries: RwLock<HashMap<String, String>>,
    subjects: SubjectCatalog,
}

impl ConversationContext {
    pub fn new(subjects: SubjectCatalog) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            subjects,
        }
    }

    pub fn subjects(&self) -> &SubjectCatalog {
        &self.subjects
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn current_subject(&self) -> Option<String> {
        self.get(CURRENT_SUBJECT)
    }

    pub fn has_subject(&self) -> bool {
        self.current_subject().is_some()
    }

    fn put(&self, key: String, value: String) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }

    /// Replace he/she/they/it with the current subject, if there is one
    pub fn resolve_pronouns(&self, query: &str) -> String {
        match self.current_subject() {
            Some(subject) => PRONOUN.replace_all(query, NoExpand(&subject)).into_owned(),
            None => query.to_string(),
        }
    }

    /// Remember a known subject named in the query. Returns the new subject.
    pub fn update_from_query(&self, query: &str) -> Option<String> {
        let subject = self.subjects.last_mention(query)?.to_string();
        self.put(CURRENT_SUBJECT.to_string(), subject.clone());
        Some(subject)
    }

    /// Record a birth year/age fact about the current subject.
    /// Returns the stored `(key, value)` pair.
    pub fn update_from_response(&self, response: &str) -> Option<(String, String)> {
        let caps = BIRTH_OR_AGE.captures(response)?;
        let subject = self.current_subject()?;
        let key = format!("{}_age", subject);
        let value = format!("{} {}", &caps[1], &caps[2]);
        self.put(key.clone(), value.clone());
        Some((key, value))
    }

    /// All entries sorted by key
    pub fn snapshot(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort();
        entries
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_without_subject_is_identity() {
        let ctx = ConversationContext::default();
        assert_eq!(ctx.resolve_pronouns("When was he born?"), "When was he born?");
    }

    #[test]
    fn test_update_from_query_sets_subject() {
        let ctx = ConversationContext::default();
        assert_eq!(
            ctx.update_from_query("Who is Albert Einstein?").as_deref(),
            Some("Albert Einstein")
        );
        assert_eq!(ctx.current_subject().as_deref(), Some("Albert Einstein"));
        assert!(ctx.update_from_query("What is the capital of France?").is_none());
        assert_eq!(ctx.current_subject().as_deref(), Some("Albert Einstein"));
    }

    #[test]
    fn test_last_mentioned_subject_wins() {
        let ctx = ConversationContext::default();
        ctx.update_from_query("Did elon musk ever meet Steven Spielberg?");
        assert_eq!(ctx.current_subject().as_deref(), Some("Steven Spielberg"));
    }

    #[test]
    fn test_resolve_pronouns_whole_word_case_insensitive() {
        let ctx = ConversationContext::default();
        ctx.update_from_query("Tell me about Elon Musk");
        assert_eq!(
            ctx.resolve_pronouns("When was He born and what did it cost them?"),
            "When was Elon Musk born and what did Elon Musk cost them?"
        );
        // "the" and "itself" are untouched
        assert_eq!(ctx.resolve_pronouns("the itself"), "the itself");
    }

    #[test]
    fn test_update_from_response_records_age() {
        let ctx = ConversationContext::default();
        assert!(ctx.update_from_response("He was born 1999 in Ohio").is_none());

        ctx.update_from_query("Albert Einstein");
        let stored = ctx.update_from_response("Einstein was born\nin Ulm in 1879.");
        assert_eq!(
            stored,
            Some(("Albert Einstein_age".to_string(), "born 1879".to_string()))
        );
        assert_eq!(ctx.get("Albert Einstein_age").as_deref(), Some("born 1879"));
    }

    #[test]
    fn test_update_from_response_prefers_last_mention() {
        let ctx = ConversationContext::default();
        ctx.update_from_query("Elon Musk");
        let stored = ctx.update_from_response("age 30 in 2001, born 1971");
        assert_eq!(
            stored,
            Some(("Elon Musk_age".to_string(), "born 1971".to_string()))
        );
    }

    #[test]
    fn test_update_from_response_without_year_is_noop() {
        let ctx = ConversationContext::default();
        ctx.update_from_query("Elon Musk");
        assert!(ctx.update_from_response("He was born in Pretoria.").is_none());
        assert_eq!(ctx.snapshot().len(), 1);
    }

    #[test]
    fn test_custom_catalog() {
        let ctx = ConversationContext::new(SubjectCatalog::new(["Ada Lovelace", " "]));
        assert_eq!(ctx.subjects().names(), ["Ada Lovelace".to_string()]);
        assert!(ctx.update_from_query("Who was Elon Musk?").is_none());
        assert_eq!(
            ctx.update_from_query("who was ada lovelace").as_deref(),
            Some("Ada Lovelace")
        );
    }

    #[test]
    fn test_empty_catalog_never_matches() {
        let ctx = ConversationContext::new(SubjectCatalog::new(Vec::<String>::new()));
        assert!(ctx.update_from_query("Elon Musk").is_none());
    }

    #[test]
    fn test_snapshot_sorted_and_clear() {
        let ctx = ConversationContext::default();
        ctx.update_from_query("Elon Musk");
        ctx.update_from_response("age 2024 reported");
        assert_eq!(
            ctx.snapshot(),
            vec![
                ("Elon Musk_age".to_string(), "age 2024".to_string()),
                (CURRENT_SUBJECT.to_string(), "Elon Musk".to_string()),
            ]
        );
        ctx.clear();
        assert!(ctx.snapshot().is_empty());
    }
}
