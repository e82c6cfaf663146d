//! Registry of known resolvers and their per-resolver policies.
//!
//! The registry is the single table that says, for each resolver the broker
//! can talk to, how its request text is preprocessed and which acceptance
//! profile its replies are judged by. Adding a resolver class means adding a
//! row here; dispatch and aggregation never branch on resolver names.

use super::name::ResolverName;
use super::preprocess::Preprocessing;
use crate::core::error::DomainError;
use crate::validation::ValidationProfile;

/// Names of the resolvers in the standard deployment.
pub mod well_known {
    pub const WIKIPEDIA: &str = "WikipediaAgent";
    pub const DUCKDUCKGO: &str = "DuckDuckGoAgent";
    pub const WIKIDATA: &str = "WikidataAgent";
    pub const OPENROUTER: &str = "OpenRouterAgent";
    pub const LANGSEARCH: &str = "LangsearchAgent";
    pub const TOGETHER: &str = "TogetherAgent";
    pub const DEEPINFRA: &str = "DeepInfraAgent";
    pub const BOOK_SEARCH: &str = "BookSearchAgent";
    pub const WOLFRAM_ALPHA: &str = "WolframAlphaAgent";
}

/// One row of the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSpec {
    pub name: ResolverName,
    pub profile: ValidationProfile,
    pub preprocessing: Preprocessing,
}

impl ResolverSpec {
    pub fn new(name: impl Into<ResolverName>) -> Self {
        Self {
            name: name.into(),
            profile: ValidationProfile::General,
            preprocessing: Preprocessing::Verbatim,
        }
    }

    pub fn with_profile(mut self, profile: ValidationProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_preprocessing(mut self, preprocessing: Preprocessing) -> Self {
        self.preprocessing = preprocessing;
        self
    }
}

/// Ordered table of known resolvers
#[derive(Debug, Clone, Default)]
pub struct ResolverRegistry {
    specs: Vec<ResolverSpec>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard deployment: three knowledge-base lookups, one web search,
    /// three LLM completion services and two domain specialists.
    pub fn standard() -> Self {
        use well_known::*;

        let keyword = |name: &str| {
            ResolverSpec::new(name).with_preprocessing(Preprocessing::KeywordOnly)
        };

        Self {
            specs: vec![
                keyword(WIKIPEDIA),
                keyword(DUCKDUCKGO),
                keyword(WIKIDATA),
                ResolverSpec::new(OPENROUTER).with_profile(ValidationProfile::LlmStrict),
                ResolverSpec::new(LANGSEARCH).with_profile(ValidationProfile::WebSearch),
                ResolverSpec::new(TOGETHER).with_profile(ValidationProfile::LlmConversational),
                ResolverSpec::new(DEEPINFRA),
                ResolverSpec::new(BOOK_SEARCH),
                ResolverSpec::new(WOLFRAM_ALPHA),
            ],
        }
    }

    /// Add a resolver, rejecting blank and duplicate names
    pub fn register(mut self, spec: ResolverSpec) -> Result<Self, DomainError> {
        if spec.name.as_str().trim().is_empty() {
            return Err(DomainError::EmptyResolverName);
        }
        if self.contains(&spec.name) {
            return Err(DomainError::DuplicateResolver(spec.name.to_string()));
        }
        self.specs.push(spec);
        Ok(self)
    }

    pub fn get(&self, name: &ResolverName) -> Option<&ResolverSpec> {
        self.specs.iter().find(|s| &s.name == name)
    }

    pub fn contains(&self, name: &ResolverName) -> bool {
        self.get(name).is_some()
    }

    /// Look up a resolver that must be registered
    pub fn require(&self, name: &ResolverName) -> Result<&ResolverSpec, DomainError> {
        self.get(name)
            .ok_or_else(|| DomainError::UnknownResolver(name.to_string()))
    }

    /// Acceptance profile for a resolver; unregistered names get the general one
    pub fn profile_of(&self, name: &ResolverName) -> ValidationProfile {
        self.get(name)
            .map(|s| s.profile)
            .unwrap_or(ValidationProfile::General)
    }

    /// Shape `text` the way `name` expects it
    pub fn preprocess(&self, name: &ResolverName, text: &str) -> String {
        self.get(name)
            .map(|s| s.preprocessing)
            .unwrap_or_default()
            .apply(text)
    }

    pub fn names(&self) -> impl Iterator<Item = &ResolverName> {
        self.specs.iter().map(|s| &s.name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::well_known::*;
    use super::*;

    #[test]
    fn test_standard_registry_profiles() {
        let registry = ResolverRegistry::standard();
        assert_eq!(registry.len(), 9);
        assert_eq!(
            registry.profile_of(&OPENROUTER.into()),
            ValidationProfile::LlmStrict
        );
        assert_eq!(
            registry.profile_of(&LANGSEARCH.into()),
            ValidationProfile::WebSearch
        );
        assert_eq!(
            registry.profile_of(&TOGETHER.into()),
            ValidationProfile::LlmConversational
        );
        assert_eq!(
            registry.profile_of(&WIKIPEDIA.into()),
            ValidationProfile::General
        );
        assert_eq!(
            registry.profile_of(&"UnlistedAgent".into()),
            ValidationProfile::General
        );
    }

    #[test]
    fn test_preprocess_only_for_keyword_resolvers() {
        let registry = ResolverRegistry::standard();
        let q = "Who is Albert Einstein?";
        assert_eq!(registry.preprocess(&WIKIDATA.into(), q), "Albert Einstein");
        assert_eq!(registry.preprocess(&DUCKDUCKGO.into(), q), "Albert Einstein");
        assert_eq!(registry.preprocess(&OPENROUTER.into(), q), q);
        assert_eq!(registry.preprocess(&"UnlistedAgent".into(), q), q);
    }

    #[test]
    fn test_register_rejects_duplicates_and_blank() {
        let registry = ResolverRegistry::new()
            .register(ResolverSpec::new("A"))
            .unwrap();
        assert_eq!(
            registry.clone().register(ResolverSpec::new("A")).unwrap_err(),
            DomainError::DuplicateResolver("A".to_string())
        );
        assert_eq!(
            registry.register(ResolverSpec::new(" ")).unwrap_err(),
            DomainError::EmptyResolverName
        );
    }

    #[test]
    fn test_require_unknown() {
        let registry = ResolverRegistry::standard();
        assert!(registry.require(&WOLFRAM_ALPHA.into()).is_ok());
        assert!(registry
            .require(&"Ghost".into())
            .unwrap_err()
            .is_unknown_resolver());
    }
}
