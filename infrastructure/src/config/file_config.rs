//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section has defaults, so a partial file (or none) is valid.

use broker_application::{DispatchParams, RoundBudget};
use broker_domain::{ResolverName, ResolverRegistry, SubjectCatalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("timeouts.{0} cannot be 0")]
    ZeroTimeout(&'static str),

    #[error("timeouts.{inner} must be shorter than timeouts.{outer}")]
    InvertedTimeouts {
        inner: &'static str,
        outer: &'static str,
    },

    #[error("resolvers.http_timeout_secs cannot be 0")]
    ZeroHttpTimeout,

    #[error("unknown resolver in resolvers.endpoints: {0}")]
    UnknownResolver(String),
}

/// Raw timeout configuration from TOML, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTimeoutsConfig {
    pub simple_resolver_secs: u64,
    pub simple_round_secs: u64,
    pub complex_resolver_secs: u64,
    pub complex_round_secs: u64,
    pub overall_secs: u64,
}

impl Default for FileTimeoutsConfig {
    fn default() -> Self {
        Self {
            simple_resolver_secs: 15,
            simple_round_secs: 20,
            complex_resolver_secs: 20,
            complex_round_secs: 25,
            overall_secs: 60,
        }
    }
}

impl FileTimeoutsConfig {
    pub fn dispatch_params(&self) -> DispatchParams {
        DispatchParams::default()
            .with_simple(RoundBudget::from_secs(
                self.simple_resolver_secs,
                self.simple_round_secs,
            ))
            .with_complex(RoundBudget::from_secs(
                self.complex_resolver_secs,
                self.complex_round_secs,
            ))
            .with_overall_timeout(Duration::from_secs(self.overall_secs))
    }

    fn validate(&self) -> Result<(), ConfigValidationError> {
        let all = [
            ("simple_resolver_secs", self.simple_resolver_secs),
            ("simple_round_secs", self.simple_round_secs),
            ("complex_resolver_secs", self.complex_resolver_secs),
            ("complex_round_secs", self.complex_round_secs),
            ("overall_secs", self.overall_secs),
        ];
        if let Some((name, _)) = all.into_iter().find(|(_, secs)| *secs == 0) {
            return Err(ConfigValidationError::ZeroTimeout(name));
        }

        // resolver < round, and a sub-query round must fit in the overall budget
        let layers = [
            (
                "simple_resolver_secs",
                self.simple_resolver_secs,
                "simple_round_secs",
                self.simple_round_secs,
            ),
            (
                "complex_resolver_secs",
                self.complex_resolver_secs,
                "complex_round_secs",
                self.complex_round_secs,
            ),
        ];
        for (inner, inner_secs, outer, outer_secs) in layers {
            if inner_secs >= outer_secs {
                return Err(ConfigValidationError::InvertedTimeouts { inner, outer });
            }
        }
        if self.complex_round_secs > self.overall_secs {
            return Err(ConfigValidationError::InvertedTimeouts {
                inner: "complex_round_secs",
                outer: "overall_secs",
            });
        }
        Ok(())
    }
}

/// Raw conversation context configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContextConfig {
    /// Names recognised as conversation subjects
    pub known_subjects: Vec<String>,
}

impl Default for FileContextConfig {
    fn default() -> Self {
        Self {
            known_subjects: SubjectCatalog::baseline().names().to_vec(),
        }
    }
}

impl FileContextConfig {
    pub fn subject_catalog(&self) -> SubjectCatalog {
        SubjectCatalog::new(self.known_subjects.iter().cloned())
    }
}

/// Raw resolver transport configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResolversConfig {
    /// Resolver name → endpoint URL
    pub endpoints: BTreeMap<String, String>,
    /// Client-side timeout for one HTTP exchange
    pub http_timeout_secs: u64,
}

impl Default for FileResolversConfig {
    fn default() -> Self {
        Self {
            endpoints: BTreeMap::new(),
            http_timeout_secs: 15,
        }
    }
}

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL exchange log path; disabled when unset
    pub exchange_log: Option<String>,
}

/// Complete configuration file structure
///
/// ```toml
/// [timeouts]
/// simple_resolver_secs = 15
/// overall_secs = 60
///
/// [context]
/// known_subjects = ["Ada Lovelace"]
///
/// [resolvers]
/// http_timeout_secs = 10
///
/// [resolvers.endpoints]
/// WikipediaAgent = "http://localhost:8081/resolve"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub timeouts: FileTimeoutsConfig,
    pub context: FileContextConfig,
    pub resolvers: FileResolversConfig,
    pub repl: FileReplConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration against the resolvers the broker knows
    pub fn validate(&self, registry: &ResolverRegistry) -> Result<(), ConfigValidationError> {
        self.timeouts.validate()?;

        if self.resolvers.http_timeout_secs == 0 {
            return Err(ConfigValidationError::ZeroHttpTimeout);
        }

        for name in self.resolvers.endpoints.keys() {
            if !registry.contains(&ResolverName::new(name.as_str())) {
                return Err(ConfigValidationError::UnknownResolver(name.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[timeouts]
simple_resolver_secs = 5
simple_round_secs = 8
complex_resolver_secs = 6
complex_round_secs = 9
overall_secs = 30

[context]
known_subjects = ["Ada Lovelace", "Alan Turing"]

[resolvers]
http_timeout_secs = 7

[resolvers.endpoints]
WikipediaAgent = "http://localhost:8081/resolve"

[repl]
show_progress = false
history_file = "~/.local/share/query-broker/history.txt"

[logging]
exchange_log = "exchange.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let params = config.timeouts.dispatch_params();
        assert_eq!(params.simple, RoundBudget::from_secs(5, 8));
        assert_eq!(params.complex, RoundBudget::from_secs(6, 9));
        assert_eq!(params.overall_timeout, Duration::from_secs(30));
        assert_eq!(config.context.subject_catalog().names().len(), 2);
        assert_eq!(config.resolvers.http_timeout_secs, 7);
        assert_eq!(
            config.resolvers.endpoints.get("WikipediaAgent").map(String::as_str),
            Some("http://localhost:8081/resolve")
        );
        assert!(!config.repl.show_progress);
        assert_eq!(config.logging.exchange_log.as_deref(), Some("exchange.jsonl"));
        assert!(config.validate(&ResolverRegistry::standard()).is_ok());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[timeouts]
overall_secs = 90
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.timeouts.overall_secs, 90);
        // Defaults should apply
        assert_eq!(config.timeouts.simple_resolver_secs, 15);
        assert_eq!(config.context.known_subjects.len(), 3);
        assert!(config.repl.show_progress);
        assert!(config.logging.exchange_log.is_none());
    }

    #[test]
    fn test_default_config_matches_dispatch_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.timeouts.dispatch_params(), DispatchParams::default());
        assert!(config.validate(&ResolverRegistry::standard()).is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config: FileConfig = toml::from_str("[timeouts]\nsimple_round_secs = 0\n").unwrap();
        assert_eq!(
            config.validate(&ResolverRegistry::standard()),
            Err(ConfigValidationError::ZeroTimeout("simple_round_secs"))
        );
    }

    #[test]
    fn test_validate_inverted_layering() {
        let config: FileConfig =
            toml::from_str("[timeouts]\nsimple_resolver_secs = 20\nsimple_round_secs = 20\n")
                .unwrap();
        assert!(matches!(
            config.validate(&ResolverRegistry::standard()),
            Err(ConfigValidationError::InvertedTimeouts { inner: "simple_resolver_secs", .. })
        ));

        let config: FileConfig = toml::from_str("[timeouts]\noverall_secs = 10\n").unwrap();
        assert!(matches!(
            config.validate(&ResolverRegistry::standard()),
            Err(ConfigValidationError::InvertedTimeouts { outer: "overall_secs", .. })
        ));
    }

    #[test]
    fn test_validate_unknown_endpoint() {
        let config: FileConfig =
            toml::from_str("[resolvers.endpoints]\nBingAgent = \"http://x\"\n").unwrap();
        assert_eq!(
            config.validate(&ResolverRegistry::standard()),
            Err(ConfigValidationError::UnknownResolver("BingAgent".to_string()))
        );
    }

    #[test]
    fn test_validate_zero_http_timeout() {
        let config: FileConfig = toml::from_str("[resolvers]\nhttp_timeout_secs = 0\n").unwrap();
        assert_eq!(
            config.validate(&ResolverRegistry::standard()),
            Err(ConfigValidationError::ZeroHttpTimeout)
        );
    }
}
