//! Presentation-level configuration
//!
//! Configuration for REPL behavior.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

impl ReplConfig {
    /// Configured history path, or `<data dir>/query-broker/history.txt`
    pub fn history_path(&self) -> Option<PathBuf> {
        match &self.history_file {
            Some(path) => Some(PathBuf::from(path)),
            None => dirs::data_dir().map(|p| p.join("query-broker").join("history.txt")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_history_file_wins() {
        let config = ReplConfig {
            history_file: Some("/tmp/broker-history.txt".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.history_path(),
            Some(PathBuf::from("/tmp/broker-history.txt"))
        );
        assert!(config.show_progress);
    }
}
