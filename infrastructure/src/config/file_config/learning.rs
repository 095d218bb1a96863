//! Learning log configuration from TOML (`[learning]` section)
//!
//! ```toml
//! [learning]
//! enabled = true
//! path = "~/.local/share/synapse/learning.jsonl"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLearningConfig {
    pub enabled: bool,
    /// JSONL file; defaults to the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl FileLearningConfig {
    /// Resolve the log path, expanding a leading `~/`
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) => match path.strip_prefix("~/") {
                Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
                None => Some(PathBuf::from(path)),
            },
            None => dirs::data_dir().map(|d| d.join("synapse").join("learning.jsonl")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path() {
        let config = FileLearningConfig {
            enabled: true,
            path: Some("/tmp/learning.jsonl".to_string()),
        };
        assert_eq!(
            config.resolved_path(),
            Some(PathBuf::from("/tmp/learning.jsonl"))
        );
    }

    #[test]
    fn test_home_expansion() {
        let config = FileLearningConfig {
            enabled: true,
            path: Some("~/logs/learning.jsonl".to_string()),
        };
        if let (Some(path), Some(home)) = (config.resolved_path(), dirs::home_dir()) {
            assert_eq!(path, home.join("logs/learning.jsonl"));
        }
    }
}
