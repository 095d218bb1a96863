//! Brain configuration from TOML (`[brains]` and `[[experts]]`)
//!
//! ```toml
//! [brains]
//! intent = true     # register the keyword intent analyzer
//! planner = true    # register the outline planner
//!
//! [[experts]]
//! id = "security-expert"
//! domains = ["security"]
//! confidence = 0.85
//! description = "Encrypt data at rest with managed keys."
//! steps = ["Create a KMS key", "Enable bucket encryption"]
//! effort = "medium"
//! ```
//!
//! Without any `[[experts]]` entry the built-in profile of every domain is
//! registered.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBrainsConfig {
    pub intent: bool,
    pub planner: bool,
}

impl Default for FileBrainsConfig {
    fn default() -> Self {
        Self {
            intent: true,
            planner: true,
        }
    }
}

/// A static expert profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExpertConfig {
    pub id: String,
    /// Domain names, e.g. `"security"` or `"external_services"`
    pub domains: Vec<String>,
    pub capabilities: Vec<String>,
    pub confidence: f64,
    pub description: String,
    pub steps: Vec<String>,
    pub risks: Vec<String>,
    pub dependencies: Vec<String>,
    pub resources: Vec<String>,
    /// `low`, `medium` or `high`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort: Option<String>,
}
