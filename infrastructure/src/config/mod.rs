//! Configuration file loading for synapse
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SYNAPSE_`-prefixed environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./synapse.toml` or `./.synapse.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/synapse/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBrainsConfig, FileConfig, FileCoordinatorConfig,
    FileExpertConfig, FileLearningConfig, FileOrchestratorConfig, parse_effort,
    parse_expert_domains,
};
pub use loader::ConfigLoader;
