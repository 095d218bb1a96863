//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use synapse_domain::ConsultationPattern;

/// Output format for coordination results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every phase, consultation detail and the execution plan
    Full,
    /// Decision, confidence and recommended actions only
    Summary,
    /// JSON output
    Json,
}

/// Consultation pattern override
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PatternArg {
    Parallel,
    Sequential,
    Hierarchical,
    Conditional,
    Collaborative,
}

impl From<PatternArg> for ConsultationPattern {
    fn from(arg: PatternArg) -> Self {
        match arg {
            PatternArg::Parallel => ConsultationPattern::Parallel,
            PatternArg::Sequential => ConsultationPattern::Sequential,
            PatternArg::Hierarchical => ConsultationPattern::Hierarchical,
            PatternArg::Conditional => ConsultationPattern::Conditional,
            PatternArg::Collaborative => ConsultationPattern::Collaborative,
        }
    }
}

/// CLI arguments for synapse
#[derive(Parser, Debug)]
#[command(name = "synapse")]
#[command(author, version, about = "Multi-Brain coordination - many experts, one explainable decision")]
#[command(long_about = r#"
Synapse routes a request through independent Brains and returns one decision.

A round has six phases:
1. Intent: what is asked, how confident and how risky
2. Planning: ordered technical steps
3. Consultation: domain experts (security, network, storage, ...) advise
4. Aggregation: confidences are combined
5. Decision: APPROVED, REQUIRES_REVIEW, ESCALATED or REJECTED
6. Execution plan: merged steps for approved requests

Configuration files are loaded from (in priority order):
1. SYNAPSE_* environment variables
2. --config <path>     Explicit config file
3. ./synapse.toml      Project-level config
4. ~/.config/synapse/config.toml   Global config

Example:
  synapse "Encrypt the database backups and alert on failed jobs"
  synapse --pattern collaborative -o full "Expose the billing API publicly"
  synapse --status
"#)]
pub struct Cli {
    /// The request to coordinate
    pub question: Option<String>,

    /// Target environment passed to the Brains as request context
    #[arg(short, long, value_name = "NAME")]
    pub env: Option<String>,

    /// Always use this consultation pattern
    #[arg(short, long, value_enum)]
    pub pattern: Option<PatternArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Show registered Brains and thresholds and exit
    #[arg(long)]
    pub status: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        let cli = Cli::try_parse_from([
            "synapse",
            "-vv",
            "--pattern",
            "hierarchical",
            "-o",
            "json",
            "Encrypt the backups",
        ])
        .unwrap();

        assert_eq!(cli.question.as_deref(), Some("Encrypt the backups"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(
            cli.pattern.map(ConsultationPattern::from),
            Some(ConsultationPattern::Hierarchical)
        );
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["synapse", "--status"]).unwrap();
        assert!(cli.status);
        assert!(cli.question.is_none());
        assert_eq!(cli.output, OutputFormat::Summary);
        assert!(cli.pattern.is_none());
    }

    #[test]
    fn test_unknown_pattern_is_rejected() {
        assert!(Cli::try_parse_from(["synapse", "--pattern", "random", "x"]).is_err());
    }
}
