//! Console output formatter for coordination results

use crate::cli::commands::OutputFormat;
use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use synapse_application::CoordinatorStatus;
use synapse_domain::{
    ConsultationResult, CoordinationResult, Decision, PhaseOutcome, RiskLevel,
};

/// Formats coordination results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format in the requested output format
    pub fn render(result: &CoordinationResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(result),
            OutputFormat::Summary => Self::format_summary(result),
            OutputFormat::Json => Self::format_json(result),
        }
    }

    /// Format the complete result
    pub fn format(result: &CoordinationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Synapse Coordination"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Request:".cyan().bold(), result.request));
        output.push_str(&Self::decision_line(result));
        if let Some(error) = &result.error {
            output.push_str(&format!("{} {}\n", "Error:".red().bold(), error));
        }

        // Intent
        output.push_str(&Self::section_header("Intent"));
        match &result.intent {
            Some(intent) => {
                output.push_str(&format!(
                    "Confidence {:.2}, risk {}\n",
                    intent.overall_confidence,
                    Self::risk(intent.risk_level)
                ));
                for requirement in &intent.technical_requirements {
                    output.push_str(&format!("  * {}\n", requirement));
                }
            }
            None => output.push_str("(not available)\n"),
        }

        // Technical plan
        if let Some(plan) = &result.technical_plan {
            output.push_str(&Self::section_header("Technical Plan"));
            output.push_str(&format!("Confidence {:.2}\n", plan.confidence));
            for (i, step) in plan.steps.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {} ({} min)\n",
                    i + 1,
                    step.description,
                    step.duration_minutes
                ));
            }
        }

        // Consultation
        if let Some(consultation) = &result.consultation {
            output.push_str(&Self::section_header("Expert Consultation"));
            output.push_str(&Self::consultation(consultation));
        }

        // Confidence breakdown
        output.push_str(&Self::section_header("Confidence"));
        let breakdown = &result.breakdown;
        output.push_str(&format!("  intent     {:.2}\n", breakdown.intent));
        match breakdown.planning {
            Some(planning) => output.push_str(&format!("  planning   {:.2}\n", planning)),
            None => output.push_str("  planning   -\n"),
        }
        for (domain, confidence) in &breakdown.domains {
            output.push_str(&format!("  {:<10} {:.2}\n", domain.as_str(), confidence));
        }
        output.push_str(&format!("  {}      {:.2}\n", "total".bold(), breakdown.total));
        if let Some(diagnostic) = &breakdown.diagnostic {
            output.push_str(&format!("  {}\n", diagnostic.reasoning.dimmed()));
        }

        // Risk
        output.push_str(&Self::section_header("Risk"));
        output.push_str(&format!("Level: {}\n", Self::risk(result.risk.level)));
        for factor in &result.risk.factors {
            output.push_str(&format!("  {} {}\n", "!".yellow(), factor));
        }
        for mitigation in &result.risk.mitigations {
            output.push_str(&format!("  {} {}\n", "+".green(), mitigation));
        }

        output.push_str(&Self::actions(result));

        // Execution plan
        if let Some(plan) = &result.execution_plan {
            output.push_str(&Self::section_header("Execution Plan"));
            for step in &plan.steps {
                output.push_str(&format!(
                    "  {}. [{}] {} ({} min)\n",
                    step.order, step.source, step.description, step.duration_minutes
                ));
            }
            output.push_str(&format!(
                "Total: {} min\n",
                plan.total_duration_minutes
            ));
            if !plan.resources.is_empty() {
                output.push_str(&format!("Resources: {}\n", plan.resources.join(", ")));
            }
        }

        // Phases
        output.push_str(&Self::section_header("Phases"));
        for timing in &result.metadata.phases {
            let outcome = match timing.outcome {
                PhaseOutcome::Success => "success".green(),
                PhaseOutcome::Partial => "partial".yellow(),
                PhaseOutcome::Abort => "abort".red(),
            };
            output.push_str(&format!(
                "  {}. {:<18} {:<8} {:>6} ms",
                timing.phase.number(),
                timing.phase.as_str(),
                outcome,
                timing.duration_ms
            ));
            if let Some(detail) = &timing.detail {
                output.push_str(&format!("  {}", detail.dimmed()));
            }
            output.push('\n');
        }
        if result.metadata.timed_out {
            output.push_str(&format!("{}\n", "Round budget exceeded".red()));
        }

        output.push_str(&Self::footer(result));
        output
    }

    /// Format as JSON
    pub fn format_json(result: &CoordinationResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the decision only (concise output)
    pub fn format_summary(result: &CoordinationResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Synapse Decision ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n", "Q:".bold(), result.request));
        output.push_str(&Self::decision_line(result));
        if let Some(error) = &result.error {
            output.push_str(&format!("{} {}\n", "Error:".red().bold(), error));
        }
        if let Some(consultation) = &result.consultation {
            output.push_str(&format!(
                "{} {}\n",
                "Advice:".bold(),
                consultation.resolved.primary.summary()
            ));
        }
        output.push_str(&Self::actions(result));
        output
    }

    /// Format the coordinator status (for `--status`)
    pub fn format_status(status: &CoordinatorStatus) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Synapse Status"));
        output.push('\n');
        output.push_str(&format!("Active rounds: {}\n", status.active_rounds));
        output.push_str(&format!(
            "Thresholds: intent >= {:.2}, consult >= {:.2}, approve >= {:.2}, escalate >= {:.2}\n",
            status.thresholds.intent_min_confidence,
            status.thresholds.consultation,
            status.thresholds.approval,
            status.thresholds.escalation
        ));
        output.push_str(&format!("{}\n", "Registered Brains:".cyan().bold()));
        if status.registered_brain_ids.is_empty() {
            output.push_str("  (none)\n");
        }
        for id in &status.registered_brain_ids {
            output.push_str(&format!("  * {}\n", id));
        }
        output
    }

    fn consultation(consultation: &ConsultationResult) -> String {
        let mut output = format!(
            "Pattern {}, {} ms, consensus {}\n",
            consultation.pattern,
            consultation.duration_ms,
            if consultation.consensus { "yes" } else { "no" }
        );
        for (domain, rec) in &consultation.recommendations {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ({:.2}) ──", domain, rec.confidence).yellow().bold(),
                rec.description
            ));
        }
        if !consultation.skipped_domains.is_empty() {
            let skipped: Vec<&str> = consultation
                .skipped_domains
                .iter()
                .map(|d| d.as_str())
                .collect();
            output.push_str(&format!("\nSkipped: {}\n", skipped.join(", ")));
        }
        for failed in &consultation.failed_domains {
            output.push_str(&format!(
                "\n{}\nError: {}\n",
                format!("── {} ──", failed.domain).red().bold(),
                failed.reason
            ));
        }

        let resolved = &consultation.resolved;
        output.push_str(&format!(
            "\n{} {} ({:.2})\n{}\n",
            "Resolution:".cyan().bold(),
            resolved.strategy,
            resolved.confidence,
            resolved.reasoning
        ));
        for conflict in &resolved.conflicts {
            output.push_str(&format!("  {} {}\n", "~".yellow(), conflict.description));
        }
        if let Some(reason) = &consultation.fallback_reason {
            output.push_str(&format!("{} {}\n", "Fallback:".yellow().bold(), reason));
        }
        output
    }

    fn actions(result: &CoordinationResult) -> String {
        if result.recommended_actions.is_empty() {
            return String::new();
        }
        let mut output = format!("\n{}\n", "Recommended Actions:".green().bold());
        for action in &result.recommended_actions {
            output.push_str(&format!("  * {}\n", action));
        }
        output
    }

    fn decision_line(result: &CoordinationResult) -> String {
        format!(
            "{} {} (confidence {:.2})\n",
            "Decision:".cyan().bold(),
            Self::decision(result.decision),
            result.confidence
        )
    }

    fn decision(decision: Decision) -> ColoredString {
        match decision {
            Decision::Approved => decision.as_str().green().bold(),
            Decision::RequiresReview => decision.as_str().yellow().bold(),
            Decision::Escalated => decision.as_str().magenta().bold(),
            Decision::Rejected => decision.as_str().red().bold(),
        }
    }

    fn risk(level: RiskLevel) -> ColoredString {
        match level {
            RiskLevel::Low => level.as_str().green(),
            RiskLevel::Medium => level.as_str().yellow(),
            RiskLevel::High => level.as_str().red(),
        }
    }

    fn header(title: &str) -> String {
        let line = "═".repeat(60);
        format!(
            "{}\n{}\n{}",
            line.cyan(),
            format!("  {}", title).cyan().bold(),
            line.cyan()
        )
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n", format!("━━━ {} ━━━", title).blue().bold())
    }

    fn footer(result: &CoordinationResult) -> String {
        format!(
            "\n{}\n{}\n",
            format!(
                "Brains: {} | {} ms",
                result.metadata.participating_brains.join(", "),
                result.metadata.duration_ms
            )
            .dimmed(),
            "═".repeat(60).cyan()
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &CoordinationResult) -> String {
        ConsoleFormatter::format(result)
    }

    fn format_json(&self, result: &CoordinationResult) -> String {
        ConsoleFormatter::format_json(result)
    }

    fn format_summary(&self, result: &CoordinationResult) -> String {
        ConsoleFormatter::format_summary(result)
    }
}
