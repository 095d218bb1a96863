//! Progress reporting for coordination rounds

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};
use synapse_application::CoordinationProgress;
use synapse_domain::{CoordinationPhase, Decision, ExpertDomain, PhaseOutcome};

/// Reports round progress with a phase bar and a spinner for expert calls
pub struct ProgressReporter {
    multi: MultiProgress,
    round_bar: Mutex<Option<ProgressBar>>,
    domain_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            round_bar: Mutex::new(None),
            domain_bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("  {spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_display_name(phase: CoordinationPhase) -> String {
        let name = match phase {
            CoordinationPhase::Intent => "Intent Analysis",
            CoordinationPhase::Planning => "Technical Planning",
            CoordinationPhase::Consultation => "Expert Consultation",
            CoordinationPhase::Aggregation => "Confidence Aggregation",
            CoordinationPhase::Decision => "Decision",
            CoordinationPhase::ExecutionPlanning => "Execution Planning",
        };
        format!("Phase {}: {}", phase.number(), name)
    }

    fn outcome_mark(outcome: PhaseOutcome) -> String {
        match outcome {
            PhaseOutcome::Success => "v".green().to_string(),
            PhaseOutcome::Partial => "~".yellow().to_string(),
            PhaseOutcome::Abort => "x".red().to_string(),
        }
    }

    fn with_round_bar(&self, f: impl FnOnce(&ProgressBar)) {
        let mut guard = self.round_bar.lock().unwrap_or_else(PoisonError::into_inner);
        let bar = guard.get_or_insert_with(|| {
            let pb = self
                .multi
                .add(ProgressBar::new(CoordinationPhase::ALL.len() as u64));
            pb.set_style(Self::round_style());
            pb
        });
        f(bar);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinationProgress for ProgressReporter {
    fn on_phase_start(&self, phase: CoordinationPhase) {
        self.with_round_bar(|pb| {
            pb.set_prefix(Self::phase_display_name(phase));
            pb.set_message("running...");
        });
    }

    fn on_phase_complete(&self, phase: CoordinationPhase, outcome: PhaseOutcome) {
        if phase == CoordinationPhase::Consultation
            && let Some(spinner) = self
                .domain_bar
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take()
        {
            spinner.finish_and_clear();
        }
        self.with_round_bar(|pb| {
            pb.set_message(format!("{} {}", Self::outcome_mark(outcome), phase));
            pb.set_position(phase.number() as u64);
        });
    }

    fn on_domain_start(&self, domain: ExpertDomain) {
        let mut guard = self.domain_bar.lock().unwrap_or_else(PoisonError::into_inner);
        let spinner = guard.get_or_insert_with(|| {
            let pb = self.multi.add(ProgressBar::new_spinner());
            pb.set_style(Self::spinner_style());
            pb.set_prefix("experts");
            pb
        });
        spinner.set_message(format!("asking {}", domain));
        spinner.tick();
    }

    fn on_domain_complete(&self, domain: ExpertDomain, success: bool) {
        if let Some(spinner) = self
            .domain_bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), domain)
            } else {
                format!("{} {}", "x".red(), domain)
            };
            spinner.set_message(status);
        }
    }

    fn on_decision(&self, decision: Decision, confidence: f64) {
        if let Some(pb) = self
            .round_bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pb.finish_with_message(format!("{} ({:.2})", decision.as_str().bold(), confidence));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl CoordinationProgress for SimpleProgress {
    fn on_phase_start(&self, phase: CoordinationPhase) {
        eprintln!(
            "{} {}",
            "->".cyan(),
            ProgressReporter::phase_display_name(phase).bold()
        );
    }

    fn on_phase_complete(&self, phase: CoordinationPhase, outcome: PhaseOutcome) {
        eprintln!(
            "  {} {} {}",
            ProgressReporter::outcome_mark(outcome),
            phase,
            outcome.as_str()
        );
    }

    fn on_domain_complete(&self, domain: ExpertDomain, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), domain);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), domain);
        }
    }

    fn on_decision(&self, decision: Decision, confidence: f64) {
        eprintln!("{} {} ({:.2})", "=>".cyan(), decision.as_str().bold(), confidence);
    }
}
