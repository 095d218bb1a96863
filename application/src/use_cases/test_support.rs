//! Scripted Brains shared by the use-case tests.

use crate::ports::brain::{BrainError, DomainExpert, IntentAnalyzer, TechnicalPlanner};
use crate::registry::{BrainInstance, BrainRegistry};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use synapse_domain::{
    BrainRole, DomainQuery, DomainRecommendation, ExpertDomain, IntentAnalysis, RequestContext,
    TechnicalPlan,
};

/// Shared record of every query any scripted expert received, in call order
pub(crate) type CallLog = Arc<Mutex<Vec<DomainQuery>>>;

pub(crate) fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn logged_domains(log: &CallLog) -> Vec<ExpertDomain> {
    log.lock().unwrap().iter().map(|q| q.domain).collect()
}

pub(crate) struct ScriptedExpert {
    domain: ExpertDomain,
    confidence: f64,
    description: String,
    steps: Vec<String>,
    delay: Duration,
    failure: Option<BrainError>,
    raw_confidence: Option<f64>,
    panics: bool,
    round_bonus: f64,
    log: CallLog,
}

impl ScriptedExpert {
    pub fn new(domain: ExpertDomain, confidence: f64, description: &str, log: &CallLog) -> Self {
        Self {
            domain,
            confidence,
            description: description.to_string(),
            steps: Vec::new(),
            delay: Duration::ZERO,
            failure: None,
            raw_confidence: None,
            panics: false,
            round_bonus: 0.0,
            log: Arc::clone(log),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_steps(mut self, steps: &[&str]) -> Self {
        self.steps = steps.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn failing(mut self, error: BrainError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Bypass clamping, to simulate a misbehaving expert
    pub fn with_raw_confidence(mut self, confidence: f64) -> Self {
        self.raw_confidence = Some(confidence);
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    /// Confidence added per collaboration round
    pub fn with_round_bonus(mut self, bonus: f64) -> Self {
        self.round_bonus = bonus;
        self
    }
}

#[async_trait]
impl DomainExpert for ScriptedExpert {
    fn domains(&self) -> BTreeSet<ExpertDomain> {
        [self.domain].into_iter().collect()
    }

    async fn provide(&self, query: &DomainQuery) -> Result<DomainRecommendation, BrainError> {
        self.log.lock().unwrap().push(query.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.panics {
            panic!("scripted expert panic");
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let confidence = self.confidence + self.round_bonus * query.context.round as f64;
        let mut rec = DomainRecommendation::new(self.domain, confidence, self.description.clone())
            .with_steps(self.steps.clone());
        if let Some(raw) = self.raw_confidence {
            rec.confidence = raw;
        }
        Ok(rec)
    }
}

pub(crate) async fn register_expert(registry: &BrainRegistry, expert: ScriptedExpert) {
    let domain = expert.domain;
    registry
        .register(
            format!("{}-expert", domain),
            BrainRole::DomainExpert,
            BrainInstance::Expert(Arc::new(expert)),
            Vec::new(),
            [domain],
        )
        .await
        .unwrap();
}

pub(crate) struct ScriptedIntent {
    result: Result<IntentAnalysis, BrainError>,
    delay: Duration,
    panics: bool,
    pub calls: AtomicUsize,
}

impl ScriptedIntent {
    pub fn new(result: Result<IntentAnalysis, BrainError>) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
            panics: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }
}

#[async_trait]
impl IntentAnalyzer for ScriptedIntent {
    async fn analyze(
        &self,
        _text: &str,
        _context: Option<&RequestContext>,
    ) -> Result<IntentAnalysis, BrainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.panics {
            panic!("scripted intent panic");
        }
        self.result.clone()
    }
}

pub(crate) struct ScriptedPlanner {
    result: Result<TechnicalPlan, BrainError>,
    delay: Duration,
    pub calls: AtomicUsize,
}

impl ScriptedPlanner {
    pub fn new(result: Result<TechnicalPlan, BrainError>) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl TechnicalPlanner for ScriptedPlanner {
    async fn plan(
        &self,
        _intent: &IntentAnalysis,
        _context: Option<&RequestContext>,
    ) -> Result<TechnicalPlan, BrainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}

pub(crate) async fn register_intent(registry: &BrainRegistry, intent: Arc<ScriptedIntent>) {
    registry
        .register(
            "intent",
            BrainRole::Intent,
            BrainInstance::Intent(intent),
            Vec::new(),
            Vec::new(),
        )
        .await
        .unwrap();
}

pub(crate) async fn register_planner(registry: &BrainRegistry, planner: Arc<ScriptedPlanner>) {
    registry
        .register(
            "planner",
            BrainRole::TechnicalPlanner,
            BrainInstance::Planner(planner),
            Vec::new(),
            Vec::new(),
        )
        .await
        .unwrap();
}
