//! Brain registry
//!
//! Tracks registered Brains with their role, capabilities, served domains
//! and health. Indices hold every registered id (including brains in
//! `Error`), but every lookup filters to `Active` brains and returns cloned
//! handles, so callers never hold the lock while awaiting a Brain.

use crate::ports::brain::{BrainError, DomainExpert, IntentAnalyzer, TechnicalPlanner};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use synapse_domain::{BrainDescriptor, BrainRole, BrainStatus, ExpertDomain};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Default deadline for a single health check
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors returned by registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Brain not found: {0}")]
    NotFound(String),
}

/// A Brain implementation, tagged with the role interface it provides
#[derive(Clone)]
pub enum BrainInstance {
    Intent(Arc<dyn IntentAnalyzer>),
    Planner(Arc<dyn TechnicalPlanner>),
    Expert(Arc<dyn DomainExpert>),
}

impl BrainInstance {
    /// Role whose interface this instance implements
    pub fn role(&self) -> BrainRole {
        match self {
            BrainInstance::Intent(_) => BrainRole::Intent,
            BrainInstance::Planner(_) => BrainRole::TechnicalPlanner,
            BrainInstance::Expert(_) => BrainRole::DomainExpert,
        }
    }

    /// Whether both wrap the same allocation
    pub fn same_instance(&self, other: &BrainInstance) -> bool {
        match (self, other) {
            (BrainInstance::Intent(a), BrainInstance::Intent(b)) => Arc::ptr_eq(a, b),
            (BrainInstance::Planner(a), BrainInstance::Planner(b)) => Arc::ptr_eq(a, b),
            (BrainInstance::Expert(a), BrainInstance::Expert(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub async fn health_check(&self) -> Result<(), BrainError> {
        match self {
            BrainInstance::Intent(brain) => brain.health_check().await,
            BrainInstance::Planner(brain) => brain.health_check().await,
            BrainInstance::Expert(brain) => brain.health_check().await,
        }
    }
}

impl std::fmt::Debug for BrainInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BrainInstance::{}", self.role())
    }
}

/// Snapshot of a registered Brain
#[derive(Debug, Clone)]
pub struct BrainHandle {
    pub descriptor: BrainDescriptor,
    pub instance: BrainInstance,
}

impl BrainHandle {
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }
}

/// Outcome of a health sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    pub checked: usize,
    pub healthy: Vec<String>,
    /// `(id, reason)` of brains demoted to `Error`
    pub demoted: Vec<(String, String)>,
}

impl HealthReport {
    pub fn all_healthy(&self) -> bool {
        self.demoted.is_empty()
    }
}

struct Entry {
    descriptor: BrainDescriptor,
    instance: BrainInstance,
}

#[derive(Default)]
struct Indices {
    brains: BTreeMap<String, Entry>,
    by_role: BTreeMap<BrainRole, BTreeSet<String>>,
    by_capability: BTreeMap<String, BTreeSet<String>>,
    by_domain: BTreeMap<ExpertDomain, BTreeSet<String>>,
}

impl Indices {
    fn insert(&mut self, descriptor: BrainDescriptor, instance: BrainInstance) {
        let id = descriptor.id.clone();
        self.by_role
            .entry(descriptor.role)
            .or_default()
            .insert(id.clone());
        for capability in &descriptor.capabilities {
            self.by_capability
                .entry(capability.clone())
                .or_default()
                .insert(id.clone());
        }
        for domain in &descriptor.domains {
            self.by_domain.entry(*domain).or_default().insert(id.clone());
        }
        self.brains.insert(id, Entry { descriptor, instance });
    }

    fn remove(&mut self, id: &str) -> Option<Entry> {
        let entry = self.brains.remove(id)?;
        unindex(&mut self.by_role, id);
        unindex(&mut self.by_capability, id);
        unindex(&mut self.by_domain, id);
        Some(entry)
    }

    fn active_handles<'a>(&self, ids: impl IntoIterator<Item = &'a String>) -> Vec<BrainHandle> {
        ids.into_iter()
            .filter_map(|id| self.brains.get(id))
            .filter(|entry| entry.descriptor.is_active())
            .map(|entry| BrainHandle {
                descriptor: entry.descriptor.clone(),
                instance: entry.instance.clone(),
            })
            .collect()
    }
}

fn unindex<K: Ord>(index: &mut BTreeMap<K, BTreeSet<String>>, id: &str) {
    index.retain(|_, ids| {
        ids.remove(id);
        !ids.is_empty()
    });
}

/// Registry of Brains shared by the orchestrator and coordinator
pub struct BrainRegistry {
    inner: RwLock<Indices>,
    health_timeout: Duration,
}

impl Default for BrainRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BrainRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Indices::default()),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }

    pub fn with_health_timeout(mut self, health_timeout: Duration) -> Self {
        self.health_timeout = health_timeout;
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, Indices> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Indices> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    async fn check_health(&self, instance: &BrainInstance) -> Result<(), String> {
        match timeout(self.health_timeout, instance.health_check()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("health check exceeded {:?}", self.health_timeout)),
        }
    }

    /// Register a Brain.
    ///
    /// The instance must implement the interface required by `role`. A
    /// domain expert must declare at least one domain and may only declare
    /// domains the instance reports serving. On success an initial health
    /// check sets the status to `Active` or `Error`.
    pub async fn register(
        &self,
        id: impl Into<String>,
        role: BrainRole,
        instance: BrainInstance,
        capabilities: impl IntoIterator<Item = String>,
        domains: impl IntoIterator<Item = ExpertDomain>,
    ) -> Result<BrainDescriptor, RegistryError> {
        let id = id.into();
        let domains: BTreeSet<ExpertDomain> = domains.into_iter().collect();

        validate_registration(&id, role, &instance, &domains)?;
        if self.read().brains.contains_key(&id) {
            return Err(RegistryError::Validation(format!(
                "brain '{}' is already registered",
                id
            )));
        }

        let mut descriptor = BrainDescriptor::new(id.clone(), role)
            .with_capabilities(capabilities)
            .with_domains(domains);

        let transition = match self.check_health(&instance).await {
            Ok(()) => descriptor.mark_active(),
            Err(reason) => {
                warn!(brain = %id, %reason, "Initial health check failed");
                descriptor.mark_error(reason)
            }
        };
        transition.map_err(|e| RegistryError::Validation(e.to_string()))?;

        let mut indices = self.write();
        if indices.brains.contains_key(&id) {
            return Err(RegistryError::Validation(format!(
                "brain '{}' is already registered",
                id
            )));
        }
        indices.insert(descriptor.clone(), instance);

        info!(
            brain = %id,
            role = %role,
            status = %descriptor.status,
            "Registered brain"
        );
        Ok(descriptor)
    }

    /// Remove a Brain from every index. Returns the removed descriptor,
    /// marked `Inactive`.
    pub fn deregister(&self, id: &str) -> Result<BrainDescriptor, RegistryError> {
        let entry = self
            .write()
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        let mut descriptor = entry.descriptor;
        descriptor.mark_inactive();
        info!(brain = %id, "Deregistered brain");
        Ok(descriptor)
    }

    /// Descriptor of a registered Brain regardless of status
    pub fn descriptor(&self, id: &str) -> Option<BrainDescriptor> {
        self.read().brains.get(id).map(|e| e.descriptor.clone())
    }

    /// All descriptors, sorted by id
    pub fn descriptors(&self) -> Vec<BrainDescriptor> {
        self.read()
            .brains
            .values()
            .map(|e| e.descriptor.clone())
            .collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.read().brains.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().brains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().brains.is_empty()
    }

    pub fn lookup_by_id(&self, id: &str) -> Option<BrainHandle> {
        let indices = self.read();
        let (id, _) = indices.brains.get_key_value(id)?;
        indices.active_handles([id]).into_iter().next()
    }

    pub fn lookup_by_role(&self, role: BrainRole) -> Vec<BrainHandle> {
        let indices = self.read();
        match indices.by_role.get(&role) {
            Some(ids) => indices.active_handles(ids),
            None => Vec::new(),
        }
    }

    pub fn lookup_by_capability(&self, capability: &str) -> Vec<BrainHandle> {
        let indices = self.read();
        match indices.by_capability.get(capability) {
            Some(ids) => indices.active_handles(ids),
            None => Vec::new(),
        }
    }

    pub fn lookup_by_domain(&self, domain: ExpertDomain) -> Vec<BrainHandle> {
        let indices = self.read();
        match indices.by_domain.get(&domain) {
            Some(ids) => indices.active_handles(ids),
            None => Vec::new(),
        }
    }

    /// First active intent analyzer, by id
    pub fn intent_analyzer(&self) -> Option<(String, Arc<dyn IntentAnalyzer>)> {
        self.lookup_by_role(BrainRole::Intent)
            .into_iter()
            .find_map(|handle| match handle.instance {
                BrainInstance::Intent(brain) => Some((handle.descriptor.id, brain)),
                _ => None,
            })
    }

    /// First active technical planner, by id
    pub fn technical_planner(&self) -> Option<(String, Arc<dyn TechnicalPlanner>)> {
        self.lookup_by_role(BrainRole::TechnicalPlanner)
            .into_iter()
            .find_map(|handle| match handle.instance {
                BrainInstance::Planner(brain) => Some((handle.descriptor.id, brain)),
                _ => None,
            })
    }

    /// First active expert serving `domain`, by id
    pub fn expert_for(&self, domain: ExpertDomain) -> Option<(String, Arc<dyn DomainExpert>)> {
        self.lookup_by_domain(domain)
            .into_iter()
            .find_map(|handle| match handle.instance {
                BrainInstance::Expert(brain) => Some((handle.descriptor.id, brain)),
                _ => None,
            })
    }

    pub fn has_expert_for(&self, domain: ExpertDomain) -> bool {
        self.expert_for(domain).is_some()
    }

    /// Re-check every active Brain and demote failures to `Error`.
    ///
    /// Checks run concurrently without holding the lock. Brains are never
    /// promoted back to `Active`.
    pub async fn sweep_health(&self) -> HealthReport {
        let active: Vec<(String, BrainInstance)> = {
            let indices = self.read();
            indices
                .brains
                .values()
                .filter(|e| e.descriptor.is_active())
                .map(|e| (e.descriptor.id.clone(), e.instance.clone()))
                .collect()
        };

        let checks = active
            .iter()
            .map(|(id, instance)| async move { (id, instance, self.check_health(instance).await) });
        let results = futures::future::join_all(checks).await;

        let mut report = HealthReport {
            checked: results.len(),
            ..HealthReport::default()
        };
        let mut indices = self.write();
        for (id, checked, result) in results {
            let id = id.clone();
            match result {
                Ok(()) => report.healthy.push(id),
                Err(reason) => {
                    // deregistered, or replaced under the same id, while being checked
                    let Some(entry) = indices.brains.get_mut(&id) else {
                        continue;
                    };
                    if !entry.instance.same_instance(checked) {
                        debug!(brain = %id, "Brain replaced during sweep, keeping its status");
                        continue;
                    }
                    if entry.descriptor.status == BrainStatus::Active
                        && entry.descriptor.mark_error(reason.clone()).is_ok()
                    {
                        warn!(brain = %id, %reason, "Health sweep demoted brain");
                        report.demoted.push((id, reason));
                    }
                }
            }
        }
        debug!(
            checked = report.checked,
            demoted = report.demoted.len(),
            "Health sweep finished"
        );
        report
    }
}

fn validate_registration(
    id: &str,
    role: BrainRole,
    instance: &BrainInstance,
    domains: &BTreeSet<ExpertDomain>,
) -> Result<(), RegistryError> {
    if id.trim().is_empty() {
        return Err(RegistryError::Validation("brain id must not be empty".into()));
    }
    if instance.role() != role {
        return Err(RegistryError::Validation(format!(
            "brain '{}' registered as {} does not implement the {} interface",
            id, role, role
        )));
    }

    match instance {
        BrainInstance::Expert(expert) => {
            if domains.is_empty() {
                return Err(RegistryError::Validation(format!(
                    "domain expert '{}' must declare at least one domain",
                    id
                )));
            }
            let served = expert.domains();
            if let Some(missing) = domains.iter().find(|d| !served.contains(*d)) {
                return Err(RegistryError::Validation(format!(
                    "domain expert '{}' does not serve declared domain {}",
                    id, missing
                )));
            }
        }
        _ if !domains.is_empty() => {
            return Err(RegistryError::Validation(format!(
                "only domain experts declare domains, '{}' is a {}",
                id, role
            )));
        }
        _ => {}
    }
    Ok(())
}
