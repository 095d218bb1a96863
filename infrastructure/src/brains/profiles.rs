//! Built-in recommendation profile per domain.

use synapse_domain::{EffortLevel, ExpertDomain};

pub(crate) struct Profile {
    pub confidence: f64,
    pub description: &'static str,
    pub steps: &'static [&'static str],
    pub risks: &'static [&'static str],
    pub dependencies: &'static [&'static str],
    pub resources: &'static [&'static str],
    pub capabilities: &'static [&'static str],
    pub effort: EffortLevel,
}

pub(crate) fn default_profile(domain: ExpertDomain) -> Profile {
    match domain {
        ExpertDomain::Security => Profile {
            confidence: 0.85,
            description: "Enforce least privilege and encrypt data in transit and at rest.",
            steps: &[
                "Review access policies for least privilege",
                "Enable encryption with managed keys",
                "Rotate credentials after the change",
            ],
            risks: &["Over-broad permissions during rollout"],
            dependencies: &["key management service"],
            resources: &["security review"],
            capabilities: &["threat-modeling", "encryption"],
            effort: EffortLevel::Medium,
        },
        ExpertDomain::Network => Profile {
            confidence: 0.8,
            description: "Keep traffic on private routes and restrict ingress to known sources.",
            steps: &[
                "Restrict ingress rules to required ports",
                "Route internal traffic over private endpoints",
            ],
            risks: &["Connectivity loss while rules change"],
            dependencies: &["firewall rules"],
            resources: &["network change window"],
            capabilities: &["routing", "firewalls"],
            effort: EffortLevel::Medium,
        },
        ExpertDomain::Storage => Profile {
            confidence: 0.8,
            description: "Protect data with versioned, tested backups.",
            steps: &[
                "Enable versioning on the affected buckets",
                "Schedule backups and test a restore",
            ],
            risks: &["Restore path never exercised"],
            dependencies: &["backup storage"],
            resources: &["storage capacity"],
            capabilities: &["backups", "retention"],
            effort: EffortLevel::Low,
        },
        ExpertDomain::Orchestration => Profile {
            confidence: 0.75,
            description: "Roll out gradually with health checks and a rollback plan.",
            steps: &[
                "Add readiness and liveness checks",
                "Roll out with a canary release",
                "Document the rollback procedure",
            ],
            risks: &["Partial rollout leaves mixed versions"],
            dependencies: &["deployment pipeline"],
            resources: &["deployment pipeline"],
            capabilities: &["deployments", "scaling"],
            effort: EffortLevel::Medium,
        },
        ExpertDomain::ExternalServices => Profile {
            confidence: 0.7,
            description: "Isolate third-party calls behind timeouts and circuit breakers.",
            steps: &[
                "Wrap vendor calls with timeouts",
                "Add a circuit breaker for vendor outages",
            ],
            risks: &["Vendor rate limits"],
            dependencies: &["vendor credentials"],
            resources: &["vendor access"],
            capabilities: &["integrations"],
            effort: EffortLevel::Medium,
        },
        ExpertDomain::Monitoring => Profile {
            confidence: 0.8,
            description: "Make the change observable before it ships.",
            steps: &[
                "Add dashboards for the affected services",
                "Alert on error rate and latency regressions",
            ],
            risks: &["Alert fatigue from noisy thresholds"],
            dependencies: &["metrics pipeline"],
            resources: &["dashboard and alert rules"],
            capabilities: &["metrics", "alerting"],
            effort: EffortLevel::Low,
        },
    }
}
