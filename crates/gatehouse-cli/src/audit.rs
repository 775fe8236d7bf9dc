//! Audit records for engine decisions.
//!
//! The engine never audits itself. Commands call the engine, then hand the
//! outcome to an [`AuditSink`].

use chrono::{DateTime, Utc};
use gatehouse_core::AuditConfig;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Kind of decision being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    MultifactorResolution,
    TokenValidation,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultifactorResolution => write!(f, "MFA_RESOLUTION"),
            Self::TokenValidation => write!(f, "TOKEN_VALIDATION"),
        }
    }
}

/// One audited decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub action: AuditAction,
    /// Principal the decision is about ("unknown" when it could not be established).
    pub principal: String,
    /// Resource the decision is about (service name, or required scope).
    pub resource: String,
    /// Decision outcome.
    pub outcome: serde_json::Value,
}

impl AuditRecord {
    pub fn new(
        action: AuditAction,
        principal: impl Into<String>,
        resource: impl Into<String>,
        outcome: serde_json::Value,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            action,
            principal: principal.into(),
            resource: resource.into(),
            outcome,
        }
    }
}

/// Destination for audit records.
pub trait AuditSink: Send + Sync {
    fn record(&self, record: AuditRecord);
}

/// Emits audit records as structured `tracing` events.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: AuditRecord) {
        tracing::info!(
            target: "gatehouse::audit",
            event_id = %record.event_id,
            occurred_at = %record.occurred_at.to_rfc3339(),
            action = %record.action,
            principal = %record.principal,
            resource = %record.resource,
            outcome = %record.outcome,
            "Audit event"
        );
    }
}

/// Discards audit records.
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _record: AuditRecord) {}
}

/// Build the sink for the configured audit settings.
pub fn sink_for(config: &AuditConfig) -> Box<dyn AuditSink> {
    if config.enabled {
        Box::new(TracingAuditSink)
    } else {
        Box::new(NullAuditSink)
    }
}
