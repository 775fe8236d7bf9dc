//! Audit configuration for the calling layer.

use serde::{Deserialize, Serialize};

/// Configuration for audit records emitted after each decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Whether audit records are emitted.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Whether matched attribute names are included in resolution records.
    #[serde(default)]
    pub include_matched_attributes: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            include_matched_attributes: false,
        }
    }
}

fn default_enabled() -> bool {
    true
}
