//! Configuration types for gatehouse.
//!
//! Configuration is loaded from a YAML file (gatehouse.yaml) and, optionally,
//! one YAML file per registered service from `services_dir`.
//!
//! # Sections
//!
//! - **selection**: provider selection strategy
//! - **pattern_cache**: caching of compiled trigger patterns
//! - **audit**: audit records written by the calling layer
//! - **providers**: multifactor providers currently registered
//! - **services**: registered services with their multifactor policies
//! - **tokens**: access tokens seeded into the in-memory registry (development only)

pub mod audit;
pub mod provider;

use crate::service::RegisteredService;
use crate::token::AccessToken;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub use audit::AuditConfig;
pub use provider::{ProviderConfig, SelectionConfig, SelectionStrategy};

/// Complete gatehouse configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatehouseConfig {
    /// Deployment name.
    #[serde(default)]
    pub project: Option<String>,

    /// Provider selection settings.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Compiled pattern cache settings.
    #[serde(default)]
    pub pattern_cache: PatternCacheConfig,

    /// Audit settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Registered multifactor providers.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,

    /// Inline service definitions.
    #[serde(default)]
    pub services: Vec<RegisteredService>,

    /// Directory containing one service definition per YAML file.
    #[serde(default)]
    pub services_dir: Option<PathBuf>,

    /// Access tokens seeded into the in-memory registry.
    #[serde(default)]
    pub tokens: Vec<AccessToken>,
}

/// Compiled pattern cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternCacheConfig {
    /// Whether compiled patterns are cached across resolutions.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PatternCacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Invalid(String),
}

/// Severity level for validation findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFinding {
    pub severity: Severity,
    /// Location within the config (e.g., "services[vpn].multifactor_policy").
    pub location: String,
    pub message: String,
}

impl ConfigFinding {
    fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            location: location.into(),
            message: message.into(),
        }
    }

    fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.location, self.message)
    }
}

impl GatehouseConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration and the service definitions from `services_dir`.
    ///
    /// A relative `services_dir` is resolved against the config file's directory.
    pub fn load_with_context(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(services_dir) = &config.services_dir {
            let services_path = if services_dir.is_absolute() {
                services_dir.clone()
            } else {
                base_dir.join(services_dir)
            };

            if !services_path.is_dir() {
                return Err(ConfigError::Invalid(format!(
                    "services_dir '{}' is not a directory",
                    services_path.display()
                )));
            }

            let mut files: Vec<PathBuf> = fs::read_dir(&services_path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.extension().map(|e| e == "yaml" || e == "yml").unwrap_or(false))
                .collect();
            files.sort();

            for file in files {
                let content = fs::read_to_string(&file)?;
                let service: RegisteredService = serde_yaml::from_str(&content)?;
                config.services.push(service);
            }
        }

        Ok(config)
    }

    /// Look up a service by id.
    pub fn get_service(&self, id: u64) -> Option<&RegisteredService> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Look up a service by name.
    pub fn get_service_by_name(&self, name: &str) -> Option<&RegisteredService> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Identifiers of all configured providers, trimmed.
    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id.trim()).collect()
    }

    /// Check the configuration for consistency.
    ///
    /// Errors: duplicate ids, trigger patterns that do not compile.
    /// Warnings: policies that reference unregistered providers or that are
    /// incomplete and will therefore never trigger.
    pub fn validate(&self) -> Vec<ConfigFinding> {
        let mut findings = Vec::new();

        let mut provider_ids = HashSet::new();
        for provider in &self.providers {
            let id = provider.id.trim();
            if id.is_empty() {
                findings.push(ConfigFinding::error("providers", "provider id must not be blank"));
            } else if !provider_ids.insert(id) {
                findings.push(ConfigFinding::error(
                    "providers",
                    format!("duplicate provider id '{}'", provider.id),
                ));
            }
        }

        let mut service_ids = HashSet::new();
        for service in &self.services {
            let location = format!("services[{}]", service.name);
            if !service_ids.insert(service.id) {
                findings.push(ConfigFinding::error(
                    &location,
                    format!("duplicate service id {}", service.id),
                ));
            }

            let Some(policy) = &service.multifactor_policy else {
                continue;
            };
            let location = format!("{location}.multifactor_policy");

            if !policy.is_actionable() {
                findings.push(ConfigFinding::warning(
                    &location,
                    "policy is missing providers, trigger attribute names or a pattern and will never trigger",
                ));
                continue;
            }

            if let Err(e) = regex::Regex::new(&policy.value_match_pattern) {
                findings.push(ConfigFinding::error(
                    &location,
                    format!("invalid value_match_pattern '{}': {}", policy.value_match_pattern, e),
                ));
            }

            for provider in policy.distinct_provider_ids() {
                if !provider_ids.contains(provider) {
                    findings.push(ConfigFinding::warning(
                        &location,
                        format!("provider '{provider}' is not registered and will be ignored"),
                    ));
                }
            }
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
project: campus
selection:
  strategy: lexical
providers:
  - id: mfa-duo
    name: Duo Security
  - id: mfa-yubikey
services:
  - id: 100
    name: vpn
    provider_precedence: [mfa-yubikey, mfa-duo]
    multifactor_policy:
      trigger_attribute_names: memberOf
      value_match_pattern: "vpn-.*"
      provider_ids: [mfa-duo, mfa-yubikey]
  - id: 200
    name: wiki
tokens:
  - id: tok-123
    scopes: [uma_protection]
    authentication:
      principal:
        id: casuser
"#;

    #[test]
    fn test_parse_sample_config() {
        let config = GatehouseConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.project.as_deref(), Some("campus"));
        assert_eq!(config.selection.strategy, SelectionStrategy::Lexical);
        assert!(config.pattern_cache.enabled);
        assert!(config.audit.enabled);
        assert_eq!(config.provider_ids(), vec!["mfa-duo", "mfa-yubikey"]);
        assert_eq!(config.get_service(100).unwrap().name, "vpn");
        assert!(config.get_service_by_name("wiki").unwrap().multifactor_policy.is_none());
        assert_eq!(config.tokens.len(), 1);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_defaults() {
        let config = GatehouseConfig::from_yaml("{}").unwrap();
        assert_eq!(config.selection.strategy, SelectionStrategy::Precedence);
        assert!(config.services.is_empty());
    }

    #[test]
    fn test_validate_reports_invalid_pattern_and_unknown_provider() {
        let config = GatehouseConfig::from_yaml(
            r#"
providers:
  - id: mfa-duo
services:
  - id: 1
    name: broken
    multifactor_policy:
      trigger_attribute_names: memberOf
      value_match_pattern: "vpn-("
      provider_ids: [mfa-duo, mfa-gone]
"#,
        )
        .unwrap();

        let findings = config.validate();
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Error && f.message.contains("invalid value_match_pattern")));
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Warning && f.message.contains("mfa-gone")));
    }

    #[test]
    fn test_validate_reports_duplicates_and_incomplete_policy() {
        let config = GatehouseConfig::from_yaml(
            r#"
providers:
  - id: mfa-duo
  - id: mfa-duo
services:
  - id: 1
    name: a
    multifactor_policy:
      trigger_attribute_names: ""
      value_match_pattern: ".*"
      provider_ids: [mfa-duo]
  - id: 1
    name: b
"#,
        )
        .unwrap();

        let findings = config.validate();
        assert!(findings.iter().any(|f| f.message.contains("duplicate provider id")));
        assert!(findings.iter().any(|f| f.message.contains("duplicate service id 1")));
        assert!(findings.iter().any(|f| f.message.contains("never trigger")));
    }

    #[test]
    fn test_validate_trims_provider_ids() {
        let config = GatehouseConfig::from_yaml(
            r#"
providers:
  - id: " mfa-duo"
  - id: "mfa-duo "
services:
  - id: 1
    name: vpn
    multifactor_policy:
      trigger_attribute_names: memberOf
      value_match_pattern: vpn
      provider_ids: [mfa-duo]
"#,
        )
        .unwrap();

        let findings = config.validate();
        assert!(findings.iter().any(|f| f.message.contains("duplicate provider id")));
        assert!(!findings.iter().any(|f| f.message.contains("not registered")));
        assert_eq!(config.provider_ids(), vec!["mfa-duo", "mfa-duo"]);
    }

    #[test]
    fn test_load_with_context_reads_services_dir() {
        let dir = tempfile::tempdir().unwrap();
        let services = dir.path().join("services");
        std::fs::create_dir(&services).unwrap();

        let mut svc = std::fs::File::create(services.join("vpn.yaml")).unwrap();
        writeln!(
            svc,
            "id: 7\nname: vpn\nmultifactor_policy:\n  trigger_attribute_names: memberOf\n  value_match_pattern: vpn\n  provider_ids: [mfa-duo]"
        )
        .unwrap();
        std::fs::write(services.join("README.txt"), "ignored").unwrap();

        let config_path = dir.path().join("gatehouse.yaml");
        std::fs::write(&config_path, "services_dir: services\nproviders:\n  - id: mfa-duo\n").unwrap();

        let config = GatehouseConfig::load_with_context(&config_path).unwrap();
        assert_eq!(config.services.len(), 1);
        assert!(config.get_service(7).unwrap().multifactor_policy.is_some());
    }

    #[test]
    fn test_load_with_context_rejects_missing_services_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("gatehouse.yaml");
        std::fs::write(&config_path, "services_dir: nowhere\n").unwrap();

        let err = GatehouseConfig::load_with_context(&config_path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
