//! `gatehouse resolve` - decide whether a principal must pass multifactor
//! authentication for a service.

use crate::audit::{AuditAction, AuditRecord, AuditSink};
use anyhow::Context;
use gatehouse_core::{AttributeValues, Authentication, GatehouseConfig, Principal};
use gatehouse_mfa::{PolicyResolver, Resolution};
use serde_json::json;

/// Parse a `name=value` attribute argument.
pub fn parse_attribute(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{arg}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("attribute name is empty in '{arg}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Build a principal from repeated `name=value` pairs; repeats accumulate values.
pub fn build_principal(id: &str, attributes: &[(String, String)]) -> Principal {
    let mut principal = Principal::new(id);
    for (name, value) in attributes {
        let mut values: Vec<String> = principal
            .attribute(name)
            .map(|v| v.iter().map(str::to_string).collect())
            .unwrap_or_default();
        values.push(value.clone());
        principal.attributes.insert(name.clone(), AttributeValues::from(values));
    }
    principal
}

/// Resolve the decision, then record it.
pub fn run_resolve(
    config: &GatehouseConfig,
    service_id: u64,
    principal_id: &str,
    attributes: &[(String, String)],
    audit: &dyn AuditSink,
) -> anyhow::Result<Resolution> {
    let service = config.get_service(service_id);
    if service.is_none() {
        tracing::warn!(service_id, "Service is not registered");
    }
    let resource = service
        .map(|s| s.name.clone())
        .unwrap_or_else(|| service_id.to_string());

    let authentication = Authentication::new(build_principal(principal_id, attributes));
    let resolver = PolicyResolver::from_config(config);

    match resolver.resolve(Some(&authentication), service) {
        Ok(resolution) => {
            let mut outcome = json!({
                "triggered": resolution.triggered,
                "providers": resolution.provider_ids,
            });
            if config.audit.include_matched_attributes {
                outcome["matched_attributes"] = json!(resolution.matched_attributes);
            }
            audit.record(AuditRecord::new(
                AuditAction::MultifactorResolution,
                principal_id,
                resource,
                outcome,
            ));
            Ok(resolution)
        }
        Err(e) => {
            audit.record(AuditRecord::new(
                AuditAction::MultifactorResolution,
                principal_id,
                resource,
                json!({ "error": e.to_string() }),
            ));
            Err(e).with_context(|| format!("failed to resolve multifactor policy for service {service_id}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::testing::RecordingSink;

    const CONFIG: &str = r#"
audit:
  include_matched_attributes: true
providers:
  - id: mfa-duo
services:
  - id: 100
    name: vpn
    multifactor_policy:
      trigger_attribute_names: memberOf
      value_match_pattern: "vpn-.*"
      provider_ids: [mfa-duo]
  - id: 300
    name: broken
    multifactor_policy:
      trigger_attribute_names: memberOf
      value_match_pattern: "vpn-("
      provider_ids: [mfa-duo]
"#;

    fn attrs(pairs: &[&str]) -> Vec<(String, String)> {
        pairs.iter().map(|p| parse_attribute(p).unwrap()).collect()
    }

    #[test]
    fn test_parse_attribute() {
        assert_eq!(parse_attribute("memberOf=vpn-users").unwrap(), ("memberOf".into(), "vpn-users".into()));
        assert_eq!(parse_attribute("note=a=b").unwrap(), ("note".into(), "a=b".into()));
        assert!(parse_attribute("memberOf").is_err());
        assert!(parse_attribute("=x").is_err());
    }

    #[test]
    fn test_repeated_attributes_accumulate() {
        let principal = build_principal("casuser", &attrs(&["memberOf=staff", "memberOf=vpn-users"]));
        let values = principal.attribute("memberOf").unwrap();
        assert_eq!(values.iter().collect::<Vec<_>>(), vec!["staff", "vpn-users"]);
    }

    #[test]
    fn test_resolve_records_audit_event() {
        let config = GatehouseConfig::from_yaml(CONFIG).unwrap();
        let sink = RecordingSink::default();

        let resolution = run_resolve(
            &config,
            100,
            "casuser",
            &attrs(&["memberOf=staff", "memberOf=vpn-users"]),
            &sink,
        )
        .unwrap();
        assert!(resolution.triggered);

        let records = sink.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, AuditAction::MultifactorResolution);
        assert_eq!(records[0].resource, "vpn");
        assert_eq!(records[0].outcome["providers"], json!(["mfa-duo"]));
        assert_eq!(records[0].outcome["matched_attributes"], json!(["memberOf"]));
    }

    #[test]
    fn test_unknown_service_is_not_triggered() {
        let config = GatehouseConfig::from_yaml(CONFIG).unwrap();
        let sink = RecordingSink::default();
        let resolution = run_resolve(&config, 999, "casuser", &attrs(&["memberOf=vpn-users"]), &sink).unwrap();
        assert!(!resolution.triggered);
        assert_eq!(sink.take()[0].resource, "999");
    }

    #[test]
    fn test_invalid_pattern_is_audited_and_returned() {
        let config = GatehouseConfig::from_yaml(CONFIG).unwrap();
        let sink = RecordingSink::default();
        assert!(run_resolve(&config, 300, "casuser", &attrs(&["memberOf=vpn-users"]), &sink).is_err());
        let records = sink.take();
        assert!(records[0].outcome["error"].as_str().unwrap().contains("vpn-("));
    }
}
