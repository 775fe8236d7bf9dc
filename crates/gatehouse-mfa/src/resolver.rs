//! Multifactor trigger resolution.

use crate::error::{ResolveError, SelectionError};
use crate::matcher::AttributeMatcher;
use crate::pattern::PatternCache;
use crate::registry::{ProviderRegistry, StaticProviderRegistry};
use crate::selector::{ProviderSelector, selector_for};
use gatehouse_core::{Authentication, GatehouseConfig, MultifactorPolicy, RegisteredService};
use serde::Serialize;
use std::sync::Arc;

/// Outcome of a resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Whether multifactor authentication must be enforced.
    pub triggered: bool,
    /// Providers to activate (empty when not triggered).
    pub provider_ids: Vec<String>,
    /// Trigger attributes that matched (empty when not triggered).
    pub matched_attributes: Vec<String>,
}

impl Resolution {
    /// The "do not escalate" outcome.
    pub fn not_triggered() -> Self {
        Self::default()
    }

    fn triggered(provider_ids: Vec<String>, matched_attributes: Vec<String>) -> Self {
        Self {
            triggered: true,
            provider_ids,
            matched_attributes,
        }
    }
}

/// Resolves whether a principal's attributes trigger a service's multifactor policy.
///
/// Holds no per-request state; one resolver can serve concurrent requests.
pub struct PolicyResolver {
    providers: Arc<dyn ProviderRegistry>,
    selector: Arc<dyn ProviderSelector>,
    patterns: PatternCache,
}

impl PolicyResolver {
    /// Create a resolver with an enabled pattern cache.
    pub fn new(providers: Arc<dyn ProviderRegistry>, selector: Arc<dyn ProviderSelector>) -> Self {
        Self {
            providers,
            selector,
            patterns: PatternCache::new(),
        }
    }

    /// Replace the pattern cache.
    pub fn with_pattern_cache(mut self, patterns: PatternCache) -> Self {
        self.patterns = patterns;
        self
    }

    /// Build a resolver from configuration: registered providers, selection
    /// strategy and pattern cache settings.
    pub fn from_config(config: &GatehouseConfig) -> Self {
        let providers = Arc::new(StaticProviderRegistry::from_config(&config.providers));
        let selector: Arc<dyn ProviderSelector> = Arc::from(selector_for(config.selection.strategy));
        Self::new(providers, selector).with_pattern_cache(PatternCache::from_config(&config.pattern_cache))
    }

    /// Decide whether multifactor authentication is triggered.
    ///
    /// Absent authentication, service or policy data, an incomplete policy,
    /// no matching attribute and no registered provider all yield
    /// [`Resolution::not_triggered`]. A pattern that does not compile is
    /// returned as [`ResolveError::InvalidPattern`].
    pub fn resolve(
        &self,
        authentication: Option<&Authentication>,
        service: Option<&RegisteredService>,
    ) -> Result<Resolution, ResolveError> {
        let (Some(authentication), Some(service)) = (authentication, service) else {
            tracing::debug!("No authentication or service is available to evaluate a multifactor policy");
            return Ok(Resolution::not_triggered());
        };

        let Some(policy) = service.multifactor_policy.as_ref() else {
            tracing::debug!(service = %service.name, "Service has no multifactor policy");
            return Ok(Resolution::not_triggered());
        };

        if !policy.is_actionable() {
            if policy.distinct_provider_ids().is_empty() {
                tracing::debug!(service = %service.name, "Multifactor policy does not list any providers");
            } else {
                tracing::debug!(
                    service = %service.name,
                    "Multifactor policy does not define a principal attribute and/or value to trigger on"
                );
            }
            return Ok(Resolution::not_triggered());
        }

        let trigger_names = policy.trigger_names();

        let pattern = self
            .patterns
            .get_or_compile(&policy.value_match_pattern)
            .map_err(|source| ResolveError::InvalidPattern {
                service: service.name.clone(),
                pattern: policy.value_match_pattern.clone(),
                source,
            })?;

        let principal = &authentication.principal;
        let matched = AttributeMatcher::new(&pattern).matches(&principal.attributes, &trigger_names);
        if !matched.is_match() {
            tracing::debug!(
                service = %service.name,
                principal = %principal.id,
                "No principal attribute value matches the multifactor trigger pattern"
            );
            return Ok(Resolution::not_triggered());
        }

        let candidates = self.registered_providers(service, policy);
        match self.selector.select(&candidates, service, principal) {
            Ok(provider_ids) if provider_ids.is_empty() => {
                tracing::debug!(
                    service = %service.name,
                    principal = %principal.id,
                    "Provider selection returned no provider"
                );
                Ok(Resolution::not_triggered())
            }
            Ok(provider_ids) => {
                tracing::info!(
                    service = %service.name,
                    principal = %principal.id,
                    providers = ?provider_ids,
                    attributes = ?matched.matched_names(),
                    "Multifactor authentication triggered by principal attribute"
                );
                Ok(Resolution::triggered(provider_ids, matched.into_names()))
            }
            Err(SelectionError::NoProviderAvailable { .. }) => {
                tracing::debug!(
                    service = %service.name,
                    principal = %principal.id,
                    "Principal attribute matched but no registered multifactor provider is available"
                );
                Ok(Resolution::not_triggered())
            }
        }
    }

    /// The policy's providers restricted to the ones currently registered.
    fn registered_providers(&self, service: &RegisteredService, policy: &MultifactorPolicy) -> Vec<String> {
        policy
            .distinct_provider_ids()
            .into_iter()
            .filter(|id| {
                let registered = self.providers.is_registered(id);
                if !registered {
                    tracing::debug!(
                        service = %service.name,
                        provider = %id,
                        "Ignoring unregistered multifactor provider referenced by policy"
                    );
                }
                registered
            })
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{AllProvidersSelector, RankedProviderSelector};
    use gatehouse_core::{AttributeValues, Principal};

    struct EmptySelector;

    impl ProviderSelector for EmptySelector {
        fn select(
            &self,
            _candidates: &[String],
            _service: &RegisteredService,
            _principal: &Principal,
        ) -> Result<Vec<String>, SelectionError> {
            Ok(Vec::new())
        }
    }

    fn resolver() -> PolicyResolver {
        PolicyResolver::new(
            Arc::new(StaticProviderRegistry::new(["mfa-duo", "mfa-yubikey"])),
            Arc::new(AllProvidersSelector),
        )
    }

    fn authentication() -> Authentication {
        Authentication::new(
            Principal::new("casuser").with_attribute("memberOf", AttributeValues::new(["staff", "vpn-users"])),
        )
    }

    fn service(policy: MultifactorPolicy) -> RegisteredService {
        RegisteredService::new(100, "vpn").with_policy(policy)
    }

    fn policy(names: &str, pattern: &str, providers: &[&str]) -> MultifactorPolicy {
        MultifactorPolicy::new(names, pattern, providers.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn test_missing_inputs_do_not_trigger() {
        let svc = service(policy("memberOf", "vpn-.*", &["mfa-duo"]));
        let auth = authentication();
        let r = resolver();
        assert!(!r.resolve(None, Some(&svc)).unwrap().triggered);
        assert!(!r.resolve(Some(&auth), None).unwrap().triggered);
        assert!(!r.resolve(None, None).unwrap().triggered);
    }

    #[test]
    fn test_service_without_policy_does_not_trigger() {
        let svc = RegisteredService::new(1, "wiki");
        let result = resolver().resolve(Some(&authentication()), Some(&svc)).unwrap();
        assert_eq!(result, Resolution::not_triggered());
    }

    #[test]
    fn test_policy_without_providers_does_not_trigger() {
        let svc = service(policy("memberOf", "vpn-.*", &[]));
        assert!(!resolver().resolve(Some(&authentication()), Some(&svc)).unwrap().triggered);
    }

    #[test]
    fn test_blank_trigger_or_pattern_does_not_trigger() {
        let auth = authentication();
        for p in [
            policy("", "vpn-.*", &["mfa-duo"]),
            policy("  ", "vpn-.*", &["mfa-duo"]),
            policy("memberOf", "", &["mfa-duo"]),
            policy("memberOf", " \t", &["mfa-duo"]),
        ] {
            let svc = service(p);
            assert!(!resolver().resolve(Some(&auth), Some(&svc)).unwrap().triggered);
        }
    }

    #[test]
    fn test_blank_policy_short_circuits_before_pattern_compilation() {
        let svc = service(policy("", "vpn-(", &["mfa-duo"]));
        assert!(resolver().resolve(Some(&authentication()), Some(&svc)).is_ok());
    }

    #[test]
    fn test_matching_attribute_triggers_with_registered_providers() {
        let svc = service(policy("memberOf", "vpn-.*", &["mfa-duo", "mfa-gone", "mfa-yubikey"]));
        let result = resolver().resolve(Some(&authentication()), Some(&svc)).unwrap();
        assert!(result.triggered);
        assert_eq!(result.provider_ids, vec!["mfa-duo".to_string(), "mfa-yubikey".to_string()]);
        assert_eq!(result.matched_attributes, vec!["memberOf".to_string()]);
    }

    #[test]
    fn test_comma_delimited_trigger_names() {
        let svc = service(policy("eduPersonAffiliation, memberOf", "^staff$", &["mfa-duo"]));
        let result = resolver().resolve(Some(&authentication()), Some(&svc)).unwrap();
        assert!(result.triggered);
        assert_eq!(result.matched_attributes, vec!["memberOf".to_string()]);
    }

    #[test]
    fn test_no_matching_value_does_not_trigger() {
        let svc = service(policy("memberOf", "^faculty$", &["mfa-duo"]));
        assert!(!resolver().resolve(Some(&authentication()), Some(&svc)).unwrap().triggered);
    }

    #[test]
    fn test_only_unregistered_providers_does_not_trigger() {
        let svc = service(policy("memberOf", "vpn-.*", &["mfa-gone"]));
        let result = resolver().resolve(Some(&authentication()), Some(&svc)).unwrap();
        assert_eq!(result, Resolution::not_triggered());
    }

    #[test]
    fn test_invalid_pattern_is_surfaced() {
        let svc = service(policy("memberOf", "vpn-(", &["mfa-duo"]));
        let err = resolver().resolve(Some(&authentication()), Some(&svc)).unwrap_err();
        let ResolveError::InvalidPattern { service, pattern, .. } = err;
        assert_eq!(service, "vpn");
        assert_eq!(pattern, "vpn-(");
    }

    #[test]
    fn test_ranked_selector_picks_one_provider() {
        let r = PolicyResolver::new(
            Arc::new(StaticProviderRegistry::new(["mfa-duo", "mfa-yubikey"])),
            Arc::new(RankedProviderSelector),
        );
        let svc = service(policy("memberOf", "vpn-.*", &["mfa-duo", "mfa-yubikey"]))
            .with_precedence(vec!["mfa-yubikey".into()]);
        let result = r.resolve(Some(&authentication()), Some(&svc)).unwrap();
        assert_eq!(result.provider_ids, vec!["mfa-yubikey".to_string()]);
    }

    #[test]
    fn test_empty_selection_does_not_trigger() {
        let r = PolicyResolver::new(
            Arc::new(StaticProviderRegistry::new(["mfa-duo"])),
            Arc::new(EmptySelector),
        );
        let svc = service(policy("memberOf", "vpn-.*", &["mfa-duo"]));
        let result = r.resolve(Some(&authentication()), Some(&svc)).unwrap();
        assert_eq!(result, Resolution::not_triggered());
    }

    #[test]
    fn test_authentication_attributes_are_not_trigger_inputs() {
        let auth = Authentication::new(Principal::new("u")).with_attribute("memberOf", "vpn-users");
        let svc = service(policy("memberOf", "vpn-.*", &["mfa-duo"]));
        let result = resolver().resolve(Some(&auth), Some(&svc)).unwrap();
        assert!(!result.triggered);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let r = resolver();
        let auth = authentication();
        let svc = service(policy("memberOf", "vpn-.*", &["mfa-duo"]));
        let first = r.resolve(Some(&auth), Some(&svc)).unwrap();
        let second = r.resolve(Some(&auth), Some(&svc)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolution_serializes() {
        let svc = service(policy("memberOf", "vpn-.*", &["mfa-duo"]));
        let result = resolver().resolve(Some(&authentication()), Some(&svc)).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["triggered"], serde_json::json!(true));
        assert_eq!(json["provider_ids"], serde_json::json!(["mfa-duo"]));
    }
}
