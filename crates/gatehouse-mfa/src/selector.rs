//! Provider selection strategies.
//!
//! A policy may list several providers. A [`ProviderSelector`] decides which
//! of the registered candidates to activate. Strategies are interchangeable
//! without touching the resolver:
//!
//! - [`AllProvidersSelector`]: every candidate, in declared order
//! - [`RankedProviderSelector`]: one provider, by service precedence then id
//! - [`LexicalProviderSelector`]: one provider, the smallest id

use crate::error::SelectionError;
use gatehouse_core::{Principal, RegisteredService, SelectionStrategy};

/// Picks the provider(s) to activate among registered candidates.
pub trait ProviderSelector: Send + Sync {
    /// Select from `candidates` (declared order, no repeats).
    ///
    /// Fails with [`SelectionError::NoProviderAvailable`] only when
    /// `candidates` is empty.
    fn select(
        &self,
        candidates: &[String],
        service: &RegisteredService,
        principal: &Principal,
    ) -> Result<Vec<String>, SelectionError>;
}

fn no_provider(service: &RegisteredService) -> SelectionError {
    SelectionError::NoProviderAvailable {
        service: service.name.clone(),
    }
}

/// Activates every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllProvidersSelector;

impl ProviderSelector for AllProvidersSelector {
    fn select(
        &self,
        candidates: &[String],
        service: &RegisteredService,
        _principal: &Principal,
    ) -> Result<Vec<String>, SelectionError> {
        if candidates.is_empty() {
            return Err(no_provider(service));
        }
        Ok(candidates.to_vec())
    }
}

/// Activates the single best-ranked candidate.
///
/// Rank is the provider's position in `service.provider_precedence`;
/// providers not listed there rank after all listed ones. Ties break on
/// lexical order of the id.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankedProviderSelector;

impl ProviderSelector for RankedProviderSelector {
    fn select(
        &self,
        candidates: &[String],
        service: &RegisteredService,
        _principal: &Principal,
    ) -> Result<Vec<String>, SelectionError> {
        match candidates {
            [] => Err(no_provider(service)),
            [only] => Ok(vec![only.clone()]),
            _ => {
                let best = candidates
                    .iter()
                    .min_by(|a, b| {
                        let rank_a = service.precedence_of(a).unwrap_or(usize::MAX);
                        let rank_b = service.precedence_of(b).unwrap_or(usize::MAX);
                        rank_a.cmp(&rank_b).then_with(|| a.cmp(b))
                    })
                    .ok_or_else(|| no_provider(service))?;
                tracing::debug!(
                    service = %service.name,
                    provider = %best,
                    candidates = candidates.len(),
                    "Selected multifactor provider by precedence"
                );
                Ok(vec![best.clone()])
            }
        }
    }
}

/// Activates the lexically smallest candidate id.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalProviderSelector;

impl ProviderSelector for LexicalProviderSelector {
    fn select(
        &self,
        candidates: &[String],
        service: &RegisteredService,
        _principal: &Principal,
    ) -> Result<Vec<String>, SelectionError> {
        candidates
            .iter()
            .min()
            .map(|id| vec![id.clone()])
            .ok_or_else(|| no_provider(service))
    }
}

/// Build the selector for a configured strategy.
pub fn selector_for(strategy: SelectionStrategy) -> Box<dyn ProviderSelector> {
    match strategy {
        SelectionStrategy::All => Box::new(AllProvidersSelector),
        SelectionStrategy::Precedence => Box::new(RankedProviderSelector),
        SelectionStrategy::Lexical => Box::new(LexicalProviderSelector),
    }
}
