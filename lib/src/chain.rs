//! Transition model over historical usage counts.
//!
//! [`TransitionChain`] turns a frequency snapshot into a per-service table
//! of `(next service, probability)` rows for the sampler to walk. Every row
//! carries the same global distribution `count[t] / total`: diagram edge
//! structure is discarded long before the counts reach this table, so there
//! is no adjacency to condition on. The chain is rebuilt from a fresh
//! snapshot on each generation request and never persisted.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors from building or walking a transition chain.
#[derive(Debug, Error)]
pub enum ChainError {
    /// No usage has ever been recorded; there is nothing to sample from.
    #[error("No usage history recorded, nothing to sample from")]
    NoHistory,

    /// The requested service has no transition row.
    #[error("Service '{0}' has no transition row; pick a start from the recorded history")]
    UnknownService(String),
}

/// Derived transition table: service -> weighted list of next services.
///
/// Rows are keyed and ordered by service name, so a seeded walk over the
/// same snapshot is reproducible.
#[derive(Debug, Clone)]
pub struct TransitionChain {
    rows: BTreeMap<String, Vec<(String, f64)>>,
}

impl TransitionChain {
    /// Build a chain from a frequency snapshot.
    ///
    /// Each service's probability is its share of the total observation
    /// count; probabilities in every row sum to 1. A single-service
    /// snapshot yields that service transitioning to itself with
    /// probability 1.
    ///
    /// ## Errors
    ///
    /// Returns [`ChainError::NoHistory`] when the snapshot holds zero total
    /// observations, rather than producing divide-by-zero rows.
    pub fn from_frequencies(frequencies: &BTreeMap<String, u64>) -> Result<Self, ChainError> {
        let total: u64 = frequencies.values().sum();
        if total == 0 {
            return Err(ChainError::NoHistory);
        }
        let total = total as f64;

        let marginal: Vec<(String, f64)> = frequencies
            .iter()
            .map(|(service, count)| (service.clone(), *count as f64 / total))
            .collect();

        let rows = frequencies
            .keys()
            .map(|service| (service.clone(), marginal.clone()))
            .collect();

        Ok(Self { rows })
    }

    /// The transition row for `service`, `None` if it was never observed.
    pub fn row(&self, service: &str) -> Option<&[(String, f64)]> {
        self.rows.get(service).map(Vec::as_slice)
    }

    /// Iterate over the chain's services in sorted order.
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Number of services in the chain.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the chain has no services.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
