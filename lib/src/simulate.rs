//! Weighted random walk over a transition chain.
//!
//! [`Sampler`] owns the only randomness in the crate. It is constructed
//! from an explicit seed (or the OS entropy source) so generated sequences
//! are reproducible under test; no process-global RNG is consulted.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::chain::{ChainError, TransitionChain};

/// Seeded generator of service sequences.
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    /// Create a deterministic sampler from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a sampler seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Pick a uniformly random starting service from the chain.
    ///
    /// ## Errors
    ///
    /// Returns [`ChainError::NoHistory`] if the chain has no services.
    pub fn random_start(&mut self, chain: &TransitionChain) -> Result<String, ChainError> {
        if chain.is_empty() {
            return Err(ChainError::NoHistory);
        }
        let idx = self.rng.random_range(0..chain.len());
        chain
            .services()
            .nth(idx)
            .map(str::to_owned)
            .ok_or(ChainError::NoHistory)
    }

    /// Generate a sequence of `length` services starting at `start`.
    ///
    /// The sequence opens with `start`; each further element is a weighted
    /// draw over the transition row of the current last element. A length
    /// of 1 returns `[start]` without consulting the chain at all.
    ///
    /// ## Errors
    ///
    /// Returns [`ChainError::UnknownService`] when the current last element
    /// has no transition row - callers should pick `start` from the
    /// snapshot the chain was built from. There is no fallback
    /// substitution.
    pub fn generate(
        &mut self,
        chain: &TransitionChain,
        start: &str,
        length: usize,
    ) -> Result<Vec<String>, ChainError> {
        let mut current = start.to_string();
        let mut sequence = Vec::with_capacity(length.max(1));
        sequence.push(current.clone());

        for _ in 1..length {
            let row = chain
                .row(&current)
                .ok_or_else(|| ChainError::UnknownService(current.clone()))?;
            let next = Self::weighted_pick(&mut self.rng, row).ok_or(ChainError::NoHistory)?;
            current = next.to_string();
            sequence.push(current.clone());
        }

        Ok(sequence)
    }

    /// Weighted selection over a transition row using the cumulative
    /// distribution.
    fn weighted_pick<'a>(rng: &mut StdRng, row: &'a [(String, f64)]) -> Option<&'a str> {
        let total: f64 = row.iter().map(|(_, weight)| weight).sum();
        if total <= 0.0 {
            return None;
        }

        let mut draw = rng.random::<f64>() * total;
        for (service, weight) in row {
            draw -= weight;
            if draw <= 0.0 {
                return Some(service);
            }
        }
        row.last().map(|(service, _)| service.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn chain_of(pairs: &[(&str, u64)]) -> TransitionChain {
        let frequencies: BTreeMap<String, u64> =
            pairs.iter().map(|(s, n)| (s.to_string(), *n)).collect();
        TransitionChain::from_frequencies(&frequencies).unwrap()
    }

    #[test]
    fn length_one_returns_start_without_lookup() {
        let chain = chain_of(&[("a", 1), ("b", 1)]);
        let mut sampler = Sampler::seeded(0);

        // "z" has no row, but a single-element walk never consults the chain
        let sequence = sampler.generate(&chain, "z", 1).unwrap();
        assert_eq!(sequence, vec!["z".to_string()]);
    }

    #[test]
    fn unknown_start_fails_on_first_draw() {
        let chain = chain_of(&[("a", 1), ("b", 1)]);
        let mut sampler = Sampler::seeded(0);

        let result = sampler.generate(&chain, "z", 3);
        assert!(matches!(result, Err(ChainError::UnknownService(s)) if s == "z"));
    }

    #[test]
    fn sequence_has_requested_length_and_start() {
        let chain = chain_of(&[("a", 2), ("b", 5), ("c", 1)]);
        let mut sampler = Sampler::seeded(42);

        let sequence = sampler.generate(&chain, "b", 8).unwrap();
        assert_eq!(sequence.len(), 8);
        assert_eq!(sequence[0], "b");
    }

    #[test]
    fn generated_services_come_from_the_chain() {
        let chain = chain_of(&[("ec2", 3), ("s3", 2), ("lambda", 1)]);
        let mut sampler = Sampler::seeded(7);

        let sequence = sampler.generate(&chain, "ec2", 20).unwrap();
        for service in &sequence {
            assert!(chain.row(service).is_some(), "unexpected service {service}");
        }
    }

    #[test]
    fn single_service_chain_repeats_it() {
        let chain = chain_of(&[("s3", 4)]);
        let mut sampler = Sampler::seeded(1);

        let sequence = sampler.generate(&chain, "s3", 5).unwrap();
        assert_eq!(sequence, vec!["s3"; 5]);
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let chain = chain_of(&[("a", 1), ("b", 2), ("c", 3)]);

        let first = Sampler::seeded(99).generate(&chain, "a", 12).unwrap();
        let second = Sampler::seeded(99).generate(&chain, "a", 12).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn random_start_comes_from_the_chain() {
        let chain = chain_of(&[("a", 1), ("b", 1), ("c", 1)]);
        let mut sampler = Sampler::seeded(5);

        for _ in 0..10 {
            let start = sampler.random_start(&chain).unwrap();
            assert!(chain.row(&start).is_some());
        }
    }

    #[test]
    fn random_start_is_reproducible_under_seed() {
        let chain = chain_of(&[("a", 1), ("b", 1), ("c", 1)]);

        let first = Sampler::seeded(11).random_start(&chain).unwrap();
        let second = Sampler::seeded(11).random_start(&chain).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn heavily_weighted_service_dominates() {
        // One service carries ~99% of the mass; a long walk must visit it.
        let chain = chain_of(&[("rare", 1), ("common", 99)]);
        let mut sampler = Sampler::seeded(3);

        let sequence = sampler.generate(&chain, "common", 50).unwrap();
        let common_hits = sequence.iter().filter(|s| s.as_str() == "common").count();
        assert!(common_hits > 40, "expected common to dominate, got {common_hits}");
    }
}
