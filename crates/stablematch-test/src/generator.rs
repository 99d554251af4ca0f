//! Seeded random preference profiles.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::scenarios::PreferenceProfile;

/// Generates shuffled preference lists for `n` agents per side.
///
/// The same seed always yields the same sequence of profiles.
///
/// # Example
///
/// ```
/// use stablematch_test::PreferenceGenerator;
///
/// let a = PreferenceGenerator::seeded(42).complete(6);
/// let b = PreferenceGenerator::seeded(42).complete(6);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone)]
pub struct PreferenceGenerator {
    rng: ChaCha8Rng,
}

impl PreferenceGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Every agent ranks every agent of the other side.
    pub fn complete(&mut self, n: usize) -> PreferenceProfile {
        self.generate(n, false)
    }

    /// Every list keeps a random prefix of 60 to 100 percent of its entries.
    pub fn incomplete(&mut self, n: usize) -> PreferenceProfile {
        self.generate(n, true)
    }

    fn generate(&mut self, n: usize, truncate: bool) -> PreferenceProfile {
        let mut proposers = Vec::with_capacity(n);
        let mut receivers = Vec::with_capacity(n);
        for _ in 0..n {
            proposers.push(self.list(n, truncate));
            receivers.push(self.list(n, truncate));
        }
        PreferenceProfile::new(proposers, receivers)
    }

    fn list(&mut self, n: usize, truncate: bool) -> Vec<usize> {
        let mut list: Vec<usize> = (0..n).collect();
        list.shuffle(&mut self.rng);
        if truncate {
            let floor = n * 6 / 10;
            let keep = self.rng.random_range(floor..=n);
            list.truncate(keep);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_lists_are_permutations() {
        let profile = PreferenceGenerator::seeded(1).complete(8);
        for list in profile.proposers.iter().chain(&profile.receivers) {
            let mut sorted = list.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..8).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_incomplete_lists_keep_sixty_percent() {
        let mut generator = PreferenceGenerator::seeded(9);
        for _ in 0..20 {
            let profile = generator.incomplete(10);
            for list in profile.proposers.iter().chain(&profile.receivers) {
                assert!(list.len() >= 6 && list.len() <= 10);
            }
            profile.into_model();
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = PreferenceGenerator::seeded(1).complete(10);
        let b = PreferenceGenerator::seeded(2).complete(10);
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_agents() {
        let profile = PreferenceGenerator::seeded(0).incomplete(0);
        assert!(profile.proposers.is_empty());
        assert!(profile.receivers.is_empty());
    }
}
