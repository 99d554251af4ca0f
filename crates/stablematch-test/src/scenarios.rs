//! Hand-written preference profiles.

use stablematch_core::PreferenceModel;

/// Raw preference lists for both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceProfile {
    pub proposers: Vec<Vec<usize>>,
    pub receivers: Vec<Vec<usize>>,
}

impl PreferenceProfile {
    pub fn new(proposers: Vec<Vec<usize>>, receivers: Vec<Vec<usize>>) -> Self {
        Self {
            proposers,
            receivers,
        }
    }

    /// Builds the validated model.
    ///
    /// # Panics
    ///
    /// Panics if the lists are malformed; fixtures are expected to be valid.
    pub fn into_model(self) -> PreferenceModel {
        match PreferenceModel::new(self.proposers, self.receivers) {
            Ok(model) => model,
            Err(e) => panic!("fixture preferences are invalid: {e}"),
        }
    }
}

/// Both proposers want receiver 0, which prefers proposer 1.
///
/// Deferred acceptance takes three steps and ends with 0-1, 1-0.
pub fn crossed_pair() -> PreferenceProfile {
    PreferenceProfile::new(vec![vec![0, 1], vec![0, 1]], vec![vec![1, 0], vec![0, 1]])
}

/// Everyone gets their first choice.
pub fn aligned(n: usize) -> PreferenceProfile {
    let proposers = (0..n).map(|p| rotated(n, p)).collect();
    let receivers = (0..n).map(|r| rotated(n, r)).collect();
    PreferenceProfile::new(proposers, receivers)
}

/// Proposer 0 lists nobody; proposer 1 and receiver 0 list each other.
pub fn empty_list() -> PreferenceProfile {
    PreferenceProfile::new(vec![vec![], vec![0]], vec![vec![1]])
}

/// The only acceptable pair is listed by the proposer alone.
pub fn one_sided() -> PreferenceProfile {
    PreferenceProfile::new(vec![vec![0]], vec![vec![]])
}

/// Three agents per side where proposers and receivers disagree in a cycle.
///
/// The proposer-optimal and receiver-optimal stable matchings differ.
pub fn latin_square() -> PreferenceProfile {
    PreferenceProfile::new(
        vec![vec![0, 1, 2], vec![1, 2, 0], vec![2, 0, 1]],
        vec![vec![1, 2, 0], vec![2, 0, 1], vec![0, 1, 2]],
    )
}

/// All proposers share one list and all receivers share one list.
pub fn common_ranking(n: usize) -> PreferenceProfile {
    let list: Vec<usize> = (0..n).collect();
    PreferenceProfile::new(vec![list.clone(); n], vec![list; n])
}

fn rotated(n: usize, start: usize) -> Vec<usize> {
    (0..n).map(|i| (start + i) % n).collect()
}
