//! Blocking-pair detection.
//!
//! The verifier assumes nothing about where a matching came from, so both
//! solver outputs are checked through the same code path.

use std::fmt;

use stablematch_core::{BlockingPair, Matching, PreferenceModel, Side};
use thiserror::Error;
use tracing::debug;

/// Returns every blocking pair of `matching`, ordered by proposer then rank.
///
/// An unmatched proposer is willing to block with any receiver it lists.
/// Unmatched receivers are not scanned, so a blocking pair is only reported
/// when the receiver already holds someone it likes less. Pairs that are not
/// mutually acceptable never block.
pub fn find_blocking_pairs(matching: &Matching, model: &PreferenceModel) -> Vec<BlockingPair> {
    let mut blocking = Vec::new();

    for (p, list) in model.lists(Side::Proposer).iter().enumerate() {
        let cutoff = matching
            .receiver_of(p)
            .and_then(|current| list.rank_of(current))
            .unwrap_or(list.len());

        for &r in &list.as_slice()[..cutoff] {
            let Some(other) = matching.proposer_of(r) else {
                continue;
            };
            let Some(r_list) = model.list(Side::Receiver, r) else {
                continue;
            };
            if r_list.prefers(p, other) == Some(true) {
                blocking.push(BlockingPair::new(p, r));
            }
        }
    }

    blocking
}

/// True when `matching` has no blocking pair.
pub fn is_stable(matching: &Matching, model: &PreferenceModel) -> bool {
    find_blocking_pairs(matching, model).is_empty()
}

/// Reasons a matching fails certification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertificationError {
    #[error("matching has {actual} {side}s, model has {expected}")]
    SizeMismatch {
        side: Side,
        expected: usize,
        actual: usize,
    },

    #[error("matching is not a consistent one-to-one pairing")]
    Inconsistent,

    #[error("proposer {proposer} and receiver {receiver} are matched but not mutually acceptable")]
    UnacceptablePair { proposer: usize, receiver: usize },

    #[error("matching has {} blocking pair(s): {}", .pairs.len(), PairList(.pairs))]
    Unstable { pairs: Vec<BlockingPair> },
}

struct PairList<'a>(&'a [BlockingPair]);

impl fmt::Display for PairList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pair) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{pair}")?;
        }
        Ok(())
    }
}

/// Full structural and stability check of a matching against one model.
#[derive(Debug, Clone, Copy)]
pub struct StabilityVerifier<'m> {
    model: &'m PreferenceModel,
}

impl<'m> StabilityVerifier<'m> {
    pub fn new(model: &'m PreferenceModel) -> Self {
        Self { model }
    }

    pub fn find_blocking_pairs(&self, matching: &Matching) -> Vec<BlockingPair> {
        find_blocking_pairs(matching, self.model)
    }

    /// Checks sizes, symmetry, mutual acceptability of every pair and stability.
    pub fn certify(&self, matching: &Matching) -> Result<(), CertificationError> {
        for (side, actual) in [
            (Side::Proposer, matching.proposer_count()),
            (Side::Receiver, matching.receiver_count()),
        ] {
            let expected = self.model.count(side);
            if actual != expected {
                return Err(CertificationError::SizeMismatch {
                    side,
                    expected,
                    actual,
                });
            }
        }

        if !matching.is_consistent() {
            return Err(CertificationError::Inconsistent);
        }

        if let Some((proposer, receiver)) = matching
            .pairs()
            .find(|&(p, r)| !self.model.mutually_acceptable(p, r))
        {
            return Err(CertificationError::UnacceptablePair { proposer, receiver });
        }

        let pairs = self.find_blocking_pairs(matching);
        if !pairs.is_empty() {
            return Err(CertificationError::Unstable { pairs });
        }

        debug!(event = "certified", matched = matching.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crossed() -> PreferenceModel {
        PreferenceModel::new(vec![vec![0, 1], vec![0, 1]], vec![vec![1, 0], vec![0, 1]]).unwrap()
    }

    fn matching(partners: Vec<Option<usize>>, receivers: usize) -> Matching {
        Matching::from_proposer_partners(partners, receivers).unwrap()
    }

    #[test]
    fn test_stable_matching_has_no_blocking_pairs() {
        let model = crossed();
        let m = matching(vec![Some(1), Some(0)], 2);
        assert!(find_blocking_pairs(&m, &model).is_empty());
        assert!(is_stable(&m, &model));
    }

    #[test]
    fn test_identity_matching_is_blocked() {
        let model = crossed();
        let m = matching(vec![Some(0), Some(1)], 2);
        // Proposer 1 prefers receiver 0, who prefers proposer 1 over proposer 0.
        assert_eq!(find_blocking_pairs(&m, &model), vec![BlockingPair::new(1, 0)]);
    }

    #[test]
    fn test_unmatched_proposer_scans_whole_list() {
        let model = crossed();
        let m = matching(vec![Some(1), None], 2);
        // Proposer 1 is free; receiver 0 is free too and is skipped,
        // receiver 1 holds proposer 0 whom it prefers.
        assert!(find_blocking_pairs(&m, &model).is_empty());

        let m = matching(vec![Some(0), None], 2);
        assert_eq!(find_blocking_pairs(&m, &model), vec![BlockingPair::new(1, 0)]);
    }

    #[test]
    fn test_unmatched_receiver_is_not_reported() {
        let model = PreferenceModel::new(vec![vec![0, 1]], vec![vec![0], vec![0]]).unwrap();
        // Proposer 0 holds its second choice while its first choice is free.
        let m = matching(vec![Some(1)], 2);
        assert!(find_blocking_pairs(&m, &model).is_empty());
    }

    #[test]
    fn test_mutually_unacceptable_pair_never_blocks() {
        let model =
            PreferenceModel::new(vec![vec![0], vec![0, 1]], vec![vec![0], vec![1]]).unwrap();
        // Proposer 1 prefers receiver 0, but receiver 0 does not list it.
        let m = matching(vec![Some(0), Some(1)], 2);
        assert!(find_blocking_pairs(&m, &model).is_empty());
    }

    #[test]
    fn test_blocking_pairs_ordered_by_proposer_then_rank() {
        let model = PreferenceModel::new(
            vec![vec![0, 1, 2], vec![0, 1, 2], vec![0, 1, 2]],
            vec![vec![2, 1, 0], vec![2, 1, 0], vec![2, 1, 0]],
        )
        .unwrap();
        let m = matching(vec![Some(0), Some(1), Some(2)], 3);
        assert_eq!(
            find_blocking_pairs(&m, &model),
            vec![
                BlockingPair::new(1, 0),
                BlockingPair::new(2, 0),
                BlockingPair::new(2, 1),
            ]
        );
    }

    #[test]
    fn test_certify_accepts_stable_matching() {
        let model = crossed();
        let verifier = StabilityVerifier::new(&model);
        assert_eq!(verifier.certify(&matching(vec![Some(1), Some(0)], 2)), Ok(()));
    }

    #[test]
    fn test_certify_reports_blocking_pairs() {
        let model = crossed();
        let err = StabilityVerifier::new(&model)
            .certify(&matching(vec![Some(0), Some(1)], 2))
            .unwrap_err();
        assert_eq!(
            err,
            CertificationError::Unstable {
                pairs: vec![BlockingPair::new(1, 0)]
            }
        );
        assert_eq!(err.to_string(), "matching has 1 blocking pair(s): (1, 0)");
    }

    #[test]
    fn test_certify_rejects_size_mismatch() {
        let model = crossed();
        let err = StabilityVerifier::new(&model)
            .certify(&Matching::new(2, 3))
            .unwrap_err();
        assert_eq!(
            err,
            CertificationError::SizeMismatch {
                side: Side::Receiver,
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_certify_rejects_unacceptable_pair() {
        let model = PreferenceModel::new(vec![vec![0]], vec![vec![]]).unwrap();
        let err = StabilityVerifier::new(&model)
            .certify(&matching(vec![Some(0)], 1))
            .unwrap_err();
        assert_eq!(
            err,
            CertificationError::UnacceptablePair {
                proposer: 0,
                receiver: 0
            }
        );
    }
}
