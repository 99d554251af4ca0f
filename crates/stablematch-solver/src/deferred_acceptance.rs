//! Gale-Shapley deferred acceptance.
//!
//! Free proposers wait in a FIFO queue. Each step pops the head, which
//! proposes to the next receiver on its list. The receiver tentatively holds
//! the best proposer it has seen so far, so a held proposer can still be
//! displaced by a later one. The queue order is fixed, so identical input
//! always produces the identical step sequence.

use std::collections::VecDeque;
use std::time::Instant;

use stablematch_core::{Matching, PreferenceModel, Result, Side, StableMatchError};
use tracing::{info, trace};

use crate::event::{MatchingEventSupport, ProposalEvent};

const COMPONENT: &str = "deferred_acceptance";

/// Output of a deferred-acceptance run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredAcceptanceResult {
    /// The proposer-optimal stable matching.
    pub matching: Matching,
    /// Queue pops performed, including proposers dropped with an exhausted list.
    pub step_count: u64,
}

/// Proposer-side deferred-acceptance matcher.
///
/// # Example
///
/// ```
/// use stablematch_core::PreferenceModel;
/// use stablematch_solver::DeferredAcceptanceMatcher;
///
/// let model = PreferenceModel::new(
///     vec![vec![0, 1], vec![0, 1]],
///     vec![vec![1, 0], vec![0, 1]],
/// ).unwrap();
///
/// let result = DeferredAcceptanceMatcher::new(&model).run().unwrap();
/// assert_eq!(result.matching.receiver_of(0), Some(1));
/// assert_eq!(result.matching.receiver_of(1), Some(0));
/// assert_eq!(result.step_count, 3);
/// ```
#[derive(Debug, Clone)]
pub struct DeferredAcceptanceMatcher<'m> {
    model: &'m PreferenceModel,
    events: MatchingEventSupport,
}

impl<'m> DeferredAcceptanceMatcher<'m> {
    pub fn new(model: &'m PreferenceModel) -> Self {
        Self {
            model,
            events: MatchingEventSupport::new(),
        }
    }

    /// Attaches listeners that receive every proposal step.
    pub fn with_events(mut self, events: MatchingEventSupport) -> Self {
        self.events = events;
        self
    }

    /// Upper bound on the steps of any run over this model.
    ///
    /// Every proposal consumes one list entry and every proposer leaves the
    /// queue at most once, so a correct run never needs more.
    pub fn step_bound(&self) -> u64 {
        (self.model.total_entries(Side::Proposer) + self.model.proposer_count()) as u64
    }

    /// Runs the queue until no free proposer has anyone left to propose to.
    pub fn run(&self) -> Result<DeferredAcceptanceResult> {
        let model = self.model;
        let start = Instant::now();
        let bound = self.step_bound();

        info!(
            event = "solve_start",
            solver = COMPONENT,
            proposer_count = model.proposer_count(),
            receiver_count = model.receiver_count(),
            step_bound = bound,
        );

        let mut matching = Matching::new(model.proposer_count(), model.receiver_count());
        let mut cursor = vec![0usize; model.proposer_count()];
        let mut free: VecDeque<usize> = (0..model.proposer_count()).collect();
        let mut steps = 0u64;

        while let Some(proposer) = free.pop_front() {
            if steps >= bound {
                return Err(StableMatchError::InternalInvariantViolation {
                    component: COMPONENT,
                    detail: format!(
                        "{} proposers still free after {} steps (next: proposer {})",
                        free.len() + 1,
                        bound,
                        proposer
                    ),
                });
            }
            steps += 1;

            let event = self.step(proposer, &mut cursor, &mut matching, &mut free)?;
            trace!(
                event = "proposal",
                step = steps,
                proposer,
                receiver = event.receiver(),
                outcome = event.kind(),
            );
            self.events.fire_proposal(steps, &event);
        }

        info!(
            event = "solve_end",
            solver = COMPONENT,
            steps,
            matched = matching.len(),
            duration_ms = start.elapsed().as_millis() as u64,
        );

        Ok(DeferredAcceptanceResult {
            matching,
            step_count: steps,
        })
    }

    fn step(
        &self,
        proposer: usize,
        cursor: &mut [usize],
        matching: &mut Matching,
        free: &mut VecDeque<usize>,
    ) -> Result<ProposalEvent> {
        let Some(receiver) = self.model.proposer(proposer).at_rank(cursor[proposer]) else {
            return Ok(ProposalEvent::Exhausted { proposer });
        };
        cursor[proposer] += 1;

        let receiver_list = self.model.receiver(receiver);
        let Some(new_rank) = receiver_list.rank_of(proposer) else {
            free.push_back(proposer);
            return Ok(ProposalEvent::Unacceptable { proposer, receiver });
        };

        let Some(holder) = matching.proposer_of(receiver) else {
            matching.pair(proposer, receiver);
            return Ok(ProposalEvent::Accepted { proposer, receiver });
        };

        let holder_rank =
            receiver_list
                .rank_of(holder)
                .ok_or_else(|| StableMatchError::InternalInvariantViolation {
                    component: COMPONENT,
                    detail: format!("receiver {receiver} holds unranked proposer {holder}"),
                })?;

        if new_rank < holder_rank {
            matching.pair(proposer, receiver);
            free.push_back(holder);
            Ok(ProposalEvent::Replaced {
                proposer,
                receiver,
                displaced: holder,
            })
        } else {
            free.push_back(proposer);
            Ok(ProposalEvent::Rejected {
                proposer,
                receiver,
                holder,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::event::{CountingEventListener, RecordingEventListener};
    use crate::verifier::find_blocking_pairs;
    use stablematch_test::PreferenceGenerator;

    fn model(proposers: Vec<Vec<usize>>, receivers: Vec<Vec<usize>>) -> PreferenceModel {
        PreferenceModel::new(proposers, receivers).unwrap()
    }

    #[test]
    fn test_crossed_pair_trace() {
        let model = model(vec![vec![0, 1], vec![0, 1]], vec![vec![1, 0], vec![0, 1]]);
        let recorder = Arc::new(RecordingEventListener::new());
        let mut events = MatchingEventSupport::new();
        events.add_proposal_listener(recorder.clone());

        let result = DeferredAcceptanceMatcher::new(&model)
            .with_events(events)
            .run()
            .unwrap();

        assert_eq!(result.step_count, 3);
        assert_eq!(result.matching.receiver_of(0), Some(1));
        assert_eq!(result.matching.receiver_of(1), Some(0));
        assert_eq!(
            recorder.events(),
            vec![
                ProposalEvent::Accepted {
                    proposer: 0,
                    receiver: 0
                },
                ProposalEvent::Replaced {
                    proposer: 1,
                    receiver: 0,
                    displaced: 0
                },
                ProposalEvent::Accepted {
                    proposer: 0,
                    receiver: 1
                },
            ]
        );
        assert!(find_blocking_pairs(&result.matching, &model).is_empty());
    }

    #[test]
    fn test_empty_list_proposer_stays_unmatched() {
        let model = model(vec![vec![], vec![0]], vec![vec![1]]);
        let result = DeferredAcceptanceMatcher::new(&model).run().unwrap();

        assert_eq!(result.matching.receiver_of(0), None);
        assert_eq!(result.matching.receiver_of(1), Some(0));
        assert_eq!(result.step_count, 2);
    }

    #[test]
    fn test_one_sided_acceptability_leaves_both_unmatched() {
        // Proposer 0 lists receiver 0, receiver 0 lists nobody.
        let model = model(vec![vec![0]], vec![vec![]]);
        let counter = Arc::new(CountingEventListener::new());
        let mut events = MatchingEventSupport::new();
        events.add_proposal_listener(counter.clone());

        let result = DeferredAcceptanceMatcher::new(&model)
            .with_events(events)
            .run()
            .unwrap();

        assert!(result.matching.is_empty());
        assert_eq!(result.step_count, 2);
        assert_eq!(counter.unacceptable_count(), 1);
        assert_eq!(counter.exhausted_count(), 1);
    }

    #[test]
    fn test_rejected_proposer_moves_down_its_list() {
        // Receiver 0 prefers proposer 0, so proposer 1 falls back to receiver 1.
        let model = model(vec![vec![0, 1], vec![0, 1]], vec![vec![0, 1], vec![0, 1]]);
        let counter = Arc::new(CountingEventListener::new());
        let mut events = MatchingEventSupport::new();
        events.add_proposal_listener(counter.clone());

        let result = DeferredAcceptanceMatcher::new(&model)
            .with_events(events)
            .run()
            .unwrap();

        assert_eq!(result.matching.receiver_of(0), Some(0));
        assert_eq!(result.matching.receiver_of(1), Some(1));
        assert_eq!(counter.rejected_count(), 1);
        assert_eq!(result.step_count, 3);
    }

    #[test]
    fn test_unequal_sides() {
        let model = model(vec![vec![0], vec![0], vec![0]], vec![vec![2, 1, 0]]);
        let result = DeferredAcceptanceMatcher::new(&model).run().unwrap();

        assert_eq!(result.matching.len(), 1);
        assert_eq!(result.matching.proposer_of(0), Some(2));
        assert!(find_blocking_pairs(&result.matching, &model).is_empty());
    }

    #[test]
    fn test_step_count_within_bound() {
        let model = model(
            vec![vec![0, 1, 2], vec![0, 2, 1], vec![1, 0, 2]],
            vec![vec![2, 1, 0], vec![0, 1, 2], vec![1, 2, 0]],
        );
        let matcher = DeferredAcceptanceMatcher::new(&model);
        let result = matcher.run().unwrap();

        assert_eq!(matcher.step_bound(), 12);
        assert!(result.step_count <= matcher.step_bound());
        assert_eq!(result.matching.len(), 3);
        assert!(result.matching.is_consistent());
    }

    #[test]
    fn test_run_is_deterministic() {
        let model = model(
            vec![vec![1, 0, 2], vec![0, 1, 2], vec![0, 2, 1]],
            vec![vec![2, 0, 1], vec![1, 2, 0], vec![0, 1, 2]],
        );
        let first = DeferredAcceptanceMatcher::new(&model).run().unwrap();
        let second = DeferredAcceptanceMatcher::new(&model).run().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_model() {
        let model = model(vec![], vec![]);
        let result = DeferredAcceptanceMatcher::new(&model).run().unwrap();
        assert_eq!(result.step_count, 0);
        assert!(result.matching.is_empty());
    }

    #[test]
    fn test_generated_incomplete_lists_stay_stable() {
        let mut generator = PreferenceGenerator::seeded(3);
        for n in [2, 5, 9, 12] {
            let model = generator.incomplete(n).into_model();
            let matcher = DeferredAcceptanceMatcher::new(&model);
            let result = matcher.run().unwrap();
            assert!(result.step_count <= matcher.step_bound());
            assert!(result.matching.is_consistent());
            assert!(find_blocking_pairs(&result.matching, &model).is_empty());
        }
    }
}
