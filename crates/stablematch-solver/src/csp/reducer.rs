//! Domain reduction before search.
//!
//! A proposer's domain starts as its own preference list. A receiver stays
//! in the domain only while it lists the proposer back. This is a bipartite
//! compatibility filter, not general arc consistency: the check depends on
//! the preference lists alone, so a second pass never removes anything.

use std::time::Instant;

use stablematch_core::{PreferenceModel, Side};
use tracing::{debug, info};

use crate::event::MatchingEventSupport;

/// Candidate receivers per proposer, in the proposer's preference order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedDomains {
    pub domains: Vec<Vec<usize>>,
    /// Passes run, including the final pass that removed nothing.
    pub passes: usize,
    /// Receivers removed across all passes.
    pub removed: usize,
}

impl ReducedDomains {
    /// The remaining candidates of proposer `p`, or an empty slice when out of range.
    pub fn domain(&self, p: usize) -> &[usize] {
        self.domains.get(p).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Domain size per proposer.
    pub fn sizes(&self) -> Vec<usize> {
        self.domains.iter().map(Vec::len).collect()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// True when at least one proposer has no candidate left.
    pub fn has_empty_domain(&self) -> bool {
        self.domains.iter().any(Vec::is_empty)
    }
}

/// Prunes one-sided acceptability from proposer domains.
#[derive(Debug, Clone)]
pub struct ConstraintReducer<'m> {
    model: &'m PreferenceModel,
    events: MatchingEventSupport,
}

impl<'m> ConstraintReducer<'m> {
    pub fn new(model: &'m PreferenceModel) -> Self {
        Self {
            model,
            events: MatchingEventSupport::new(),
        }
    }

    /// Attaches listeners notified of every pruned receiver.
    pub fn with_events(mut self, events: MatchingEventSupport) -> Self {
        self.events = events;
        self
    }

    /// Reduces the domains given by the model's proposer lists.
    pub fn reduce(&self) -> ReducedDomains {
        let domains = self
            .model
            .lists(Side::Proposer)
            .iter()
            .map(|list| list.as_slice().to_vec())
            .collect();
        self.reduce_domains(domains)
    }

    /// Reduces caller-supplied domains until a pass removes nothing.
    ///
    /// Applying this to already reduced domains is a no-op.
    pub fn reduce_domains(&self, mut domains: Vec<Vec<usize>>) -> ReducedDomains {
        let start = Instant::now();
        info!(
            event = "phase_start",
            phase = "reduction",
            proposer_count = domains.len(),
        );

        let mut passes = 0;
        let mut removed = 0;
        loop {
            passes += 1;
            let pass_removed = self.pass(&mut domains);
            debug!(
                event = "reduction_pass",
                pass = passes,
                removed = pass_removed
            );
            removed += pass_removed;
            if pass_removed == 0 {
                break;
            }
        }

        info!(
            event = "phase_end",
            phase = "reduction",
            passes,
            removed,
            duration_ms = start.elapsed().as_millis() as u64,
        );

        ReducedDomains {
            domains,
            passes,
            removed,
        }
    }

    fn pass(&self, domains: &mut [Vec<usize>]) -> usize {
        let mut removed = 0;
        for (p, domain) in domains.iter_mut().enumerate() {
            domain.retain(|&r| {
                let keep = self.model.is_acceptable(Side::Receiver, r, p);
                if !keep {
                    self.events.fire_domain_pruned(p, r);
                    removed += 1;
                }
                keep
            });
        }
        removed
    }
}
