//! Preference lists and the immutable preference model.
//!
//! Every agent holds a strict ranking over the partners it finds acceptable.
//! Ranks are precomputed into a dense table so that comparisons made by the
//! solvers and the verifier are O(1). A partner missing from a list has no
//! rank at all: every comparison involving it yields `None` instead of a
//! default value.

use std::fmt;

use crate::error::PreferenceError;

/// The two agent roles of a bipartite matching instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Side {
    /// Agents that make proposals in deferred acceptance.
    Proposer,
    /// Agents that hold or reject proposals.
    Receiver,
}

impl Side {
    /// Returns the opposite side.
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::Proposer => Side::Receiver,
            Side::Receiver => Side::Proposer,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Proposer => write!(f, "proposer"),
            Side::Receiver => write!(f, "receiver"),
        }
    }
}

/// One agent's ranked list of acceptable partners, most preferred first.
///
/// # Examples
///
/// ```
/// use stablematch_core::PreferenceModel;
///
/// let model = PreferenceModel::new(vec![vec![1, 0]], vec![vec![0], vec![0]]).unwrap();
/// let list = model.proposer(0);
///
/// assert_eq!(list.rank_of(1), Some(0));
/// assert_eq!(list.rank_of(0), Some(1));
/// assert_eq!(list.prefers(1, 0), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceList {
    order: Vec<usize>,
    ranks: Vec<Option<usize>>,
}

impl PreferenceList {
    fn build(
        side: Side,
        agent: usize,
        order: Vec<usize>,
        bound: usize,
    ) -> Result<Self, PreferenceError> {
        let mut ranks = vec![None; bound];
        for (rank, &partner) in order.iter().enumerate() {
            let slot = ranks.get_mut(partner).ok_or(PreferenceError::OutOfRange {
                side,
                agent,
                partner,
                bound,
            })?;
            if let Some(first) = *slot {
                return Err(PreferenceError::Duplicate {
                    side,
                    agent,
                    partner,
                    first,
                    second: rank,
                });
            }
            *slot = Some(rank);
        }
        Ok(Self { order, ranks })
    }

    /// Returns the partners in preference order.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    /// Iterates the partners in preference order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the partner at `rank`, if the list is that long.
    #[inline]
    pub fn at_rank(&self, rank: usize) -> Option<usize> {
        self.order.get(rank).copied()
    }

    /// Returns the position of `partner` in this list, or `None` if unacceptable.
    #[inline]
    pub fn rank_of(&self, partner: usize) -> Option<usize> {
        self.ranks.get(partner).copied().flatten()
    }

    #[inline]
    pub fn is_acceptable(&self, partner: usize) -> bool {
        self.rank_of(partner).is_some()
    }

    /// Returns whether `a` is strictly preferred to `b`.
    ///
    /// `None` when either partner is unacceptable; such a comparison has no answer.
    #[inline]
    pub fn prefers(&self, a: usize, b: usize) -> Option<bool> {
        Some(self.rank_of(a)? < self.rank_of(b)?)
    }
}

/// Preference lists of both sides, validated and frozen.
///
/// Construction rejects duplicate entries and out-of-range indices; after
/// that the model never changes.
///
/// # Examples
///
/// ```
/// use stablematch_core::{PreferenceModel, Side};
///
/// let model = PreferenceModel::new(
///     vec![vec![0, 1], vec![0, 1]],
///     vec![vec![1, 0], vec![0, 1]],
/// ).unwrap();
///
/// assert_eq!(model.proposer_count(), 2);
/// assert_eq!(model.rank_of(Side::Receiver, 0, 1), Some(0));
/// assert!(model.mutually_acceptable(1, 0));
///
/// assert!(PreferenceModel::new(vec![vec![0, 0]], vec![vec![0]]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceModel {
    proposers: Vec<PreferenceList>,
    receivers: Vec<PreferenceList>,
}

impl PreferenceModel {
    /// Builds a model from one list per proposer and one list per receiver.
    ///
    /// # Errors
    ///
    /// Returns the first [`PreferenceError`] found, proposers checked first.
    pub fn new(
        proposer_lists: Vec<Vec<usize>>,
        receiver_lists: Vec<Vec<usize>>,
    ) -> Result<Self, PreferenceError> {
        let proposer_count = proposer_lists.len();
        let receiver_count = receiver_lists.len();

        let proposers = proposer_lists
            .into_iter()
            .enumerate()
            .map(|(agent, list)| PreferenceList::build(Side::Proposer, agent, list, receiver_count))
            .collect::<Result<Vec<_>, _>>()?;
        let receivers = receiver_lists
            .into_iter()
            .enumerate()
            .map(|(agent, list)| PreferenceList::build(Side::Receiver, agent, list, proposer_count))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            proposers,
            receivers,
        })
    }

    #[inline]
    pub fn proposer_count(&self) -> usize {
        self.proposers.len()
    }

    #[inline]
    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }

    /// Returns the number of agents on `side`.
    pub fn count(&self, side: Side) -> usize {
        self.lists(side).len()
    }

    /// Returns proposer `p`'s list.
    ///
    /// # Panics
    ///
    /// Panics if `p` is out of range.
    #[inline]
    pub fn proposer(&self, p: usize) -> &PreferenceList {
        &self.proposers[p]
    }

    /// Returns receiver `r`'s list.
    ///
    /// # Panics
    ///
    /// Panics if `r` is out of range.
    #[inline]
    pub fn receiver(&self, r: usize) -> &PreferenceList {
        &self.receivers[r]
    }

    /// Returns all lists of one side, indexed by agent.
    pub fn lists(&self, side: Side) -> &[PreferenceList] {
        match side {
            Side::Proposer => &self.proposers,
            Side::Receiver => &self.receivers,
        }
    }

    /// Returns the list of `agent` on `side`, or `None` if out of range.
    pub fn list(&self, side: Side, agent: usize) -> Option<&PreferenceList> {
        self.lists(side).get(agent)
    }

    /// Returns whether `agent` on `side` lists `partner`.
    pub fn is_acceptable(&self, side: Side, agent: usize, partner: usize) -> bool {
        self.rank_of(side, agent, partner).is_some()
    }

    /// Returns `partner`'s position in `agent`'s list; `None` means not acceptable.
    pub fn rank_of(&self, side: Side, agent: usize, partner: usize) -> Option<usize> {
        self.list(side, agent)?.rank_of(partner)
    }

    /// Returns whether proposer `p` and receiver `r` list each other.
    pub fn mutually_acceptable(&self, p: usize, r: usize) -> bool {
        self.is_acceptable(Side::Proposer, p, r) && self.is_acceptable(Side::Receiver, r, p)
    }

    /// Total number of list entries on `side`.
    pub fn total_entries(&self, side: Side) -> usize {
        self.lists(side).iter().map(PreferenceList::len).sum()
    }

    /// Returns true if every list on both sides ranks every agent of the other side.
    pub fn is_complete(&self) -> bool {
        let receiver_count = self.receiver_count();
        let proposer_count = self.proposer_count();
        self.proposers.iter().all(|l| l.len() == receiver_count)
            && self.receivers.iter().all(|l| l.len() == proposer_count)
    }
}
