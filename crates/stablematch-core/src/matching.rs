//! Proposer/receiver pairings.

use std::fmt;

use crate::error::MatchingError;
use crate::preference::Side;

/// A proposer/receiver pair that witnesses an instability.
///
/// Both agents strictly prefer each other to their current partners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockingPair {
    pub proposer: usize,
    pub receiver: usize,
}

impl BlockingPair {
    #[inline]
    pub fn new(proposer: usize, receiver: usize) -> Self {
        Self { proposer, receiver }
    }
}

impl fmt::Display for BlockingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.proposer, self.receiver)
    }
}

/// A partial one-to-one assignment of proposers to receivers.
///
/// The forward map (proposer to receiver) and the inverse map (receiver to
/// proposer) are updated together, so they always agree and no receiver is
/// ever held by two proposers.
///
/// # Examples
///
/// ```
/// use stablematch_core::Matching;
///
/// let mut matching = Matching::new(2, 2);
/// matching.pair(0, 1);
/// matching.pair(1, 1); // receiver 1 moves to proposer 1, proposer 0 is freed
///
/// assert_eq!(matching.receiver_of(0), None);
/// assert_eq!(matching.proposer_of(1), Some(1));
/// assert!(matching.is_consistent());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Matching {
    proposer_partner: Vec<Option<usize>>,
    receiver_partner: Vec<Option<usize>>,
}

impl Matching {
    /// Creates a matching in which nobody is paired.
    pub fn new(proposer_count: usize, receiver_count: usize) -> Self {
        Self {
            proposer_partner: vec![None; proposer_count],
            receiver_partner: vec![None; receiver_count],
        }
    }

    /// Builds a matching from a forward map, deriving the inverse.
    ///
    /// # Errors
    ///
    /// Fails if a receiver index is out of range or claimed twice.
    pub fn from_proposer_partners(
        proposer_partner: Vec<Option<usize>>,
        receiver_count: usize,
    ) -> Result<Self, MatchingError> {
        let mut receiver_partner = vec![None; receiver_count];
        for (p, partner) in proposer_partner.iter().enumerate() {
            let Some(r) = *partner else { continue };
            let slot = receiver_partner
                .get_mut(r)
                .ok_or(MatchingError::OutOfRange {
                    side: Side::Receiver,
                    index: r,
                    bound: receiver_count,
                })?;
            if let Some(first) = *slot {
                return Err(MatchingError::ReceiverTaken {
                    receiver: r,
                    first,
                    second: p,
                });
            }
            *slot = Some(p);
        }
        Ok(Self {
            proposer_partner,
            receiver_partner,
        })
    }

    #[inline]
    pub fn proposer_count(&self) -> usize {
        self.proposer_partner.len()
    }

    #[inline]
    pub fn receiver_count(&self) -> usize {
        self.receiver_partner.len()
    }

    /// Returns the receiver held by proposer `p`.
    #[inline]
    pub fn receiver_of(&self, p: usize) -> Option<usize> {
        self.proposer_partner.get(p).copied().flatten()
    }

    /// Returns the proposer holding receiver `r`.
    #[inline]
    pub fn proposer_of(&self, r: usize) -> Option<usize> {
        self.receiver_partner.get(r).copied().flatten()
    }

    /// Returns the partner of `agent` on `side`.
    pub fn partner_of(&self, side: Side, agent: usize) -> Option<usize> {
        match side {
            Side::Proposer => self.receiver_of(agent),
            Side::Receiver => self.proposer_of(agent),
        }
    }

    /// Pairs `p` with `r`, first releasing any partner either of them held.
    ///
    /// Returns the proposer that held `r` before, if any.
    ///
    /// # Panics
    ///
    /// Panics if `p` or `r` is out of range.
    pub fn pair(&mut self, p: usize, r: usize) -> Option<usize> {
        self.unpair_proposer(p);
        let displaced = self.unpair_receiver(r);
        self.proposer_partner[p] = Some(r);
        self.receiver_partner[r] = Some(p);
        displaced
    }

    /// Releases proposer `p`, returning the receiver it held.
    pub fn unpair_proposer(&mut self, p: usize) -> Option<usize> {
        let r = self.proposer_partner.get_mut(p)?.take()?;
        self.receiver_partner[r] = None;
        Some(r)
    }

    /// Releases receiver `r`, returning the proposer that held it.
    pub fn unpair_receiver(&mut self, r: usize) -> Option<usize> {
        let p = self.receiver_partner.get_mut(r)?.take()?;
        self.proposer_partner[p] = None;
        Some(p)
    }

    /// Iterates matched `(proposer, receiver)` pairs in proposer order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.proposer_partner
            .iter()
            .enumerate()
            .filter_map(|(p, r)| r.map(|r| (p, r)))
    }

    /// Number of matched pairs.
    pub fn len(&self) -> usize {
        self.pairs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.proposer_partner.iter().all(Option::is_none)
    }

    /// Iterates proposers that hold no receiver.
    pub fn unmatched_proposers(&self) -> impl Iterator<Item = usize> + '_ {
        self.proposer_partner
            .iter()
            .enumerate()
            .filter_map(|(p, r)| r.is_none().then_some(p))
    }

    /// Iterates receivers held by nobody.
    pub fn unmatched_receivers(&self) -> impl Iterator<Item = usize> + '_ {
        self.receiver_partner
            .iter()
            .enumerate()
            .filter_map(|(r, p)| p.is_none().then_some(r))
    }

    /// The forward map, indexed by proposer.
    #[inline]
    pub fn proposer_partners(&self) -> &[Option<usize>] {
        &self.proposer_partner
    }

    /// The inverse map, indexed by receiver.
    #[inline]
    pub fn receiver_partners(&self) -> &[Option<usize>] {
        &self.receiver_partner
    }

    /// Checks that both maps agree and that the pairing is injective.
    pub fn is_consistent(&self) -> bool {
        let forward_ok = self.pairs().all(|(p, r)| self.proposer_of(r) == Some(p));
        let inverse_ok = self
            .receiver_partner
            .iter()
            .enumerate()
            .filter_map(|(r, p)| p.map(|p| (p, r)))
            .all(|(p, r)| self.receiver_of(p) == Some(r));
        forward_ok && inverse_ok
    }
}

impl fmt::Display for Matching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (p, partner) in self.proposer_partner.iter().enumerate() {
            if p > 0 {
                write!(f, ", ")?;
            }
            match partner {
                Some(r) => write!(f, "{p}->{r}")?,
                None => write!(f, "{p}->_")?,
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let matching = Matching::new(3, 2);
        assert!(matching.is_empty());
        assert_eq!(matching.len(), 0);
        assert_eq!(matching.unmatched_proposers().count(), 3);
        assert_eq!(matching.unmatched_receivers().count(), 2);
        assert!(matching.is_consistent());
    }

    #[test]
    fn test_pair_replaces_both_sides() {
        let mut matching = Matching::new(2, 2);
        assert_eq!(matching.pair(0, 0), None);
        assert_eq!(matching.pair(1, 0), Some(0));

        assert_eq!(matching.receiver_of(0), None);
        assert_eq!(matching.receiver_of(1), Some(0));
        assert_eq!(matching.proposer_of(0), Some(1));

        // Moving proposer 1 frees receiver 0.
        matching.pair(1, 1);
        assert_eq!(matching.proposer_of(0), None);
        assert_eq!(matching.partner_of(Side::Receiver, 1), Some(1));
        assert!(matching.is_consistent());
    }

    #[test]
    fn test_unpair() {
        let mut matching = Matching::new(2, 2);
        matching.pair(0, 1);
        assert_eq!(matching.unpair_receiver(1), Some(0));
        assert_eq!(matching.unpair_receiver(1), None);
        matching.pair(1, 0);
        assert_eq!(matching.unpair_proposer(1), Some(0));
        assert!(matching.is_empty());
        assert_eq!(matching.unpair_proposer(7), None);
    }

    #[test]
    fn test_from_proposer_partners() {
        let matching = Matching::from_proposer_partners(vec![Some(1), None, Some(0)], 2).unwrap();
        assert_eq!(matching.proposer_of(1), Some(0));
        assert_eq!(matching.proposer_of(0), Some(2));
        assert_eq!(matching.pairs().collect::<Vec<_>>(), vec![(0, 1), (2, 0)]);
        assert!(matching.is_consistent());
    }

    #[test]
    fn test_from_proposer_partners_rejects_shared_receiver() {
        let err = Matching::from_proposer_partners(vec![Some(0), Some(0)], 1).unwrap_err();
        assert_eq!(
            err,
            MatchingError::ReceiverTaken {
                receiver: 0,
                first: 0,
                second: 1,
            }
        );
    }

    #[test]
    fn test_from_proposer_partners_rejects_out_of_range() {
        let err = Matching::from_proposer_partners(vec![Some(3)], 2).unwrap_err();
        assert!(matches!(err, MatchingError::OutOfRange { index: 3, .. }));
    }

    #[test]
    fn test_display() {
        let matching = Matching::from_proposer_partners(vec![Some(1), None], 2).unwrap();
        assert_eq!(matching.to_string(), "[0->1, 1->_]");
        assert_eq!(BlockingPair::new(2, 3).to_string(), "(2, 3)");
    }
}
