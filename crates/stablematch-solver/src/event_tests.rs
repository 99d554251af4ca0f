//! Tests for the event system.

use super::*;

#[test]
fn test_event_support_new() {
    let support = MatchingEventSupport::new();

    assert_eq!(support.proposal_listener_count(), 0);
    assert_eq!(support.search_listener_count(), 0);
    assert!(!support.has_listeners());
}

#[test]
fn test_event_support_add_listeners() {
    let mut support = MatchingEventSupport::new();

    let listener = Arc::new(CountingEventListener::new());
    support.add_proposal_listener(listener.clone());
    support.add_search_listener(listener);

    assert_eq!(support.proposal_listener_count(), 1);
    assert_eq!(support.search_listener_count(), 1);
    assert!(support.has_listeners());
}

#[test]
fn test_event_support_fire_events() {
    let mut support = MatchingEventSupport::new();

    let listener = Arc::new(CountingEventListener::new());
    support.add_proposal_listener(listener.clone());
    support.add_search_listener(listener.clone());

    support.fire_proposal(
        1,
        &ProposalEvent::Accepted {
            proposer: 0,
            receiver: 0,
        },
    );
    support.fire_proposal(
        2,
        &ProposalEvent::Replaced {
            proposer: 1,
            receiver: 0,
            displaced: 0,
        },
    );
    support.fire_proposal(3, &ProposalEvent::Exhausted { proposer: 2 });
    support.fire_domain_pruned(0, 1);
    support.fire_assigned(0, 0);
    support.fire_backtrack(0, 0);

    assert_eq!(listener.proposal_count(), 3);
    assert_eq!(listener.accepted_count(), 1);
    assert_eq!(listener.replaced_count(), 1);
    assert_eq!(listener.exhausted_count(), 1);
    assert_eq!(listener.rejected_count(), 0);
    assert_eq!(listener.pruned_count(), 1);
    assert_eq!(listener.assigned_count(), 1);
    assert_eq!(listener.backtrack_count(), 1);

    listener.reset();
    assert_eq!(listener.proposal_count(), 0);
    assert_eq!(listener.backtrack_count(), 0);
}

#[test]
fn test_clear_listeners() {
    let mut support = MatchingEventSupport::new();
    support.add_proposal_listener(Arc::new(LoggingEventListener::with_prefix("gs")));
    support.add_search_listener(Arc::new(LoggingEventListener::new()));
    assert!(support.has_listeners());

    support.clear_listeners();
    assert!(!support.has_listeners());
}

#[test]
fn test_recording_listener_keeps_order() {
    let recorder = RecordingEventListener::new();
    let first = ProposalEvent::Unacceptable {
        proposer: 0,
        receiver: 1,
    };
    let second = ProposalEvent::Rejected {
        proposer: 1,
        receiver: 0,
        holder: 2,
    };
    recorder.on_proposal(1, &first);
    recorder.on_proposal(2, &second);

    assert_eq!(recorder.events(), vec![first, second]);
    recorder.clear();
    assert!(recorder.events().is_empty());
}

#[test]
fn test_proposal_event_accessors() {
    let event = ProposalEvent::Rejected {
        proposer: 3,
        receiver: 1,
        holder: 0,
    };
    assert_eq!(event.proposer(), 3);
    assert_eq!(event.receiver(), Some(1));
    assert_eq!(event.kind(), "rejected");
    assert_eq!(
        event.to_string(),
        "proposer 3 -> receiver 1: rejected, keeps proposer 0"
    );

    let exhausted = ProposalEvent::Exhausted { proposer: 4 };
    assert_eq!(exhausted.receiver(), None);
    assert_eq!(exhausted.kind(), "exhausted");
}

#[test]
fn test_debug_shows_listener_counts() {
    let mut support = MatchingEventSupport::new();
    support.add_proposal_listener(Arc::new(RecordingEventListener::new()));
    let debug = format!("{:?}", support);
    assert!(debug.contains("MatchingEventSupport"));
    assert!(debug.contains("proposal_listeners: 1"));
}
