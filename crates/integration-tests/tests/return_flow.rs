//! Integration tests for the returns lifecycle.
//!
//! The back office drives return requests through this machine:
//!
//! requested -> approved -> received -> refunded
//!     └──────> rejected

use ondine_core::ReturnStatus;

#[test]
fn test_happy_path_to_refund() {
    let mut status = ReturnStatus::Requested;

    for next in [
        ReturnStatus::Approved,
        ReturnStatus::Received,
        ReturnStatus::Refunded,
    ] {
        status = status.transition(next).expect("legal transition");
    }

    assert_eq!(status, ReturnStatus::Refunded);
}

#[test]
fn test_rejection_only_from_requested() {
    assert!(
        ReturnStatus::Requested
            .transition(ReturnStatus::Rejected)
            .is_ok()
    );

    for from in [
        ReturnStatus::Approved,
        ReturnStatus::Received,
        ReturnStatus::Refunded,
        ReturnStatus::Rejected,
    ] {
        assert!(
            from.transition(ReturnStatus::Rejected).is_err(),
            "{from:?} -> Rejected must be rejected"
        );
    }
}

#[test]
fn test_no_skipping_the_received_step() {
    // A refund without the parcel back would move money for goods the
    // boutique never recovered.
    assert!(
        ReturnStatus::Approved
            .transition(ReturnStatus::Refunded)
            .is_err()
    );
    assert!(
        ReturnStatus::Requested
            .transition(ReturnStatus::Refunded)
            .is_err()
    );
}

#[test]
fn test_terminal_states_accept_nothing() {
    let all = [
        ReturnStatus::Requested,
        ReturnStatus::Approved,
        ReturnStatus::Rejected,
        ReturnStatus::Received,
        ReturnStatus::Refunded,
    ];

    for to in all {
        assert!(ReturnStatus::Refunded.transition(to).is_err());
        assert!(ReturnStatus::Rejected.transition(to).is_err());
    }
}
