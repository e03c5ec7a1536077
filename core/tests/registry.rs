use core::str::FromStr as _;

use truce_core::{OptimisticOracle, OracleError, OracleEvent, Outcome, Party, ID, CHALLENGE_PERIOD};

const T0: u64 = 1_700_000_000;

fn resolver() -> Party {
    Party::from_str("0xab5801a7D398351b8bE11C439e05C5B3259aeC9B").unwrap()
}

fn proposer() -> Party {
    Party::from_str("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").unwrap()
}

fn id(s: &str) -> ID {
    ID::from_str(s).unwrap()
}

fn registry() -> OptimisticOracle {
    OptimisticOracle::new(resolver())
}

fn assert_err<T: std::fmt::Debug>(res: Result<T, OracleError>, expected: OracleError) {
    match res {
        Err(e) => assert_eq!(e, expected),
        Ok(v) => panic!("expected {expected:?}, got Ok({v:?})"),
    }
}

#[test]
fn optimistic_happy_path() {
    let mut oracle = registry();
    oracle
        .propose(&proposer(), id("0xabc0"), Outcome::Release, T0)
        .unwrap();

    let proposal = oracle.proposal(&id("0xabc0")).unwrap();
    assert_eq!(proposal.proposer(), &proposer());
    assert_eq!(proposal.outcome(), Outcome::Release);
    assert_eq!(proposal.timestamp(), T0);
    assert!(!proposal.is_disputed());
    assert!(!proposal.is_resolved());

    let outcome = oracle.finalize(&id("0xabc0"), T0 + CHALLENGE_PERIOD).unwrap();
    assert_eq!(outcome, Outcome::Release);
    assert!(oracle.proposal(&id("0xabc0")).unwrap().is_resolved());

    assert_err(
        oracle.finalize(&id("0xabc0"), T0 + CHALLENGE_PERIOD),
        OracleError::AlreadyResolved,
    );
}

#[test]
fn finalize_waits_out_the_full_window() {
    let mut oracle = registry();
    oracle
        .propose(&proposer(), id("0xabc0"), Outcome::Refund, T0)
        .unwrap();

    assert_err(
        oracle.finalize(&id("0xabc0"), T0 + CHALLENGE_PERIOD - 1),
        OracleError::ChallengeWindowNotClosed,
    );
    assert_eq!(
        oracle.finalize(&id("0xabc0"), T0 + CHALLENGE_PERIOD).unwrap(),
        Outcome::Refund
    );
}

#[test]
fn propose_rejects_the_sentinel_and_duplicates() {
    let mut oracle = registry();
    assert_err(
        oracle.propose(&proposer(), id("0xabc0"), Outcome::None, T0),
        OracleError::InvalidOutcome,
    );

    oracle
        .propose(&proposer(), id("0xabc0"), Outcome::Release, T0)
        .unwrap();
    assert_err(
        oracle.propose(&resolver(), id("0xabc0"), Outcome::Refund, T0 + 1),
        OracleError::AlreadyProposed,
    );

    // A different id is an independent slot.
    oracle
        .propose(&proposer(), id("0xabc1"), Outcome::Refund, T0)
        .unwrap();
}

#[test]
fn dispute_window_boundaries() {
    let mut oracle = registry();
    oracle
        .propose(&proposer(), id("0xabc0"), Outcome::Release, T0)
        .unwrap();

    // Closes exactly at the window edge.
    assert_err(
        oracle.dispute(&id("0xabc0"), T0 + CHALLENGE_PERIOD),
        OracleError::ChallengeWindowClosed,
    );
    oracle
        .dispute(&id("0xabc0"), T0 + CHALLENGE_PERIOD - 1)
        .unwrap();
    assert!(oracle.proposal(&id("0xabc0")).unwrap().is_disputed());
}

#[test]
fn dispute_is_single_shot() {
    let mut oracle = registry();
    oracle
        .propose(&proposer(), id("0xabc0"), Outcome::Refund, T0)
        .unwrap();
    oracle.dispute(&id("0xabc0"), T0 + 1).unwrap();
    assert_err(
        oracle.dispute(&id("0xabc0"), T0 + 2),
        OracleError::AlreadyDisputed,
    );
}

#[test]
fn dispute_requires_a_proposal() {
    let mut oracle = registry();
    assert_err(oracle.dispute(&id("0xabc0"), T0), OracleError::NoProposal);
    assert_err(oracle.finalize(&id("0xabc0"), T0), OracleError::NoProposal);
}

#[test]
fn disputed_proposal_never_auto_finalizes() {
    let mut oracle = registry();
    oracle
        .propose(&proposer(), id("0xabc0"), Outcome::Release, T0)
        .unwrap();
    oracle.dispute(&id("0xabc0"), T0 + 1).unwrap();

    assert_err(
        oracle.finalize(&id("0xabc0"), T0 + CHALLENGE_PERIOD),
        OracleError::Disputed,
    );
}

#[test]
fn resolver_overwrites_a_disputed_outcome() {
    let mut oracle = registry();
    oracle
        .propose(&proposer(), id("0xabc0"), Outcome::Refund, T0)
        .unwrap();
    oracle.dispute(&id("0xabc0"), T0 + 1).unwrap();

    let outcome = oracle
        .resolve_dispute(&resolver(), &id("0xabc0"), Outcome::Release)
        .unwrap();
    assert_eq!(outcome, Outcome::Release);

    let proposal = oracle.proposal(&id("0xabc0")).unwrap();
    assert!(proposal.is_resolved());
    assert_eq!(proposal.outcome(), Outcome::Release);

    assert_err(
        oracle.resolve_dispute(&resolver(), &id("0xabc0"), Outcome::Refund),
        OracleError::AlreadyResolved,
    );
}

#[test]
fn resolver_authority_is_exclusive() {
    let mut oracle = registry();
    oracle
        .propose(&proposer(), id("0xabc0"), Outcome::Refund, T0)
        .unwrap();
    oracle.dispute(&id("0xabc0"), T0 + 1).unwrap();

    assert_err(
        oracle.resolve_dispute(&proposer(), &id("0xabc0"), Outcome::Release),
        OracleError::Unauthorized,
    );
}

#[test]
fn resolver_decision_needs_an_actual_dispute() {
    let mut oracle = registry();
    assert_err(
        oracle.resolve_dispute(&resolver(), &id("0xabc0"), Outcome::Release),
        OracleError::NoProposal,
    );

    oracle
        .propose(&proposer(), id("0xabc0"), Outcome::Refund, T0)
        .unwrap();
    assert_err(
        oracle.resolve_dispute(&resolver(), &id("0xabc0"), Outcome::Release),
        OracleError::NotDisputed,
    );
}

#[test]
fn resolver_cannot_finalize_to_the_sentinel() {
    let mut oracle = registry();
    oracle
        .propose(&proposer(), id("0xabc0"), Outcome::Refund, T0)
        .unwrap();
    oracle.dispute(&id("0xabc0"), T0 + 1).unwrap();

    assert_err(
        oracle.resolve_dispute(&resolver(), &id("0xabc0"), Outcome::None),
        OracleError::InvalidOutcome,
    );
    // Still open for a proper decision.
    assert!(!oracle.proposal(&id("0xabc0")).unwrap().is_resolved());
}

#[test]
fn events_record_the_full_lifecycle() {
    let mut oracle = registry();
    oracle
        .propose(&proposer(), id("0xabc0"), Outcome::Refund, T0)
        .unwrap();
    oracle.dispute(&id("0xabc0"), T0 + 1).unwrap();
    oracle
        .resolve_dispute(&resolver(), &id("0xabc0"), Outcome::Release)
        .unwrap();

    assert_eq!(
        oracle.events(),
        &[
            OracleEvent::Proposed {
                id: id("0xabc0"),
                outcome: Outcome::Refund
            },
            OracleEvent::Disputed { id: id("0xabc0") },
            OracleEvent::Resolved {
                id: id("0xabc0"),
                outcome: Outcome::Release
            },
        ]
    );
}
