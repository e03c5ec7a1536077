//! Optimistic dispute-resolution registry: propose, challenge, finalize.
//!
//! Deliberately independent of [`EscrowDeal`](crate::escrow::EscrowDeal):
//! the registry is a parallel mechanism and is never consulted by a deal.

use std::collections::HashMap;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::OracleError;
use crate::identity::{Party, ID};
use crate::Timestamp;

/// Challenge window applied uniformly to every proposal: two days.
pub const CHALLENGE_PERIOD: Timestamp = 2 * 24 * 60 * 60;

/// Settlement outcome proposed for a registry entry.
///
/// `None` is the "no proposal" sentinel and never a valid final value.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    None,
    Release,
    Refund,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Release => write!(f, "release"),
            Self::Refund => write!(f, "refund"),
        }
    }
}

/// One dispute proposal, keyed in the registry by an opaque id.
#[derive(Debug, Clone)]
pub struct Proposal {
    proposer: Party,
    outcome: Outcome,
    timestamp: Timestamp,
    disputed: bool,
    resolved: bool,
}

impl Proposal {
    /// Identity that first proposed an outcome for this id.
    pub fn proposer(&self) -> &Party {
        &self.proposer
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Creation time; the challenge window is measured from here.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn is_disputed(&self) -> bool {
        self.disputed
    }

    /// Once true, the outcome is final and never changes again.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    fn window_deadline(&self) -> Timestamp {
        self.timestamp.saturating_add(CHALLENGE_PERIOD)
    }
}

/// Events emitted by registry operations, in order of occurrence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum OracleEvent {
    Proposed { id: ID, outcome: Outcome },
    Disputed { id: ID },
    Resolved { id: ID, outcome: Outcome },
}

/// Keyed registry of dispute proposals with a designated resolver
/// authority.
///
/// The registry owns its proposal table; entries are created by
/// [`propose`](Self::propose) and mutated only through the operations
/// here.
#[derive(Debug, Clone)]
pub struct OptimisticOracle {
    resolver: Party,
    proposals: HashMap<ID, Proposal>,
    events: Vec<OracleEvent>,
}

impl OptimisticOracle {
    pub fn new(resolver: Party) -> Self {
        Self {
            resolver,
            proposals: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// The authority permitted to decide challenged proposals.
    pub fn resolver(&self) -> &Party {
        &self.resolver
    }

    /// Looks up the proposal recorded for `id`, if any.
    pub fn proposal(&self, id: &ID) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> &[OracleEvent] {
        &self.events
    }

    /// Records the first outcome proposed for `id`.
    ///
    /// # Errors
    ///
    /// [`OracleError::InvalidOutcome`] for the none sentinel,
    /// [`OracleError::AlreadyProposed`] if `id` already has a proposal.
    pub fn propose(
        &mut self,
        caller: &Party,
        id: ID,
        outcome: Outcome,
        now: Timestamp,
    ) -> std::result::Result<(), OracleError> {
        if outcome == Outcome::None {
            return Err(OracleError::InvalidOutcome);
        }
        if self.proposals.contains_key(&id) {
            return Err(OracleError::AlreadyProposed);
        }
        self.proposals.insert(
            id.clone(),
            Proposal {
                proposer: caller.clone(),
                outcome,
                timestamp: now,
                disputed: false,
                resolved: false,
            },
        );
        self.events.push(OracleEvent::Proposed { id, outcome });
        Ok(())
    }

    /// Challenges an open proposal while its window is still open
    /// (strictly before `timestamp + CHALLENGE_PERIOD`).
    pub fn dispute(&mut self, id: &ID, now: Timestamp) -> std::result::Result<(), OracleError> {
        let proposal = self.proposals.get_mut(id).ok_or(OracleError::NoProposal)?;
        if proposal.disputed {
            return Err(OracleError::AlreadyDisputed);
        }
        if now >= proposal.window_deadline() {
            return Err(OracleError::ChallengeWindowClosed);
        }
        proposal.disputed = true;
        self.events.push(OracleEvent::Disputed { id: id.clone() });
        Ok(())
    }

    /// The optimistic happy path: an unchallenged proposal whose window
    /// has elapsed becomes final with its outcome unchanged.
    ///
    /// # Errors
    ///
    /// [`OracleError::NoProposal`], [`OracleError::AlreadyResolved`],
    /// [`OracleError::Disputed`] for a challenged proposal, or
    /// [`OracleError::ChallengeWindowNotClosed`] before
    /// `timestamp + CHALLENGE_PERIOD`.
    pub fn finalize(
        &mut self,
        id: &ID,
        now: Timestamp,
    ) -> std::result::Result<Outcome, OracleError> {
        let proposal = self.proposals.get_mut(id).ok_or(OracleError::NoProposal)?;
        if proposal.resolved {
            return Err(OracleError::AlreadyResolved);
        }
        if proposal.disputed {
            return Err(OracleError::Disputed);
        }
        if now < proposal.window_deadline() {
            return Err(OracleError::ChallengeWindowNotClosed);
        }
        proposal.resolved = true;
        let outcome = proposal.outcome;
        self.events.push(OracleEvent::Resolved {
            id: id.clone(),
            outcome,
        });
        Ok(outcome)
    }

    /// The resolver's decision on a challenged proposal: overwrites the
    /// proposed outcome and makes it final.
    ///
    /// # Errors
    ///
    /// [`OracleError::Unauthorized`] unless `caller` is the resolver,
    /// [`OracleError::InvalidOutcome`] for the none sentinel,
    /// [`OracleError::NoProposal`], [`OracleError::AlreadyResolved`], or
    /// [`OracleError::NotDisputed`] for an unchallenged proposal.
    pub fn resolve_dispute(
        &mut self,
        caller: &Party,
        id: &ID,
        final_outcome: Outcome,
    ) -> std::result::Result<Outcome, OracleError> {
        if caller != &self.resolver {
            return Err(OracleError::Unauthorized);
        }
        if final_outcome == Outcome::None {
            return Err(OracleError::InvalidOutcome);
        }
        let proposal = self.proposals.get_mut(id).ok_or(OracleError::NoProposal)?;
        if proposal.resolved {
            return Err(OracleError::AlreadyResolved);
        }
        if !proposal.disputed {
            return Err(OracleError::NotDisputed);
        }
        proposal.outcome = final_outcome;
        proposal.resolved = true;
        self.events.push(OracleEvent::Resolved {
            id: id.clone(),
            outcome: final_outcome,
        });
        Ok(final_outcome)
    }
}
