//! Two-party escrow with third-party arbitration, an alternate
//! signature-authenticated settlement path, and a standalone optimistic
//! dispute-resolution registry.
//!
//! [`EscrowDeal`] owns one depositor/beneficiary/amount/deadline tuple
//! and enforces that money moves exactly once, to the right party, only
//! when authorized. [`OptimisticOracle`] is an independent keyed
//! registry of dispute proposals with a resolver authority; the two
//! mechanisms are deliberately not wired together.

/// Asset kinds a deal can take into custody.
pub mod asset;
/// Escrow business logic and state transitions.
pub mod escrow;
/// Identities of parties and on-ledger objects.
pub mod identity;
/// Creation parameters and JSON (de)serialization helpers.
pub mod interface;
/// External ledger collaborator moving native and token funds.
pub mod ledger;
/// Single-shot payout of a deal's locked amount.
pub mod payout;
/// Optimistic dispute-resolution registry.
pub mod registry;
/// Recoverable signatures for settlement attestations.
pub mod signature;

pub mod error;

pub use asset::Asset;
pub use error::{EscrowError, IdentityError, OracleError, TransferError};
pub use escrow::{DealEvent, DealState, EscrowDeal};
pub use identity::{Party, ID};
pub use interface::DealParams;
pub use ledger::Ledger;
pub use payout::PayoutChannel;
pub use registry::{OptimisticOracle, OracleEvent, Outcome, Proposal, CHALLENGE_PERIOD};
pub use signature::RecoverableSignature;

/// Seconds since the Unix epoch, supplied by the caller at each call.
pub type Timestamp = u64;

pub type Result<T> = std::result::Result<T, EscrowError>;
