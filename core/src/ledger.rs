//! External asset ledger: the collaborator that actually moves funds.

/// In-memory ledger for tests.
pub mod mock;

use crate::error::TransferError;
use crate::identity::{Party, ID};

/// Moves native currency and fungible tokens between parties.
///
/// Implementations must be all-or-nothing: each transfer either fully
/// succeeds or returns an error with balances untouched. This crate
/// performs no partial-transfer handling of its own.
pub trait Ledger {
    /// Transfers `amount` of native currency from `from` to `to`.
    fn transfer_native(
        &mut self,
        from: &Party,
        to: &Party,
        amount: u128,
    ) -> std::result::Result<(), TransferError>;

    /// Transfers `amount` of the token at `contract` from `from` to `to`.
    fn transfer_token(
        &mut self,
        contract: &ID,
        from: &Party,
        to: &Party,
        amount: u128,
    ) -> std::result::Result<(), TransferError>;
}
