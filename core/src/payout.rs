//! Single-shot payout of a deal's locked amount.

use crate::asset::Asset;
use crate::error::TransferError;
use crate::identity::Party;
use crate::ledger::Ledger;

/// Pays a fixed amount of one asset out of a custody account.
///
/// [`pay`](Self::pay) either moves the full amount to the recipient or
/// fails with the ledger's error; it is invoked at most once per
/// terminal transition and never retried within the same call.
#[derive(Debug)]
pub struct PayoutChannel<'a> {
    asset: &'a Asset,
    amount: u128,
    source: &'a Party,
}

impl<'a> PayoutChannel<'a> {
    /// Binds the channel to an asset, a quantity, and a custody account.
    pub fn new(asset: &'a Asset, amount: u128, source: &'a Party) -> Self {
        Self {
            asset,
            amount,
            source,
        }
    }

    /// Moves the full amount from the custody account to `recipient`.
    pub fn pay(
        &self,
        ledger: &mut dyn Ledger,
        recipient: &Party,
    ) -> std::result::Result<(), TransferError> {
        match self.asset {
            Asset::Native => ledger.transfer_native(self.source, recipient, self.amount),
            Asset::Token { contract } => {
                ledger.transfer_token(contract, self.source, recipient, self.amount)
            }
        }
    }
}
