//! In-memory balance book for exercising escrow flows without a real
//! settlement layer. NOT FOR PRODUCTION USE.

use std::collections::HashMap;

use super::Ledger;
use crate::error::TransferError;
use crate::identity::{Party, ID};

/// Mintable in-memory ledger keyed by party (and token contract).
#[derive(Debug, Clone, Default)]
pub struct MockLedger {
    native: HashMap<Party, u128>,
    tokens: HashMap<(ID, Party), u128>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` of native currency to `party` out of thin air.
    pub fn mint_native(&mut self, party: &Party, amount: u128) {
        *self.native.entry(party.clone()).or_default() += amount;
    }

    /// Credits `amount` of the token at `contract` to `party`.
    pub fn mint_token(&mut self, contract: &ID, party: &Party, amount: u128) {
        *self.tokens.entry((contract.clone(), party.clone())).or_default() += amount;
    }

    /// Current native balance of `party`.
    pub fn native_balance(&self, party: &Party) -> u128 {
        self.native.get(party).copied().unwrap_or_default()
    }

    /// Current balance of `party` in the token at `contract`.
    pub fn token_balance(&self, contract: &ID, party: &Party) -> u128 {
        self.tokens
            .get(&(contract.clone(), party.clone()))
            .copied()
            .unwrap_or_default()
    }

    fn debit(balance: &mut u128, amount: u128) -> std::result::Result<(), TransferError> {
        if *balance < amount {
            return Err(TransferError::InsufficientFunds {
                needed: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }
}

impl Ledger for MockLedger {
    fn transfer_native(
        &mut self,
        from: &Party,
        to: &Party,
        amount: u128,
    ) -> std::result::Result<(), TransferError> {
        let source = self.native.entry(from.clone()).or_default();
        Self::debit(source, amount)?;
        *self.native.entry(to.clone()).or_default() += amount;
        Ok(())
    }

    fn transfer_token(
        &mut self,
        contract: &ID,
        from: &Party,
        to: &Party,
        amount: u128,
    ) -> std::result::Result<(), TransferError> {
        let source = self.tokens.entry((contract.clone(), from.clone())).or_default();
        Self::debit(source, amount)?;
        *self.tokens.entry((contract.clone(), to.clone())).or_default() += amount;
        Ok(())
    }
}
