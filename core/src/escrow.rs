//! Escrow deal state machine: custody, cooperative settlement,
//! arbitration, and signature-authenticated resolution.

use std::collections::HashSet;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::asset::Asset;
use crate::error::{EscrowError, TransferError};
use crate::identity::Party;
use crate::interface::DealParams;
use crate::ledger::Ledger;
use crate::payout::PayoutChannel;
use crate::signature::RecoverableSignature;
use crate::{Result, Timestamp};

/// Domain separation tag for settlement digests.
const SETTLEMENT_DOMAIN: &[u8] = b"truce/settlement/v1";

/// Lifecycle of an escrow deal.
///
/// Transitions are monotonic; a state is never revisited.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum DealState {
    /// Opened but not yet funded.
    Created,
    /// Funds locked in custody; awaiting settlement.
    Funded,
    /// A participant escalated; awaiting the arbitrator.
    Disputed,
    /// Paid out to the beneficiary (terminal).
    Released,
    /// Paid back to the depositor (terminal).
    Refunded,
    /// Settled by the arbitrator's decision (terminal).
    Resolved,
}

impl DealState {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Refunded | Self::Resolved)
    }
}

/// Events emitted by deal operations, in order of occurrence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum DealEvent {
    /// Custody took the locked amount from `from`.
    Funded { from: Party },
    /// A participant escalated to arbitration.
    Disputed { by: Party },
    /// The locked amount went to the beneficiary.
    Released { to: Party },
    /// The locked amount went back to the depositor.
    Refunded { to: Party },
    /// The arbitrator decided an escalated deal.
    Resolved { executor: Party, to_beneficiary: bool },
    /// An oracle attestation settled the deal.
    OracleResolved { to_beneficiary: bool, nonce: u64 },
}

/// One escrow deal binding a depositor, a beneficiary, and a locked
/// amount under a fixed deadline.
///
/// Participant and authority identities are fixed at creation and have
/// no setters; only the state, the consumed-digest set, and the event
/// log ever change. At most one payout leaves a deal: once the state
/// turns terminal every fund-moving operation fails.
#[derive(Debug, Clone)]
pub struct EscrowDeal {
    address: Party,
    depositor: Party,
    beneficiary: Party,
    arbitrator: Party,
    oracle_signer: Party,
    asset: Asset,
    amount: u128,
    deadline: Timestamp,
    state: DealState,
    // Append-only; a digest is never forgotten, or its nonce could be
    // replayed.
    used_oracle_messages: HashSet<[u8; 32]>,
    events: Vec<DealEvent>,
    entered: bool,
}

impl EscrowDeal {
    /// Opens a deal at the custody identity `address`.
    ///
    /// Parameters are trusted here; run [`DealParams::validate`]
    /// upstream before opening.
    pub fn open(address: Party, params: DealParams) -> Self {
        Self {
            address,
            depositor: params.depositor,
            beneficiary: params.beneficiary,
            arbitrator: params.arbitrator,
            oracle_signer: params.oracle_signer,
            asset: params.asset,
            amount: params.amount,
            deadline: params.deadline,
            state: DealState::Created,
            used_oracle_messages: HashSet::new(),
            events: Vec::new(),
            entered: false,
        }
    }

    pub fn address(&self) -> &Party {
        &self.address
    }

    pub fn depositor(&self) -> &Party {
        &self.depositor
    }

    pub fn beneficiary(&self) -> &Party {
        &self.beneficiary
    }

    pub fn arbitrator(&self) -> &Party {
        &self.arbitrator
    }

    pub fn oracle_signer(&self) -> &Party {
        &self.oracle_signer
    }

    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    /// Quantity locked for the life of the deal.
    pub fn amount(&self) -> u128 {
        self.amount
    }

    /// Timestamp threshold separating release from refund.
    pub fn deadline(&self) -> Timestamp {
        self.deadline
    }

    pub fn state(&self) -> DealState {
        self.state
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> &[DealEvent] {
        &self.events
    }

    /// Locks the deal's amount in custody: `Created -> Funded`.
    ///
    /// For the native asset the attached `value` must equal the locked
    /// amount exactly; for a token asset no native value may be attached
    /// and the amount is pulled from `caller` through the ledger.
    ///
    /// # Errors
    ///
    /// [`EscrowError::InvalidState`] outside `Created`,
    /// [`EscrowError::WrongPaymentAmount`] for a mismatched attached
    /// value, or the ledger's own transfer failure.
    pub fn fund(&mut self, caller: &Party, value: u128, ledger: &mut dyn Ledger) -> Result<()> {
        self.non_reentrant(|deal| {
            if deal.state != DealState::Created {
                return Err(EscrowError::InvalidState);
            }
            match &deal.asset {
                Asset::Native => {
                    if value != deal.amount {
                        return Err(EscrowError::WrongPaymentAmount {
                            expected: deal.amount,
                            got: value,
                        });
                    }
                    ledger.transfer_native(caller, &deal.address, deal.amount)?;
                }
                Asset::Token { contract } => {
                    if value != 0 {
                        return Err(EscrowError::WrongPaymentAmount {
                            expected: 0,
                            got: value,
                        });
                    }
                    ledger.transfer_token(contract, caller, &deal.address, deal.amount)?;
                }
            }
            deal.state = DealState::Funded;
            deal.events.push(DealEvent::Funded {
                from: caller.clone(),
            });
            Ok(())
        })
    }

    /// Cooperative release by the depositor: `Funded -> Released`.
    ///
    /// Allowed up to and including the deadline; pays the full locked
    /// amount to the beneficiary.
    ///
    /// # Errors
    ///
    /// [`EscrowError::InvalidState`] outside `Funded`,
    /// [`EscrowError::Unauthorized`] unless `caller` is the depositor,
    /// [`EscrowError::DeadlineExpired`] once `now` is past the deadline.
    pub fn release(
        &mut self,
        caller: &Party,
        now: Timestamp,
        ledger: &mut dyn Ledger,
    ) -> Result<()> {
        self.non_reentrant(|deal| {
            if deal.state != DealState::Funded {
                return Err(EscrowError::InvalidState);
            }
            if caller != &deal.depositor {
                return Err(EscrowError::Unauthorized);
            }
            if now > deal.deadline {
                return Err(EscrowError::DeadlineExpired);
            }
            deal.pay(ledger, &deal.beneficiary)?;
            deal.state = DealState::Released;
            deal.events.push(DealEvent::Released {
                to: deal.beneficiary.clone(),
            });
            Ok(())
        })
    }

    /// Cooperative refund by the beneficiary: `Funded -> Refunded`.
    ///
    /// Allowed only strictly after the deadline; pays the full locked
    /// amount back to the depositor.
    ///
    /// # Errors
    ///
    /// [`EscrowError::InvalidState`] outside `Funded`,
    /// [`EscrowError::Unauthorized`] unless `caller` is the beneficiary,
    /// [`EscrowError::DeadlineNotExpired`] up to and including the
    /// deadline.
    pub fn refund(
        &mut self,
        caller: &Party,
        now: Timestamp,
        ledger: &mut dyn Ledger,
    ) -> Result<()> {
        self.non_reentrant(|deal| {
            if deal.state != DealState::Funded {
                return Err(EscrowError::InvalidState);
            }
            if caller != &deal.beneficiary {
                return Err(EscrowError::Unauthorized);
            }
            if now <= deal.deadline {
                return Err(EscrowError::DeadlineNotExpired);
            }
            deal.pay(ledger, &deal.depositor)?;
            deal.state = DealState::Refunded;
            deal.events.push(DealEvent::Refunded {
                to: deal.depositor.clone(),
            });
            Ok(())
        })
    }

    /// Escalates a funded deal to arbitration: `Funded -> Disputed`.
    ///
    /// The permitted caller set is exactly `{depositor, beneficiary}`.
    /// No deadline constraint applies.
    pub fn dispute(&mut self, caller: &Party) -> Result<()> {
        if self.state != DealState::Funded {
            return Err(EscrowError::InvalidState);
        }
        if !self.participants().contains(&caller) {
            return Err(EscrowError::Unauthorized);
        }
        self.state = DealState::Disputed;
        self.events.push(DealEvent::Disputed {
            by: caller.clone(),
        });
        Ok(())
    }

    /// The arbitrator's decision on an escalated deal:
    /// `Disputed -> Resolved`.
    ///
    /// Pays the full locked amount to the beneficiary if `to_beneficiary`,
    /// back to the depositor otherwise.
    pub fn resolve(
        &mut self,
        caller: &Party,
        to_beneficiary: bool,
        ledger: &mut dyn Ledger,
    ) -> Result<()> {
        self.non_reentrant(|deal| {
            if deal.state != DealState::Disputed {
                return Err(EscrowError::InvalidState);
            }
            if caller != &deal.arbitrator {
                return Err(EscrowError::Unauthorized);
            }
            let recipient = deal.recipient(to_beneficiary).clone();
            deal.pay(ledger, &recipient)?;
            deal.state = DealState::Resolved;
            deal.events.push(DealEvent::Resolved {
                executor: caller.clone(),
                to_beneficiary,
            });
            Ok(())
        })
    }

    /// Settlement by off-ledger oracle attestation, from either `Funded`
    /// or `Disputed`, ending in `Released`.
    ///
    /// Short-circuits the cooperative path or an active dispute without
    /// involving the arbitrator: whoever holds a signature from the
    /// deal's oracle signer over [`oracle_message`](Self::oracle_message)
    /// may submit it. Each digest is consumed at most once.
    ///
    /// # Errors
    ///
    /// [`EscrowError::InvalidState`] outside `{Funded, Disputed}`,
    /// [`EscrowError::BadOracleSignature`] for a malformed signature or
    /// one not from the oracle signer, [`EscrowError::OracleReplay`] for
    /// a digest seen before.
    pub fn oracle_resolve(
        &mut self,
        to_beneficiary: bool,
        nonce: u64,
        signature: &RecoverableSignature,
        ledger: &mut dyn Ledger,
    ) -> Result<()> {
        self.non_reentrant(|deal| {
            let digest = deal.oracle_message(to_beneficiary, nonce);
            let signer = signature
                .recover(&digest)
                .map_err(|_| EscrowError::BadOracleSignature)?;
            if !signer.ct_eq(&deal.oracle_signer) {
                return Err(EscrowError::BadOracleSignature);
            }
            // Replay of a spent digest is reported as such even once the
            // deal has settled.
            if deal.used_oracle_messages.contains(&digest) {
                return Err(EscrowError::OracleReplay);
            }
            if !matches!(deal.state, DealState::Funded | DealState::Disputed) {
                return Err(EscrowError::InvalidState);
            }
            let recipient = deal.recipient(to_beneficiary).clone();
            deal.pay(ledger, &recipient)?;
            deal.used_oracle_messages.insert(digest);
            deal.state = DealState::Released;
            deal.events.push(DealEvent::OracleResolved {
                to_beneficiary,
                nonce,
            });
            Ok(())
        })
    }

    /// Digest the oracle signs to settle this deal.
    ///
    /// Binds the deal's custody identity, the payout direction, and a
    /// signer-chosen nonce under a domain tag.
    pub fn oracle_message(&self, to_beneficiary: bool, nonce: u64) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(SETTLEMENT_DOMAIN);
        hasher.update(self.address.id().as_bytes());
        hasher.update([to_beneficiary as u8]);
        hasher.update(nonce.to_be_bytes());
        hasher.finalize().into()
    }

    // The set of identities permitted to escalate.
    fn participants(&self) -> [&Party; 2] {
        [&self.depositor, &self.beneficiary]
    }

    fn recipient(&self, to_beneficiary: bool) -> &Party {
        if to_beneficiary {
            &self.beneficiary
        } else {
            &self.depositor
        }
    }

    fn pay(
        &self,
        ledger: &mut dyn Ledger,
        recipient: &Party,
    ) -> std::result::Result<(), TransferError> {
        PayoutChannel::new(&self.asset, self.amount, &self.address).pay(ledger, recipient)
    }

    // The ledger call inside a fund-moving operation may call back into
    // this deal before the state write lands; the latch holds for the
    // whole operation so any such call fails.
    fn non_reentrant<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.entered {
            return Err(EscrowError::Reentrancy);
        }
        self.entered = true;
        let result = op(self);
        self.entered = false;
        result
    }
}

#[cfg(test)]
fn funded_native_deal() -> (EscrowDeal, crate::ledger::mock::MockLedger) {
    use core::str::FromStr as _;

    let depositor = Party::from_str("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").unwrap();
    let params = DealParams {
        depositor: depositor.clone(),
        beneficiary: Party::from_str("0xEA674fdDe714fd979de3EdF0F56AA9716B898ec8").unwrap(),
        asset: Asset::Native,
        amount: 1_000,
        deadline: 1_700_000_000,
        arbitrator: Party::from_str("0xab5801a7D398351b8bE11C439e05C5B3259aeC9B").unwrap(),
        oracle_signer: Party::from_str("0x90F8bf6A479f320ead074411a4B0e7944Ea8c9C1").unwrap(),
    };
    let mut deal = EscrowDeal::open(
        Party::from_str("0x000000000000000000000000000000000000e5c0").unwrap(),
        params,
    );
    let mut ledger = crate::ledger::mock::MockLedger::new();
    ledger.mint_native(&depositor, 1_000);
    deal.fund(&depositor, 1_000, &mut ledger).unwrap();
    (deal, ledger)
}
