//! Deal creation parameters, the validation gate, and JSON
//! (de)serialization helpers.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::error::EscrowError;
use crate::identity::Party;
use crate::{Result, Timestamp};

/// Parameters required to open a deal, as supplied by the creation
/// collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DealParams {
    /// Who funds (locks) the deal.
    pub depositor: Party,

    /// Who receives the funds on release.
    pub beneficiary: Party,

    /// Exactly which asset gets locked.
    #[serde(flatten)]
    pub asset: Asset,

    /// Quantity locked for the life of the deal, in the smallest unit.
    pub amount: u128,

    /// Timestamp threshold separating release from refund.
    pub deadline: Timestamp,

    /// Authority deciding escalated disputes.
    pub arbitrator: Party,

    /// Identity whose signature authenticates off-ledger settlement.
    pub oracle_signer: Party,
}

impl DealParams {
    /// The creation gate: every deal must pass here before being opened.
    /// [`EscrowDeal::open`](crate::escrow::EscrowDeal::open) trusts its
    /// inputs beyond this point.
    ///
    /// # Errors
    ///
    /// [`EscrowError::InvalidAmount`] for a zero amount,
    /// [`EscrowError::InvalidDeadline`] for a deadline not strictly in
    /// the future, [`EscrowError::InvalidBeneficiary`] for an empty
    /// beneficiary identity.
    pub fn validate(&self, now: Timestamp) -> Result<()> {
        if self.amount == 0 {
            return Err(EscrowError::InvalidAmount);
        }
        if self.deadline <= now {
            return Err(EscrowError::InvalidDeadline);
        }
        if self.beneficiary.id().is_empty() {
            return Err(EscrowError::InvalidBeneficiary);
        }
        Ok(())
    }
}

/// Reads a JSON-encoded file from the given `path` and deserializes into type `T`.
///
/// # Errors
///
/// Returns an `anyhow::Error` if the file cannot be opened, read, or parsed.
pub fn load_deal_data<P, T>(path: P) -> anyhow::Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).with_context(|| format!("loading deal data: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("parsing JSON from {:?}", path))
}

/// Writes `data` (serializable) as pretty-printed JSON to the given `path`.
///
/// # Errors
///
/// Returns an `anyhow::Error` if the file cannot be created or data cannot be serialized.
pub fn save_deal_data<P, T>(path: P, data: &T) -> anyhow::Result<()>
where
    P: AsRef<Path>,
    T: Serialize,
{
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating file {:?}", path))?;
    serde_json::to_writer_pretty(file, data)
        .with_context(|| format!("serializing to JSON to {:?}", path))
}
