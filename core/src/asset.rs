//! Asset kinds a deal can take into custody.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::identity::ID;

/// The kind of asset locked by a deal.
///
/// The locked quantity lives on the deal itself; an `Asset` only names
/// what is being moved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
#[serde(tag = "asset_type", rename_all = "snake_case")]
pub enum Asset {
    /// The ledger's base currency.
    Native,
    /// Contract-based fungible token.
    Token {
        /// Identifier of the token contract.
        contract: ID,
    },
}

impl Asset {
    /// Checks if asset is the native currency.
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => write!(f, "Native"),
            Self::Token { contract } => write!(f, "Token[{}]", contract),
        }
    }
}
