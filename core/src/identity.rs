//! Identities of escrow participants and on-ledger objects.

use base64::Engine as _;
use bincode::{Decode, Encode};
use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq as _;

use crate::error::IdentityError;

/// Opaque identifier for a party, a token contract, or a registry entry.
///
/// Parses from `0x`-prefixed hex, base58, or base64 (tried in that
/// order); displays as `0x`-prefixed hex.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Encode, Decode)]
pub struct ID(#[serde(with = "hex::serde")] Vec<u8>);

impl ID {
    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Checks if the identifier carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ID {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<[u8; 32]> for ID {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes.to_vec())
    }
}

impl std::fmt::Display for ID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl std::str::FromStr for ID {
    type Err = IdentityError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdentityError::EmptyIdentity);
        }
        if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            if digits.is_empty() {
                return Err(IdentityError::EmptyIdentity);
            }
            return Ok(Self(hex::decode(digits)?));
        }
        if let Ok(bytes) = bs58::decode(s).into_vec() {
            return Ok(Self(bytes));
        }
        if let Ok(bytes) = base64::engine::general_purpose::STANDARD.decode(s) {
            return Ok(Self(bytes));
        }
        Err(IdentityError::UnsupportedFormat)
    }
}

/// A participant or authority in an escrow deal or dispute registry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Encode, Decode)]
pub struct Party(ID);

impl Party {
    /// Identity derived from a secp256k1 public key: the SHA-256 digest
    /// of its SEC1-compressed encoding.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let digest = Sha256::digest(key.to_encoded_point(true).as_bytes());
        Self(ID(digest.to_vec()))
    }

    /// The party's underlying identifier.
    pub fn id(&self) -> &ID {
        &self.0
    }

    /// Constant-time identity comparison.
    pub fn ct_eq(&self, other: &Party) -> bool {
        self.0 .0.ct_eq(&other.0 .0).into()
    }
}

impl From<ID> for Party {
    fn from(id: ID) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for Party {
    type Err = IdentityError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}
