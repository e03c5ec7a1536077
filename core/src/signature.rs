//! Recoverable secp256k1 signatures for off-ledger settlement attestations.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

use crate::identity::Party;

/// Byte length of a recoverable signature: `r || s || v`.
pub const SIGNATURE_LENGTH: usize = 65;

/// A 65-byte recoverable ECDSA signature over the secp256k1 curve.
///
/// The trailing byte is the recovery id, allowing the signer's identity
/// to be recovered from the signature and the signed digest alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverableSignature([u8; SIGNATURE_LENGTH]);

impl RecoverableSignature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Builds from the `(signature, recovery id)` pair produced by
    /// signing a message prehash.
    pub fn from_parts(signature: &Signature, recovery_id: RecoveryId) -> Self {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..64].copy_from_slice(signature.to_bytes().as_slice());
        bytes[64] = recovery_id.to_byte();
        Self(bytes)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] unless `slice` is exactly
    /// [`SIGNATURE_LENGTH`] bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; SIGNATURE_LENGTH] = slice
            .try_into()
            .map_err(|_| Error::InvalidLength(slice.len()))?;
        Ok(Self(bytes))
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0
    }

    /// Recovers the signing identity from this signature over `digest`.
    ///
    /// # Errors
    ///
    /// Fails if the signature bytes do not decode, the recovery id is
    /// out of range, or no public key can be recovered.
    pub fn recover(&self, digest: &[u8; 32]) -> Result<Party, Error> {
        let signature = Signature::from_slice(&self.0[..64]).map_err(Error::Malformed)?;
        let recovery_id =
            RecoveryId::from_byte(self.0[64]).ok_or(Error::InvalidRecoveryId(self.0[64]))?;
        let key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
            .map_err(|_| Error::RecoveryFailed)?;
        Ok(Party::from_verifying_key(&key))
    }
}

/// Errors from signature decoding and signer recovery.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input is not `r || s || v`.
    #[error("signature must be {SIGNATURE_LENGTH} bytes, got {0}")]
    InvalidLength(usize),

    /// Trailing recovery byte is out of range.
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// Error decoding the signature scalars.
    #[error("signature decoding error: {0}")]
    Malformed(k256::ecdsa::Error),

    /// No public key could be recovered for the digest.
    #[error("signer recovery failed")]
    RecoveryFailed,
}
