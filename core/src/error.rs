use thiserror::Error;

/// Escrow deal errors.
#[derive(Debug, Error, PartialEq)]
pub enum EscrowError {
    /// Attempted an invalid state transition.
    #[error("invalid state transition")]
    InvalidState,

    /// Caller is not in the set permitted to perform this operation.
    #[error("caller not authorized")]
    Unauthorized,

    /// Release attempted after the deal's deadline.
    #[error("deadline expired")]
    DeadlineExpired,

    /// Refund attempted while the deadline has not yet passed.
    #[error("deadline not expired")]
    DeadlineNotExpired,

    /// Attached native payment does not match what the operation requires.
    #[error("wrong payment amount: expected {expected}, got {got}")]
    WrongPaymentAmount { expected: u128, got: u128 },

    /// Settlement signature is malformed or not from the deal's oracle signer.
    #[error("bad oracle signature")]
    BadOracleSignature,

    /// Settlement digest has already been consumed.
    #[error("oracle message replay")]
    OracleReplay,

    /// Reentered a fund-moving operation while one is in flight.
    #[error("reentrant call")]
    Reentrancy,

    /// Deal amount must be non-zero.
    #[error("amount must be non-zero")]
    InvalidAmount,

    /// Deal deadline must be in the future.
    #[error("deadline must be in the future")]
    InvalidDeadline,

    /// Beneficiary identity is missing or empty.
    #[error("invalid beneficiary")]
    InvalidBeneficiary,

    #[error("asset transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),
}

/// Dispute registry errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    /// The none sentinel proposed or submitted as a final outcome.
    #[error("outcome must not be the none sentinel")]
    InvalidOutcome,

    /// A proposal already exists for this id.
    #[error("already proposed")]
    AlreadyProposed,

    /// No proposal exists for this id.
    #[error("no proposal for id")]
    NoProposal,

    #[error("already disputed")]
    AlreadyDisputed,

    /// Dispute attempted after the challenge window closed.
    #[error("challenge window closed")]
    ChallengeWindowClosed,

    /// Finalization attempted while the challenge window is still open.
    #[error("challenge window not closed")]
    ChallengeWindowNotClosed,

    #[error("already resolved")]
    AlreadyResolved,

    /// Automatic finalization attempted on a challenged proposal.
    #[error("proposal is disputed")]
    Disputed,

    /// Resolver decision attempted on an unchallenged proposal.
    #[error("proposal is not disputed")]
    NotDisputed,

    /// Caller is not the registry's resolver.
    #[error("caller not authorized")]
    Unauthorized,
}

/// Errors that might occur while parsing into an `ID`.
#[derive(Debug, Error, PartialEq)]
pub enum IdentityError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("cannot parse identity from empty string")]
    EmptyIdentity,

    #[error("unsupported identity format")]
    UnsupportedFormat,
}

/// Errors reported by the external asset ledger.
///
/// A transfer either fully succeeds or fails with one of these; partial
/// transfers are never reported.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    /// Source account does not hold the required amount.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u128, available: u128 },

    /// The ledger refused the transfer.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}
