// Ledger Engine - Error Taxonomy
// Every failure surfaces with its specific kind; kinds are never coalesced
// into a generic error, and no error is recovered internally. Any error
// raised after deltas started applying triggers a full journal rollback.

use thiserror::Error;

use crate::types::Amount;

/// Ledger operation result type
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========================================
    // Input validation
    // ========================================
    /// The null holder was used where a real holder is required, or queried
    #[error("Invalid holder: the null holder cannot take part in this operation")]
    InvalidHolder,

    /// Positional arrays of a batch call differ in length
    #[error("Length mismatch: {expected} ids against {actual} amounts")]
    LengthMismatch { expected: usize, actual: usize },

    /// Mint destination is the null holder
    #[error("Mint to the null holder")]
    MintToZero,

    // ========================================
    // Balance arithmetic
    // ========================================
    /// Debit larger than the current balance
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    /// Credit or supply update would exceed the representable range
    #[error("Arithmetic overflow")]
    Overflow,

    // ========================================
    // Authorization
    // ========================================
    /// Owner tried to approve itself as operator
    #[error("Self approval is not allowed")]
    SelfApproval,

    /// Caller is neither the holder, an approved operator, nor capability-bearing
    #[error("Unauthorized")]
    Unauthorized,

    // ========================================
    // Operational state
    // ========================================
    /// A touched token id is operationally paused (globally or individually)
    #[error("Token transfer while paused")]
    Paused,

    // ========================================
    // Acceptance protocol
    // ========================================
    /// Notifiable recipient returned a wrong or missing acceptance marker
    #[error("Unsafe recipient: acceptance marker missing or wrong")]
    UnsafeRecipient,

    /// The acceptance call itself failed; the reason is preserved verbatim
    #[error("Collaborator reverted: {0}")]
    CollaboratorReverted(String),
}
