// Ledger Engine - Core Types
// Holders, token identifiers, capability tags and operation parameters.
//
// Identifiers are deliberately opaque: a TokenId exists once any balance or
// supply record references it, and holders are fixed-width 32-byte values
// with one reserved null value used for mint/burn event conventions.

use std::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Token class identifier (256-bit, opaque)
pub type TokenId = U256;

/// Balance amount (256-bit, non-negative, checked arithmetic only)
pub type Amount = U256;

// ========================================
// Holder
// ========================================

/// Address-like identifier that can own balances.
///
/// The all-zero value is the reserved null holder: it can never hold a
/// balance and is rejected as a direct transfer target. Mint and burn events
/// use it as the conventional counterparty.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Holder([u8; 32]);

impl Holder {
    /// The reserved null holder
    pub const NULL: Holder = Holder([0u8; 32]);

    /// Create a holder from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Whether this is the reserved null holder
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Raw bytes of the holder
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Holder({})", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Holder {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// ========================================
// Capabilities
// ========================================

/// Capability tags checked against the injected authorization oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Capability {
    /// May mint new tokens
    Mint,
    /// May pause and unpause transfers (globally or per id)
    Pause,
    /// May burn on behalf of any holder without operator approval
    Override,
}

/// Authorization oracle for minter/pauser/override capabilities.
///
/// Role membership is owned by the host environment; the engine only
/// consumes the yes/no answer.
pub trait CapabilityOracle {
    /// Check whether `actor` currently holds `capability`
    fn has_capability(&self, actor: &Holder, capability: Capability) -> bool;
}

// ========================================
// Operation Parameters
// ========================================

/// Parameters for a single transfer
#[derive(Clone, Debug)]
pub struct TransferParams {
    /// Caller executing the transfer (the holder itself or an operator)
    pub operator: Holder,
    /// Current owner of the debited balance
    pub from: Holder,
    /// Recipient
    pub to: Holder,
    /// Token id
    pub id: TokenId,
    /// Amount to move
    pub amount: Amount,
    /// Opaque blob forwarded to the acceptance hook
    pub data: Vec<u8>,
}

impl TransferParams {
    /// Create new transfer parameters with empty data
    pub fn new(operator: Holder, from: Holder, to: Holder, id: TokenId, amount: Amount) -> Self {
        Self {
            operator,
            from,
            to,
            id,
            amount,
            data: Vec::new(),
        }
    }

    /// Attach an opaque data blob
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }
}

/// Parameters for a batch transfer.
///
/// `ids` and `amounts` are positional: `ids[i]` moves `amounts[i]`. Duplicate
/// ids are legal; their deltas accumulate in call order.
#[derive(Clone, Debug)]
pub struct BatchTransferParams {
    pub operator: Holder,
    pub from: Holder,
    pub to: Holder,
    pub ids: Vec<TokenId>,
    pub amounts: Vec<Amount>,
    pub data: Vec<u8>,
}

impl BatchTransferParams {
    /// Create new batch transfer parameters with empty data
    pub fn new(
        operator: Holder,
        from: Holder,
        to: Holder,
        ids: Vec<TokenId>,
        amounts: Vec<Amount>,
    ) -> Self {
        Self {
            operator,
            from,
            to,
            ids,
            amounts,
            data: Vec::new(),
        }
    }

    /// Attach an opaque data blob
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// Reject mismatched positional arrays before any state is touched
    pub fn validate(&self) -> LedgerResult<()> {
        check_lengths(self.ids.len(), self.amounts.len())
    }
}

/// Parameters for minting a single token amount
#[derive(Clone, Debug)]
pub struct MintParams {
    /// Caller; must hold the mint capability
    pub caller: Holder,
    /// Recipient of the minted amount
    pub to: Holder,
    pub id: TokenId,
    pub amount: Amount,
    /// Opaque blob forwarded to the acceptance hook
    pub data: Vec<u8>,
}

impl MintParams {
    /// Create new mint parameters with empty data
    pub fn new(caller: Holder, to: Holder, id: TokenId, amount: Amount) -> Self {
        Self {
            caller,
            to,
            id,
            amount,
            data: Vec::new(),
        }
    }

    /// Attach an opaque data blob
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }
}

/// Parameters for minting several token amounts to one recipient
#[derive(Clone, Debug)]
pub struct BatchMintParams {
    pub caller: Holder,
    pub to: Holder,
    pub ids: Vec<TokenId>,
    pub amounts: Vec<Amount>,
    pub data: Vec<u8>,
}

impl BatchMintParams {
    /// Create new batch mint parameters with empty data
    pub fn new(caller: Holder, to: Holder, ids: Vec<TokenId>, amounts: Vec<Amount>) -> Self {
        Self {
            caller,
            to,
            ids,
            amounts,
            data: Vec::new(),
        }
    }

    /// Attach an opaque data blob
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// Reject mismatched positional arrays before any state is touched
    pub fn validate(&self) -> LedgerResult<()> {
        check_lengths(self.ids.len(), self.amounts.len())
    }
}

/// Parameters for burning a single token amount
#[derive(Clone, Debug)]
pub struct BurnParams {
    /// Caller; must be `from`, an approved operator, or hold the override capability
    pub caller: Holder,
    /// Holder whose balance is debited
    pub from: Holder,
    pub id: TokenId,
    pub amount: Amount,
}

impl BurnParams {
    /// Create new burn parameters
    pub fn new(caller: Holder, from: Holder, id: TokenId, amount: Amount) -> Self {
        Self {
            caller,
            from,
            id,
            amount,
        }
    }
}

/// Parameters for burning several token amounts from one holder
#[derive(Clone, Debug)]
pub struct BatchBurnParams {
    pub caller: Holder,
    pub from: Holder,
    pub ids: Vec<TokenId>,
    pub amounts: Vec<Amount>,
}

impl BatchBurnParams {
    /// Create new batch burn parameters
    pub fn new(caller: Holder, from: Holder, ids: Vec<TokenId>, amounts: Vec<Amount>) -> Self {
        Self {
            caller,
            from,
            ids,
            amounts,
        }
    }

    /// Reject mismatched positional arrays before any state is touched
    pub fn validate(&self) -> LedgerResult<()> {
        check_lengths(self.ids.len(), self.amounts.len())
    }
}

fn check_lengths(expected: usize, actual: usize) -> LedgerResult<()> {
    if expected != actual {
        return Err(LedgerError::LengthMismatch { expected, actual });
    }
    Ok(())
}
