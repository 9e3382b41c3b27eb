// Ledger Engine - Event Log
// Append-only record of committed operations. Events are only visible once
// the operation that produced them commits; a rolled-back operation leaves
// no trace here.

use serde::{Deserialize, Serialize};

use crate::types::{Amount, Holder, TokenId};

/// Scope of a pause or unpause event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseScope {
    /// The whole ledger
    Global,
    /// One token id
    Id(TokenId),
}

/// One committed ledger operation.
///
/// Mint and burn reuse the transfer shapes with the null holder as the
/// conventional counterparty: mint has `from == Holder::NULL`, burn has
/// `to == Holder::NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// One id moved between two holders
    TransferSingle {
        operator: Holder,
        from: Holder,
        to: Holder,
        id: TokenId,
        amount: Amount,
    },
    /// Several ids moved between two holders in one atomic operation
    TransferBatch {
        operator: Holder,
        from: Holder,
        to: Holder,
        ids: Vec<TokenId>,
        amounts: Vec<Amount>,
    },
    /// Operator delegation changed (emitted even when the value is unchanged)
    ApprovalForAll {
        owner: Holder,
        operator: Holder,
        approved: bool,
    },
    /// A pause flag was set
    Paused { scope: PauseScope },
    /// A pause flag was cleared
    Unpaused { scope: PauseScope },
}

/// Append-only event log for one ledger instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vec<LedgerEvent>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// All committed events, oldest first
    pub fn entries(&self) -> &[LedgerEvent] {
        &self.entries
    }

    /// Number of committed events
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no event has been committed yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn emit(&mut self, event: LedgerEvent) {
        self.entries.push(event);
    }
}
