// Ledger Engine - Acceptance Protocol
// Recipients backed by executable collaborator logic must acknowledge a
// transfer by returning the exact 4-byte marker for the call shape. The
// single and batch markers are distinct and never interchangeable; anything
// other than the expected marker is a rejection. Plain holders are accepted
// unconditionally without a call.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Amount, Holder, TokenId};

/// Acceptance marker for a single-transfer notification
pub const SINGLE_ACCEPT_MARKER: ReplyMarker = ReplyMarker([0xe7, 0x8b, 0x33, 0x25]);

/// Acceptance marker for a batch-transfer notification
pub const BATCH_ACCEPT_MARKER: ReplyMarker = ReplyMarker([0x9b, 0x49, 0xe3, 0x32]);

/// 4-byte value returned by a notified collaborator
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplyMarker(pub [u8; 4]);

impl fmt::Debug for ReplyMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReplyMarker(0x{})", hex::encode(self.0))
    }
}

/// Outcome of one acceptance check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acceptance {
    /// Exact expected marker returned, or recipient is a plain holder
    Accepted,
    /// Collaborator answered with a wrong or missing marker
    Rejected,
    /// The notification call itself failed; reason preserved verbatim
    Reverted(String),
}

/// Hook into recipient collaborator logic.
///
/// Classification and invocation both live with the host environment. The
/// engine only cares whether a holder must be notified and what came back:
/// `Ok(marker)` is the collaborator's return value, `Err(reason)` means the
/// call itself failed and carries the collaborator's failure reason.
pub trait ReceiverHook {
    /// Whether `holder` is collaborator-capable and must acknowledge receipt
    fn is_notifiable(&self, holder: &Holder) -> bool;

    /// Notify `recipient` of a single transfer
    fn on_received(
        &self,
        recipient: &Holder,
        operator: &Holder,
        from: &Holder,
        id: &TokenId,
        amount: Amount,
        data: &[u8],
    ) -> Result<ReplyMarker, String>;

    /// Notify `recipient` of a batch transfer
    fn on_batch_received(
        &self,
        recipient: &Holder,
        operator: &Holder,
        from: &Holder,
        ids: &[TokenId],
        amounts: &[Amount],
        data: &[u8],
    ) -> Result<ReplyMarker, String>;
}

/// Hook for hosts without collaborator-capable holders: nothing is ever
/// notified, every recipient accepts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ReceiverHook for AcceptAll {
    fn is_notifiable(&self, _holder: &Holder) -> bool {
        false
    }

    fn on_received(
        &self,
        _recipient: &Holder,
        _operator: &Holder,
        _from: &Holder,
        _id: &TokenId,
        _amount: Amount,
        _data: &[u8],
    ) -> Result<ReplyMarker, String> {
        Ok(SINGLE_ACCEPT_MARKER)
    }

    fn on_batch_received(
        &self,
        _recipient: &Holder,
        _operator: &Holder,
        _from: &Holder,
        _ids: &[TokenId],
        _amounts: &[Amount],
        _data: &[u8],
    ) -> Result<ReplyMarker, String> {
        Ok(BATCH_ACCEPT_MARKER)
    }
}

/// Run the single-transfer acceptance check against `recipient`
pub fn notify_received<R: ReceiverHook + ?Sized>(
    hook: &R,
    recipient: &Holder,
    operator: &Holder,
    from: &Holder,
    id: &TokenId,
    amount: Amount,
    data: &[u8],
) -> Acceptance {
    if !hook.is_notifiable(recipient) {
        return Acceptance::Accepted;
    }
    match hook.on_received(recipient, operator, from, id, amount, data) {
        Ok(marker) if marker == SINGLE_ACCEPT_MARKER => Acceptance::Accepted,
        Ok(_) => Acceptance::Rejected,
        Err(reason) => Acceptance::Reverted(reason),
    }
}

/// Run the batch-transfer acceptance check against `recipient`
pub fn notify_batch_received<R: ReceiverHook + ?Sized>(
    hook: &R,
    recipient: &Holder,
    operator: &Holder,
    from: &Holder,
    ids: &[TokenId],
    amounts: &[Amount],
    data: &[u8],
) -> Acceptance {
    if !hook.is_notifiable(recipient) {
        return Acceptance::Accepted;
    }
    match hook.on_batch_received(recipient, operator, from, ids, amounts, data) {
        Ok(marker) if marker == BATCH_ACCEPT_MARKER => Acceptance::Accepted,
        Ok(_) => Acceptance::Rejected,
        Err(reason) => Acceptance::Reverted(reason),
    }
}
