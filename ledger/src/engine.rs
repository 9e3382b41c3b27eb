// Ledger Engine - Operations
// Orchestrates every mutating ledger operation over the balance store,
// approval registry and pause gate, with the authorization oracle and the
// acceptance hook injected by the host.
//
// Every operation runs checks-effects-notify: validation, authorization and
// pause checks happen before any delta; deltas are applied against live
// state under a journal of first-touch pre-images; the acceptance hook is
// called last and observes post-apply balances. Any failure after deltas
// started applying restores every pre-image in reverse order, so a failed
// operation is indistinguishable from one that never ran. Events are only
// emitted on commit.

use log::{debug, trace, warn};

use crate::approvals::ApprovalRegistry;
use crate::error::{LedgerError, LedgerResult};
use crate::events::{EventLog, LedgerEvent, PauseScope};
use crate::pause::PauseGate;
use crate::receiver::{notify_batch_received, notify_received, Acceptance, ReceiverHook};
use crate::store::{BalanceStore, SupplyRecord};
use crate::types::{
    Amount, BatchBurnParams, BatchMintParams, BatchTransferParams, BurnParams, Capability,
    CapabilityOracle, Holder, MintParams, TokenId, TransferParams,
};

// ========================================
// Journal
// ========================================

/// Pre-images of every record touched by one operation, captured on first
/// touch. Reverting restores them in reverse order; a record that did not
/// exist before the operation is removed again, not zeroed.
#[derive(Debug, Default)]
struct Journal {
    balances: Vec<((Holder, TokenId), Option<Amount>)>,
    supply: Vec<(TokenId, Option<SupplyRecord>)>,
}

impl Journal {
    fn new() -> Self {
        Self::default()
    }

    fn note_balance(&mut self, store: &BalanceStore, holder: &Holder, id: &TokenId) {
        let key = (*holder, *id);
        if self.balances.iter().any(|(k, _)| *k == key) {
            return;
        }
        self.balances.push((key, store.balance_entry(holder, id)));
    }

    fn note_supply(&mut self, store: &BalanceStore, id: &TokenId) {
        if self.supply.iter().any(|(k, _)| k == id) {
            return;
        }
        self.supply.push((*id, store.supply_entry(id)));
    }

    fn revert(self, store: &mut BalanceStore) {
        for ((holder, id), entry) in self.balances.into_iter().rev() {
            store.restore_balance_entry(&holder, &id, entry);
        }
        for (id, entry) in self.supply.into_iter().rev() {
            store.restore_supply_entry(&id, entry);
        }
    }
}

// ========================================
// Engine
// ========================================

/// One ledger instance.
///
/// All mutating operations take `&mut self`: exclusive access per operation
/// is the concurrency model. The acceptance hook is the single suspension
/// point and observes post-apply balances.
#[derive(Debug)]
pub struct LedgerEngine<C: CapabilityOracle, R: ReceiverHook> {
    balances: BalanceStore,
    approvals: ApprovalRegistry,
    pause: PauseGate,
    capabilities: C,
    receiver: R,
    events: EventLog,
}

impl<C: CapabilityOracle, R: ReceiverHook> LedgerEngine<C, R> {
    /// Create an empty ledger wired to the host's oracle and acceptance hook
    pub fn new(capabilities: C, receiver: R) -> Self {
        Self {
            balances: BalanceStore::new(),
            approvals: ApprovalRegistry::new(),
            pause: PauseGate::new(),
            capabilities,
            receiver,
            events: EventLog::new(),
        }
    }

    // ========================================
    // Queries (never pause-gated)
    // ========================================

    /// Balance of `holder` for `id`
    pub fn balance_of(&self, holder: &Holder, id: &TokenId) -> LedgerResult<Amount> {
        self.balances.balance_of(holder, id)
    }

    /// Positional batch balance query
    pub fn balance_of_batch(
        &self,
        holders: &[Holder],
        ids: &[TokenId],
    ) -> LedgerResult<Vec<Amount>> {
        self.balances.balance_of_batch(holders, ids)
    }

    /// Whether `operator` may act on behalf of `owner`
    pub fn is_approved_for_all(&self, owner: &Holder, operator: &Holder) -> LedgerResult<bool> {
        if owner.is_null() || operator.is_null() {
            return Err(LedgerError::InvalidHolder);
        }
        Ok(self.approvals.is_approved(owner, operator))
    }

    /// Whether `id` is operationally paused (globally or individually)
    pub fn is_paused(&self, id: &TokenId) -> bool {
        self.pause.is_paused(id)
    }

    /// Whether the global pause flag is set
    pub fn is_global_paused(&self) -> bool {
        self.pause.is_global_paused()
    }

    /// Amount currently in circulation for `id`
    pub fn total_supply(&self, id: &TokenId) -> Amount {
        self.balances.total_supply(id)
    }

    /// Whether `id` has ever been minted
    pub fn exists(&self, id: &TokenId) -> bool {
        self.balances.exists(id)
    }

    /// Committed events, oldest first
    pub fn events(&self) -> &[LedgerEvent] {
        self.events.entries()
    }

    // ========================================
    // Mint
    // ========================================

    /// Mint `amount` of `id` to a recipient.
    ///
    /// The caller must hold the mint capability. The recipient runs the
    /// single-transfer acceptance check; on rejection the mint is fully
    /// reversed, including the supply record.
    pub fn mint(&mut self, params: MintParams) -> LedgerResult<()> {
        debug!(
            "mint: caller={} to={} id={} amount={}",
            params.caller, params.to, params.id, params.amount
        );

        // 1. Validate the recipient
        if params.to.is_null() {
            return Err(LedgerError::MintToZero);
        }

        // 2. Authorize against the oracle
        if !self
            .capabilities
            .has_capability(&params.caller, Capability::Mint)
        {
            return Err(LedgerError::Unauthorized);
        }

        // 3. Pause check
        self.ensure_not_paused(&params.id)?;

        // 4. Apply under journal
        let mut journal = Journal::new();
        if let Err(err) = self.apply_mint(&mut journal, &params.to, &params.id, params.amount) {
            return Err(self.abort(journal, err));
        }

        // 5. Acceptance check against the recipient
        let outcome = notify_received(
            &self.receiver,
            &params.to,
            &params.caller,
            &Holder::NULL,
            &params.id,
            params.amount,
            &params.data,
        );
        if let Err(err) = Self::acceptance_to_result(outcome) {
            return Err(self.abort(journal, err));
        }

        // 6. Commit
        self.events.emit(LedgerEvent::TransferSingle {
            operator: params.caller,
            from: Holder::NULL,
            to: params.to,
            id: params.id,
            amount: params.amount,
        });
        Ok(())
    }

    /// Mint several id/amount pairs to one recipient as one atomic group.
    ///
    /// One batch acceptance call, one `TransferBatch` event. Any failing
    /// pair reverses the whole group.
    pub fn mint_batch(&mut self, params: BatchMintParams) -> LedgerResult<()> {
        debug!(
            "mint_batch: caller={} to={} ids={}",
            params.caller,
            params.to,
            params.ids.len()
        );

        // 1. Validate shape and recipient
        params.validate()?;
        if params.to.is_null() {
            return Err(LedgerError::MintToZero);
        }

        // 2. Authorize against the oracle
        if !self
            .capabilities
            .has_capability(&params.caller, Capability::Mint)
        {
            return Err(LedgerError::Unauthorized);
        }

        // 3. Pause check over every id before any delta
        for id in &params.ids {
            self.ensure_not_paused(id)?;
        }

        // 4. Apply every pair under one journal
        let mut journal = Journal::new();
        for (id, amount) in params.ids.iter().zip(&params.amounts) {
            if let Err(err) = self.apply_mint(&mut journal, &params.to, id, *amount) {
                return Err(self.abort(journal, err));
            }
        }

        // 5. Single batch acceptance call
        let outcome = notify_batch_received(
            &self.receiver,
            &params.to,
            &params.caller,
            &Holder::NULL,
            &params.ids,
            &params.amounts,
            &params.data,
        );
        if let Err(err) = Self::acceptance_to_result(outcome) {
            return Err(self.abort(journal, err));
        }

        // 6. Commit
        self.events.emit(LedgerEvent::TransferBatch {
            operator: params.caller,
            from: Holder::NULL,
            to: params.to,
            ids: params.ids,
            amounts: params.amounts,
        });
        Ok(())
    }

    // ========================================
    // Burn
    // ========================================

    /// Burn `amount` of `id` from a holder.
    ///
    /// The caller must be the holder, an approved operator, or hold the
    /// override capability. No acceptance check; burning has no recipient.
    pub fn burn(&mut self, params: BurnParams) -> LedgerResult<()> {
        debug!(
            "burn: caller={} from={} id={} amount={}",
            params.caller, params.from, params.id, params.amount
        );

        // 1. Validate the debited holder
        if params.from.is_null() {
            return Err(LedgerError::InvalidHolder);
        }

        // 2. Authorize
        self.authorize_burn(&params.caller, &params.from)?;

        // 3. Pause check
        self.ensure_not_paused(&params.id)?;

        // 4. Apply under journal
        let mut journal = Journal::new();
        if let Err(err) = self.apply_burn(&mut journal, &params.from, &params.id, params.amount) {
            return Err(self.abort(journal, err));
        }

        // 5. Commit
        self.events.emit(LedgerEvent::TransferSingle {
            operator: params.caller,
            from: params.from,
            to: Holder::NULL,
            id: params.id,
            amount: params.amount,
        });
        Ok(())
    }

    /// Burn several id/amount pairs from one holder as one atomic group
    pub fn burn_batch(&mut self, params: BatchBurnParams) -> LedgerResult<()> {
        debug!(
            "burn_batch: caller={} from={} ids={}",
            params.caller,
            params.from,
            params.ids.len()
        );

        // 1. Validate shape and holder
        params.validate()?;
        if params.from.is_null() {
            return Err(LedgerError::InvalidHolder);
        }

        // 2. Authorize
        self.authorize_burn(&params.caller, &params.from)?;

        // 3. Pause check over every id before any delta
        for id in &params.ids {
            self.ensure_not_paused(id)?;
        }

        // 4. Apply every pair under one journal
        let mut journal = Journal::new();
        for (id, amount) in params.ids.iter().zip(&params.amounts) {
            if let Err(err) = self.apply_burn(&mut journal, &params.from, id, *amount) {
                return Err(self.abort(journal, err));
            }
        }

        // 5. Commit
        self.events.emit(LedgerEvent::TransferBatch {
            operator: params.caller,
            from: params.from,
            to: Holder::NULL,
            ids: params.ids,
            amounts: params.amounts,
        });
        Ok(())
    }

    // ========================================
    // Transfer
    // ========================================

    /// Move `amount` of `id` between two holders.
    ///
    /// The operator must be the owner or approved by them. The recipient
    /// runs the single-transfer acceptance check after the deltas are
    /// applied; rejection reverses both sides.
    pub fn transfer(&mut self, params: TransferParams) -> LedgerResult<()> {
        debug!(
            "transfer: operator={} from={} to={} id={} amount={}",
            params.operator, params.from, params.to, params.id, params.amount
        );

        // 1. Validate both endpoints
        if params.from.is_null() || params.to.is_null() {
            return Err(LedgerError::InvalidHolder);
        }

        // 2. Authorize the operator over the owner
        self.authorize_transfer(&params.operator, &params.from)?;

        // 3. Pause check
        self.ensure_not_paused(&params.id)?;

        // 4. Apply both sides under one journal
        let mut journal = Journal::new();
        if let Err(err) = self.apply_move(
            &mut journal,
            &params.from,
            &params.to,
            &params.id,
            params.amount,
        ) {
            return Err(self.abort(journal, err));
        }

        // 5. Acceptance check against the recipient
        let outcome = notify_received(
            &self.receiver,
            &params.to,
            &params.operator,
            &params.from,
            &params.id,
            params.amount,
            &params.data,
        );
        if let Err(err) = Self::acceptance_to_result(outcome) {
            return Err(self.abort(journal, err));
        }

        // 6. Commit
        self.events.emit(LedgerEvent::TransferSingle {
            operator: params.operator,
            from: params.from,
            to: params.to,
            id: params.id,
            amount: params.amount,
        });
        Ok(())
    }

    /// Move several id/amount pairs between two holders as one atomic group.
    ///
    /// Duplicate ids are legal; their deltas accumulate in call order. One
    /// failing pair, one paused id or one rejected acceptance reverses every
    /// applied delta.
    pub fn transfer_batch(&mut self, params: BatchTransferParams) -> LedgerResult<()> {
        debug!(
            "transfer_batch: operator={} from={} to={} ids={}",
            params.operator,
            params.from,
            params.to,
            params.ids.len()
        );

        // 1. Validate shape and endpoints before any state is touched
        params.validate()?;
        if params.from.is_null() || params.to.is_null() {
            return Err(LedgerError::InvalidHolder);
        }

        // 2. Authorize the operator over the owner
        self.authorize_transfer(&params.operator, &params.from)?;

        // 3. Pause check over every id before any delta
        for id in &params.ids {
            self.ensure_not_paused(id)?;
        }

        // 4. Apply every pair under one journal
        let mut journal = Journal::new();
        for (id, amount) in params.ids.iter().zip(&params.amounts) {
            if let Err(err) =
                self.apply_move(&mut journal, &params.from, &params.to, id, *amount)
            {
                return Err(self.abort(journal, err));
            }
        }

        // 5. Single batch acceptance call
        let outcome = notify_batch_received(
            &self.receiver,
            &params.to,
            &params.operator,
            &params.from,
            &params.ids,
            &params.amounts,
            &params.data,
        );
        if let Err(err) = Self::acceptance_to_result(outcome) {
            return Err(self.abort(journal, err));
        }

        // 6. Commit
        self.events.emit(LedgerEvent::TransferBatch {
            operator: params.operator,
            from: params.from,
            to: params.to,
            ids: params.ids,
            amounts: params.amounts,
        });
        Ok(())
    }

    // ========================================
    // Approvals & pause
    // ========================================

    /// Grant or revoke operator status over the caller's balances.
    ///
    /// Works while paused. Emits `ApprovalForAll` on every successful call,
    /// even when the stored value is unchanged.
    pub fn set_approval(
        &mut self,
        caller: &Holder,
        operator: &Holder,
        approved: bool,
    ) -> LedgerResult<()> {
        debug!(
            "set_approval: owner={} operator={} approved={}",
            caller, operator, approved
        );
        self.approvals.set_approval(caller, operator, approved)?;
        self.events.emit(LedgerEvent::ApprovalForAll {
            owner: *caller,
            operator: *operator,
            approved,
        });
        Ok(())
    }

    /// Set or clear the global pause flag.
    ///
    /// The caller must hold the pause capability. Idempotent on state, but
    /// every privileged call emits its `Paused`/`Unpaused` event.
    pub fn set_global_pause(&mut self, caller: &Holder, paused: bool) -> LedgerResult<()> {
        debug!("set_global_pause: caller={} paused={}", caller, paused);
        if !self.capabilities.has_capability(caller, Capability::Pause) {
            return Err(LedgerError::Unauthorized);
        }
        self.pause.set_global(paused);
        self.events.emit(Self::pause_event(PauseScope::Global, paused));
        Ok(())
    }

    /// Set or clear the pause flag of one token id
    pub fn set_id_pause(
        &mut self,
        caller: &Holder,
        id: &TokenId,
        paused: bool,
    ) -> LedgerResult<()> {
        debug!("set_id_pause: caller={} id={} paused={}", caller, id, paused);
        if !self.capabilities.has_capability(caller, Capability::Pause) {
            return Err(LedgerError::Unauthorized);
        }
        self.pause.set_id(id, paused);
        self.events.emit(Self::pause_event(PauseScope::Id(*id), paused));
        Ok(())
    }

    // ========================================
    // Internals
    // ========================================

    fn ensure_not_paused(&self, id: &TokenId) -> LedgerResult<()> {
        if self.pause.is_paused(id) {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    fn authorize_transfer(&self, operator: &Holder, from: &Holder) -> LedgerResult<()> {
        if operator == from || self.approvals.is_approved(from, operator) {
            return Ok(());
        }
        Err(LedgerError::Unauthorized)
    }

    fn authorize_burn(&self, caller: &Holder, from: &Holder) -> LedgerResult<()> {
        if caller == from
            || self.approvals.is_approved(from, caller)
            || self
                .capabilities
                .has_capability(caller, Capability::Override)
        {
            return Ok(());
        }
        Err(LedgerError::Unauthorized)
    }

    fn apply_move(
        &mut self,
        journal: &mut Journal,
        from: &Holder,
        to: &Holder,
        id: &TokenId,
        amount: Amount,
    ) -> LedgerResult<()> {
        trace!("move {} of {} from {} to {}", amount, id, from, to);
        journal.note_balance(&self.balances, from, id);
        self.balances.debit(from, id, amount)?;
        journal.note_balance(&self.balances, to, id);
        self.balances.credit(to, id, amount)?;
        Ok(())
    }

    fn apply_mint(
        &mut self,
        journal: &mut Journal,
        to: &Holder,
        id: &TokenId,
        amount: Amount,
    ) -> LedgerResult<()> {
        trace!("mint {} of {} to {}", amount, id, to);
        journal.note_balance(&self.balances, to, id);
        self.balances.credit(to, id, amount)?;
        journal.note_supply(&self.balances, id);
        self.balances.record_mint(id, amount)?;
        Ok(())
    }

    fn apply_burn(
        &mut self,
        journal: &mut Journal,
        from: &Holder,
        id: &TokenId,
        amount: Amount,
    ) -> LedgerResult<()> {
        trace!("burn {} of {} from {}", amount, id, from);
        journal.note_balance(&self.balances, from, id);
        self.balances.debit(from, id, amount)?;
        journal.note_supply(&self.balances, id);
        self.balances.record_burn(id, amount)?;
        Ok(())
    }

    /// Restore every journaled pre-image and hand the error back
    fn abort(&mut self, journal: Journal, err: LedgerError) -> LedgerError {
        warn!("rolling back: {}", err);
        journal.revert(&mut self.balances);
        err
    }

    fn acceptance_to_result(outcome: Acceptance) -> LedgerResult<()> {
        match outcome {
            Acceptance::Accepted => Ok(()),
            Acceptance::Rejected => Err(LedgerError::UnsafeRecipient),
            Acceptance::Reverted(reason) => Err(LedgerError::CollaboratorReverted(reason)),
        }
    }

    fn pause_event(scope: PauseScope, paused: bool) -> LedgerEvent {
        if paused {
            LedgerEvent::Paused { scope }
        } else {
            LedgerEvent::Unpaused { scope }
        }
    }
}
