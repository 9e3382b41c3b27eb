// Ledger Engine - Balance Store
// Sparse (holder, token id) -> amount bookkeeping with checked arithmetic,
// plus per-id supply records (total minted / total burned).
//
// Absence of a record is equivalent to a zero balance; a record debited down
// to zero persists rather than being removed, so existence checks stay
// trivial and symmetric. Mint/burn supply accounting is only ever driven by
// the engine; the store itself refuses any direct use of the null holder.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::types::{Amount, Holder, TokenId};

/// Per-id supply record.
///
/// Conservation invariant: for every id, the sum of all holder balances
/// equals `minted - burned`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyRecord {
    /// Total amount ever minted for this id
    pub minted: Amount,
    /// Total amount ever burned for this id
    pub burned: Amount,
}

impl SupplyRecord {
    /// Amount currently in circulation for this id
    pub fn outstanding(&self) -> Amount {
        self.minted.saturating_sub(self.burned)
    }
}

/// Composite-keyed balance store for one ledger instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceStore {
    balances: IndexMap<(Holder, TokenId), Amount>,
    supply: IndexMap<TokenId, SupplyRecord>,
}

impl BalanceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================
    // Queries
    // ========================================

    /// Balance of `holder` for `id`; absent records read as zero
    pub fn balance_of(&self, holder: &Holder, id: &TokenId) -> LedgerResult<Amount> {
        if holder.is_null() {
            return Err(LedgerError::InvalidHolder);
        }
        Ok(self
            .balances
            .get(&(*holder, *id))
            .copied()
            .unwrap_or_default())
    }

    /// Positional batch query: `holders[i]` is paired with `ids[i]`
    pub fn balance_of_batch(
        &self,
        holders: &[Holder],
        ids: &[TokenId],
    ) -> LedgerResult<Vec<Amount>> {
        if holders.len() != ids.len() {
            return Err(LedgerError::LengthMismatch {
                expected: holders.len(),
                actual: ids.len(),
            });
        }
        holders
            .iter()
            .zip(ids)
            .map(|(holder, id)| self.balance_of(holder, id))
            .collect()
    }

    /// Amount currently in circulation for `id`
    pub fn total_supply(&self, id: &TokenId) -> Amount {
        self.supply
            .get(id)
            .map(SupplyRecord::outstanding)
            .unwrap_or_default()
    }

    /// Whether any supply record references `id`
    pub fn exists(&self, id: &TokenId) -> bool {
        self.supply.contains_key(id)
    }

    /// Supply record for `id`, if any
    pub fn supply_of(&self, id: &TokenId) -> Option<&SupplyRecord> {
        self.supply.get(id)
    }

    // ========================================
    // Mutations
    // ========================================

    /// Add `amount` to the balance of `holder` for `id`
    pub fn credit(&mut self, holder: &Holder, id: &TokenId, amount: Amount) -> LedgerResult<()> {
        if holder.is_null() {
            return Err(LedgerError::InvalidHolder);
        }
        let balance = self.balances.entry((*holder, *id)).or_default();
        *balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Remove `amount` from the balance of `holder` for `id`; never partial
    pub fn debit(&mut self, holder: &Holder, id: &TokenId, amount: Amount) -> LedgerResult<()> {
        if holder.is_null() {
            return Err(LedgerError::InvalidHolder);
        }
        let balance = self.balances.entry((*holder, *id)).or_default();
        *balance = balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                have: *balance,
                need: amount,
            })?;
        Ok(())
    }

    /// Record freshly minted supply for `id`
    pub fn record_mint(&mut self, id: &TokenId, amount: Amount) -> LedgerResult<()> {
        let record = self.supply.entry(*id).or_default();
        record.minted = record
            .minted
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Record burned supply for `id`
    pub fn record_burn(&mut self, id: &TokenId, amount: Amount) -> LedgerResult<()> {
        let record = self.supply.entry(*id).or_default();
        record.burned = record
            .burned
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    // ========================================
    // Journal primitives (engine-internal)
    // ========================================

    /// Raw balance entry, `None` when the record does not exist yet
    pub(crate) fn balance_entry(&self, holder: &Holder, id: &TokenId) -> Option<Amount> {
        self.balances.get(&(*holder, *id)).copied()
    }

    /// Restore a balance entry to a captured pre-image
    pub(crate) fn restore_balance_entry(
        &mut self,
        holder: &Holder,
        id: &TokenId,
        entry: Option<Amount>,
    ) {
        match entry {
            Some(amount) => {
                self.balances.insert((*holder, *id), amount);
            }
            None => {
                self.balances.shift_remove(&(*holder, *id));
            }
        }
    }

    /// Raw supply entry, `None` when the record does not exist yet
    pub(crate) fn supply_entry(&self, id: &TokenId) -> Option<SupplyRecord> {
        self.supply.get(id).copied()
    }

    /// Restore a supply entry to a captured pre-image
    pub(crate) fn restore_supply_entry(&mut self, id: &TokenId, entry: Option<SupplyRecord>) {
        match entry {
            Some(record) => {
                self.supply.insert(*id, record);
            }
            None => {
                self.supply.shift_remove(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder(tag: u8) -> Holder {
        Holder::new([tag; 32])
    }

    #[test]
    fn test_absent_balance_reads_zero() {
        let store = BalanceStore::new();
        assert_eq!(
            store.balance_of(&holder(1), &TokenId::from(7u8)).unwrap(),
            Amount::zero()
        );
    }

    #[test]
    fn test_credit_then_debit() {
        let mut store = BalanceStore::new();
        let id = TokenId::from(1u8);

        store.credit(&holder(1), &id, Amount::from(1000u64)).unwrap();
        assert_eq!(
            store.balance_of(&holder(1), &id).unwrap(),
            Amount::from(1000u64)
        );

        store.debit(&holder(1), &id, Amount::from(400u64)).unwrap();
        assert_eq!(
            store.balance_of(&holder(1), &id).unwrap(),
            Amount::from(600u64)
        );
    }

    #[test]
    fn test_debit_insufficient_never_partial() {
        let mut store = BalanceStore::new();
        let id = TokenId::from(1u8);
        store.credit(&holder(1), &id, Amount::from(100u64)).unwrap();

        let result = store.debit(&holder(1), &id, Amount::from(101u64));
        assert_eq!(
            result,
            Err(LedgerError::InsufficientBalance {
                have: Amount::from(100u64),
                need: Amount::from(101u64),
            })
        );
        // Untouched after the failed debit
        assert_eq!(
            store.balance_of(&holder(1), &id).unwrap(),
            Amount::from(100u64)
        );
    }

    #[test]
    fn test_null_holder_rejected() {
        let mut store = BalanceStore::new();
        let id = TokenId::from(1u8);

        assert_eq!(
            store.credit(&Holder::NULL, &id, Amount::from(1u8)),
            Err(LedgerError::InvalidHolder)
        );
        assert_eq!(
            store.debit(&Holder::NULL, &id, Amount::from(1u8)),
            Err(LedgerError::InvalidHolder)
        );
        assert_eq!(
            store.balance_of(&Holder::NULL, &id),
            Err(LedgerError::InvalidHolder)
        );
    }

    #[test]
    fn test_credit_overflow_does_not_wrap() {
        let mut store = BalanceStore::new();
        let id = TokenId::from(1u8);
        store.credit(&holder(1), &id, Amount::MAX).unwrap();

        assert_eq!(
            store.credit(&holder(1), &id, Amount::from(1u8)),
            Err(LedgerError::Overflow)
        );
        assert_eq!(store.balance_of(&holder(1), &id).unwrap(), Amount::MAX);
    }

    #[test]
    fn test_balance_of_batch_is_positional() {
        let mut store = BalanceStore::new();
        let first = TokenId::from(1u8);
        let second = TokenId::from(2u8);
        store.credit(&holder(1), &first, Amount::from(10u64)).unwrap();
        store.credit(&holder(2), &second, Amount::from(20u64)).unwrap();

        let amounts = store
            .balance_of_batch(&[holder(1), holder(2), holder(1)], &[first, second, second])
            .unwrap();
        assert_eq!(
            amounts,
            vec![Amount::from(10u64), Amount::from(20u64), Amount::zero()]
        );
    }

    #[test]
    fn test_balance_of_batch_length_mismatch() {
        let store = BalanceStore::new();
        assert_eq!(
            store.balance_of_batch(&[holder(1)], &[]),
            Err(LedgerError::LengthMismatch {
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn test_supply_records() {
        let mut store = BalanceStore::new();
        let id = TokenId::from(5u8);
        assert!(!store.exists(&id));
        assert_eq!(store.total_supply(&id), Amount::zero());

        store.record_mint(&id, Amount::from(1000u64)).unwrap();
        assert!(store.exists(&id));
        assert_eq!(store.total_supply(&id), Amount::from(1000u64));

        store.record_burn(&id, Amount::from(250u64)).unwrap();
        assert_eq!(store.total_supply(&id), Amount::from(750u64));
        assert_eq!(
            store.supply_of(&id).unwrap().minted,
            Amount::from(1000u64)
        );
    }

    #[test]
    fn test_zero_record_persists() {
        let mut store = BalanceStore::new();
        let id = TokenId::from(1u8);
        store.credit(&holder(1), &id, Amount::from(5u64)).unwrap();
        store.debit(&holder(1), &id, Amount::from(5u64)).unwrap();

        assert_eq!(store.balance_entry(&holder(1), &id), Some(Amount::zero()));
    }

    #[test]
    fn test_restore_entries() {
        let mut store = BalanceStore::new();
        let id = TokenId::from(1u8);

        // Fresh entry rolls back to absence
        store.credit(&holder(1), &id, Amount::from(5u64)).unwrap();
        store.restore_balance_entry(&holder(1), &id, None);
        assert_eq!(store.balance_entry(&holder(1), &id), None);

        // Existing entry rolls back to its captured value
        store.credit(&holder(1), &id, Amount::from(5u64)).unwrap();
        store.restore_balance_entry(&holder(1), &id, Some(Amount::from(2u64)));
        assert_eq!(
            store.balance_of(&holder(1), &id).unwrap(),
            Amount::from(2u64)
        );
    }
}
