// Ledger Engine - Approval Registry
// (owner, operator) -> bool delegation records. Absent records read as not
// approved. Self-approval is rejected outright rather than treated as a
// no-op. Re-setting the same value is a state no-op, but the engine still
// emits an ApprovalForAll event on every successful call.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::types::Holder;

/// Operator delegation registry for one ledger instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApprovalRegistry {
    approvals: IndexMap<(Holder, Holder), bool>,
}

impl ApprovalRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant or revoke operator status of `operator` over `owner`'s balances
    pub fn set_approval(
        &mut self,
        owner: &Holder,
        operator: &Holder,
        approved: bool,
    ) -> LedgerResult<()> {
        if owner.is_null() || operator.is_null() {
            return Err(LedgerError::InvalidHolder);
        }
        if owner == operator {
            return Err(LedgerError::SelfApproval);
        }
        self.approvals.insert((*owner, *operator), approved);
        Ok(())
    }

    /// Whether `operator` may act on behalf of `owner`; absent = false
    pub fn is_approved(&self, owner: &Holder, operator: &Holder) -> bool {
        self.approvals
            .get(&(*owner, *operator))
            .copied()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder(tag: u8) -> Holder {
        Holder::new([tag; 32])
    }

    #[test]
    fn test_default_is_not_approved() {
        let registry = ApprovalRegistry::new();
        assert!(!registry.is_approved(&holder(1), &holder(2)));
    }

    #[test]
    fn test_set_and_revoke() {
        let mut registry = ApprovalRegistry::new();
        registry.set_approval(&holder(1), &holder(2), true).unwrap();
        assert!(registry.is_approved(&holder(1), &holder(2)));
        // Direction matters
        assert!(!registry.is_approved(&holder(2), &holder(1)));

        registry.set_approval(&holder(1), &holder(2), false).unwrap();
        assert!(!registry.is_approved(&holder(1), &holder(2)));
    }

    #[test]
    fn test_self_approval_rejected() {
        let mut registry = ApprovalRegistry::new();
        assert_eq!(
            registry.set_approval(&holder(1), &holder(1), true),
            Err(LedgerError::SelfApproval)
        );
        // Also when revoking
        assert_eq!(
            registry.set_approval(&holder(1), &holder(1), false),
            Err(LedgerError::SelfApproval)
        );
    }

    #[test]
    fn test_null_holder_rejected() {
        let mut registry = ApprovalRegistry::new();
        assert_eq!(
            registry.set_approval(&Holder::NULL, &holder(2), true),
            Err(LedgerError::InvalidHolder)
        );
        assert_eq!(
            registry.set_approval(&holder(1), &Holder::NULL, true),
            Err(LedgerError::InvalidHolder)
        );
    }

    #[test]
    fn test_redundant_set_is_state_noop() {
        let mut registry = ApprovalRegistry::new();
        registry.set_approval(&holder(1), &holder(2), true).unwrap();
        registry.set_approval(&holder(1), &holder(2), true).unwrap();
        assert!(registry.is_approved(&holder(1), &holder(2)));
    }
}
