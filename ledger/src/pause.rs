// Ledger Engine - Pause Gate
// One global flag plus per-token-id flags. A token id is operationally
// paused when either flag is set. Pause state only gates mutating ledger
// operations; reads and approval changes pass through regardless.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::TokenId;

/// Global and per-id pause flags for one ledger instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PauseGate {
    global: bool,
    per_id: IndexMap<TokenId, bool>,
}

impl PauseGate {
    /// Create a gate with nothing paused
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is operationally paused (globally or individually)
    pub fn is_paused(&self, id: &TokenId) -> bool {
        self.global || self.per_id.get(id).copied().unwrap_or(false)
    }

    /// Whether the global flag is set
    pub fn is_global_paused(&self) -> bool {
        self.global
    }

    /// Set the global flag; idempotent
    pub fn set_global(&mut self, paused: bool) {
        self.global = paused;
    }

    /// Set the flag of one token id; idempotent
    pub fn set_id(&mut self, id: &TokenId, paused: bool) {
        self.per_id.insert(*id, paused);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_paused_by_default() {
        let gate = PauseGate::new();
        assert!(!gate.is_global_paused());
        assert!(!gate.is_paused(&TokenId::from(1u8)));
    }

    #[test]
    fn test_global_pause_covers_every_id() {
        let mut gate = PauseGate::new();
        gate.set_global(true);
        assert!(gate.is_paused(&TokenId::from(1u8)));
        assert!(gate.is_paused(&TokenId::from(999u64)));

        gate.set_global(false);
        assert!(!gate.is_paused(&TokenId::from(1u8)));
    }

    #[test]
    fn test_per_id_pause_is_scoped() {
        let mut gate = PauseGate::new();
        let paused_id = TokenId::from(37u8);
        gate.set_id(&paused_id, true);

        assert!(gate.is_paused(&paused_id));
        assert!(!gate.is_paused(&TokenId::from(38u8)));
        assert!(!gate.is_global_paused());

        gate.set_id(&paused_id, false);
        assert!(!gate.is_paused(&paused_id));
    }

    #[test]
    fn test_per_id_flag_survives_global_toggle() {
        let mut gate = PauseGate::new();
        let id = TokenId::from(1u8);
        gate.set_id(&id, true);
        gate.set_global(true);
        gate.set_global(false);
        // The individual flag is independent of the global one
        assert!(gate.is_paused(&id));
    }
}
