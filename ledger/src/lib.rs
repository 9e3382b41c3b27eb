// Multi-Token Ledger Engine
// Contract-instance-scoped accounting core for many fungible and
// non-fungible token ids sharing one balance space.
//
// Features:
// - Single and batch transfers between holders
// - Minting and burning with per-id supply records
// - Operator approvals (delegate transfer/burn rights)
// - Global and per-id pausability
// - Safe-transfer acceptance checks against collaborator-capable recipients
// - Atomicity: any failure restores state to exactly what it was
//
// Module Structure:
// - error: Error taxonomy
// - types: Holders, ids, capability oracle, operation parameters
// - store: Balance and supply bookkeeping
// - approvals: Operator delegation registry
// - pause: Global and per-id pause flags
// - receiver: Acceptance protocol (markers, hook, outcome)
// - events: Committed-operation event log
// - engine: Operation orchestrator with journal rollback
//
// Role membership, collaborator classification and collaborator invocation
// are owned by the host environment and injected through the
// `CapabilityOracle` and `ReceiverHook` traits.

mod approvals;
mod engine;
mod error;
mod events;
mod pause;
mod receiver;
mod store;
mod types;

pub use approvals::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use pause::*;
pub use receiver::*;
pub use store::*;
pub use types::*;
