//! Health alerting: trigger state machine, payload assembly, cooldown
//! persistence and async delivery orchestration

pub mod cooldown;
pub mod monitor;
pub mod report;
pub mod state;

pub use cooldown::{CooldownStore, JsonFileCooldownStore, MemoryCooldownStore};
pub use monitor::{AlertDelivery, AlertMonitor, AlertOutcome};
pub use report::{AlertPayload, SymptomGroup, WellnessRow};
pub use state::{AlertPolicy, AlertState, AlertStatus, SendBlocked};
