//! Stack refresh: per-stack state machine, payload and batch execution

pub mod fsm;
pub mod orchestrator;
pub mod payload;
pub mod progress;
