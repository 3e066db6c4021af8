//! HTTP layer: transport client and the stack API

pub mod client;
pub mod stacks;
