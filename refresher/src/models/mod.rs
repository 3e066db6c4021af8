//! Domain models

pub mod outcome;
pub mod stack;
