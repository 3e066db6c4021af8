//! Application entry points

pub mod run;
