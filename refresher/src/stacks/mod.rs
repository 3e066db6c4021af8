//! Stack discovery and definition resolution

pub mod catalog;
pub mod definition;
