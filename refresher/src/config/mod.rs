//! Configuration: settings file and resolved run options

pub mod options;
pub mod settings;
