//! Portainer Stack Refresher Library
//!
//! Discovers Portainer stacks and forces each one to re-pull its images and
//! redeploy, without changing anything else about its configuration.

pub mod app;
pub mod authn;
pub mod cli;
pub mod config;
pub mod console;
pub mod deploy;
pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
pub mod stacks;
pub mod utils;
