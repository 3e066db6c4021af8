//! Authentication: credential selection and the per-run session

pub mod credential;
pub mod session;
