//! CLI command implementations for fraudlens.

pub mod ask;
pub mod check;
pub mod deploy;
pub mod query;
pub mod serve;
