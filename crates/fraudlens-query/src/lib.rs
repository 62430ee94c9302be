//! Query routing for the fraudlens data-access Lambda.
//!
//! A request arrives as a resource path plus a flat string parameter set.
//! The [`QueryRouter`] validates the parameters, builds one or two SQL
//! statements from code-owned whitelists, runs them through a
//! [`QueryExecutor`], and returns a tagged [`QueryOutcome`] or [`QueryError`].
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐   ┌──────────────┐   ┌──────────────┐   ┌───────────────┐
//! │ ResourcePath  │──▶│ QueryRouter  │──▶│ SelectBuilder│──▶│ QueryExecutor │
//! │ ParameterSet  │   │ (validation) │   │  ($n params) │   │  (Postgres,   │
//! └───────────────┘   └──────┬───────┘   └──────────────┘   │   spy, ...)   │
//!                            │                               └───────┬───────┘
//!                            ▼                                       │
//!                    ┌──────────────┐          RowSet                │
//!                    │ QueryOutcome │◀───────────────────────────────┘
//!                    │ / QueryError │
//!                    └──────────────┘
//! ```
//!
//! # Validation order
//!
//! 1. Required parameters are present
//! 2. Field, table and metric names are whitelisted; integers parse
//! 3. Only then does anything reach the executor
//!
//! Identifiers that end up in SQL text always come from [`catalog`] constants,
//! never from the caller. Values are always bound parameters.

pub mod catalog;
pub mod error;
pub mod executor;
pub mod outcome;
pub mod params;
pub mod resource;
pub mod router;
pub mod sql;

pub use catalog::TransactionTable;
pub use error::{ExecutorError, QueryError};
pub use executor::{QueryExecutor, RowSet, SqlParam};
pub use outcome::{Pagination, QueryOutcome, Row};
pub use params::ParameterSet;
pub use resource::{ResourcePath, UnknownResource};
pub use router::QueryRouter;
