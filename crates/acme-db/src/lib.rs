//! Database layer for the Acme sales data.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! the embedded schema for the five entity tables, and the [`Session`] unit
//! of work every data-access operation goes through.
//!
//! # Design decisions
//!
//! - **Explicit writes**: sessions stage inserts, updates and deletes as
//!   values and apply them in one transaction on commit. There is no change
//!   tracking; an update names its columns.
//! - **Explicit navigation**: related rows are fetched by id through session
//!   lookups, never lazily.
//! - **Foreign keys on**: every pooled connection enforces referential
//!   integrity, so an out-of-order delete or a dangling reference fails the
//!   commit instead of persisting.

mod error;
mod migrations;
mod pool;
pub mod rows;
mod session;

pub use error::StoreError;
pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
pub use session::{CommitSummary, GeneratedId, PendingChange, Session};
