//! Acme demo library logic: configuration, logging setup, and the
//! demonstration run used by the `acme-demo` binary.

pub mod config;
pub mod demo;

use std::io::Write;

use acme_db::{MigrationError, Session, StoreError};
use config::{Config, LoggingConfig};
use demo::DemoError;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors that stop a demo run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Demo(#[from] DemoError),
}

/// Initializes the global tracing subscriber. Logs go to stderr so that
/// stdout carries only demo results.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Opens the database, applies migrations, optionally seeds fixtures, and
/// runs the demonstration sequence.
///
/// # Errors
///
/// Returns the first error that is not handled by the sequence itself. A
/// database that cannot be opened is `StoreError::StorageUnavailable`.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<(), AppError> {
    let pool = acme_db::create_pool(&config.database.path, config.database.runtime_settings())
        .map_err(StoreError::from)?;

    let mut session = Session::open(&pool)?;
    let applied = acme_db::run_migrations(session.connection())?;
    if applied > 0 {
        tracing::info!(count = applied, "applied database migrations");
    }

    if config.demo.seed {
        acme_sales::seed_demo_data(&mut session)?;
    }

    demo::run_demo(&mut session, out)?;
    session.close();

    tracing::info!("demo sequence complete");
    Ok(())
}
