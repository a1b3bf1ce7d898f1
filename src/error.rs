//! Error types for the cycle engine
//!
//! No error here is fatal to the host application: writes propagate so the
//! caller can surface them, advisory reads degrade to empty results, and
//! scheduling failures leave previously persisted state untouched.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
  /// Rejected at the store's write boundary before anything is persisted.
  #[error("validation failed: {0}")]
  Validation(String),

  /// The backing key-value store was unavailable or the query failed.
  #[error("persistence error: {0}")]
  Persistence(#[from] sqlx::Error),

  #[error("migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A stored value could not be encoded or decoded.
  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  /// The host's local notification backend refused an operation.
  #[error("scheduling error: {0}")]
  Scheduling(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
