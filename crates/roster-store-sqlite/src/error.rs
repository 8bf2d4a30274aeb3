//! Error type for `roster-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown change kind: {0:?}")]
  UnknownChangeKind(String),
}

/// Collapse backend errors into the core taxonomy for the request layer:
/// domain errors pass through, everything else becomes an opaque internal
/// fault.
impl From<Error> for roster_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => roster_core::Error::Internal(Box::new(other)),
    }
  }
}

impl Error {
  /// True if this is the domain-level "person not found" error.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Error::Core(roster_core::Error::NotFound(_)))
  }

  /// True if this is the domain-level "version out of range" error.
  pub fn is_invalid_version(&self) -> bool {
    matches!(self, Error::Core(roster_core::Error::InvalidVersion { .. }))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
