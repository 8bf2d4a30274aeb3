//! Error types for `roster-core`.

use thiserror::Error;

use crate::person::RequiredField;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field was absent from a create/update payload. Presence,
  /// not emptiness, is the checked condition.
  #[error("{0} cannot be empty")]
  MissingField(RequiredField),

  #[error("person not found: {0}")]
  NotFound(i64),

  /// Version index out of range for the person's history.
  #[error("invalid version {index} for person {id} (history length {len})")]
  InvalidVersion { id: i64, index: i64, len: i64 },

  /// Any unanticipated backend fault. Callers surface this opaquely; the
  /// detail is for logs only.
  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
