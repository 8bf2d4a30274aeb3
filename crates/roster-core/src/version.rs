//! Version records — immutable snapshots of a person's change history.
//!
//! Every mutation of a person (create, update, delete) appends exactly one
//! [`VersionRecord`] to that person's log. Records are never renumbered,
//! mutated, or removed, and the log outlives the live row: a deleted
//! person's history stays queryable by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::person::{Person, PersonFields};

/// Which mutation produced a version record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
  Create,
  Update,
  Delete,
}

/// One entry in a person's append-only history.
///
/// Index 0 is the creation snapshot; each later index captures the state
/// right after the mutation that appended it. A `Delete` record is
/// terminal and repeats the last live state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
  /// Id of the owning person (live or deleted).
  pub id:          i64,
  /// Zero-based, stable position in the history sequence.
  pub version:     i64,
  pub change:      ChangeKind,
  pub first_name:  String,
  pub middle_name: String,
  pub last_name:   String,
  pub email:       String,
  pub age:         i64,
  /// Server-assigned time of the mutation.
  pub recorded_at: DateTime<Utc>,
}

impl VersionRecord {
  /// The snapshotted field values, for comparing against a live person.
  pub fn fields(&self) -> PersonFields {
    PersonFields {
      first_name:  self.first_name.clone(),
      middle_name: self.middle_name.clone(),
      last_name:   self.last_name.clone(),
      email:       self.email.clone(),
      age:         self.age,
    }
  }

  /// True if this record snapshots exactly `person`'s current state.
  pub fn matches(&self, person: &Person) -> bool {
    self.id == person.id && self.fields() == person.fields()
  }
}
