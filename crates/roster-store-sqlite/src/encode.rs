//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; change kinds as lowercase
//! keywords matching their wire serialisation.

use chrono::{DateTime, Utc};
use roster_core::version::{ChangeKind, VersionRecord};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ChangeKind ──────────────────────────────────────────────────────────────

pub fn encode_change(c: ChangeKind) -> &'static str {
  match c {
    ChangeKind::Create => "create",
    ChangeKind::Update => "update",
    ChangeKind::Delete => "delete",
  }
}

pub fn decode_change(s: &str) -> Result<ChangeKind> {
  match s {
    "create" => Ok(ChangeKind::Create),
    "update" => Ok(ChangeKind::Update),
    "delete" => Ok(ChangeKind::Delete),
    other => Err(Error::UnknownChangeKind(other.to_string())),
  }
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// A `person_versions` row as read straight out of SQLite, before the text
/// columns are decoded.
pub struct RawVersion {
  pub person_id:     i64,
  pub version_index: i64,
  pub change:        String,
  pub first_name:    String,
  pub middle_name:   String,
  pub last_name:     String,
  pub email:         String,
  pub age:           i64,
  pub recorded_at:   String,
}

impl RawVersion {
  pub fn into_record(self) -> Result<VersionRecord> {
    Ok(VersionRecord {
      id:          self.person_id,
      version:     self.version_index,
      change:      decode_change(&self.change)?,
      first_name:  self.first_name,
      middle_name: self.middle_name,
      last_name:   self.last_name,
      email:       self.email,
      age:         self.age,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
