//! Person — the single entity Roster stores.
//!
//! A live person row carries its full field set; all history lives in the
//! append-only version log (see [`crate::version`]).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A live person record. The `id` is store-assigned on creation, unique,
/// and never reused, even after deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:          i64,
  pub first_name:  String,
  pub middle_name: String,
  pub last_name:   String,
  pub email:       String,
  pub age:         i64,
}

// ─── Input types ─────────────────────────────────────────────────────────────

/// The required fields of a create/update payload, used to name the one
/// that was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
  FirstName,
  LastName,
  Email,
  Age,
}

impl std::fmt::Display for RequiredField {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      RequiredField::FirstName => "First name",
      RequiredField::LastName  => "Last name",
      RequiredField::Email     => "Email",
      RequiredField::Age       => "Age",
    })
  }
}

/// Raw create/update payload as it arrives off the wire. Every field is
/// optional here; [`PersonDraft::validate`] enforces which must be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonDraft {
  pub first_name:  Option<String>,
  pub middle_name: Option<String>,
  pub last_name:   Option<String>,
  pub email:       Option<String>,
  pub age:         Option<i64>,
}

/// A validated field set, ready to be written. `middle_name` has already
/// been defaulted to `""` if the payload omitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonFields {
  pub first_name:  String,
  pub middle_name: String,
  pub last_name:   String,
  pub email:       String,
  pub age:         i64,
}

impl PersonDraft {
  /// Check that every required field is present and produce the field set
  /// to persist. Runs before any mutation; fields are checked in payload
  /// order so the first missing one is the one reported.
  pub fn validate(self) -> Result<PersonFields> {
    let first_name = self
      .first_name
      .ok_or(Error::MissingField(RequiredField::FirstName))?;
    let last_name = self
      .last_name
      .ok_or(Error::MissingField(RequiredField::LastName))?;
    let email = self.email.ok_or(Error::MissingField(RequiredField::Email))?;
    let age = self.age.ok_or(Error::MissingField(RequiredField::Age))?;

    Ok(PersonFields {
      first_name,
      middle_name: self.middle_name.unwrap_or_default(),
      last_name,
      email,
      age,
    })
  }
}

impl Person {
  /// The person's current field values, e.g. for snapshotting.
  pub fn fields(&self) -> PersonFields {
    PersonFields {
      first_name:  self.first_name.clone(),
      middle_name: self.middle_name.clone(),
      last_name:   self.last_name.clone(),
      email:       self.email.clone(),
      age:         self.age,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn full_draft() -> PersonDraft {
    PersonDraft {
      first_name:  Some("Ada".into()),
      middle_name: Some("King".into()),
      last_name:   Some("Lovelace".into()),
      email:       Some("ada@example.com".into()),
      age:         Some(36),
    }
  }

  #[test]
  fn validate_accepts_full_payload() {
    let fields = full_draft().validate().unwrap();
    assert_eq!(fields.first_name, "Ada");
    assert_eq!(fields.middle_name, "King");
    assert_eq!(fields.age, 36);
  }

  #[test]
  fn validate_defaults_missing_middle_name() {
    let mut draft = full_draft();
    draft.middle_name = None;
    let fields = draft.validate().unwrap();
    assert_eq!(fields.middle_name, "");
  }

  #[test]
  fn validate_rejects_each_missing_required_field() {
    let cases: [(fn(&mut PersonDraft), RequiredField); 4] = [
      (|d| d.first_name = None, RequiredField::FirstName),
      (|d| d.last_name = None, RequiredField::LastName),
      (|d| d.email = None, RequiredField::Email),
      (|d| d.age = None, RequiredField::Age),
    ];
    for (strip, want) in cases {
      let mut draft = full_draft();
      strip(&mut draft);
      let err = draft.validate().unwrap_err();
      assert!(matches!(err, Error::MissingField(f) if f == want));
    }
  }

  #[test]
  fn required_field_messages_match_wire_text() {
    assert_eq!(RequiredField::FirstName.to_string(), "First name");
    assert_eq!(RequiredField::Age.to_string(), "Age");
  }
}
