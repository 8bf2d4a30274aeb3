//! [`SqliteStore`] — the SQLite implementation of [`PersonStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use roster_core::{
  person::{Person, PersonDraft, PersonFields},
  store::PersonStore,
  version::VersionRecord,
};

use crate::{
  Error, Result,
  encode::{RawVersion, encode_dt},
  schema::SCHEMA,
};

const VERSION_COLUMNS: &str =
  "person_id, version_index, change, first_name, middle_name, last_name, \
   email, age, recorded_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster person store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person {
    id:          row.get(0)?,
    first_name:  row.get(1)?,
    middle_name: row.get(2)?,
    last_name:   row.get(3)?,
    email:       row.get(4)?,
    age:         row.get(5)?,
  })
}

fn version_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawVersion> {
  Ok(RawVersion {
    person_id:     row.get(0)?,
    version_index: row.get(1)?,
    change:        row.get(2)?,
    first_name:    row.get(3)?,
    middle_name:   row.get(4)?,
    last_name:     row.get(5)?,
    email:         row.get(6)?,
    age:           row.get(7)?,
    recorded_at:   row.get(8)?,
  })
}

/// Append one history row inside an open transaction. The next index is
/// read from the log itself so it stays correct across restarts.
fn append_version(
  tx: &rusqlite::Transaction<'_>,
  person_id: i64,
  change: &str,
  fields: &PersonFields,
  recorded_at: &str,
) -> rusqlite::Result<()> {
  let next: i64 = tx.query_row(
    "SELECT COALESCE(MAX(version_index) + 1, 0) FROM person_versions
     WHERE person_id = ?1",
    rusqlite::params![person_id],
    |r| r.get(0),
  )?;

  tx.execute(
    &format!(
      "INSERT INTO person_versions ({VERSION_COLUMNS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
    ),
    rusqlite::params![
      person_id,
      next,
      change,
      fields.first_name,
      fields.middle_name,
      fields.last_name,
      fields.email,
      fields.age,
      recorded_at,
    ],
  )?;
  Ok(())
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = Error;

  // ── Mutations ─────────────────────────────────────────────────────────────

  async fn create(&self, draft: PersonDraft) -> Result<Person> {
    let fields = draft.validate()?;
    let at_str = encode_dt(Utc::now());

    let f = fields.clone();
    let id: i64 = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO persons (first_name, middle_name, last_name, email, age)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![f.first_name, f.middle_name, f.last_name, f.email, f.age],
        )?;
        let id = tx.last_insert_rowid();
        append_version(&tx, id, "create", &f, &at_str)?;
        tx.commit()?;
        Ok(id)
      })
      .await?;

    Ok(Person {
      id,
      first_name:  fields.first_name,
      middle_name: fields.middle_name,
      last_name:   fields.last_name,
      email:       fields.email,
      age:         fields.age,
    })
  }

  async fn update(&self, id: i64, draft: PersonDraft) -> Result<Person> {
    let fields = draft.validate()?;
    let at_str = encode_dt(Utc::now());

    let f = fields.clone();
    let updated: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM persons WHERE id = ?1",
            rusqlite::params![id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(false);
        }

        tx.execute(
          "UPDATE persons
           SET first_name = ?1, middle_name = ?2, last_name = ?3,
               email = ?4, age = ?5
           WHERE id = ?6",
          rusqlite::params![
            f.first_name,
            f.middle_name,
            f.last_name,
            f.email,
            f.age,
            id
          ],
        )?;
        append_version(&tx, id, "update", &f, &at_str)?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !updated {
      return Err(roster_core::Error::NotFound(id).into());
    }

    Ok(Person {
      id,
      first_name:  fields.first_name,
      middle_name: fields.middle_name,
      last_name:   fields.last_name,
      email:       fields.email,
      age:         fields.age,
    })
  }

  async fn delete(&self, id: i64) -> Result<Person> {
    let at_str = encode_dt(Utc::now());

    let removed: Option<Person> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let person = tx
          .query_row(
            "SELECT id, first_name, middle_name, last_name, email, age
             FROM persons WHERE id = ?1",
            rusqlite::params![id],
            person_from_row,
          )
          .optional()?;

        let Some(person) = person else {
          return Ok(None);
        };

        tx.execute("DELETE FROM persons WHERE id = ?1", rusqlite::params![id])?;
        append_version(&tx, id, "delete", &person.fields(), &at_str)?;
        tx.commit()?;
        Ok(Some(person))
      })
      .await?;

    removed.ok_or_else(|| roster_core::Error::NotFound(id).into())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_all(&self) -> Result<Vec<Person>> {
    let persons = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, first_name, middle_name, last_name, email, age
           FROM persons ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], person_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(persons)
  }

  async fn count(&self) -> Result<i64> {
    let n = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM persons", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n)
  }

  async fn get(&self, id: i64) -> Result<Option<Person>> {
    let person = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, first_name, middle_name, last_name, email, age
               FROM persons WHERE id = ?1",
              rusqlite::params![id],
              person_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(person)
  }

  async fn get_version(&self, id: i64, index: i64) -> Result<VersionRecord> {
    // Identity resolves through the log, not the live table, so deleted
    // persons stay addressable.
    let (len, raw): (i64, Option<RawVersion>) = self
      .conn
      .call(move |conn| {
        let len: i64 = conn.query_row(
          "SELECT COUNT(*) FROM person_versions WHERE person_id = ?1",
          rusqlite::params![id],
          |r| r.get(0),
        )?;
        if len == 0 {
          return Ok((0, None));
        }

        let raw = conn
          .query_row(
            &format!(
              "SELECT {VERSION_COLUMNS} FROM person_versions
               WHERE person_id = ?1 AND version_index = ?2"
            ),
            rusqlite::params![id, index],
            version_from_row,
          )
          .optional()?;
        Ok((len, raw))
      })
      .await?;

    if len == 0 {
      return Err(roster_core::Error::NotFound(id).into());
    }
    match raw {
      Some(raw) => raw.into_record(),
      None => Err(roster_core::Error::InvalidVersion { id, index, len }.into()),
    }
  }

  async fn history(&self, id: i64) -> Result<Vec<VersionRecord>> {
    let raws: Vec<RawVersion> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {VERSION_COLUMNS} FROM person_versions
           WHERE person_id = ?1 ORDER BY version_index"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id], version_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    if raws.is_empty() {
      return Err(roster_core::Error::NotFound(id).into());
    }
    raws.into_iter().map(RawVersion::into_record).collect()
  }
}
