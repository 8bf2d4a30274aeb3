//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps SQLite from ever reassigning a deleted person's id.
CREATE TABLE IF NOT EXISTS persons (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT NOT NULL,
    middle_name TEXT NOT NULL DEFAULT '',
    last_name   TEXT NOT NULL,
    email       TEXT NOT NULL,
    age         INTEGER NOT NULL
);

-- Person history is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table, and there is no
-- foreign key to persons: history outlives the live row after a delete.
CREATE TABLE IF NOT EXISTS person_versions (
    person_id     INTEGER NOT NULL,
    version_index INTEGER NOT NULL,   -- zero-based, stable once assigned
    change        TEXT NOT NULL,      -- 'create' | 'update' | 'delete'
    first_name    TEXT NOT NULL,
    middle_name   TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    email         TEXT NOT NULL,
    age           INTEGER NOT NULL,
    recorded_at   TEXT NOT NULL,      -- ISO 8601 UTC; server-assigned
    PRIMARY KEY (person_id, version_index)
);

PRAGMA user_version = 1;
";
