//! The `PersonStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! The request layer (`roster-api`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  person::{Person, PersonDraft},
  version::VersionRecord,
};

/// Abstraction over a Roster person store backend.
///
/// The store exclusively owns both the live person table and each person's
/// version log. Every mutation is atomic: the live-table change and the
/// version append either both take effect or neither does, and validation
/// runs before any state is touched.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Validate `draft`, assign a fresh never-used id, persist the person,
  /// and append version 0 (the creation snapshot).
  fn create(
    &self,
    draft: PersonDraft,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Full-replace update of a live person. The draft must supply all
  /// required fields even if unchanged. Appends a version record of the
  /// post-update state.
  fn update(
    &self,
    id: i64,
    draft: PersonDraft,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Remove a live person and append a terminal version record of its
  /// last state. Returns that last state. The id is never reused and the
  /// history stays queryable.
  fn delete(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All live persons in creation (id) order. An empty store yields
  /// `Ok(vec![])`; callers decide how to report that.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Number of live persons.
  fn count(&self) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Retrieve a live person by id. Returns `None` if absent (including
  /// deleted persons).
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Look up one history entry. Identity is resolved through the version
  /// log, so this works for deleted persons too; fails if the id has no
  /// history at all or `index` is out of range (negative included).
  fn get_version(
    &self,
    id: i64,
    index: i64,
  ) -> impl Future<Output = Result<VersionRecord, Self::Error>> + Send + '_;

  /// The full ordered history for an id (live or deleted). Fails if the
  /// id was never created.
  fn history(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Vec<VersionRecord>, Self::Error>> + Send + '_;
}
