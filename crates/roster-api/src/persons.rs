//! Handlers for the `/person` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/person` | Body: person fields; 400 on a missing required field |
//! | `GET`  | `/person` | 404 when the store is empty |
//! | `GET`  | `/person/:id` | 400 `Invalid ID` if absent |
//! | `GET`  | `/person/:id/:version` | History lookup; works for deleted ids |
//! | `PUT`  | `/person/:id` | Full replace; all required fields again |
//! | `DELETE` | `/person/:id` | Returns the now-deleted last state |
//!
//! Status mapping is inherited from the legacy service: a bad id is 400,
//! only the empty store is 404. See `check_live_id`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use roster_core::{
  person::{Person, PersonDraft},
  store::PersonStore,
  version::VersionRecord,
};

use crate::error::ApiError;

fn store_err<E: Into<roster_core::Error>>(e: E) -> ApiError {
  ApiError::from(e.into())
}

/// Legacy id validation, preserved check-for-check: resolve the live row
/// first (400 `Invalid ID` when absent), then report 404 if the whole table
/// is empty. The second branch is unreachable once the first has passed --
/// a live row implies a non-empty table -- but the order is part of the
/// observable surface, so it stays.
async fn check_live_id<S>(store: &S, id: i64) -> Result<Person, ApiError>
where
  S: PersonStore,
  S::Error: Into<roster_core::Error>,
{
  let person = store
    .get(id)
    .await
    .map_err(store_err)?
    .ok_or(ApiError::InvalidId)?;

  if store.count().await.map_err(store_err)? == 0 {
    return Err(ApiError::EmptyStore);
  }
  Ok(person)
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// An unparsable body is an internal-class fault on this surface: the
/// caller gets the opaque failure, never the parser's diagnostics.
fn parse_body(body: Result<Json<PersonDraft>, JsonRejection>) -> Result<PersonDraft, ApiError> {
  let Json(draft) = body.map_err(|e| ApiError::Internal(Box::new(e)))?;
  Ok(draft)
}

/// `POST /person`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<PersonDraft>, JsonRejection>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  S::Error: Into<roster_core::Error>,
{
  let draft = parse_body(body)?;
  let person = store.create(draft).await.map_err(store_err)?;
  Ok(Json(person))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /person`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: PersonStore,
  S::Error: Into<roster_core::Error>,
{
  let all = store.list_all().await.map_err(store_err)?;
  if all.is_empty() {
    return Err(ApiError::EmptyStore);
  }
  Ok(Json(all))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /person/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  S::Error: Into<roster_core::Error>,
{
  let person = check_live_id(store.as_ref(), id).await?;
  Ok(Json(person))
}

// ─── Get version ─────────────────────────────────────────────────────────────

/// `GET /person/:id/:version`
///
/// Identity resolves through the version log rather than the live table,
/// so a deleted person's snapshots remain addressable.
pub async fn get_version<S>(
  State(store): State<Arc<S>>,
  Path((id, version)): Path<(i64, i64)>,
) -> Result<Json<VersionRecord>, ApiError>
where
  S: PersonStore,
  S::Error: Into<roster_core::Error>,
{
  let record = store.get_version(id, version).await.map_err(store_err)?;
  Ok(Json(record))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /person/:id` — full replace, not a patch.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  body: Result<Json<PersonDraft>, JsonRejection>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  S::Error: Into<roster_core::Error>,
{
  // Id check before body parse, matching the legacy surface.
  check_live_id(store.as_ref(), id).await?;
  let draft = parse_body(body)?;
  let person = store.update(id, draft).await.map_err(store_err)?;
  Ok(Json(person))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /person/:id` — returns the last-known state.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  S::Error: Into<roster_core::Error>,
{
  check_live_id(store.as_ref(), id).await?;
  let person = store.delete(id).await.map_err(store_err)?;
  Ok(Json(person))
}
