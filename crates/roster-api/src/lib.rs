//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by any [`roster_core::store::PersonStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = roster_api::api_router(store.clone());
//! axum::serve(listener, app).await?;
//! ```

pub mod error;
pub mod persons;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::get,
};
use roster_core::store::PersonStore;
use serde::Deserialize;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub use error::{ApiError, OPAQUE_FAILURE};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `ROSTER_*` environment.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:    String,
  pub port:    u16,
  pub db_path: PathBuf,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The outermost layer converts any handler panic into the opaque failure
/// response, so no internal detail ever reaches the caller.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PersonStore + 'static,
  S::Error: Into<roster_core::Error>,
{
  Router::new()
    .route("/person", get(persons::list::<S>).post(persons::create::<S>))
    .route(
      "/person/{id}",
      get(persons::get_one::<S>)
        .put(persons::update_one::<S>)
        .delete(persons::delete_one::<S>),
    )
    .route("/person/{id}/{version}", get(persons::get_version::<S>))
    .with_state(store)
    .layer(TraceLayer::new_for_http())
    .layer(CatchPanicLayer::custom(handle_panic))
}

fn handle_panic(_err: Box<dyn std::any::Any + Send + 'static>) -> Response {
  (StatusCode::INTERNAL_SERVER_ERROR, OPAQUE_FAILURE).into_response()
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use roster_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  async fn send(
    store: &Arc<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    api_router(store.clone()).oneshot(req).await.unwrap()
  }

  async fn send_raw(
    store: &Arc<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   &str,
  ) -> Response {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    api_router(store.clone()).oneshot(req).await.unwrap()
  }

  async fn text_body(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn alice() -> Value {
    json!({
      "first_name": "Alice",
      "last_name":  "Liddell",
      "email":      "alice@example.com",
      "age":        30,
    })
  }

  fn failure(msg: &str, code: &str) -> Value {
    json!({ "result": "failure", "msg": msg, "error": code })
  }

  // ── List ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_empty_store_returns_404_envelope() {
    let s = store().await;
    let resp = send(&s, "GET", "/person", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
      json_body(resp).await,
      failure(
        "Currently no people in the database. Please try again later",
        "404"
      )
    );
  }

  #[tokio::test]
  async fn list_after_create_returns_json_array() {
    let s = store().await;
    send(&s, "POST", "/person", Some(alice())).await;

    let resp = send(&s, "GET", "/person", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp
      .headers()
      .get(header::CONTENT_TYPE)
      .unwrap()
      .to_str()
      .unwrap();
    assert!(ct.contains("application/json"), "Content-Type: {ct}");

    let body = json_body(resp).await;
    let arr = body.as_array().expect("array body");
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["first_name"], "Alice");
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_person_with_id_and_defaulted_middle_name() {
    let s = store().await;
    let resp = send(&s, "POST", "/person", Some(alice())).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert!(body["id"].is_i64());
    assert_eq!(body["middle_name"], "");
    assert_eq!(body["email"], "alice@example.com");
  }

  #[tokio::test]
  async fn create_missing_required_field_returns_400() {
    let s = store().await;

    let mut payload = alice();
    payload.as_object_mut().unwrap().remove("first_name");
    let resp = send(&s, "POST", "/person", Some(payload)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      json_body(resp).await,
      failure("First name cannot be empty", "400")
    );

    // Nothing was created.
    let resp = send(&s, "GET", "/person", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn create_missing_age_names_the_field() {
    let s = store().await;
    let mut payload = alice();
    payload.as_object_mut().unwrap().remove("age");
    let resp = send(&s, "POST", "/person", Some(payload)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["msg"], "Age cannot be empty");
  }

  // ── Get one ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_person_round_trips() {
    let s = store().await;
    let created = json_body(send(&s, "POST", "/person", Some(alice())).await).await;
    let id = created["id"].as_i64().unwrap();

    let resp = send(&s, "GET", &format!("/person/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, created);
  }

  #[tokio::test]
  async fn get_unknown_id_returns_400_invalid_id() {
    let s = store().await;
    send(&s, "POST", "/person", Some(alice())).await;

    let resp = send(&s, "GET", "/person/99", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await, failure("Invalid ID", "400"));
  }

  // ── Versions ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn version_zero_is_creation_snapshot() {
    let s = store().await;
    let created = json_body(send(&s, "POST", "/person", Some(alice())).await).await;
    let id = created["id"].as_i64().unwrap();

    let resp = send(&s, "GET", &format!("/person/{id}/0"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let v0 = json_body(resp).await;
    assert_eq!(v0["version"], 0);
    assert_eq!(v0["change"], "create");
    assert_eq!(v0["first_name"], "Alice");
  }

  #[tokio::test]
  async fn version_out_of_range_returns_400_invalid_version() {
    let s = store().await;
    let created = json_body(send(&s, "POST", "/person", Some(alice())).await).await;
    let id = created["id"].as_i64().unwrap();

    // History length is 1: index 1 and negative indices are both out.
    for version in ["1", "-1"] {
      let resp = send(&s, "GET", &format!("/person/{id}/{version}"), None).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
      assert_eq!(json_body(resp).await, failure("Invalid Version", "400"));
    }
  }

  #[tokio::test]
  async fn version_of_unknown_id_returns_400_invalid_id() {
    let s = store().await;
    let resp = send(&s, "GET", "/person/42/0", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await, failure("Invalid ID", "400"));
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_replaces_all_fields_and_appends_version() {
    let s = store().await;
    let created = json_body(send(&s, "POST", "/person", Some(alice())).await).await;
    let id = created["id"].as_i64().unwrap();

    let replacement = json!({
      "first_name":  "Alicia",
      "middle_name": "P",
      "last_name":   "Liddell",
      "email":       "alicia@example.com",
      "age":         31,
    });
    let resp = send(&s, "PUT", &format!("/person/{id}"), Some(replacement)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated = json_body(resp).await;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["first_name"], "Alicia");

    let v1 = json_body(send(&s, "GET", &format!("/person/{id}/1"), None).await).await;
    assert_eq!(v1["change"], "update");
    assert_eq!(v1["email"], "alicia@example.com");
  }

  #[tokio::test]
  async fn update_unknown_id_returns_400() {
    let s = store().await;
    let resp = send(&s, "PUT", "/person/5", Some(alice())).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await, failure("Invalid ID", "400"));
  }

  #[tokio::test]
  async fn update_missing_field_returns_400_and_changes_nothing() {
    let s = store().await;
    let created = json_body(send(&s, "POST", "/person", Some(alice())).await).await;
    let id = created["id"].as_i64().unwrap();

    let mut payload = alice();
    payload.as_object_mut().unwrap().remove("email");
    let resp = send(&s, "PUT", &format!("/person/{id}"), Some(payload)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await, failure("Email cannot be empty", "400"));

    let current = json_body(send(&s, "GET", &format!("/person/{id}"), None).await).await;
    assert_eq!(current, created);
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_returns_last_state_and_history_survives() {
    let s = store().await;
    let created = json_body(send(&s, "POST", "/person", Some(alice())).await).await;
    let id = created["id"].as_i64().unwrap();

    let resp = send(&s, "DELETE", &format!("/person/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, created);

    // The live row is gone ...
    let resp = send(&s, "GET", &format!("/person/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // ... but the terminal snapshot is still addressable.
    let resp = send(&s, "GET", &format!("/person/{id}/1"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let v1 = json_body(resp).await;
    assert_eq!(v1["change"], "delete");
    assert_eq!(v1["first_name"], "Alice");
  }

  #[tokio::test]
  async fn delete_unknown_id_returns_400() {
    let s = store().await;
    let resp = send(&s, "DELETE", "/person/3", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await, failure("Invalid ID", "400"));
  }

  // ── Opaque error boundary ───────────────────────────────────────────────────

  #[tokio::test]
  async fn malformed_create_body_returns_opaque_failure() {
    let s = store().await;
    let resp = send_raw(&s, "POST", "/person", "{not json").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text_body(resp).await, OPAQUE_FAILURE);
  }

  #[tokio::test]
  async fn malformed_update_body_returns_opaque_failure() {
    let s = store().await;
    let created = json_body(send(&s, "POST", "/person", Some(alice())).await).await;
    let id = created["id"].as_i64().unwrap();

    let resp = send_raw(&s, "PUT", &format!("/person/{id}"), "{not json").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text_body(resp).await, OPAQUE_FAILURE);

    // Nothing was appended to the history.
    let resp = send(&s, "GET", &format!("/person/{id}/1"), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn update_malformed_body_on_unknown_id_reports_the_id_first() {
    let s = store().await;
    let resp = send_raw(&s, "PUT", "/person/9", "{not json").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await, failure("Invalid ID", "400"));
  }

  #[tokio::test]
  async fn internal_error_response_is_opaque() {
    let resp = ApiError::Internal("database is on fire".into()).into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text_body(resp).await, OPAQUE_FAILURE);
  }

  async fn boom() -> &'static str {
    panic!("kaboom")
  }

  #[tokio::test]
  async fn handler_panic_is_caught_and_opaque() {
    let app = Router::new()
      .route("/boom", get(boom))
      .layer(CatchPanicLayer::custom(handle_panic));

    let req = Request::builder()
      .method("GET")
      .uri("/boom")
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text_body(resp).await, OPAQUE_FAILURE);
  }
}
