#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use lightbnb_db::{create_pool, run_migrations, DbPool, DbRuntimeSettings};
use lightbnb_server::{app, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// A router over a fresh migrated database. Keep the `TempDir` alive for
/// the duration of the test.
pub fn setup_app() -> (Router, DbPool, TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("server.db");
    let pool = create_pool(path.to_str().expect("utf-8 path"), DbRuntimeSettings::default())
        .expect("failed to create pool");
    {
        let conn = pool.get().expect("failed to get connection");
        run_migrations(&conn).expect("failed to run migrations");
    }

    let router = app(AppState { pool: pool.clone() });
    (router, pool, dir)
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("request should complete");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");
    send(router, request).await
}

pub async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request");
    send(router, request).await
}

/// Records a finished stay and a review for it, straight through SQL.
pub fn seed_review(pool: &DbPool, guest_id: i64, property_id: i64, rating: i64) {
    let conn = pool.get().expect("failed to get connection");
    conn.execute(
        "INSERT INTO reservations (start_date, end_date, property_id, guest_id)
         VALUES (date('now', '-20 days'), date('now', '-15 days'), ?1, ?2)",
        [property_id, guest_id],
    )
    .expect("failed to insert reservation");
    let reservation_id = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating)
         VALUES (?1, ?2, ?3, ?4)",
        [guest_id, property_id, reservation_id, rating],
    )
    .expect("failed to insert review");
}
