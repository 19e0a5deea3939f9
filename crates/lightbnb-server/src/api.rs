//! API handlers for the LightBnB server.
//!
//! Every handler checks a connection out of the pool on the blocking thread
//! pool, runs one data access function, and maps the outcome to a status
//! code: absent rows are 404, rejected input 400, constraint violations 409,
//! an exhausted pool 503 and store failures 500.

use crate::password::hash_password;
use crate::AppState;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lightbnb_queries::{
    create_property, create_user, get_user_by_email, get_user_by_id, list_reservations_for_guest,
    search_properties, GuestReservation, NewProperty, NewUser, Property, PropertyListing,
    PropertySearch, QueryError, User, DEFAULT_LIMIT,
};
use rusqlite::Connection;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Validation(msg) => ApiError::BadRequest(msg),
            QueryError::Conflict(msg) => {
                tracing::debug!(error = %msg, "write rejected by constraint");
                ApiError::Conflict("conflicts with existing data".to_string())
            }
            QueryError::Database(e) => {
                tracing::error!(error = %e, "query failed");
                ApiError::InternalServerError("database error".to_string())
            }
        }
    }
}

/// Runs `op` against a pooled connection on the blocking thread pool.
async fn with_conn<T, F>(state: &AppState, operation: &'static str, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
{
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, operation, "failed to get db connection");
            ApiError::ServiceUnavailable("database unavailable".to_string())
        })?;
        op(&conn)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, operation, "task join error");
        ApiError::InternalServerError("task failed".to_string())
    })?
}

/// Query string for `GET /api/users`.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Query string carrying an optional row cap.
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u32>,
}

/// Request body for `POST /api/users`. The password arrives in plaintext.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Query string for `GET /api/properties`.
///
/// Kept flat rather than flattening [`PropertySearch`], since flattened
/// numeric fields do not decode from a query string.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub city: Option<String>,
    pub owner_id: Option<i64>,
    pub minimum_price_per_night: Option<f64>,
    pub maximum_price_per_night: Option<f64>,
    pub minimum_rating: Option<f64>,
    pub limit: Option<u32>,
}

impl SearchParams {
    fn into_search(self) -> (PropertySearch, u32) {
        let search = PropertySearch {
            city: self.city,
            owner_id: self.owner_id,
            minimum_price_per_night: self.minimum_price_per_night,
            maximum_price_per_night: self.maximum_price_per_night,
            minimum_rating: self.minimum_rating,
        };
        (search, self.limit.unwrap_or(DEFAULT_LIMIT))
    }
}

/// Handler for `GET /api/users?email=...`.
pub async fn get_user_by_email_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<User>, ApiError> {
    let user = with_conn(&state, "get_user_by_email", move |conn| {
        Ok(get_user_by_email(conn, &query.email)?)
    })
    .await?;

    user.map(Json)
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))
}

/// Handler for `GET /api/users/{id}`.
pub async fn get_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let user = with_conn(&state, "get_user_by_id", move |conn| {
        Ok(get_user_by_id(conn, id)?)
    })
    .await?;

    user.map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))
}

/// Handler for `POST /api/users`.
pub async fn create_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if payload.password.is_empty() {
        return Err(ApiError::BadRequest("password is required".to_string()));
    }

    let user = with_conn(&state, "create_user", move |conn| {
        let hashed = hash_password(&payload.password).map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            ApiError::InternalServerError("failed to hash password".to_string())
        })?;
        let new_user = NewUser {
            name: payload.name,
            email: payload.email,
            password: hashed,
        };
        Ok(create_user(conn, &new_user)?)
    })
    .await?;

    tracing::info!(user_id = user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for `GET /api/users/{id}/reservations`.
pub async fn list_reservations_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(guest_id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<GuestReservation>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let reservations = with_conn(&state, "list_reservations_for_guest", move |conn| {
        Ok(list_reservations_for_guest(conn, guest_id, limit)?)
    })
    .await?;

    Ok(Json(reservations))
}

/// Handler for `GET /api/properties`.
pub async fn search_properties_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PropertyListing>>, ApiError> {
    let (search, limit) = params.into_search();
    let listings = with_conn(&state, "search_properties", move |conn| {
        Ok(search_properties(conn, &search, limit)?)
    })
    .await?;

    Ok(Json(listings))
}

/// Handler for `POST /api/properties`.
pub async fn create_property_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<NewProperty>,
) -> Result<(StatusCode, Json<Property>), ApiError> {
    let property = with_conn(&state, "create_property", move |conn| {
        Ok(create_property(conn, &payload)?)
    })
    .await?;

    tracing::info!(
        property_id = property.id,
        owner_id = property.owner_id,
        "property listed"
    );
    Ok((StatusCode::CREATED, Json(property)))
}
