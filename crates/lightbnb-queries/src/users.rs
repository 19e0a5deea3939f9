//! User lookup and creation.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Whatever the caller stored, normally a password hash. Never
    /// serialized.
    #[serde(skip_serializing)]
    pub password: String,
}

/// Fields for inserting a user.
///
/// The password is stored exactly as given; hashing is the caller's job.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Finds the user with exactly this email address.
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, QueryError> {
    let user = conn
        .query_row(
            "SELECT id, name, email, password FROM users WHERE email = ?1",
            [email],
            map_row_to_user,
        )
        .optional()?;
    tracing::debug!(found = user.is_some(), "user lookup by email");
    Ok(user)
}

/// Finds the user with this id.
pub fn get_user_by_id(conn: &Connection, id: i64) -> Result<Option<User>, QueryError> {
    let user = conn
        .query_row(
            "SELECT id, name, email, password FROM users WHERE id = ?1",
            [id],
            map_row_to_user,
        )
        .optional()?;
    tracing::debug!(user_id = id, found = user.is_some(), "user lookup by id");
    Ok(user)
}

/// Inserts a user and returns the stored row, including its new id.
///
/// # Errors
///
/// `Validation` if the name or email is blank, `Conflict` if the email is
/// already taken.
pub fn create_user(conn: &Connection, user: &NewUser) -> Result<User, QueryError> {
    if user.name.trim().is_empty() {
        return Err(QueryError::Validation("name is required".to_string()));
    }
    if user.email.trim().is_empty() {
        return Err(QueryError::Validation("email is required".to_string()));
    }

    let created = conn.query_row(
        "INSERT INTO users (name, email, password) VALUES (?1, ?2, ?3)
         RETURNING id, name, email, password",
        params![user.name, user.email, user.password],
        map_row_to_user,
    )?;

    tracing::debug!(user_id = created.id, "created user");
    Ok(created)
}

fn map_row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
    })
}
