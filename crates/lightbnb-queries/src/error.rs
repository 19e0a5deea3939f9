//! Error type shared by every data access function.

use rusqlite::ffi::ErrorCode;
use thiserror::Error;

/// Errors returned by the query functions.
///
/// A missing row is not an error: lookups return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The input was rejected before any SQL was run.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The store refused the write because of a uniqueness or foreign key
    /// constraint.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Any other failure reported by the store.
    #[error("database error: {0}")]
    Database(#[source] rusqlite::Error),
}

impl From<rusqlite::Error> for QueryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                QueryError::Conflict(err.to_string())
            }
            other => QueryError::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn unique_violation_becomes_conflict() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        conn.execute_batch(
            "CREATE TABLE t (email TEXT UNIQUE);
             INSERT INTO t (email) VALUES ('a@example.com');",
        )
        .expect("seed should succeed");

        let err: QueryError = conn
            .execute("INSERT INTO t (email) VALUES ('a@example.com')", [])
            .expect_err("duplicate should fail")
            .into();

        match err {
            QueryError::Conflict(msg) => assert!(msg.contains("UNIQUE"), "got: {msg}"),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn syntax_error_stays_a_database_error() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        let err: QueryError = conn
            .execute("SELEC nonsense", [])
            .expect_err("bad SQL should fail")
            .into();
        assert!(matches!(err, QueryError::Database(_)), "got {err:?}");
        let source = std::error::Error::source(&err).expect("rusqlite cause should be kept");
        assert!(source.to_string().contains("syntax error"), "got: {source}");
    }
}
