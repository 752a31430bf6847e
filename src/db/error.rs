//! Typed failures for the repository layer. Keeping the taxonomy small and
//! explicit lets the menu handlers pattern-match on the cases that have a
//! dedicated recovery path (missing species offering a create-as-new flow,
//! for example) while everything else surfaces as a printable message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// A lookup by name or id matched nothing. Reported to the user and never
    /// fatal; several flows offer an alternate path on this case.
    #[error("{entity} '{name}' not found")]
    NotFound {
        entity: &'static str,
        name: String,
    },

    /// A UNIQUE constraint rejected an insert. The field name comes straight
    /// out of SQLite's error message so callers can tell username collisions
    /// from email collisions without extra queries.
    #[error("a record with this {field} already exists")]
    AlreadyExists { field: String },

    /// A value fell outside its enumerated set (role, conservation status).
    #[error("invalid {field} '{value}' (expected one of: {allowed})")]
    InvalidValue {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },

    /// A required text field arrived blank.
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },

    /// Credentials or role did not match any account. Deliberately carries no
    /// detail about which part failed.
    #[error("login failed: no matching account for those credentials")]
    AuthenticationFailed,

    /// Any other storage-level failure, surfaced with the underlying message.
    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}

impl DbError {
    pub(crate) fn not_found(entity: &'static str, name: impl Into<String>) -> Self {
        DbError::NotFound {
            entity,
            name: name.into(),
        }
    }
}

/// Translate a SQLite UNIQUE violation into [`DbError::AlreadyExists`],
/// passing every other error through untouched. SQLite phrases the message as
/// `UNIQUE constraint failed: table.column`, so the column name after the
/// final dot is the field we report.
pub(crate) fn map_unique_violation(err: rusqlite::Error) -> DbError {
    if let rusqlite::Error::SqliteFailure(code, Some(message)) = &err {
        if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            let field = message
                .rsplit('.')
                .next()
                .unwrap_or("value")
                .trim()
                .to_string();
            return DbError::AlreadyExists { field };
        }
    }
    DbError::Storage(err)
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_extracts_column_name() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE),
            Some("UNIQUE constraint failed: users.email".to_string()),
        );
        match map_unique_violation(err) {
            DbError::AlreadyExists { field } => assert_eq!(field, "email"),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
    }

    #[test]
    fn non_constraint_errors_pass_through() {
        let err = rusqlite::Error::QueryReturnedNoRows;
        assert!(matches!(map_unique_violation(err), DbError::Storage(_)));
    }
}
