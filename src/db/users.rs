use log::info;
use rusqlite::{params, Connection, Row};

use crate::db::error::{map_unique_violation, DbError, DbResult};
use crate::models::{Role, User};

/// Register a new account. The username and email must be unused (the UNIQUE
/// indexes enforce this and the violation is translated into a friendly
/// error), the role must parse, and none of the text fields may be blank.
///
/// Passwords are stored as given. This tool runs as a single local session
/// against a file only the operating user can reach, and credential hardening
/// is out of scope.
pub fn create_user(
    conn: &Connection,
    username: &str,
    email: &str,
    password: &str,
    role_raw: &str,
) -> DbResult<User> {
    require_non_empty("username", username)?;
    require_non_empty("email", email)?;
    require_non_empty("password", password)?;

    let role = Role::parse(role_raw).ok_or_else(|| DbError::InvalidValue {
        field: "role",
        value: role_raw.trim().to_string(),
        allowed: "researcher / common_user / student",
    })?;

    conn.execute(
        "INSERT INTO users (username, email, password, role) VALUES (?1, ?2, ?3, ?4)",
        params![username, email, password, role.as_str()],
    )
    .map_err(map_unique_violation)?;

    let id = conn.last_insert_rowid();
    let user = conn.query_row(
        "SELECT id, username, email, password, role, created_at FROM users WHERE id = ?1",
        [id],
        row_to_user,
    )?;

    info!("registered user '{}' as {}", user.username, user.role);
    Ok(user)
}

/// Look up an account whose username OR email matches `identifier`, with a
/// matching password and role. Returns [`DbError::AuthenticationFailed`] on
/// any miss without saying which of the three checks broke.
pub fn authenticate(
    conn: &Connection,
    identifier: &str,
    password: &str,
    role: Role,
) -> DbResult<User> {
    let result = conn.query_row(
        "SELECT id, username, email, password, role, created_at
         FROM users
         WHERE (username = ?1 OR email = ?1) AND password = ?2 AND role = ?3",
        params![identifier, password, role.as_str()],
        row_to_user,
    );

    match result {
        Ok(user) => {
            info!("user '{}' logged in as {}", user.username, user.role);
            Ok(user)
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(DbError::AuthenticationFailed),
        Err(err) => Err(err.into()),
    }
}

/// Hydrate a [`User`] from a full `users` row. The stored role spelling is
/// guarded by a CHECK constraint, so a parse failure here means the database
/// was edited out from under us; we surface that as a conversion error rather
/// than panicking.
fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let role_raw: String = row.get(4)?;
    let role = Role::parse(&role_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown role '{role_raw}'").into(),
        )
    })?;

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        role,
        created_at: row.get(5)?,
    })
}

fn require_non_empty(field: &'static str, value: &str) -> DbResult<()> {
    if value.trim().is_empty() {
        Err(DbError::MissingField { field })
    } else {
        Ok(())
    }
}
