use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use log::info;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".avian-registry";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "avian.sqlite";

/// Ensure the database file exists, run lazy migrations, and return a live
/// connection. The function also toggles `PRAGMA foreign_keys = ON` so the
/// cascade from species to sightings behaves the same during tests and
/// production runs.
pub fn ensure_schema() -> Result<Connection> {
    let db_path = db_path()?;

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(&db_path).context("failed to open SQLite database")?;
    apply_schema(&conn)?;
    info!("database ready at {}", db_path.display());

    Ok(conn)
}

/// Create the three tables if they are missing. Split out from
/// [`ensure_schema`] so the test suites can run the exact same DDL against an
/// in-memory connection.
///
/// `name` and `scientific_name` carry `COLLATE NOCASE`, which makes both the
/// UNIQUE indexes and plain equality comparisons case-insensitive. Without it
/// the store would happily hold "Sparrow" and "sparrow" side by side while
/// lookups could only ever reach one of them.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            role TEXT NOT NULL CHECK(role IN ('researcher', 'common_user', 'student')),
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("failed to create users table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS species_details (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL COLLATE NOCASE UNIQUE,
            scientific_name TEXT NOT NULL COLLATE NOCASE UNIQUE,
            origin TEXT NOT NULL,
            habitat TEXT NOT NULL,
            diet TEXT NOT NULL,
            conservation_status TEXT NOT NULL
                CHECK(conservation_status IN ('extinct', 'not_extinct')),
            description TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create species_details table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS sightings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            species_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            location TEXT NOT NULL,
            observer TEXT,
            notes TEXT,
            FOREIGN KEY (species_id) REFERENCES species_details(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create sightings table")?;

    Ok(())
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_applies_twice_without_error() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        apply_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        for expected in ["sightings", "species_details", "users"] {
            assert!(tables.iter().any(|t| t == expected), "missing {expected}");
        }
    }
}
