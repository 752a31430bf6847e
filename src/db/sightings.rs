use log::{debug, info};
use rusqlite::{params, Connection, Row};

use crate::db::error::{DbError, DbResult};
use crate::db::species::find_species_by_name;
use crate::models::Sighting;

/// Separator used when a new date or observer is appended onto a stored one.
const FIELD_SEPARATOR: &str = " | ";
/// Separator block used between appended notes, keeping each entry readable
/// on its own lines.
const NOTES_SEPARATOR: &str = "\n---\n";

/// Optional additions for an existing sighting. Sighting edits never replace
/// stored values; each supplied entry is concatenated onto what is already
/// there so the row keeps its full history.
#[derive(Debug, Clone, Default)]
pub struct SightingAppend {
    pub date: Option<String>,
    pub observer: Option<String>,
    pub note: Option<String>,
}

/// Record a new sighting against a species resolved by name. Blank observer
/// or notes input is stored as NULL rather than an empty string so the
/// "never filled in" and "filled in with nothing" cases stay distinguishable.
pub fn create_sighting(
    conn: &Connection,
    species_name: &str,
    date: &str,
    location: &str,
    observer: &str,
    notes: &str,
) -> DbResult<Sighting> {
    let species = find_species_by_name(conn, species_name)?;

    require_non_empty("date", date)?;
    require_non_empty("location", location)?;

    conn.execute(
        "INSERT INTO sightings (species_id, date, location, observer, notes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            species.id,
            date,
            location,
            blank_to_null(observer),
            blank_to_null(notes),
        ],
    )?;

    let id = conn.last_insert_rowid();
    info!("recorded sighting {id} of '{}'", species.name);

    Ok(Sighting {
        id,
        species_id: species.id,
        date: date.to_string(),
        location: location.to_string(),
        observer: blank_to_null(observer).map(str::to_string),
        notes: blank_to_null(notes).map(str::to_string),
    })
}

/// All sightings for the species matching `species_name` (case-insensitive),
/// newest date first. An unknown species or a species with no sightings both
/// yield an empty vector; "nothing logged yet" is not an error here.
pub fn find_sightings_by_species(conn: &Connection, species_name: &str) -> DbResult<Vec<Sighting>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.species_id, s.date, s.location, s.observer, s.notes
         FROM sightings s
         INNER JOIN species_details d ON s.species_id = d.id
         WHERE d.name = ?1
         ORDER BY s.date DESC",
    )?;

    let sightings = stmt
        .query_map([species_name], row_to_sighting)?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "found {} sighting(s) for '{species_name}'",
        sightings.len()
    );
    Ok(sightings)
}

/// Append new material onto an existing sighting.
///
/// The sighting is addressed by `(id, species)` so an id belonging to some
/// other species' log cannot be edited by accident. Each supplied non-blank
/// value is concatenated onto the stored one (`" | "` for date and observer,
/// a `---` line for notes); a stored NULL simply takes the new value. The
/// previous content is always preserved as a prefix.
pub fn append_to_sighting(
    conn: &Connection,
    species_name: &str,
    sighting_id: i64,
    append: &SightingAppend,
) -> DbResult<Sighting> {
    let species = find_species_by_name(conn, species_name)?;

    let result = conn.query_row(
        "SELECT id, species_id, date, location, observer, notes
         FROM sightings
         WHERE id = ?1 AND species_id = ?2",
        params![sighting_id, species.id],
        row_to_sighting,
    );
    let current = match result {
        Ok(sighting) => sighting,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            return Err(DbError::not_found("sighting", sighting_id.to_string()))
        }
        Err(err) => return Err(err.into()),
    };

    let date = match supplied(&append.date) {
        Some(new_date) => format!("{}{FIELD_SEPARATOR}{new_date}", current.date),
        None => current.date.clone(),
    };
    let observer = merge_optional(&current.observer, supplied(&append.observer), FIELD_SEPARATOR);
    let notes = merge_optional(&current.notes, supplied(&append.note), NOTES_SEPARATOR);

    conn.execute(
        "UPDATE sightings SET date = ?1, observer = ?2, notes = ?3 WHERE id = ?4",
        params![date, observer, notes, current.id],
    )?;

    info!("appended to sighting {} of '{}'", current.id, species.name);

    Ok(Sighting {
        date,
        observer,
        notes,
        ..current
    })
}

/// Every sighting across all species, in insertion order.
pub fn list_all_sightings(conn: &Connection) -> DbResult<Vec<Sighting>> {
    let mut stmt = conn.prepare(
        "SELECT id, species_id, date, location, observer, notes
         FROM sightings
         ORDER BY id",
    )?;

    let sightings = stmt
        .query_map([], row_to_sighting)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(sightings)
}

/// Concatenate a new entry onto an optional stored value. A missing stored
/// value takes the new entry as-is; a missing new entry keeps the stored one.
fn merge_optional(
    current: &Option<String>,
    new_value: Option<&str>,
    separator: &str,
) -> Option<String> {
    match (current, new_value) {
        (Some(existing), Some(added)) => Some(format!("{existing}{separator}{added}")),
        (None, Some(added)) => Some(added.to_string()),
        (Some(existing), None) => Some(existing.clone()),
        (None, None) => None,
    }
}

fn row_to_sighting(row: &Row<'_>) -> rusqlite::Result<Sighting> {
    Ok(Sighting {
        id: row.get(0)?,
        species_id: row.get(1)?,
        date: row.get(2)?,
        location: row.get(3)?,
        observer: row.get(4)?,
        notes: row.get(5)?,
    })
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn blank_to_null(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn require_non_empty(field: &'static str, value: &str) -> DbResult<()> {
    if value.trim().is_empty() {
        Err(DbError::MissingField { field })
    } else {
        Ok(())
    }
}
