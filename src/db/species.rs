use log::{debug, info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

use crate::db::error::{map_unique_violation, DbError, DbResult};
use crate::models::{ConservationStatus, Species};

/// Raw inputs for a new catalog entry, collected by the prompt flow before
/// validation. Everything arrives as trimmed text; this layer decides what is
/// acceptable so the same rules hold for every caller.
#[derive(Debug, Clone, Default)]
pub struct NewSpecies {
    pub name: String,
    pub scientific_name: String,
    pub origin: String,
    pub habitat: String,
    pub diet: String,
    /// Validated against [`ConservationStatus`] on insert.
    pub conservation_status: String,
    pub description: String,
}

/// Partial edit for an existing species. `None` or blank means "keep the
/// stored value". The conservation status stays raw text here because an
/// invalid spelling must not block the other fields from applying.
#[derive(Debug, Clone, Default)]
pub struct SpeciesUpdate {
    pub scientific_name: Option<String>,
    pub origin: Option<String>,
    pub habitat: Option<String>,
    pub diet: Option<String>,
    pub conservation_status: Option<String>,
    pub description: Option<String>,
}

/// What an update actually did. `fields_applied == 0` means the row was left
/// untouched; `rejected_status` carries a conservation status spelling that
/// failed validation while the rest of the edit went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub fields_applied: usize,
    pub rejected_status: Option<String>,
}

/// Insert a new species row, returning the hydrated struct so the caller can
/// display it without re-querying. All seven text fields are required, the
/// conservation status must parse, and both names must be unused (compared
/// case-insensitively by the schema's NOCASE collation).
pub fn create_species(conn: &Connection, new: &NewSpecies) -> DbResult<Species> {
    require_non_empty("name", &new.name)?;
    require_non_empty("scientific_name", &new.scientific_name)?;
    require_non_empty("origin", &new.origin)?;
    require_non_empty("habitat", &new.habitat)?;
    require_non_empty("diet", &new.diet)?;
    require_non_empty("conservation_status", &new.conservation_status)?;
    require_non_empty("description", &new.description)?;

    let status = parse_status(&new.conservation_status)?;

    conn.execute(
        "INSERT INTO species_details
            (name, scientific_name, origin, habitat, diet, conservation_status, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            new.name,
            new.scientific_name,
            new.origin,
            new.habitat,
            new.diet,
            status.as_str(),
            new.description,
        ],
    )
    .map_err(map_unique_violation)?;

    let id = conn.last_insert_rowid();
    info!("added species '{}' (id {id})", new.name);

    Ok(Species {
        id,
        name: new.name.clone(),
        scientific_name: new.scientific_name.clone(),
        origin: new.origin.clone(),
        habitat: new.habitat.clone(),
        diet: new.diet.clone(),
        conservation_status: status,
        description: new.description.clone(),
    })
}

/// Case-insensitive exact-match lookup by common name.
pub fn find_species_by_name(conn: &Connection, name: &str) -> DbResult<Species> {
    let result = conn.query_row(
        "SELECT id, name, scientific_name, origin, habitat, diet, conservation_status, description
         FROM species_details
         WHERE name = ?1",
        [name],
        row_to_species,
    );

    match result {
        Ok(species) => Ok(species),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(DbError::not_found("species", name)),
        Err(err) => Err(err.into()),
    }
}

/// Apply a partial edit to the species matching `name`.
///
/// Only the supplied non-blank fields change; the SET clause is assembled from
/// a fixed set of column names with every value bound as a parameter. A
/// supplied conservation status that does not parse is dropped from the edit
/// and echoed back through [`UpdateOutcome::rejected_status`] while the valid
/// fields still apply.
pub fn update_species(
    conn: &Connection,
    name: &str,
    update: &SpeciesUpdate,
) -> DbResult<UpdateOutcome> {
    let species = find_species_by_name(conn, name)?;

    let mut assignments: Vec<&'static str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();
    let mut rejected_status = None;

    fn push(
        column: &'static str,
        value: &Option<String>,
        assignments: &mut Vec<&'static str>,
        values: &mut Vec<Value>,
    ) {
        if let Some(text) = value {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                assignments.push(column);
                values.push(Value::Text(trimmed.to_string()));
            }
        }
    }

    push("scientific_name", &update.scientific_name, &mut assignments, &mut values);
    push("origin", &update.origin, &mut assignments, &mut values);
    push("habitat", &update.habitat, &mut assignments, &mut values);
    push("diet", &update.diet, &mut assignments, &mut values);

    if let Some(raw) = &update.conservation_status {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            match ConservationStatus::parse(trimmed) {
                Some(status) => {
                    assignments.push("conservation_status");
                    values.push(Value::Text(status.as_str().to_string()));
                }
                None => {
                    warn!("ignoring invalid conservation status '{trimmed}' during update");
                    rejected_status = Some(trimmed.to_string());
                }
            }
        }
    }

    push("description", &update.description, &mut assignments, &mut values);

    if assignments.is_empty() {
        return Ok(UpdateOutcome {
            fields_applied: 0,
            rejected_status,
        });
    }

    let set_clause = assignments
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ?{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE species_details SET {set_clause} WHERE id = ?{}",
        assignments.len() + 1
    );
    values.push(Value::Integer(species.id));

    conn.execute(&sql, params_from_iter(values))
        .map_err(map_unique_violation)?;

    info!(
        "updated {} field(s) for species '{}'",
        assignments.len(),
        species.name
    );
    Ok(UpdateOutcome {
        fields_applied: assignments.len(),
        rejected_status,
    })
}

/// Remove a species by name. The foreign key on `sightings` cascades, so the
/// species' observation log disappears with it.
pub fn delete_species(conn: &Connection, name: &str) -> DbResult<()> {
    let species = find_species_by_name(conn, name)?;

    conn.execute(
        "DELETE FROM species_details WHERE id = ?1",
        params![species.id],
    )?;

    info!("deleted species '{}' and its sightings", species.name);
    Ok(())
}

/// Every catalog entry in insertion order.
pub fn list_species(conn: &Connection) -> DbResult<Vec<Species>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, scientific_name, origin, habitat, diet, conservation_status, description
         FROM species_details
         ORDER BY id",
    )?;

    let species = stmt
        .query_map([], row_to_species)?
        .collect::<Result<Vec<_>, _>>()?;

    debug!("listed {} species", species.len());
    Ok(species)
}

/// Just the common names, in insertion order. Backs the lightweight "what do
/// we have" view without dragging full rows around.
pub fn list_species_names(conn: &Connection) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM species_details ORDER BY id")?;

    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(names)
}

/// Hydrate a [`Species`] from a full `species_details` row. The CHECK
/// constraint guards the stored status spelling, so a parse failure means the
/// file was edited externally and is reported as a conversion error.
fn row_to_species(row: &Row<'_>) -> rusqlite::Result<Species> {
    let status_raw: String = row.get(6)?;
    let conservation_status = ConservationStatus::parse(&status_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            format!("unknown conservation status '{status_raw}'").into(),
        )
    })?;

    Ok(Species {
        id: row.get(0)?,
        name: row.get(1)?,
        scientific_name: row.get(2)?,
        origin: row.get(3)?,
        habitat: row.get(4)?,
        diet: row.get(5)?,
        conservation_status,
        description: row.get(7)?,
    })
}

fn parse_status(raw: &str) -> DbResult<ConservationStatus> {
    ConservationStatus::parse(raw).ok_or_else(|| DbError::InvalidValue {
        field: "conservation_status",
        value: raw.trim().to_string(),
        allowed: ConservationStatus::ALLOWED,
    })
}

fn require_non_empty(field: &'static str, value: &str) -> DbResult<()> {
    if value.trim().is_empty() {
        Err(DbError::MissingField { field })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::apply_schema;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn
    }

    fn sparrow() -> NewSpecies {
        NewSpecies {
            name: "Sparrow".to_string(),
            scientific_name: "Passer domesticus".to_string(),
            origin: "Eurasia".to_string(),
            habitat: "Urban".to_string(),
            diet: "Seeds".to_string(),
            conservation_status: "not_extinct".to_string(),
            description: "small bird".to_string(),
        }
    }

    #[test]
    fn insert_then_lookup_ignores_case() {
        let conn = test_conn();
        let created = create_species(&conn, &sparrow()).unwrap();

        let found = find_species_by_name(&conn, "sPaRrOw").unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "Sparrow");
        assert_eq!(found.conservation_status, ConservationStatus::NotExtinct);
    }

    #[test]
    fn lookup_miss_is_not_found() {
        let conn = test_conn();
        let missing = find_species_by_name(&conn, "Dodo");
        assert!(matches!(
            missing,
            Err(DbError::NotFound { entity: "species", .. })
        ));
    }

    #[test]
    fn duplicate_names_reject_regardless_of_case() {
        let conn = test_conn();
        create_species(&conn, &sparrow()).unwrap();

        let mut lowercase = sparrow();
        lowercase.name = "sparrow".to_string();
        lowercase.scientific_name = "Passer other".to_string();
        match create_species(&conn, &lowercase) {
            Err(DbError::AlreadyExists { field }) => assert_eq!(field, "name"),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }

        let mut same_scientific = sparrow();
        same_scientific.name = "House Sparrow".to_string();
        same_scientific.scientific_name = "passer DOMESTICUS".to_string();
        match create_species(&conn, &same_scientific) {
            Err(DbError::AlreadyExists { field }) => assert_eq!(field, "scientific_name"),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
    }

    #[test]
    fn blank_fields_and_bad_status_reject() {
        let conn = test_conn();

        let mut blank = sparrow();
        blank.habitat = "  ".to_string();
        assert!(matches!(
            create_species(&conn, &blank),
            Err(DbError::MissingField { field: "habitat" })
        ));

        let mut bad_status = sparrow();
        bad_status.conservation_status = "thriving".to_string();
        assert!(matches!(
            create_species(&conn, &bad_status),
            Err(DbError::InvalidValue { field: "conservation_status", .. })
        ));
    }

    #[test]
    fn partial_update_keeps_unsupplied_fields() {
        let conn = test_conn();
        create_species(&conn, &sparrow()).unwrap();

        let update = SpeciesUpdate {
            diet: Some("Seeds and insects".to_string()),
            habitat: Some("".to_string()),
            ..SpeciesUpdate::default()
        };
        let outcome = update_species(&conn, "sparrow", &update).unwrap();
        assert_eq!(outcome.fields_applied, 1);
        assert_eq!(outcome.rejected_status, None);

        let after = find_species_by_name(&conn, "Sparrow").unwrap();
        assert_eq!(after.diet, "Seeds and insects");
        assert_eq!(after.habitat, "Urban");
        assert_eq!(after.origin, "Eurasia");
    }

    #[test]
    fn update_with_no_effective_fields_is_a_no_op() {
        let conn = test_conn();
        create_species(&conn, &sparrow()).unwrap();

        let outcome = update_species(&conn, "Sparrow", &SpeciesUpdate::default()).unwrap();
        assert_eq!(outcome.fields_applied, 0);

        let blanks = SpeciesUpdate {
            diet: Some("   ".to_string()),
            origin: Some(String::new()),
            ..SpeciesUpdate::default()
        };
        let outcome = update_species(&conn, "Sparrow", &blanks).unwrap();
        assert_eq!(outcome.fields_applied, 0);
    }

    #[test]
    fn invalid_status_is_reported_but_does_not_block_other_fields() {
        let conn = test_conn();
        create_species(&conn, &sparrow()).unwrap();

        let update = SpeciesUpdate {
            conservation_status: Some("flourishing".to_string()),
            description: Some("adaptable urban bird".to_string()),
            ..SpeciesUpdate::default()
        };
        let outcome = update_species(&conn, "Sparrow", &update).unwrap();
        assert_eq!(outcome.fields_applied, 1);
        assert_eq!(outcome.rejected_status.as_deref(), Some("flourishing"));

        let after = find_species_by_name(&conn, "Sparrow").unwrap();
        assert_eq!(after.description, "adaptable urban bird");
        assert_eq!(after.conservation_status, ConservationStatus::NotExtinct);
    }

    #[test]
    fn update_of_missing_species_is_not_found() {
        let conn = test_conn();
        let outcome = update_species(&conn, "Dodo", &SpeciesUpdate::default());
        assert!(matches!(outcome, Err(DbError::NotFound { .. })));
    }

    #[test]
    fn delete_then_lookup_misses() {
        let conn = test_conn();
        create_species(&conn, &sparrow()).unwrap();

        delete_species(&conn, "SPARROW").unwrap();
        assert!(matches!(
            find_species_by_name(&conn, "Sparrow"),
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            delete_species(&conn, "Sparrow"),
            Err(DbError::NotFound { .. })
        ));
    }

    #[test]
    fn listings_preserve_insertion_order() {
        let conn = test_conn();
        create_species(&conn, &sparrow()).unwrap();

        let mut owl = sparrow();
        owl.name = "Barn Owl".to_string();
        owl.scientific_name = "Tyto alba".to_string();
        create_species(&conn, &owl).unwrap();

        let names = list_species_names(&conn).unwrap();
        assert_eq!(names, vec!["Sparrow", "Barn Owl"]);

        let all = list_species(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Sparrow");
        assert_eq!(all[1].name, "Barn Owl");
    }
}
