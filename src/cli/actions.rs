//! One handler per menu action. Handlers prompt for their inputs, call the
//! repository, and print the outcome. Expected misses (a name that matches
//! nothing, an empty listing) are printed and swallowed here; anything else
//! bubbles up for the menu loop to report.

use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;

use crate::access::MenuAction;
use crate::db::{
    append_to_sighting, create_sighting, create_species, delete_species, find_sightings_by_species,
    find_species_by_name, list_all_sightings, list_species, list_species_names, update_species,
    DbError, NewSpecies, SightingAppend, SpeciesUpdate,
};
use crate::models::{ConservationStatus, Sighting, Species};
use crate::report::{export_all_species, export_species, render_numbered_list, render_table};

use super::prompts::{confirm, parse_selection, prompt};

/// Column headers for full species rows, shared by the detail views.
const SPECIES_HEADERS: [&str; 8] = [
    "Id",
    "Name",
    "Scientific Name",
    "Origin",
    "Habitat",
    "Diet",
    "Conservation Status",
    "Description",
];

/// Column headers for per-species sighting listings.
const SIGHTING_HEADERS: [&str; 5] = ["Sighting Id", "Date", "Location", "Observer", "Notes"];

/// Exports land in the directory the tool was launched from.
const EXPORT_DIR: &str = ".";

/// Dispatch a resolved menu action to its handler.
pub(crate) fn perform(conn: &Connection, action: MenuAction) -> Result<()> {
    match action {
        MenuAction::ListSpeciesNames => show_species_names(conn),
        MenuAction::ListSpeciesDetails => show_all_species(conn),
        MenuAction::ViewSpecies => show_one_species(conn),
        MenuAction::ViewSightingsForSpecies => show_sightings_for_species(conn),
        MenuAction::ViewAllSightings => show_all_sightings(conn),
        MenuAction::AddSpecies => add_species(conn),
        MenuAction::AddSighting => add_sighting(conn),
        MenuAction::UpdateSpecies => update_species_flow(conn),
        MenuAction::AppendToSighting => append_sighting_flow(conn),
        MenuAction::DeleteSpecies => delete_species_flow(conn),
        MenuAction::ExportCsv => export_flow(conn),
    }
}

fn show_species_names(conn: &Connection) -> Result<()> {
    let names = list_species_names(conn)?;
    if names.is_empty() {
        println!("No species names found.");
    } else {
        println!("\nNames of all species saved in the database:");
        print!("{}", render_numbered_list("Species Name", &names));
    }
    Ok(())
}

fn show_all_species(conn: &Connection) -> Result<()> {
    let species = list_species(conn)?;
    if species.is_empty() {
        println!("No species records found in the database.");
    } else {
        println!("\nAll species records:");
        let rows: Vec<Vec<String>> = species.iter().map(species_row).collect();
        print!("{}", render_table(&SPECIES_HEADERS, &rows));
    }
    Ok(())
}

fn show_one_species(conn: &Connection) -> Result<()> {
    let name = prompt("Enter the name of the species to view: ")?;
    match find_species_by_name(conn, &name) {
        Ok(species) => {
            println!("\nDetails for species '{}':", species.name);
            print!(
                "{}",
                render_table(&SPECIES_HEADERS, &[species_row(&species)])
            );
        }
        Err(DbError::NotFound { .. }) => {
            println!("No species named '{name}' found in the database.");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn show_sightings_for_species(conn: &Connection) -> Result<()> {
    let name = prompt("Enter the species name to view its sightings: ")?;
    let sightings = find_sightings_by_species(conn, &name)?;
    if sightings.is_empty() {
        println!("No sightings found for species '{name}'.");
    } else {
        println!("\nSightings for '{name}':");
        let rows: Vec<Vec<String>> = sightings.iter().map(sighting_row).collect();
        print!("{}", render_table(&SIGHTING_HEADERS, &rows));
    }
    Ok(())
}

fn show_all_sightings(conn: &Connection) -> Result<()> {
    let sightings = list_all_sightings(conn)?;
    if sightings.is_empty() {
        println!("No sightings recorded in the database.");
    } else {
        println!("\nRecords of all sightings:");
        let headers = [
            "Sighting Id",
            "Species Id",
            "Date",
            "Location",
            "Observer",
            "Notes",
        ];
        let rows: Vec<Vec<String>> = sightings
            .iter()
            .map(|s| {
                let mut row = vec![s.id.to_string(), s.species_id.to_string()];
                row.extend(sighting_row(s).into_iter().skip(1));
                row
            })
            .collect();
        print!("{}", render_table(&headers, &rows));
    }
    Ok(())
}

fn add_species(conn: &Connection) -> Result<()> {
    let name = prompt("Enter species name: ")?;
    add_species_named(conn, name)
}

/// Shared by the add flow and the create-as-new path inside the update flow,
/// where the name has already been typed once.
fn add_species_named(conn: &Connection, name: String) -> Result<()> {
    let new = NewSpecies {
        name,
        scientific_name: prompt("Enter scientific name: ")?,
        origin: prompt("Enter origin: ")?,
        habitat: prompt("Enter habitat: ")?,
        diet: prompt("Enter diet: ")?,
        conservation_status: prompt(&format!(
            "Enter conservation status ({}): ",
            ConservationStatus::ALLOWED
        ))?,
        description: prompt("Enter description: ")?,
    };

    match create_species(conn, &new) {
        Ok(species) => println!("Species '{}' added successfully.", species.name),
        Err(err @ (DbError::AlreadyExists { .. }
        | DbError::InvalidValue { .. }
        | DbError::MissingField { .. })) => println!("Error: {err}"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn add_sighting(conn: &Connection) -> Result<()> {
    let species_name = prompt("Enter species name: ")?;
    match find_species_by_name(conn, &species_name) {
        Ok(_) => {}
        Err(DbError::NotFound { .. }) => {
            println!("Species '{species_name}' does not exist in the catalog. Cannot add a sighting.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    let date = prompt("Enter sighting date (YYYY-MM-DD): ")?;
    let location = prompt("Enter location: ")?;
    let observer = prompt("Enter observer name (optional): ")?;
    let notes = prompt("Additional notes (optional): ")?;

    match create_sighting(conn, &species_name, &date, &location, &observer, &notes) {
        Ok(_) => println!("Sighting of '{species_name}' added successfully."),
        Err(err @ (DbError::NotFound { .. } | DbError::MissingField { .. })) => {
            println!("Failed to add sighting: {err}");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn update_species_flow(conn: &Connection) -> Result<()> {
    let name = prompt("Enter the name of the species to edit: ")?;
    let species = match find_species_by_name(conn, &name) {
        Ok(species) => species,
        Err(DbError::NotFound { .. }) => {
            let add_instead = confirm(&format!(
                "Species '{name}' not found. Do you want to add it as a new species? (T/F): "
            ))?;
            if add_instead {
                return add_species_named(conn, name);
            }
            println!("Update cancelled.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("\nEditing details for species:");
    print!(
        "{}",
        render_table(&SPECIES_HEADERS, &[species_row(&species)])
    );
    println!("Leave blank to keep the current value.\n");

    let update = SpeciesUpdate {
        scientific_name: Some(prompt("New scientific name: ")?),
        origin: Some(prompt("New origin: ")?),
        habitat: Some(prompt("New habitat: ")?),
        diet: Some(prompt("New diet: ")?),
        conservation_status: Some(prompt(&format!(
            "New conservation status ({}): ",
            ConservationStatus::ALLOWED
        ))?),
        description: Some(prompt("New description: ")?),
    };

    let outcome = update_species(conn, &name, &update)?;
    if let Some(rejected) = &outcome.rejected_status {
        println!(
            "Conservation status '{rejected}' was ignored (expected one of: {}).",
            ConservationStatus::ALLOWED
        );
    }
    if outcome.fields_applied == 0 {
        println!("No fields to update.");
    } else {
        println!("Species '{}' details updated successfully.", species.name);
    }
    Ok(())
}

fn append_sighting_flow(conn: &Connection) -> Result<()> {
    let species_name = prompt("Enter the species name to update a sighting for: ")?;
    match find_species_by_name(conn, &species_name) {
        Ok(_) => {}
        Err(DbError::NotFound { .. }) => {
            println!("Species '{species_name}' not found in the database.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    let sightings = find_sightings_by_species(conn, &species_name)?;
    if sightings.is_empty() {
        println!("No sightings found for species '{species_name}'.");
        return Ok(());
    }

    println!("\nSightings for '{species_name}':");
    let rows: Vec<Vec<String>> = sightings.iter().map(sighting_row).collect();
    print!("{}", render_table(&SIGHTING_HEADERS, &rows));

    let id_input = prompt("Enter the sighting id to update: ")?;
    let sighting_id = match id_input.parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            println!("Invalid id given.");
            return Ok(());
        }
    };

    let Some(current) = sightings.iter().find(|s| s.id == sighting_id) else {
        println!("Sighting {sighting_id} does not belong to '{species_name}'.");
        return Ok(());
    };

    println!("\nCurrent date: {}", current.date);
    println!(
        "Current observer: {}",
        current.observer.as_deref().unwrap_or("-")
    );
    println!("Current notes:\n{}", current.notes.as_deref().unwrap_or("-"));

    let append = SightingAppend {
        date: Some(prompt(
            "Enter a new date to append (YYYY-MM-DD), or press Enter to skip: ",
        )?),
        observer: Some(prompt(
            "Enter a new observer name to append, or press Enter to skip: ",
        )?),
        note: Some(prompt("Enter a new note to append, or press Enter to skip: ")?),
    };

    append_to_sighting(conn, &species_name, sighting_id, &append)?;
    println!("\nSighting updated successfully.");
    Ok(())
}

fn delete_species_flow(conn: &Connection) -> Result<()> {
    let name = prompt("Enter the name of the species to be removed: ")?;
    let species = match find_species_by_name(conn, &name) {
        Ok(species) => species,
        Err(DbError::NotFound { .. }) => {
            println!("Species '{name}' does not exist in the database.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("Found {} in the database.", species.display_label());
    let go_ahead = confirm(&format!(
        "Are you sure you want to delete '{}'? This removes its sightings as well. (T/F): ",
        species.name
    ))?;
    if go_ahead {
        delete_species(conn, &name)?;
        println!("Species '{}' deleted successfully.", species.name);
    } else {
        println!("Deletion cancelled.");
    }
    Ok(())
}

fn export_flow(conn: &Connection) -> Result<()> {
    println!("\nExport species data to CSV");
    println!("1. Export a specific species by name");
    println!("2. Export all species");
    let choice = prompt("Enter your choice (1 or 2): ")?;

    match parse_selection(&choice) {
        Some(1) => {
            let name = prompt("Enter the species name to export: ")?;
            match find_species_by_name(conn, &name) {
                Ok(species) => {
                    let path = export_species(Path::new(EXPORT_DIR), &species)?;
                    println!("Species '{}' exported to '{}'.", species.name, path.display());
                }
                Err(DbError::NotFound { .. }) => {
                    println!("Species '{name}' not found in the database.");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Some(2) => {
            let species = list_species(conn)?;
            let path = export_all_species(Path::new(EXPORT_DIR), &species)?;
            println!(
                "{} species record(s) exported to '{}'.",
                species.len(),
                path.display()
            );
        }
        _ => println!("Invalid choice. Please enter 1 or 2."),
    }
    Ok(())
}

fn species_row(species: &Species) -> Vec<String> {
    vec![
        species.id.to_string(),
        species.name.clone(),
        species.scientific_name.clone(),
        species.origin.clone(),
        species.habitat.clone(),
        species.diet.clone(),
        species.conservation_status.to_string(),
        species.description.clone(),
    ]
}

fn sighting_row(sighting: &Sighting) -> Vec<String> {
    vec![
        sighting.id.to_string(),
        sighting.date.clone(),
        sighting.location.clone(),
        sighting.observer.clone().unwrap_or_else(|| "-".to_string()),
        sighting.notes.clone().unwrap_or_else(|| "-".to_string()),
    ]
}
