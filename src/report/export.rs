use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;
use log::info;

use crate::models::Species;

/// Column order shared by the single-record and bulk exports.
const SPECIES_COLUMNS: [&str; 8] = [
    "id",
    "name",
    "scientific_name",
    "origin",
    "habitat",
    "diet",
    "conservation_status",
    "description",
];

/// File name used when the whole catalog is exported at once.
pub const ALL_SPECIES_FILE_NAME: &str = "all_species_details.csv";

/// Derive the export file name for a single species: lowercase, spaces
/// replaced by underscores, `_details.csv` suffix. Deterministic, so
/// re-exporting the same species overwrites the previous file.
pub fn species_file_name(name: &str) -> String {
    let normalized = name.trim().to_lowercase().replace(' ', "_");
    format!("{normalized}_details.csv")
}

/// Write one species record to `<normalized-name>_details.csv` inside `dir`.
/// Any existing file of that name is replaced without warning.
pub fn export_species(dir: &Path, species: &Species) -> Result<PathBuf> {
    let path = dir.join(species_file_name(&species.name));
    write_species_csv(&path, std::slice::from_ref(species))?;
    info!("exported species '{}' to {}", species.name, path.display());
    Ok(path)
}

/// Write the whole catalog to a single fixed-name file inside `dir`. An empty
/// catalog still produces the file with just the header row, so downstream
/// consumers always find the expected columns.
pub fn export_all_species(dir: &Path, species: &[Species]) -> Result<PathBuf> {
    let path = dir.join(ALL_SPECIES_FILE_NAME);
    write_species_csv(&path, species)?;
    info!(
        "exported {} species record(s) to {}",
        species.len(),
        path.display()
    );
    Ok(path)
}

fn write_species_csv(path: &Path, species: &[Species]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create export file {}", path.display()))?;
    let mut writer = Writer::from_writer(file);

    writer
        .write_record(SPECIES_COLUMNS)
        .context("failed to write CSV header")?;
    for record in species {
        writer
            .write_record([
                record.id.to_string(),
                record.name.clone(),
                record.scientific_name.clone(),
                record.origin.clone(),
                record.habitat.clone(),
                record.diet.clone(),
                record.conservation_status.to_string(),
                record.description.clone(),
            ])
            .context("failed to write CSV row")?;
    }

    writer.flush().context("failed to flush CSV writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConservationStatus;

    fn sparrow() -> Species {
        Species {
            id: 7,
            name: "House Sparrow".to_string(),
            scientific_name: "Passer domesticus".to_string(),
            origin: "Eurasia".to_string(),
            habitat: "Urban".to_string(),
            diet: "Seeds".to_string(),
            conservation_status: ConservationStatus::NotExtinct,
            description: "small, bold bird".to_string(),
        }
    }

    #[test]
    fn file_name_is_lowercased_and_underscored() {
        assert_eq!(species_file_name("House Sparrow"), "house_sparrow_details.csv");
        assert_eq!(species_file_name("  Owl "), "owl_details.csv");
    }

    #[test]
    fn single_export_writes_header_and_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_species(dir.path(), &sparrow()).unwrap();
        assert!(path.ends_with("house_sparrow_details.csv"));

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,name,scientific_name,origin,habitat,diet,conservation_status,description"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("7,House Sparrow,Passer domesticus"));
        assert!(row.contains("not_extinct"));
        assert!(row.contains("\"small, bold bird\""));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn bulk_export_of_empty_catalog_is_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_all_species(dir.path(), &[]).unwrap();
        assert!(path.ends_with(ALL_SPECIES_FILE_NAME));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.trim_end(),
            "id,name,scientific_name,origin,habitat,diet,conservation_status,description"
        );
    }

    #[test]
    fn re_export_overwrites_the_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut species = sparrow();
        export_species(dir.path(), &species).unwrap();

        species.diet = "Seeds and scraps".to_string();
        let path = export_species(dir.path(), &species).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Seeds and scraps"));
        assert!(!contents.contains("Seeds,"));
    }
}
