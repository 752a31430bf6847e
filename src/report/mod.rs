//! Result presentation: plain-text grids for the interactive views and CSV
//! files for export.

mod export;
mod table;

pub use export::{export_all_species, export_species, species_file_name, ALL_SPECIES_FILE_NAME};
pub use table::{render_numbered_list, render_table};
