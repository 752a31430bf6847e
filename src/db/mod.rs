//! Persistence module split across logical submodules. All operations are
//! free functions over a borrowed [`rusqlite::Connection`]; the connection is
//! owned by the caller so there is no process-wide database state.

mod connection;
mod error;
mod sightings;
mod species;
mod users;

pub use connection::{apply_schema, ensure_schema};
pub use error::{DbError, DbResult};
pub use sightings::{
    append_to_sighting, create_sighting, find_sightings_by_species, list_all_sightings,
    SightingAppend,
};
pub use species::{
    create_species, delete_species, find_species_by_name, list_species, list_species_names,
    update_species, NewSpecies, SpeciesUpdate, UpdateOutcome,
};
pub use users::{authenticate, create_user};
