//! Binary entry point that glues the SQLite-backed domain model to the
//! interactive menus: bring up the database, then walk the welcome flow until
//! the user exits.
use avian_registry::{ensure_schema, run};

/// Initialize logging and persistence, then hand off to the session flow.
///
/// Returning a `Result` bubbles fatal initialization problems (for example an
/// unwritable data directory) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let conn = ensure_schema()?;
    run(&conn)
}
