//! Domain models that mirror the SQLite schema and get passed between the
//! repository, access-control, and report layers. The intent is that these
//! types stay light-weight data holders so other layers can focus on
//! persistence and presentation logic.

use std::fmt;

/// Privilege tier attached to every account. The role decides which menu a
/// logged-in user sees, so the variants double as the access-control keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Full read/write/delete access to species and sightings.
    Researcher,
    /// Read-only browsing plus CSV export.
    CommonUser,
    /// Read access plus the append-only sighting edit.
    Student,
}

impl Role {
    /// Every role the registration prompt accepts, in display order.
    pub const ALL: [Role; 3] = [Role::Researcher, Role::CommonUser, Role::Student];

    /// Canonical lowercase spelling stored in the `users.role` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Researcher => "researcher",
            Role::CommonUser => "common_user",
            Role::Student => "student",
        }
    }

    /// Parse user input leniently: surrounding whitespace and casing are
    /// forgiven, anything else is rejected so the CHECK constraint in the
    /// schema never sees an unknown value.
    pub fn parse(input: &str) -> Option<Role> {
        match input.trim().to_lowercase().as_str() {
            "researcher" => Some(Role::Researcher),
            "common_user" => Some(Role::CommonUser),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The enumerated conservation states a species record may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConservationStatus {
    Extinct,
    NotExtinct,
}

impl ConservationStatus {
    /// Human-readable list of accepted spellings, used in error messages and
    /// prompts.
    pub const ALLOWED: &'static str = "extinct / not_extinct";

    /// Canonical spelling stored in the `conservation_status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConservationStatus::Extinct => "extinct",
            ConservationStatus::NotExtinct => "not_extinct",
        }
    }

    /// Parse user input, forgiving case and surrounding whitespace.
    pub fn parse(input: &str) -> Option<ConservationStatus> {
        match input.trim().to_lowercase().as_str() {
            "extinct" => Some(ConservationStatus::Extinct),
            "not_extinct" => Some(ConservationStatus::NotExtinct),
            _ => None,
        }
    }
}

impl fmt::Display for ConservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered account. Accounts are created once and never edited or
/// deleted, so the struct is read-only after hydration.
#[derive(Debug, Clone)]
pub struct User {
    /// Primary key from the database.
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Stored and compared as plain text. Credential hashing is an explicit
    /// non-goal for this tool, which only ever runs as a single local session.
    pub password: String,
    pub role: Role,
    /// Timestamp assigned by SQLite at insert time.
    pub created_at: String,
}

/// One row of the species reference catalog.
#[derive(Debug, Clone)]
pub struct Species {
    /// Primary key from the database. Edit and delete flows bubble the id back
    /// to the persistence layer even when the UI only shows the name.
    pub id: i64,
    /// Common name, unique across the catalog regardless of casing.
    pub name: String,
    /// Binomial name, also unique regardless of casing.
    pub scientific_name: String,
    pub origin: String,
    pub habitat: String,
    pub diet: String,
    pub conservation_status: ConservationStatus,
    pub description: String,
}

impl Species {
    /// Compose a `Name (Scientific name)` string for confirmations and log
    /// lines, omitting the parenthetical if the scientific name is blank.
    pub fn display_label(&self) -> String {
        if self.scientific_name.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.scientific_name)
        }
    }
}

/// One observation log entry belonging to a species. Rows are removed
/// automatically when their owning species is deleted.
#[derive(Debug, Clone)]
pub struct Sighting {
    pub id: i64,
    /// Foreign key into `species_details`.
    pub species_id: i64,
    /// Kept as text. Appended edits join multiple dates with `" | "`, so the
    /// column outgrows any single-date representation over time.
    pub date: String,
    pub location: String,
    pub observer: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_accepts_any_casing() {
        assert_eq!(Role::parse("Researcher"), Some(Role::Researcher));
        assert_eq!(Role::parse("  COMMON_USER "), Some(Role::CommonUser));
        assert_eq!(Role::parse("student"), Some(Role::Student));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn role_round_trips_through_storage_spelling() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn conservation_status_parse() {
        assert_eq!(
            ConservationStatus::parse("extinct"),
            Some(ConservationStatus::Extinct)
        );
        assert_eq!(
            ConservationStatus::parse("Not_Extinct"),
            Some(ConservationStatus::NotExtinct)
        );
        assert_eq!(ConservationStatus::parse("endangered"), None);
    }

    #[test]
    fn species_display_label_skips_blank_scientific_name() {
        let mut species = Species {
            id: 1,
            name: "Sparrow".to_string(),
            scientific_name: "Passer domesticus".to_string(),
            origin: "Eurasia".to_string(),
            habitat: "Urban".to_string(),
            diet: "Seeds".to_string(),
            conservation_status: ConservationStatus::NotExtinct,
            description: "small bird".to_string(),
        };
        assert_eq!(species.display_label(), "Sparrow (Passer domesticus)");
        species.scientific_name = "  ".to_string();
        assert_eq!(species.display_label(), "Sparrow");
    }
}
