//! Role-based access control. Each role owns a fixed slice of menu actions,
//! and the dispatcher maps a numeric selection into that slice, so an
//! operation missing from a role's list cannot be reached through that role's
//! menu at all. There is no post-hoc permission check to forget.

use crate::models::Role;

/// Every operation the menus can invoke. The variants say what happens, the
/// role slices below say who may do it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ListSpeciesNames,
    ListSpeciesDetails,
    ViewSpecies,
    ViewSightingsForSpecies,
    ViewAllSightings,
    AddSpecies,
    AddSighting,
    UpdateSpecies,
    AppendToSighting,
    DeleteSpecies,
    ExportCsv,
}

impl MenuAction {
    /// Menu line shown next to the selection number.
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::ListSpeciesNames => "View all saved species names",
            MenuAction::ListSpeciesDetails => "View detailed information for all species",
            MenuAction::ViewSpecies => "View details for a specific species",
            MenuAction::ViewSightingsForSpecies => "View sightings for a specific species",
            MenuAction::ViewAllSightings => "View sightings for all species",
            MenuAction::AddSpecies => "Add a new species",
            MenuAction::AddSighting => "Add a new sighting",
            MenuAction::UpdateSpecies => "Update details for a specific species",
            MenuAction::AppendToSighting => "Append to a sighting for a specific species",
            MenuAction::DeleteSpecies => "Remove a specific species",
            MenuAction::ExportCsv => "Export species details to CSV",
        }
    }
}

/// Read-only browsing plus the append-only sighting edit. Students may extend
/// an observation log but cannot create records or touch the catalog.
const STUDENT_MENU: &[MenuAction] = &[
    MenuAction::ListSpeciesNames,
    MenuAction::ListSpeciesDetails,
    MenuAction::ViewSpecies,
    MenuAction::ViewSightingsForSpecies,
    MenuAction::ViewAllSightings,
    MenuAction::AppendToSighting,
    MenuAction::ExportCsv,
];

/// Everything students can do plus full catalog write access.
const RESEARCHER_MENU: &[MenuAction] = &[
    MenuAction::ListSpeciesNames,
    MenuAction::ListSpeciesDetails,
    MenuAction::ViewSpecies,
    MenuAction::ViewSightingsForSpecies,
    MenuAction::ViewAllSightings,
    MenuAction::AddSpecies,
    MenuAction::AddSighting,
    MenuAction::UpdateSpecies,
    MenuAction::AppendToSighting,
    MenuAction::DeleteSpecies,
    MenuAction::ExportCsv,
];

/// Strictly read-only browsing and export. No edits of any kind.
const COMMON_USER_MENU: &[MenuAction] = &[
    MenuAction::ListSpeciesNames,
    MenuAction::ListSpeciesDetails,
    MenuAction::ViewSpecies,
    MenuAction::ViewSightingsForSpecies,
    MenuAction::ViewAllSightings,
    MenuAction::ExportCsv,
];

/// The full ordered menu for a role. The order here is the numbering the user
/// sees, starting at 1.
pub fn menu_for(role: Role) -> &'static [MenuAction] {
    match role {
        Role::Student => STUDENT_MENU,
        Role::Researcher => RESEARCHER_MENU,
        Role::CommonUser => COMMON_USER_MENU,
    }
}

/// Map a 1-based menu selection to its action. `None` covers both zero (the
/// exit convention) and anything past the end of the role's menu.
pub fn resolve_selection(role: Role, selection: usize) -> Option<MenuAction> {
    if selection == 0 {
        return None;
    }
    menu_for(role).get(selection - 1).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mutating actions that only researchers hold.
    const RESEARCHER_ONLY: &[MenuAction] = &[
        MenuAction::AddSpecies,
        MenuAction::AddSighting,
        MenuAction::UpdateSpecies,
        MenuAction::DeleteSpecies,
    ];

    #[test]
    fn student_menu_excludes_catalog_mutation() {
        for action in RESEARCHER_ONLY {
            assert!(
                !menu_for(Role::Student).contains(action),
                "student menu must not offer {action:?}"
            );
        }
        assert!(menu_for(Role::Student).contains(&MenuAction::AppendToSighting));
    }

    #[test]
    fn common_user_menu_is_read_only_plus_export() {
        let menu = menu_for(Role::CommonUser);
        for action in RESEARCHER_ONLY {
            assert!(!menu.contains(action));
        }
        assert!(!menu.contains(&MenuAction::AppendToSighting));
        assert!(menu.contains(&MenuAction::ExportCsv));
    }

    #[test]
    fn researcher_menu_covers_every_action() {
        let menu = menu_for(Role::Researcher);
        for action in menu_for(Role::Student) {
            assert!(menu.contains(action));
        }
        for action in RESEARCHER_ONLY {
            assert!(menu.contains(action));
        }
    }

    #[test]
    fn selection_maps_one_based_into_the_role_menu() {
        assert_eq!(
            resolve_selection(Role::Student, 1),
            Some(MenuAction::ListSpeciesNames)
        );
        assert_eq!(
            resolve_selection(Role::Student, 6),
            Some(MenuAction::AppendToSighting)
        );
        assert_eq!(resolve_selection(Role::Student, 0), None);
        assert_eq!(resolve_selection(Role::Student, 8), None);
        assert_eq!(
            resolve_selection(Role::Researcher, 10),
            Some(MenuAction::DeleteSpecies)
        );
        assert_eq!(resolve_selection(Role::CommonUser, 7), None);
    }

    #[test]
    fn no_role_menu_reaches_an_action_outside_its_list() {
        for role in Role::ALL {
            let menu = menu_for(role);
            for selection in 0..=32 {
                match resolve_selection(role, selection) {
                    Some(action) => assert!(menu.contains(&action)),
                    None => assert!(selection == 0 || selection > menu.len()),
                }
            }
        }
    }
}
