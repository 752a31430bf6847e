use anyhow::Result;
use rusqlite::Connection;

use crate::access::{menu_for, resolve_selection};
use crate::models::User;

use super::actions::perform;
use super::prompts::{parse_selection, prompt};
use super::surface_error;

/// Run the menu loop for a logged-in user until they pick the exit option.
///
/// The menu is printed from the role's allow-list, so each role only ever
/// sees (and can only ever select) its own operations. Failures from a
/// handler are printed and the loop continues; nothing here ends the process.
pub(crate) fn run_menu(conn: &Connection, user: &User) -> Result<()> {
    let menu = menu_for(user.role);

    loop {
        println!("\nPlease choose an option below:");
        for (idx, action) in menu.iter().enumerate() {
            println!("{}. {}", idx + 1, action.label());
        }
        println!("0. Exit");

        let input = prompt("Enter your choice: ")?;
        let Some(selection) = parse_selection(&input) else {
            println!(
                "Invalid input. Please enter a number between 0 and {}.",
                menu.len()
            );
            continue;
        };

        if selection == 0 {
            println!("Exiting the menu.");
            return Ok(());
        }

        match resolve_selection(user.role, selection) {
            Some(action) => {
                if let Err(err) = perform(conn, action) {
                    println!("Error: {}", surface_error(&err));
                }
            }
            None => println!("Invalid choice. Please select a valid option."),
        }
    }
}
