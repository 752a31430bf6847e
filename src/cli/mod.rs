//! The interactive surface: a welcome flow that registers or authenticates an
//! account, then a per-role menu loop. Everything here is thin plumbing over
//! the repository and report layers; the prompts read a line, trim it, and
//! hand it on.

mod actions;
mod menu;
mod prompts;

use anyhow::{Error, Result};
use rusqlite::Connection;

use crate::db::{authenticate, create_user, DbError};
use crate::models::Role;

use menu::run_menu;
use prompts::{confirm, prompt};

/// Entry point for an interactive session. Walks the welcome flow and, on a
/// successful login, hands control to the role's menu loop.
pub fn run(conn: &Connection) -> Result<()> {
    println!("\n----- WELCOME TO THE AVIAN REGISTRY -----\n");

    let registered = prompt("Are you a registered user? (T/F): ")?;
    match registered.to_lowercase().as_str() {
        "t" => login(conn),
        "f" => {
            if confirm("Do you want to register? (T/F): ")? {
                if register(conn)? {
                    println!("\nYou can now log in with your new account.");
                    return login(conn);
                }
                Ok(())
            } else {
                println!("\nThank you for visiting!");
                Ok(())
            }
        }
        _ => {
            println!("Invalid input. Please enter 'T' or 'F'.");
            Ok(())
        }
    }
}

/// Prompt for the registration fields and create the account. Returns whether
/// an account was actually created so the caller knows if a login makes
/// sense next.
fn register(conn: &Connection) -> Result<bool> {
    let username = prompt("Enter a username: ")?;
    let email = prompt("Enter an email: ")?;
    let password = prompt("Enter a password: ")?;
    let role = prompt("Select a user type [student/researcher/common_user]: ")?;

    match create_user(conn, &username, &email, &password, &role) {
        Ok(_) => {
            println!("User registered successfully.");
            Ok(true)
        }
        Err(err @ (DbError::AlreadyExists { .. }
        | DbError::InvalidValue { .. }
        | DbError::MissingField { .. })) => {
            println!("Error: {err}");
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

/// Prompt for credentials and, on success, run the menu for the account's
/// role. A failed login is reported once; the caller decides whether to offer
/// another attempt (currently it does not, matching the single-shot flow).
fn login(conn: &Connection) -> Result<()> {
    let identifier = prompt("Enter a username or email: ")?;
    let password = prompt("Enter the password: ")?;
    let role_input = prompt("Select a user type [student/researcher/common_user]: ")?;

    let Some(role) = Role::parse(&role_input) else {
        println!("Unknown user type '{role_input}'.");
        return Ok(());
    };

    match authenticate(conn, &identifier, &password, role) {
        Ok(user) => {
            println!(
                "Login successful. Welcome, {}, you are logged in as a {}.",
                user.username, user.role
            );
            run_menu(conn, &user)
        }
        Err(DbError::AuthenticationFailed) => {
            println!("ERROR: Login failed!");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
