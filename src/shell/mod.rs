//! Interactive menu-driven shell
//!
//! The shell reads from any `BufRead` and writes to any `Write`, so the
//! binary wires it to stdin/stdout and tests drive it with in-memory
//! buffers. End of input behaves like choosing "Exit".

pub mod input;
pub mod render;

use std::io::{self, BufRead, Write};

use crate::db::DbPool;
use crate::services::{MigrationService, UserError, UserService};
use crate::types::{NewUser, UserStatus, UserUpdate};

use input::{is_confirmed, non_empty, parse_age, parse_id};
use render::{RULE, THIN_RULE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

// Reads a line or ends the current action on end of input.
macro_rules! ask {
    ($shell:expr, $label:expr) => {
        match $shell.prompt($label)? {
            Some(line) => line,
            None => return Ok(Flow::Exit),
        }
    };
}

pub struct Shell<R, W> {
    users: UserService,
    migrations: MigrationService,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(pool: DbPool, input: R, output: W) -> Self {
        Self {
            users: UserService::new(pool.clone()),
            migrations: MigrationService::new(pool),
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Main menu loop; returns when the user exits or input ends
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.main_menu()?;
            let choice = match self.prompt("Choose an action (1-9): ")? {
                Some(choice) => choice,
                None => break,
            };

            let flow = match choice.as_str() {
                "1" => self.list_users()?,
                "2" => self.add_user()?,
                "3" => self.find_by_id()?,
                "4" => self.find_by_email()?,
                "5" => self.update_user()?,
                "6" => self.delete_user()?,
                "7" => self.extended_info()?,
                "8" => self.migrations_menu()?,
                "9" => Flow::Exit,
                _ => {
                    writeln!(self.output, "Invalid choice. Please choose an action from 1 to 9.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                break;
            }
        }

        writeln!(self.output, "Goodbye!")?;
        self.output.flush()
    }

    fn main_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", RULE)?;
        writeln!(self.output, "MAIN MENU")?;
        writeln!(self.output, "{}", RULE)?;
        writeln!(self.output, "1. List all users")?;
        writeln!(self.output, "2. Add a new user")?;
        writeln!(self.output, "3. Find user by ID")?;
        writeln!(self.output, "4. Find user by email")?;
        writeln!(self.output, "5. Update a user")?;
        writeln!(self.output, "6. Delete a user")?;
        writeln!(self.output, "7. Extended information")?;
        writeln!(self.output, "8. Manage migrations")?;
        writeln!(self.output, "9. Exit")?;
        writeln!(self.output, "{}", RULE)
    }

    /// Print `label` and read one trimmed line; `None` at end of input
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than ending the
    /// session.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }

    fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", title)?;
        writeln!(self.output, "{}", THIN_RULE)
    }

    fn error(&mut self, message: impl std::fmt::Display) -> io::Result<Flow> {
        writeln!(self.output, "Error: {}", message)?;
        Ok(Flow::Continue)
    }

    fn ask_id(&mut self, label: &str) -> io::Result<Option<Result<i64, input::InputError>>> {
        Ok(self.prompt(label)?.map(|raw| parse_id(&raw)))
    }

    fn list_users(&mut self) -> io::Result<Flow> {
        self.heading("All users:")?;
        match self.users.list_users() {
            Ok(users) => render::user_list(&mut self.output, &users)?,
            Err(e) => return self.error(e),
        }
        Ok(Flow::Continue)
    }

    fn add_user(&mut self) -> io::Result<Flow> {
        self.heading("Add a new user:")?;

        let name = ask!(self, "Name: ");
        let email = ask!(self, "Email: ");
        let age_raw = ask!(self, "Age: ");

        let phone_available = match self.users.columns() {
            Ok(columns) => columns.phone,
            Err(e) => return self.error(e),
        };
        let phone = if phone_available {
            non_empty(&ask!(self, "Phone (optional): "))
        } else {
            None
        };

        let age = match parse_age(&age_raw) {
            Ok(age) => age,
            Err(e) => return self.error(e),
        };

        match self.users.create_user(NewUser {
            name,
            email,
            age,
            phone,
        }) {
            Ok(created) => {
                writeln!(
                    self.output,
                    "User '{}' added with ID {}",
                    created.user.name, created.user.id
                )?;
                if created.profile_created {
                    writeln!(self.output, "Default profile created")?;
                }
                Ok(Flow::Continue)
            }
            Err(e) => self.error(e),
        }
    }

    fn find_by_id(&mut self) -> io::Result<Flow> {
        self.heading("Find user by ID:")?;

        let id = match self.ask_id("User ID: ")? {
            Some(Ok(id)) => id,
            Some(Err(e)) => return self.error(e),
            None => return Ok(Flow::Exit),
        };

        match self.users.get_user(id) {
            Ok(user) => {
                writeln!(self.output, "Found user:")?;
                render::user_details(&mut self.output, &user)?;
                Ok(Flow::Continue)
            }
            Err(e) => self.error(e),
        }
    }

    fn find_by_email(&mut self) -> io::Result<Flow> {
        self.heading("Find user by email:")?;

        let email = ask!(self, "Email: ");
        match self.users.find_by_email(&email) {
            Ok(Some(user)) => {
                writeln!(self.output, "Found user:")?;
                render::user_details(&mut self.output, &user)?;
                Ok(Flow::Continue)
            }
            Ok(None) => {
                writeln!(self.output, "No user with email '{}'", email)?;
                Ok(Flow::Continue)
            }
            Err(e) => self.error(e),
        }
    }

    fn update_user(&mut self) -> io::Result<Flow> {
        self.heading("Update a user:")?;

        let id = match self.ask_id("User ID to update: ")? {
            Some(Ok(id)) => id,
            Some(Err(e)) => return self.error(e),
            None => return Ok(Flow::Exit),
        };

        let user = match self.users.get_user(id) {
            Ok(user) => user,
            Err(e) => return self.error(e),
        };
        let columns = match self.users.columns() {
            Ok(columns) => columns,
            Err(e) => return self.error(e),
        };

        writeln!(self.output, "Current values:")?;
        render::editable_fields(&mut self.output, &user, columns)?;

        let field = ask!(self, "Field to update (1-5): ");
        let update = match field.as_str() {
            "1" => non_empty(&ask!(self, "New name: ")).map(UserUpdate::Name),
            "2" => non_empty(&ask!(self, "New email: ")).map(UserUpdate::Email),
            "3" => match parse_age(&ask!(self, "New age: ")) {
                Ok(age) => age.map(UserUpdate::Age),
                Err(e) => return self.error(e),
            },
            "4" if columns.phone => Some(UserUpdate::Phone(non_empty(&ask!(self, "New phone: ")))),
            "4" => return self.error(UserError::FieldUnavailable("phone")),
            "5" if columns.status => {
                writeln!(self.output, "Available statuses: active, inactive")?;
                let raw = ask!(self, "New status: ");
                match UserStatus::parse(&raw) {
                    Some(status) => Some(UserUpdate::Status(status)),
                    None => return self.error("Invalid status. Use 'active' or 'inactive'"),
                }
            }
            "5" => return self.error(UserError::FieldUnavailable("status")),
            _ => return self.error("Invalid field choice"),
        };

        let Some(update) = update else {
            writeln!(self.output, "Nothing changed")?;
            return Ok(Flow::Continue);
        };

        match self.users.update_user(id, update) {
            Ok(_) => {
                writeln!(self.output, "User updated")?;
                Ok(Flow::Continue)
            }
            Err(e) => self.error(e),
        }
    }

    fn delete_user(&mut self) -> io::Result<Flow> {
        self.heading("Delete a user:")?;

        let id = match self.ask_id("User ID to delete: ")? {
            Some(Ok(id)) => id,
            Some(Err(e)) => return self.error(e),
            None => return Ok(Flow::Exit),
        };

        let user = match self.users.get_user(id) {
            Ok(user) => user,
            Err(e) => return self.error(e),
        };

        writeln!(self.output, "You are about to delete:")?;
        writeln!(self.output, "   ID: {}", user.id)?;
        writeln!(self.output, "   Name: {}", user.name)?;
        writeln!(self.output, "   Email: {}", user.email)?;

        let confirm = ask!(self, "Are you sure? (yes/NO): ");
        if !is_confirmed(&confirm) {
            writeln!(self.output, "Deletion cancelled")?;
            return Ok(Flow::Continue);
        }

        match self.users.delete_user(id) {
            Ok(user) => {
                writeln!(self.output, "User '{}' deleted", user.name)?;
                Ok(Flow::Continue)
            }
            Err(e) => self.error(e),
        }
    }

    fn extended_info(&mut self) -> io::Result<Flow> {
        self.heading("Extended information:")?;

        let stats = match self.users.stats() {
            Ok(stats) => stats,
            Err(e) => return self.error(e),
        };
        render::stats(&mut self.output, &stats)?;

        match self.users.recent_activity(5) {
            Ok(entries) => render::activity(&mut self.output, &entries)?,
            Err(e) => return self.error(e),
        }
        Ok(Flow::Continue)
    }

    fn migrations_menu(&mut self) -> io::Result<Flow> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "Migrations:")?;
            writeln!(self.output, "1. Apply all migrations")?;
            writeln!(self.output, "2. Show migration status")?;
            writeln!(self.output, "3. Roll back the last migration")?;
            writeln!(self.output, "4. Back")?;

            let choice = ask!(self, "Choose an action (1-4): ");
            match choice.as_str() {
                "1" => match self.migrations.run_all() {
                    Ok(report) => render::migration_report(&mut self.output, &report)?,
                    Err(e) => {
                        self.error(e)?;
                    }
                },
                "2" => match self.migrations.status() {
                    Ok(statuses) => render::migration_status(&mut self.output, &statuses)?,
                    Err(e) => {
                        self.error(e)?;
                    }
                },
                "3" => {
                    if self.rollback()? == Flow::Exit {
                        return Ok(Flow::Exit);
                    }
                }
                "4" => return Ok(Flow::Continue),
                _ => writeln!(self.output, "Invalid choice")?,
            }
        }
    }

    fn rollback(&mut self) -> io::Result<Flow> {
        let last = match self.migrations.last_applied() {
            Ok(Some(last)) => last,
            Ok(None) => {
                writeln!(self.output, "No applied migrations to roll back")?;
                return Ok(Flow::Continue);
            }
            Err(e) => return self.error(e),
        };

        writeln!(self.output, "Last applied migration: {}", last.name)?;
        let confirm = ask!(self, "Are you sure? This cannot be undone (yes/NO): ");
        if !is_confirmed(&confirm) {
            writeln!(self.output, "Rollback cancelled")?;
            return Ok(Flow::Continue);
        }

        match self.migrations.rollback_last() {
            Ok(Some(name)) => writeln!(self.output, "Rolled back {}", name)?,
            Ok(None) => writeln!(self.output, "No applied migrations to roll back")?,
            Err(e) => return self.error(e),
        }
        Ok(Flow::Continue)
    }
}
