//! Menu-driven console front end.
//!
//! Each dashboard lives in its own module as an `impl` block on `Console`;
//! all of them only talk to the `services` layer.

pub mod admin;
pub mod analytics;
pub mod bookings;
pub mod events;
pub mod vendors;

use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, error};

use crate::models::{Role, User};
use crate::services::auth::{self, Registration};
use crate::services::ServiceError;
use crate::AppState;

const RULE: &str = "────────────────────────────────────────────────────────────";

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
    /// Input ended; the session is over.
    #[error("input closed")]
    Closed,
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// `yes` or `y`, case-insensitive. Anything else is a no.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "yes" | "y")
}

pub struct Console<'a, R, W> {
    state: &'a AppState,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(state: &'a AppState, input: R, output: W) -> Self {
        Self { state, input, output }
    }

    /// Runs the guest menu until the user exits or input runs out.
    pub fn run(&mut self) -> io::Result<()> {
        let session = self
            .guest_menu()
            .and_then(|()| self.say("\nThank you for visiting Carnival Corner!"));
        match session {
            Ok(()) | Err(ConsoleError::Closed) => Ok(()),
            Err(ConsoleError::Io(e)) => Err(e),
        }
    }

    fn guest_menu(&mut self) -> ConsoleResult<()> {
        loop {
            self.header("CARNIVAL CORNER - GUEST")?;
            self.say("1. Browse Events\n2. View Event Details\n3. Login\n4. Register\n5. Exit")?;

            match self.prompt("\nChoice: ")?.as_str() {
                "1" => self.browse_events(true)?,
                "2" => {
                    self.event_details(true)?;
                }
                "3" => {
                    if let Some(user) = self.login()? {
                        self.dashboard(&user)?;
                    }
                }
                "4" => self.register()?,
                "5" => return Ok(()),
                _ => self.say("\n❌ Invalid choice!")?,
            }
        }
    }

    fn dashboard(&mut self, user: &User) -> ConsoleResult<()> {
        debug!("Opening {} dashboard for {}", user.role, user.username);
        match user.role {
            Role::User => self.user_dashboard(user),
            Role::Vendor => self.vendor_dashboard(user),
            Role::Admin => self.admin_dashboard(user),
        }
    }

    fn login(&mut self) -> ConsoleResult<Option<User>> {
        self.header("LOGIN")?;
        let username = self.prompt("Username: ")?;
        let password = self.prompt("Password: ")?;

        match auth::login(self.state, &username, &password) {
            Ok(user) => {
                self.say(&format!("\n✅ Login successful! Welcome, {}", user.name))?;
                Ok(Some(user))
            }
            Err(e) => {
                self.report(&e)?;
                Ok(None)
            }
        }
    }

    fn register(&mut self) -> ConsoleResult<()> {
        self.header("REGISTER")?;
        self.say("Select role:\n1. User (Book tickets)\n2. Vendor (Book stalls)\n3. Admin (Manage platform)")?;

        let (role, admin_code) = match self.prompt("\nChoice: ")?.as_str() {
            "1" => (Role::User, None),
            "2" => (Role::Vendor, None),
            "3" => (Role::Admin, Some(self.prompt("Enter admin registration code: ")?)),
            _ => return self.say("\n❌ Invalid choice!"),
        };

        let registration = Registration {
            username: self.prompt("\nUsername: ")?,
            password: self.prompt("Password: ")?,
            name: self.prompt("Full Name: ")?,
            role,
            admin_code,
        };
        match auth::register(self.state, registration) {
            Ok(user) => self.say(&format!(
                "\n✅ Registration successful! You can now login as {}.",
                user.role
            )),
            Err(e) => self.report(&e),
        }
    }

    /// Writes `label` and reads one trimmed line.
    fn prompt(&mut self, label: &str) -> ConsoleResult<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ConsoleError::Closed);
        }
        Ok(line.trim().to_string())
    }

    fn confirm(&mut self, question: &str) -> ConsoleResult<bool> {
        let answer = self.prompt(&format!("{} (yes/no): ", question))?;
        Ok(is_affirmative(&answer))
    }

    /// Re-asks until the answer parses as `T`.
    fn prompt_parsed<T: std::str::FromStr>(&mut self, label: &str) -> ConsoleResult<T> {
        loop {
            match self.prompt(label)?.parse() {
                Ok(value) => return Ok(value),
                Err(_) => self.say("❌ Please enter a valid number.")?,
            }
        }
    }

    /// Empty answer means "keep the current value".
    fn prompt_optional(&mut self, label: &str) -> ConsoleResult<Option<String>> {
        let answer = self.prompt(label)?;
        Ok(Some(answer).filter(|a| !a.is_empty()))
    }

    fn say(&mut self, text: &str) -> ConsoleResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    fn header(&mut self, title: &str) -> ConsoleResult<()> {
        writeln!(self.output, "\n{RULE}\n{title:^60}\n{RULE}")?;
        Ok(())
    }

    fn rule(&mut self) -> ConsoleResult<()> {
        self.say(RULE)
    }

    fn report(&mut self, err: &ServiceError) -> ConsoleResult<()> {
        if let ServiceError::Storage(e) = err {
            error!("Storage failure: {}", e);
        }
        self.say(&format!("\n❌ {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_or_y_confirms() {
        for answer in ["yes", "y", "YES", " Y ", "Yes"] {
            assert!(is_affirmative(answer), "{answer}");
        }
        for answer in ["no", "n", "", "yep", "sure", "yess"] {
            assert!(!is_affirmative(answer), "{answer}");
        }
    }
}
