//! Session commands: `login`, `logout`, `whoami` and `reset-password`.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, backend};
use crate::error::{DeskError, Result};
use crate::session::SessionStore;
use crate::utils::{is_stdin_tty, read_stdin};

/// Log in and store the session.
///
/// Without `--password` the password is read from piped stdin; an
/// interactive terminal is refused so the password never echoes.
pub async fn cmd_login(email: &str, password: Option<String>, output_json: bool) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None if !is_stdin_tty() => read_stdin()?,
        None => {
            return Err(DeskError::Auth(
                "no password given, pass --password or pipe it on stdin".to_string(),
            ));
        }
    };
    if password.is_empty() {
        return Err(DeskError::Auth("password must not be empty".to_string()));
    }

    let credentials = backend()?.authenticate(email.trim(), &password).await?;
    let store = SessionStore::default();
    store.save(&credentials)?;

    CommandOutput::new(json!({
        "email": credentials.email,
        "role": credentials.role,
        "session_file": store.path().to_string_lossy(),
    }))
    .with_text(format!(
        "Logged in as {} ({})",
        credentials.email.cyan(),
        credentials.role
    ))
    .print(output_json)
}

pub fn cmd_logout(output_json: bool) -> Result<()> {
    let removed = SessionStore::default().clear()?;
    let text = if removed {
        "Logged out"
    } else {
        "No active session"
    };
    CommandOutput::new(json!({ "logged_out": removed }))
        .with_text(text)
        .print(output_json)
}

pub fn cmd_whoami(output_json: bool) -> Result<()> {
    let credentials = SessionStore::default().require()?;
    CommandOutput::new(json!({
        "email": credentials.email,
        "role": credentials.role,
    }))
    .with_text(format!("{} ({})", credentials.email, credentials.role))
    .print(output_json)
}

/// Ask the backend to mail a password reset link. Needs no session.
pub async fn cmd_reset_password(email: &str, output_json: bool) -> Result<()> {
    let email = email.trim();
    backend()?.request_password_reset(email).await?;
    CommandOutput::new(json!({ "email": email, "reset_requested": true }))
        .with_text(format!("Password reset link sent to {}", email.cyan()))
        .print(output_json)
}
