//! Own-profile commands (`profile`, `update-profile`)

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, backend, session};
use crate::display::format_profile;
use crate::error::{DeskError, Result};
use crate::remote::{MIN_PASSWORD_LEN, ProfileChanges};

pub async fn cmd_profile(output_json: bool) -> Result<()> {
    let credentials = session()?;
    let profile = backend()?.fetch_profile(&credentials).await?;

    CommandOutput::new(json!(profile))
        .with_text(format_profile(&profile))
        .print(output_json)
}

/// Fetch the current profile, overlay `changes` and save it back.
///
/// The password is only changed when one is given.
pub async fn cmd_update_profile(
    changes: ProfileChanges,
    password: Option<String>,
    output_json: bool,
) -> Result<()> {
    let password = password.unwrap_or_default();
    if changes.is_empty() && password.is_empty() {
        return Err(DeskError::Other(
            "nothing to update, pass at least one field to change".to_string(),
        ));
    }
    if !password.is_empty() && password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DeskError::Validation(
            "password: Password must be at least 6 characters".to_string(),
        ));
    }

    let credentials = session()?;
    let backend = backend()?;
    let mut profile = backend.fetch_profile(&credentials).await?;
    profile.apply(changes);
    backend.update_profile(&profile, &password).await?;

    CommandOutput::new(json!({
        "profile": profile,
        "password_changed": !password.is_empty(),
    }))
    .with_text(format!(
        "{}\n{}",
        "Profile updated".green(),
        format_profile(&profile)
    ))
    .print(output_json)
}
