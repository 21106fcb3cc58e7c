//! Configuration commands for managing ticketdesk settings.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::{BASE_URL_ENV, Config};
use crate::error::Result;
use crate::paths::config_path;
use crate::session::SessionStore;

/// Show current configuration
pub fn cmd_config_show(output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let session = SessionStore::default().load()?;
    let effective = config.effective_base_url();
    let overridden = effective != config.base_url;

    let json_output = json!({
        "base_url": config.base_url,
        "effective_base_url": effective,
        "timeout": config.timeout,
        "default_role": config.default_role,
        "session": session.as_ref().map(|s| json!({
            "email": s.email,
            "role": s.role,
        })),
        "config_file": config_path().to_string_lossy(),
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text_output.push_str(&format!("{}: {}", "base_url".cyan(), config.base_url));
    if overridden {
        text_output.push_str(&format!(
            " {}",
            format!("(overridden by {BASE_URL_ENV}={effective})").yellow()
        ));
    }
    text_output.push('\n');
    text_output.push_str(&format!("{}: {}s\n", "timeout".cyan(), config.timeout));
    text_output.push_str(&format!(
        "{}: {}\n",
        "default_role".cyan(),
        config.get("default_role")?
    ));

    text_output.push('\n');
    text_output.push_str(&format!("{}: ", "session".cyan()));
    match &session {
        Some(s) => text_output.push_str(&format!("{} ({})\n", s.email, s.role)),
        None => text_output.push_str(&format!("{}\n", "not logged in".dimmed())),
    }

    text_output.push_str(&format!(
        "\n{} {}",
        "Config file:".dimmed(),
        config_path().display()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output_json)
}

pub fn cmd_config_get(key: &str, output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;
    CommandOutput::new(json!({ "key": key, "value": value }))
        .with_text(value.clone())
        .print(output_json)
}

pub fn cmd_config_set(key: &str, value: &str, output_json: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    let stored = config.get(key)?;

    CommandOutput::new(json!({ "key": key, "value": stored }))
        .with_text(format!("Set {} = {}", key.cyan(), stored))
        .print(output_json)
}
