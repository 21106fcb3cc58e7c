use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, backend, session};
use crate::display::format_ticket_line;
use crate::error::Result;
use crate::types::Role;

/// Tickets recently touched for the session agent
pub async fn cmd_notifications(output_json: bool) -> Result<()> {
    let credentials = session()?;
    credentials.require_role(Role::Agent)?;

    let parsed = backend()?.fetch_notifications(&credentials).await?;
    for warning in &parsed.warnings {
        tracing::warn!("{}", warning);
    }

    let text = if parsed.tickets.is_empty() {
        "No notifications".dimmed().to_string()
    } else {
        parsed
            .tickets
            .iter()
            .map(format_ticket_line)
            .collect::<Vec<_>>()
            .join("\n")
    };

    CommandOutput::new(json!({
        "tickets": parsed.tickets,
        "warnings": parsed.warnings,
    }))
    .with_text(text)
    .print(output_json)
}
