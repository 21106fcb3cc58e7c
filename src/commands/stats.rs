use serde_json::json;

use super::{CommandOutput, backend, session};
use crate::display::{format_agent_stats, format_dashboard};
use crate::error::{DeskError, Result};
use crate::panel::{LoadState, TicketPanel};
use crate::stats::PriorityCounts;
use crate::types::Role;

/// Admin overview of the whole ticket collection
pub async fn cmd_dashboard(output_json: bool) -> Result<()> {
    let credentials = session()?;
    credentials.require_role(Role::Admin)?;

    let panel = TicketPanel::new(backend()?, credentials);
    if let LoadState::Failed(message) = panel.mount().await {
        return Err(DeskError::Api(message));
    }

    let state = panel.snapshot();
    let priorities = PriorityCounts::from_tickets(&state.tickets);

    CommandOutput::new(json!({
        "stats": state.stats,
        "priorities": priorities,
    }))
    .with_text(format_dashboard(&state.stats, &priorities))
    .print(output_json)
}

/// The session agent's solved versus received counts
pub async fn cmd_my_stats(output_json: bool) -> Result<()> {
    let credentials = session()?;
    credentials.require_role(Role::Agent)?;

    let stats = backend()?.fetch_agent_stats(&credentials).await?;
    CommandOutput::new(json!(stats))
        .with_text(format_agent_stats(&stats))
        .print(output_json)
}
