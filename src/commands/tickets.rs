use serde_json::json;

use super::{CommandOutput, mounted_panel};
use crate::display::{format_ticket_detail, render_ticket_panel};
use crate::error::{DeskError, Result};
use crate::filter::FilterBucket;
use crate::panel::LoadState;
use crate::ticket::TicketId;

/// List the session's tickets through a filter
pub async fn cmd_tickets(
    filter: FilterBucket,
    search: Option<String>,
    output_json: bool,
) -> Result<()> {
    let (panel, _) = mounted_panel().await?;
    panel.set_filter(filter);
    if let Some(term) = search {
        panel.set_search_term(term);
    }
    let state = panel.snapshot();

    for warning in &state.warnings {
        tracing::warn!("{}", warning);
    }

    if output_json {
        if let LoadState::Failed(message) = &state.load {
            return Err(DeskError::Api(message.clone()));
        }
        return CommandOutput::new(json!({
            "filter": state.filter.selected_filter(),
            "search": state.filter.search_term(),
            "stats": state.stats,
            "tickets": state.visible_tickets(),
            "warnings": state.warnings,
            "skipped": state.skipped_records(),
        }))
        .print(true);
    }

    println!("{}", render_ticket_panel(&state).trim_end());
    match state.load {
        LoadState::Failed(message) => Err(DeskError::Api(message)),
        _ => Ok(()),
    }
}

/// Show one ticket in full
pub async fn cmd_show(id: &str, output_json: bool) -> Result<()> {
    let (panel, load) = mounted_panel().await?;
    if let LoadState::Failed(message) = load {
        return Err(DeskError::Api(message));
    }

    let state = panel.snapshot();
    let ticket = state
        .find(&TicketId::new(id.trim()))
        .ok_or_else(|| DeskError::TicketNotFound(id.to_string()))?;

    let actions: Vec<&str> = ticket.available_actions().iter().map(|a| a.verb()).collect();
    CommandOutput::new(json!({
        "ticket": ticket,
        "actions": actions,
    }))
    .with_text(format_ticket_detail(ticket))
    .print(output_json)
}
