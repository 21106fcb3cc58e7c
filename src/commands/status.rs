use serde_json::json;

use super::{CommandOutput, mounted_panel};
use crate::display::format_status_colored;
use crate::error::{DeskError, Result};
use crate::panel::{LoadState, TransitionOutcome};
use crate::ticket::TicketId;
use crate::transition::TicketAction;

/// Apply a transition through a freshly loaded panel and report the toast
async fn transition(
    id: &str,
    action: TicketAction,
    reply: Option<String>,
    output_json: bool,
) -> Result<()> {
    let (panel, load) = mounted_panel().await?;
    if let LoadState::Failed(message) = load {
        return Err(DeskError::Api(message));
    }

    let ticket_id = TicketId::new(id.trim());
    let previous_status = panel
        .snapshot()
        .find(&ticket_id)
        .map(|t| t.status.clone())
        .unwrap_or_default();

    let outcome = panel.request_transition(&ticket_id, action, reply).await?;
    let state = panel.snapshot();
    let toast = state.toast.clone();
    let current_status = state.find(&ticket_id).map(|t| t.status.clone());

    match outcome {
        TransitionOutcome::Applied => {
            let toast_text = toast
                .as_ref()
                .map(|t| t.render())
                .unwrap_or_default();
            let status_text = current_status
                .as_ref()
                .map(|s| format!("\n{} -> {}", previous_status, format_status_colored(s)))
                .unwrap_or_default();

            CommandOutput::new(json!({
                "id": ticket_id,
                "action": action,
                "previous_status": previous_status,
                "new_status": current_status,
                "stats": state.stats,
            }))
            .with_text(format!("{toast_text}{status_text}"))
            .print(output_json)
        }
        TransitionOutcome::Failed(message) => Err(DeskError::Other(
            toast.map(|t| t.message).unwrap_or(message),
        )),
    }
}

/// Mark a NEW or OPEN ticket as CLOSED
pub async fn cmd_resolve(id: &str, reply: Option<String>, output_json: bool) -> Result<()> {
    transition(id, TicketAction::Resolve, reply, output_json).await
}

/// Move a CLOSED ticket back to OPEN
pub async fn cmd_reopen(id: &str, reply: Option<String>, output_json: bool) -> Result<()> {
    transition(id, TicketAction::Reopen, reply, output_json).await
}
