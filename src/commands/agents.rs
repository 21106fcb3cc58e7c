//! Admin-only agent roster commands

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, backend, session};
use crate::display::format_agents_table;
use crate::error::{DeskError, Result};
use crate::remote::{Agent, AgentChanges, replace_agent};
use crate::types::Role;

pub async fn cmd_agents(search: Option<String>, output_json: bool) -> Result<()> {
    let credentials = session()?;
    credentials.require_role(Role::Admin)?;

    let agents = backend()?.fetch_agents(&credentials).await?;
    let term = search.unwrap_or_default();
    let matching: Vec<&Agent> = agents.iter().filter(|a| a.matches_search(&term)).collect();

    let text = if matching.is_empty() {
        "No agents found".dimmed().to_string()
    } else {
        format!(
            "{}\n{} of {} agents",
            format_agents_table(&matching),
            matching.len(),
            agents.len()
        )
    };

    CommandOutput::new(json!(matching))
        .with_text(text)
        .print(output_json)
}

fn find_agent<'a>(agents: &'a [Agent], id: &str) -> Result<&'a Agent> {
    agents
        .iter()
        .find(|a| a.id.as_deref() == Some(id.trim()))
        .ok_or_else(|| DeskError::Other(format!("agent '{id}' not found")))
}

/// Apply `changes` to the agent whose id is `id` and print the refreshed roster.
///
/// The record the backend returns replaces the listed one.
pub async fn cmd_edit_agent(id: &str, changes: AgentChanges, output_json: bool) -> Result<()> {
    let credentials = session()?;
    credentials.require_role(Role::Admin)?;
    if changes.is_empty() {
        return Err(DeskError::Other(
            "nothing to edit, pass --first-name, --email or --phone".to_string(),
        ));
    }

    let backend = backend()?;
    let mut agents = backend.fetch_agents(&credentials).await?;
    let mut edited = find_agent(&agents, id)?.clone();
    edited.apply(changes)?;

    let updated = backend.edit_agent(&edited, &credentials).await?;
    if !replace_agent(&mut agents, updated.clone()) {
        tracing::warn!("Edited agent {} is not in the listed roster", id);
    }

    let listed: Vec<&Agent> = agents.iter().collect();
    CommandOutput::new(json!({
        "agent": updated,
        "agents": agents,
    }))
    .with_text(format!(
        "Updated agent {} ({})\n{}",
        updated.display_name().cyan(),
        updated.email,
        format_agents_table(&listed)
    ))
    .print(output_json)
}

/// Delete the agent whose id is `id`
pub async fn cmd_delete_agent(id: &str, output_json: bool) -> Result<()> {
    let credentials = session()?;
    credentials.require_role(Role::Admin)?;

    let backend = backend()?;
    let agents = backend.fetch_agents(&credentials).await?;
    let agent = find_agent(&agents, id)?;

    backend.delete_agent(agent, &credentials).await?;

    CommandOutput::new(json!({
        "id": agent.id,
        "email": agent.email,
        "deleted": true,
    }))
    .with_text(format!(
        "Deleted agent {} ({})",
        agent.display_name().cyan(),
        agent.email
    ))
    .print(output_json)
}
