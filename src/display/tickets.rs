//! Ticket list and ticket detail rendering

use owo_colors::OwoColorize;

use super::{format_instant, format_priority_colored, format_status_colored};
use crate::filter::{FilterBucket, FilterState};
use crate::panel::{LoadState, PanelState};
use crate::stats::TicketStats;
use crate::ticket::Ticket;
use crate::utils::{single_line, truncate_string};

/// Message for a loaded panel whose filter matches nothing
pub const EMPTY_STATE: &str = "No tickets match the selected filter";

const TITLE_WIDTH: usize = 48;

/// Filter buttons with their counts, the selected one highlighted
pub fn format_filter_bar(stats: &TicketStats, filter: &FilterState) -> String {
    FilterBucket::ALL
        .iter()
        .map(|bucket| {
            let label = format!("{} ({})", bucket.label(), stats.count_for(*bucket));
            if *bucket == filter.selected_filter() {
                format!("[{}]", label).bold().to_string()
            } else {
                format!(" {} ", label).dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-line summary of a ticket
pub fn format_ticket_line(ticket: &Ticket) -> String {
    let mut line = format!(
        "{} {} {} {}",
        format_status_colored(&ticket.status),
        ticket.id.cyan(),
        format_priority_colored(&ticket.priority),
        truncate_string(&single_line(ticket.title()), TITLE_WIDTH)
    );
    if !ticket.category.trim().is_empty() {
        line.push_str(&format!(" {}", format!("#{}", ticket.category).dimmed()));
    }
    if ticket.is_malformed() {
        line.push_str(&format!(" {}", "(incomplete record)".yellow()));
    }
    line
}

/// Labels of the transition controls offered for a ticket
pub fn format_actions(ticket: &Ticket) -> String {
    let actions = ticket.available_actions();
    if actions.is_empty() {
        return "none".to_string();
    }
    actions
        .iter()
        .map(|a| a.verb())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Full ticket view with replies and attachments
pub fn format_ticket_detail(ticket: &Ticket) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", ticket.title().bold()));
    out.push_str(&format!("ID:       {}\n", ticket.id.cyan()));
    out.push_str(&format!(
        "Status:   {}\n",
        format_status_colored(&ticket.status)
    ));
    out.push_str(&format!(
        "Priority: {}\n",
        format_priority_colored(&ticket.priority)
    ));
    if !ticket.category.trim().is_empty() {
        out.push_str(&format!("Category: {}\n", ticket.category));
    }
    out.push_str(&format!(
        "Created:  {}\n",
        format_instant(ticket.created_at.as_deref())
    ));
    out.push_str(&format!(
        "Updated:  {}\n",
        format_instant(ticket.updated_at.as_deref())
    ));
    if let Some(assignee) = &ticket.assigned_to {
        out.push_str(&format!("Assigned: {}\n", assignee));
    }
    out.push_str(&format!("Actions:  {}\n", format_actions(ticket)));

    out.push('\n');
    out.push_str(ticket.description());
    out.push('\n');

    if !ticket.attachments.is_empty() {
        out.push_str(&format!("\n{}\n", "Attachments".bold()));
        for name in &ticket.attachments {
            out.push_str(&format!("  - {}\n", name));
        }
    }

    if !ticket.replies.is_empty() {
        out.push_str(&format!("\n{}\n", "Replies".bold()));
        for (i, reply) in ticket.replies.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, reply));
        }
    }

    out
}

/// Render a ticket panel: filter bar, then the list or its loading, failed or
/// empty state.
pub fn render_ticket_panel(state: &PanelState) -> String {
    let mut out = String::new();

    out.push_str(&format_filter_bar(&state.stats, &state.filter));
    let skipped = state.skipped_records();
    if skipped > 0 {
        out.push_str(&format!(
            " {}",
            format!(
                "({} of {} records skipped, no ticket id)",
                skipped,
                state.stats.all + skipped
            )
            .yellow()
        ));
    }
    out.push('\n');

    let term = state.filter.search_term().trim();
    if !term.is_empty() {
        out.push_str(&format!("Search: \"{}\"\n", term));
    }
    out.push('\n');

    match &state.load {
        LoadState::Idle | LoadState::Loading => {
            out.push_str(&format!("{}\n", "Loading tickets...".dimmed()));
        }
        LoadState::Failed(message) => {
            out.push_str(&format!(
                "{} {}\n",
                "Failed to load tickets:".red(),
                message
            ));
            out.push_str("Run the command again to retry.\n");
        }
        LoadState::Loaded => {
            if state.is_refreshing() {
                out.push_str(&format!("{}\n", "Refreshing...".dimmed()));
            }
            let visible = state.visible_tickets();
            if visible.is_empty() {
                out.push_str(&format!("{}\n", EMPTY_STATE.dimmed()));
            } else {
                for ticket in visible {
                    out.push_str(&format_ticket_line(ticket));
                    out.push('\n');
                }
            }

            if !state.stats.is_reconciled() {
                out.push_str(&format!(
                    "\n{}\n",
                    format!(
                        "{} ticket(s) with an unrecognized status are only counted in All",
                        state.stats.unknown()
                    )
                    .yellow()
                ));
            }
            if !state.warnings.is_empty() {
                out.push_str(&format!(
                    "{}\n",
                    format!(
                        "{} record warning(s), rerun with RUST_LOG=warn for details",
                        state.warnings.len()
                    )
                    .dimmed()
                ));
            }
        }
    }

    out
}
