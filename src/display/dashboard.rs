//! Dashboard-level views: sidebar, admin overview, agent roster and agent
//! statistics.

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{format_bar, format_instant};
use crate::navigation::Navigation;
use crate::remote::{Agent, Profile};
use crate::stats::{AgentStats, PriorityCounts, TicketStats};

const BAR_WIDTH: usize = 24;

/// Sidebar entries for the role, the current panel marked
pub fn format_sidebar(nav: &Navigation) -> String {
    let mut out = format!("{} dashboard\n", nav.role().to_string().bold());
    for panel in nav.role().panels() {
        if nav.is_active(*panel) {
            out.push_str(&format!("{} {}\n", ">".cyan(), panel.name().bold()));
        } else {
            out.push_str(&format!("  {}\n", panel.name()));
        }
    }
    out
}

/// Admin overview: status counts and the priority mix
pub fn format_dashboard(stats: &TicketStats, priorities: &PriorityCounts) -> String {
    let mut out = format!("{}\n", "Tickets by status".bold());
    let rows = [
        ("All", stats.all),
        ("New", stats.new),
        ("Open", stats.open),
        ("Closed", stats.closed),
    ];
    for (label, count) in rows {
        out.push_str(&format!(
            "  {:<8} {:>5}  {}\n",
            label,
            count,
            format_bar(count, stats.all, BAR_WIDTH)
        ));
    }
    if stats.unknown() > 0 {
        out.push_str(&format!(
            "  {:<8} {:>5}\n",
            "Other".yellow(),
            stats.unknown()
        ));
    }

    out.push_str(&format!("\n{}\n", "Tickets by priority".bold()));
    for (label, count) in priorities.rows() {
        out.push_str(&format!(
            "  {:<8} {:>5}  {}\n",
            label,
            count,
            format_bar(count, stats.all, BAR_WIDTH)
        ));
    }
    out
}

#[derive(Tabled)]
struct AgentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Joined")]
    joined: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Agent roster as a table
pub fn format_agents_table(agents: &[&Agent]) -> String {
    let rows: Vec<AgentRow> = agents
        .iter()
        .map(|agent| AgentRow {
            id: agent.id.clone().unwrap_or_else(|| "-".to_string()),
            name: agent.display_name().to_string(),
            username: agent.username.clone(),
            email: agent.email.clone(),
            role: agent.role.clone(),
            joined: format_instant(agent.local_date.as_deref()),
            location: agent.location(),
            status: if agent.enabled { "Active" } else { "Inactive" }.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Contact details, blank fields shown as a dash
pub fn format_profile(profile: &Profile) -> String {
    let rows = [
        ("Name", &profile.name),
        ("Email", &profile.email),
        ("Phone", &profile.phone),
        ("Address", &profile.address),
        ("City", &profile.city),
        ("State", &profile.state),
        ("ZIP", &profile.zip),
        ("Country", &profile.country),
    ];
    let mut out = format!("{}
", "Profile".bold());
    for (label, value) in rows {
        let value = if value.trim().is_empty() {
            "-".dimmed().to_string()
        } else {
            value.to_string()
        };
        out.push_str(&format!("  {:<8} {}
", label, value));
    }
    out
}

/// Solved versus received tickets per period
pub fn format_agent_stats(stats: &AgentStats) -> String {
    let mut out = format!("{}\n", "Ticket performance".bold());
    for period in stats.periods() {
        let rate = period
            .solve_rate()
            .map(|r| format!("{r}%"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:<8} {:>4} / {:<4} {}  {}\n",
            period.label,
            period.solved,
            period.total,
            format_bar(period.solved as usize, period.total as usize, BAR_WIDTH),
            rate
        ));
    }
    out
}
