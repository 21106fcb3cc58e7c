//! Dashboard view command (`ticketdesk view`)
//!
//! Prints the role's sidebar, then the selected panel. Unknown panel names
//! and panels the role does not have fall back to the role's default panel.
//! Without a session the configured `default_role` picks the sidebar, and
//! panels are listed but not loaded.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{
    CommandOutput, cmd_agents, cmd_config_show, cmd_dashboard, cmd_my_stats, cmd_notifications,
    cmd_profile, cmd_tickets,
};
use crate::config::Config;
use crate::display::format_sidebar;
use crate::error::{DeskError, Result};
use crate::filter::FilterBucket;
use crate::navigation::{Navigation, Panel};
use crate::session::SessionStore;
use crate::types::Role;

/// Role from the stored session, else the configured default.
///
/// The flag is true when a session exists.
fn view_role() -> Result<(Role, bool)> {
    if let Some(credentials) = SessionStore::default().load()? {
        return Ok((credentials.role, true));
    }
    match Config::load()?.default_role {
        Some(role) => Ok((role, false)),
        None => Err(DeskError::NotLoggedIn),
    }
}

pub async fn cmd_view(page: Option<&str>, output_json: bool) -> Result<()> {
    let (role, logged_in) = view_role()?;
    let mut nav = Navigation::new(role);
    if let Some(page) = page {
        nav.select_page(page);
    }

    if output_json {
        let panels: Vec<&str> = nav.role().panels().iter().map(|p| p.name()).collect();
        return CommandOutput::new(json!({
            "role": nav.role(),
            "panel": nav.current(),
            "panels": panels,
            "logged_in": logged_in,
        }))
        .print(true);
    }

    println!("{}", format_sidebar(&nav));

    if !logged_in && nav.current() != Panel::Settings {
        println!(
            "Log in with {} to load this panel",
            "ticketdesk login <email>".cyan()
        );
        return Ok(());
    }

    match nav.current() {
        Panel::Dashboard => cmd_dashboard(false).await,
        Panel::Tickets => cmd_tickets(FilterBucket::All, None, false).await,
        Panel::Agents => cmd_agents(None, false).await,
        Panel::Statistics => cmd_my_stats(false).await,
        Panel::Notifications => cmd_notifications(false).await,
        Panel::UpdateProfile => cmd_profile(false).await,
        Panel::CreateUser => {
            println!(
                "Create an account with {}",
                "ticketdesk create-user --help".cyan()
            );
            Ok(())
        }
        Panel::Settings => cmd_config_show(false),
    }
}
