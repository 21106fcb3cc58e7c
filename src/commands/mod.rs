mod agents;
mod auth;
mod config;
mod notifications;
mod profile;
mod stats;
mod status;
mod tickets;
mod users;
mod view;

pub use agents::{cmd_agents, cmd_delete_agent, cmd_edit_agent};
pub use auth::{cmd_login, cmd_logout, cmd_reset_password, cmd_whoami};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use notifications::cmd_notifications;
pub use profile::{cmd_profile, cmd_update_profile};
pub use stats::{cmd_dashboard, cmd_my_stats};
pub use status::{cmd_reopen, cmd_resolve};
pub use tickets::{cmd_show, cmd_tickets};
pub use users::{CreateUserOptions, cmd_create_user};
pub use view::cmd_view;

use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::panel::{LoadState, TicketPanel};
use crate::remote::HttpBackend;
use crate::session::{Credentials, SessionStore};

/// Output of a command: a JSON document plus an optional human rendering.
///
/// With `--json` the document is printed; otherwise the text, falling back
/// to the document when no text was given.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output_json: bool) -> Result<()> {
        match self.text {
            Some(text) if !output_json => {
                println!("{}", text.trim_end_matches('\n'));
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

/// Pretty-print a JSON value to stdout
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn backend() -> Result<HttpBackend> {
    HttpBackend::from_config(&Config::load()?)
}

fn session() -> Result<Credentials> {
    SessionStore::default().require()
}

/// Mount a ticket panel for the stored session and load it once.
///
/// A failed load is left in the panel state for the caller to render.
async fn mounted_panel() -> Result<(TicketPanel<HttpBackend>, LoadState)> {
    let panel = TicketPanel::new(backend()?, session()?);
    let load = panel.mount().await;
    Ok((panel, load))
}
