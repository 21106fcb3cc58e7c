//! Panel selection for the role-based dashboards
//!
//! Each role has a fixed set of panels and a default one. Selecting a name
//! that is not one of the role's panels lands on the default instead of an
//! empty view.

use std::fmt;

use serde::Serialize;

use crate::types::Role;

/// A named view inside a dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Panel {
    Dashboard,
    Tickets,
    Agents,
    Statistics,
    Notifications,
    UpdateProfile,
    CreateUser,
    Settings,
}

const ADMIN_PANELS: &[Panel] = &[
    Panel::Dashboard,
    Panel::Tickets,
    Panel::Agents,
    Panel::CreateUser,
    Panel::Settings,
];

const AGENT_PANELS: &[Panel] = &[
    Panel::Tickets,
    Panel::Statistics,
    Panel::Notifications,
    Panel::UpdateProfile,
    Panel::Settings,
];

impl Panel {
    pub const ALL: [Panel; 8] = [
        Panel::Dashboard,
        Panel::Tickets,
        Panel::Agents,
        Panel::Statistics,
        Panel::Notifications,
        Panel::UpdateProfile,
        Panel::CreateUser,
        Panel::Settings,
    ];

    /// Sidebar label
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Dashboard => "Dashboard",
            Panel::Tickets => "Tickets",
            Panel::Agents => "Agents",
            Panel::Statistics => "Statistics",
            Panel::Notifications => "Notifications",
            Panel::UpdateProfile => "Update Profile",
            Panel::CreateUser => "Create User",
            Panel::Settings => "Settings",
        }
    }

    /// Match a panel name ignoring case, spaces, dashes and underscores.
    pub fn parse(name: &str) -> Option<Panel> {
        let key = normalize(name);
        if key.is_empty() {
            return None;
        }
        Panel::ALL
            .into_iter()
            .find(|panel| normalize(panel.name()) == key)
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Role {
    pub fn default_panel(&self) -> Panel {
        match self {
            Role::Admin => Panel::Dashboard,
            Role::Agent => Panel::Tickets,
        }
    }

    /// Panels listed in the sidebar, in display order
    pub fn panels(&self) -> &'static [Panel] {
        match self {
            Role::Admin => ADMIN_PANELS,
            Role::Agent => AGENT_PANELS,
        }
    }

    pub fn offers(&self, panel: Panel) -> bool {
        self.panels().contains(&panel)
    }
}

/// Currently active panel of a dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    role: Role,
    current: Panel,
}

impl Navigation {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            current: role.default_panel(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn current(&self) -> Panel {
        self.current
    }

    /// Switch to the panel called `name`.
    ///
    /// Never fails: an unrecognized name, or a panel this role does not have,
    /// selects the role's default panel. Returns the panel now current.
    pub fn select_page(&mut self, name: &str) -> Panel {
        let panel = match Panel::parse(name) {
            Some(panel) if self.role.offers(panel) => panel,
            _ => {
                tracing::debug!(
                    "No {} panel named '{}', showing {}",
                    self.role,
                    name,
                    self.role.default_panel()
                );
                self.role.default_panel()
            }
        };
        self.current = panel;
        panel
    }

    /// Switch to `panel`, with the same fallback as `select_page`.
    pub fn select(&mut self, panel: Panel) -> Panel {
        self.current = if self.role.offers(panel) {
            panel
        } else {
            self.role.default_panel()
        };
        self.current
    }

    pub fn is_active(&self, panel: Panel) -> bool {
        self.current == panel
    }
}
