pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod navigation;
pub mod panel;
pub mod paths;
pub mod remote;
pub mod session;
pub mod stats;
pub mod ticket;
pub mod toast;
pub mod transition;
pub mod types;
pub mod utils;

pub use config::Config;
pub use error::{DeskError, Result};
pub use filter::{FilterBucket, FilterState, apply_filter};
pub use navigation::{Navigation, Panel};
pub use panel::{
    LoadState, PanelAction, PanelState, TicketPanel, TransitionOutcome, reduce_panel_state,
};
pub use remote::{ApiError, HttpBackend, TicketBackend};
pub use session::{Credentials, SessionStore};
pub use stats::{AgentStats, PriorityCounts, TicketStats};
pub use ticket::{ParsedTickets, RecordWarning, Ticket, TicketId, parse_tickets};
pub use toast::{Toast, ToastLevel};
pub use transition::{TicketAction, TransitionRequest, available_actions};
pub use types::{Priority, Role, TicketStatus};
