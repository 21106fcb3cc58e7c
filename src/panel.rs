//! Ticket panel state and controller.
//!
//! `PanelState` is changed only by `reduce_panel_state`, a pure function of
//! the current state and a `PanelAction`. `TicketPanel` owns one state cell,
//! performs the backend I/O, and feeds the results back in as actions.
//!
//! Fetches are not de-duplicated: each response replaces the ticket list when
//! it arrives, so the last response to arrive wins. Responses that arrive
//! after the panel was unmounted, or that belong to an earlier mount, are
//! dropped.

use parking_lot::Mutex;

use crate::error::{DeskError, Result};
use crate::filter::{FilterBucket, FilterState};
use crate::remote::TicketBackend;
use crate::session::Credentials;
use crate::stats::TicketStats;
use crate::ticket::{ParsedTickets, RecordWarning, Ticket, TicketId};
use crate::toast::Toast;
use crate::transition::{TicketAction, TransitionRequest};

/// Progress of the ticket collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// First fetch outstanding, nothing to show yet
    Loading,
    Loaded,
    /// Last fetch failed; the list is empty and a retry is possible
    Failed(String),
}

impl LoadState {
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

/// Everything a ticket panel renders
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    pub mounted: bool,
    /// Incremented on every mount. Fetch results carry the generation they
    /// were started under.
    pub generation: u64,
    pub load: LoadState,
    /// Fetches started and not yet answered
    pub in_flight: usize,
    pub tickets: Vec<Ticket>,
    pub stats: TicketStats,
    pub warnings: Vec<RecordWarning>,
    pub filter: FilterState,
    pub toast: Option<Toast>,
}

impl PanelState {
    /// Tickets passing the current filter, in collection order
    pub fn visible_tickets(&self) -> Vec<&Ticket> {
        self.filter.apply(&self.tickets)
    }

    /// Loaded, but nothing passes the filter
    pub fn is_empty_state(&self) -> bool {
        self.load == LoadState::Loaded && self.visible_tickets().is_empty()
    }

    /// A fetch is outstanding while an earlier result is on screen
    pub fn is_refreshing(&self) -> bool {
        self.in_flight > 0
    }

    /// Records of the last response dropped for lacking a usable id
    pub fn skipped_records(&self) -> usize {
        self.warnings.iter().filter(|w| w.is_skip()).count()
    }

    pub fn find(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| &t.id == id)
    }
}

/// All state changes a ticket panel accepts
#[derive(Debug, Clone)]
pub enum PanelAction {
    /// Start a fresh mount: default filter, empty list
    Mount,
    Unmount,
    FetchStarted,
    TicketsLoaded {
        generation: u64,
        parsed: ParsedTickets,
    },
    FetchFailed {
        generation: u64,
        message: String,
    },
    SetFilter(FilterBucket),
    SetSearch(String),
    TransitionSucceeded {
        ticket_id: TicketId,
        action: TicketAction,
    },
    TransitionFailed {
        ticket_id: TicketId,
        action: TicketAction,
        message: String,
    },
    DismissToast,
}

/// Apply `action` to `state`.
///
/// Pure: no I/O. While unmounted only `Mount` has an effect.
pub fn reduce_panel_state(mut state: PanelState, action: PanelAction) -> PanelState {
    if !state.mounted && !matches!(action, PanelAction::Mount) {
        return state;
    }

    match action {
        PanelAction::Mount => {
            state = PanelState {
                mounted: true,
                generation: state.generation + 1,
                ..PanelState::default()
            };
        }
        PanelAction::Unmount => {
            state.mounted = false;
            state.in_flight = 0;
        }
        PanelAction::FetchStarted => {
            state.in_flight += 1;
            if state.load != LoadState::Loaded {
                state.load = LoadState::Loading;
            }
        }
        PanelAction::TicketsLoaded { generation, parsed } => {
            if generation != state.generation {
                return state;
            }
            state.in_flight = state.in_flight.saturating_sub(1);
            state.stats = TicketStats::from_tickets(&parsed.tickets);
            state.tickets = parsed.tickets;
            state.warnings = parsed.warnings;
            state.load = LoadState::Loaded;
        }
        PanelAction::FetchFailed {
            generation,
            message,
        } => {
            if generation != state.generation {
                return state;
            }
            state.in_flight = state.in_flight.saturating_sub(1);
            state.tickets.clear();
            state.warnings.clear();
            state.stats = TicketStats::default();
            state.load = LoadState::Failed(message);
        }
        PanelAction::SetFilter(bucket) => state.filter.set_filter(bucket),
        PanelAction::SetSearch(term) => state.filter.set_search_term(term),
        PanelAction::TransitionSucceeded { ticket_id, action } => {
            state.toast = Some(Toast::success(format!(
                "Ticket {} {}",
                ticket_id,
                action.past_tense()
            )));
        }
        PanelAction::TransitionFailed {
            ticket_id,
            action,
            message,
        } => {
            state.toast = Some(Toast::error(format!(
                "Could not {} ticket {}: {}",
                action.verb(),
                ticket_id,
                message
            )));
        }
        PanelAction::DismissToast => state.toast = None,
    }

    state
}

/// Result of a transition attempt that reached the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Accepted by the backend; the collection has been refetched
    Applied,
    /// Rejected or unreachable; the ticket list is unchanged
    Failed(String),
}

/// Drives one ticket panel against a backend
pub struct TicketPanel<B: TicketBackend> {
    backend: B,
    credentials: Credentials,
    state: Mutex<PanelState>,
}

impl<B: TicketBackend> TicketPanel<B> {
    pub fn new(backend: B, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
            state: Mutex::new(PanelState::default()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn dispatch(&self, action: PanelAction) {
        let mut state = self.state.lock();
        let current = std::mem::take(&mut *state);
        *state = reduce_panel_state(current, action);
    }

    /// A copy of the current state, for rendering
    pub fn snapshot(&self) -> PanelState {
        self.state.lock().clone()
    }

    /// Mount the panel and load the collection
    pub async fn mount(&self) -> LoadState {
        self.dispatch(PanelAction::Mount);
        self.refresh().await
    }

    pub fn unmount(&self) {
        self.dispatch(PanelAction::Unmount);
    }

    pub fn set_filter(&self, bucket: FilterBucket) {
        self.dispatch(PanelAction::SetFilter(bucket));
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.dispatch(PanelAction::SetSearch(term.into()));
    }

    /// Fetch the collection and replace the panel's tickets with it.
    ///
    /// Backend failures become `LoadState::Failed`; they are never returned.
    pub async fn refresh(&self) -> LoadState {
        let generation = {
            let state = self.state.lock();
            if !state.mounted {
                return state.load.clone();
            }
            state.generation
        };
        self.dispatch(PanelAction::FetchStarted);

        let action = match self.backend.fetch_tickets(&self.credentials).await {
            Ok(parsed) => PanelAction::TicketsLoaded { generation, parsed },
            Err(e) => {
                tracing::warn!("Ticket fetch failed: {e}");
                PanelAction::FetchFailed {
                    generation,
                    message: e.to_string(),
                }
            }
        };

        {
            let state = self.state.lock();
            if !state.mounted || state.generation != generation {
                tracing::warn!("Ignoring ticket response for a panel that is no longer mounted");
                return state.load.clone();
            }
        }

        self.dispatch(action);
        self.state.lock().load.clone()
    }

    /// Resolve or reopen a ticket, then refetch on success.
    ///
    /// Returns an error only when the request was never sent: the ticket is
    /// not in the panel, or `action` is not offered for its status.
    pub async fn request_transition(
        &self,
        ticket_id: &TicketId,
        action: TicketAction,
        reply: Option<String>,
    ) -> Result<TransitionOutcome> {
        let request = {
            let state = self.state.lock();
            let ticket = state
                .find(ticket_id)
                .ok_or_else(|| DeskError::TicketNotFound(ticket_id.to_string()))?;
            TransitionRequest::for_ticket(ticket, action, reply)?
        };

        match self.backend.update_ticket(&request, &self.credentials).await {
            Ok(()) => {
                self.dispatch(PanelAction::TransitionSucceeded {
                    ticket_id: ticket_id.clone(),
                    action,
                });
                self.refresh().await;
                Ok(TransitionOutcome::Applied)
            }
            Err(e) => {
                tracing::warn!("Failed to {} ticket {}: {}", action.verb(), ticket_id, e);
                let message = e.to_string();
                self.dispatch(PanelAction::TransitionFailed {
                    ticket_id: ticket_id.clone(),
                    action,
                    message: message.clone(),
                });
                Ok(TransitionOutcome::Failed(message))
            }
        }
    }
}
