use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use ticketdesk::error::{DeskError, Result};
use ticketdesk::filter::FilterBucket;
use ticketdesk::panel::{LoadState, TicketPanel, TransitionOutcome};
use ticketdesk::remote::TicketBackend;
use ticketdesk::session::Credentials;
use ticketdesk::ticket::{ParsedTickets, Ticket, TicketId};
use ticketdesk::transition::{TicketAction, TransitionRequest};
use ticketdesk::types::{Role, TicketStatus};

struct Fetch {
    gate: Option<Arc<Notify>>,
    result: std::result::Result<Vec<Ticket>, String>,
}

/// Backend answering fetches from a script, in call order
#[derive(Default)]
struct ScriptedBackend {
    fetches: Mutex<VecDeque<Fetch>>,
    fetch_calls: AtomicUsize,
    updates: Mutex<Vec<(TicketId, TicketStatus, Option<String>)>>,
    update_error: Option<String>,
}

impl ScriptedBackend {
    fn then_tickets(self, tickets: Vec<Ticket>) -> Self {
        self.fetches.lock().push_back(Fetch {
            gate: None,
            result: Ok(tickets),
        });
        self
    }

    fn then_gated(self, gate: Arc<Notify>, tickets: Vec<Ticket>) -> Self {
        self.fetches.lock().push_back(Fetch {
            gate: Some(gate),
            result: Ok(tickets),
        });
        self
    }

    fn then_error(self, message: &str) -> Self {
        self.fetches.lock().push_back(Fetch {
            gate: None,
            result: Err(message.to_string()),
        });
        self
    }

    fn failing_updates(mut self, message: &str) -> Self {
        self.update_error = Some(message.to_string());
        self
    }

    fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

impl TicketBackend for ScriptedBackend {
    async fn fetch_tickets(&self, _credentials: &Credentials) -> Result<ParsedTickets> {
        let next = self.fetches.lock().pop_front();
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let Some(fetch) = next else {
            return Err(DeskError::Api("no scripted response".to_string()));
        };
        if let Some(gate) = fetch.gate {
            gate.notified().await;
        }
        fetch.result.map(ParsedTickets::from).map_err(DeskError::Api)
    }

    async fn update_ticket(
        &self,
        request: &TransitionRequest,
        _credentials: &Credentials,
    ) -> Result<()> {
        self.updates.lock().push((
            request.ticket_id().clone(),
            request.target_status(),
            request.reply().map(str::to_string),
        ));
        match &self.update_error {
            Some(message) => Err(DeskError::Api(message.clone())),
            None => Ok(()),
        }
    }
}

fn agent() -> Credentials {
    Credentials::new("ana@example.com", "tok", Role::Agent)
}

fn inbox() -> Vec<Ticket> {
    vec![
        Ticket::new("1", TicketStatus::New).with_subject("Printer jam"),
        Ticket::new("2", TicketStatus::Open).with_subject("VPN drops"),
        Ticket::new("3", TicketStatus::Closed).with_subject("Password reset"),
    ]
}

fn with_status(tickets: &[Ticket], id: &str, status: TicketStatus) -> Vec<Ticket> {
    tickets
        .iter()
        .cloned()
        .map(|mut t| {
            if t.id.as_str() == id {
                t.status = status.clone();
            }
            t
        })
        .collect()
}

#[tokio::test]
async fn test_mount_loads_and_counts() {
    let panel = TicketPanel::new(ScriptedBackend::default().then_tickets(inbox()), agent());
    assert_eq!(panel.mount().await, LoadState::Loaded);

    let state = panel.snapshot();
    assert_eq!(state.stats.all, 3);
    assert_eq!(state.stats.new, 1);
    assert_eq!(state.stats.open, 1);
    assert_eq!(state.stats.closed, 1);
    assert_eq!(state.filter.selected_filter(), FilterBucket::All);
}

#[tokio::test]
async fn test_mount_failure_shows_retry_state() {
    let backend = ScriptedBackend::default()
        .then_error("HTTP 503")
        .then_tickets(inbox());
    let panel = TicketPanel::new(backend, agent());

    let load = panel.mount().await;
    assert!(load.is_failed());
    assert!(panel.snapshot().tickets.is_empty());

    assert_eq!(panel.refresh().await, LoadState::Loaded);
    assert_eq!(panel.snapshot().tickets.len(), 3);
}

#[tokio::test]
async fn test_resolve_refetches_and_moves_counts() {
    let resolved = with_status(&inbox(), "1", TicketStatus::Closed);
    let backend = ScriptedBackend::default()
        .then_tickets(inbox())
        .then_tickets(resolved);
    let panel = TicketPanel::new(backend, agent());
    panel.mount().await;
    let before = panel.snapshot().stats;

    let outcome = panel
        .request_transition(&TicketId::new("1"), TicketAction::Resolve, None)
        .await
        .unwrap();
    assert_eq!(outcome, TransitionOutcome::Applied);

    let state = panel.snapshot();
    assert_eq!(state.stats.new, before.new - 1);
    assert_eq!(state.stats.closed, before.closed + 1);
    assert_eq!(state.stats.all, before.all);
    assert_eq!(
        state.find(&TicketId::new("1")).unwrap().status,
        TicketStatus::Closed
    );
    assert_eq!(state.toast.unwrap().message, "Ticket 1 resolved");

    assert_eq!(panel.backend().fetch_calls(), 2);
    let updates = panel.backend().updates.lock().clone();
    assert_eq!(
        updates,
        vec![(TicketId::new("1"), TicketStatus::Closed, None)]
    );
}

#[tokio::test]
async fn test_reopen_sends_open_with_reply() {
    let reopened = with_status(&inbox(), "3", TicketStatus::Open);
    let backend = ScriptedBackend::default()
        .then_tickets(inbox())
        .then_tickets(reopened);
    let panel = TicketPanel::new(backend, agent());
    panel.mount().await;

    panel
        .request_transition(
            &TicketId::new("3"),
            TicketAction::Reopen,
            Some("Customer wrote back".to_string()),
        )
        .await
        .unwrap();

    let updates = panel.backend().updates.lock().clone();
    assert_eq!(updates[0].1, TicketStatus::Open);
    assert_eq!(updates[0].2.as_deref(), Some("Customer wrote back"));
    assert_eq!(panel.snapshot().stats.open, 2);
}

#[tokio::test]
async fn test_failed_update_keeps_status_and_raises_toast() {
    let backend = ScriptedBackend::default()
        .then_tickets(inbox())
        .failing_updates("HTTP 500 Internal Server Error");
    let panel = TicketPanel::new(backend, agent());
    panel.mount().await;

    let outcome = panel
        .request_transition(&TicketId::new("2"), TicketAction::Resolve, None)
        .await
        .unwrap();
    assert!(matches!(outcome, TransitionOutcome::Failed(_)));

    let state = panel.snapshot();
    let toast = state.toast.as_ref().unwrap();
    assert!(toast.is_error());
    assert!(toast.message.starts_with("Could not resolve ticket 2"));
    assert_eq!(
        state.find(&TicketId::new("2")).unwrap().status,
        TicketStatus::Open
    );
    assert_eq!(panel.backend().fetch_calls(), 1);
}

#[tokio::test]
async fn test_transition_not_offered_is_never_sent() {
    let panel = TicketPanel::new(ScriptedBackend::default().then_tickets(inbox()), agent());
    panel.mount().await;

    let err = panel
        .request_transition(&TicketId::new("2"), TicketAction::Reopen, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DeskError::TransitionNotOffered { .. }));

    let err = panel
        .request_transition(&TicketId::new("99"), TicketAction::Resolve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DeskError::TicketNotFound(_)));

    assert!(panel.backend().updates.lock().is_empty());
}

#[tokio::test]
async fn test_unknown_status_offers_no_action() {
    let tickets = vec![Ticket::new("7", TicketStatus::parse("ESCALATED"))];
    let panel = TicketPanel::new(ScriptedBackend::default().then_tickets(tickets), agent());
    panel.mount().await;

    for action in [TicketAction::Resolve, TicketAction::Reopen] {
        let result = panel
            .request_transition(&TicketId::new("7"), action, None)
            .await;
        assert!(result.is_err());
    }
    assert_eq!(panel.snapshot().stats.all, 1);
    assert_eq!(panel.snapshot().stats.unknown(), 1);
}

#[tokio::test]
async fn test_response_after_unmount_is_ignored() {
    let gate = Arc::new(Notify::new());
    let backend = ScriptedBackend::default()
        .then_tickets(inbox())
        .then_gated(gate.clone(), Vec::new());
    let panel = TicketPanel::new(backend, agent());
    panel.mount().await;

    let (load, ()) = tokio::join!(panel.refresh(), async {
        while panel.backend().fetch_calls() < 2 {
            tokio::task::yield_now().await;
        }
        panel.unmount();
        gate.notify_one();
    });

    assert_eq!(load, LoadState::Loaded);
    let state = panel.snapshot();
    assert!(!state.mounted);
    assert_eq!(state.tickets.len(), 3);
}

#[tokio::test]
async fn test_last_response_to_arrive_wins() {
    let first_gate = Arc::new(Notify::new());
    let second_gate = Arc::new(Notify::new());
    let older = vec![Ticket::new("old", TicketStatus::New)];
    let newer = vec![
        Ticket::new("a", TicketStatus::Open),
        Ticket::new("b", TicketStatus::Open),
    ];
    let backend = ScriptedBackend::default()
        .then_tickets(Vec::new())
        .then_gated(first_gate.clone(), older)
        .then_gated(second_gate.clone(), newer);
    let panel = TicketPanel::new(backend, agent());
    panel.mount().await;

    tokio::join!(panel.refresh(), panel.refresh(), async {
        while panel.backend().fetch_calls() < 3 {
            tokio::task::yield_now().await;
        }
        second_gate.notify_one();
        while panel.snapshot().in_flight > 1 {
            tokio::task::yield_now().await;
        }
        first_gate.notify_one();
    });

    let state = panel.snapshot();
    assert_eq!(state.in_flight, 0);
    assert_eq!(state.tickets.len(), 1);
    assert_eq!(state.tickets[0].id.as_str(), "old");
}

#[tokio::test]
async fn test_filter_survives_refetch() {
    let backend = ScriptedBackend::default()
        .then_tickets(inbox())
        .then_tickets(inbox());
    let panel = TicketPanel::new(backend, agent());
    panel.mount().await;

    panel.set_filter(FilterBucket::Closed);
    panel.set_search_term("PASSWORD");
    assert_eq!(panel.snapshot().visible_tickets().len(), 1);

    panel.refresh().await;
    let state = panel.snapshot();
    assert_eq!(state.filter.selected_filter(), FilterBucket::Closed);
    assert_eq!(state.visible_tickets().len(), 1);
    assert_eq!(state.stats.all, 3);
}
