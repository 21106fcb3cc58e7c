//! Ticket status transitions.
//!
//! The client can move a ticket in exactly two directions: resolve closes a
//! NEW or OPEN ticket, reopen moves a CLOSED ticket back to OPEN. NEW is never
//! a client-settable target. Tickets with an unrecognized status are offered
//! nothing.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{DeskError, Result};
use crate::ticket::{Ticket, TicketId};
use crate::types::TicketStatus;

/// A status change the client may request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketAction {
    Resolve,
    Reopen,
}

const RESOLVE_ONLY: &[TicketAction] = &[TicketAction::Resolve];
const REOPEN_ONLY: &[TicketAction] = &[TicketAction::Reopen];
const NONE: &[TicketAction] = &[];

impl TicketAction {
    /// Status the backend is asked to set
    pub fn target_status(&self) -> TicketStatus {
        match self {
            TicketAction::Resolve => TicketStatus::Closed,
            TicketAction::Reopen => TicketStatus::Open,
        }
    }

    pub fn is_offered_for(&self, status: &TicketStatus) -> bool {
        available_actions(status).contains(self)
    }

    pub fn verb(&self) -> &'static str {
        match self {
            TicketAction::Resolve => "resolve",
            TicketAction::Reopen => "reopen",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            TicketAction::Resolve => "resolved",
            TicketAction::Reopen => "reopened",
        }
    }
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.verb())
    }
}

impl FromStr for TicketAction {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "resolve" => Ok(TicketAction::Resolve),
            "reopen" => Ok(TicketAction::Reopen),
            other => Err(DeskError::Other(format!(
                "unknown action '{other}', expected 'resolve' or 'reopen'"
            ))),
        }
    }
}

/// Actions to offer for a ticket in `status`
pub fn available_actions(status: &TicketStatus) -> &'static [TicketAction] {
    match status {
        TicketStatus::New | TicketStatus::Open => RESOLVE_ONLY,
        TicketStatus::Closed => REOPEN_ONLY,
        TicketStatus::Unknown(_) => NONE,
    }
}

/// A validated status change for one ticket.
///
/// Only constructible through [`TransitionRequest::for_ticket`], so a request
/// always carries an action that was offered for the ticket's status at the
/// time it was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    ticket_id: TicketId,
    action: TicketAction,
    reply: Option<String>,
}

impl TransitionRequest {
    pub fn for_ticket(ticket: &Ticket, action: TicketAction, reply: Option<String>) -> Result<Self> {
        if !action.is_offered_for(&ticket.status) {
            return Err(DeskError::TransitionNotOffered {
                id: ticket.id.to_string(),
                action: action.verb().to_string(),
                status: ticket.status.to_string(),
            });
        }

        let reply = reply.filter(|r| !r.trim().is_empty());

        Ok(Self {
            ticket_id: ticket.id.clone(),
            action,
            reply,
        })
    }

    pub fn ticket_id(&self) -> &TicketId {
        &self.ticket_id
    }

    pub fn action(&self) -> TicketAction {
        self.action
    }

    pub fn target_status(&self) -> TicketStatus {
        self.action.target_status()
    }

    pub fn reply(&self) -> Option<&str> {
        self.reply.as_deref()
    }
}
