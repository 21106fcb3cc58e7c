//! Ticket record model and the backend boundary.
//!
//! The backend returns loosely shaped JSON. `RawTicket` accepts whatever
//! arrives, and `parse_tickets` validates each record into the strict
//! `Ticket` type. Anomalies become `RecordWarning`s and display placeholders
//! instead of nulls flowing into rendering.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{DeskError, Result};
use crate::transition::{TicketAction, available_actions};
use crate::types::{Priority, TicketStatus};

/// Placeholder shown for a ticket without a subject
pub const UNTITLED: &str = "Untitled";

/// Placeholder shown for a ticket without a body
pub const NO_DESCRIPTION: &str = "No description";

/// Opaque ticket identifier. Integer ids from the backend are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    pub fn new(id: impl Into<String>) -> Self {
        TicketId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(TicketId(s.trim().to_string())),
            Value::Number(n) => Some(TicketId(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TicketId {
    fn from(id: &str) -> Self {
        TicketId::new(id)
    }
}

impl AsRef<str> for TicketId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A support ticket after boundary validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub category: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub attachments: Vec<String>,
    /// Agent replies in insertion order. Never edited by the client.
    pub replies: Vec<String>,
    pub assigned_to: Option<String>,
}

impl Ticket {
    pub fn new(id: impl Into<String>, status: TicketStatus) -> Self {
        Self {
            id: TicketId::new(id),
            subject: None,
            content: None,
            category: String::new(),
            priority: Priority::default(),
            status,
            created_at: None,
            updated_at: None,
            attachments: Vec::new(),
            replies: Vec::new(),
            assigned_to: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Subject for display, or the "Untitled" placeholder.
    pub fn title(&self) -> &str {
        non_blank(self.subject.as_deref()).unwrap_or(UNTITLED)
    }

    /// Body for display, or the "No description" placeholder.
    pub fn description(&self) -> &str {
        non_blank(self.content.as_deref()).unwrap_or(NO_DESCRIPTION)
    }

    /// Transition controls to offer for the ticket's current status.
    pub fn available_actions(&self) -> &'static [TicketAction] {
        available_actions(&self.status)
    }

    /// True when the record needs placeholders or has an unrecognized status.
    pub fn is_malformed(&self) -> bool {
        !self.status.is_known()
            || non_blank(self.subject.as_deref()).is_none()
            || non_blank(self.content.as_deref()).is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Ticket JSON as the backend sends it, with every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTicket {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub launch_timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub attachments: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub replies: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub assigned_to: Option<String>,
}

/// Accept any scalar where text is expected.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| scalar_text(&v)))
}

/// Accept null, a single string, or an array of scalars.
fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl RawTicket {
    /// Validate into a `Ticket`, returning the problems found along the way.
    ///
    /// Only a missing or unusable `id` is fatal: without it the record cannot
    /// be keyed in a list.
    pub fn validate(self) -> std::result::Result<(Ticket, Vec<String>), String> {
        let id = self
            .id
            .as_ref()
            .and_then(TicketId::from_value)
            .ok_or_else(|| "missing ticket id".to_string())?;

        let mut problems = Vec::new();

        let status = match self.status.as_deref() {
            Some(raw) => TicketStatus::parse(raw),
            None => TicketStatus::default(),
        };
        if !status.is_known() {
            problems.push(format!("unrecognized status '{}'", status.as_str()));
        }
        if non_blank(self.subject.as_deref()).is_none() {
            problems.push("missing subject".to_string());
        }
        if non_blank(self.content.as_deref()).is_none() {
            problems.push("missing content".to_string());
        }

        let ticket = Ticket {
            id,
            subject: self.subject,
            content: self.content,
            category: self.category.unwrap_or_default(),
            priority: self
                .priority
                .as_deref()
                .map(Priority::parse)
                .unwrap_or_default(),
            status,
            created_at: self.launch_timestamp.or(self.created_at),
            updated_at: self.updated_at,
            attachments: self.attachments,
            replies: self.replies,
            assigned_to: self.assigned_to,
        };

        Ok((ticket, problems))
    }
}

/// A problem found while validating one record of a fetched collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordWarning {
    /// Position of the record in the backend response
    pub index: usize,
    pub id: Option<TicketId>,
    pub message: String,
}

impl RecordWarning {
    /// The record was dropped rather than kept with placeholders
    pub fn is_skip(&self) -> bool {
        self.id.is_none()
    }
}

impl fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "ticket {} (#{}): {}", id, self.index, self.message),
            None => write!(f, "record #{}: {}", self.index, self.message),
        }
    }
}

/// A validated ticket collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTickets {
    pub tickets: Vec<Ticket>,
    pub warnings: Vec<RecordWarning>,
}

impl ParsedTickets {
    /// Records in the backend response that were dropped
    pub fn skipped(&self) -> usize {
        self.warnings.iter().filter(|w| w.is_skip()).count()
    }
}

impl From<Vec<Ticket>> for ParsedTickets {
    fn from(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets,
            warnings: Vec::new(),
        }
    }
}

/// Validate a backend response body into tickets.
///
/// The body must be a JSON array. Records that cannot be keyed are skipped;
/// every other anomaly keeps the record and adds a warning.
pub fn parse_tickets(body: Value) -> Result<ParsedTickets> {
    let Value::Array(records) = body else {
        return Err(DeskError::Api(format!(
            "expected a JSON array of tickets, got {}",
            json_kind(&body)
        )));
    };

    let mut parsed = ParsedTickets::default();

    for (index, record) in records.into_iter().enumerate() {
        let raw: RawTicket = match serde_json::from_value(record) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Skipping ticket record #{index}: {e}");
                parsed.warnings.push(RecordWarning {
                    index,
                    id: None,
                    message: format!("not a ticket object: {e}"),
                });
                continue;
            }
        };

        match raw.validate() {
            Ok((ticket, problems)) => {
                for message in problems {
                    tracing::warn!("Ticket {} (#{index}): {message}", ticket.id);
                    parsed.warnings.push(RecordWarning {
                        index,
                        id: Some(ticket.id.clone()),
                        message,
                    });
                }
                parsed.tickets.push(ticket);
            }
            Err(message) => {
                tracing::warn!("Skipping ticket record #{index}: {message}");
                parsed.warnings.push(RecordWarning {
                    index,
                    id: None,
                    message,
                });
            }
        }
    }

    Ok(parsed)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
