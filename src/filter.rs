//! Filter state for the ticket list.
//!
//! A status bucket and a free-text search term together narrow a ticket
//! collection to the visible subset. Every combination of bucket and term is
//! valid; a search that matches nothing produces an empty list, which the
//! panel renders as its empty state.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use unicase::UniCase;

use crate::error::DeskError;
use crate::ticket::Ticket;
use crate::types::TicketStatus;

/// Status bucket selected in the filter bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterBucket {
    #[default]
    All,
    New,
    Open,
    Closed,
}

impl FilterBucket {
    pub const ALL: [FilterBucket; 4] = [
        FilterBucket::All,
        FilterBucket::New,
        FilterBucket::Open,
        FilterBucket::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterBucket::All => "all",
            FilterBucket::New => "new",
            FilterBucket::Open => "open",
            FilterBucket::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterBucket::All => "All",
            FilterBucket::New => "New",
            FilterBucket::Open => "Open",
            FilterBucket::Closed => "Closed",
        }
    }

    /// Whether a ticket with `status` belongs in this bucket.
    ///
    /// Status text is compared lower-cased, so a backend that sends "closed"
    /// still lands in the closed bucket.
    pub fn admits(&self, status: &TicketStatus) -> bool {
        match self {
            FilterBucket::All => true,
            bucket => status.as_str().to_lowercase() == bucket.as_str(),
        }
    }
}

impl fmt::Display for FilterBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterBucket {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = UniCase::new(s.trim());
        FilterBucket::ALL
            .into_iter()
            .find(|bucket| UniCase::new(bucket.as_str()) == key)
            .ok_or_else(|| DeskError::InvalidFilter(s.to_string()))
    }
}

/// Selected bucket plus search term
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    selected_filter: FilterBucket,
    search_term: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_filter(&self) -> FilterBucket {
        self.selected_filter
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_filter(&mut self, bucket: FilterBucket) {
        self.selected_filter = bucket;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn with_filter(mut self, bucket: FilterBucket) -> Self {
        self.set_filter(bucket);
        self
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.set_search_term(term);
        self
    }

    /// True when neither the bucket nor the search narrows anything
    pub fn is_unfiltered(&self) -> bool {
        self.selected_filter == FilterBucket::All && self.needle().is_empty()
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.matches_needle(ticket, &self.needle())
    }

    /// Visible subset of `tickets`, in their original order
    pub fn apply<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        let needle = self.needle();
        tickets
            .iter()
            .filter(|t| self.matches_needle(t, &needle))
            .collect()
    }

    fn needle(&self) -> String {
        self.search_term.trim().to_lowercase()
    }

    fn matches_needle(&self, ticket: &Ticket, needle: &str) -> bool {
        if !self.selected_filter.admits(&ticket.status) {
            return false;
        }
        if needle.is_empty() {
            return true;
        }
        [
            ticket.subject.as_deref().unwrap_or(""),
            ticket.content.as_deref().unwrap_or(""),
            ticket.category.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Narrow `tickets` with `state`
pub fn apply_filter<'a>(tickets: &'a [Ticket], state: &FilterState) -> Vec<&'a Ticket> {
    state.apply(tickets)
}
