//! Ticket statistics derived from a ticket collection

use serde::{Deserialize, Serialize};

use crate::filter::FilterBucket;
use crate::ticket::Ticket;
use crate::types::{Priority, TicketStatus};

/// Ticket counts per filter bucket.
///
/// `all` is the raw collection size. The status buckets count exact status
/// matches only, so tickets with an unrecognized status appear in `all` and
/// nowhere else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TicketStats {
    pub all: usize,
    pub new: usize,
    pub open: usize,
    pub closed: usize,
}

impl TicketStats {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        let mut stats = TicketStats {
            all: tickets.len(),
            ..Default::default()
        };
        for ticket in tickets {
            match ticket.status {
                TicketStatus::New => stats.new += 1,
                TicketStatus::Open => stats.open += 1,
                TicketStatus::Closed => stats.closed += 1,
                TicketStatus::Unknown(_) => {}
            }
        }
        stats
    }

    /// Count shown next to a filter button
    pub fn count_for(&self, bucket: FilterBucket) -> usize {
        match bucket {
            FilterBucket::All => self.all,
            FilterBucket::New => self.new,
            FilterBucket::Open => self.open,
            FilterBucket::Closed => self.closed,
        }
    }

    /// Tickets counted in `all` but in no status bucket
    pub fn unknown(&self) -> usize {
        self.all.saturating_sub(self.new + self.open + self.closed)
    }

    pub fn is_reconciled(&self) -> bool {
        self.unknown() == 0
    }
}

/// Ticket counts per priority, for the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
}

impl PriorityCounts {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        let mut counts = PriorityCounts::default();
        for ticket in tickets {
            match ticket.priority {
                Priority::Critical => counts.critical += 1,
                Priority::High => counts.high += 1,
                Priority::Medium => counts.medium += 1,
                Priority::Low => counts.low += 1,
                Priority::Unknown(_) => counts.unknown += 1,
            }
        }
        counts
    }

    pub fn rows(&self) -> [(&'static str, usize); 5] {
        [
            ("Critical", self.critical),
            ("High", self.high),
            ("Medium", self.medium),
            ("Low", self.low),
            ("Unset", self.unknown),
        ]
    }
}

/// Per-agent workload counters from the stats endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AgentStats {
    #[serde(default)]
    pub solved_daily: u64,
    #[serde(default)]
    pub solved_weekly: u64,
    #[serde(default)]
    pub solved_monthly: u64,
    #[serde(default)]
    pub daily_tickets: u64,
    #[serde(default)]
    pub weekly_tickets: u64,
    #[serde(default)]
    pub monthly_tickets: u64,
}

/// One period row of an agent's stats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodStats {
    pub label: &'static str,
    pub solved: u64,
    pub total: u64,
}

impl PeriodStats {
    /// Share of tickets solved in the period, in percent
    pub fn solve_rate(&self) -> Option<u64> {
        if self.total == 0 {
            None
        } else {
            Some(self.solved * 100 / self.total)
        }
    }
}

impl AgentStats {
    pub fn periods(&self) -> [PeriodStats; 3] {
        [
            PeriodStats {
                label: "Daily",
                solved: self.solved_daily,
                total: self.daily_tickets,
            },
            PeriodStats {
                label: "Weekly",
                solved: self.solved_weekly,
                total: self.weekly_tickets,
            },
            PeriodStats {
                label: "Monthly",
                solved: self.solved_monthly,
                total: self.monthly_tickets,
            },
        ]
    }
}
