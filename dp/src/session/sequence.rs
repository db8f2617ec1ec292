//! Request sequencing
//!
//! Every request of a kind takes a ticket with a strictly increasing
//! sequence number. When a response arrives, only the holder of the latest
//! ticket may deliver it; anything older was superseded and is dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

/// Issues sequence numbers for one request kind
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

/// Proof of having issued a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next ticket, superseding every earlier one
    pub fn issue(&self) -> Ticket {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(%seq, "RequestSequencer::issue: called");
        Ticket { seq }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.seq
    }

    /// Most recently issued sequence number, 0 before the first request
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Outcome of a sequenced request
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery<T> {
    /// The response belongs to the latest request
    Fresh(T),
    /// A newer request was issued while this one was in flight
    Superseded { seq: u64, latest: u64 },
}

impl<T> Delivery<T> {
    pub fn fresh(self) -> Option<T> {
        match self {
            Delivery::Fresh(value) => Some(value),
            Delivery::Superseded { .. } => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Delivery::Superseded { .. })
    }
}
