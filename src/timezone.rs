//! Timezone Resolution
//!
//! Location changes trigger an asynchronous lookup of the timezone. Lookups
//! may overlap; each one carries a ticket and only the most recently issued
//! ticket is allowed to change the simulation.

use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::Result;
use crate::types::Location;

/// Asynchronous `(lat, lng) -> timezone id` lookup.
pub trait TimezoneResolver: Send + Sync + 'static {
    fn resolve(&self, location: Location) -> BoxFuture<'static, Result<String>>;
}

impl<F, Fut> TimezoneResolver for F
where
    F: Fn(Location) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    fn resolve(&self, location: Location) -> BoxFuture<'static, Result<String>> {
        self(location).boxed()
    }
}

/// Offline resolver using the nautical `Etc/GMT` zones (15° longitude bands).
#[derive(Debug, Clone, Copy, Default)]
pub struct NauticalResolver;

impl TimezoneResolver for NauticalResolver {
    fn resolve(&self, location: Location) -> BoxFuture<'static, Result<String>> {
        let id = nautical_zone_id(location.longitude);
        async move { Ok(id) }.boxed()
    }
}

pub fn nautical_zone_id(longitude: f64) -> String {
    let offset = (longitude / 15.0).round().clamp(-12.0, 14.0) as i32;
    // Etc/GMT signs are inverted: Etc/GMT-1 is UTC+1.
    match offset {
        0 => "Etc/GMT".to_string(),
        o if o > 0 => format!("Etc/GMT-{o}"),
        o => format!("Etc/GMT+{}", -o),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimezoneTicket {
    seq: u64,
    location: Location,
}

impl TimezoneTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

/// Latest-wins bookkeeping for in-flight lookups.
#[derive(Debug)]
pub struct TimezoneRequests {
    latest: u64,
    settled: bool,
}

impl TimezoneRequests {
    pub fn new() -> Self {
        Self {
            latest: 0,
            settled: true,
        }
    }

    /// Issue a ticket that supersedes every earlier one.
    pub fn issue(&mut self, location: Location) -> TimezoneTicket {
        self.latest += 1;
        self.settled = false;
        TimezoneTicket {
            seq: self.latest,
            location,
        }
    }

    pub fn is_current(&self, ticket: &TimezoneTicket) -> bool {
        !self.settled && ticket.seq == self.latest
    }

    /// Consume the ticket if it is the current one. Returns false for stale
    /// or already settled tickets.
    pub fn settle(&mut self, ticket: &TimezoneTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.settled = true;
        true
    }

    pub fn is_pending(&self) -> bool {
        !self.settled
    }
}

impl Default for TimezoneRequests {
    fn default() -> Self {
        Self::new()
    }
}
