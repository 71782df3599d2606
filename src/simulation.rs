//! Simulation State
//!
//! Single owner of the shared parameters (location, orientation, date and
//! timezone) and of the published Day Sample Set. Producers call setters;
//! consumers subscribe to [`Regeneration`] events and never mutate the state.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{parse_zone, SimulatorConfig};
use crate::day_samples::{generate_day_samples, DaySampleSet};
use crate::error::Result;
use crate::inputs;
use crate::time_cursor::{SharedCursor, TimeCursor};
use crate::timezone::{TimezoneRequests, TimezoneTicket};
use crate::types::{Location, ModuleOrientation, TimeZoneContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerationReason {
    Initial,
    Date,
    Location,
    Timezone,
    Orientation,
    Requested,
}

/// A fully generated sample set handed to the animation loops.
#[derive(Debug, Clone)]
pub struct Regeneration {
    pub generation: u64,
    pub reason: RegenerationReason,
    pub samples: Arc<DaySampleSet>,
    pub zone: Tz,
    pub day_start: DateTime<Tz>,
    /// Day-bound recomputations of the cursor at the time of publishing
    pub cursor_recomputes: u64,
}

pub struct Simulation {
    location: Location,
    orientation: ModuleOrientation,
    timezone: TimeZoneContext,
    cursor: SharedCursor,
    tz_requests: TimezoneRequests,
    generation: u64,
    published: watch::Sender<Regeneration>,
}

impl Simulation {
    pub fn new(location: Location, orientation: ModuleOrientation, cursor: TimeCursor) -> Self {
        let orientation = orientation.normalized();
        let zone = cursor.zone();
        let regeneration = Regeneration {
            generation: 0,
            reason: RegenerationReason::Initial,
            samples: Arc::new(generate_day_samples(cursor.day_start(), location, &orientation)),
            zone,
            day_start: *cursor.day_start(),
            cursor_recomputes: cursor.recomputes(),
        };
        info!(
            "Simulation ready for {} at ({:.4}, {:.4}), max power {}",
            cursor.date(),
            location.latitude,
            location.longitude,
            regeneration.samples.max_power()
        );
        let (published, _) = watch::channel(regeneration);
        Self {
            location,
            orientation,
            timezone: TimeZoneContext::new(zone),
            cursor: SharedCursor::new(cursor),
            tz_requests: TimezoneRequests::new(),
            generation: 0,
            published,
        }
    }

    /// Simulation for today's civil day at the configured location.
    pub fn from_config(config: &SimulatorConfig) -> Result<Self> {
        let zone = config.zone()?;
        Ok(Self::new(
            config.location(),
            config.orientation(),
            TimeCursor::today(zone),
        ))
    }

    // ==================== Getters ====================

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn orientation(&self) -> &ModuleOrientation {
        &self.orientation
    }

    pub fn timezone(&self) -> &TimeZoneContext {
        &self.timezone
    }

    pub fn cursor(&self) -> &SharedCursor {
        &self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current(&self) -> Regeneration {
        self.published.borrow().clone()
    }

    pub fn samples(&self) -> Arc<DaySampleSet> {
        self.published.borrow().samples.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Regeneration> {
        self.published.subscribe()
    }

    pub fn timezone_pending(&self) -> bool {
        self.tz_requests.is_pending()
    }

    // ==================== Producers ====================

    /// Move to a new location. Samples are regenerated at once under the
    /// current timezone; the returned ticket must be passed to
    /// [`Simulation::apply_timezone`] once the lookup for it completes.
    pub fn set_location(&mut self, location: Location) -> (TimezoneTicket, Regeneration) {
        self.location = location;
        let ticket = self.tz_requests.issue(location);
        debug!(
            "Timezone lookup #{} issued for ({:.4}, {:.4})",
            ticket.seq(),
            location.latitude,
            location.longitude
        );
        (ticket, self.regenerate_for(RegenerationReason::Location))
    }

    pub fn set_date(&mut self, date: NaiveDate) -> Regeneration {
        self.cursor.lock().set_date(date);
        self.publish(RegenerationReason::Date)
    }

    /// Date picker entry point; the date is interpreted in the active zone.
    pub fn set_date_input(&mut self, input: &str) -> Result<Regeneration> {
        let date = inputs::parse_date(input)?;
        Ok(self.set_date(date))
    }

    pub fn set_orientation(&mut self, orientation: ModuleOrientation) -> Regeneration {
        self.orientation = orientation.normalized();
        self.regenerate_for(RegenerationReason::Orientation)
    }

    pub fn set_tilt_input(&mut self, input: &str) -> Regeneration {
        self.orientation.tilt = inputs::tilt_from_input(input);
        self.regenerate_for(RegenerationReason::Orientation)
    }

    pub fn set_azimuth_input(&mut self, input: &str) -> Regeneration {
        self.orientation.azimuth = inputs::azimuth_from_input(input);
        self.regenerate_for(RegenerationReason::Orientation)
    }

    pub fn set_area_input(&mut self, input: &str) -> Regeneration {
        self.orientation.area = inputs::area_from_input(input);
        self.regenerate_for(RegenerationReason::Orientation)
    }

    /// Apply the outcome of a timezone lookup. Only the most recently issued
    /// ticket is honoured; stale tickets and failed lookups leave the
    /// current zone in place. Returns the regeneration when one happened.
    pub fn apply_timezone(
        &mut self,
        ticket: &TimezoneTicket,
        result: Result<String>,
    ) -> Option<Regeneration> {
        if !self.tz_requests.settle(ticket) {
            warn!("Dropping stale timezone lookup #{}", ticket.seq());
            return None;
        }

        let zone = match result.and_then(|id| parse_zone(&id)) {
            Ok(zone) => zone,
            Err(e) => {
                warn!(
                    "Timezone lookup #{} failed, keeping {}: {}",
                    ticket.seq(),
                    self.timezone.id(),
                    e
                );
                return None;
            }
        };

        info!(
            "Timezone {} -> {} (lookup #{})",
            self.timezone.id(),
            zone.name(),
            ticket.seq()
        );
        self.timezone = TimeZoneContext::new(zone);
        self.cursor.lock().set_zone(zone);
        Some(self.publish(RegenerationReason::Timezone))
    }

    /// Regenerate from the current parameters and rewind the cursor.
    pub fn regenerate(&mut self) -> Regeneration {
        self.regenerate_for(RegenerationReason::Requested)
    }

    fn regenerate_for(&mut self, reason: RegenerationReason) -> Regeneration {
        self.cursor.lock().reset();
        self.publish(reason)
    }

    fn publish(&mut self, reason: RegenerationReason) -> Regeneration {
        let (day_start, zone, recomputes) = {
            let cursor = self.cursor.lock();
            (*cursor.day_start(), cursor.zone(), cursor.recomputes())
        };
        let samples = generate_day_samples(&day_start, self.location, &self.orientation);

        self.generation += 1;
        let regeneration = Regeneration {
            generation: self.generation,
            reason,
            samples: Arc::new(samples),
            zone,
            day_start,
            cursor_recomputes: recomputes,
        };
        debug!(
            "Regeneration #{} ({:?}): day starts {}, max power {}",
            regeneration.generation,
            reason,
            day_start,
            regeneration.samples.max_power()
        );
        self.published.send_replace(regeneration.clone());
        regeneration
    }
}
