use jiff::{SignedDuration, Timestamp};
use serde::Serialize;

use crate::{
    plan::{error::PlanError, route::Route},
    problem::error::ConfigurationError,
};

/// Estimated arrival and departure per route position, markers included.
///
/// Produced by the travel-time model that sits outside of this crate.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Schedule {
    arrivals: Vec<Timestamp>,
    departures: Vec<Timestamp>,
}

impl Schedule {
    pub fn new(arrivals: Vec<Timestamp>, departures: Vec<Timestamp>) -> Result<Self, PlanError> {
        if arrivals.len() != departures.len() {
            return Err(PlanError::ScheduleLength {
                arrivals: arrivals.len(),
                departures: departures.len(),
            });
        }

        Ok(Schedule {
            arrivals,
            departures,
        })
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    pub fn arrival(&self, position: usize) -> Option<Timestamp> {
        self.arrivals.get(position).copied()
    }

    pub fn departure(&self, position: usize) -> Option<Timestamp> {
        self.departures.get(position).copied()
    }

    /// Arrival at `position` of `route`, a schedule too short for the route
    /// fails like [`Schedule::check_aligned`].
    pub fn arrival_at(&self, route: &Route, position: usize) -> Result<Timestamp, ConfigurationError> {
        self.arrival(position).ok_or_else(|| self.mismatch(route))
    }

    pub fn departure_at(
        &self,
        route: &Route,
        position: usize,
    ) -> Result<Timestamp, ConfigurationError> {
        self.departure(position).ok_or_else(|| self.mismatch(route))
    }

    /// Elapsed time from arriving at the start marker to leaving the end
    /// marker, waiting and service included.
    pub fn elapsed(&self) -> SignedDuration {
        match (self.arrivals.first(), self.departures.last()) {
            (Some(&first), Some(&last)) => last.duration_since(first),
            _ => SignedDuration::ZERO,
        }
    }

    /// Fails unless the schedule lines up with `route` position for position.
    pub fn check_aligned(&self, route: &Route) -> Result<(), ConfigurationError> {
        if self.len() != route.len() {
            return Err(self.mismatch(route));
        }
        Ok(())
    }

    fn mismatch(&self, route: &Route) -> ConfigurationError {
        ConfigurationError::ScheduleMismatch {
            route_len: route.len(),
            schedule_len: self.len(),
        }
    }
}
