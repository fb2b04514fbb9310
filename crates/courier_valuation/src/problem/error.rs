use thiserror::Error;

use super::vehicle::VehicleIdx;

/// Inconsistent input detected while evaluating a route or a plan.
///
/// These abort the evaluation: a missing entry in a table that has to cover
/// every stop is never read as a zero.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{table} has no entry for index {index} (it covers {len} entries)")]
    IndexOutOfBounds {
        table: &'static str,
        index: usize,
        len: usize,
    },

    #[error("schedule covers {schedule_len} route positions but the route has {route_len}")]
    ScheduleMismatch {
        route_len: usize,
        schedule_len: usize,
    },

    #[error("vehicle {0} has a route but no schedule")]
    MissingSchedule(VehicleIdx),

    #[error("{kind} id {id} is defined more than once")]
    DuplicateId { kind: &'static str, id: String },

    #[error("missing required field {0}")]
    MissingField(&'static str),
}
