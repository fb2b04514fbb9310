use thiserror::Error;

use crate::problem::{stop::StopIdx, vehicle::VehicleIdx};

/// A candidate plan that breaks the "every stop exactly once" invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("vehicle {0} does not exist")]
    UnknownVehicle(VehicleIdx),

    #[error("vehicle {0} has more than one route")]
    DuplicateRoute(VehicleIdx),

    #[error("vehicle {0} has no route")]
    MissingRoute(VehicleIdx),

    #[error("stop {0} does not exist")]
    UnknownStop(StopIdx),

    #[error("stop {0} is planned more than once")]
    DuplicateStop(StopIdx),

    #[error("stop {0} is neither routed nor unassigned")]
    MissingStop(StopIdx),

    #[error("schedule has {arrivals} arrivals but {departures} departures")]
    ScheduleLength { arrivals: usize, departures: usize },
}
