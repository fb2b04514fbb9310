use serde::Serialize;

use crate::problem::{stop::StopIdx, vehicle::VehicleIdx};

/// A position of a route: the synthetic start and end markers enclose the stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteStep {
    Start,
    Stop(StopIdx),
    End,
}

/// The ordered stops of one vehicle.
///
/// Only the interior stops are stored; positions `0` and `len() - 1` are the
/// start and end markers, so an unused vehicle still has a route of length 2.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Route {
    vehicle_id: VehicleIdx,
    stops: Vec<StopIdx>,
}

impl Route {
    pub fn new(vehicle_id: VehicleIdx, stops: Vec<StopIdx>) -> Self {
        Route { vehicle_id, stops }
    }

    pub fn empty(vehicle_id: VehicleIdx) -> Self {
        Route::new(vehicle_id, Vec::new())
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        self.vehicle_id
    }

    /// Number of positions, both markers included.
    pub fn len(&self) -> usize {
        self.stops.len() + 2
    }

    /// A route is empty when it visits no stop.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// The stops between the markers.
    pub fn interior(&self) -> &[StopIdx] {
        &self.stops
    }

    pub fn step(&self, position: usize) -> Option<RouteStep> {
        if position == 0 {
            Some(RouteStep::Start)
        } else if position == self.stops.len() + 1 {
            Some(RouteStep::End)
        } else {
            self.stops.get(position - 1).copied().map(RouteStep::Stop)
        }
    }

    pub fn steps(&self) -> impl Iterator<Item = RouteStep> + '_ {
        std::iter::once(RouteStep::Start)
            .chain(self.stops.iter().copied().map(RouteStep::Stop))
            .chain(std::iter::once(RouteStep::End))
    }

    /// Interior stops paired with their route position.
    pub fn interior_positions(&self) -> impl Iterator<Item = (usize, StopIdx)> + '_ {
        self.stops
            .iter()
            .enumerate()
            .map(|(index, &stop_id)| (index + 1, stop_id))
    }
}
