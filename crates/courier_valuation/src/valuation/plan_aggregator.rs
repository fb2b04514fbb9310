use std::sync::Arc;

use fxhash::FxHashMap;
use serde::Serialize;
use tracing::trace;

use crate::{
    plan::candidate_plan::CandidatePlan,
    problem::{delivery_problem::DeliveryProblem, error::ConfigurationError, vehicle::VehicleIdx},
};

use super::{unassigned_penalty::UnassignedPenalty, value::Value};

/// A vehicle whose value changed in the candidate being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedVehicle {
    pub vehicle_id: VehicleIdx,
    pub value: Value,
}

/// Fleet-level valuation of one candidate plan.
///
/// States are shared by sibling search branches. The per-vehicle map sits
/// behind an `Arc` and is copied before an update writes to it, so a state
/// never changes once it has been returned.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanState {
    vehicle_values: Arc<FxHashMap<VehicleIdx, Value>>,
    /// Exact sum of `vehicle_values`; wide enough that adding and removing
    /// vehicle values never overflows.
    fleet_total: i128,
    min_route_length: usize,
    max_route_length: usize,
    imbalance_penalty: Value,
    unassigned_penalty: Value,
    value: Value,
}

impl PlanState {
    pub fn value(&self) -> Value {
        self.value
    }

    /// Sum of the last known vehicle values, saturated at the `Value` range.
    pub fn fleet_value(&self) -> Value {
        saturate(self.fleet_total)
    }

    pub fn vehicle_value(&self, vehicle_id: VehicleIdx) -> Value {
        self.vehicle_values.get(&vehicle_id).copied().unwrap_or(0)
    }

    pub fn min_route_length(&self) -> usize {
        self.min_route_length
    }

    pub fn max_route_length(&self) -> usize {
        self.max_route_length
    }

    pub fn imbalance_penalty(&self) -> Value {
        self.imbalance_penalty
    }

    pub fn unassigned_penalty(&self) -> Value {
        self.unassigned_penalty
    }

    /// Write access to this state's own copy of the vehicle value map.
    pub(crate) fn vehicle_values_mut(&mut self) -> &mut FxHashMap<VehicleIdx, Value> {
        Arc::make_mut(&mut self.vehicle_values)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanUpdate {
    pub state: PlanState,
    pub value: Value,
    pub propagate: bool,
}

/// Combines vehicle values, the route length imbalance and the unassigned
/// stops into a single plan value.
#[derive(Debug, Clone, Default)]
pub struct PlanAggregator {
    imbalance_weight: Value,
    unassigned_penalty: UnassignedPenalty,
}

impl PlanAggregator {
    pub fn new(imbalance_weight: Value, unassigned_penalty: UnassignedPenalty) -> Self {
        PlanAggregator {
            imbalance_weight,
            unassigned_penalty,
        }
    }

    pub fn unassigned_penalty(&self) -> UnassignedPenalty {
        self.unassigned_penalty
    }

    /// Derives the state of `plan` from `old`, the state of its parent.
    ///
    /// Only the `changed` vehicles are revisited for their value. Route lengths
    /// and unassigned stops are rescanned on every call since a single move can
    /// shift the shortest or the longest route in either direction.
    pub fn update(
        &self,
        problem: &DeliveryProblem,
        old: &PlanState,
        plan: &CandidatePlan,
        changed: &[ChangedVehicle],
    ) -> Result<PlanUpdate, ConfigurationError> {
        let mut vehicle_values = FxHashMap::clone(&old.vehicle_values);
        let mut fleet_total = old.fleet_total;

        for change in changed {
            problem.vehicle(change.vehicle_id)?;

            let previous = vehicle_values
                .insert(change.vehicle_id, change.value)
                .unwrap_or(0);
            fleet_total += i128::from(change.value) - i128::from(previous);
        }

        let (min_route_length, max_route_length) = route_length_bounds(plan);
        let imbalance_penalty = self.imbalance_penalty(min_route_length, max_route_length);
        let unassigned_penalty = self
            .unassigned_penalty
            .total(problem, plan.unassigned_stops())?;
        let value = plan_value(fleet_total, imbalance_penalty, unassigned_penalty);

        trace!(
            changed = changed.len(),
            fleet_value = saturate(fleet_total),
            imbalance_penalty,
            unassigned_penalty,
            value,
            "plan value updated"
        );

        Ok(PlanUpdate {
            state: PlanState {
                vehicle_values: Arc::new(vehicle_values),
                fleet_total,
                min_route_length,
                max_route_length,
                imbalance_penalty,
                unassigned_penalty,
                value,
            },
            value,
            propagate: true,
        })
    }

    /// Values `plan` without a parent state; `vehicle_values` has to hold every
    /// vehicle with a non-zero value.
    pub fn from_scratch(
        &self,
        problem: &DeliveryProblem,
        plan: &CandidatePlan,
        vehicle_values: &[ChangedVehicle],
    ) -> Result<PlanUpdate, ConfigurationError> {
        let mut values = FxHashMap::default();
        for entry in vehicle_values {
            problem.vehicle(entry.vehicle_id)?;
            values.insert(entry.vehicle_id, entry.value);
        }

        let fleet_total = values.values().copied().map(i128::from).sum();
        let (min_route_length, max_route_length) = route_length_bounds(plan);
        let imbalance_penalty = self.imbalance_penalty(min_route_length, max_route_length);
        let unassigned_penalty = self
            .unassigned_penalty
            .total(problem, plan.unassigned_stops())?;
        let value = plan_value(fleet_total, imbalance_penalty, unassigned_penalty);

        Ok(PlanUpdate {
            state: PlanState {
                vehicle_values: Arc::new(values),
                fleet_total,
                min_route_length,
                max_route_length,
                imbalance_penalty,
                unassigned_penalty,
                value,
            },
            value,
            propagate: true,
        })
    }

    fn imbalance_penalty(&self, min_route_length: usize, max_route_length: usize) -> Value {
        ((max_route_length - min_route_length) as Value).saturating_mul(self.imbalance_weight)
    }
}

fn plan_value(fleet_total: i128, imbalance_penalty: Value, unassigned_penalty: Value) -> Value {
    saturate(fleet_total + i128::from(imbalance_penalty) + i128::from(unassigned_penalty))
}

fn saturate(value: i128) -> Value {
    Value::try_from(value).unwrap_or(if value < 0 { Value::MIN } else { Value::MAX })
}

/// Shortest and longest route over the whole fleet, markers included.
fn route_length_bounds(plan: &CandidatePlan) -> (usize, usize) {
    plan.routes()
        .iter()
        .map(|route| route.len())
        .fold(None, |bounds, len| match bounds {
            None => Some((len, len)),
            Some((min, max)) => Some((usize::min(min, len), usize::max(max, len))),
        })
        .unwrap_or((0, 0))
}
