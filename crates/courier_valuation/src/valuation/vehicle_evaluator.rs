use serde::Serialize;
use tracing::trace;

use crate::{
    plan::{route::Route, schedule::Schedule},
    problem::{delivery_problem::DeliveryProblem, error::ConfigurationError},
};

use super::{
    terms::vehicle_value_term::{
        TermBreakdown, TermContext, VehicleValueTerm, VehicleValueTermType,
    },
    value::Value,
};

/// The last computed value of one vehicle. Plain data, copied freely between
/// search branches.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VehicleState {
    value: Value,
    breakdown: TermBreakdown,
}

impl VehicleState {
    pub fn value(&self) -> Value {
        self.value
    }

    pub fn breakdown(&self) -> &TermBreakdown {
        &self.breakdown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleUpdate {
    pub state: VehicleState,
    pub value: Value,
    /// Whether the plan aggregator should pick up the new value.
    pub propagate: bool,
}

#[derive(Debug, Clone, Default)]
pub enum VehicleEvaluator {
    /// No custom vehicle valuation: every vehicle is worth zero and nothing propagates.
    #[default]
    Null,
    Terms(Vec<VehicleValueTermType>),
}

impl VehicleEvaluator {
    pub fn terms(&self) -> &[VehicleValueTermType] {
        match self {
            VehicleEvaluator::Null => &[],
            VehicleEvaluator::Terms(terms) => terms,
        }
    }

    /// Computes the value of `route` given its `schedule`.
    ///
    /// `old` is never modified; the returned state replaces it for the branch
    /// that owns `route`.
    pub fn update(
        &self,
        problem: &DeliveryProblem,
        old: &VehicleState,
        route: &Route,
        schedule: &Schedule,
    ) -> Result<VehicleUpdate, ConfigurationError> {
        let terms = match self {
            VehicleEvaluator::Null => {
                return Ok(VehicleUpdate {
                    state: VehicleState::default(),
                    value: 0,
                    propagate: false,
                });
            }
            VehicleEvaluator::Terms(terms) => terms,
        };

        problem.vehicle(route.vehicle_id())?;
        for &stop_id in route.interior() {
            problem.stop(stop_id)?;
        }
        schedule.check_aligned(route)?;

        let context = TermContext {
            problem,
            route,
            schedule,
        };

        let mut breakdown = TermBreakdown::default();
        for term in terms {
            term.accumulate(&context, &mut breakdown)?;
        }

        let value = breakdown.total();
        trace!(
            vehicle = %route.vehicle_id(),
            value,
            delta = value.saturating_sub(old.value),
            "vehicle value updated"
        );

        Ok(VehicleUpdate {
            state: VehicleState { value, breakdown },
            value,
            propagate: true,
        })
    }
}
