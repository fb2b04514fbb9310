use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    plan::{route::Route, schedule::Schedule},
    problem::{delivery_problem::DeliveryProblem, error::ConfigurationError},
    valuation::value::Value,
};

use super::{
    duration_cost_term::DurationCostTerm, time_window_penalty_term::TimeWindowPenaltyTerm,
    usage_cost_term::UsageCostTerm, utilization_term::UtilizationTerm,
};

/// What a term reads: the static tables plus one vehicle's route and schedule.
///
/// Only built by the evaluator, once the route and the schedule are known to
/// line up.
pub struct TermContext<'a> {
    pub(crate) problem: &'a DeliveryProblem,
    pub(crate) route: &'a Route,
    pub(crate) schedule: &'a Schedule,
}

/// Per-term contributions to a vehicle value, kept so that reports and
/// tracing can tell where a value comes from.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermBreakdown {
    pub usage: Value,
    pub duration: Value,
    pub earliness: Value,
    pub lateness: Value,
    pub utilization: Value,
}

impl TermBreakdown {
    /// Saturates at the `Value` range.
    pub fn total(&self) -> Value {
        [self.duration, self.earliness, self.lateness, self.utilization]
            .into_iter()
            .fold(self.usage, Value::saturating_add)
    }
}

pub trait VehicleValueTerm {
    /// Adds this term's contribution, already truncated, to `breakdown`.
    fn accumulate(
        &self,
        context: &TermContext,
        breakdown: &mut TermBreakdown,
    ) -> Result<(), ConfigurationError>;
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TermKind {
    UsageCost,
    DurationCost,
    TimeWindowPenalty,
    Utilization,
}

#[derive(Debug, Clone)]
pub enum VehicleValueTermType {
    UsageCost(UsageCostTerm),
    DurationCost(DurationCostTerm),
    TimeWindowPenalty(TimeWindowPenaltyTerm),
    Utilization(UtilizationTerm),
}

impl VehicleValueTermType {
    pub fn kind(&self) -> TermKind {
        match self {
            VehicleValueTermType::UsageCost(_) => TermKind::UsageCost,
            VehicleValueTermType::DurationCost(_) => TermKind::DurationCost,
            VehicleValueTermType::TimeWindowPenalty(_) => TermKind::TimeWindowPenalty,
            VehicleValueTermType::Utilization(_) => TermKind::Utilization,
        }
    }
}

impl VehicleValueTerm for VehicleValueTermType {
    fn accumulate(
        &self,
        context: &TermContext,
        breakdown: &mut TermBreakdown,
    ) -> Result<(), ConfigurationError> {
        match self {
            VehicleValueTermType::UsageCost(t) => t.accumulate(context, breakdown),
            VehicleValueTermType::DurationCost(t) => t.accumulate(context, breakdown),
            VehicleValueTermType::TimeWindowPenalty(t) => t.accumulate(context, breakdown),
            VehicleValueTermType::Utilization(t) => t.accumulate(context, breakdown),
        }
    }
}
