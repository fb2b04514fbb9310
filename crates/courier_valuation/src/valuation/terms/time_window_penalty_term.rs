use jiff::Timestamp;
use serde::Serialize;

use crate::{
    problem::{delivery_problem::DeliveryProblem, error::ConfigurationError, stop::StopIdx},
    valuation::value::Value,
};

use super::vehicle_value_term::{TermBreakdown, TermContext, VehicleValueTerm};

/// Penalizes arriving before or after a stop's target time.
#[derive(Debug, Clone, Default)]
pub struct TimeWindowPenaltyTerm;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StopPenalty {
    pub target: Option<Timestamp>,
    pub earliness: Value,
    pub lateness: Value,
}

impl TimeWindowPenaltyTerm {
    /// Earliness and lateness of arriving at `stop_id` at `arrival`.
    ///
    /// A stop without a target time costs nothing; a stop with a target time
    /// must have both penalty weights configured.
    pub fn stop_penalty(
        problem: &DeliveryProblem,
        stop_id: StopIdx,
        arrival: Timestamp,
    ) -> Result<StopPenalty, ConfigurationError> {
        problem.stop(stop_id)?;

        let Some(target) = problem.target_time(stop_id)? else {
            return Ok(StopPenalty::default());
        };

        let early_by = target.duration_since(arrival).as_secs().max(0);
        let late_by = arrival.duration_since(target).as_secs().max(0);

        Ok(StopPenalty {
            target: Some(target),
            earliness: early_by.saturating_mul(problem.earliness_penalty(stop_id)?),
            lateness: late_by.saturating_mul(problem.lateness_penalty(stop_id)?),
        })
    }
}

impl VehicleValueTerm for TimeWindowPenaltyTerm {
    fn accumulate(
        &self,
        context: &TermContext,
        breakdown: &mut TermBreakdown,
    ) -> Result<(), ConfigurationError> {
        for (position, stop_id) in context.route.interior_positions() {
            let penalty = TimeWindowPenaltyTerm::stop_penalty(
                context.problem,
                stop_id,
                context.schedule.arrival_at(context.route, position)?,
            )?;
            breakdown.earliness = breakdown.earliness.saturating_add(penalty.earliness);
            breakdown.lateness = breakdown.lateness.saturating_add(penalty.lateness);
        }

        Ok(())
    }
}
