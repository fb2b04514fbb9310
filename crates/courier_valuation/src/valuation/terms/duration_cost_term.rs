use crate::problem::error::ConfigurationError;

use super::vehicle_value_term::{TermBreakdown, TermContext, VehicleValueTerm};

/// Total elapsed time of the vehicle in seconds, waiting and service included.
#[derive(Debug, Clone, Default)]
pub struct DurationCostTerm;

impl VehicleValueTerm for DurationCostTerm {
    fn accumulate(
        &self,
        context: &TermContext,
        breakdown: &mut TermBreakdown,
    ) -> Result<(), ConfigurationError> {
        breakdown.duration = breakdown
            .duration
            .saturating_add(context.schedule.elapsed().as_secs());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_problem, route, schedule_with_departures};

    #[test]
    fn test_duration_spans_first_arrival_to_last_departure() {
        let problem = create_problem(&["a", "b"], 1);
        let mut breakdown = TermBreakdown::default();

        DurationCostTerm
            .accumulate(
                &TermContext {
                    problem: &problem,
                    route: &route(0, &[0, 1]),
                    schedule: &schedule_with_departures(&[
                        (1_000, 1_000),
                        (1_300, 1_600),
                        (2_000, 2_100),
                        (2_500, 2_520),
                    ]),
                },
                &mut breakdown,
            )
            .unwrap();

        assert_eq!(breakdown.duration, 1_520);
    }
}
