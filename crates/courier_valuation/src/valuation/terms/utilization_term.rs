use crate::{problem::error::ConfigurationError, valuation::value::truncate};

use super::vehicle_value_term::{TermBreakdown, TermContext, VehicleValueTerm};

pub const DEFAULT_UTILIZATION_SCALE: f64 = 1000.0;

/// Rewards fuller vehicles by charging the unused share of their capacity.
///
/// The handled magnitude is the sum of absolute stop quantities, so pick-ups
/// and drop-offs both count towards utilization.
#[derive(Debug, Clone)]
pub struct UtilizationTerm {
    scale: f64,
}

impl Default for UtilizationTerm {
    fn default() -> Self {
        UtilizationTerm {
            scale: DEFAULT_UTILIZATION_SCALE,
        }
    }
}

impl UtilizationTerm {
    pub fn new(scale: f64) -> Self {
        UtilizationTerm { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl VehicleValueTerm for UtilizationTerm {
    fn accumulate(
        &self,
        context: &TermContext,
        breakdown: &mut TermBreakdown,
    ) -> Result<(), ConfigurationError> {
        if context.route.is_empty() {
            return Ok(());
        }

        let capacity = context.problem.capacity(context.route.vehicle_id())?;

        let mut magnitude: i64 = 0;
        for &stop_id in context.route.interior() {
            magnitude = magnitude.saturating_add(context.problem.quantity(stop_id)?.abs());
        }

        if capacity <= 0 {
            return Ok(());
        }

        let utilization = (magnitude as f64 / capacity as f64).clamp(0.0, 1.0);
        breakdown.utilization = breakdown
            .utilization
            .saturating_add(truncate((1.0 - utilization) * self.scale));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        plan::route::Route,
        problem::delivery_problem::{DeliveryProblem, DeliveryProblemBuilder},
        test_utils::{create_stops, create_vehicles, evenly_spaced_schedule, route},
    };

    fn problem(quantities: Vec<i64>, capacity: i64) -> DeliveryProblem {
        let mut builder = DeliveryProblemBuilder::default();
        builder
            .set_stops(create_stops(&["a", "b", "c"]))
            .set_vehicles(create_vehicles(1))
            .set_quantities(quantities)
            .set_capacities(vec![capacity]);
        builder.build().unwrap()
    }

    fn utilization_of(problem: &DeliveryProblem, route: &Route) -> i64 {
        let mut breakdown = TermBreakdown::default();
        UtilizationTerm::default()
            .accumulate(
                &TermContext {
                    problem,
                    route,
                    schedule: &evenly_spaced_schedule(route, 0, 60),
                },
                &mut breakdown,
            )
            .unwrap();
        breakdown.utilization
    }

    #[test]
    fn test_drop_offs_count_by_magnitude() {
        let problem = problem(vec![3, -3, 1], 10);

        // 6 of 10 used, 40% unused
        assert_eq!(utilization_of(&problem, &route(0, &[0, 1])), 400);
    }

    #[test]
    fn test_truncates_after_scaling() {
        let problem = problem(vec![1, 1, 1], 3);

        // a third unused: 333.33.. truncates to 333
        assert_eq!(utilization_of(&problem, &route(0, &[0, 1])), 333);
    }

    #[test]
    fn test_overfull_vehicle_is_clamped() {
        let problem = problem(vec![8, 8, 8], 10);
        assert_eq!(utilization_of(&problem, &route(0, &[0, 1, 2])), 0);
    }

    #[test]
    fn test_empty_route_and_zero_capacity_cost_nothing() {
        assert_eq!(utilization_of(&problem(vec![1, 1, 1], 10), &route(0, &[])), 0);
        assert_eq!(utilization_of(&problem(vec![1, 1, 1], 0), &route(0, &[0])), 0);
    }
}
