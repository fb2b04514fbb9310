use crate::{
    plan::route::{Route, RouteStep},
    problem::{delivery_problem::DeliveryProblem, error::ConfigurationError},
};

use super::vehicle_constraint::{Severity, VehicleConstraint};

const SEVERITY: Severity = Severity::Diagnostic;

/// A LIFO stop has to be directly followed by its precedence partner.
#[derive(Debug, Clone)]
pub struct LifoAdherenceConstraint;

impl LifoAdherenceConstraint {
    /// Number of LIFO stops on `route` not directly followed by their partner.
    /// A LIFO stop without a partner is always counted.
    pub fn count_violations(
        &self,
        problem: &DeliveryProblem,
        route: &Route,
    ) -> Result<usize, ConfigurationError> {
        let mut violations = 0;

        for (position, stop_id) in route.interior_positions() {
            let stop = problem.stop(stop_id)?;
            if !stop.is_lifo() {
                continue;
            }

            let next = route.step(position + 1);
            let adheres = match (stop.precedence_partner(), next) {
                (Some(partner), Some(RouteStep::Stop(next_id))) => partner == next_id,
                _ => false,
            };
            if !adheres {
                violations += 1;
            }
        }

        Ok(violations)
    }
}

impl VehicleConstraint for LifoAdherenceConstraint {
    fn severity(&self) -> Severity {
        SEVERITY
    }

    fn violated(
        &self,
        problem: &DeliveryProblem,
        route: &Route,
    ) -> Result<bool, ConfigurationError> {
        Ok(self.count_violations(problem, route)? > 0)
    }
}
