use crate::{
    plan::route::Route,
    problem::{delivery_problem::DeliveryProblem, error::ConfigurationError},
};

use super::vehicle_constraint::{Severity, VehicleConstraint};

const SEVERITY: Severity = Severity::Hard;

/// At most one stop classified as large per route.
#[derive(Debug, Clone)]
pub struct SingleLargeStopConstraint;

impl VehicleConstraint for SingleLargeStopConstraint {
    fn severity(&self) -> Severity {
        SEVERITY
    }

    fn violated(
        &self,
        problem: &DeliveryProblem,
        route: &Route,
    ) -> Result<bool, ConfigurationError> {
        let mut large_stops = 0;
        for &stop_id in route.interior() {
            if problem.stop(stop_id)?.is_large() {
                large_stops += 1;
                if large_stops > 1 {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }
}
