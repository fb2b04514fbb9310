use crate::{
    plan::route::Route,
    problem::{delivery_problem::DeliveryProblem, error::ConfigurationError},
};

use super::vehicle_constraint::{Severity, VehicleConstraint};

const SEVERITY: Severity = Severity::Hard;

/// Every stop of a route carries the same classification as the first one.
///
/// Only enforced when the stops span more than one distinct classification;
/// with a single label every route is trivially homogeneous.
#[derive(Debug, Clone)]
pub struct TypeHomogeneityConstraint;

impl VehicleConstraint for TypeHomogeneityConstraint {
    fn severity(&self) -> Severity {
        SEVERITY
    }

    fn violated(
        &self,
        problem: &DeliveryProblem,
        route: &Route,
    ) -> Result<bool, ConfigurationError> {
        if problem.distinct_classifications() <= 1 {
            return Ok(false);
        }

        let [first, rest @ ..] = route.interior() else {
            return Ok(false);
        };
        if rest.is_empty() {
            return Ok(false);
        }

        let reference = problem.stop(*first)?.classification();
        for &stop_id in rest {
            if problem.stop(stop_id)?.classification() != reference {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        problem::delivery_problem::DeliveryProblemBuilder,
        test_utils::{create_classified_stops, create_vehicles, route},
    };

    fn problem(classifications: &[Option<&str>]) -> DeliveryProblem {
        let mut builder = DeliveryProblemBuilder::default();
        builder
            .set_stops(create_classified_stops(classifications))
            .set_vehicles(create_vehicles(1));
        builder.build().unwrap()
    }

    #[test]
    fn test_mixed_route_is_rejected() {
        let problem = problem(&[Some("box"), Some("box"), Some("pallet")]);

        assert_eq!(
            TypeHomogeneityConstraint.violated(&problem, &route(0, &[0, 1])),
            Ok(false)
        );
        assert_eq!(
            TypeHomogeneityConstraint.violated(&problem, &route(0, &[0, 1, 2])),
            Ok(true)
        );
        assert_eq!(
            TypeHomogeneityConstraint.violated(&problem, &route(0, &[2, 0])),
            Ok(true)
        );
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let problem = problem(&[Some("box"), Some("Box")]);

        assert_eq!(
            TypeHomogeneityConstraint.violated(&problem, &route(0, &[0, 1])),
            Ok(true)
        );
    }

    #[test]
    fn test_unlabeled_stop_differs_from_labeled() {
        let problem = problem(&[Some("box"), None]);

        assert_eq!(
            TypeHomogeneityConstraint.violated(&problem, &route(0, &[0, 1])),
            Ok(true)
        );
    }

    #[test]
    fn test_short_routes_are_satisfied() {
        let problem = problem(&[Some("box"), Some("pallet")]);

        assert_eq!(TypeHomogeneityConstraint.violated(&problem, &route(0, &[])), Ok(false));
        assert_eq!(TypeHomogeneityConstraint.violated(&problem, &route(0, &[1])), Ok(false));
    }

    #[test]
    fn test_single_label_is_never_checked() {
        let problem = problem(&[Some("box"), Some("box"), Some("box")]);

        assert_eq!(problem.distinct_classifications(), 1);
        assert_eq!(
            TypeHomogeneityConstraint.violated(&problem, &route(0, &[0, 1, 2])),
            Ok(false)
        );
    }
}
