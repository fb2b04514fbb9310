use serde::Serialize;
use smallvec::SmallVec;

use crate::{
    plan::route::Route,
    problem::{delivery_problem::DeliveryProblem, error::ConfigurationError, vehicle::VehicleIdx},
};

use super::vehicle_constraint::{
    ConstraintKind, Severity, VehicleConstraint, VehicleConstraintType,
};

/// Outcome of one constraint on one vehicle. Recomputed on demand.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub vehicle_id: VehicleIdx,
    pub kind: ConstraintKind,
    pub severity: Severity,
    pub violated: bool,
}

pub type ConstraintViolations = SmallVec<[ConstraintViolation; 3]>;

#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<VehicleConstraintType>,
}

impl ConstraintSet {
    pub fn new(constraints: Vec<VehicleConstraintType>) -> Self {
        ConstraintSet { constraints }
    }

    pub fn from_kinds(kinds: &[ConstraintKind]) -> Self {
        ConstraintSet::new(kinds.iter().map(ConstraintKind::build).collect())
    }

    pub fn constraints(&self) -> &[VehicleConstraintType] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// One entry per configured constraint, in configuration order.
    pub fn check(
        &self,
        problem: &DeliveryProblem,
        route: &Route,
    ) -> Result<ConstraintViolations, ConfigurationError> {
        self.constraints
            .iter()
            .map(|constraint| {
                Ok(ConstraintViolation {
                    vehicle_id: route.vehicle_id(),
                    kind: constraint.kind(),
                    severity: constraint.severity(),
                    violated: constraint.violated(problem, route)?,
                })
            })
            .collect()
    }

    /// Whether no hard constraint is violated. Diagnostics are skipped.
    pub fn is_feasible(
        &self,
        problem: &DeliveryProblem,
        route: &Route,
    ) -> Result<bool, ConfigurationError> {
        for constraint in &self.constraints {
            if constraint.severity() == Severity::Hard && constraint.violated(problem, route)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}
