use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    plan::route::Route,
    problem::{delivery_problem::DeliveryProblem, error::ConfigurationError},
};

use super::{
    lifo_adherence_constraint::LifoAdherenceConstraint,
    single_large_stop_constraint::SingleLargeStopConstraint,
    type_homogeneity_constraint::TypeHomogeneityConstraint,
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// A violation makes the route infeasible.
    Hard,
    /// Reported only, never blocks a route.
    Diagnostic,
}

pub trait VehicleConstraint {
    fn severity(&self) -> Severity;

    /// Stateless check of one vehicle's route.
    fn violated(&self, problem: &DeliveryProblem, route: &Route)
    -> Result<bool, ConfigurationError>;
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    SingleLargeStop,
    TypeHomogeneity,
    LifoAdherence,
}

impl ConstraintKind {
    /// Same spelling as the configuration.
    pub fn constraint_name(&self) -> &'static str {
        match self {
            ConstraintKind::SingleLargeStop => "single_large_stop",
            ConstraintKind::TypeHomogeneity => "type_homogeneity",
            ConstraintKind::LifoAdherence => "lifo_adherence",
        }
    }

    pub fn build(&self) -> VehicleConstraintType {
        match self {
            ConstraintKind::SingleLargeStop => {
                VehicleConstraintType::SingleLargeStop(SingleLargeStopConstraint)
            }
            ConstraintKind::TypeHomogeneity => {
                VehicleConstraintType::TypeHomogeneity(TypeHomogeneityConstraint)
            }
            ConstraintKind::LifoAdherence => {
                VehicleConstraintType::LifoAdherence(LifoAdherenceConstraint)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum VehicleConstraintType {
    SingleLargeStop(SingleLargeStopConstraint),
    TypeHomogeneity(TypeHomogeneityConstraint),
    LifoAdherence(LifoAdherenceConstraint),
}

impl VehicleConstraintType {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            VehicleConstraintType::SingleLargeStop(_) => ConstraintKind::SingleLargeStop,
            VehicleConstraintType::TypeHomogeneity(_) => ConstraintKind::TypeHomogeneity,
            VehicleConstraintType::LifoAdherence(_) => ConstraintKind::LifoAdherence,
        }
    }
}

impl VehicleConstraint for VehicleConstraintType {
    fn severity(&self) -> Severity {
        match self {
            VehicleConstraintType::SingleLargeStop(c) => c.severity(),
            VehicleConstraintType::TypeHomogeneity(c) => c.severity(),
            VehicleConstraintType::LifoAdherence(c) => c.severity(),
        }
    }

    fn violated(
        &self,
        problem: &DeliveryProblem,
        route: &Route,
    ) -> Result<bool, ConfigurationError> {
        match self {
            VehicleConstraintType::SingleLargeStop(c) => c.violated(problem, route),
            VehicleConstraintType::TypeHomogeneity(c) => c.violated(problem, route),
            VehicleConstraintType::LifoAdherence(c) => c.violated(problem, route),
        }
    }
}
