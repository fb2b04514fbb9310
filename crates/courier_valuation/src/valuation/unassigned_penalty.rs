use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::problem::{delivery_problem::DeliveryProblem, error::ConfigurationError, stop::StopIdx};

use super::value::Value;

/// How unassigned stops are charged. One policy is picked per deployment.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(tag = "policy", content = "weight", rename_all = "snake_case")]
pub enum UnassignedPenalty {
    /// The same weight for every unassigned stop.
    Uniform(Value),
    /// Each stop's own `unassigned_penalties` entry.
    #[default]
    PerStop,
}

impl UnassignedPenalty {
    /// Recomputed in full on every call, the unassigned set stays small.
    pub fn total(
        &self,
        problem: &DeliveryProblem,
        unassigned: &[StopIdx],
    ) -> Result<Value, ConfigurationError> {
        match self {
            UnassignedPenalty::Uniform(weight) => {
                Ok((unassigned.len() as Value).saturating_mul(*weight))
            }
            UnassignedPenalty::PerStop => unassigned
                .iter()
                .try_fold(0, |total: Value, &stop_id| {
                    Ok(total.saturating_add(problem.unassigned_penalty(stop_id)?))
                }),
        }
    }
}
