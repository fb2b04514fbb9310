use thiserror::Error;

use crate::{plan::error::PlanError, problem::error::ConfigurationError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JsonInputError {
    #[error("unknown stop id {0}")]
    UnknownStop(String),

    #[error("unknown vehicle id {0}")]
    UnknownVehicle(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}
