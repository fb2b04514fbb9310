pub mod candidate_plan;
pub mod error;
pub mod route;
pub mod schedule;
