pub mod params;
pub mod plan_aggregator;
pub mod terms;
pub mod unassigned_penalty;
pub mod value;
pub mod vehicle_evaluator;
