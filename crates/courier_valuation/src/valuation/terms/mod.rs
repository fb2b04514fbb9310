pub mod duration_cost_term;
pub mod time_window_penalty_term;
pub mod usage_cost_term;
pub mod utilization_term;
pub mod vehicle_value_term;
