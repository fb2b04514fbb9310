pub mod constraint_set;
pub mod lifo_adherence_constraint;
pub mod single_large_stop_constraint;
pub mod type_homogeneity_constraint;
pub mod vehicle_constraint;
