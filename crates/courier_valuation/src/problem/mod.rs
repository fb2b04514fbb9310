pub mod delivery_problem;
pub mod error;
pub mod stop;
pub mod table;
pub mod time_window;
pub mod vehicle;
