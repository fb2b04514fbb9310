pub mod constraints;
pub mod engine;
pub mod plan;
pub mod problem;
pub mod report;
mod utils;
pub mod valuation;

pub mod json;

#[cfg(test)]
pub(crate) mod test_utils;
