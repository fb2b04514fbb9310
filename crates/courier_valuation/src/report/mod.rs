pub mod plan_report;
