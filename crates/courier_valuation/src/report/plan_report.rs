use jiff::Timestamp;
use serde::Serialize;
use tracing::warn;

use crate::{
    constraints::{
        constraint_set::ConstraintViolations, lifo_adherence_constraint::LifoAdherenceConstraint,
        vehicle_constraint::Severity,
    },
    engine::ValuationEngine,
    plan::{candidate_plan::CandidatePlan, route::Route, schedule::Schedule},
    problem::error::ConfigurationError,
    valuation::{
        terms::time_window_penalty_term::TimeWindowPenaltyTerm, value::Value,
        vehicle_evaluator::VehicleState,
    },
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PositionReport {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StopReport {
    pub id: String,
    pub position: PositionReport,
    pub estimated_arrival: Timestamp,
    pub estimated_departure: Timestamp,
    /// Seconds spent at the stop.
    pub estimated_service: i64,
    pub target: Option<Timestamp>,
    pub earliness: Value,
    pub lateness: Value,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VehicleReport {
    pub id: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub route: Vec<StopReport>,
    /// Seconds from the start to the end of the schedule.
    pub route_duration: i64,
    pub value: Value,
    pub within_shift: bool,
    pub constraints: ConstraintViolations,
    pub lifo_violations: usize,
}

/// Human-facing summary of a valued plan.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlanReport {
    pub vehicles: Vec<VehicleReport>,
    /// Number of stops visited by some vehicle.
    pub assigned: usize,
    pub unassigned: Vec<String>,
    pub earliness: Value,
    pub lateness: Value,
    pub total_duration: i64,
    pub num_lifo_violations: usize,
    pub imbalance_penalty: Value,
    pub unassigned_penalty: Value,
    pub value: Value,
    /// No vehicle breaks a hard constraint.
    pub feasible: bool,
}

impl PlanReport {
    pub fn build(
        engine: &ValuationEngine,
        plan: &CandidatePlan,
        schedules: &[Schedule],
    ) -> Result<PlanReport, ConfigurationError> {
        let problem = engine.problem();
        let state = engine.evaluate_from_scratch(plan, schedules)?;

        let vehicles = plan
            .routes()
            .iter()
            .zip(schedules)
            .map(|(route, schedule)| {
                vehicle_report(engine, route, schedule, &state.vehicle(route.vehicle_id()))
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;

        let unassigned = plan
            .unassigned_stops()
            .iter()
            .map(|&stop_id| Ok(problem.stop(stop_id)?.external_id().to_owned()))
            .collect::<Result<Vec<_>, ConfigurationError>>()?;

        let num_lifo_violations = vehicles
            .iter()
            .map(|vehicle| vehicle.lifo_violations)
            .sum::<usize>();
        if num_lifo_violations > 0 {
            warn!(num_lifo_violations, "plan breaks LIFO precedences");
        }

        let feasible = vehicles.iter().all(|vehicle| {
            vehicle.constraints.iter().all(|constraint| {
                !constraint.violated || constraint.severity == Severity::Diagnostic
            })
        });

        Ok(PlanReport {
            assigned: vehicles.iter().map(|vehicle| vehicle.route.len()).sum(),
            earliness: vehicles
                .iter()
                .flat_map(|vehicle| &vehicle.route)
                .map(|stop| stop.earliness)
                .fold(0, Value::saturating_add),
            lateness: vehicles
                .iter()
                .flat_map(|vehicle| &vehicle.route)
                .map(|stop| stop.lateness)
                .fold(0, Value::saturating_add),
            total_duration: vehicles.iter().map(|vehicle| vehicle.route_duration).sum(),
            num_lifo_violations,
            imbalance_penalty: state.plan().imbalance_penalty(),
            unassigned_penalty: state.plan().unassigned_penalty(),
            value: state.value(),
            feasible,
            vehicles,
            unassigned,
        })
    }
}

fn vehicle_report(
    engine: &ValuationEngine,
    route: &Route,
    schedule: &Schedule,
    state: &VehicleState,
) -> Result<VehicleReport, ConfigurationError> {
    let problem = engine.problem();
    let vehicle = problem.vehicle(route.vehicle_id())?;
    schedule.check_aligned(route)?;

    let stops = route
        .interior_positions()
        .map(|(position, stop_id)| {
            let stop = problem.stop(stop_id)?;
            let arrival = schedule.arrival_at(route, position)?;
            let departure = schedule.departure_at(route, position)?;
            let penalty = TimeWindowPenaltyTerm::stop_penalty(problem, stop_id, arrival)?;

            Ok(StopReport {
                id: stop.external_id().to_owned(),
                position: PositionReport {
                    lon: stop.position().x(),
                    lat: stop.position().y(),
                },
                estimated_arrival: arrival,
                estimated_departure: departure,
                estimated_service: departure.duration_since(arrival).as_secs(),
                target: penalty.target,
                earliness: penalty.earliness,
                lateness: penalty.lateness,
            })
        })
        .collect::<Result<Vec<_>, ConfigurationError>>()?;

    let start = schedule.departure_at(route, 0)?;
    let end = schedule.arrival_at(route, route.len() - 1)?;

    Ok(VehicleReport {
        id: vehicle.external_id().to_owned(),
        start,
        end,
        route: stops,
        route_duration: schedule.elapsed().as_secs(),
        value: state.value(),
        within_shift: vehicle.shift().contains(start) && vehicle.shift().contains(end),
        constraints: engine.check_constraints(route)?,
        lifo_violations: LifoAdherenceConstraint.count_violations(problem, route)?,
    })
}
