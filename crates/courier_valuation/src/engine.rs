use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    constraints::constraint_set::{ConstraintSet, ConstraintViolations},
    plan::{candidate_plan::CandidatePlan, route::Route, schedule::Schedule},
    problem::{delivery_problem::DeliveryProblem, error::ConfigurationError, vehicle::VehicleIdx},
    report::plan_report::PlanReport,
    valuation::{
        params::ValuationParams,
        plan_aggregator::{ChangedVehicle, PlanAggregator, PlanState, PlanUpdate},
        value::Value,
        vehicle_evaluator::{VehicleEvaluator, VehicleState, VehicleUpdate},
    },
};

/// Vehicle and plan states of one search branch.
///
/// Sibling branches derive from the same parent concurrently, the parent is
/// only ever read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateState {
    plan: PlanState,
    vehicles: Arc<Vec<VehicleState>>,
}

impl CandidateState {
    pub fn plan(&self) -> &PlanState {
        &self.plan
    }

    pub fn value(&self) -> Value {
        self.plan.value()
    }

    pub fn vehicles(&self) -> &[VehicleState] {
        &self.vehicles
    }

    /// The last computed state of a vehicle, zero when it was never evaluated.
    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> VehicleState {
        self.vehicles
            .get(vehicle_id.get())
            .copied()
            .unwrap_or_default()
    }
}

/// Entry point for a search procedure: scores candidate plans and checks
/// vehicle constraints against one shared problem.
pub struct ValuationEngine {
    problem: Arc<DeliveryProblem>,
    vehicle_evaluator: VehicleEvaluator,
    aggregator: PlanAggregator,
    constraints: ConstraintSet,
}

impl ValuationEngine {
    pub fn new(problem: Arc<DeliveryProblem>, params: &ValuationParams) -> Self {
        ValuationEngine {
            problem,
            vehicle_evaluator: params.vehicle_evaluator(),
            aggregator: params.plan_aggregator(),
            constraints: params.constraint_set(),
        }
    }

    pub fn problem(&self) -> &DeliveryProblem {
        &self.problem
    }

    pub fn vehicle_evaluator(&self) -> &VehicleEvaluator {
        &self.vehicle_evaluator
    }

    pub fn aggregator(&self) -> &PlanAggregator {
        &self.aggregator
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn evaluate_vehicle(
        &self,
        old: &VehicleState,
        route: &Route,
        schedule: &Schedule,
    ) -> Result<VehicleUpdate, ConfigurationError> {
        self.vehicle_evaluator
            .update(&self.problem, old, route, schedule)
    }

    pub fn evaluate_plan(
        &self,
        old: &PlanState,
        plan: &CandidatePlan,
        changed: &[ChangedVehicle],
    ) -> Result<PlanUpdate, ConfigurationError> {
        self.aggregator.update(&self.problem, old, plan, changed)
    }

    pub fn check_constraints(&self, route: &Route) -> Result<ConstraintViolations, ConfigurationError> {
        self.constraints.check(&self.problem, route)
    }

    pub fn is_feasible(&self, route: &Route) -> Result<bool, ConfigurationError> {
        self.constraints.is_feasible(&self.problem, route)
    }

    /// The state of a plan where no vehicle has been evaluated yet.
    pub fn initial_state(&self) -> CandidateState {
        CandidateState {
            plan: PlanState::default(),
            vehicles: Arc::new(vec![VehicleState::default(); self.problem.vehicles().len()]),
        }
    }

    /// Derives the state of `plan` from `parent` by re-evaluating the
    /// `changed` vehicles only. `schedules` is indexed by vehicle.
    pub fn evaluate_candidate(
        &self,
        parent: &CandidateState,
        plan: &CandidatePlan,
        schedules: &[Schedule],
        changed: &[VehicleIdx],
    ) -> Result<CandidateState, ConfigurationError> {
        let updates = changed
            .par_iter()
            .map(|&vehicle_id| {
                let (route, schedule) = self.route_and_schedule(plan, schedules, vehicle_id)?;
                let update = self.evaluate_vehicle(&parent.vehicle(vehicle_id), route, schedule)?;
                Ok((vehicle_id, update))
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;

        self.merge(&parent.plan, &parent.vehicles, plan, updates)
    }

    /// Values `plan` without a parent; every vehicle is evaluated.
    #[instrument(skip_all, level = "debug")]
    pub fn evaluate_from_scratch(
        &self,
        plan: &CandidatePlan,
        schedules: &[Schedule],
    ) -> Result<CandidateState, ConfigurationError> {
        let updates = VehicleIdx::range(self.problem.vehicles().len())
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|vehicle_id| {
                let (route, schedule) = self.route_and_schedule(plan, schedules, vehicle_id)?;
                let update =
                    self.evaluate_vehicle(&VehicleState::default(), route, schedule)?;
                Ok((vehicle_id, update))
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;

        let mut vehicles = vec![VehicleState::default(); self.problem.vehicles().len()];
        let mut values = Vec::with_capacity(updates.len());
        for (vehicle_id, update) in updates {
            vehicles[vehicle_id.get()] = update.state;
            if update.propagate {
                values.push(ChangedVehicle {
                    vehicle_id,
                    value: update.value,
                });
            }
        }

        let plan_update = self.aggregator.from_scratch(&self.problem, plan, &values)?;
        debug!(value = plan_update.value, "plan valued from scratch");

        Ok(CandidateState {
            plan: plan_update.state,
            vehicles: Arc::new(vehicles),
        })
    }

    pub fn report(
        &self,
        plan: &CandidatePlan,
        schedules: &[Schedule],
    ) -> Result<PlanReport, ConfigurationError> {
        PlanReport::build(self, plan, schedules)
    }

    fn route_and_schedule<'a>(
        &self,
        plan: &'a CandidatePlan,
        schedules: &'a [Schedule],
        vehicle_id: VehicleIdx,
    ) -> Result<(&'a Route, &'a Schedule), ConfigurationError> {
        let route = plan
            .route(vehicle_id)
            .ok_or(ConfigurationError::IndexOutOfBounds {
                table: "routes",
                index: vehicle_id.get(),
                len: plan.routes().len(),
            })?;
        let schedule = schedules
            .get(vehicle_id.get())
            .ok_or(ConfigurationError::MissingSchedule(vehicle_id))?;

        Ok((route, schedule))
    }

    fn merge(
        &self,
        parent_plan: &PlanState,
        parent_vehicles: &[VehicleState],
        plan: &CandidatePlan,
        updates: Vec<(VehicleIdx, VehicleUpdate)>,
    ) -> Result<CandidateState, ConfigurationError> {
        let mut vehicles = parent_vehicles.to_vec();
        vehicles.resize(self.problem.vehicles().len(), VehicleState::default());

        let mut propagated = Vec::with_capacity(updates.len());
        for (vehicle_id, update) in updates {
            if let Some(state) = vehicles.get_mut(vehicle_id.get()) {
                *state = update.state;
            }
            if update.propagate {
                propagated.push(ChangedVehicle {
                    vehicle_id,
                    value: update.value,
                });
            }
        }

        let plan_update = self
            .aggregator
            .update(&self.problem, parent_plan, plan, &propagated)?;

        Ok(CandidateState {
            plan: plan_update.state,
            vehicles: Arc::new(vehicles),
        })
    }
}
