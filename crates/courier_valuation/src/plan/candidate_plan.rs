use fixedbitset::FixedBitSet;
use serde::Serialize;

use crate::{
    plan::{error::PlanError, route::Route},
    problem::{delivery_problem::DeliveryProblem, stop::StopIdx, vehicle::VehicleIdx},
};

/// One route per vehicle plus the unassigned stops.
///
/// Every stop of the problem is either on exactly one route or unassigned,
/// which is checked whenever a plan is built.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CandidatePlan {
    routes: Vec<Route>,
    unassigned: Vec<StopIdx>,
}

impl CandidatePlan {
    /// Builds a plan, `routes` may come in any vehicle order.
    pub fn new(
        problem: &DeliveryProblem,
        routes: Vec<Route>,
        unassigned: Vec<StopIdx>,
    ) -> Result<Self, PlanError> {
        let vehicle_count = problem.vehicles().len();
        let mut slots: Vec<Option<Route>> = vec![None; vehicle_count];

        for route in routes {
            let vehicle_id = route.vehicle_id();
            let slot = slots
                .get_mut(vehicle_id.get())
                .ok_or(PlanError::UnknownVehicle(vehicle_id))?;
            if slot.is_some() {
                return Err(PlanError::DuplicateRoute(vehicle_id));
            }
            *slot = Some(route);
        }

        let routes = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(PlanError::MissingRoute(VehicleIdx::new(index))))
            .collect::<Result<Vec<_>, _>>()?;

        let plan = CandidatePlan { routes, unassigned };
        plan.check_membership(problem.stops().len())?;

        Ok(plan)
    }

    /// A plan where every vehicle is idle and every stop unassigned.
    pub fn unassigned(problem: &DeliveryProblem) -> Self {
        CandidatePlan {
            routes: VehicleIdx::range(problem.vehicles().len())
                .map(Route::empty)
                .collect(),
            unassigned: StopIdx::range(problem.stops().len()).collect(),
        }
    }

    /// Derives a new plan by swapping in `changed_routes`; the receiver is left untouched.
    pub fn mutate(
        &self,
        problem: &DeliveryProblem,
        changed_routes: Vec<Route>,
        unassigned: Vec<StopIdx>,
    ) -> Result<CandidatePlan, PlanError> {
        let mut routes = self.routes.clone();
        for route in changed_routes {
            let vehicle_id = route.vehicle_id();
            let slot = routes
                .get_mut(vehicle_id.get())
                .ok_or(PlanError::UnknownVehicle(vehicle_id))?;
            *slot = route;
        }

        CandidatePlan::new(problem, routes, unassigned)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, vehicle_id: VehicleIdx) -> Option<&Route> {
        self.routes.get(vehicle_id.get())
    }

    pub fn unassigned_stops(&self) -> &[StopIdx] {
        &self.unassigned
    }

    fn check_membership(&self, stop_count: usize) -> Result<(), PlanError> {
        let mut seen = FixedBitSet::with_capacity(stop_count);

        let planned = self
            .routes
            .iter()
            .flat_map(|route| route.interior().iter())
            .chain(self.unassigned.iter());

        for &stop_id in planned {
            if stop_id.get() >= stop_count {
                return Err(PlanError::UnknownStop(stop_id));
            }
            if seen.put(stop_id.get()) {
                return Err(PlanError::DuplicateStop(stop_id));
            }
        }

        match seen.zeroes().next() {
            Some(missing) => Err(PlanError::MissingStop(StopIdx::new(missing))),
            None => Ok(()),
        }
    }
}
