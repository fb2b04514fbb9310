use fxhash::{FxHashMap, FxHashSet};
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    constraints::vehicle_constraint::ConstraintKind,
    plan::{candidate_plan::CandidatePlan, error::PlanError, route::Route, schedule::Schedule},
    problem::{
        delivery_problem::{DeliveryProblem, DeliveryProblemBuilder},
        error::ConfigurationError,
        stop::{StopBuilder, StopIdx},
        time_window::TimeWindow,
        vehicle::{VehicleBuilder, VehicleIdx},
    },
    valuation::{
        params::{ValuationParams, ValuationTemplate},
        terms::vehicle_value_term::TermKind,
        unassigned_penalty::UnassignedPenalty,
        value::Value,
    },
};

use super::error::JsonInputError;

#[derive(Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "ValuationInput")]
pub struct JsonValuationInput {
    pub stops: Vec<JsonStop>,
    pub vehicles: Vec<JsonVehicle>,

    /// Signed load per stop, pick-ups positive.
    pub quantities: Option<Vec<i64>>,
    pub unassigned_penalties: Option<Vec<i64>>,
    /// May be shorter than `stops`; trailing stops have no target time.
    pub target_times: Option<Vec<Timestamp>>,
    pub earliness_penalties: Option<Vec<i64>>,
    pub lateness_penalties: Option<Vec<i64>>,
    pub capacities: Option<Vec<i64>>,
    pub initialization_costs: Option<Vec<i64>>,

    #[serde(default)]
    pub precedences: Vec<JsonPrecedence>,
    /// Ids of the stops unloaded last-in-first-out.
    #[serde(default)]
    pub lifo: Vec<String>,

    #[serde(default)]
    pub configuration: JsonConfiguration,
    pub plan: JsonPlan,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Stop")]
pub struct JsonStop {
    pub id: String,
    pub position: JsonPosition,
    pub classification: Option<String>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Copy)]
#[serde(deny_unknown_fields, rename = "Position")]
pub struct JsonPosition {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Vehicle")]
pub struct JsonVehicle {
    pub id: String,
    pub shift: Option<TimeWindow>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Precedence")]
pub struct JsonPrecedence {
    pub pickup: String,
    pub dropoff: String,
}

/// A template plus optional overrides of its settings.
#[derive(Serialize, Deserialize, JsonSchema, Default)]
#[serde(deny_unknown_fields, rename = "Configuration")]
pub struct JsonConfiguration {
    #[serde(default)]
    pub template: ValuationTemplate,
    pub terms: Option<Vec<TermKind>>,
    pub constraints: Option<Vec<ConstraintKind>>,
    pub imbalance_weight: Option<Value>,
    pub unassigned_penalty: Option<UnassignedPenalty>,
    pub utilization_scale: Option<f64>,
}

impl JsonConfiguration {
    pub fn params(&self) -> ValuationParams {
        let mut params = self.template.params();

        if let Some(terms) = &self.terms {
            params.terms = terms.clone();
        }

        if let Some(constraints) = &self.constraints {
            params.constraints = constraints.clone();
        }

        if let Some(imbalance_weight) = self.imbalance_weight {
            params.imbalance_weight = imbalance_weight;
        }

        if let Some(unassigned_penalty) = self.unassigned_penalty {
            params.unassigned_penalty = unassigned_penalty;
        }

        if let Some(utilization_scale) = self.utilization_scale {
            params.utilization_scale = utilization_scale;
        }

        params
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Plan")]
pub struct JsonPlan {
    /// Vehicles without a route stay idle at the start of their shift.
    pub routes: Vec<JsonRoute>,
    /// Defaults to every stop not found on a route.
    pub unassigned: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Route")]
pub struct JsonRoute {
    pub vehicle: String,
    pub start: JsonVisit,
    pub stops: Vec<JsonStopVisit>,
    pub end: JsonVisit,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Copy)]
#[serde(deny_unknown_fields, rename = "Visit")]
pub struct JsonVisit {
    pub estimated_arrival: Timestamp,
    pub estimated_departure: Timestamp,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "StopVisit")]
pub struct JsonStopVisit {
    pub id: String,
    pub estimated_arrival: Timestamp,
    pub estimated_departure: Timestamp,
}

/// A parsed input, ready to be evaluated.
pub struct LoadedInput {
    pub problem: DeliveryProblem,
    pub params: ValuationParams,
    pub plan: CandidatePlan,
    /// One schedule per vehicle, in vehicle order.
    pub schedules: Vec<Schedule>,
}

impl JsonValuationInput {
    #[instrument(skip_all, level = "debug")]
    pub fn build(self) -> Result<LoadedInput, JsonInputError> {
        let params = self.configuration.params();
        let problem = build_problem(
            self.stops,
            self.vehicles,
            ProblemTables {
                quantities: self.quantities,
                unassigned_penalties: self.unassigned_penalties,
                target_times: self.target_times,
                earliness_penalties: self.earliness_penalties,
                lateness_penalties: self.lateness_penalties,
                capacities: self.capacities,
                initialization_costs: self.initialization_costs,
            },
            &self.precedences,
            &self.lifo,
        )?;

        let (plan, schedules) = build_plan(&problem, self.plan)?;

        debug!(
            stops = problem.stops().len(),
            vehicles = problem.vehicles().len(),
            unassigned = plan.unassigned_stops().len(),
            "valuation input loaded"
        );

        Ok(LoadedInput {
            problem,
            params,
            plan,
            schedules,
        })
    }
}

struct ProblemTables {
    quantities: Option<Vec<i64>>,
    unassigned_penalties: Option<Vec<i64>>,
    target_times: Option<Vec<Timestamp>>,
    earliness_penalties: Option<Vec<i64>>,
    lateness_penalties: Option<Vec<i64>>,
    capacities: Option<Vec<i64>>,
    initialization_costs: Option<Vec<i64>>,
}

fn build_problem(
    stops: Vec<JsonStop>,
    vehicles: Vec<JsonVehicle>,
    tables: ProblemTables,
    precedences: &[JsonPrecedence],
    lifo: &[String],
) -> Result<DeliveryProblem, JsonInputError> {
    let stop_indices = stops
        .iter()
        .enumerate()
        .map(|(index, stop)| (stop.id.clone(), StopIdx::new(index)))
        .collect::<FxHashMap<_, _>>();
    let stop_index = |id: &str| {
        stop_indices
            .get(id)
            .copied()
            .ok_or_else(|| JsonInputError::UnknownStop(id.to_owned()))
    };

    let mut lifo_stops = FxHashSet::default();
    for id in lifo {
        lifo_stops.insert(stop_index(id)?);
    }

    let stops = stops
        .into_iter()
        .enumerate()
        .map(|(index, stop)| {
            let mut builder = StopBuilder::default();
            builder
                .set_external_id(stop.id)
                .set_position(stop.position.lon, stop.position.lat)
                .set_lifo(lifo_stops.contains(&StopIdx::new(index)));

            if let Some(classification) = stop.classification {
                builder.set_classification(classification);
            }

            builder.build()
        })
        .collect::<Result<Vec<_>, ConfigurationError>>()?;

    let vehicles = vehicles
        .into_iter()
        .map(|vehicle| {
            let mut builder = VehicleBuilder::default();
            builder.set_vehicle_id(vehicle.id);

            if let Some(shift) = vehicle.shift {
                builder.set_shift(shift);
            }

            builder.build()
        })
        .collect::<Result<Vec<_>, ConfigurationError>>()?;

    let mut builder = DeliveryProblemBuilder::default();
    builder.set_stops(stops).set_vehicles(vehicles);

    for precedence in precedences {
        builder.add_precedence(
            stop_index(&precedence.pickup)?,
            stop_index(&precedence.dropoff)?,
        );
    }

    if let Some(quantities) = tables.quantities {
        builder.set_quantities(quantities);
    }

    if let Some(penalties) = tables.unassigned_penalties {
        builder.set_unassigned_penalties(penalties);
    }

    if let Some(target_times) = tables.target_times {
        builder.set_target_times(target_times);
    }

    if let Some(penalties) = tables.earliness_penalties {
        builder.set_earliness_penalties(penalties);
    }

    if let Some(penalties) = tables.lateness_penalties {
        builder.set_lateness_penalties(penalties);
    }

    if let Some(capacities) = tables.capacities {
        builder.set_capacities(capacities);
    }

    if let Some(costs) = tables.initialization_costs {
        builder.set_initialization_costs(costs);
    }

    Ok(builder.build()?)
}

fn build_plan(
    problem: &DeliveryProblem,
    plan: JsonPlan,
) -> Result<(CandidatePlan, Vec<Schedule>), JsonInputError> {
    let stop_index = |id: &str| {
        problem
            .stop_index(id)
            .ok_or_else(|| JsonInputError::UnknownStop(id.to_owned()))
    };

    let mut slots: Vec<Option<(Route, Schedule)>> = vec![None; problem.vehicles().len()];

    for json_route in plan.routes {
        let vehicle_id = problem
            .vehicle_index(&json_route.vehicle)
            .ok_or_else(|| JsonInputError::UnknownVehicle(json_route.vehicle.clone()))?;

        let stops = json_route
            .stops
            .iter()
            .map(|visit| stop_index(&visit.id))
            .collect::<Result<Vec<_>, _>>()?;

        let visits = std::iter::once((
            json_route.start.estimated_arrival,
            json_route.start.estimated_departure,
        ))
        .chain(
            json_route
                .stops
                .iter()
                .map(|visit| (visit.estimated_arrival, visit.estimated_departure)),
        )
        .chain(std::iter::once((
            json_route.end.estimated_arrival,
            json_route.end.estimated_departure,
        )));
        let (arrivals, departures): (Vec<_>, Vec<_>) = visits.unzip();
        let schedule = Schedule::new(arrivals, departures)?;

        let slot = &mut slots[vehicle_id.get()];
        if slot.is_some() {
            return Err(PlanError::DuplicateRoute(vehicle_id).into());
        }
        *slot = Some((Route::new(vehicle_id, stops), schedule));
    }

    let (routes, schedules): (Vec<_>, Vec<_>) = slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| -> Result<_, JsonInputError> {
            match slot {
                Some(entry) => Ok(entry),
                None => idle_vehicle(problem, VehicleIdx::new(index)),
            }
        })
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .unzip();

    let unassigned = match plan.unassigned {
        Some(ids) => ids
            .iter()
            .map(|id| stop_index(id))
            .collect::<Result<Vec<_>, _>>()?,
        None => {
            let routed = routes
                .iter()
                .flat_map(|route| route.interior().iter().copied())
                .collect::<FxHashSet<_>>();
            StopIdx::range(problem.stops().len())
                .filter(|stop_id| !routed.contains(stop_id))
                .collect()
        }
    };

    let plan = CandidatePlan::new(problem, routes, unassigned)?;
    Ok((plan, schedules))
}

fn idle_vehicle(
    problem: &DeliveryProblem,
    vehicle_id: VehicleIdx,
) -> Result<(Route, Schedule), JsonInputError> {
    let start = problem
        .vehicle(vehicle_id)?
        .shift()
        .start()
        .unwrap_or(Timestamp::UNIX_EPOCH);
    let schedule = Schedule::new(vec![start, start], vec![start, start])?;

    Ok((Route::empty(vehicle_id), schedule))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"{
        "stops": [
            { "id": "bakery", "position": { "lon": 7.62, "lat": 51.96 }, "classification": "large" },
            { "id": "cafe", "position": { "lon": 7.63, "lat": 51.95 }, "classification": "small" },
            { "id": "hotel", "position": { "lon": 7.61, "lat": 51.97 } }
        ],
        "vehicles": [
            { "id": "van-1", "shift": { "start": "2024-05-01T06:00:00Z", "end": "2024-05-01T14:00:00Z" } },
            { "id": "van-2" }
        ],
        "quantities": [3, -1, 2],
        "unassigned_penalties": [100, 200, 300],
        "target_times": ["2024-05-01T06:10:00Z"],
        "earliness_penalties": [1, 1, 1],
        "lateness_penalties": [2, 2, 2],
        "precedences": [{ "pickup": "bakery", "dropoff": "cafe" }],
        "lifo": ["bakery"],
        "configuration": { "template": "customized_value", "imbalance_weight": 4 },
        "plan": {
            "routes": [
                {
                    "vehicle": "van-1",
                    "start": { "estimated_arrival": "2024-05-01T06:00:00Z", "estimated_departure": "2024-05-01T06:00:00Z" },
                    "stops": [
                        { "id": "bakery", "estimated_arrival": "2024-05-01T06:15:00Z", "estimated_departure": "2024-05-01T06:20:00Z" },
                        { "id": "cafe", "estimated_arrival": "2024-05-01T06:30:00Z", "estimated_departure": "2024-05-01T06:35:00Z" }
                    ],
                    "end": { "estimated_arrival": "2024-05-01T07:00:00Z", "estimated_departure": "2024-05-01T07:00:00Z" }
                }
            ]
        }
    }"#;

    fn load(input: &str) -> Result<LoadedInput, JsonInputError> {
        serde_json::from_str::<JsonValuationInput>(input)
            .unwrap()
            .build()
    }

    #[test]
    fn test_build_problem() {
        let loaded = load(INPUT).unwrap();
        let problem = &loaded.problem;

        assert_eq!(problem.stops().len(), 3);
        assert_eq!(problem.vehicles().len(), 2);

        let bakery = problem.stop(StopIdx::new(0)).unwrap();
        assert!(bakery.is_lifo());
        assert!(bakery.is_large());
        assert_eq!(bakery.precedence_partner(), Some(StopIdx::new(1)));
        assert_eq!(bakery.position().x(), 7.62);

        assert!(problem.target_time(StopIdx::new(0)).unwrap().is_some());
        assert_eq!(problem.target_time(StopIdx::new(2)), Ok(None));
        assert_eq!(problem.quantity(StopIdx::new(1)), Ok(-1));
    }

    #[test]
    fn test_build_plan_and_schedules() {
        let loaded = load(INPUT).unwrap();

        assert_eq!(loaded.plan.routes()[0].interior(), &[StopIdx::new(0), StopIdx::new(1)]);
        assert!(loaded.plan.routes()[1].is_empty());
        assert_eq!(loaded.plan.unassigned_stops(), &[StopIdx::new(2)]);

        assert_eq!(loaded.schedules.len(), 2);
        assert_eq!(loaded.schedules[0].len(), 4);
        // van-2 has no shift and stays put
        assert_eq!(loaded.schedules[1].arrival(0), Some(Timestamp::UNIX_EPOCH));
        assert_eq!(loaded.schedules[1].elapsed().as_secs(), 0);
    }

    #[test]
    fn test_configuration_overrides_template() {
        let loaded = load(INPUT).unwrap();

        assert_eq!(
            loaded.params.terms,
            vec![TermKind::DurationCost, TermKind::TimeWindowPenalty]
        );
        assert_eq!(loaded.params.imbalance_weight, 4);
        assert_eq!(loaded.params.unassigned_penalty, UnassignedPenalty::PerStop);
    }

    #[test]
    fn test_unknown_ids() {
        let unknown_stop = INPUT.replace(r#""lifo": ["bakery"]"#, r#""lifo": ["bank"]"#);
        assert_eq!(
            load(&unknown_stop).err(),
            Some(JsonInputError::UnknownStop("bank".to_owned()))
        );

        let unknown_vehicle = INPUT.replace(r#""vehicle": "van-1""#, r#""vehicle": "van-9""#);
        assert_eq!(
            load(&unknown_vehicle).err(),
            Some(JsonInputError::UnknownVehicle("van-9".to_owned()))
        );
    }

    #[test]
    fn test_explicit_unassigned_must_cover_all_stops() {
        let input = INPUT.replace(r#""plan": {"#, r#""plan": { "unassigned": [],"#);

        assert_eq!(
            load(&input).err(),
            Some(JsonInputError::Plan(PlanError::MissingStop(StopIdx::new(2))))
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let input = INPUT.replace(r#""lifo""#, r#""last_in_first_out""#);
        assert!(serde_json::from_str::<JsonValuationInput>(&input).is_err());
    }
}
