use fxhash::{FxHashMap, FxHashSet};
use jiff::Timestamp;

use super::{
    error::ConfigurationError,
    stop::{Stop, StopIdx},
    table::Table,
    vehicle::{Vehicle, VehicleIdx},
};

/// The static attribute tables of a delivery problem.
///
/// Built once from input and never mutated afterwards, the problem is shared
/// behind an `Arc` by every evaluation call of every search branch.
#[derive(Debug)]
pub struct DeliveryProblem {
    stops: Vec<Stop>,
    vehicles: Vec<Vehicle>,

    quantities: Table<i64>,
    unassigned_penalties: Table<i64>,
    target_times: Table<Timestamp>,
    earliness_penalties: Table<i64>,
    lateness_penalties: Table<i64>,

    capacities: Table<i64>,
    initialization_costs: Table<i64>,

    stop_ids: FxHashMap<String, StopIdx>,
    vehicle_ids: FxHashMap<String, VehicleIdx>,

    distinct_classifications: usize,
}

impl DeliveryProblem {
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn stop(&self, stop_id: StopIdx) -> Result<&Stop, ConfigurationError> {
        self.stops
            .get(stop_id.get())
            .ok_or(ConfigurationError::IndexOutOfBounds {
                table: "stops",
                index: stop_id.get(),
                len: self.stops.len(),
            })
    }

    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> Result<&Vehicle, ConfigurationError> {
        self.vehicles
            .get(vehicle_id.get())
            .ok_or(ConfigurationError::IndexOutOfBounds {
                table: "vehicles",
                index: vehicle_id.get(),
                len: self.vehicles.len(),
            })
    }

    pub fn stop_index(&self, external_id: &str) -> Option<StopIdx> {
        self.stop_ids.get(external_id).copied()
    }

    pub fn vehicle_index(&self, external_id: &str) -> Option<VehicleIdx> {
        self.vehicle_ids.get(external_id).copied()
    }

    /// Signed demand of a stop; negative values are drop-offs.
    pub fn quantity(&self, stop_id: StopIdx) -> Result<i64, ConfigurationError> {
        self.quantities.require(stop_id.get()).copied()
    }

    pub fn unassigned_penalty(&self, stop_id: StopIdx) -> Result<i64, ConfigurationError> {
        self.unassigned_penalties.require(stop_id.get()).copied()
    }

    /// `Ok(None)` when no target time is configured for the stop.
    pub fn target_time(&self, stop_id: StopIdx) -> Result<Option<Timestamp>, ConfigurationError> {
        self.target_times.get(stop_id.get())
    }

    pub fn earliness_penalty(&self, stop_id: StopIdx) -> Result<i64, ConfigurationError> {
        self.earliness_penalties.require(stop_id.get()).copied()
    }

    pub fn lateness_penalty(&self, stop_id: StopIdx) -> Result<i64, ConfigurationError> {
        self.lateness_penalties.require(stop_id.get()).copied()
    }

    pub fn capacity(&self, vehicle_id: VehicleIdx) -> Result<i64, ConfigurationError> {
        self.capacities.require(vehicle_id.get()).copied()
    }

    pub fn initialization_cost(&self, vehicle_id: VehicleIdx) -> Result<i64, ConfigurationError> {
        self.initialization_costs.require(vehicle_id.get()).copied()
    }

    /// Number of distinct classification labels across all stops, an unlabeled
    /// stop counting as one label of its own.
    pub fn distinct_classifications(&self) -> usize {
        self.distinct_classifications
    }

    fn count_distinct_classifications(stops: &[Stop]) -> usize {
        stops
            .iter()
            .map(|stop| stop.classification())
            .collect::<FxHashSet<_>>()
            .len()
    }
}

#[derive(Default)]
pub struct DeliveryProblemBuilder {
    stops: Option<Vec<Stop>>,
    vehicles: Option<Vec<Vehicle>>,
    quantities: Option<Vec<i64>>,
    unassigned_penalties: Option<Vec<i64>>,
    target_times: Option<Vec<Timestamp>>,
    earliness_penalties: Option<Vec<i64>>,
    lateness_penalties: Option<Vec<i64>>,
    capacities: Option<Vec<i64>>,
    initialization_costs: Option<Vec<i64>>,
    precedences: Vec<(StopIdx, StopIdx)>,
}

impl DeliveryProblemBuilder {
    pub fn set_stops(&mut self, stops: Vec<Stop>) -> &mut DeliveryProblemBuilder {
        self.stops = Some(stops);
        self
    }

    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) -> &mut DeliveryProblemBuilder {
        self.vehicles = Some(vehicles);
        self
    }

    pub fn set_quantities(&mut self, quantities: Vec<i64>) -> &mut DeliveryProblemBuilder {
        self.quantities = Some(quantities);
        self
    }

    pub fn set_unassigned_penalties(&mut self, penalties: Vec<i64>) -> &mut DeliveryProblemBuilder {
        self.unassigned_penalties = Some(penalties);
        self
    }

    /// Target times may cover only a prefix of the stops.
    pub fn set_target_times(&mut self, target_times: Vec<Timestamp>) -> &mut DeliveryProblemBuilder {
        self.target_times = Some(target_times);
        self
    }

    pub fn set_earliness_penalties(&mut self, penalties: Vec<i64>) -> &mut DeliveryProblemBuilder {
        self.earliness_penalties = Some(penalties);
        self
    }

    pub fn set_lateness_penalties(&mut self, penalties: Vec<i64>) -> &mut DeliveryProblemBuilder {
        self.lateness_penalties = Some(penalties);
        self
    }

    pub fn set_capacities(&mut self, capacities: Vec<i64>) -> &mut DeliveryProblemBuilder {
        self.capacities = Some(capacities);
        self
    }

    pub fn set_initialization_costs(&mut self, costs: Vec<i64>) -> &mut DeliveryProblemBuilder {
        self.initialization_costs = Some(costs);
        self
    }

    /// Pairs a pick-up with the drop-off that has to follow it on LIFO routes.
    pub fn add_precedence(&mut self, pickup: StopIdx, dropoff: StopIdx) -> &mut DeliveryProblemBuilder {
        self.precedences.push((pickup, dropoff));
        self
    }

    /// Assembles the problem.
    ///
    /// Tables left unset default to zeros over the full stop or vehicle range,
    /// except the target times which default to "none configured". Tables that
    /// were set are kept as given; a short required table only surfaces as an
    /// error when an evaluation reaches the missing entry.
    pub fn build(self) -> Result<DeliveryProblem, ConfigurationError> {
        let mut stops = self.stops.unwrap_or_default();
        let vehicles = self.vehicles.unwrap_or_default();
        let stop_count = stops.len();
        let vehicle_count = vehicles.len();

        let stop_ids = index_ids("stop", stops.iter().map(Stop::external_id), StopIdx::new)?;
        let vehicle_ids = index_ids(
            "vehicle",
            vehicles.iter().map(Vehicle::external_id),
            VehicleIdx::new,
        )?;

        for (pickup, dropoff) in self.precedences {
            if dropoff.get() >= stop_count {
                return Err(ConfigurationError::IndexOutOfBounds {
                    table: "stops",
                    index: dropoff.get(),
                    len: stop_count,
                });
            }
            let Some(stop) = stops.get_mut(pickup.get()) else {
                return Err(ConfigurationError::IndexOutOfBounds {
                    table: "stops",
                    index: pickup.get(),
                    len: stop_count,
                });
            };
            stop.set_precedence_partner(dropoff);
        }

        let zeros = |len: usize| vec![0; len];

        Ok(DeliveryProblem {
            distinct_classifications: DeliveryProblem::count_distinct_classifications(&stops),
            quantities: Table::required(
                "quantities",
                self.quantities.unwrap_or_else(|| zeros(stop_count)),
            ),
            unassigned_penalties: Table::required(
                "unassigned_penalties",
                self.unassigned_penalties
                    .unwrap_or_else(|| zeros(stop_count)),
            ),
            target_times: Table::sparse("target_times", self.target_times.unwrap_or_default()),
            earliness_penalties: Table::required(
                "earliness_penalties",
                self.earliness_penalties.unwrap_or_else(|| zeros(stop_count)),
            ),
            lateness_penalties: Table::required(
                "lateness_penalties",
                self.lateness_penalties.unwrap_or_else(|| zeros(stop_count)),
            ),
            capacities: Table::required(
                "capacities",
                self.capacities.unwrap_or_else(|| zeros(vehicle_count)),
            ),
            initialization_costs: Table::required(
                "initialization_costs",
                self.initialization_costs
                    .unwrap_or_else(|| zeros(vehicle_count)),
            ),
            stops,
            vehicles,
            stop_ids,
            vehicle_ids,
        })
    }
}

fn index_ids<'a, I>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
    make_index: impl Fn(usize) -> I,
) -> Result<FxHashMap<String, I>, ConfigurationError> {
    let mut map = FxHashMap::default();
    for (index, id) in ids.enumerate() {
        if map.insert(id.to_owned(), make_index(index)).is_some() {
            return Err(ConfigurationError::DuplicateId {
                kind,
                id: id.to_owned(),
            });
        }
    }
    Ok(map)
}
