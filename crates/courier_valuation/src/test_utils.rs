use jiff::Timestamp;

use crate::{
    plan::{route::Route, schedule::Schedule},
    problem::{
        delivery_problem::{DeliveryProblem, DeliveryProblemBuilder},
        stop::{Stop, StopBuilder, StopIdx},
        vehicle::{Vehicle, VehicleBuilder, VehicleIdx},
    },
};

pub fn ts(seconds: i64) -> Timestamp {
    Timestamp::from_second(seconds).unwrap()
}

pub fn create_stops(ids: &[&str]) -> Vec<Stop> {
    ids.iter()
        .map(|&id| {
            let mut builder = StopBuilder::default();
            builder.set_external_id(id);
            builder.build().unwrap()
        })
        .collect()
}

pub fn create_classified_stops(classifications: &[Option<&str>]) -> Vec<Stop> {
    classifications
        .iter()
        .enumerate()
        .map(|(index, classification)| {
            let mut builder = StopBuilder::default();
            builder.set_external_id(format!("s{index}"));
            if let Some(classification) = classification {
                builder.set_classification(*classification);
            }
            builder.build().unwrap()
        })
        .collect()
}

pub fn create_vehicles(count: usize) -> Vec<Vehicle> {
    (0..count)
        .map(|index| {
            let mut builder = VehicleBuilder::default();
            builder.set_vehicle_id(format!("v{index}"));
            builder.build().unwrap()
        })
        .collect()
}

pub fn create_problem(stop_ids: &[&str], vehicle_count: usize) -> DeliveryProblem {
    let mut builder = DeliveryProblemBuilder::default();
    builder
        .set_stops(create_stops(stop_ids))
        .set_vehicles(create_vehicles(vehicle_count));
    builder.build().unwrap()
}

/// A problem with `stop_count` anonymous stops.
pub fn create_sized_problem(stop_count: usize, vehicle_count: usize) -> DeliveryProblem {
    let ids = (0..stop_count).map(|i| format!("s{i}")).collect::<Vec<_>>();
    let refs = ids.iter().map(String::as_str).collect::<Vec<_>>();
    create_problem(&refs, vehicle_count)
}

pub fn route(vehicle_id: usize, stop_ids: &[usize]) -> Route {
    Route::new(
        VehicleIdx::new(vehicle_id),
        stop_ids.iter().copied().map(StopIdx::new).collect(),
    )
}

/// Schedule with zero service time: every departure equals its arrival.
pub fn schedule(arrivals: &[i64]) -> Schedule {
    let arrivals = arrivals.iter().copied().map(ts).collect::<Vec<_>>();
    Schedule::new(arrivals.clone(), arrivals).unwrap()
}

pub fn schedule_with_departures(times: &[(i64, i64)]) -> Schedule {
    Schedule::new(
        times.iter().map(|&(arrival, _)| ts(arrival)).collect(),
        times.iter().map(|&(_, departure)| ts(departure)).collect(),
    )
    .unwrap()
}

/// One arrival every `step` seconds from `start`, markers included.
pub fn evenly_spaced_schedule(route: &Route, start: i64, step: i64) -> Schedule {
    let arrivals = (0..route.len() as i64)
        .map(|position| start + position * step)
        .collect::<Vec<_>>();
    schedule(&arrivals)
}
