use std::{hint::black_box, sync::Arc};

use courier_valuation::{
    engine::ValuationEngine,
    plan::{candidate_plan::CandidatePlan, route::Route, schedule::Schedule},
    problem::{
        delivery_problem::{DeliveryProblem, DeliveryProblemBuilder},
        stop::{StopBuilder, StopIdx},
        vehicle::{VehicleBuilder, VehicleIdx},
    },
    valuation::params::{ValuationParams, ValuationTemplate},
};
use criterion::{Criterion, criterion_group, criterion_main};
use jiff::Timestamp;
use rand::{Rng, SeedableRng, rngs::SmallRng};

const STOPS: usize = 400;
const VEHICLES: usize = 40;

fn create_problem(rng: &mut SmallRng) -> DeliveryProblem {
    let stops = (0..STOPS)
        .map(|index| {
            let mut builder = StopBuilder::default();
            builder
                .set_external_id(format!("s{index}"))
                .set_position(rng.random_range(7.0..8.0), rng.random_range(51.0..52.0));
            builder.build().unwrap()
        })
        .collect();
    let vehicles = (0..VEHICLES)
        .map(|index| {
            let mut builder = VehicleBuilder::default();
            builder.set_vehicle_id(format!("v{index}"));
            builder.build().unwrap()
        })
        .collect();

    let mut builder = DeliveryProblemBuilder::default();
    builder
        .set_stops(stops)
        .set_vehicles(vehicles)
        .set_quantities((0..STOPS).map(|_| rng.random_range(-5..=5)).collect())
        .set_unassigned_penalties((0..STOPS).map(|_| rng.random_range(100..1_000)).collect())
        .set_target_times(
            (0..STOPS)
                .map(|_| Timestamp::from_second(rng.random_range(0..36_000)).unwrap())
                .collect(),
        )
        .set_earliness_penalties(vec![1; STOPS])
        .set_lateness_penalties(vec![3; STOPS])
        .set_capacities(vec![50; VEHICLES])
        .set_initialization_costs(vec![2_000; VEHICLES]);
    builder.build().unwrap()
}

fn schedule(route: &Route) -> Schedule {
    let arrivals = (0..route.len() as i64)
        .map(|position| Timestamp::from_second(position * 600).unwrap())
        .collect::<Vec<_>>();
    Schedule::new(arrivals.clone(), arrivals).unwrap()
}

fn plan_benchmark(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(7);
    let problem = Arc::new(create_problem(&mut rng));

    let mut routes = vec![Vec::new(); VEHICLES];
    let mut unassigned = Vec::new();
    for stop_id in 0..STOPS {
        if rng.random_bool(0.9) {
            routes[rng.random_range(0..VEHICLES)].push(StopIdx::new(stop_id));
        } else {
            unassigned.push(StopIdx::new(stop_id));
        }
    }
    let routes = routes
        .into_iter()
        .enumerate()
        .map(|(vehicle_id, stops)| Route::new(VehicleIdx::new(vehicle_id), stops))
        .collect::<Vec<_>>();
    let parent_plan = CandidatePlan::new(&problem, routes, unassigned.clone()).unwrap();

    // move one unassigned stop to the front of the first route
    let mut moved = parent_plan.routes()[0].interior().to_vec();
    moved.insert(0, unassigned[0]);
    let child_plan = parent_plan
        .mutate(
            &problem,
            vec![Route::new(VehicleIdx::new(0), moved)],
            unassigned[1..].to_vec(),
        )
        .unwrap();
    let child_schedules = child_plan.routes().iter().map(schedule).collect::<Vec<_>>();

    for template in [ValuationTemplate::CustomizedValue, ValuationTemplate::Utilization] {
        let params = ValuationParams {
            imbalance_weight: 10,
            ..template.params()
        };
        let engine = ValuationEngine::new(problem.clone(), &params);
        let parent = engine
            .evaluate_from_scratch(
                &parent_plan,
                &parent_plan.routes().iter().map(schedule).collect::<Vec<_>>(),
            )
            .unwrap();

        c.bench_function(&format!("{template:?} incremental"), |b| {
            b.iter(|| {
                engine.evaluate_candidate(
                    black_box(&parent),
                    black_box(&child_plan),
                    black_box(&child_schedules),
                    &[VehicleIdx::new(0)],
                )
            })
        });

        c.bench_function(&format!("{template:?} from scratch"), |b| {
            b.iter(|| engine.evaluate_from_scratch(black_box(&child_plan), black_box(&child_schedules)))
        });
    }
}

criterion_group!(benches, plan_benchmark);
criterion_main!(benches);
