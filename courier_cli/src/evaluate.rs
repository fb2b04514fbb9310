use std::{fs::File, io::BufReader, path::PathBuf, sync::Arc};

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use courier_valuation::{
    engine::ValuationEngine,
    json::types::{JsonValuationInput, LoadedInput},
    report::plan_report::PlanReport,
    valuation::{params::ValuationTemplate, unassigned_penalty::UnassignedPenalty},
};
use tracing::{info, warn};

use crate::parsers;

#[derive(Args)]
pub struct EvaluateArgs {
    /// JSON file holding the problem and the plan to value
    #[arg(short, long)]
    input: PathBuf,

    /// Replaces the template of the input configuration
    #[arg(short, long, env = "COURIER_TEMPLATE", value_parser = parsers::parse_template)]
    template: Option<ValuationTemplate>,

    #[arg(long, env = "COURIER_IMBALANCE_WEIGHT")]
    imbalance_weight: Option<i64>,

    /// Charges every unassigned stop this weight instead of its own penalty
    #[arg(long)]
    uniform_unassigned_penalty: Option<i64>,

    /// Writes the JSON report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: EvaluateArgs) -> Result<(), anyhow::Error> {
    info!("Evaluating {:?}", args.input);

    let reader = BufReader::new(File::open(&args.input)?);
    let mut input: JsonValuationInput = serde_json::from_reader(reader)?;

    if let Some(template) = args.template {
        input.configuration.template = template;
    }

    if let Some(imbalance_weight) = args.imbalance_weight {
        input.configuration.imbalance_weight = Some(imbalance_weight);
    }

    if let Some(weight) = args.uniform_unassigned_penalty {
        input.configuration.unassigned_penalty = Some(UnassignedPenalty::Uniform(weight));
    }

    let LoadedInput {
        problem,
        params,
        plan,
        schedules,
    } = input.build()?;

    let engine = ValuationEngine::new(Arc::new(problem), &params);
    let report = engine.report(&plan, &schedules)?;

    print_summary(&report);
    if !report.feasible {
        warn!("Plan breaks at least one hard constraint");
    }

    let json = serde_json::to_string_pretty(&report)?;
    match args.output {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&out, json)?;
            info!("Report written to {:?}", out);
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn print_summary(report: &PlanReport) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Vehicle",
        "Stops",
        "Duration (s)",
        "Value",
        "Within shift",
        "Violations",
    ]);

    for vehicle in &report.vehicles {
        let violations = vehicle
            .constraints
            .iter()
            .filter(|constraint| constraint.violated)
            .map(|constraint| constraint.kind.constraint_name())
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(vec![
            vehicle.id.clone(),
            vehicle.route.len().to_string(),
            vehicle.route_duration.to_string(),
            vehicle.value.to_string(),
            vehicle.within_shift.to_string(),
            violations,
        ]);
    }

    eprintln!("{table}");
    info!(
        value = report.value,
        earliness = report.earliness,
        lateness = report.lateness,
        total_duration = report.total_duration,
        num_lifo_violations = report.num_lifo_violations,
        assigned = report.assigned,
        unassigned = report.unassigned.len(),
        feasible = report.feasible,
        "Plan valued"
    );
}
