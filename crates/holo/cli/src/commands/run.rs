//! Scenario replay command

use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat};
use crate::script::{Outcome, ScenarioRunner, Script};
use holo_registry::{HolographicModel, RegistryConfig, Simulation};
use holo_types::format_timestamp;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

/// Arguments for `holo run`
#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Path to the scenario script (JSON, or YAML for .yaml/.yml)
    pub script: PathBuf,

    /// Stop at the first rejected step and exit with an error
    #[arg(long)]
    pub strict: bool,

    /// Print the final records of both registries
    #[arg(long)]
    pub snapshot: bool,

    /// Use a manual clock starting at this many milliseconds
    #[arg(long, value_name = "START", value_parser = clap::value_parser!(i64).range(1..))]
    pub manual_clock: Option<i64>,
}

/// Report of one step
#[derive(Debug, Serialize)]
struct StepReport {
    step: usize,
    op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caller: Option<String>,
    #[serde(flatten)]
    outcome: Outcome,
}

/// Full run report
#[derive(Debug, Serialize)]
struct RunReport {
    steps: Vec<StepReport>,
    ok: usize,
    rejected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    models: Option<Vec<HolographicModel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    simulations: Option<Vec<Simulation>>,
}

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "#")]
    step: usize,
    op: &'static str,
    caller: String,
    result: String,
    detail: String,
}

impl From<&StepReport> for StepRow {
    fn from(report: &StepReport) -> Self {
        let (result, detail) = match &report.outcome {
            Outcome::Ok { value } => ("ok".to_string(), value.to_string()),
            Outcome::Rejected { kind, message } => (format!("rejected ({kind})"), message.clone()),
        };
        Self {
            step: report.step,
            op: report.op,
            caller: report.caller.clone().unwrap_or_else(|| "-".to_string()),
            result,
            detail,
        }
    }
}

#[derive(Tabled)]
struct ModelRow {
    id: u64,
    name: String,
    owner: String,
    creator: String,
    score: u8,
    simulation: u64,
    created: String,
}

impl From<&HolographicModel> for ModelRow {
    fn from(model: &HolographicModel) -> Self {
        Self {
            id: model.id.value(),
            name: model.metadata.name.clone(),
            owner: model.owner.to_string(),
            creator: model.metadata.creator.to_string(),
            score: model.metadata.significance_score.value(),
            simulation: model.metadata.simulation_id.value(),
            created: format_timestamp(model.metadata.created_at),
        }
    }
}

#[derive(Tabled)]
struct SimulationRow {
    id: u64,
    name: String,
    creator: String,
    status: String,
    resources: i64,
    started: String,
    ended: String,
}

impl From<&Simulation> for SimulationRow {
    fn from(sim: &Simulation) -> Self {
        Self {
            id: sim.id.value(),
            name: sim.name.clone(),
            creator: sim.creator.to_string(),
            status: sim.status.to_string(),
            resources: sim.resource_allocation,
            started: format_timestamp(sim.start_time),
            ended: format_timestamp(sim.end_time),
        }
    }
}

/// Execute `holo run`
pub fn execute(args: RunArgs, registry: RegistryConfig, format: OutputFormat) -> CliResult<()> {
    let script = Script::load(&args.script)?;
    tracing::debug!(
        script = %args.script.display(),
        steps = script.steps.len(),
        "Loaded scenario"
    );

    let runner = ScenarioRunner::new(registry, args.manual_clock)?;
    let mut steps = Vec::with_capacity(script.steps.len());
    let mut failure = None;

    for (index, step) in script.steps.iter().enumerate() {
        let outcome = runner.apply(step)?;
        let number = index + 1;

        if let (true, Outcome::Rejected { message, .. }) = (args.strict, &outcome) {
            failure = Some(CliError::Rejected {
                step: number,
                op: step.name(),
                message: message.clone(),
            });
        }

        steps.push(StepReport {
            step: number,
            op: step.name(),
            caller: step.caller().map(|c| c.to_string()),
            outcome,
        });

        if failure.is_some() {
            break;
        }
    }

    let rejected = steps.iter().filter(|s| s.outcome.is_rejected()).count();
    let report = RunReport {
        ok: steps.len() - rejected,
        rejected,
        steps,
        models: args.snapshot.then(|| runner.models()),
        simulations: args.snapshot.then(|| runner.simulations()),
    };

    match format {
        OutputFormat::Table => print_report_table(&report),
        OutputFormat::Json | OutputFormat::Yaml => output::print_single(&report, format)?,
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn print_report_table(report: &RunReport) {
    output::print_heading("Scenario Steps");
    output::print_table(report.steps.iter().map(StepRow::from).collect());
    println!();

    if let Some(models) = &report.models {
        output::print_heading("Holographic Models");
        output::print_table(models.iter().map(ModelRow::from).collect());
        println!();
    }

    if let Some(simulations) = &report.simulations {
        output::print_heading("Simulations");
        output::print_table(simulations.iter().map(SimulationRow::from).collect());
        println!();
    }

    let summary = format!("{} ok, {} rejected", report.ok, report.rejected);
    if report.rejected == 0 {
        output::print_success(&summary);
    } else {
        output::print_warning(&summary);
    }
}
