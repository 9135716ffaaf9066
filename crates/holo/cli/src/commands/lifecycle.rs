//! Simulation lifecycle description

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use colored::Colorize;
use holo_registry::SimulationStatus;
use serde::Serialize;
use tabled::Tabled;

#[derive(Serialize, Tabled)]
struct StatusInfo {
    status: &'static str,
    initial: bool,
    stamps: &'static str,
}

fn status_info(status: SimulationStatus) -> StatusInfo {
    StatusInfo {
        status: status.as_str(),
        initial: status == SimulationStatus::Pending,
        stamps: match status {
            SimulationStatus::Pending => "-",
            SimulationStatus::Running => "start_time (on every entry)",
            SimulationStatus::Completed | SimulationStatus::Failed => "end_time",
        },
    }
}

/// Execute `holo lifecycle`
pub fn execute(format: OutputFormat) -> CliResult<()> {
    let statuses: Vec<StatusInfo> = SimulationStatus::ALL.into_iter().map(status_info).collect();

    match format {
        OutputFormat::Json | OutputFormat::Yaml => output::print_single(&statuses, format)?,
        OutputFormat::Table => {
            output::print_heading("Simulation Lifecycle");
            output::print_table(statuses);
            println!();
            println!(
                "{}: any status may follow any other; the creator or the privileged identity may set it",
                "Transitions".bold()
            );
            println!(
                "{}: resource allocation is reserved for the privileged identity",
                "Allocation".bold()
            );
        }
    }

    Ok(())
}
