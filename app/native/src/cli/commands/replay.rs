//! Replay CLI command.
//!
//! Prints the notifications a scripted session raised and the controller's
//! final state.

use std::path::Path;

use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::config::OrientationConfig;
use crate::error::OrientationError;
use crate::replay::{self, ReplayEvent, ReplayReport, ReplaySummary, Script};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Property")]
    property: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Runs a replay script and prints the report.
///
/// # Errors
///
/// Returns an error if the script cannot be read or parsed.
pub fn execute(script: &Path, config: &OrientationConfig, json: bool) -> Result<(), OrientationError> {
    let script = Script::load(script)?;
    let report = replay::run(&script, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ReplayReport) {
    println!("{}", format!("Events ({})", report.events.len()).bold());
    if report.events.is_empty() {
        println!("  {}", "no notifications".dimmed());
    }
    for event in &report.events {
        println!("  {}", format_event(event));
    }

    println!();
    println!("{}", "Final state".bold());
    println!("{}", summary_table(&report.summary));
}

fn format_event(event: &ReplayEvent) -> String {
    let step = format!("[{:>3}]", event.step()).dimmed();
    let name = event.name();

    match event {
        ReplayEvent::OrientationChanged { payload, .. } => format!(
            "{step} {} {} ({}, mask {})",
            name.cyan(),
            payload.orientation.to_string().green(),
            lock_label(payload.is_locked),
            payload.supported_orientations,
        ),
        ReplayEvent::LockChanged { payload, .. } => {
            let orientation =
                payload.orientation.map_or_else(|| "unlocked".to_string(), |o| o.to_string());
            format!("{step} {} {}", name.blue(), orientation.yellow())
        }
        ReplayEvent::StepFailed { error, .. } => {
            format!("{step} {} {error}", "Error:".red())
        }
    }
}

fn lock_label(is_locked: bool) -> &'static str { if is_locked { "locked" } else { "unlocked" } }

fn summary_table(summary: &ReplaySummary) -> String {
    let rows = vec![
        SummaryRow { property: "Lock mode", value: summary.lock_mode.to_string() },
        SummaryRow { property: "Locked", value: summary.lock_mode.is_locked().to_string() },
        SummaryRow {
            property: "Current orientation",
            value: summary.current_orientation.to_string(),
        },
        SummaryRow {
            property: "Device orientation",
            value: summary.device_orientation.to_string(),
        },
        SummaryRow {
            property: "Supported orientations",
            value: summary.supported_orientations.to_string(),
        },
        SummaryRow { property: "Tracking", value: summary.tracking.to_string() },
        SummaryRow { property: "Mask hints sent", value: summary.mask_hints_sent.to_string() },
    ];

    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string()
}
