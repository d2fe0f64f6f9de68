//! `fuelwatch logs` — list and clear the recent event log.

use serde::Serialize;
use tabled::Tabled;

use fuelwatch_core::{Command, LogEntry, Monitor, RecentLogs};

use crate::cli::{GlobalOpts, LogCategory, LogsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct LogView {
    category: &'static str,
    timestamp: String,
    event_type: String,
    location: String,
}

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Location")]
    location: String,
}

pub async fn run(global: &GlobalOpts, command: LogsCommand) -> Result<(), CliError> {
    match command {
        LogsCommand::List { category } => list(global, category).await,
        LogsCommand::Clear => clear(global).await,
    }
}

async fn list(global: &GlobalOpts, category: LogCategory) -> Result<(), CliError> {
    let monitor_config = crate::config::resolve_monitor_config(global)?;

    let (theft, refuel) = Monitor::oneshot(monitor_config, |monitor| async move {
        Ok((monitor.store().theft_logs(), monitor.store().refuel_logs()))
    })
    .await?;

    let views = collect_views(category, &theft, &refuel);

    if views.is_empty() {
        output::print_output("No log entries.", global.quiet);
        return Ok(());
    }

    let rendered = output::render_list(
        &global.output,
        &views,
        |v| LogRow {
            category: v.category,
            timestamp: v.timestamp.clone(),
            event: v.event_type.clone(),
            location: v.location.clone(),
        },
        |v| format!("{} {} {}", v.timestamp, v.event_type, v.location),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn collect_views(category: LogCategory, theft: &RecentLogs, refuel: &RecentLogs) -> Vec<LogView> {
    let mut views = Vec::new();
    if category != LogCategory::Refuel {
        views.extend(theft.iter().map(|e| to_view("theft", e)));
    }
    if category != LogCategory::Theft {
        views.extend(refuel.iter().map(|e| to_view("refuel", e)));
    }
    // Newest first across both categories.
    views.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    views
}

fn to_view(category: &'static str, entry: &LogEntry) -> LogView {
    LogView {
        category,
        timestamp: entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        event_type: entry.event_type.clone(),
        location: entry.location.clone(),
    }
}

async fn clear(global: &GlobalOpts) -> Result<(), CliError> {
    if !util::confirm("Delete the entire remote log collection", global.yes)? {
        output::print_output("Aborted.", global.quiet);
        return Ok(());
    }

    let monitor_config = crate::config::resolve_monitor_config(global)?;
    Monitor::oneshot(monitor_config, |monitor| async move {
        monitor.execute(Command::ClearLogs).await
    })
    .await?;

    output::print_output("Log collection cleared.", global.quiet);
    Ok(())
}
