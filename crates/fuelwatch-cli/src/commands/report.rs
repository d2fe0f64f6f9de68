//! `fuelwatch report` — generate a First Information Report.

use std::time::Duration;

use fuelwatch_core::{Command, CommandResult, CoreError, Monitor, RecentLogs, ReportSource};

use crate::cli::{GlobalOpts, ReportArgs};
use crate::error::CliError;
use crate::output;

use super::util;

const LOCATION_BUDGET: Duration = Duration::from_secs(8);

/// Which recent-log list a `--log` reference names.
#[derive(Debug, Clone, Copy)]
enum LogListRef {
    Theft,
    Refuel,
}

impl LogListRef {
    fn select(self, monitor: &Monitor) -> RecentLogs {
        match self {
            Self::Theft => monitor.store().theft_logs(),
            Self::Refuel => monitor.store().refuel_logs(),
        }
    }
}

/// Parse a `CATEGORY/INDEX` log reference, e.g. `theft/0`.
fn parse_log_ref(reference: &str) -> Result<(LogListRef, usize), CliError> {
    let invalid = |reason: String| CliError::Validation {
        field: "--log".into(),
        reason,
    };

    let (category, index) = reference
        .split_once('/')
        .ok_or_else(|| invalid("expected CATEGORY/INDEX, e.g. theft/0".into()))?;

    let list = match category {
        "theft" => LogListRef::Theft,
        "refuel" => LogListRef::Refuel,
        other => {
            return Err(invalid(format!(
                "unknown category '{other}' (expected theft or refuel)"
            )));
        }
    };

    let index = index
        .parse::<usize>()
        .map_err(|_| invalid(format!("'{index}' is not a valid entry index")))?;

    Ok((list, index))
}

pub async fn run(global: &GlobalOpts, args: ReportArgs) -> Result<(), CliError> {
    // Validate the log reference before touching config or network.
    let log_ref = args.log.as_deref().map(parse_log_ref).transpose()?;

    let monitor_config = crate::config::resolve_monitor_config(global)?;

    let report = Monitor::oneshot(monitor_config, |monitor| async move {
        let source = match log_ref {
            Some((list, index)) => {
                let entries = list.select(&monitor);
                let entry = entries.get(index).ok_or_else(|| CoreError::Config {
                    message: format!(
                        "no stored log entry at index {index} ({} available)",
                        entries.len()
                    ),
                })?;
                ReportSource::Entry(Box::new(entry.as_ref().clone()))
            }
            None => {
                // Let the geocode lookup settle so the report carries a
                // real location instead of the fetching placeholder.
                util::settled_location(&monitor, LOCATION_BUDGET).await;
                ReportSource::Live
            }
        };

        match monitor.execute(Command::GenerateReport { source }).await? {
            CommandResult::Report(report) => Ok(*report),
            other => Err(CoreError::Internal(format!(
                "unexpected report result: {other:?}"
            ))),
        }
    })
    .await?;

    if let Some(ref path) = args.file {
        std::fs::write(path, report.render())?;
        output::print_output(
            &format!("Report {} written to {}", report.fir_number, path.display()),
            global.quiet,
        );
        return Ok(());
    }

    let rendered = output::render_single(
        &global.output,
        &report,
        |r| r.render(),
        |r| r.fir_number.clone(),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_reference_parses_category_and_index() {
        let (list, index) = parse_log_ref("theft/0").expect("valid reference");
        assert!(matches!(list, LogListRef::Theft));
        assert_eq!(index, 0);

        let (list, index) = parse_log_ref("refuel/2").expect("valid reference");
        assert!(matches!(list, LogListRef::Refuel));
        assert_eq!(index, 2);
    }

    #[test]
    fn log_reference_rejects_malformed_input() {
        for bad in ["bogus", "theft", "fire/0", "theft/-1", "refuel/x"] {
            let err = parse_log_ref(bad).expect_err("should reject");
            assert!(matches!(err, CliError::Validation { .. }), "input: {bad}");
        }
    }
}
