use anyhow::{Context, Result};
use serde::Serialize;
use switchcost_adapters::NdjsonEventLog;
use switchcost_core::{EventLog, UsageReport};

use super::{load_config, running_daemon_pid};

const UNKNOWN_APPLICATION_LABEL: &str = "(no focus)";

#[derive(Serialize)]
struct StatusOutput {
    running: bool,
    pid: Option<u32>,
    applications: Vec<ApplicationOutput>,
    total_switches: usize,
}

#[derive(Serialize)]
struct ApplicationOutput {
    application: String,
    seconds: f64,
    formatted: String,
}

pub fn execute(json: bool) -> Result<()> {
    let config = load_config();
    let pid = running_daemon_pid(&config);

    let log = NdjsonEventLog::at_path(config.storage.event_log_path());
    let events = log
        .read_all()
        .with_context(|| format!("failed to read {}", log.path().display()))?;
    let report = UsageReport::from_events(&events);

    if json {
        print_json(pid, &report)?;
    } else {
        print_formatted(pid, &report);
    }

    Ok(())
}

fn print_json(pid: Option<u32>, report: &UsageReport) -> Result<()> {
    let output = StatusOutput {
        running: pid.is_some(),
        pid,
        applications: report
            .applications
            .iter()
            .map(|usage| ApplicationOutput {
                application: usage.application_name.clone(),
                seconds: usage.total.as_seconds_f64(),
                formatted: format_duration(usage.total.whole_seconds()),
            })
            .collect(),
        total_switches: report.switch_count,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_formatted(pid: Option<u32>, report: &UsageReport) {
    match pid {
        Some(pid) => println!("🟢 Daemon running (pid {})", pid),
        None => println!("⚫ No running daemon"),
    }

    print!("{}", render_report(report));
}

fn render_report(report: &UsageReport) -> String {
    if report.is_empty() {
        return "No transitions recorded yet\n".to_string();
    }

    let width = report
        .applications
        .iter()
        .map(|usage| display_name(&usage.application_name).chars().count())
        .max()
        .unwrap_or(0);

    let mut output = String::from("Time per application:\n");
    for usage in &report.applications {
        let seconds = usage.total.whole_seconds();
        output.push_str(&format!(
            "  {:<width$}  {:>8}s  {}\n",
            display_name(&usage.application_name),
            seconds,
            format_duration(seconds),
            width = width
        ));
    }
    output.push_str(&format!("Total switches: {}\n", report.switch_count));

    output
}

fn display_name(application_name: &str) -> &str {
    if application_name.is_empty() {
        UNKNOWN_APPLICATION_LABEL
    } else {
        application_name
    }
}

fn format_duration(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let remaining_seconds = seconds % 60;

    if hours > 0 {
        format!("{} h {} min {} sec", hours, minutes, remaining_seconds)
    } else if minutes > 0 {
        format!("{} min {} sec", minutes, remaining_seconds)
    } else {
        format!("{} sec", remaining_seconds)
    }
}
