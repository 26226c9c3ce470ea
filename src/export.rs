//! Report export: JSON for the dashboard, CSV for spreadsheet analysis.

use crate::error::Result;
use crate::load::DailyLoad;
use crate::records::WeeklySummary;
use crate::report::DashboardReport;
use crate::scoring::ActivityScore;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Serialize a full dashboard report as pretty-printed JSON
pub fn report_to_json_string(report: &DashboardReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write a full dashboard report to a JSON file
pub fn write_report_json(report: &DashboardReport, path: &Path) -> Result<()> {
    let json = report_to_json_string(report)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    info!(path = %path.display(), "wrote report JSON");
    Ok(())
}

/// Write per-activity scores as CSV, one row per activity in input order
pub fn write_scores_csv(scores: &[ActivityScore], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "activity_id",
        "date",
        "sport",
        "moving_time_seconds",
        "points",
        "training_load",
        "method",
    ])?;
    for score in scores {
        let method = serde_json::to_string(&score.method)?;
        writer.write_record([
            score.activity_id.clone(),
            score.date.to_string(),
            score.sport.label().to_string(),
            score.moving_time_seconds.to_string(),
            score.points.to_string(),
            score.training_load.to_string(),
            method.trim_matches('"').to_string(),
        ])?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = scores.len(), "wrote scores CSV");
    Ok(())
}

/// Write the calendar-day load series as CSV
pub fn write_daily_load_csv(daily: &[DailyLoad], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["date", "training_load"])?;
    for entry in daily {
        writer.write_record([entry.date.to_string(), entry.load.to_string()])?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = daily.len(), "wrote daily load CSV");
    Ok(())
}

/// Write the Monday-anchored weekly summaries as CSV
pub fn write_weekly_csv(weeks: &[WeeklySummary], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["week_start", "points", "training_load", "activity_count"])?;
    for week in weeks {
        writer.write_record([
            week.week_start.to_string(),
            week.points.to_string(),
            week.training_load.to_string(),
            week.activity_count.to_string(),
        ])?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = weeks.len(), "wrote weekly CSV");
    Ok(())
}
