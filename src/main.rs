use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

use fitrank::config::FitrankConfig;
use fitrank::export;
use fitrank::logging::{init_logging, LogLevel};
use fitrank::models::{ActivityBundle, CompetitionWindow, ZoneBoundarySet};
use fitrank::report::{DashboardEngine, DashboardReport, ReportData};
use fitrank::scoring::ActivityScore;

#[derive(Parser)]
#[command(name = "fitrank")]
#[command(version = "0.1.0")]
#[command(about = "Heart-rate zone scoring and training load CLI", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score activities and print the per-activity point table
    Score {
        /// JSON file with activities and optional heart-rate streams
        #[arg(short, long, value_name = "FILE")]
        activities: PathBuf,

        /// JSON file with the athlete's custom zone boundaries
        #[arg(short, long, value_name = "FILE")]
        zones: Option<PathBuf>,

        /// Competition window start (inclusive)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Competition window end (inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Build the full dashboard report
    Report {
        #[arg(short, long, value_name = "FILE")]
        activities: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        zones: Option<PathBuf>,

        #[arg(long)]
        from: Option<NaiveDate>,

        #[arg(long)]
        to: Option<NaiveDate>,

        /// Anchor date for the rolling windows (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Write the report JSON to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Show personal records, weekly summaries, streaks, and milestones
    Records {
        #[arg(short, long, value_name = "FILE")]
        activities: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        zones: Option<PathBuf>,

        #[arg(long)]
        today: Option<NaiveDate>,

        #[arg(long)]
        json: bool,
    },

    /// Show the composite readiness score and recommendations
    Readiness {
        #[arg(short, long, value_name = "FILE")]
        activities: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        zones: Option<PathBuf>,

        #[arg(long)]
        today: Option<NaiveDate>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Tabled)]
struct ScoreRow {
    #[tabled(rename = "Date")]
    date: NaiveDate,
    #[tabled(rename = "Sport")]
    sport: &'static str,
    #[tabled(rename = "Minutes")]
    minutes: String,
    #[tabled(rename = "Points")]
    points: String,
    #[tabled(rename = "Load")]
    load: String,
    #[tabled(rename = "Method")]
    method: String,
}

#[derive(Tabled)]
struct FactorRow {
    #[tabled(rename = "Factor")]
    factor: &'static str,
    #[tabled(rename = "Score")]
    score: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = FitrankConfig::load(cli.config.as_deref())?;
    if cli.verbose > 0 {
        config.log.level = LogLevel::from_verbosity(cli.verbose);
    }
    init_logging(&config.log)?;

    match cli.command {
        Commands::Score {
            activities,
            zones,
            from,
            to,
            json,
        } => {
            let bundles = load_bundles(&activities)?;
            let zone_config = load_zones(zones.as_deref())?;
            let window = CompetitionWindow::between(from, to);

            let engine = DashboardEngine::with_config(config.load.clone());
            let scores = engine.score_activities(&bundles, zone_config.as_ref(), &window);

            if json {
                println!("{}", serde_json::to_string_pretty(&scores)?);
            } else {
                print_scores(&scores);
            }
        }

        Commands::Report {
            activities,
            zones,
            from,
            to,
            today,
            output,
            json,
        } => {
            let bundles = load_bundles(&activities)?;
            let zone_config = load_zones(zones.as_deref())?;
            let window = CompetitionWindow::between(from, to);
            let today = today.unwrap_or_else(|| Utc::now().date_naive());

            let engine = DashboardEngine::with_config(config.load.clone());
            let report = engine.build_report(&bundles, zone_config.as_ref(), &window, today);

            if let Some(path) = &output {
                export::write_report_json(&report, path)?;
                println!("Report written to {}", path.display().to_string().green());
            }
            if json || output.is_none() {
                if json {
                    println!("{}", export::report_to_json_string(&report)?);
                } else {
                    print_report(&report);
                }
            }
        }

        Commands::Records {
            activities,
            zones,
            today,
            json,
        } => {
            let report = build_report(&config, &activities, zones.as_deref(), today)?;
            match report.data() {
                None => println!("{}", "No activity history yet.".yellow()),
                Some(data) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&data.records)?);
                    } else {
                        print_records(data);
                    }
                }
            }
        }

        Commands::Readiness {
            activities,
            zones,
            today,
            json,
        } => {
            let report = build_report(&config, &activities, zones.as_deref(), today)?;
            match report.data() {
                None => println!("{}", "No activity history yet.".yellow()),
                Some(data) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&data.readiness)?);
                    } else {
                        print_readiness(data);
                    }
                }
            }
        }
    }

    Ok(())
}

fn build_report(
    config: &FitrankConfig,
    activities: &Path,
    zones: Option<&Path>,
    today: Option<NaiveDate>,
) -> Result<DashboardReport> {
    let bundles = load_bundles(activities)?;
    let zone_config = load_zones(zones)?;
    let today = today.unwrap_or_else(|| Utc::now().date_naive());

    let engine = DashboardEngine::with_config(config.load.clone());
    Ok(engine.build_report(&bundles, zone_config.as_ref(), &CompetitionWindow::open(), today))
}

fn load_bundles(path: &Path) -> Result<Vec<ActivityBundle>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading activities from {}", path.display()))?;
    let bundles: Vec<ActivityBundle> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing activities from {}", path.display()))?;
    Ok(bundles)
}

fn load_zones(path: Option<&Path>) -> Result<Option<ZoneBoundarySet>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading zone boundaries from {}", path.display()))?;
    let zones: ZoneBoundarySet = serde_json::from_str(&raw)
        .with_context(|| format!("parsing zone boundaries from {}", path.display()))?;
    Ok(Some(zones))
}

fn print_scores(scores: &[ActivityScore]) {
    if scores.is_empty() {
        println!("{}", "No scoreable activities in the window.".yellow());
        return;
    }

    let rows: Vec<ScoreRow> = scores
        .iter()
        .map(|s| ScoreRow {
            date: s.date,
            sport: s.sport.label(),
            minutes: (s.moving_time_seconds / 60).to_string(),
            points: s.points.round_dp(0).to_string(),
            load: s.training_load.round_dp(1).to_string(),
            method: serde_json::to_string(&s.method)
                .unwrap_or_default()
                .trim_matches('"')
                .to_string(),
        })
        .collect();

    println!("{}", "Activity scores".green().bold());
    println!("{}", Table::new(rows));

    let total: rust_decimal::Decimal = scores.iter().map(|s| s.points).sum();
    println!("Total points: {}", total.round_dp(0).to_string().green().bold());
}

fn print_report(report: &DashboardReport) {
    let Some(data) = report.data() else {
        println!("{}", "No activity history yet.".yellow());
        return;
    };

    print_scores(&data.scores);

    println!();
    println!("{}", "Training load".blue().bold());
    println!("  Acute (7d avg):    {}", data.load.acute_load.round_dp(1));
    println!("  Chronic (28d avg): {}", data.load.chronic_load.round_dp(1));
    println!(
        "  ACWR:              {} ({:?})",
        data.load.acwr.round_dp(2),
        data.load.status
    );
    println!("  Trend:             {:?}", data.load.trend);
    println!("  {}", data.load.status.description().dimmed());

    println!();
    print_readiness(data);
    println!();
    print_records(data);
}

fn print_readiness(data: &ReportData) {
    let readiness = &data.readiness;
    println!("{}", "Readiness".cyan().bold());
    println!(
        "  Score: {} ({:?})",
        readiness.score.to_string().cyan().bold(),
        readiness.level
    );

    let rows = vec![
        FactorRow {
            factor: "Volume",
            score: readiness.factors.volume.round_dp(1).to_string(),
        },
        FactorRow {
            factor: "Balance",
            score: readiness.factors.balance.round_dp(1).to_string(),
        },
        FactorRow {
            factor: "Consistency",
            score: readiness.factors.consistency.round_dp(1).to_string(),
        },
        FactorRow {
            factor: "Recovery",
            score: readiness.factors.recovery.round_dp(1).to_string(),
        },
        FactorRow {
            factor: "Intensity",
            score: readiness.factors.intensity.round_dp(1).to_string(),
        },
    ];
    println!("{}", Table::new(rows));

    for rec in &readiness.recommendations {
        println!("  {} {}", "•".cyan(), rec);
    }
}

fn print_records(data: &ReportData) {
    let records = &data.records;
    println!("{}", "Records".magenta().bold());

    if let Some(best) = &records.personal.best_points {
        println!(
            "  Best activity:  {} points on {}",
            best.value.round_dp(0),
            best.date
        );
    }
    if let Some(week) = &records.best_week {
        println!(
            "  Best week:      {} points (week of {})",
            week.points.round_dp(0),
            week.week_start
        );
    }
    println!(
        "  Streak:         {} days (longest {})",
        records.streaks.current_days, records.streaks.longest_days
    );

    for milestone in &records.milestones {
        let goal = match milestone.next_goal {
            Some(goal) => format!("{} ({}%)", goal, milestone.progress_percent),
            None => "ladder complete".to_string(),
        };
        println!(
            "  {:?}: {} achieved, next {}",
            milestone.metric,
            milestone.achieved.len(),
            goal
        );
    }
}
