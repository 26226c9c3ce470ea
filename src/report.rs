use crate::load::{DailyLoad, LoadAggregator, LoadConfig, LoadSummary};
use crate::models::{ActivityBundle, CompetitionWindow, ZoneBoundarySet};
use crate::readiness::{CompositeScoreEngine, ReadinessReport};
use crate::records::{RecordsReport, RecordsTracker};
use crate::scoring::{score_bundle, ActivityScore};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything the dashboard renders for one athlete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    /// The "today" all window math was anchored to
    pub generated_for: NaiveDate,

    /// Competition window the leaderboard scores were filtered by
    pub window: CompetitionWindow,

    /// Per-activity scores inside the competition window, input order
    pub scores: Vec<ActivityScore>,

    /// Acute/chronic load summary over the full history
    pub load: LoadSummary,

    /// Calendar-day load series, load-bearing dates only
    pub daily_load: Vec<DailyLoad>,

    pub readiness: ReadinessReport,

    pub records: RecordsReport,
}

/// Report envelope. An athlete with no scoreable history gets the explicit
/// `NoData` variant instead of an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DashboardReport {
    NoData,
    Ready(Box<ReportData>),
}

impl DashboardReport {
    pub fn is_no_data(&self) -> bool {
        matches!(self, DashboardReport::NoData)
    }

    pub fn data(&self) -> Option<&ReportData> {
        match self {
            DashboardReport::Ready(data) => Some(data),
            DashboardReport::NoData => None,
        }
    }
}

/// Stateless pipeline facade: scores activities and assembles the
/// dashboard aggregates. Re-running on identical input yields identical
/// output.
pub struct DashboardEngine {
    load_config: LoadConfig,
}

impl DashboardEngine {
    pub fn new() -> Self {
        DashboardEngine {
            load_config: LoadConfig::default(),
        }
    }

    pub fn with_config(load_config: LoadConfig) -> Self {
        DashboardEngine { load_config }
    }

    /// Score every visible activity, keeping input order. Hidden activities
    /// and, when `window` is bounded, activities outside it are skipped.
    pub fn score_activities(
        &self,
        bundles: &[ActivityBundle],
        zone_config: Option<&ZoneBoundarySet>,
        window: &CompetitionWindow,
    ) -> Vec<ActivityScore> {
        bundles
            .iter()
            .filter(|b| !b.activity.hidden && window.contains(b.activity.date()))
            .map(|b| score_bundle(b, zone_config))
            .collect()
    }

    /// Build the full dashboard report as of `today`.
    ///
    /// The competition window narrows the leaderboard score list only;
    /// load, readiness, and records always consider the athlete's whole
    /// visible history.
    pub fn build_report(
        &self,
        bundles: &[ActivityBundle],
        zone_config: Option<&ZoneBoundarySet>,
        window: &CompetitionWindow,
        today: NaiveDate,
    ) -> DashboardReport {
        let all_scores = self.score_activities(bundles, zone_config, &CompetitionWindow::open());
        if all_scores.is_empty() {
            info!("no visible activities, returning no-data report");
            return DashboardReport::NoData;
        }

        let window_scores: Vec<ActivityScore> = all_scores
            .iter()
            .filter(|s| window.contains(s.date))
            .cloned()
            .collect();

        let aggregator = LoadAggregator::with_config(self.load_config.clone());
        let daily = aggregator.aggregate_daily(&all_scores);
        let load = aggregator.summarize(&daily, today);
        let daily_load = aggregator.daily_series(&daily);

        let readiness = CompositeScoreEngine::with_config(self.load_config.clone())
            .assess(&all_scores, &load, today);
        let records = RecordsTracker::analyze(&all_scores, today);

        info!(
            activities = all_scores.len(),
            in_window = window_scores.len(),
            "built dashboard report"
        );

        DashboardReport::Ready(Box::new(ReportData {
            generated_for: today,
            window: *window,
            scores: window_scores,
            load,
            daily_load,
            readiness,
            records,
        }))
    }
}

impl Default for DashboardEngine {
    fn default() -> Self {
        Self::new()
    }
}
