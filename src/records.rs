use crate::models::Sport;
use crate::scoring::ActivityScore;
use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Milestone threshold ladders, ascending, per metric
const POINTS_LADDER: [Decimal; 7] = [
    dec!(100),
    dec!(250),
    dec!(500),
    dec!(1000),
    dec!(2500),
    dec!(5000),
    dec!(10000),
];
const DISTANCE_KM_LADDER: [Decimal; 6] = [
    dec!(50),
    dec!(100),
    dec!(250),
    dec!(500),
    dec!(1000),
    dec!(2500),
];
const HOURS_LADDER: [Decimal; 6] = [
    dec!(10),
    dec!(25),
    dec!(50),
    dec!(100),
    dec!(250),
    dec!(500),
];
const ACTIVITY_COUNT_LADDER: [Decimal; 7] = [
    dec!(10),
    dec!(25),
    dec!(50),
    dec!(100),
    dec!(250),
    dec!(500),
    dec!(1000),
];

/// A single record: which activity set it, when, and the value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub activity_id: String,
    pub date: NaiveDate,
    pub value: Decimal,
}

/// All-time personal bests. Ties keep the first-encountered activity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonalRecords {
    pub best_points: Option<RecordEntry>,
    pub longest_duration: Option<RecordEntry>,
    pub longest_distance: Option<RecordEntry>,
    pub highest_avg_hr: Option<RecordEntry>,

    /// Best single-activity seconds for each zone
    pub most_zone_seconds: [Option<RecordEntry>; 5],
}

/// Per-sport bests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SportRecords {
    pub sport: Sport,
    pub best_points: Option<RecordEntry>,
    pub longest_duration: Option<RecordEntry>,
    pub longest_distance: Option<RecordEntry>,
}

/// Aggregates for one Monday-anchored ISO week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// Monday of the week
    pub week_start: NaiveDate,
    pub points: Decimal,
    pub training_load: Decimal,
    pub activity_count: u32,
}

/// Consecutive-day activity streaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Longest run of consecutive active calendar dates
    pub longest_days: u32,

    /// Consecutive active dates ending at today; 0 when today is inactive
    pub current_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneMetric {
    Points,
    DistanceKm,
    Hours,
    Activities,
}

/// Progress against one metric's threshold ladder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneProgress {
    pub metric: MilestoneMetric,
    pub current: Decimal,
    pub achieved: Vec<Decimal>,
    pub next_goal: Option<Decimal>,

    /// Share of the way to the next goal; 100 when the ladder is complete
    pub progress_percent: Decimal,
}

/// Full records bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsReport {
    pub personal: PersonalRecords,
    pub by_sport: Vec<SportRecords>,
    pub weekly: Vec<WeeklySummary>,
    pub best_week: Option<WeeklySummary>,
    pub most_active_week: Option<WeeklySummary>,
    pub streaks: StreakSummary,
    pub milestones: Vec<MilestoneProgress>,
}

/// Pure scans over the scored activity history
pub struct RecordsTracker;

impl RecordsTracker {
    pub fn analyze(scores: &[ActivityScore], today: NaiveDate) -> RecordsReport {
        RecordsReport {
            personal: personal_records(scores),
            by_sport: sport_records(scores),
            weekly: weekly_summaries(scores),
            best_week: best_week(scores),
            most_active_week: most_active_week(scores),
            streaks: streaks(scores, today),
            milestones: milestones(scores),
        }
    }
}

fn entry(score: &ActivityScore, value: Decimal) -> RecordEntry {
    RecordEntry {
        activity_id: score.activity_id.clone(),
        date: score.date,
        value,
    }
}

/// Replace only on strictly greater values, so ties keep the earlier
/// activity in input order
fn keep_max(slot: &mut Option<RecordEntry>, score: &ActivityScore, value: Decimal) {
    let beats = slot.as_ref().map(|e| value > e.value).unwrap_or(true);
    if beats {
        *slot = Some(entry(score, value));
    }
}

fn personal_records(scores: &[ActivityScore]) -> PersonalRecords {
    let mut records = PersonalRecords::default();
    for score in scores {
        keep_max(&mut records.best_points, score, score.points);
        keep_max(
            &mut records.longest_duration,
            score,
            Decimal::from(score.moving_time_seconds),
        );
        if score.distance_meters > Decimal::ZERO {
            keep_max(&mut records.longest_distance, score, score.distance_meters);
        }
        if let Some(avg_hr) = score.average_hr {
            keep_max(&mut records.highest_avg_hr, score, Decimal::from(avg_hr));
        }
        for zone in 0..5 {
            let seconds = score.zone_time.seconds[zone];
            if seconds > 0 {
                keep_max(
                    &mut records.most_zone_seconds[zone],
                    score,
                    Decimal::from(seconds),
                );
            }
        }
    }
    records
}

fn sport_records(scores: &[ActivityScore]) -> Vec<SportRecords> {
    let mut by_sport: BTreeMap<Sport, SportRecords> = BTreeMap::new();
    for score in scores {
        let records = by_sport.entry(score.sport).or_insert_with(|| SportRecords {
            sport: score.sport,
            best_points: None,
            longest_duration: None,
            longest_distance: None,
        });
        keep_max(&mut records.best_points, score, score.points);
        keep_max(
            &mut records.longest_duration,
            score,
            Decimal::from(score.moving_time_seconds),
        );
        if score.distance_meters > Decimal::ZERO {
            keep_max(&mut records.longest_distance, score, score.distance_meters);
        }
    }
    by_sport.into_values().collect()
}

fn weekly_summaries(scores: &[ActivityScore]) -> Vec<WeeklySummary> {
    let mut weeks: BTreeMap<NaiveDate, WeeklySummary> = BTreeMap::new();
    for score in scores {
        let week_start = score.date.week(Weekday::Mon).first_day();
        let week = weeks.entry(week_start).or_insert_with(|| WeeklySummary {
            week_start,
            points: Decimal::ZERO,
            training_load: Decimal::ZERO,
            activity_count: 0,
        });
        week.points += score.points;
        week.training_load += score.training_load;
        week.activity_count += 1;
    }
    weeks.into_values().collect()
}

fn best_week(scores: &[ActivityScore]) -> Option<WeeklySummary> {
    weekly_summaries(scores)
        .into_iter()
        .reduce(|best, week| if week.points > best.points { week } else { best })
}

fn most_active_week(scores: &[ActivityScore]) -> Option<WeeklySummary> {
    weekly_summaries(scores).into_iter().reduce(|best, week| {
        if week.activity_count > best.activity_count {
            week
        } else {
            best
        }
    })
}

fn streaks(scores: &[ActivityScore], today: NaiveDate) -> StreakSummary {
    let active_dates: BTreeSet<NaiveDate> = scores.iter().map(|s| s.date).collect();

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;
    for date in &active_dates {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(*date) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*date);
    }

    let mut current = 0u32;
    let mut cursor = today;
    while active_dates.contains(&cursor) {
        current += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }

    StreakSummary {
        longest_days: longest,
        current_days: current,
    }
}

fn ladder_progress(metric: MilestoneMetric, current: Decimal, ladder: &[Decimal]) -> MilestoneProgress {
    let achieved: Vec<Decimal> = ladder.iter().copied().filter(|t| *t <= current).collect();
    let next_goal = ladder.iter().copied().find(|t| *t > current);
    let progress_percent = match next_goal {
        Some(next) => (current / next * dec!(100)).round_dp(1),
        None => dec!(100),
    };
    MilestoneProgress {
        metric,
        current,
        achieved,
        next_goal,
        progress_percent,
    }
}

fn milestones(scores: &[ActivityScore]) -> Vec<MilestoneProgress> {
    let total_points: Decimal = scores.iter().map(|s| s.points).sum();
    let total_km: Decimal =
        scores.iter().map(|s| s.distance_meters).sum::<Decimal>() / dec!(1000);
    let total_hours: Decimal = scores
        .iter()
        .map(|s| Decimal::from(s.moving_time_seconds))
        .sum::<Decimal>()
        / dec!(3600);
    let total_count = Decimal::from(scores.len() as u64);

    vec![
        ladder_progress(MilestoneMetric::Points, total_points, &POINTS_LADDER),
        ladder_progress(MilestoneMetric::DistanceKm, total_km, &DISTANCE_KM_LADDER),
        ladder_progress(MilestoneMetric::Hours, total_hours, &HOURS_LADDER),
        ladder_progress(MilestoneMetric::Activities, total_count, &ACTIVITY_COUNT_LADDER),
    ]
}
