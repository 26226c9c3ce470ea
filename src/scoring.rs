use crate::models::{
    Activity, ActivityBundle, HeartRateSeries, Sport, ZoneBoundarySet, ZoneTimeBreakdown,
};
use crate::zones::{ZoneBoundaryResolver, ZoneStrategy};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Leaderboard point weights per zone-minute, zones 1-5
const POINT_WEIGHTS: [Decimal; 5] = [dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)];

/// Training-load weights per zone-minute, zones 1-5. Never used for
/// leaderboard display.
const LOAD_WEIGHTS: [Decimal; 5] = [dec!(1), dec!(1.5), dec!(2), dec!(3), dec!(4)];

/// Points a swim activity earns per moving-time minute
const SWIM_POINTS_PER_MINUTE: Decimal = dec!(4);

/// How an activity's score was computed. Exposed on every score so callers
/// can tell a zone-backed value from a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    /// Zone times from the athlete's custom provider bands
    CustomZones,
    /// Zone times from the percent-of-max fallback bands
    PercentOfMax,
    /// Provider-precomputed breakdown, no stream available
    StoredZones,
    /// Time-based swim scoring
    SwimTime,
    /// Flat fallback: no usable heart-rate data
    Flat,
}

/// Scoring strategy for one activity, selected once at scoring time.
///
/// This is the single dispatch point for the swim / no-HR / custom-zone /
/// percent-fallback branches; nothing downstream re-tests those conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringStrategy {
    /// Swim: score from moving time, zones only for display
    SwimTime { zones: ZoneStrategy },
    /// Walk the sample stream against the resolved zone bands
    Zoned(ZoneStrategy),
    /// No stream or no boundaries: flat minute-per-minute scoring
    Flat,
}

impl ScoringStrategy {
    pub fn select(
        activity: &Activity,
        samples: Option<&HeartRateSeries>,
        zone_config: Option<&ZoneBoundarySet>,
    ) -> Self {
        let zones = ZoneBoundaryResolver::resolve(zone_config, activity.max_hr);
        let has_stream = samples.map(HeartRateSeries::is_valid).unwrap_or(false);

        if activity.is_swim() {
            return ScoringStrategy::SwimTime {
                zones: if has_stream { zones } else { ZoneStrategy::Unavailable },
            };
        }
        if has_stream && zones.is_available() {
            ScoringStrategy::Zoned(zones)
        } else {
            ScoringStrategy::Flat
        }
    }
}

/// Walks aligned heart-rate/time samples into seconds-per-zone
pub struct ZoneTimeAccumulator;

impl ZoneTimeAccumulator {
    /// Left-sample attribution: the duration between consecutive samples is
    /// credited entirely to the zone of the earlier sample, and the final
    /// sample contributes nothing. The sum of the result can therefore
    /// never exceed the stream's total duration.
    pub fn accumulate(series: &HeartRateSeries, zones: &ZoneStrategy) -> ZoneTimeBreakdown {
        let mut breakdown = ZoneTimeBreakdown::default();
        if !series.is_valid() {
            return breakdown;
        }

        for i in 0..series.heart_rate.len() - 1 {
            let duration = series.elapsed_time[i + 1] - series.elapsed_time[i];
            if let Some(zone) = zones.zone_for(series.heart_rate[i]) {
                breakdown.seconds[(zone - 1) as usize] += duration;
            }
        }
        breakdown
    }
}

/// Converts zone-time breakdowns into weighted scalar scores
pub struct ZonePointScorer;

impl ZonePointScorer {
    /// Leaderboard points: zone-minutes weighted 1/2/3/4/5
    pub fn points(breakdown: &ZoneTimeBreakdown) -> Decimal {
        Self::weighted(breakdown, &POINT_WEIGHTS)
    }

    /// Training load: zone-minutes weighted 1/1.5/2/3/4
    pub fn training_load(breakdown: &ZoneTimeBreakdown) -> Decimal {
        Self::weighted(breakdown, &LOAD_WEIGHTS)
    }

    fn weighted(breakdown: &ZoneTimeBreakdown, weights: &[Decimal; 5]) -> Decimal {
        (1..=5u8)
            .map(|zone| breakdown.zone_minutes(zone) * weights[(zone - 1) as usize])
            .sum()
    }
}

/// Per-activity scoring result.
///
/// Carries the activity fields the aggregation and records stages need, so
/// downstream components run on the score series alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityScore {
    /// Identifier of the scored activity
    pub activity_id: String,

    /// Calendar date of the activity start
    pub date: NaiveDate,

    /// Sport category
    pub sport: Sport,

    /// Moving time in seconds
    pub moving_time_seconds: u32,

    /// Distance in meters, zero when the provider sent none
    pub distance_meters: Decimal,

    /// Average heart rate, if recorded
    pub average_hr: Option<u16>,

    /// Leaderboard points
    pub points: Decimal,

    /// Training load for the acute/chronic aggregation
    pub training_load: Decimal,

    /// Seconds per zone; all zeros on the flat path
    pub zone_time: ZoneTimeBreakdown,

    /// Which scoring path produced this result
    pub method: ScoringMethod,
}

/// Scores one activity with the strategy selected for it
pub fn score_activity(
    activity: &Activity,
    samples: Option<&HeartRateSeries>,
    zone_config: Option<&ZoneBoundarySet>,
) -> ActivityScore {
    let strategy = ScoringStrategy::select(activity, samples, zone_config);

    let (points, zone_time, method) = match (&strategy, samples) {
        (ScoringStrategy::SwimTime { zones }, samples) => {
            let points = (activity.moving_time_minutes() * SWIM_POINTS_PER_MINUTE).round();
            // Breakdown is display-only for swims; the score ignores it
            let breakdown = match (samples, zones.is_available()) {
                (Some(series), true) => ZoneTimeAccumulator::accumulate(series, zones),
                _ => ZoneTimeBreakdown::default(),
            };
            (points, breakdown, ScoringMethod::SwimTime)
        }
        (ScoringStrategy::Zoned(zones), Some(series)) => {
            let breakdown = ZoneTimeAccumulator::accumulate(series, zones);
            let method = match zones {
                ZoneStrategy::Custom(_) => ScoringMethod::CustomZones,
                _ => ScoringMethod::PercentOfMax,
            };
            (ZonePointScorer::points(&breakdown), breakdown, method)
        }
        _ => (
            activity.moving_time_minutes(),
            ZoneTimeBreakdown::default(),
            ScoringMethod::Flat,
        ),
    };

    // No breakdown means no load-specific weighting; the point value stands
    // in as a proxy.
    let training_load = if zone_time.is_empty() {
        points
    } else {
        ZonePointScorer::training_load(&zone_time)
    };

    debug!(
        activity = %activity.id,
        ?method,
        %points,
        %training_load,
        "scored activity"
    );

    ActivityScore {
        activity_id: activity.id.clone(),
        date: activity.date(),
        sport: activity.sport,
        moving_time_seconds: activity.moving_time_seconds,
        distance_meters: activity.distance_meters.unwrap_or(Decimal::ZERO),
        average_hr: activity.average_hr,
        points,
        training_load,
        zone_time,
        method,
    }
}

/// Scores one bundle, preferring the raw stream over a provider-stored
/// breakdown. A stored breakdown only applies when no usable stream exists;
/// swims keep their time-based score either way.
pub fn score_bundle(bundle: &ActivityBundle, zone_config: Option<&ZoneBoundarySet>) -> ActivityScore {
    let has_stream = bundle
        .samples
        .as_ref()
        .map(HeartRateSeries::is_valid)
        .unwrap_or(false);

    let stored = match &bundle.zone_time {
        Some(stored) if !has_stream && !stored.is_empty() => stored,
        _ => return score_activity(&bundle.activity, bundle.samples.as_ref(), zone_config),
    };

    let mut score = score_activity(&bundle.activity, None, zone_config);
    score.zone_time = *stored;
    score.training_load = ZonePointScorer::training_load(stored);
    if !bundle.activity.is_swim() {
        score.points = ZonePointScorer::points(stored);
        score.method = ScoringMethod::StoredZones;
    }
    score
}
