use crate::load::{LoadConfig, LoadSummary};
use crate::models::Sport;
use crate::scoring::ActivityScore;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Factor weights, summing to 100
const WEIGHT_VOLUME: Decimal = dec!(30);
const WEIGHT_BALANCE: Decimal = dec!(20);
const WEIGHT_CONSISTENCY: Decimal = dec!(25);
const WEIGHT_RECOVERY: Decimal = dec!(15);
const WEIGHT_INTENSITY: Decimal = dec!(10);

/// Ideal swim/bike/run moving-time split, in percent
const IDEAL_SWIM_PCT: Decimal = dec!(18);
const IDEAL_BIKE_PCT: Decimal = dec!(55);
const IDEAL_RUN_PCT: Decimal = dec!(27);

/// The five readiness sub-scores, each clamped to [0, 100]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessFactors {
    /// Chronic daily load against the 100-units/day race-ready baseline
    pub volume: Decimal,

    /// Closeness of the swim/bike/run time split to the 18/55/27 ideal
    pub balance: Decimal,

    /// Share of the last 28 days with at least one activity
    pub consistency: Decimal,

    /// Two-sided score around the optimal ACWR band
    pub recovery: Decimal,

    /// Two-sided score around the 10-30% high-zone time share
    pub intensity: Decimal,
}

impl ReadinessFactors {
    /// Weighted 0-100 composite. With all factors at 100 this is exactly
    /// 100 because the weights sum to 100.
    pub fn composite(&self) -> u8 {
        let weighted = self.volume * WEIGHT_VOLUME
            + self.balance * WEIGHT_BALANCE
            + self.consistency * WEIGHT_CONSISTENCY
            + self.recovery * WEIGHT_RECOVERY
            + self.intensity * WEIGHT_INTENSITY;
        let score = (weighted / dec!(100)).round();
        score.to_u8().unwrap_or(0).min(100)
    }
}

/// Readiness category label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessLevel {
    Excellent,
    Good,
    Building,
    NeedsWork,
}

impl ReadinessLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            ReadinessLevel::Excellent
        } else if score >= 60 {
            ReadinessLevel::Good
        } else if score >= 40 {
            ReadinessLevel::Building
        } else {
            ReadinessLevel::NeedsWork
        }
    }
}

/// Composite readiness output with the per-factor breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub score: u8,
    pub level: ReadinessLevel,
    pub factors: ReadinessFactors,

    /// Deterministic threshold-based suggestions; may be empty
    pub recommendations: Vec<String>,
}

/// Combines the five sub-scores into the weighted readiness composite
pub struct CompositeScoreEngine {
    load_config: LoadConfig,
}

impl CompositeScoreEngine {
    pub fn new() -> Self {
        CompositeScoreEngine {
            load_config: LoadConfig::default(),
        }
    }

    pub fn with_config(load_config: LoadConfig) -> Self {
        CompositeScoreEngine { load_config }
    }

    /// Assess readiness from the score series and the load summary as of
    /// `today`. Sub-metrics look at the chronic window ending at `today`.
    pub fn assess(
        &self,
        scores: &[ActivityScore],
        load: &LoadSummary,
        today: NaiveDate,
    ) -> ReadinessReport {
        let window_days = self.load_config.chronic_days;
        let window_start = today
            .checked_sub_days(chrono::Days::new(u64::from(window_days).saturating_sub(1)))
            .unwrap_or(today);
        let in_window: Vec<&ActivityScore> = scores
            .iter()
            .filter(|s| s.date >= window_start && s.date <= today)
            .collect();

        let (swim_pct, bike_pct, run_pct) = sport_time_shares(&in_window);
        let high_zone_ratio = high_zone_share(&in_window);
        let active_days = in_window.iter().map(|s| s.date).collect::<BTreeSet<_>>().len();

        // A zero-length window has no active days to count
        let consistency = if window_days == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(active_days as u32) / Decimal::from(window_days) * dec!(100)
        };

        let factors = ReadinessFactors {
            volume: clamp_score(load.chronic_load),
            balance: balance_score(swim_pct, bike_pct, run_pct),
            consistency: clamp_score(consistency),
            recovery: recovery_score(load.acwr),
            intensity: intensity_score(high_zone_ratio),
        };

        let score = factors.composite();
        let level = ReadinessLevel::from_score(score);
        let recommendations = recommendations(
            swim_pct,
            bike_pct,
            run_pct,
            &factors,
            load,
            high_zone_ratio,
            !in_window.is_empty(),
        );

        debug!(score, ?level, "assessed readiness");

        ReadinessReport {
            score,
            level,
            factors,
            recommendations,
        }
    }
}

impl Default for CompositeScoreEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_score(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(dec!(100))
}

/// Swim/bike/run shares of moving time, in percent. All zeros when the
/// window has no time in those sports.
fn sport_time_shares(scores: &[&ActivityScore]) -> (Decimal, Decimal, Decimal) {
    let mut swim = Decimal::ZERO;
    let mut bike = Decimal::ZERO;
    let mut run = Decimal::ZERO;
    for score in scores {
        let seconds = Decimal::from(score.moving_time_seconds);
        match score.sport {
            Sport::Swim => swim += seconds,
            Sport::Ride => bike += seconds,
            Sport::Run => run += seconds,
            _ => {}
        }
    }
    let total = swim + bike + run;
    if total.is_zero() {
        return (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    }
    (
        swim / total * dec!(100),
        bike / total * dec!(100),
        run / total * dec!(100),
    )
}

/// Zone 4+5 share of total zone time, as a ratio in [0, 1]
fn high_zone_share(scores: &[&ActivityScore]) -> Decimal {
    let mut high = Decimal::ZERO;
    let mut total = Decimal::ZERO;
    for score in scores {
        high += Decimal::from(score.zone_time.high_zone_seconds());
        total += Decimal::from(score.zone_time.total_seconds());
    }
    if total.is_zero() {
        Decimal::ZERO
    } else {
        high / total
    }
}

fn balance_score(swim_pct: Decimal, bike_pct: Decimal, run_pct: Decimal) -> Decimal {
    let mean_deviation = ((swim_pct - IDEAL_SWIM_PCT).abs()
        + (bike_pct - IDEAL_BIKE_PCT).abs()
        + (run_pct - IDEAL_RUN_PCT).abs())
        / dec!(3);
    clamp_score(dec!(100) - mean_deviation)
}

/// Linear ramp up to the optimal band, full marks inside [0.8, 1.5],
/// linear decay above reaching zero at 2.5
fn recovery_score(acwr: Decimal) -> Decimal {
    if acwr < dec!(0.8) {
        clamp_score(acwr / dec!(0.8) * dec!(100))
    } else if acwr <= dec!(1.5) {
        dec!(100)
    } else {
        clamp_score(dec!(100) - (acwr - dec!(1.5)) * dec!(100))
    }
}

/// Same two-sided shape around the 10-30% high-zone share ideal,
/// decaying to zero at a 100% share
fn intensity_score(ratio: Decimal) -> Decimal {
    if ratio < dec!(0.1) {
        clamp_score(ratio / dec!(0.1) * dec!(100))
    } else if ratio <= dec!(0.3) {
        dec!(100)
    } else {
        clamp_score(dec!(100) - (ratio - dec!(0.3)) / dec!(0.7) * dec!(100))
    }
}

#[allow(clippy::too_many_arguments)]
fn recommendations(
    swim_pct: Decimal,
    bike_pct: Decimal,
    run_pct: Decimal,
    factors: &ReadinessFactors,
    load: &LoadSummary,
    high_zone_ratio: Decimal,
    has_activity: bool,
) -> Vec<String> {
    let mut out = Vec::new();
    if !has_activity {
        return out;
    }

    if swim_pct < dec!(10) {
        out.push("Add swim sessions to move toward the 18% swim share".to_string());
    }
    if bike_pct < dec!(40) {
        out.push("Bike volume is low against the 55% target share".to_string());
    }
    if run_pct < dec!(15) {
        out.push("Add run volume to move toward the 27% run share".to_string());
    }
    if factors.consistency < dec!(50) {
        out.push("Train on more days; under half of the last four weeks were active".to_string());
    }
    if load.acwr > dec!(1.8) {
        out.push("Acute load is well above your baseline; plan an easier week".to_string());
    } else if load.acwr < dec!(0.8) && !load.chronic_load.is_zero() {
        out.push("Recent load sits below your baseline; there is room to build".to_string());
    }
    if high_zone_ratio > dec!(0.3) {
        out.push("High-intensity share is above the 30% ceiling; add easy volume".to_string());
    } else if high_zone_ratio < dec!(0.1) {
        out.push("Little time above zone 3; add some higher-intensity work".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::{AcwrStatus, TrendDirection};
    use crate::models::ZoneTimeBreakdown;
    use crate::scoring::ScoringMethod;

    fn summary(acute: Decimal, chronic: Decimal) -> LoadSummary {
        let acwr = if chronic.is_zero() {
            Decimal::ONE
        } else {
            acute / chronic
        };
        LoadSummary {
            acute_load: acute,
            chronic_load: chronic,
            acwr,
            status: AcwrStatus::from_acwr(acwr),
            trend: TrendDirection::Stable,
        }
    }

    fn score_on(
        date: NaiveDate,
        sport: Sport,
        moving_seconds: u32,
        zone_seconds: [u32; 5],
    ) -> ActivityScore {
        ActivityScore {
            activity_id: format!("{}_{}", sport.label(), date),
            date,
            sport,
            moving_time_seconds: moving_seconds,
            distance_meters: Decimal::ZERO,
            average_hr: None,
            points: dec!(50),
            training_load: dec!(50),
            zone_time: ZoneTimeBreakdown { seconds: zone_seconds },
            method: ScoringMethod::PercentOfMax,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn all_perfect_factors_compose_to_exactly_100() {
        let factors = ReadinessFactors {
            volume: dec!(100),
            balance: dec!(100),
            consistency: dec!(100),
            recovery: dec!(100),
            intensity: dec!(100),
        };
        assert_eq!(factors.composite(), 100);
    }

    #[test]
    fn test_composite_weighting() {
        // Only volume at 100: 100 * 30 / 100 = 30
        let factors = ReadinessFactors {
            volume: dec!(100),
            balance: Decimal::ZERO,
            consistency: Decimal::ZERO,
            recovery: Decimal::ZERO,
            intensity: Decimal::ZERO,
        };
        assert_eq!(factors.composite(), 30);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(ReadinessLevel::from_score(100), ReadinessLevel::Excellent);
        assert_eq!(ReadinessLevel::from_score(80), ReadinessLevel::Excellent);
        assert_eq!(ReadinessLevel::from_score(79), ReadinessLevel::Good);
        assert_eq!(ReadinessLevel::from_score(60), ReadinessLevel::Good);
        assert_eq!(ReadinessLevel::from_score(59), ReadinessLevel::Building);
        assert_eq!(ReadinessLevel::from_score(40), ReadinessLevel::Building);
        assert_eq!(ReadinessLevel::from_score(39), ReadinessLevel::NeedsWork);
    }

    #[test]
    fn test_volume_caps_at_100() {
        let engine = CompositeScoreEngine::new();
        let report = engine.assess(&[], &summary(dec!(150), dec!(150)), day(2024, 6, 7));
        assert_eq!(report.factors.volume, dec!(100));

        let report = engine.assess(&[], &summary(dec!(40), dec!(40)), day(2024, 6, 7));
        assert_eq!(report.factors.volume, dec!(40));
    }

    #[test]
    fn test_recovery_shape() {
        assert_eq!(recovery_score(dec!(0.0)), dec!(0));
        assert_eq!(recovery_score(dec!(0.4)), dec!(50));
        assert_eq!(recovery_score(dec!(0.8)), dec!(100));
        assert_eq!(recovery_score(dec!(1.5)), dec!(100));
        assert_eq!(recovery_score(dec!(2.0)), dec!(50));
        assert_eq!(recovery_score(dec!(2.5)), dec!(0));
        assert_eq!(recovery_score(dec!(4.0)), dec!(0));
    }

    #[test]
    fn test_intensity_shape() {
        assert_eq!(intensity_score(dec!(0)), dec!(0));
        assert_eq!(intensity_score(dec!(0.05)), dec!(50));
        assert_eq!(intensity_score(dec!(0.1)), dec!(100));
        assert_eq!(intensity_score(dec!(0.3)), dec!(100));
        assert_eq!(intensity_score(dec!(1.0)), dec!(0));
    }

    #[test]
    fn test_balance_at_ideal_split() {
        assert_eq!(balance_score(dec!(18), dec!(55), dec!(27)), dec!(100));
        // All bike: deviations 18 + 45 + 27 = 90, mean 30
        assert_eq!(balance_score(dec!(0), dec!(100), dec!(0)), dec!(70));
    }

    #[test]
    fn test_consistency_counts_distinct_days() {
        let engine = CompositeScoreEngine::new();
        let today = day(2024, 6, 28);
        // Two activities on one day plus one on another: 2 active days
        let scores = vec![
            score_on(day(2024, 6, 27), Sport::Run, 3600, [0, 3600, 0, 0, 0]),
            score_on(day(2024, 6, 27), Sport::Ride, 3600, [0, 3600, 0, 0, 0]),
            score_on(day(2024, 6, 20), Sport::Run, 3600, [0, 3600, 0, 0, 0]),
        ];
        let report = engine.assess(&scores, &summary(dec!(20), dec!(20)), today);
        assert_eq!(report.factors.consistency.round_dp(2), dec!(7.14));
    }

    #[test]
    fn test_recommendations_fire_on_thresholds() {
        let engine = CompositeScoreEngine::new();
        let today = day(2024, 6, 28);
        // Run-only athlete with no high-zone time and a big acute spike
        let scores = vec![score_on(day(2024, 6, 27), Sport::Run, 3600, [3600, 0, 0, 0, 0])];
        let load = summary(dec!(60), dec!(20));
        let report = engine.assess(&scores, &load, today);

        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("swim")));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("easier week")));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("higher-intensity")));
    }

    #[test]
    fn zero_length_window_degrades_instead_of_dividing() {
        let engine = CompositeScoreEngine::with_config(LoadConfig {
            acute_days: 7,
            chronic_days: 0,
            trend_window_days: 28,
        });
        let scores = vec![score_on(day(2024, 6, 27), Sport::Run, 3600, [0, 3600, 0, 0, 0])];
        let report = engine.assess(&scores, &summary(dec!(20), dec!(20)), day(2024, 6, 28));
        assert_eq!(report.factors.consistency, Decimal::ZERO);
    }

    #[test]
    fn test_no_recommendations_without_activity() {
        let engine = CompositeScoreEngine::new();
        let report = engine.assess(&[], &summary(dec!(0), dec!(0)), day(2024, 6, 28));
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_old_scores_outside_window_ignored() {
        let engine = CompositeScoreEngine::new();
        let today = day(2024, 6, 28);
        let scores = vec![score_on(day(2024, 1, 1), Sport::Run, 3600, [0, 3600, 0, 0, 0])];
        let report = engine.assess(&scores, &summary(dec!(0), dec!(0)), today);
        assert_eq!(report.factors.consistency, dec!(0));
        assert!(report.recommendations.is_empty());
    }
}
