use crate::scoring::ActivityScore;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Rolling-window configuration for the load aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Acute window length in days (default: 7)
    pub acute_days: u16,

    /// Chronic window length in days (default: 28)
    pub chronic_days: u16,

    /// Length of each half of the trend comparison in days (default: 28)
    pub trend_window_days: u16,
}

impl Default for LoadConfig {
    fn default() -> Self {
        LoadConfig {
            acute_days: 7,
            chronic_days: 28,
            trend_window_days: 28,
        }
    }
}

/// Training load for one calendar date. Dates absent from the series carry
/// an implicit zero and still count in every window denominator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLoad {
    pub date: NaiveDate,
    pub load: Decimal,
}

/// ACWR status bands, tuned for endurance athletes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcwrStatus {
    Undertraining,
    Optimal,
    Overreaching,
    HighRisk,
}

impl AcwrStatus {
    /// Band lookup. The bands partition [0, inf): < 0.8 undertraining,
    /// [0.8, 1.8] optimal, (1.8, 2.2] overreaching, > 2.2 high risk.
    pub fn from_acwr(acwr: Decimal) -> Self {
        if acwr < dec!(0.8) {
            AcwrStatus::Undertraining
        } else if acwr <= dec!(1.8) {
            AcwrStatus::Optimal
        } else if acwr <= dec!(2.2) {
            AcwrStatus::Overreaching
        } else {
            AcwrStatus::HighRisk
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AcwrStatus::Undertraining => "Load well below baseline; fitness may erode",
            AcwrStatus::Optimal => "Load in the productive range",
            AcwrStatus::Overreaching => "Load climbing faster than the baseline supports",
            AcwrStatus::HighRisk => "Load spike; injury and illness risk elevated",
        }
    }
}

/// Direction of the recent-vs-prior load comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Stable,
    Decreasing,
}

/// Acute/chronic load summary for one athlete as of a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Average daily load over the acute window
    pub acute_load: Decimal,

    /// Average daily load over the chronic window
    pub chronic_load: Decimal,

    /// Acute:chronic workload ratio; 1 when the chronic load is zero
    pub acwr: Decimal,

    pub status: AcwrStatus,

    pub trend: TrendDirection,
}

/// Folds per-activity training load into calendar-day buckets and rolling
/// acute/chronic averages
pub struct LoadAggregator {
    config: LoadConfig,
}

impl LoadAggregator {
    pub fn new() -> Self {
        LoadAggregator {
            config: LoadConfig::default(),
        }
    }

    pub fn with_config(config: LoadConfig) -> Self {
        LoadAggregator { config }
    }

    /// Sum each activity's training load into its calendar date
    pub fn aggregate_daily(&self, scores: &[ActivityScore]) -> BTreeMap<NaiveDate, Decimal> {
        let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for score in scores {
            *daily.entry(score.date).or_insert(Decimal::ZERO) += score.training_load;
        }
        daily
    }

    /// Explicit per-date series for reporting, load-bearing dates only
    pub fn daily_series(&self, daily: &BTreeMap<NaiveDate, Decimal>) -> Vec<DailyLoad> {
        daily
            .iter()
            .map(|(date, load)| DailyLoad {
                date: *date,
                load: *load,
            })
            .collect()
    }

    /// Acute/chronic averages, ACWR, status band, and trend as of `today`
    pub fn summarize(&self, daily: &BTreeMap<NaiveDate, Decimal>, today: NaiveDate) -> LoadSummary {
        let acute_load = self.window_average(daily, today, self.config.acute_days);
        let chronic_load = self.window_average(daily, today, self.config.chronic_days);

        // Guarded ratio: a zero chronic load yields the neutral ACWR of 1
        let acwr = if chronic_load.is_zero() {
            Decimal::ONE
        } else {
            acute_load / chronic_load
        };

        let status = AcwrStatus::from_acwr(acwr);
        let trend = self.trend(daily, today);

        debug!(%acute_load, %chronic_load, %acwr, ?status, ?trend, "summarized training load");

        LoadSummary {
            acute_load,
            chronic_load,
            acwr,
            status,
            trend,
        }
    }

    /// Mean daily load over the `days` calendar days ending at `end`.
    /// Missing days contribute zero to the numerator but always count in
    /// the denominator.
    fn window_average(
        &self,
        daily: &BTreeMap<NaiveDate, Decimal>,
        end: NaiveDate,
        days: u16,
    ) -> Decimal {
        if days == 0 {
            return Decimal::ZERO;
        }
        let sum = self.window_sum(daily, end, days);
        sum / Decimal::from(days)
    }

    fn window_sum(&self, daily: &BTreeMap<NaiveDate, Decimal>, end: NaiveDate, days: u16) -> Decimal {
        let start = end
            .checked_sub_days(chrono::Days::new(u64::from(days) - 1))
            .unwrap_or(end);
        daily.range(start..=end).map(|(_, load)| *load).sum()
    }

    /// Compare the mean load of the most recent trend window against the
    /// window before it: > +10% increasing, < -10% decreasing, else stable.
    fn trend(&self, daily: &BTreeMap<NaiveDate, Decimal>, today: NaiveDate) -> TrendDirection {
        let days = self.config.trend_window_days;
        if days == 0 {
            return TrendDirection::Stable;
        }

        let recent = self.window_average(daily, today, days);
        let prior_end = today
            .checked_sub_days(chrono::Days::new(u64::from(days)))
            .unwrap_or(today);
        let prior = self.window_average(daily, prior_end, days);

        if prior.is_zero() {
            return if recent.is_zero() {
                TrendDirection::Stable
            } else {
                TrendDirection::Increasing
            };
        }

        let change = (recent - prior) / prior;
        if change > dec!(0.10) {
            TrendDirection::Increasing
        } else if change < dec!(-0.10) {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

impl Default for LoadAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sport, ZoneTimeBreakdown};
    use crate::scoring::ScoringMethod;

    fn score(date: NaiveDate, load: Decimal) -> ActivityScore {
        ActivityScore {
            activity_id: format!("a_{}", date.format("%Y%m%d")),
            date,
            sport: Sport::Run,
            moving_time_seconds: 3600,
            distance_meters: Decimal::ZERO,
            average_hr: None,
            points: load,
            training_load: load,
            zone_time: ZoneTimeBreakdown::default(),
            method: ScoringMethod::Flat,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_date_loads_accumulate() {
        let aggregator = LoadAggregator::new();
        let date = day(2024, 6, 3);
        let daily =
            aggregator.aggregate_daily(&[score(date, dec!(40)), score(date, dec!(25))]);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[&date], dec!(65));
    }

    #[test]
    fn missing_days_stay_in_the_denominator() {
        let aggregator = LoadAggregator::new();
        // One 70-load day inside an otherwise empty week
        let daily = aggregator.aggregate_daily(&[score(day(2024, 6, 3), dec!(70))]);
        let summary = aggregator.summarize(&daily, day(2024, 6, 7));

        assert_eq!(summary.acute_load, dec!(10));
        assert_eq!(summary.chronic_load, dec!(2.5));
    }

    #[test]
    fn zero_chronic_load_pins_acwr_to_one() {
        let aggregator = LoadAggregator::new();
        let daily = aggregator.aggregate_daily(&[]);
        let summary = aggregator.summarize(&daily, day(2024, 6, 7));

        assert_eq!(summary.acwr, Decimal::ONE);
        assert_eq!(summary.status, AcwrStatus::Optimal);
        assert_eq!(summary.trend, TrendDirection::Stable);
    }

    #[test]
    fn uniform_load_gives_acwr_of_one() {
        let aggregator = LoadAggregator::new();
        let mut scores = Vec::new();
        let mut date = day(2024, 5, 1);
        while date <= day(2024, 6, 7) {
            scores.push(score(date, dec!(50)));
            date = date.succ_opt().unwrap();
        }
        let daily = aggregator.aggregate_daily(&scores);
        let summary = aggregator.summarize(&daily, day(2024, 6, 7));

        assert_eq!(summary.acute_load, summary.chronic_load);
        assert_eq!(summary.acwr, Decimal::ONE);
        assert_eq!(summary.status, AcwrStatus::Optimal);
    }

    #[test]
    fn acwr_bands_partition_both_sides_of_each_boundary() {
        assert_eq!(AcwrStatus::from_acwr(dec!(0.0)), AcwrStatus::Undertraining);
        assert_eq!(AcwrStatus::from_acwr(dec!(0.79)), AcwrStatus::Undertraining);
        assert_eq!(AcwrStatus::from_acwr(dec!(0.8)), AcwrStatus::Optimal);
        assert_eq!(AcwrStatus::from_acwr(dec!(1.8)), AcwrStatus::Optimal);
        assert_eq!(AcwrStatus::from_acwr(dec!(1.81)), AcwrStatus::Overreaching);
        assert_eq!(AcwrStatus::from_acwr(dec!(2.2)), AcwrStatus::Overreaching);
        assert_eq!(AcwrStatus::from_acwr(dec!(2.21)), AcwrStatus::HighRisk);
        assert_eq!(AcwrStatus::from_acwr(dec!(5.0)), AcwrStatus::HighRisk);
    }

    #[test]
    fn spike_week_lands_in_high_risk() {
        let aggregator = LoadAggregator::new();
        let mut scores = Vec::new();
        // Quiet month, then a heavy final week
        let mut date = day(2024, 5, 11);
        while date <= day(2024, 6, 7) {
            let load = if date >= day(2024, 6, 1) {
                dec!(100)
            } else {
                dec!(10)
            };
            scores.push(score(date, load));
            date = date.succ_opt().unwrap();
        }
        let daily = aggregator.aggregate_daily(&scores);
        let summary = aggregator.summarize(&daily, day(2024, 6, 7));

        assert!(summary.acwr > dec!(2.2));
        assert_eq!(summary.status, AcwrStatus::HighRisk);
    }

    #[test]
    fn test_trend_directions() {
        let aggregator = LoadAggregator::new();
        let today = day(2024, 6, 30);

        // Recent window twice the prior window
        let mut scores = Vec::new();
        let mut date = day(2024, 5, 7);
        while date <= today {
            let load = if date > day(2024, 6, 2) { dec!(60) } else { dec!(30) };
            scores.push(score(date, load));
            date = date.succ_opt().unwrap();
        }
        let daily = aggregator.aggregate_daily(&scores);
        assert_eq!(
            aggregator.summarize(&daily, today).trend,
            TrendDirection::Increasing
        );

        // Flip the halves for a decrease
        let mut scores = Vec::new();
        let mut date = day(2024, 5, 7);
        while date <= today {
            let load = if date > day(2024, 6, 2) { dec!(30) } else { dec!(60) };
            scores.push(score(date, load));
            date = date.succ_opt().unwrap();
        }
        let daily = aggregator.aggregate_daily(&scores);
        assert_eq!(
            aggregator.summarize(&daily, today).trend,
            TrendDirection::Decreasing
        );

        // Steady load stays stable
        let mut scores = Vec::new();
        let mut date = day(2024, 5, 7);
        while date <= today {
            scores.push(score(date, dec!(45)));
            date = date.succ_opt().unwrap();
        }
        let daily = aggregator.aggregate_daily(&scores);
        assert_eq!(
            aggregator.summarize(&daily, today).trend,
            TrendDirection::Stable
        );
    }

    #[test]
    fn test_status_labels_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&AcwrStatus::HighRisk).unwrap(),
            "\"high_risk\""
        );
        assert_eq!(
            serde_json::to_string(&AcwrStatus::Undertraining).unwrap(),
            "\"undertraining\""
        );
    }

    #[test]
    fn test_custom_window_lengths() {
        let aggregator = LoadAggregator::with_config(LoadConfig {
            acute_days: 3,
            chronic_days: 6,
            trend_window_days: 6,
        });
        let daily = aggregator.aggregate_daily(&[
            score(day(2024, 6, 5), dec!(30)),
            score(day(2024, 6, 7), dec!(30)),
        ]);
        let summary = aggregator.summarize(&daily, day(2024, 6, 7));

        assert_eq!(summary.acute_load, dec!(20));
        assert_eq!(summary.chronic_load, dec!(10));
        assert_eq!(summary.acwr, dec!(2));
    }
}
