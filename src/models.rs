use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sport categories as reported by the activity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sport {
    Swim,
    Ride,
    Run,
    Walk,
    Hike,
    Other,
}

impl Sport {
    /// Display name used in tables and recommendation strings
    pub fn label(&self) -> &'static str {
        match self {
            Sport::Swim => "swim",
            Sport::Ride => "ride",
            Sport::Run => "run",
            Sport::Walk => "walk",
            Sport::Hike => "hike",
            Sport::Other => "other",
        }
    }
}

/// A single workout activity as delivered by the provider.
///
/// Activities are immutable inputs: the engine never mutates them, it only
/// derives scores and aggregates from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Provider-assigned activity identifier
    pub id: String,

    /// Sport category
    pub sport: Sport,

    /// Start of the activity in UTC
    pub start_time: DateTime<Utc>,

    /// Moving time in seconds
    pub moving_time_seconds: u32,

    /// Total distance in meters
    pub distance_meters: Option<Decimal>,

    /// Average heart rate in bpm, if the device recorded one
    pub average_hr: Option<u16>,

    /// Maximum heart rate in bpm, if the device recorded one
    pub max_hr: Option<u16>,

    /// Excluded from all competition output when set
    #[serde(default)]
    pub hidden: bool,
}

impl Activity {
    /// Swim activities are scored on moving time, not heart rate
    pub fn is_swim(&self) -> bool {
        self.sport == Sport::Swim
    }

    /// Calendar date of the activity start
    pub fn date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }

    /// Moving time expressed in minutes
    pub fn moving_time_minutes(&self) -> Decimal {
        Decimal::from(self.moving_time_seconds) / Decimal::from(60)
    }
}

/// Aligned heart-rate and elapsed-time sample streams for one activity.
///
/// Both vectors have the same length and `elapsed_time` is strictly
/// increasing. A series that fails `is_valid` is treated as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSeries {
    /// Heart rate samples in beats per minute
    pub heart_rate: Vec<u16>,

    /// Elapsed seconds from activity start, strictly increasing
    pub elapsed_time: Vec<u32>,
}

impl HeartRateSeries {
    pub fn is_valid(&self) -> bool {
        if self.heart_rate.len() != self.elapsed_time.len() || self.heart_rate.len() < 2 {
            return false;
        }
        self.elapsed_time.windows(2).all(|w| w[0] < w[1])
    }

    /// Total duration covered by the samples, in seconds
    pub fn duration_seconds(&self) -> u32 {
        match (self.elapsed_time.first(), self.elapsed_time.last()) {
            (Some(first), Some(last)) => last.saturating_sub(*first),
            _ => 0,
        }
    }
}

/// One heart-rate band. `max = None` means unbounded (last band only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneBand {
    pub min: u16,
    pub max: Option<u16>,
}

/// Athlete-custom 5-band zone configuration from the provider.
///
/// Valid sets have exactly 5 contiguous, non-decreasing bands where only the
/// last band may be unbounded. Invalid sets are never used directly; the
/// resolver falls back to the percent-of-max method instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneBoundarySet {
    pub bands: Vec<ZoneBand>,
}

impl ZoneBoundarySet {
    pub fn new(bands: Vec<ZoneBand>) -> Self {
        ZoneBoundarySet { bands }
    }

    pub fn is_valid(&self) -> bool {
        if self.bands.len() != 5 {
            return false;
        }
        for (i, band) in self.bands.iter().enumerate() {
            match band.max {
                Some(max) => {
                    if max < band.min {
                        return false;
                    }
                    if let Some(next) = self.bands.get(i + 1) {
                        if next.min != max {
                            return false;
                        }
                    }
                }
                // Only the last band may be open-ended
                None => {
                    if i != self.bands.len() - 1 {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// Seconds spent in each of the five heart-rate zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZoneTimeBreakdown {
    pub seconds: [u32; 5],
}

impl ZoneTimeBreakdown {
    pub fn total_seconds(&self) -> u32 {
        self.seconds.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_seconds() == 0
    }

    /// Minutes spent in the given zone (1-based)
    pub fn zone_minutes(&self, zone: u8) -> Decimal {
        debug_assert!((1..=5).contains(&zone));
        Decimal::from(self.seconds[(zone - 1) as usize]) / Decimal::from(60)
    }

    /// Seconds spent in zones 4 and 5 combined
    pub fn high_zone_seconds(&self) -> u32 {
        self.seconds[3] + self.seconds[4]
    }
}

/// Date window a competition runs over. Open ends match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl CompetitionWindow {
    pub fn open() -> Self {
        CompetitionWindow::default()
    }

    pub fn between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        CompetitionWindow { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}

/// Activity plus its optional zone inputs, as read from an input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityBundle {
    pub activity: Activity,

    /// Raw heart-rate samples, when the provider delivered a stream
    pub samples: Option<HeartRateSeries>,

    /// Provider-precomputed breakdown, used only when no usable stream
    /// exists
    #[serde(default)]
    pub zone_time: Option<ZoneTimeBreakdown>,
}
