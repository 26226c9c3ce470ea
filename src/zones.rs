use crate::models::ZoneBoundarySet;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Zone computation strategy selected once per activity.
///
/// Exactly one variant applies: athlete-custom provider bands, the
/// percent-of-max fallback, or no zone computation at all. Callers never
/// branch on raw configuration state; they match on this instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneStrategy {
    /// Provider-supplied 5-band set, used verbatim
    Custom(ZoneBoundarySet),
    /// Bands derived from max heart rate at 60/70/80/90% cutoffs
    PercentOfMax(u16),
    /// Neither a usable config nor a max HR; flat scoring applies
    Unavailable,
}

impl ZoneStrategy {
    /// Zone (1-5) containing the given heart-rate sample.
    ///
    /// Custom bands: the smallest-indexed zone whose `max` is >= the sample
    /// wins, so a sample exactly on a boundary belongs to the lower zone.
    /// The unbounded last band always matches.
    ///
    /// Percent-of-max: Z1 < 60%, Z2 [60,70), Z3 [70,80), Z4 [80,90),
    /// Z5 >= 90%, so there a sample exactly on a cutoff belongs to the
    /// higher zone. Integer arithmetic keeps the cutoffs exact.
    pub fn zone_for(&self, hr: u16) -> Option<u8> {
        match self {
            ZoneStrategy::Custom(set) => {
                for (i, band) in set.bands.iter().enumerate() {
                    match band.max {
                        Some(max) if hr <= max => return Some(i as u8 + 1),
                        None => return Some(i as u8 + 1),
                        _ => {}
                    }
                }
                // Valid sets end in an unbounded band; unreachable for them
                Some(5)
            }
            ZoneStrategy::PercentOfMax(max_hr) => {
                let hr = u32::from(hr) * 10;
                let max = u32::from(*max_hr);
                let zone = if hr < max * 6 {
                    1
                } else if hr < max * 7 {
                    2
                } else if hr < max * 8 {
                    3
                } else if hr < max * 9 {
                    4
                } else {
                    5
                };
                Some(zone)
            }
            ZoneStrategy::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, ZoneStrategy::Unavailable)
    }
}

/// Selects the zone strategy for an activity from the athlete's zone
/// configuration and the activity's max heart rate
pub struct ZoneBoundaryResolver;

impl ZoneBoundaryResolver {
    /// Resolve the strategy: custom bands when valid, otherwise
    /// percent-of-max when a max HR exists, otherwise unavailable.
    ///
    /// A malformed custom set is not an error; it degrades to the
    /// percent-of-max method with a warning.
    pub fn resolve(custom: Option<&ZoneBoundarySet>, max_hr: Option<u16>) -> ZoneStrategy {
        if let Some(set) = custom {
            if set.is_valid() {
                return ZoneStrategy::Custom(set.clone());
            }
            warn!(
                bands = set.bands.len(),
                "ignoring malformed zone boundary set, falling back to percent-of-max"
            );
        }

        match max_hr {
            Some(max) if max > 0 => ZoneStrategy::PercentOfMax(max),
            _ => ZoneStrategy::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ZoneBand;

    fn band(min: u16, max: Option<u16>) -> ZoneBand {
        ZoneBand { min, max }
    }

    fn custom_set() -> ZoneBoundarySet {
        ZoneBoundarySet::new(vec![
            band(0, Some(120)),
            band(120, Some(140)),
            band(140, Some(160)),
            band(160, Some(175)),
            band(175, None),
        ])
    }

    #[test]
    fn test_resolve_prefers_valid_custom_set() {
        let set = custom_set();
        let strategy = ZoneBoundaryResolver::resolve(Some(&set), Some(190));
        assert_eq!(strategy, ZoneStrategy::Custom(set));
    }

    #[test]
    fn test_resolve_malformed_set_falls_back_to_percent() {
        let malformed = ZoneBoundarySet::new(vec![band(0, Some(120)), band(120, None)]);
        let strategy = ZoneBoundaryResolver::resolve(Some(&malformed), Some(190));
        assert_eq!(strategy, ZoneStrategy::PercentOfMax(190));
    }

    #[test]
    fn test_resolve_nothing_available() {
        assert_eq!(
            ZoneBoundaryResolver::resolve(None, None),
            ZoneStrategy::Unavailable
        );

        let malformed = ZoneBoundarySet::new(vec![]);
        assert_eq!(
            ZoneBoundaryResolver::resolve(Some(&malformed), None),
            ZoneStrategy::Unavailable
        );

        // A zero max HR cannot anchor percentage cutoffs
        assert_eq!(
            ZoneBoundaryResolver::resolve(None, Some(0)),
            ZoneStrategy::Unavailable
        );
    }

    #[test]
    fn test_custom_zone_lookup() {
        let strategy = ZoneStrategy::Custom(custom_set());
        assert_eq!(strategy.zone_for(90), Some(1));
        assert_eq!(strategy.zone_for(130), Some(2));
        assert_eq!(strategy.zone_for(150), Some(3));
        assert_eq!(strategy.zone_for(170), Some(4));
        assert_eq!(strategy.zone_for(200), Some(5));
    }

    #[test]
    fn custom_boundary_tie_goes_to_lower_zone() {
        let strategy = ZoneStrategy::Custom(custom_set());
        // Samples exactly on a band max stay in that band
        assert_eq!(strategy.zone_for(120), Some(1));
        assert_eq!(strategy.zone_for(140), Some(2));
        assert_eq!(strategy.zone_for(160), Some(3));
        assert_eq!(strategy.zone_for(175), Some(4));
        assert_eq!(strategy.zone_for(176), Some(5));
    }

    #[test]
    fn test_percent_of_max_cutoffs() {
        // Max HR 200 puts the cutoffs at 120/140/160/180
        let strategy = ZoneStrategy::PercentOfMax(200);
        assert_eq!(strategy.zone_for(119), Some(1));
        assert_eq!(strategy.zone_for(120), Some(2)); // exactly 60% -> Z2
        assert_eq!(strategy.zone_for(139), Some(2));
        assert_eq!(strategy.zone_for(140), Some(3)); // exactly 70% -> Z3
        assert_eq!(strategy.zone_for(159), Some(3));
        assert_eq!(strategy.zone_for(160), Some(4)); // exactly 80% -> Z4
        assert_eq!(strategy.zone_for(179), Some(4));
        assert_eq!(strategy.zone_for(180), Some(5)); // exactly 90% -> Z5
        assert_eq!(strategy.zone_for(230), Some(5));
    }

    #[test]
    fn test_percent_of_max_odd_max_hr() {
        // Max HR 185: 60% = 111, 90% = 166.5
        let strategy = ZoneStrategy::PercentOfMax(185);
        assert_eq!(strategy.zone_for(110), Some(1));
        assert_eq!(strategy.zone_for(111), Some(2));
        assert_eq!(strategy.zone_for(166), Some(4));
        assert_eq!(strategy.zone_for(167), Some(5));
    }

    #[test]
    fn test_unavailable_yields_no_zone() {
        assert_eq!(ZoneStrategy::Unavailable.zone_for(150), None);
        assert!(!ZoneStrategy::Unavailable.is_available());
        assert!(ZoneStrategy::PercentOfMax(185).is_available());
    }
}
