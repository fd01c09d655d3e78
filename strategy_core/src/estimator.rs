use crate::compound::CompoundProfile;
use crate::track::TrackCharacteristics;

/// Roughly one stop per this many remaining laps.
const LAPS_PER_STOP: i32 = 20;
/// Share of the remaining race the current tires must be able to cover.
const REQUIRED_TIRE_COVERAGE: f64 = 0.7;

/// Base number of remaining stops.
///
/// A monotone scoring rule: every step adds or removes one stop and the
/// running total never drops below zero. Breakpoints are strict comparisons.
pub fn estimate_stops(
    remaining_laps: i32,
    current: Option<&CompoundProfile>,
    tire_age_laps: i32,
    effective: &TrackCharacteristics,
) -> i32 {
    let mut stops = remaining_laps.max(0) / LAPS_PER_STOP;
    tracing::debug!("base stops {} for {} remaining laps", stops, remaining_laps);

    if let Some(profile) = current {
        if tire_age_laps > 0 {
            let remaining_life = (profile.max_life_laps - tire_age_laps as f64).max(0.0);
            if remaining_life < REQUIRED_TIRE_COVERAGE * remaining_laps as f64 {
                stops += 1;
                tracing::debug!(
                    "{} tires have {:.1} laps left; +1 stop",
                    profile.compound,
                    remaining_life
                );
            }
        }
    }

    stops = step(stops, effective.tire_degradation, 1.2, 0.8);
    stops = step(stops, effective.track_evolution, 0.012, 0.008);
    stops = step(stops, effective.safety_car_probability, 0.4, 0.2);
    stops
}

/// +1 above `high`, -1 below `low`, floor-clamped at zero.
pub(crate) fn step(stops: i32, value: f64, high: f64, low: f64) -> i32 {
    if value > high {
        stops + 1
    } else if value < low {
        (stops - 1).max(0)
    } else {
        stops
    }
}
