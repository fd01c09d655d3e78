use serde::{Deserialize, Serialize};

use crate::selector::{CompoundSelector, StintContext};
use crate::track::{TrackCharacteristics, TrackType};
use crate::types::StopWindow;

/// Laps either side of the target lap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginPolicy {
    /// 3 laps on street circuits, 5 elsewhere.
    #[default]
    TrackType,
    /// The circuit's own `pit_window_margin` from the catalog.
    Catalog,
}

impl MarginPolicy {
    pub fn margin(&self, effective: &TrackCharacteristics) -> i32 {
        match self {
            MarginPolicy::TrackType => {
                if effective.track_type == TrackType::Street {
                    3
                } else {
                    5
                }
            }
            MarginPolicy::Catalog => effective.pit_window_margin_laps.max(0),
        }
    }
}

/// Last lap on which a stop may be recommended.
pub fn last_pit_lap(race_laps: i32) -> i32 {
    race_laps - 2
}

/// Split the remaining laps into `num_stops + 1` even stints and place a
/// window around each stint boundary.
pub fn generate_windows(
    current_lap: i32,
    remaining_laps: i32,
    num_stops: u32,
    effective: &TrackCharacteristics,
    margin_policy: MarginPolicy,
    selector: &CompoundSelector<'_>,
) -> Vec<StopWindow> {
    if num_stops == 0 || remaining_laps <= 0 {
        return Vec::new();
    }

    let stops = num_stops as i32;
    let stint_length = remaining_laps / (stops + 1);
    let last_lap = last_pit_lap(effective.race_laps);
    let margin = margin_policy.margin(effective);

    (1..=stops)
        .map(|i| {
            let stint_start = current_lap + stint_length * (i - 1);
            let target = current_lap + stint_length * i;
            let optimal = target.min(last_lap);
            let start = stint_start.max(target - margin).min(optimal);
            let end = (target + margin).min(last_lap).max(optimal);

            let next_boundary = if i == stops {
                effective.race_laps
            } else {
                (current_lap + stint_length * (i + 1)).min(last_lap)
            };
            let stint = StintContext {
                stop_index: (i - 1) as usize,
                total_stops: num_stops as usize,
                stop_lap: optimal,
                remaining_laps_after_stop: effective.race_laps - optimal,
                stint_laps: next_boundary - optimal,
            };

            StopWindow {
                stop_number: i as u32,
                start_lap: start,
                optimal_lap: optimal,
                end_lap: end,
                recommended_compound: selector.select(&stint, effective),
            }
        })
        .collect()
}
