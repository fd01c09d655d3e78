use serde::{Deserialize, Serialize};

use crate::compound::Compound;
use crate::situation::SituationAssessment;
use crate::track::TrackCharacteristics;

/// Live race state for one car. Integer fields are signed so that bad input
/// reaches validation instead of failing in the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub current_lap: i32,
    pub current_position: i32,
    #[serde(default)]
    pub current_compound: Option<String>,
    #[serde(default)]
    pub tire_age_laps: i32,
    #[serde(default)]
    pub previous_stop_laps: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopWindow {
    pub stop_number: u32,
    pub start_lap: i32,
    pub optimal_lap: i32,
    pub end_lap: i32,
    pub recommended_compound: Compound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecommendation {
    pub recommended_stops: u32,
    pub pit_windows: Vec<StopWindow>,
    pub rationale: Vec<String>,
    pub stops_made: u32,
    pub remaining_laps: i32,
    /// Absent once the race is over or when no compound was reported.
    #[serde(default)]
    pub situation: Option<SituationAssessment>,
    pub effective: TrackCharacteristics,
}

impl StrategyRecommendation {
    pub const RACE_FINISHED: &'static str = "race is finished";

    pub(crate) fn finished(stops_made: u32, effective: TrackCharacteristics) -> Self {
        Self {
            recommended_stops: 0,
            pit_windows: Vec::new(),
            rationale: vec![Self::RACE_FINISHED.to_string()],
            stops_made,
            remaining_laps: 0,
            situation: None,
            effective,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.rationale.len() == 1 && self.rationale[0] == Self::RACE_FINISHED
    }
}
