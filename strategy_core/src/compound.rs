use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::session::CompoundWear;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    #[serde(alias = "inter")]
    Intermediate,
    Wet,
}

impl Compound {
    pub const ALL: [Compound; 5] = [
        Compound::Soft,
        Compound::Medium,
        Compound::Hard,
        Compound::Intermediate,
        Compound::Wet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Compound::Soft => "soft",
            Compound::Medium => "medium",
            Compound::Hard => "hard",
            Compound::Intermediate => "intermediate",
            Compound::Wet => "wet",
        }
    }

    pub fn is_dry(&self) -> bool {
        matches!(self, Compound::Soft | Compound::Medium | Compound::Hard)
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown compound: {0}")]
pub struct UnknownCompound(pub String);

impl FromStr for Compound {
    type Err = UnknownCompound;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soft" => Ok(Compound::Soft),
            "medium" => Ok(Compound::Medium),
            "hard" => Ok(Compound::Hard),
            "intermediate" | "inter" => Ok(Compound::Intermediate),
            "wet" => Ok(Compound::Wet),
            _ => Err(UnknownCompound(s.to_string())),
        }
    }
}

/// Part of the race a compound is best suited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RacePhase {
    Start,
    Middle,
    End,
    Any,
}

impl RacePhase {
    /// Phase of the race a given lap falls into, by thirds.
    pub fn of_lap(lap: i32, race_laps: i32) -> Self {
        if race_laps <= 0 {
            return RacePhase::Any;
        }
        let progress = lap as f64 / race_laps as f64;
        if progress < 1.0 / 3.0 {
            RacePhase::Start
        } else if progress < 2.0 / 3.0 {
            RacePhase::Middle
        } else {
            RacePhase::End
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundProfile {
    pub compound: Compound,
    pub min_life_laps: f64,
    pub max_life_laps: f64,
    /// Seconds per lap against the reference compound; negative is faster.
    pub pace_delta: f64,
    /// Remaining-laps range `(low, high)` in which the compound is preferred.
    pub optimal_window: (i32, i32),
    pub high_wear_tracks: Vec<String>,
    pub preferred_phase: RacePhase,
}

impl CompoundProfile {
    pub fn suits_remaining(&self, remaining_laps: i32) -> bool {
        let (low, high) = self.optimal_window;
        remaining_laps >= low && remaining_laps <= high
    }

    pub fn wears_fast_at(&self, track_id: &str) -> bool {
        self.high_wear_tracks.iter().any(|t| t == track_id)
    }
}

/// Immutable tire compound catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundTable {
    profiles: BTreeMap<Compound, CompoundProfile>,
}

impl CompoundTable {
    pub fn reference() -> Self {
        let profiles = [
            CompoundProfile {
                compound: Compound::Soft,
                min_life_laps: 10.0,
                max_life_laps: 20.0,
                pace_delta: -0.5,
                optimal_window: (1, 15),
                high_wear_tracks: vec!["singapore_gp".into(), "spanish_gp".into()],
                preferred_phase: RacePhase::End,
            },
            CompoundProfile {
                compound: Compound::Medium,
                min_life_laps: 20.0,
                max_life_laps: 35.0,
                pace_delta: 0.0,
                optimal_window: (5, 25),
                high_wear_tracks: vec!["british_gp".into(), "japanese_gp".into()],
                preferred_phase: RacePhase::Middle,
            },
            CompoundProfile {
                compound: Compound::Hard,
                min_life_laps: 30.0,
                max_life_laps: 45.0,
                pace_delta: 0.0,
                optimal_window: (10, 40),
                high_wear_tracks: vec!["spanish_gp".into()],
                preferred_phase: RacePhase::Start,
            },
            CompoundProfile {
                compound: Compound::Intermediate,
                min_life_laps: 15.0,
                max_life_laps: 30.0,
                pace_delta: 0.0,
                optimal_window: (0, 30),
                high_wear_tracks: Vec::new(),
                preferred_phase: RacePhase::Any,
            },
            CompoundProfile {
                compound: Compound::Wet,
                min_life_laps: 20.0,
                max_life_laps: 40.0,
                pace_delta: 0.0,
                optimal_window: (0, 40),
                high_wear_tracks: Vec::new(),
                preferred_phase: RacePhase::Any,
            },
        ];
        Self {
            profiles: profiles.into_iter().map(|p| (p.compound, p)).collect(),
        }
    }

    pub fn profile(&self, compound: Compound) -> &CompoundProfile {
        // every table is built from `reference()`, so all compounds are present
        &self.profiles[&compound]
    }

    pub fn profiles(&self) -> impl Iterator<Item = &CompoundProfile> {
        self.profiles.values()
    }

    /// One-time refinement from observed session aggregates.
    ///
    /// Each compound with an observed average life gets
    /// `max_life = avg * 1.2` and `min_life = max(5, avg * 0.7)`. Pace deltas
    /// are re-based on the quickest observed lap across all compounds.
    pub fn refined(
        &self,
        tire_wear: &BTreeMap<Compound, CompoundWear>,
        fastest_overall: Option<f64>,
    ) -> Self {
        let mut profiles = self.profiles.clone();
        for (compound, wear) in tire_wear {
            let Some(profile) = profiles.get_mut(compound) else {
                continue;
            };
            if let Some(avg) = wear.avg_life_laps.filter(|a| *a > 0.0) {
                profile.max_life_laps = avg * 1.2;
                profile.min_life_laps = (avg * 0.7).max(5.0);
            }
            if let (Some(lap), Some(best)) = (wear.fastest_lap_seconds, fastest_overall) {
                profile.pace_delta = lap - best;
            }
        }
        Self { profiles }
    }
}

impl Default for CompoundTable {
    fn default() -> Self {
        Self::reference()
    }
}
