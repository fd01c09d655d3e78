use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::compound::{Compound, CompoundProfile, CompoundTable, RacePhase};
use crate::track::{TrackCharacteristics, TrackType};

/// Final stints this short always go on softs.
const SHORT_FINAL_STINT_LAPS: i32 = 15;
/// Usable life multiplier on circuits listed as high-wear for a compound.
const HIGH_WEAR_LIFE_FACTOR: f64 = 0.8;

/// How compounds are picked for each stint. One policy is applied to every
/// stop of a recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundPolicy {
    /// Hards for every stint but the last; the last goes soft when short or
    /// on a street circuit, medium otherwise.
    #[default]
    DurabilityFirst,
    /// Keeps compounds whose optimal window holds the stint length and whose
    /// life on this circuit covers it, then prefers the one suited to the
    /// race phase of the stop.
    PhaseAware,
}

/// The stint a compound is being chosen for.
#[derive(Debug, Clone, Copy)]
pub struct StintContext {
    /// Zero-based.
    pub stop_index: usize,
    pub total_stops: usize,
    pub stop_lap: i32,
    pub remaining_laps_after_stop: i32,
    pub stint_laps: i32,
}

impl StintContext {
    pub fn is_last(&self) -> bool {
        self.stop_index + 1 == self.total_stops
    }
}

pub struct CompoundSelector<'a> {
    policy: CompoundPolicy,
    table: &'a CompoundTable,
    track_id: &'a str,
}

impl<'a> CompoundSelector<'a> {
    pub fn new(policy: CompoundPolicy, table: &'a CompoundTable, track_id: &'a str) -> Self {
        Self {
            policy,
            table,
            track_id,
        }
    }

    pub fn select(&self, stint: &StintContext, effective: &TrackCharacteristics) -> Compound {
        match self.policy {
            CompoundPolicy::DurabilityFirst => durability_first(stint, effective),
            CompoundPolicy::PhaseAware => self.phase_aware(stint, effective),
        }
    }

    fn phase_aware(&self, stint: &StintContext, effective: &TrackCharacteristics) -> Compound {
        if stint.is_last() && effective.track_type == TrackType::Street {
            return Compound::Soft;
        }

        let phase = RacePhase::of_lap(stint.stop_lap, effective.race_laps);
        let mut candidates: Vec<&CompoundProfile> = self
            .table
            .profiles()
            .filter(|p| p.compound.is_dry())
            .filter(|p| p.suits_remaining(stint.stint_laps))
            .filter(|p| self.usable_life(p) >= stint.stint_laps as f64)
            .collect();

        candidates.sort_by(|a, b| {
            let a_phase = a.preferred_phase == phase;
            let b_phase = b.preferred_phase == phase;
            b_phase
                .cmp(&a_phase)
                .then(a.pace_delta.partial_cmp(&b.pace_delta).unwrap_or(Ordering::Equal))
                .then(
                    self.usable_life(b)
                        .partial_cmp(&self.usable_life(a))
                        .unwrap_or(Ordering::Equal),
                )
        });

        match candidates.first() {
            Some(profile) => {
                tracing::debug!(
                    "stop {}: {} fits {} laps in {:?} phase",
                    stint.stop_index + 1,
                    profile.compound,
                    stint.stint_laps,
                    phase
                );
                profile.compound
            }
            None => durability_first(stint, effective),
        }
    }

    fn usable_life(&self, profile: &CompoundProfile) -> f64 {
        if profile.wears_fast_at(self.track_id) {
            profile.max_life_laps * HIGH_WEAR_LIFE_FACTOR
        } else {
            profile.max_life_laps
        }
    }
}

fn durability_first(stint: &StintContext, effective: &TrackCharacteristics) -> Compound {
    if !stint.is_last() {
        return Compound::Hard;
    }
    if stint.remaining_laps_after_stop <= SHORT_FINAL_STINT_LAPS
        || effective.track_type == TrackType::Street
    {
        Compound::Soft
    } else {
        Compound::Medium
    }
}
