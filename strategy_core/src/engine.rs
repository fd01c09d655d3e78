use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::adjuster::adjust;
use crate::catalog::TrackCatalog;
use crate::compound::{Compound, CompoundProfile, CompoundTable};
use crate::error::{ConfigurationError, SnapshotError};
use crate::estimator::estimate_stops;
use crate::position::adjust_for_position;
use crate::rationale::{generate_rationale, RationaleInputs};
use crate::selector::{CompoundPolicy, CompoundSelector};
use crate::session::SessionSummary;
use crate::situation::assess;
use crate::track::{TrackCharacteristics, TrackConfig};
use crate::types::{RaceSnapshot, StrategyRecommendation};
use crate::windows::{generate_windows, last_pit_lap, MarginPolicy};

pub const MAX_POSITION: i32 = 20;

/// Which heuristics the engine runs with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub compound_policy: CompoundPolicy,
    pub margin_policy: MarginPolicy,
    /// Use a generic circuit instead of failing on unknown track ids.
    pub allow_generic_circuit: bool,
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigurationError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Strategy engine for one circuit.
///
/// Immutable once built: applying a session observation returns a new
/// engine, so a single instance can be shared freely between readers.
#[derive(Debug, Clone)]
pub struct StrategyEngine {
    track: TrackConfig,
    config: EngineConfig,
    baseline: TrackCharacteristics,
    effective: TrackCharacteristics,
    compounds: CompoundTable,
}

impl StrategyEngine {
    pub fn new(
        catalog: &TrackCatalog,
        track_id: &str,
        config: EngineConfig,
    ) -> Result<Self, ConfigurationError> {
        let track = match catalog.resolve(track_id) {
            Ok(track) => track.clone(),
            Err(ConfigurationError::UnknownTrack(_)) if config.allow_generic_circuit => {
                tracing::warn!("unknown track {track_id}; using generic circuit");
                TrackConfig::generic(&track_id.trim().to_lowercase())
            }
            Err(e) => return Err(e),
        };
        Self::from_track(track, config)
    }

    pub fn from_track(track: TrackConfig, config: EngineConfig) -> Result<Self, ConfigurationError> {
        track.validate()?;
        let baseline = TrackCharacteristics::from_config(&track);
        tracing::info!(
            "strategy engine for {} ({} laps, {}, max {} stops, {:?}/{:?})",
            track.id,
            track.race_laps,
            track.track_type,
            track.max_stops,
            config.compound_policy,
            config.margin_policy
        );
        Ok(Self {
            track,
            config,
            effective: baseline.clone(),
            baseline,
            compounds: CompoundTable::reference(),
        })
    }

    pub fn track(&self) -> &TrackConfig {
        &self.track
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn characteristics(&self) -> &TrackCharacteristics {
        &self.effective
    }

    pub fn compounds(&self) -> &CompoundTable {
        &self.compounds
    }

    /// Engine refined by a session summary. Always derived from the catalog
    /// baseline, so a fresher summary replaces an older one.
    pub fn apply_observation(&self, summary: &SessionSummary) -> Self {
        let effective = adjust(&self.baseline, summary);
        let compounds = CompoundTable::reference().refined(&summary.tire_wear, summary.fastest_lap());
        tracing::info!(
            "{}: applied observation (degradation {:.3}, evolution {:.4}, safety car {:.2}, traffic {:.2})",
            self.track.id,
            effective.tire_degradation,
            effective.track_evolution,
            effective.safety_car_probability,
            effective.traffic_impact
        );
        Self {
            track: self.track.clone(),
            config: self.config.clone(),
            baseline: self.baseline.clone(),
            effective,
            compounds,
        }
    }

    /// Recommend remaining stops, windows and compounds for a snapshot.
    pub fn generate_strategy(
        &self,
        snapshot: &RaceSnapshot,
    ) -> Result<StrategyRecommendation, SnapshotError> {
        let current_compound = validate(snapshot)?;
        let effective = &self.effective;
        let stops_made = snapshot.previous_stop_laps.len() as u32;

        let remaining_laps = effective.race_laps - snapshot.current_lap;
        if remaining_laps <= 0 {
            tracing::debug!("lap {} of {}: race finished", snapshot.current_lap, effective.race_laps);
            return Ok(StrategyRecommendation::finished(stops_made, effective.clone()));
        }

        let current: Option<&CompoundProfile> = current_compound.map(|c| self.compounds.profile(c));
        let base = estimate_stops(remaining_laps, current, snapshot.tire_age_laps, effective);

        let max_remaining = (effective.max_stops - stops_made as i32).max(0);
        let unclamped = adjust_for_position(
            base,
            snapshot.current_position,
            effective.traffic_impact,
            effective.overtaking_difficulty,
            i32::MAX,
        );
        let mut stops = unclamped.min(max_remaining);
        let capped_by_max_stops = unclamped > max_remaining;

        // one stop per lap after the current one, none in the final two laps
        let feasible = (last_pit_lap(effective.race_laps) - snapshot.current_lap).max(0);
        if stops > feasible {
            tracing::debug!("only {} stops fit in {} laps", feasible, remaining_laps);
            stops = feasible;
        }
        let stops = stops.max(0) as u32;

        let selector = CompoundSelector::new(self.config.compound_policy, &self.compounds, &self.track.id);
        let pit_windows = generate_windows(
            snapshot.current_lap,
            remaining_laps,
            stops,
            effective,
            self.config.margin_policy,
            &selector,
        );

        let rationale = generate_rationale(&RationaleInputs {
            effective,
            remaining_laps,
            current,
            tire_age_laps: snapshot.tire_age_laps,
            recommended_stops: stops,
            capped_by_max_stops,
        });

        let situation = current.map(|profile| {
            assess(
                snapshot.current_lap,
                profile,
                snapshot.tire_age_laps,
                effective,
                &self.compounds,
            )
        });

        tracing::debug!(
            "{} lap {} P{}: {} stops {:?}",
            self.track.id,
            snapshot.current_lap,
            snapshot.current_position,
            stops,
            pit_windows.iter().map(|w| w.optimal_lap).collect::<Vec<_>>()
        );

        Ok(StrategyRecommendation {
            recommended_stops: stops,
            pit_windows,
            rationale,
            stops_made,
            remaining_laps,
            situation,
            effective: effective.clone(),
        })
    }
}

/// Reject a snapshot before any computation; returns the parsed compound.
pub fn validate(snapshot: &RaceSnapshot) -> Result<Option<Compound>, SnapshotError> {
    if snapshot.current_lap < 0 {
        return Err(SnapshotError::NegativeLap(snapshot.current_lap));
    }
    if !(1..=MAX_POSITION).contains(&snapshot.current_position) {
        return Err(SnapshotError::PositionOutOfRange(snapshot.current_position));
    }
    if snapshot.tire_age_laps < 0 {
        return Err(SnapshotError::NegativeTireAge(snapshot.tire_age_laps));
    }

    let mut previous: Option<i32> = None;
    for &stop in &snapshot.previous_stop_laps {
        if stop < 1 {
            return Err(SnapshotError::StopBeforeRaceStart(stop));
        }
        if stop >= snapshot.current_lap {
            return Err(SnapshotError::StopNotBeforeCurrentLap {
                stop,
                current: snapshot.current_lap,
            });
        }
        if previous.is_some_and(|p| stop <= p) {
            return Err(SnapshotError::StopsNotAscending);
        }
        previous = Some(stop);
    }

    snapshot
        .current_compound
        .as_deref()
        .map(|c| c.parse::<Compound>())
        .transpose()
        .map_err(|e| SnapshotError::UnknownCompound(e.0))
}
