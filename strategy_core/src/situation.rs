//! Fuel, wear and risk picture for the tire set a car is running on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::compound::{Compound, CompoundProfile, CompoundTable};
use crate::track::TrackCharacteristics;

/// Full race fuel load in kg.
pub const FULL_FUEL_KG: f64 = 110.0;
const MIN_EXPECTED_STINT_LAPS: i32 = 5;
const MAX_EVOLUTION_BENEFIT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SituationAssessment {
    pub fuel_load_kg: f64,
    /// Multiplier in [1, 2]; higher means fuel weighs more on the tires.
    pub fuel_effect: f64,
    /// Fraction of the set used up, in [0, 1].
    pub tire_wear: f64,
    pub risk_level: RiskLevel,
    pub expected_stint_laps: BTreeMap<Compound, i32>,
    pub warnings: Vec<String>,
}

struct FuelSensitivity {
    base: f64,
    sensitivity: f64,
    weight: f64,
    performance: f64,
}

fn fuel_sensitivity(compound: Compound) -> FuelSensitivity {
    match compound {
        Compound::Soft => FuelSensitivity {
            base: 2.0,
            sensitivity: 0.02,
            weight: 1.6,
            performance: 1.55,
        },
        Compound::Hard => FuelSensitivity {
            base: 1.0,
            sensitivity: 0.01,
            weight: 0.8,
            performance: 1.25,
        },
        Compound::Medium | Compound::Intermediate | Compound::Wet => FuelSensitivity {
            base: 1.5,
            sensitivity: 0.015,
            weight: 1.3,
            performance: 1.3,
        },
    }
}

/// Fuel left after `current_lap` laps, burning a full tank evenly over the race.
pub fn fuel_load(current_lap: i32, race_laps: i32) -> f64 {
    let per_lap = FULL_FUEL_KG / race_laps.max(1) as f64;
    (FULL_FUEL_KG - current_lap as f64 * per_lap).max(0.0)
}

pub fn fuel_effect(current_lap: i32, race_laps: i32, compound: Compound) -> f64 {
    let fuel = fuel_load(current_lap, race_laps);
    let ratio = fuel / FULL_FUEL_KG;
    let s = fuel_sensitivity(compound);

    let mut effect = ratio * s.base + 0.83;
    effect *= 1.0 + (s.sensitivity * fuel).min(0.5);
    let weight = ratio * s.weight / 2.0;
    ((effect + weight).min(1.5) * s.performance).clamp(1.0, 2.0)
}

pub fn tire_wear(
    profile: &CompoundProfile,
    tire_age_laps: i32,
    current_lap: i32,
    effective: &TrackCharacteristics,
    fuel_effect: f64,
) -> f64 {
    let base = tire_age_laps.max(0) as f64 / profile.max_life_laps.max(1.0);
    let evolution_benefit =
        (effective.track_evolution * current_lap.max(0) as f64).min(MAX_EVOLUTION_BENEFIT);
    let wear = base * effective.tire_degradation * (1.0 - evolution_benefit) * (fuel_effect / 2.0);
    wear.clamp(0.0, 1.0)
}

/// Age thresholds win over wear: an old set is at risk however gently it was run.
pub fn risk_level(profile: &CompoundProfile, tire_age_laps: i32, wear: f64) -> RiskLevel {
    let age = tire_age_laps as f64;
    if age >= 0.8 * profile.max_life_laps {
        return RiskLevel::Critical;
    }
    if age >= 0.6 * profile.max_life_laps {
        return RiskLevel::High;
    }
    if wear >= 0.9 {
        RiskLevel::Critical
    } else if wear >= 0.7 {
        RiskLevel::High
    } else if wear >= 0.5 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn assess(
    current_lap: i32,
    profile: &CompoundProfile,
    tire_age_laps: i32,
    effective: &TrackCharacteristics,
    table: &CompoundTable,
) -> SituationAssessment {
    let race_laps = effective.race_laps;
    let effect = fuel_effect(current_lap, race_laps, profile.compound);
    let wear = tire_wear(profile, tire_age_laps, current_lap, effective, effect);
    let risk = risk_level(profile, tire_age_laps, wear);

    let expected_stint_laps = table
        .profiles()
        .filter(|p| p.compound.is_dry())
        .map(|p| {
            let factor = effective.tire_degradation * fuel_effect(current_lap, race_laps, p.compound);
            let laps = (p.max_life_laps / factor).floor() as i32;
            (p.compound, laps.max(MIN_EXPECTED_STINT_LAPS))
        })
        .collect();

    let mut warnings: Vec<&str> = Vec::new();
    if wear >= 0.9 {
        warnings.push("extreme tire degradation");
    } else if wear >= 0.7 {
        warnings.push("high tire degradation");
    }
    if effect > 1.4 {
        warnings.push("high fuel load affecting tire performance");
    } else if effect > 1.2 {
        warnings.push("moderate fuel effect on tire performance");
    }
    if effective.high_degradation() {
        warnings.push("high-degradation circuit - expect shorter stints");
    }
    if effective.high_evolution() {
        warnings.push("strong track evolution - grip improves through the race");
    }
    if effective.high_safety_car() {
        warnings.push("high safety car probability - keep strategy flexible");
    }

    tracing::debug!(
        "{} age {} on lap {}: fuel effect {:.2}, wear {:.2}, risk {:?}",
        profile.compound,
        tire_age_laps,
        current_lap,
        effect,
        wear,
        risk
    );

    SituationAssessment {
        fuel_load_kg: fuel_load(current_lap, race_laps),
        fuel_effect: effect,
        tire_wear: wear,
        risk_level: risk,
        expected_stint_laps,
        warnings: warnings.into_iter().map(String::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TrackCatalog;

    fn chars(id: &str) -> TrackCharacteristics {
        TrackCharacteristics::from_config(TrackCatalog::reference().get(id).unwrap())
    }

    #[test]
    fn fuel_effect_saturates_on_full_tank() {
        assert_eq!(fuel_effect(0, 71, Compound::Soft), 2.0);
        assert!((fuel_effect(0, 71, Compound::Hard) - 1.875).abs() < 1e-9);
        // empty tank leaves only the constant term
        assert!((fuel_effect(71, 71, Compound::Soft) - 0.83 * 1.55).abs() < 1e-9);
        assert!((fuel_effect(71, 71, Compound::Hard) - 1.0375).abs() < 1e-9);
    }

    #[test]
    fn fuel_effect_never_grows_as_fuel_burns() {
        for compound in Compound::ALL {
            let mut previous = f64::INFINITY;
            for lap in 0..=60 {
                let effect = fuel_effect(lap, 57, compound);
                assert!((1.0..=2.0).contains(&effect));
                assert!(effect <= previous + 1e-12, "{compound} lap {lap}");
                previous = effect;
            }
        }
    }

    #[test]
    fn fuel_load_burns_evenly() {
        assert_eq!(fuel_load(0, 55), 110.0);
        assert!((fuel_load(11, 55) - 88.0).abs() < 1e-9);
        assert_eq!(fuel_load(70, 55), 0.0);
        assert_eq!(fuel_load(3, 0), 0.0);
    }

    #[test]
    fn wear_accounts_for_track_and_fuel() {
        let austria = chars("austrian_gp");
        let table = CompoundTable::reference();
        let medium = table.profile(Compound::Medium);
        let effect = fuel_effect(20, 71, Compound::Medium);
        assert!((effect - 1.95).abs() < 1e-9);
        // 10/35 * 1.15 * (1 - 0.22) * 1.95 / 2
        let wear = tire_wear(medium, 10, 20, &austria, effect);
        assert!((wear - 0.2498785714).abs() < 1e-6, "{wear}");
    }

    #[test]
    fn risk_thresholds() {
        let table = CompoundTable::reference();
        let soft = table.profile(Compound::Soft);
        assert_eq!(risk_level(soft, 17, 0.0), RiskLevel::Critical);
        assert_eq!(risk_level(soft, 13, 0.0), RiskLevel::High);
        assert_eq!(risk_level(soft, 5, 0.95), RiskLevel::Critical);
        assert_eq!(risk_level(soft, 5, 0.75), RiskLevel::High);
        assert_eq!(risk_level(soft, 5, 0.55), RiskLevel::Medium);
        assert_eq!(risk_level(soft, 5, 0.2), RiskLevel::Low);
    }

    #[test]
    fn expected_stints_on_full_tank() {
        let austria = chars("austrian_gp");
        let table = CompoundTable::reference();
        let s = assess(0, table.profile(Compound::Soft), 0, &austria, &table);
        let expected: BTreeMap<Compound, i32> =
            [(Compound::Soft, 8), (Compound::Medium, 15), (Compound::Hard, 20)].into();
        assert_eq!(s.expected_stint_laps, expected);
        assert_eq!(s.fuel_load_kg, 110.0);
        assert_eq!(s.tire_wear, 0.0);
        assert_eq!(s.risk_level, RiskLevel::Low);
    }

    #[test]
    fn warnings_follow_circuit_and_fuel() {
        let qatar = chars("qatar_gp");
        let table = CompoundTable::reference();
        let s = assess(0, table.profile(Compound::Soft), 0, &qatar, &table);
        assert_eq!(
            s.warnings,
            vec![
                "high fuel load affecting tire performance",
                "high-degradation circuit - expect shorter stints",
                "strong track evolution - grip improves through the race",
            ]
        );

        let singapore = chars("singapore_gp");
        let s = assess(55, table.profile(Compound::Hard), 10, &singapore, &table);
        assert!(s
            .warnings
            .contains(&"high safety car probability - keep strategy flexible".to_string()));
    }
}
