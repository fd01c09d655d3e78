use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::compound::Compound;

/// Pre-processed session aggregates handed over by the telemetry loader.
///
/// Every field is optional: whatever the loader could not produce is simply
/// left out and the catalog defaults stay in force.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSummary {
    pub weather: Option<WeatherSummary>,
    pub tire_wear: BTreeMap<Compound, CompoundWear>,
    pub race_distance_km: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSummary {
    pub rainfall: Option<bool>,
    pub track_temp_c: Option<f64>,
    /// 1.0 = perfectly stable session, 0.0 = highly volatile.
    pub stability_index: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompoundWear {
    pub degradation_rate: Option<f64>,
    pub avg_life_laps: Option<f64>,
    pub fastest_lap_seconds: Option<f64>,
}

impl SessionSummary {
    pub fn is_empty(&self) -> bool {
        self.weather.is_none() && self.tire_wear.is_empty()
    }

    /// Mean of the observed degradation rates, if any compound reported one.
    pub fn mean_degradation(&self) -> Option<f64> {
        let rates: Vec<f64> = self
            .tire_wear
            .values()
            .filter_map(|w| w.degradation_rate)
            .collect();
        if rates.is_empty() {
            None
        } else {
            Some(rates.iter().sum::<f64>() / rates.len() as f64)
        }
    }

    /// Quickest lap seen on any compound; the reference for pace deltas.
    pub fn fastest_lap(&self) -> Option<f64> {
        self.tire_wear
            .values()
            .filter_map(|w| w.fastest_lap_seconds)
            .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |a| a.min(t))))
    }
}
