use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackType {
    Standard,
    Technical,
    #[serde(alias = "high-speed")]
    HighSpeed,
    Street,
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrackType::Standard => "standard",
            TrackType::Technical => "technical",
            TrackType::HighSpeed => "high_speed",
            TrackType::Street => "street",
        };
        f.write_str(s)
    }
}

/// One circuit entry of the track catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    pub id: String,
    pub name: String,
    /// km
    pub track_length: f64,
    pub track_type: TrackType,
    pub race_laps: i32,
    /// seconds
    pub pit_loss_time: f64,
    pub max_stops: i32,
    pub difficult_overtaking: bool,
    pub tire_degradation: f64,
    pub track_evolution: f64,
    pub safety_car_probability: f64,
    pub traffic_impact: f64,
    pub pit_window_margin: i32,
}

impl TrackConfig {
    /// Explicit opt-in stand-in for circuits missing from the catalog.
    pub fn generic(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: "Generic Circuit".to_string(),
            track_length: 5.0,
            track_type: TrackType::Standard,
            race_laps: 50,
            pit_loss_time: 20.0,
            max_stops: 3,
            difficult_overtaking: false,
            tire_degradation: 1.0,
            track_evolution: 0.005,
            safety_car_probability: 0.3,
            traffic_impact: 0.5,
            pit_window_margin: 3,
        }
    }

    pub fn overtaking_difficulty(&self) -> f64 {
        if self.difficult_overtaking {
            0.8
        } else {
            0.4
        }
    }

    pub fn race_distance_km(&self) -> f64 {
        self.track_length * self.race_laps as f64
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.race_laps <= 0 {
            return Err(ConfigurationError::InvalidRaceLaps {
                track: self.id.clone(),
                laps: self.race_laps,
            });
        }
        let invalid = |field: &'static str, reason: String| ConfigurationError::InvalidField {
            track: self.id.clone(),
            field,
            reason,
        };
        if self.id.trim().is_empty() {
            return Err(invalid("id", "must not be empty".into()));
        }
        if !(self.track_length > 0.0) {
            return Err(invalid("track_length", format!("{} is not positive", self.track_length)));
        }
        if !(self.pit_loss_time >= 0.0) {
            return Err(invalid("pit_loss_time", format!("{} is negative", self.pit_loss_time)));
        }
        if self.max_stops < 0 {
            return Err(invalid("max_stops", format!("{} is negative", self.max_stops)));
        }
        if self.pit_window_margin < 0 {
            return Err(invalid(
                "pit_window_margin",
                format!("{} is negative", self.pit_window_margin),
            ));
        }
        if !(self.tire_degradation > 0.0) {
            return Err(invalid(
                "tire_degradation",
                format!("{} is not positive", self.tire_degradation),
            ));
        }
        if !(self.track_evolution >= 0.0) {
            return Err(invalid(
                "track_evolution",
                format!("{} is negative", self.track_evolution),
            ));
        }
        for (field, value) in [
            ("safety_car_probability", self.safety_car_probability),
            ("traffic_impact", self.traffic_impact),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("{value} is outside [0, 1]")));
            }
        }
        Ok(())
    }
}

/// Effective characteristics for one race instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCharacteristics {
    /// 1.0 = baseline wear
    pub tire_degradation: f64,
    /// grip gain per lap
    pub track_evolution: f64,
    pub safety_car_probability: f64,
    pub traffic_impact: f64,
    pub overtaking_difficulty: f64,
    pub pit_window_margin_laps: i32,
    pub track_length: f64,
    pub track_type: TrackType,
    pub pit_loss_time_seconds: f64,
    pub race_laps: i32,
    pub max_stops: i32,
}

impl TrackCharacteristics {
    pub fn from_config(config: &TrackConfig) -> Self {
        Self {
            tire_degradation: config.tire_degradation,
            track_evolution: config.track_evolution,
            safety_car_probability: clamp_unit(config.safety_car_probability),
            traffic_impact: clamp_unit(config.traffic_impact),
            overtaking_difficulty: clamp_unit(config.overtaking_difficulty()),
            pit_window_margin_laps: config.pit_window_margin,
            track_length: config.track_length,
            track_type: config.track_type,
            pit_loss_time_seconds: config.pit_loss_time,
            race_laps: config.race_laps,
            max_stops: config.max_stops,
        }
    }

    pub fn high_degradation(&self) -> bool {
        self.tire_degradation > 1.1
    }

    pub fn high_evolution(&self) -> bool {
        self.track_evolution > 0.008
    }

    pub fn high_safety_car(&self) -> bool {
        self.safety_car_probability > 0.35
    }

    pub fn difficult_overtaking(&self) -> bool {
        self.overtaking_difficulty > 0.7
    }
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
