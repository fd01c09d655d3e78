//! Blends catalog defaults with live session aggregates.

use crate::session::{SessionSummary, WeatherSummary};
use crate::track::{clamp_unit, TrackCharacteristics, TrackType};

/// Weight given to observed degradation over the catalog value.
const OBSERVED_DEGRADATION_WEIGHT: f64 = 0.7;
/// Cap on a safety-car estimate raised only by weather.
const WEATHER_ONLY_SAFETY_CAR_CAP: f64 = 0.8;
const HOT_TRACK_TEMP_C: f64 = 40.0;

/// Produce the effective characteristics for this race from `base` and the
/// session summary. Absent fields leave the corresponding value untouched.
pub fn adjust(base: &TrackCharacteristics, summary: &SessionSummary) -> TrackCharacteristics {
    let mut effective = base.clone();

    if let Some(observed) = summary.mean_degradation() {
        effective.tire_degradation = OBSERVED_DEGRADATION_WEIGHT * observed
            + (1.0 - OBSERVED_DEGRADATION_WEIGHT) * base.tire_degradation;
        tracing::debug!(
            "tire degradation {:.3} -> {:.3} (observed mean {:.3})",
            base.tire_degradation,
            effective.tire_degradation,
            observed
        );
    }

    match &summary.weather {
        Some(weather) => apply_weather(&mut effective, weather),
        None => tracing::debug!("no weather data; keeping catalog safety car and traffic values"),
    }

    effective
}

fn apply_weather(effective: &mut TrackCharacteristics, weather: &WeatherSummary) {
    let rainfall = weather.rainfall.unwrap_or(false);

    let mut probability = effective.safety_car_probability;
    let mut weather_factor = false;
    if rainfall {
        probability *= 1.5;
        weather_factor = true;
    }
    if weather.track_temp_c.is_some_and(|t| t > HOT_TRACK_TEMP_C) {
        probability *= 1.2;
        weather_factor = true;
    }

    let track_factor = match effective.track_type {
        TrackType::Street => Some(1.3),
        TrackType::HighSpeed => Some(1.1),
        TrackType::Standard | TrackType::Technical => None,
    };
    if let Some(factor) = track_factor {
        probability *= factor;
    }

    let cap = if track_factor.is_none() && weather_factor {
        WEATHER_ONLY_SAFETY_CAR_CAP
    } else {
        1.0
    };
    let adjusted = clamp_unit(probability.min(cap));
    tracing::debug!(
        "safety car probability {:.3} -> {:.3} (cap {:.1})",
        effective.safety_car_probability,
        adjusted,
        cap
    );
    effective.safety_car_probability = adjusted;

    if let Some(stability) = weather.stability_index {
        effective.track_evolution *= clamp_unit(stability);
    }

    if rainfall {
        effective.traffic_impact = clamp_unit(effective.traffic_impact * 1.2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TrackCatalog;
    use crate::compound::Compound;
    use crate::session::CompoundWear;

    fn base(id: &str) -> TrackCharacteristics {
        TrackCharacteristics::from_config(TrackCatalog::reference().get(id).unwrap())
    }

    fn wet_weather() -> WeatherSummary {
        WeatherSummary {
            rainfall: Some(true),
            track_temp_c: Some(22.0),
            stability_index: Some(0.5),
        }
    }

    #[test]
    fn empty_summary_changes_nothing() {
        let b = base("british_gp");
        assert_eq!(adjust(&b, &SessionSummary::default()), b);
    }

    #[test]
    fn blends_observed_degradation() {
        let b = base("bahrain_gp");
        let mut summary = SessionSummary::default();
        for (compound, rate) in [(Compound::Soft, 1.6), (Compound::Hard, 1.0)] {
            summary.tire_wear.insert(
                compound,
                CompoundWear {
                    degradation_rate: Some(rate),
                    ..Default::default()
                },
            );
        }
        let effective = adjust(&b, &summary);
        let expected = 0.7 * 1.3 + 0.3 * 1.25;
        assert!((effective.tire_degradation - expected).abs() < 1e-9);
    }

    #[test]
    fn rain_on_street_circuit_caps_at_one() {
        let b = base("singapore_gp");
        let summary = SessionSummary {
            weather: Some(wet_weather()),
            ..Default::default()
        };
        let effective = adjust(&b, &summary);
        assert_eq!(effective.safety_car_probability, 1.0);
        assert!((effective.traffic_impact - 1.0).abs() < 1e-9);
        assert!((effective.track_evolution - 0.009).abs() < 1e-9);
    }

    #[test]
    fn weather_only_chain_caps_at_point_eight() {
        // standard circuit, 0.45 * 1.5 * 1.2 = 0.81
        let b = base("miami_gp");
        let summary = SessionSummary {
            weather: Some(WeatherSummary {
                rainfall: Some(true),
                track_temp_c: Some(45.0),
                stability_index: None,
            }),
            ..Default::default()
        };
        let effective = adjust(&b, &summary);
        assert_eq!(effective.safety_car_probability, 0.8);
        assert_eq!(effective.track_evolution, b.track_evolution);
    }

    #[test]
    fn dry_high_speed_track_gets_track_factor() {
        let b = base("belgian_gp");
        let summary = SessionSummary {
            weather: Some(WeatherSummary {
                rainfall: Some(false),
                track_temp_c: Some(25.0),
                stability_index: None,
            }),
            ..Default::default()
        };
        let effective = adjust(&b, &summary);
        assert!((effective.safety_car_probability - 0.44).abs() < 1e-9);
        assert_eq!(effective.traffic_impact, b.traffic_impact);
    }
}
