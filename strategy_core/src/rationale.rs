use crate::compound::CompoundProfile;
use crate::track::{TrackCharacteristics, TrackType};

pub struct RationaleInputs<'a> {
    pub effective: &'a TrackCharacteristics,
    pub remaining_laps: i32,
    pub current: Option<&'a CompoundProfile>,
    pub tire_age_laps: i32,
    pub recommended_stops: u32,
    /// The estimate exceeded the stops still allowed on this circuit.
    pub capped_by_max_stops: bool,
}

/// Advisory notes. Order is fixed; no applicable condition yields an empty list.
pub fn generate_rationale(inputs: &RationaleInputs<'_>) -> Vec<String> {
    let effective = inputs.effective;
    let mut notes: Vec<&str> = Vec::new();

    match effective.track_type {
        TrackType::Street => notes.push("track position is crucial"),
        TrackType::HighSpeed => {
            notes.push("look for undercut opportunities");
            notes.push("be aggressive in overtaking zones");
        }
        TrackType::Standard | TrackType::Technical => {}
    }

    if matches!(effective.track_type, TrackType::HighSpeed | TrackType::Technical) {
        notes.push("manage tires in high-load corners");
    }

    if effective.safety_car_probability >= 0.4 {
        notes.push("keep gaps under 20s for safety car");
    }

    if effective.difficult_overtaking() && inputs.remaining_laps > 10 {
        notes.push("difficult overtaking - protect track position");
    }

    if let Some(profile) = inputs.current {
        let age = inputs.tire_age_laps as f64;
        if age >= 0.8 * profile.max_life_laps {
            notes.push("current tires beyond critical age");
        } else if age >= 0.6 * profile.max_life_laps {
            notes.push("current tires nearing critical age");
        }

        let life_left = profile.max_life_laps - age;
        if inputs.recommended_stops == 0 && life_left >= inputs.remaining_laps as f64 {
            notes.push("consider running to the end on current tires");
        }
    }

    if inputs.capped_by_max_stops {
        notes.push("stop count capped by circuit maximum");
    }

    notes.into_iter().map(String::from).collect()
}
