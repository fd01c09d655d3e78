use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigurationError;
use crate::track::{TrackConfig, TrackType};

/// Static per-circuit configuration, keyed by lowercase circuit id.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackCatalog {
    tracks: BTreeMap<String, TrackConfig>,
}

#[derive(Deserialize)]
struct CatalogFile {
    tracks: Vec<TrackConfig>,
}

// Common names people type for a circuit.
const ALIASES: &[(&str, &str)] = &[
    ("australia", "australian_gp"),
    ("melbourne", "australian_gp"),
    ("china", "chinese_gp"),
    ("shanghai", "chinese_gp"),
    ("japan", "japanese_gp"),
    ("suzuka", "japanese_gp"),
    ("bahrain", "bahrain_gp"),
    ("saudi", "saudi_arabia_gp"),
    ("saudi arabia", "saudi_arabia_gp"),
    ("jeddah", "saudi_arabia_gp"),
    ("miami", "miami_gp"),
    ("emilia", "emilia_romagna_gp"),
    ("imola", "emilia_romagna_gp"),
    ("monaco", "monaco_gp"),
    ("monte carlo", "monaco_gp"),
    ("spain", "spanish_gp"),
    ("barcelona", "spanish_gp"),
    ("canada", "canadian_gp"),
    ("montreal", "canadian_gp"),
    ("austria", "austrian_gp"),
    ("britain", "british_gp"),
    ("great britain", "british_gp"),
    ("silverstone", "british_gp"),
    ("belgium", "belgian_gp"),
    ("spa", "belgian_gp"),
    ("hungary", "hungarian_gp"),
    ("netherlands", "dutch_gp"),
    ("zandvoort", "dutch_gp"),
    ("italy", "italian_gp"),
    ("monza", "italian_gp"),
    ("azerbaijan", "azerbaijan_gp"),
    ("baku", "azerbaijan_gp"),
    ("singapore", "singapore_gp"),
    ("marina bay", "singapore_gp"),
    ("united states", "united_states_gp"),
    ("usa", "united_states_gp"),
    ("cota", "united_states_gp"),
    ("mexico", "mexican_gp"),
    ("brazil", "brazilian_gp"),
    ("interlagos", "brazilian_gp"),
    ("las vegas", "las_vegas_gp"),
    ("qatar", "qatar_gp"),
    ("losail", "qatar_gp"),
    ("abu dhabi", "abu_dhabi_gp"),
    ("yas marina", "abu_dhabi_gp"),
];

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    name: &str,
    track_length: f64,
    track_type: TrackType,
    race_laps: i32,
    pit_loss_time: f64,
    max_stops: i32,
    difficult_overtaking: bool,
    tire_degradation: f64,
    track_evolution: f64,
    safety_car_probability: f64,
    traffic_impact: f64,
    pit_window_margin: i32,
) -> TrackConfig {
    TrackConfig {
        id: id.to_string(),
        name: name.to_string(),
        track_length,
        track_type,
        race_laps,
        pit_loss_time,
        max_stops,
        difficult_overtaking,
        tire_degradation,
        track_evolution,
        safety_car_probability,
        traffic_impact,
        pit_window_margin,
    }
}

impl TrackCatalog {
    /// Built-in 2024 calendar.
    #[rustfmt::skip]
    pub fn reference() -> Self {
        use TrackType::*;
        let tracks = vec![
            entry("australian_gp", "Australian Grand Prix", 5.278, Standard, 58, 21.5, 2, false, 1.0, 0.013, 0.3, 0.5, 4),
            entry("chinese_gp", "Chinese Grand Prix", 5.451, Technical, 56, 21.5, 3, false, 1.28, 0.013, 0.35, 0.5, 4),
            entry("japanese_gp", "Japanese Grand Prix", 5.807, Technical, 53, 21.5, 2, true, 1.2, 0.014, 0.4, 0.6, 4),
            entry("bahrain_gp", "Bahrain Grand Prix", 5.412, Standard, 57, 21.0, 3, false, 1.25, 0.015, 0.25, 0.4, 4),
            entry("saudi_arabia_gp", "Saudi Arabian Grand Prix", 6.174, Street, 50, 22.5, 2, true, 1.15, 0.016, 0.65, 0.6, 4),
            entry("miami_gp", "Miami Grand Prix", 5.412, Standard, 57, 21.5, 2, false, 1.18, 0.017, 0.45, 0.5, 4),
            entry("emilia_romagna_gp", "Emilia Romagna Grand Prix", 4.909, Technical, 63, 22.0, 2, true, 1.2, 0.012, 0.5, 0.7, 4),
            entry("monaco_gp", "Monaco Grand Prix", 3.337, Street, 78, 23.5, 1, true, 0.8, 0.003, 0.6, 0.8, 2),
            entry("spanish_gp", "Spanish Grand Prix", 4.675, Technical, 66, 21.5, 3, true, 1.22, 0.012, 0.2, 0.7, 4),
            entry("canadian_gp", "Canadian Grand Prix", 4.361, Street, 70, 22.0, 2, false, 1.2, 0.014, 0.5, 0.6, 4),
            entry("austrian_gp", "Austrian Grand Prix", 4.318, Standard, 71, 20.5, 2, false, 1.15, 0.011, 0.25, 0.3, 4),
            entry("british_gp", "British Grand Prix", 5.891, HighSpeed, 52, 22.0, 2, false, 1.25, 0.015, 0.35, 0.4, 5),
            entry("belgian_gp", "Belgian Grand Prix", 7.004, HighSpeed, 44, 18.5, 3, false, 1.2, 0.012, 0.4, 0.4, 5),
            entry("hungarian_gp", "Hungarian Grand Prix", 4.381, Technical, 70, 22.0, 2, true, 1.2, 0.015, 0.3, 0.8, 4),
            entry("dutch_gp", "Dutch Grand Prix", 4.259, Technical, 72, 22.0, 2, true, 1.25, 0.013, 0.4, 0.7, 4),
            entry("italian_gp", "Italian Grand Prix", 5.793, HighSpeed, 53, 21.0, 2, false, 1.3, 0.008, 0.3, 0.3, 5),
            entry("azerbaijan_gp", "Azerbaijan Grand Prix", 6.003, Street, 51, 22.5, 2, false, 1.0, 0.017, 0.7, 0.75, 3),
            entry("singapore_gp", "Singapore Grand Prix", 4.940, Street, 61, 23.0, 2, true, 1.1, 0.018, 0.8, 0.9, 3),
            entry("united_states_gp", "United States Grand Prix", 5.513, Standard, 56, 21.5, 2, false, 1.15, 0.014, 0.35, 0.5, 4),
            entry("mexican_gp", "Mexican Grand Prix", 4.304, Standard, 71, 22.0, 2, false, 1.1, 0.012, 0.3, 0.6, 4),
            entry("brazilian_gp", "Brazilian Grand Prix", 4.309, Technical, 71, 21.5, 2, false, 1.18, 0.016, 0.45, 0.5, 4),
            entry("las_vegas_gp", "Las Vegas Grand Prix", 6.201, Street, 50, 22.0, 2, false, 1.1, 0.02, 0.55, 0.4, 4),
            entry("qatar_gp", "Qatar Grand Prix", 5.419, HighSpeed, 57, 21.5, 3, false, 1.35, 0.015, 0.3, 0.5, 4),
            entry("abu_dhabi_gp", "Abu Dhabi Grand Prix", 5.281, Technical, 55, 22.0, 2, false, 1.05, 0.01, 0.25, 0.6, 4),
        ];
        Self {
            tracks: tracks.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    /// Build a catalog from explicit entries, validating each one.
    pub fn from_tracks(tracks: Vec<TrackConfig>) -> Result<Self, ConfigurationError> {
        let mut map = BTreeMap::new();
        for mut track in tracks {
            track.id = track.id.trim().to_lowercase();
            track.validate()?;
            if map.contains_key(&track.id) {
                return Err(ConfigurationError::InvalidField {
                    track: track.id.clone(),
                    field: "id",
                    reason: "duplicate entry".into(),
                });
            }
            map.insert(track.id.clone(), track);
        }
        Ok(Self { tracks: map })
    }

    /// Load a catalog from a JSON file of the form `{ "tracks": [ ... ] }`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: CatalogFile =
            serde_json::from_str(&data).map_err(|source| ConfigurationError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog = Self::from_tracks(file.tracks)?;
        tracing::info!("loaded {} tracks from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }

    /// Exact lookup by circuit id.
    pub fn get(&self, id: &str) -> Result<&TrackConfig, ConfigurationError> {
        self.tracks
            .get(id)
            .ok_or_else(|| ConfigurationError::UnknownTrack(id.to_string()))
    }

    /// Lookup by id, common alias, display name, or id written with spaces.
    pub fn resolve(&self, input: &str) -> Result<&TrackConfig, ConfigurationError> {
        let key = input.trim().to_lowercase();
        if let Some(track) = self.tracks.get(&key) {
            return Ok(track);
        }
        if let Some((_, id)) = ALIASES.iter().find(|(alias, _)| *alias == key) {
            if let Some(track) = self.tracks.get(*id) {
                return Ok(track);
            }
        }
        self.tracks
            .values()
            .find(|t| t.name.to_lowercase() == key || t.id.replace('_', " ") == key)
            .ok_or_else(|| ConfigurationError::UnknownTrack(input.to_string()))
    }
}

impl Default for TrackCatalog {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_entries_are_valid() {
        let catalog = TrackCatalog::reference();
        assert_eq!(catalog.len(), 24);
        for id in catalog.ids() {
            catalog.get(id).unwrap().validate().unwrap();
        }
    }

    #[test]
    fn resolves_aliases_and_names() {
        let catalog = TrackCatalog::reference();
        assert_eq!(catalog.resolve("Monte Carlo").unwrap().id, "monaco_gp");
        assert_eq!(catalog.resolve("spa").unwrap().id, "belgian_gp");
        assert_eq!(catalog.resolve("Italian Grand Prix").unwrap().id, "italian_gp");
        assert_eq!(catalog.resolve("abu dhabi gp").unwrap().id, "abu_dhabi_gp");
        assert!(matches!(
            catalog.resolve("nonexistent_gp"),
            Err(ConfigurationError::UnknownTrack(_))
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let a = TrackConfig::generic("test_gp");
        let b = TrackConfig::generic("TEST_GP");
        assert!(TrackCatalog::from_tracks(vec![a, b]).is_err());
    }
}
