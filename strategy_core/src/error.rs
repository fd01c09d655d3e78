use std::path::PathBuf;
use thiserror::Error;

/// Problems with the static catalogs or engine configuration. Fatal to
/// engine construction.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("unknown track: {0}")]
    UnknownTrack(String),

    #[error("track {track}: race laps must be positive, got {laps}")]
    InvalidRaceLaps { track: String, laps: i32 },

    #[error("track {track}: invalid {field} ({reason})")]
    InvalidField {
        track: String,
        field: &'static str,
        reason: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A race snapshot that cannot be evaluated. Rejected before any work.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("current lap must be non-negative, got {0}")]
    NegativeLap(i32),

    #[error("position must be between 1 and 20, got {0}")]
    PositionOutOfRange(i32),

    #[error("tire age must be non-negative, got {0}")]
    NegativeTireAge(i32),

    #[error("previous stop on lap {stop} is not before current lap {current}")]
    StopNotBeforeCurrentLap { stop: i32, current: i32 },

    #[error("previous stop on lap {0} is before the race start")]
    StopBeforeRaceStart(i32),

    #[error("previous stops must be strictly ascending")]
    StopsNotAscending,

    #[error("unknown compound: {0}")]
    UnknownCompound(String),
}
