//! Pit stop strategy engine.
//!
//! Turns a circuit's catalog entry plus a live race snapshot into a
//! recommendation: how many more stops, the lap window for each, the
//! compound to fit, and advisory notes.
//!
//! ```text
//! TrackCatalog + SessionSummary
//!     │
//!     ├──> adjuster   effective TrackCharacteristics
//!     ├──> estimator  base stop count
//!     ├──> position   race-position adjustment, max-stops clamp
//!     ├──> windows    stint split and per-stop windows (selector picks compounds)
//!     ├──> situation  fuel, wear and risk for the current set
//!     └──> rationale  advisory notes
//! ```

pub mod adjuster;
pub mod catalog;
pub mod compound;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod position;
pub mod rationale;
pub mod selector;
pub mod session;
pub mod shared;
pub mod situation;
pub mod track;
pub mod types;
pub mod windows;

pub use catalog::TrackCatalog;
pub use compound::{Compound, CompoundProfile, CompoundTable, RacePhase};
pub use engine::{EngineConfig, StrategyEngine};
pub use error::{ConfigurationError, SnapshotError};
pub use selector::CompoundPolicy;
pub use session::{CompoundWear, SessionSummary, WeatherSummary};
pub use shared::SharedEngine;
pub use situation::{RiskLevel, SituationAssessment};
pub use track::{TrackCharacteristics, TrackConfig, TrackType};
pub use types::{RaceSnapshot, StopWindow, StrategyRecommendation};
pub use windows::MarginPolicy;
