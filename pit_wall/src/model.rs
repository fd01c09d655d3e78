use anyhow::bail;
use serde::Deserialize;
use strategy_core::RaceSnapshot;

/// One message from the timing feed, sent as the car crosses the line.
#[derive(Deserialize, Debug, Clone)]
pub struct LapPacket {
    pub lap: i32,
    pub position: i32,
    #[serde(default)]
    pub compound: Option<String>,
    /// The car came through the pit lane on the lap just completed.
    #[serde(default)]
    pub pitted: bool,
}

/// Folds lap packets for one car into race snapshots.
#[derive(Debug, Default)]
pub struct RaceTracker {
    last_lap: Option<i32>,
    fitted_on_lap: i32,
    stops: Vec<i32>,
}

impl RaceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stops(&self) -> &[i32] {
        &self.stops
    }

    pub fn observe(&mut self, packet: &LapPacket) -> anyhow::Result<RaceSnapshot> {
        if let Some(last) = self.last_lap {
            if packet.lap < last {
                bail!("lap {} arrived after lap {}", packet.lap, last);
            }
        }

        if packet.pitted {
            let stop = packet.lap - 1;
            if stop >= 1 && self.stops.last().map_or(true, |s| stop > *s) {
                self.stops.push(stop);
                self.fitted_on_lap = stop;
                tracing::info!("stop {} recorded on lap {}", self.stops.len(), stop);
            } else {
                tracing::warn!("ignoring pit flag on lap {}", packet.lap);
            }
        }
        self.last_lap = Some(packet.lap);

        Ok(RaceSnapshot {
            current_lap: packet.lap,
            current_position: packet.position,
            current_compound: packet.compound.clone(),
            tire_age_laps: (packet.lap - self.fitted_on_lap).max(0),
            previous_stop_laps: self.stops.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(lap: i32, compound: &str, pitted: bool) -> LapPacket {
        LapPacket {
            lap,
            position: 6,
            compound: Some(compound.into()),
            pitted,
        }
    }

    #[test]
    fn tire_age_counts_from_start() {
        let mut tracker = RaceTracker::new();
        let snap = tracker.observe(&packet(12, "medium", false)).unwrap();
        assert_eq!(snap.tire_age_laps, 12);
        assert!(snap.previous_stop_laps.is_empty());
    }

    #[test]
    fn pit_flag_records_stop_and_resets_age() {
        let mut tracker = RaceTracker::new();
        tracker.observe(&packet(20, "medium", false)).unwrap();
        let snap = tracker.observe(&packet(22, "hard", true)).unwrap();
        assert_eq!(snap.previous_stop_laps, vec![21]);
        assert_eq!(snap.tire_age_laps, 1);
        assert_eq!(snap.current_compound.as_deref(), Some("hard"));

        let snap = tracker.observe(&packet(30, "hard", false)).unwrap();
        assert_eq!(snap.tire_age_laps, 9);
    }

    #[test]
    fn repeated_pit_flag_is_ignored() {
        let mut tracker = RaceTracker::new();
        tracker.observe(&packet(22, "hard", true)).unwrap();
        tracker.observe(&packet(22, "hard", true)).unwrap();
        assert_eq!(tracker.stops(), &[21]);
    }

    #[test]
    fn rewinding_lap_is_rejected() {
        let mut tracker = RaceTracker::new();
        tracker.observe(&packet(15, "soft", false)).unwrap();
        assert!(tracker.observe(&packet(14, "soft", false)).is_err());
    }

    #[test]
    fn pitted_defaults_to_false() {
        let p: LapPacket = serde_json::from_str(r#"{ "lap": 3, "position": 2, "compound": "soft" }"#).unwrap();
        assert!(!p.pitted);
    }
}
