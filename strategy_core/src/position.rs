use crate::estimator::step;

/// Perturb the base stop count for race position and traffic, then clamp to
/// the stops still permitted on this circuit.
pub fn adjust_for_position(
    base_stops: i32,
    position: i32,
    traffic_impact: f64,
    overtaking_difficulty: f64,
    max_remaining_stops: i32,
) -> i32 {
    let mut stops = step(base_stops.max(0), traffic_impact, 0.6, 0.4);
    stops = step(stops, overtaking_difficulty, 0.7, 0.5);

    // running in the pack favours an extra stop, the front runners protect position
    if position > 10 {
        stops += 1;
    } else if position < 5 {
        stops = (stops - 1).max(0);
    }

    let clamped = stops.clamp(0, max_remaining_stops.max(0));
    tracing::debug!(
        "position P{} adjusts {} -> {} stops (limit {})",
        position,
        base_stops,
        clamped,
        max_remaining_stops
    );
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midfield_in_neutral_conditions_is_unchanged() {
        assert_eq!(adjust_for_position(2, 7, 0.5, 0.6, 3), 2);
    }

    #[test]
    fn back_markers_in_traffic_stop_more() {
        assert_eq!(adjust_for_position(1, 15, 0.8, 0.8, 5), 4);
    }

    #[test]
    fn leaders_on_open_tracks_stop_less() {
        assert_eq!(adjust_for_position(2, 1, 0.3, 0.4, 3), 0);
    }

    #[test]
    fn clamped_to_remaining_allowance() {
        assert_eq!(adjust_for_position(3, 15, 0.8, 0.8, 1), 1);
        assert_eq!(adjust_for_position(3, 15, 0.8, 0.8, -2), 0);
    }
}
