//! Area and fist debouncing
//!
//! Each area id has its own cooldown channel; fist closure shares one
//! global channel. Channels expire on their own and are never reset. A
//! pointer held inside an area re-triggers once per cooldown window: there
//! is no rising-edge requirement here (see [`super::raise`] for that).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::classifier::HandSignal;
use super::{GestureArea, GestureEvent, default_areas};

/// Mapper configuration; fixed for the lifetime of a mapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub areas: Vec<GestureArea>,
    /// Minimum time between two triggers of the same area
    pub area_cooldown_ms: f64,
    /// Minimum time between two fist triggers
    pub fist_cooldown_ms: f64,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            areas: default_areas(),
            area_cooldown_ms: 600.0,
            fist_cooldown_ms: 800.0,
        }
    }
}

/// Stateful converter from hand signals to rate-limited events
#[derive(Debug, Clone)]
pub struct GestureEventMapper {
    config: MapperConfig,
    /// Last trigger time per area id
    area_triggers: HashMap<String, f64>,
    last_fist: Option<f64>,
}

impl GestureEventMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            area_triggers: HashMap::new(),
            last_fist: None,
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Evaluate one frame's signals at time `now_ms`.
    ///
    /// Events come out in discovery order (hand, then area); callers should
    /// treat them as a set.
    pub fn process(&mut self, signals: &[HandSignal], now_ms: f64) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        for pointer in signals.iter().filter_map(|s| s.pointer) {
            for area in &self.config.areas {
                if !area.contains(pointer.x, pointer.y) {
                    continue;
                }
                let ready = self
                    .area_triggers
                    .get(&area.id)
                    .is_none_or(|last| now_ms - last >= self.config.area_cooldown_ms);
                if ready {
                    self.area_triggers.insert(area.id.clone(), now_ms);
                    log::debug!("Gesture area covered: {}", area.id);
                    events.push(GestureEvent::AreaCovered(area.id.clone()));
                }
            }
        }

        if signals.iter().any(|s| s.fist_closed) {
            let ready = self
                .last_fist
                .is_none_or(|last| now_ms - last >= self.config.fist_cooldown_ms);
            if ready {
                self.last_fist = Some(now_ms);
                log::debug!("Fist closed");
                events.push(GestureEvent::FistClosed);
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn pointer(x: f32, y: f32) -> HandSignal {
        HandSignal {
            pointer: Some(Vec2::new(x, y)),
            fist_closed: false,
        }
    }

    fn fist() -> HandSignal {
        HandSignal {
            pointer: None,
            fist_closed: true,
        }
    }

    fn mapper() -> GestureEventMapper {
        GestureEventMapper::new(MapperConfig {
            areas: vec![
                GestureArea::new("left", 0.0, 0.0, 0.5, 1.0),
                GestureArea::new("right", 0.5, 0.0, 0.5, 1.0),
                GestureArea::new("top", 0.0, 0.0, 1.0, 0.25),
            ],
            ..Default::default()
        })
    }

    fn covered(id: &str) -> GestureEvent {
        GestureEvent::AreaCovered(id.to_string())
    }

    #[test]
    fn test_first_hit_triggers_immediately() {
        let mut m = mapper();
        assert_eq!(m.process(&[pointer(0.2, 0.5)], 0.0), vec![covered("left")]);
    }

    #[test]
    fn test_held_pointer_retriggers_each_cooldown() {
        let mut m = mapper();
        let mut hits = Vec::new();
        // 60 fps for two seconds
        for frame in 0..120 {
            let now = frame as f64 * 1000.0 / 60.0;
            if !m.process(&[pointer(0.2, 0.5)], now).is_empty() {
                hits.push(now);
            }
        }
        assert_eq!(hits.len(), 4);
        for pair in hits.windows(2) {
            assert!(pair[1] - pair[0] >= 600.0);
        }
    }

    #[test]
    fn test_cooldown_boundary_is_inclusive() {
        let mut m = mapper();
        assert_eq!(m.process(&[pointer(0.2, 0.5)], 1000.0).len(), 1);
        assert!(m.process(&[pointer(0.2, 0.5)], 1599.0).is_empty());
        assert_eq!(m.process(&[pointer(0.2, 0.5)], 1600.0).len(), 1);
    }

    #[test]
    fn test_areas_have_independent_channels() {
        let mut m = mapper();
        let left = m.process(&[pointer(0.2, 0.5)], 0.0);
        let right = m.process(&[pointer(0.7, 0.5)], 10.0);
        assert_eq!(left, vec![covered("left")]);
        assert_eq!(right, vec![covered("right")]);
    }

    #[test]
    fn test_overlapping_areas_fire_in_config_order() {
        let mut m = mapper();
        let events = m.process(&[pointer(0.1, 0.1)], 0.0);
        assert_eq!(events, vec![covered("left"), covered("top")]);
    }

    #[test]
    fn test_two_hands_in_same_area_fire_once() {
        let mut m = mapper();
        let events = m.process(&[pointer(0.1, 0.5), pointer(0.3, 0.5)], 0.0);
        assert_eq!(events, vec![covered("left")]);
    }

    #[test]
    fn test_two_hands_discovery_order() {
        let mut m = mapper();
        let events = m.process(&[pointer(0.7, 0.5), pointer(0.1, 0.5)], 0.0);
        assert_eq!(events, vec![covered("right"), covered("left")]);
    }

    #[test]
    fn test_edge_point_hits_only_right_tile() {
        let mut m = mapper();
        assert_eq!(m.process(&[pointer(0.5, 0.5)], 0.0), vec![covered("right")]);
    }

    #[test]
    fn test_fist_channel_is_global() {
        let mut m = mapper();
        let both = m.process(&[fist(), fist()], 0.0);
        assert_eq!(both, vec![GestureEvent::FistClosed]);
        assert!(m.process(&[fist()], 799.0).is_empty());
        assert_eq!(m.process(&[fist()], 800.0), vec![GestureEvent::FistClosed]);
    }

    #[test]
    fn test_fist_after_area_events() {
        let mut m = mapper();
        let signal = HandSignal {
            pointer: Some(Vec2::new(0.7, 0.5)),
            fist_closed: true,
        };
        assert_eq!(
            m.process(&[signal], 0.0),
            vec![covered("right"), GestureEvent::FistClosed]
        );
    }

    #[test]
    fn test_no_signals_no_events() {
        let mut m = mapper();
        assert!(m.process(&[], 0.0).is_empty());
        assert!(m.process(&[HandSignal::default()], 0.0).is_empty());
    }

    proptest! {
        #[test]
        fn prop_at_most_one_trigger_per_window(
            gaps in proptest::collection::vec(1.0f64..50.0, 1..300),
        ) {
            let mut m = mapper();
            let mut now = 0.0;
            let mut last_left: Option<f64> = None;
            let mut last_fist: Option<f64> = None;
            for gap in gaps {
                now += gap;
                let signal = HandSignal {
                    pointer: Some(Vec2::new(0.2, 0.5)),
                    fist_closed: true,
                };
                for event in m.process(&[signal], now) {
                    match event {
                        GestureEvent::AreaCovered(id) if id == "left" => {
                            if let Some(prev) = last_left {
                                prop_assert!(now - prev >= 600.0);
                            }
                            last_left = Some(now);
                        }
                        GestureEvent::FistClosed => {
                            if let Some(prev) = last_fist {
                                prop_assert!(now - prev >= 800.0);
                            }
                            last_fist = Some(now);
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}
