//! Catch and miss detection
//!
//! The paddle catches an object when the object's horizontal center is inside
//! the paddle span and its bottom edge reaches the catch band. The band test is
//! swept over the distance the bottom edge travelled this tick, so a fast object
//! cannot step over the band between two ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::objects::{FallingObject, ObjectSet};
use super::scoring::{CatchScore, ComboState};
use super::state::{Paddle, PlayArea};
use crate::settings::{ComboRules, PlayfieldTuning};

/// Axis-aligned box in play area pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Strictly inside the horizontal span
    #[inline]
    pub fn spans_x(&self, x: f32) -> bool {
        x > self.min.x && x < self.max.x
    }

    /// Vertical range `[lo, hi]` overlaps the box's vertical span
    #[inline]
    pub fn overlaps_y(&self, lo: f32, hi: f32) -> bool {
        hi > self.min.y && lo <= self.max.y
    }
}

/// Where objects get caught or missed this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchZone {
    /// Paddle span horizontally, catch band vertically
    pub paddle: Aabb,
    /// Bottom edges past this line are misses
    pub miss_line: f32,
}

impl CatchZone {
    pub fn new(paddle: &Paddle, area: &PlayArea, playfield: &PlayfieldTuning) -> Self {
        let (left, right) = paddle.span_px(area);
        let band_top = area.height - playfield.catch_band_top;
        let band_bottom = area.height - playfield.catch_band_bottom;
        Self {
            paddle: Aabb::new(Vec2::new(left, band_top), Vec2::new(right, band_bottom)),
            miss_line: area.height - playfield.miss_line_offset,
        }
    }

    pub fn is_caught(&self, object: &FallingObject) -> bool {
        let travel_lo = object.prev_bottom.min(object.bottom());
        let travel_hi = object.prev_bottom.max(object.bottom());
        self.paddle.spans_x(object.center_x()) && self.paddle.overlaps_y(travel_lo, travel_hi)
    }

    pub fn is_missed(&self, object: &FallingObject) -> bool {
        object.bottom() > self.miss_line
    }
}

/// A caught object and what it scored
#[derive(Debug, Clone, PartialEq)]
pub struct Catch {
    pub object: FallingObject,
    pub score: CatchScore,
}

/// Outcome for one resolved object
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Caught(Catch),
    Missed(FallingObject),
}

/// Test every live object against the catch zone, back to front.
///
/// Caught and missed objects are removed from the set; catches update the combo.
/// Resolution stops once the misses would exhaust `lives_remaining`, leaving the
/// rest of the set untouched.
pub fn resolve(
    objects: &mut ObjectSet,
    zone: &CatchZone,
    combo: &mut ComboState,
    rules: &ComboRules,
    now_ms: f64,
    lives_remaining: u32,
) -> Vec<Resolution> {
    let mut resolutions = Vec::new();
    let mut misses = 0u32;

    for i in (0..objects.len()).rev() {
        let Some(object) = objects.get(i) else {
            continue;
        };

        if zone.is_caught(object) {
            let object = objects.remove_at(i);
            let score = combo.register_catch(now_ms, object.point_value, rules);
            resolutions.push(Resolution::Caught(Catch { object, score }));
            continue;
        }

        if zone.is_missed(object) {
            resolutions.push(Resolution::Missed(objects.remove_at(i)));
            misses += 1;
            if misses >= lives_remaining {
                break;
            }
        }
    }

    resolutions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::objects::ColorTag;

    fn setup() -> (PlayArea, Paddle, Settings) {
        let settings = Settings::default();
        let area = PlayArea::new(400.0, 600.0);
        let paddle = Paddle::new(&area, &settings.playfield, 10.0);
        (area, paddle, settings)
    }

    /// Object whose bottom edge sits at `bottom`, centered at `center_x`
    fn object_at(id: u32, center_x: f32, bottom: f32) -> FallingObject {
        let size = Vec2::new(30.0, 40.0);
        FallingObject::new(
            id,
            Vec2::new(center_x - 15.0, bottom - 40.0),
            size,
            1.0,
            ColorTag::Blue,
        )
    }

    #[test]
    fn test_zone_geometry() {
        let (area, paddle, settings) = setup();
        let zone = CatchZone::new(&paddle, &area, &settings.playfield);
        // 80px paddle centered in 400px
        assert_eq!(zone.paddle.min, Vec2::new(160.0, 530.0));
        assert_eq!(zone.paddle.max, Vec2::new(240.0, 550.0));
        assert_eq!(zone.miss_line, 550.0);
    }

    #[test]
    fn test_catch_requires_center_inside_span() {
        let (area, paddle, settings) = setup();
        let zone = CatchZone::new(&paddle, &area, &settings.playfield);

        assert!(zone.is_caught(&object_at(1, 200.0, 540.0)));
        assert!(zone.is_caught(&object_at(2, 161.0, 540.0)));
        // Edge of the span is not inside
        assert!(!zone.is_caught(&object_at(3, 160.0, 540.0)));
        assert!(!zone.is_caught(&object_at(4, 300.0, 540.0)));
        // Above the band
        assert!(!zone.is_caught(&object_at(5, 200.0, 500.0)));
    }

    #[test]
    fn test_swept_catch() {
        let (area, paddle, settings) = setup();
        let zone = CatchZone::new(&paddle, &area, &settings.playfield);

        // Jumped from above the band to below the miss line in one tick
        let mut object = object_at(1, 200.0, 560.0);
        object.prev_bottom = 520.0;
        assert!(zone.is_caught(&object));
        assert!(zone.is_missed(&object));
    }

    #[test]
    fn test_resolve_catch_and_miss() {
        let (area, paddle, settings) = setup();
        let zone = CatchZone::new(&paddle, &area, &settings.playfield);
        let mut objects = ObjectSet::new();
        objects.push(object_at(1, 200.0, 540.0)); // caught
        objects.push(object_at(2, 50.0, 560.0)); // missed
        objects.push(object_at(3, 50.0, 100.0)); // still falling

        let mut combo = ComboState::new();
        let out = resolve(&mut objects, &zone, &mut combo, &settings.combo, 1000.0, 10);

        assert_eq!(out.len(), 2);
        // Back to front: id 2 first, then id 1
        assert!(matches!(&out[0], Resolution::Missed(o) if o.id == 2));
        match &out[1] {
            Resolution::Caught(c) => {
                assert_eq!(c.object.id, 1);
                assert_eq!(c.score.points, 2);
            }
            other => panic!("expected catch, got {:?}", other),
        }
        assert_eq!(objects.ids(), vec![3]);
        assert_eq!(combo.consecutive_catches, 1);
    }

    #[test]
    fn test_resolve_stops_when_lives_exhausted() {
        let (area, paddle, settings) = setup();
        let zone = CatchZone::new(&paddle, &area, &settings.playfield);
        let mut objects = ObjectSet::new();
        for id in 1..=3 {
            objects.push(object_at(id, 50.0, 580.0));
        }

        let mut combo = ComboState::new();
        let out = resolve(&mut objects, &zone, &mut combo, &settings.combo, 0.0, 2);

        assert_eq!(out.len(), 2);
        assert_eq!(objects.ids(), vec![1]);
    }
}
