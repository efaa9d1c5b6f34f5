//! Falling objects and the live object set

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::NOMINAL_FRAME_MS;

/// Balloon color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
    /// Reserved for special objects
    Rainbow,
}

impl ColorTag {
    pub const CLASSIC_PALETTE: [ColorTag; 6] = [
        ColorTag::Red,
        ColorTag::Blue,
        ColorTag::Green,
        ColorTag::Yellow,
        ColorTag::Purple,
        ColorTag::Orange,
    ];

    pub const FESTIVAL_PALETTE: [ColorTag; 7] = [
        ColorTag::Red,
        ColorTag::Blue,
        ColorTag::Green,
        ColorTag::Yellow,
        ColorTag::Purple,
        ColorTag::Orange,
        ColorTag::Pink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTag::Red => "red",
            ColorTag::Blue => "blue",
            ColorTag::Green => "green",
            ColorTag::Yellow => "yellow",
            ColorTag::Purple => "purple",
            ColorTag::Orange => "orange",
            ColorTag::Pink => "pink",
            ColorTag::Rainbow => "rainbow",
        }
    }
}

/// A single falling object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    /// Top-left corner in pixels
    pub pos: Vec2,
    /// Width and height in pixels
    pub size: Vec2,
    /// Pixels per nominal frame
    pub fall_speed: f32,
    pub color: ColorTag,
    pub point_value: u32,
    pub is_special: bool,
    /// Bottom edge before the latest advance (for swept catch tests)
    pub prev_bottom: f32,
}

impl FallingObject {
    pub fn new(id: u32, pos: Vec2, size: Vec2, fall_speed: f32, color: ColorTag) -> Self {
        Self {
            id,
            pos,
            size,
            fall_speed,
            color,
            point_value: 1,
            is_special: false,
            prev_bottom: pos.y + size.y,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Move down by `fall_speed` scaled to the elapsed time
    pub fn advance(&mut self, delta_ms: f64) {
        self.prev_bottom = self.bottom();
        self.pos.y += self.fall_speed * (delta_ms / NOMINAL_FRAME_MS) as f32;
    }
}

/// The live set of in-flight objects, in spawn order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectSet {
    objects: Vec<FallingObject>,
}

impl ObjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: FallingObject) {
        self.objects.push(object);
    }

    /// Advance every live object by `delta_ms`
    pub fn advance(&mut self, delta_ms: f64) {
        for object in &mut self.objects {
            object.advance(delta_ms);
        }
    }

    /// Remove the object at `index` preserving order
    pub fn remove_at(&mut self, index: usize) -> FallingObject {
        self.objects.remove(index)
    }

    /// Extract every object matching `predicate`, keeping spawn order on both sides
    pub fn remove_if(
        &mut self,
        mut predicate: impl FnMut(&FallingObject) -> bool,
    ) -> Vec<FallingObject> {
        let (removed, kept) = std::mem::take(&mut self.objects)
            .into_iter()
            .partition(|o| predicate(o));
        self.objects = kept;
        removed
    }

    pub fn get(&self, index: usize) -> Option<&FallingObject> {
        self.objects.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FallingObject> {
        self.objects.iter()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.objects.iter().map(|o| o.id).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

impl<'a> IntoIterator for &'a ObjectSet {
    type Item = &'a FallingObject;
    type IntoIter = std::slice::Iter<'a, FallingObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}
