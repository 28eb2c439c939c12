use crate::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle on the ground plane. Comparisons are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Rect {
    pub const fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.z >= self.min_z && p.z <= self.max_z
    }

    /// Per-axis projection into the rectangle.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.max(self.min_x).min(self.max_x),
            p.z.max(self.min_z).min(self.max_z),
        )
    }

    /// True when both spans are finite and non-inverted.
    pub fn is_well_formed(&self) -> bool {
        [self.min_x, self.max_x, self.min_z, self.max_z]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x <= self.max_x
            && self.min_z <= self.max_z
    }
}

/// World bounds plus the static obstacle footprints the agent may not enter.
///
/// The gate never steers: it only answers admissibility queries and clamps into bounds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MovementGate {
    bounds: Rect,
    obstacles: Vec<Rect>,
}

impl MovementGate {
    pub fn new(bounds: Rect, obstacles: Vec<Rect>) -> Self {
        Self { bounds, obstacles }
    }

    /// A gate with bounds and no obstacles.
    pub fn open(bounds: Rect) -> Self {
        Self::new(bounds, Vec::new())
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    pub fn in_obstacle(&self, p: Vec2) -> bool {
        self.obstacles.iter().any(|o| o.contains(p))
    }

    pub fn admissible(&self, p: Vec2) -> bool {
        self.bounds.contains(p) && !self.in_obstacle(p)
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        self.bounds.clamp(p)
    }
}
