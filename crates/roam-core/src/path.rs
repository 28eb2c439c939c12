use crate::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An authored ground-plane point the agent travels toward in sequence.
pub type Waypoint = Vec2;

/// The default loop walked when no explicit path is configured.
pub const DEFAULT_LOOP: [Waypoint; 9] = [
    Vec2::new(2.0, 7.0),
    Vec2::new(3.5, 7.5),
    Vec2::new(4.0, 7.0),
    Vec2::new(3.0, 6.5),
    Vec2::new(1.5, 6.8),
    Vec2::new(0.0, 7.2),
    Vec2::new(-1.0, 7.0),
    Vec2::new(0.5, 7.5),
    Vec2::new(2.0, 7.0),
];

/// Ordered waypoint list plus the index of the waypoint the agent last left.
///
/// The *target* is always the waypoint after `index` (cyclically). Paths shorter than two points
/// are not traversable: [`PathState::current_target`] returns `None` and [`PathState::advance`]
/// is a no-op.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathState {
    waypoints: Vec<Waypoint>,
    index: usize,
}

impl PathState {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            waypoints,
            index: 0,
        }
    }

    /// The built-in loop used when a configuration leaves its path empty.
    pub fn default_loop() -> Self {
        Self::new(DEFAULT_LOOP.to_vec())
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_traversable(&self) -> bool {
        self.waypoints.len() >= 2
    }

    pub fn start(&self) -> Option<Waypoint> {
        self.waypoints.first().copied()
    }

    pub fn current_target(&self) -> Option<Waypoint> {
        if !self.is_traversable() {
            return None;
        }
        let len = self.waypoints.len();
        Some(self.waypoints[(self.index + 1) % len])
    }

    pub fn advance(&mut self) {
        if !self.is_traversable() {
            return;
        }
        self.index = (self.index + 1) % self.waypoints.len();
    }
}

impl Default for PathState {
    fn default() -> Self {
        Self::default_loop()
    }
}
