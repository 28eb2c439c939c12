use crate::{PathState, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Everything the controller mutates for one agent.
///
/// Created by [`crate::RoamController::attach`], passed by `&mut` into every tick, dropped on
/// detach.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentState {
    pub position: Vec3,
    /// Yaw in degrees; continuous, never wrapped.
    pub heading_deg: f32,
    pub path: PathState,
    /// Procedural-stride speed in m/s.
    pub current_speed: f32,
    /// True when the agent translated during the last tick.
    pub moving: bool,
    /// Authored height above the ground, captured once at attach.
    pub ground_offset: f32,
}

impl AgentState {
    pub fn new(position: Vec3, heading_deg: f32, path: PathState, ground_level: f32) -> Self {
        Self {
            position,
            heading_deg,
            path,
            current_speed: 0.0,
            moving: false,
            ground_offset: position.y - ground_level,
        }
    }

    pub fn waypoint_index(&self) -> usize {
        self.path.index()
    }
}
