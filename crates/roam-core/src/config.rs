//! Agent configuration and scene description.

use thiserror::Error;

use crate::{MovementGate, PathState, Rect, Waypoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Thresholds of the locomotion model.
///
/// Defaults are the values the roaming pet was tuned with; override them per agent only when a
/// model's proportions differ a lot.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LocomotionTuning {
    /// Maximum |heading difference| (degrees) at which the agent still counts as aligned.
    pub align_threshold_deg: f32,
    /// Procedural mode: distance at which the current waypoint counts as reached.
    pub stop_distance: f32,
    /// Procedural mode: length of the braking ramp ahead of `stop_distance`.
    pub brake_distance: f32,
    /// Root-motion mode: distance at which the current waypoint counts as reached.
    pub root_arrival_distance: f32,
    /// Speed cap as a multiple of the cruising speed.
    pub speed_headroom: f32,
    /// Upper bound on a single tick's delta time, in seconds.
    pub max_dt: f32,
    /// Speeds above this mark the agent as moving.
    pub moving_speed_epsilon: f32,
    /// Clip duration assumed when no animation clip is playing.
    pub fallback_clip_duration: f32,
}

impl Default for LocomotionTuning {
    fn default() -> Self {
        Self {
            align_threshold_deg: 38.0,
            stop_distance: 1.2,
            brake_distance: 0.8,
            root_arrival_distance: 0.6,
            speed_headroom: 1.05,
            max_dt: 0.1,
            moving_speed_epsilon: 0.01,
            fallback_clip_duration: 1.0,
        }
    }
}

/// Per-agent roaming configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoamConfig {
    /// Base speed (m/s), used when the playing clip has no usable duration.
    pub speed: f32,
    /// Waypoint loop. Empty selects the built-in default loop.
    pub path: Vec<Waypoint>,
    /// Observer gaze radius; zero disables gazing.
    pub proximity: f32,
    /// Turn rate in degrees per second.
    pub turn_rate_deg: f32,
    /// Playback rate while idle.
    pub idle_time_scale: f32,
    /// Playback rate while moving.
    pub move_time_scale: f32,
    /// Ground distance covered by one locomotion cycle (m).
    pub stride: f32,
    /// Speed blend rate (1/s).
    pub accel_rate: f32,
    pub tuning: LocomotionTuning,
}

impl Default for RoamConfig {
    fn default() -> Self {
        Self {
            speed: 0.7,
            path: Vec::new(),
            proximity: 5.0,
            turn_rate_deg: 220.0,
            idle_time_scale: 0.2,
            move_time_scale: 1.0,
            stride: 0.45,
            accel_rate: 3.5,
            tuning: LocomotionTuning::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{field}` must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("waypoint {index} is not finite")]
    BadWaypoint { index: usize },

    #[error("path has {len} waypoint(s); at least 2 are needed to roam")]
    PathTooShort { len: usize },
}

impl RoamConfig {
    /// The path the controller will walk: the configured one, or the default loop when empty.
    pub fn path_state(&self) -> PathState {
        if self.path.is_empty() {
            PathState::default_loop()
        } else {
            PathState::new(self.path.clone())
        }
    }

    /// Strict validation for authored configuration files.
    ///
    /// The controller itself never rejects a configuration; it falls back to inert or safe
    /// behavior instead. Tooling uses this to surface mistakes early.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("speed", self.speed),
            ("proximity", self.proximity),
            ("turn_rate_deg", self.turn_rate_deg),
            ("idle_time_scale", self.idle_time_scale),
            ("move_time_scale", self.move_time_scale),
            ("stride", self.stride),
            ("accel_rate", self.accel_rate),
            ("tuning.align_threshold_deg", self.tuning.align_threshold_deg),
            ("tuning.stop_distance", self.tuning.stop_distance),
            ("tuning.root_arrival_distance", self.tuning.root_arrival_distance),
            ("tuning.moving_speed_epsilon", self.tuning.moving_speed_epsilon),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let positive = [
            ("tuning.brake_distance", self.tuning.brake_distance),
            ("tuning.speed_headroom", self.tuning.speed_headroom),
            ("tuning.max_dt", self.tuning.max_dt),
            ("tuning.fallback_clip_duration", self.tuning.fallback_clip_duration),
        ];
        for (field, value) in positive {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if let Some(index) = self.path.iter().position(|p| !p.is_finite()) {
            return Err(ConfigError::BadWaypoint { index });
        }
        if self.path.len() == 1 {
            return Err(ConfigError::PathTooShort { len: 1 });
        }
        Ok(())
    }
}

/// Static scene layout: ground height, world bounds, and obstacle footprints.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Scene {
    pub ground_level: f32,
    pub bounds: Rect,
    pub obstacles: Vec<Rect>,
}

impl Default for Scene {
    /// The villa courtyard: house, pool, and the car parked in front of the house.
    fn default() -> Self {
        Self {
            ground_level: 0.0,
            bounds: Rect::new(-7.5, 17.5, -7.5, 13.5),
            obstacles: vec![
                Rect::new(-6.5, 6.5, -5.5, 5.5),
                Rect::new(7.0, 13.0, -2.5, 2.5),
                Rect::new(-2.2, 2.2, 6.4, 8.6),
            ],
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("ground level must be finite")]
    BadGroundLevel,

    #[error("world bounds are inverted or not finite: {0:?}")]
    BadBounds(Rect),

    #[error("obstacle {index} is inverted or not finite: {rect:?}")]
    BadObstacle { index: usize, rect: Rect },

    #[error("waypoint {index} ({x}, {z}) lies outside the world bounds")]
    WaypointOutOfBounds { index: usize, x: f32, z: f32 },

    #[error("waypoint {index} ({x}, {z}) lies inside obstacle {obstacle}")]
    WaypointInObstacle {
        index: usize,
        x: f32,
        z: f32,
        obstacle: usize,
    },
}

impl Scene {
    pub fn gate(&self) -> MovementGate {
        MovementGate::new(self.bounds, self.obstacles.clone())
    }

    /// Structural problems with the scene itself.
    pub fn validate(&self) -> Result<(), SceneError> {
        if !self.ground_level.is_finite() {
            return Err(SceneError::BadGroundLevel);
        }
        if !self.bounds.is_well_formed() {
            return Err(SceneError::BadBounds(self.bounds));
        }
        if let Some((index, rect)) = self
            .obstacles
            .iter()
            .enumerate()
            .find(|(_, r)| !r.is_well_formed())
        {
            return Err(SceneError::BadObstacle { index, rect: *rect });
        }
        Ok(())
    }

    /// Every waypoint that an agent could never legitimately stand on.
    ///
    /// These are not fatal to the controller (it skips such legs), but they usually indicate an
    /// authoring mistake.
    pub fn audit_path(&self, path: &[Waypoint]) -> Vec<SceneError> {
        let mut issues = Vec::new();
        for (index, p) in path.iter().copied().enumerate() {
            if !self.bounds.contains(p) {
                issues.push(SceneError::WaypointOutOfBounds {
                    index,
                    x: p.x,
                    z: p.z,
                });
            }
            if let Some(obstacle) = self.obstacles.iter().position(|o| o.contains(p)) {
                issues.push(SceneError::WaypointInObstacle {
                    index,
                    x: p.x,
                    z: p.z,
                    obstacle,
                });
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2;

    #[test]
    fn default_config_validates() {
        assert_eq!(RoamConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_path_selects_default_loop() {
        let path = RoamConfig::default().path_state();
        assert_eq!(path.len(), 9);
        assert_eq!(path.start(), Some(Vec2::new(2.0, 7.0)));
    }

    #[test]
    fn negative_stride_is_rejected() {
        let config = RoamConfig {
            stride: -1.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "stride",
                value: -1.0
            })
        );
    }

    #[test]
    fn default_loop_only_conflicts_with_car_footprint() {
        let scene = Scene::default();
        assert_eq!(scene.validate(), Ok(()));
        let issues = scene.audit_path(RoamConfig::default().path_state().waypoints());
        assert!(!issues.is_empty());
        assert!(issues
            .iter()
            .all(|i| matches!(i, SceneError::WaypointInObstacle { obstacle: 2, .. })));
    }
}
