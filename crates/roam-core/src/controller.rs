use std::sync::Arc;

use crate::heading::bearing_deg;
use crate::locomotion::{procedural_step, root_motion_step, Leg};
use crate::{
    AgentState, AnimationSource, EntityTransform, HeadingController, LocomotionMode,
    MovementGate, RoamConfig, Scene, TickReport, Vec2, Vec3,
};

/// Per-frame inputs supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Elapsed time since the previous tick, in seconds.
    pub dt_seconds: f32,
    /// Snapshot of the observer's ground position, if there is one.
    pub observer: Option<Vec2>,
}

impl TickInput {
    pub fn new(dt_seconds: f32) -> Self {
        Self {
            dt_seconds,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Vec2) -> Self {
        self.observer = Some(observer);
        self
    }
}

/// Drives one or more agents along their waypoint loops.
///
/// The controller is immutable during a tick; all mutation goes through the caller's
/// [`AgentState`]. Cloning is cheap (the gate is shared).
#[derive(Debug, Clone)]
pub struct RoamController {
    config: RoamConfig,
    gate: Arc<MovementGate>,
    ground_level: f32,
    heading: HeadingController,
}

impl RoamController {
    pub fn new(config: RoamConfig, scene: &Scene) -> Self {
        Self::with_gate(config, Arc::new(scene.gate()), scene.ground_level)
    }

    pub fn with_gate(config: RoamConfig, gate: Arc<MovementGate>, ground_level: f32) -> Self {
        let heading = HeadingController::new(config.turn_rate_deg, config.proximity);
        Self {
            config,
            gate,
            ground_level,
            heading,
        }
    }

    pub fn config(&self) -> &RoamConfig {
        &self.config
    }

    pub fn gate(&self) -> &MovementGate {
        &self.gate
    }

    pub fn ground_level(&self) -> f32 {
        self.ground_level
    }

    /// Create the agent's state from its initial transform.
    ///
    /// The agent is snapped onto the first waypoint and turned toward the second. Its height above
    /// the ground is captured here and preserved on every tick.
    pub fn attach_at(&self, initial: Vec3, initial_heading_deg: f32) -> AgentState {
        let path = self.config.path_state();
        let mut position = initial;
        if let Some(start) = path.start() {
            position.x = start.x;
            position.z = start.z;
        }

        let heading = match path.waypoints() {
            [first, second, ..] => bearing_deg(*first, *second),
            _ => {
                tracing::warn!(
                    waypoints = path.len(),
                    "roam path has fewer than 2 waypoints; agent will stay put"
                );
                initial_heading_deg
            }
        };

        AgentState::new(position, heading, path, self.ground_level)
    }

    /// [`RoamController::attach_at`] reading from and writing back to a host entity.
    pub fn attach(&self, entity: &mut dyn EntityTransform) -> AgentState {
        let state = self.attach_at(entity.position(), entity.rotation_y_deg());
        entity.set_position(state.position);
        entity.set_rotation_y_deg(state.heading_deg);
        state
    }

    /// Advance one agent by one frame.
    ///
    /// Never fails: a degenerate path leaves the state untouched, a missing or unready animation
    /// collaborator selects procedural stride, and obstacle conflicts skip to the next waypoint.
    pub fn tick(
        &self,
        input: &TickInput,
        state: &mut AgentState,
        animation: Option<&mut dyn AnimationSource>,
    ) -> TickReport {
        let Some(target) = state.path.current_target() else {
            return TickReport::inert();
        };

        let tuning = &self.config.tuning;
        let dt = sanitize_dt(input.dt_seconds, tuning.max_dt);
        let position = state.position.ground();
        let to_target = target - position;
        let distance = to_target.length();

        let observer = input.observer.filter(|o| o.is_finite());
        let turn = self
            .heading
            .step(state.heading_deg, position, target, observer, dt);
        state.heading_deg = turn.heading;

        let leg = Leg {
            position,
            to_target,
            distance,
            aligned: turn.diff.abs() < tuning.align_threshold_deg,
            dt,
        };

        let mut animation = animation;
        let mode = LocomotionMode::resolve(animation.as_deref());
        let clip = animation
            .as_deref()
            .filter(|a| a.is_ready() && a.has_active_clip());
        let clip_playing = clip.is_some();
        let clip_duration = clip.map(|a| a.clip_duration());

        let step = match (mode, animation.as_deref_mut()) {
            (LocomotionMode::RootMotion, Some(anim)) => {
                root_motion_step(&self.config, &self.gate, &leg, state, anim)
            }
            _ => procedural_step(&self.config, &self.gate, &leg, state, clip_duration),
        };

        let playback_rate = match animation.as_deref_mut() {
            Some(anim) if clip_playing => {
                anim.set_playback_rate(step.playback_rate);
                Some(step.playback_rate)
            }
            _ => None,
        };

        let committed = self.gate.clamp(state.position.ground());
        state.position = committed.with_y(self.ground_level + state.ground_offset);

        if let Some(reason) = step.advanced {
            tracing::debug!(
                ?reason,
                ?mode,
                waypoint_index = state.path.index(),
                distance,
                "advanced to next waypoint"
            );
        }
        tracing::trace!(
            ?mode,
            x = state.position.x,
            z = state.position.z,
            heading = state.heading_deg,
            speed = state.current_speed,
            moving = state.moving,
            "roam tick"
        );

        TickReport {
            mode: Some(mode),
            advanced: step.advanced,
            moving: state.moving,
            gazing: turn.gazing,
            playback_rate,
            distance,
        }
    }

    /// [`RoamController::tick`] against a host entity.
    ///
    /// The entity's current position is adopted first so that host-side moves are respected; the
    /// committed position and heading are written back afterwards.
    pub fn tick_entity(
        &self,
        input: &TickInput,
        state: &mut AgentState,
        entity: &mut dyn EntityTransform,
        animation: Option<&mut dyn AnimationSource>,
    ) -> TickReport {
        let host = entity.position();
        if host.is_finite() {
            state.position = host;
        }
        let report = self.tick(input, state, animation);
        if !report.is_inert() {
            entity.set_position(state.position);
            entity.set_rotation_y_deg(state.heading_deg);
        }
        report
    }
}

/// Clamp a frame delta into `[0, max_dt]`; NaN and non-positive deltas become zero.
fn sanitize_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(max_dt).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_is_capped_and_sanitized() {
        assert_eq!(sanitize_dt(0.5, 0.1), 0.1);
        assert_eq!(sanitize_dt(0.016, 0.1), 0.016);
        assert_eq!(sanitize_dt(-1.0, 0.1), 0.0);
        assert_eq!(sanitize_dt(f32::NAN, 0.1), 0.0);
        assert_eq!(sanitize_dt(f32::NEG_INFINITY, 0.1), 0.0);
        assert_eq!(sanitize_dt(f32::INFINITY, 0.1), 0.1);
    }

    #[test]
    fn attach_snaps_to_start_and_faces_second_waypoint() {
        let config = RoamConfig {
            path: vec![Vec2::new(1.0, 1.0), Vec2::new(1.0, 5.0)],
            ..Default::default()
        };
        let controller = RoamController::with_gate(
            config,
            Arc::new(MovementGate::open(crate::Rect::new(-10.0, 10.0, -10.0, 10.0))),
            0.0,
        );
        let state = controller.attach_at(Vec3::new(-3.0, 0.1, 4.0), 45.0);
        assert_eq!(state.position, Vec3::new(1.0, 0.1, 1.0));
        assert!(state.heading_deg.abs() < 1e-4);
        assert!((state.ground_offset - 0.1).abs() < 1e-6);
    }
}
