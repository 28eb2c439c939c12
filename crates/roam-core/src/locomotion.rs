//! Locomotion reconciliation: who moves the agent this tick, and how far.
//!
//! Two modes are resolved fresh every tick because the playing clip can change at any time:
//! - [`LocomotionMode::RootMotion`]: the animation moves the skeleton root; the agent adopts that
//!   translation and only steers and signals move/idle.
//! - [`LocomotionMode::ProceduralStride`]: the agent moves itself with a speed derived from the
//!   clip's stride, blended toward a braking-aware target speed.
//!
//! Both modes gate against obstacles by abandoning the current leg rather than steering around.

use crate::{AgentState, AnimationSource, MovementGate, RoamConfig, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LocomotionMode {
    RootMotion,
    ProceduralStride,
}

impl LocomotionMode {
    /// Root motion only when a ready collaborator plays a clip that translates a root node.
    pub fn resolve(animation: Option<&dyn AnimationSource>) -> Self {
        match animation {
            Some(anim) if anim.is_ready() && anim.has_active_clip() && anim.has_root_motion() => {
                Self::RootMotion
            }
            _ => Self::ProceduralStride,
        }
    }
}

/// Why the path moved on to its next waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AdvanceReason {
    /// The current waypoint was reached.
    Arrived,
    /// The landing point of this tick's movement was inside an obstacle.
    Obstacle,
    /// The agent braked to a stop because the half-stride probe ahead of it was not admissible.
    ProbeBlocked,
}

/// What one tick did. Purely informational.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickReport {
    /// `None` when the controller was inert (degenerate path).
    pub mode: Option<LocomotionMode>,
    pub advanced: Option<AdvanceReason>,
    pub moving: bool,
    pub gazing: bool,
    /// Playback rate chosen for the active clip.
    pub playback_rate: Option<f32>,
    /// Distance to the target at the start of the tick.
    pub distance: f32,
}

impl TickReport {
    pub(crate) fn inert() -> Self {
        Self {
            mode: None,
            advanced: None,
            moving: false,
            gazing: false,
            playback_rate: None,
            distance: 0.0,
        }
    }

    pub fn is_inert(&self) -> bool {
        self.mode.is_none()
    }
}

/// Per-tick geometry shared by both modes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Leg {
    pub position: Vec2,
    pub to_target: Vec2,
    pub distance: f32,
    /// Heading within the alignment threshold of the desired bearing (pre-turn).
    pub aligned: bool,
    pub dt: f32,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Step {
    pub advanced: Option<AdvanceReason>,
    pub playback_rate: f32,
}

/// Adopt the skeleton root's translation since the last reset.
///
/// The delta is the root's world position before the collaborator resets its local offset minus
/// the position after, so every frame's translation is consumed exactly once.
///
/// Landing inside an obstacle advances the path but keeps the position: the agent may show inside
/// the footprint for a frame and recovers on the next leg.
pub(crate) fn root_motion_step(
    config: &RoamConfig,
    gate: &MovementGate,
    leg: &Leg,
    state: &mut AgentState,
    animation: &mut dyn AnimationSource,
) -> Step {
    let tuning = &config.tuning;

    let before = animation.root_world_position();
    animation.reset_root_offset();
    let after = animation.root_world_position();
    let planar = (before - after).ground();
    let planar = if planar.is_finite() { planar } else { Vec2::ZERO };

    let mut advanced = None;
    let arrived = leg.distance <= tuning.root_arrival_distance;
    let playback_rate = if arrived {
        state.path.advance();
        advanced = Some(AdvanceReason::Arrived);
        config.idle_time_scale
    } else if leg.aligned {
        config.move_time_scale
    } else {
        config.idle_time_scale
    };

    let next = gate.clamp(leg.position + planar);
    state.position.x = next.x;
    state.position.z = next.z;
    if gate.in_obstacle(next) {
        state.path.advance();
        advanced = Some(AdvanceReason::Obstacle);
    }

    state.moving = !arrived && leg.aligned && planar.length() > f32::EPSILON;
    Step {
        advanced,
        playback_rate,
    }
}

/// Cruising speed for a stride played over `clip_duration` seconds.
///
/// Falls back to the configured base speed when the duration is unusable.
pub fn cruise_speed(config: &RoamConfig, clip_duration: f32) -> f32 {
    if clip_duration > 0.0 && clip_duration.is_finite() {
        config.stride.max(0.0) / clip_duration
    } else {
        config.speed.max(0.0)
    }
}

/// Move the agent with the blended stride speed model.
///
/// `clip_duration` is `None` when no clip is playing.
pub(crate) fn procedural_step(
    config: &RoamConfig,
    gate: &MovementGate,
    leg: &Leg,
    state: &mut AgentState,
    clip_duration: Option<f32>,
) -> Step {
    let tuning = &config.tuning;
    let idle = Step {
        advanced: None,
        playback_rate: config.idle_time_scale,
    };

    let cruise = cruise_speed(
        config,
        clip_duration.unwrap_or(tuning.fallback_clip_duration),
    );
    let stop = tuning.stop_distance;
    let brake = tuning.brake_distance.max(f32::EPSILON);
    let distance = leg.distance;

    let ramp_speed = if distance <= stop {
        0.0
    } else if distance < stop + brake {
        cruise * (distance - stop) / brake
    } else {
        cruise
    };

    let direction = leg.to_target.normalize_or_zero();
    let probe = leg.position + direction * (config.stride * 0.5);
    let probe_clear = gate.admissible(probe);
    let want_move = leg.aligned && distance > stop && probe_clear;

    let blend = (config.accel_rate * leg.dt).max(0.0).min(1.0);
    let goal = if want_move { ramp_speed } else { 0.0 };
    let cap = (cruise * tuning.speed_headroom).max(0.0);
    let speed = state.current_speed + (goal - state.current_speed) * blend;
    state.current_speed = speed.max(0.0).min(cap);

    // Stop short instead of overshooting when two more ticks would cover the rest.
    if distance <= stop || distance <= state.current_speed * leg.dt * 2.0 {
        state.path.advance();
        state.moving = false;
        return Step {
            advanced: Some(AdvanceReason::Arrived),
            ..idle
        };
    }

    // A blocked probe only brakes. Once the agent has come to rest against it, give up the leg.
    if !probe_clear && state.current_speed <= tuning.moving_speed_epsilon {
        state.current_speed = 0.0;
        state.path.advance();
        state.moving = false;
        return Step {
            advanced: Some(AdvanceReason::ProbeBlocked),
            ..idle
        };
    }

    let next = gate.clamp(leg.position + direction * (state.current_speed * leg.dt));
    if gate.in_obstacle(next) {
        state.path.advance();
        state.moving = false;
        return Step {
            advanced: Some(AdvanceReason::Obstacle),
            ..idle
        };
    }

    state.position.x = next.x;
    state.position.z = next.z;
    state.moving = state.current_speed > tuning.moving_speed_epsilon;
    Step {
        advanced: None,
        playback_rate: if state.moving {
            config.move_time_scale
        } else {
            config.idle_time_scale
        },
    }
}
