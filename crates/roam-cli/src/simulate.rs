//! Headless fixed-step simulation of a scene file.

use std::sync::Arc;

use serde::Serialize;

use roam_core::{
    AdvanceReason, AnimationSource, ClipPlayer, LocomotionMode, MovementGate, RoamController,
    Scene, TickInput, TickReport, Vec2, Vec3,
};

use crate::scene_file::{AgentSpec, ClipSpec};

#[derive(Debug, Clone, Copy)]
pub struct SimOptions {
    pub ticks: u64,
    pub dt: f32,
    pub observer: Option<Vec2>,
    /// Give every agent a root-motion clip.
    pub force_root_motion: bool,
    /// Emit a sample every `every` ticks (0 disables sampling).
    pub every: u64,
}

/// One sampled tick of one agent.
#[derive(Debug, Clone, Serialize)]
pub struct Sample<'a> {
    pub agent: &'a str,
    pub tick: u64,
    pub x: f32,
    pub z: f32,
    pub heading_deg: f32,
    pub waypoint: usize,
    pub speed: f32,
    pub report: TickReport,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentSummary {
    pub name: String,
    pub ticks: u64,
    pub arrivals: u64,
    pub obstacle_skips: u64,
    pub probe_skips: u64,
    pub root_motion_ticks: u64,
    pub moving_ticks: u64,
    pub gazing_ticks: u64,
    pub distance_travelled: f32,
    pub final_position: Vec3,
    pub final_heading_deg: f32,
    pub final_waypoint: usize,
}

impl AgentSummary {
    fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        match report.advanced {
            Some(AdvanceReason::Arrived) => self.arrivals += 1,
            Some(AdvanceReason::Obstacle) => self.obstacle_skips += 1,
            Some(AdvanceReason::ProbeBlocked) => self.probe_skips += 1,
            None => {}
        }
        if report.mode == Some(LocomotionMode::RootMotion) {
            self.root_motion_ticks += 1;
        }
        if report.moving {
            self.moving_ticks += 1;
        }
        if report.gazing {
            self.gazing_ticks += 1;
        }
    }
}

/// Feed the clip player one frame of synthetic root translation.
///
/// The root walks along the current heading at the clip's stride rate, scaled by the playback
/// rate the reconciler chose on the previous tick.
fn push_synthetic_root_motion(player: &mut ClipPlayer, stride: f32, heading_deg: f32, dt: f32) {
    let duration = player.clip_duration();
    if !player.has_root_motion() || duration <= 0.0 {
        return;
    }
    let step = stride / duration * player.playback_rate() * dt;
    let (sin, cos) = heading_deg.to_radians().sin_cos();
    player.push_root_translation(Vec3::new(sin * step, 0.0, cos * step));
}

/// Run one agent for `options.ticks` ticks, handing every sampled tick to `on_sample`.
pub fn run_agent(
    scene: &Scene,
    gate: Arc<MovementGate>,
    spec: &AgentSpec,
    options: &SimOptions,
    mut on_sample: impl FnMut(&Sample<'_>),
) -> AgentSummary {
    let controller = RoamController::with_gate(spec.roam.clone(), gate, scene.ground_level);
    let mut state =
        controller.attach_at(Vec3::new(0.0, scene.ground_level + spec.height, 0.0), 0.0);

    let clip = match (&spec.clip, options.force_root_motion) {
        (Some(clip), true) => Some(ClipSpec {
            root_motion: true,
            ..clip.clone()
        }),
        (None, true) => Some(ClipSpec {
            root_motion: true,
            ..Default::default()
        }),
        (clip, false) => clip.clone(),
    };
    let mut player = clip.as_ref().map(ClipSpec::player);

    let mut input = TickInput::new(options.dt);
    if let Some(observer) = options.observer {
        input = input.with_observer(observer);
    }

    let mut summary = AgentSummary {
        name: spec.name.clone(),
        ..Default::default()
    };

    for tick in 0..options.ticks {
        let before = state.position.ground();
        if let Some(player) = player.as_mut() {
            player.sync_origin(state.position);
            push_synthetic_root_motion(player, spec.roam.stride, state.heading_deg, options.dt);
        }

        let animation = player.as_mut().map(|p| p as &mut dyn AnimationSource);
        let report = controller.tick(&input, &mut state, animation);
        if let Some(player) = player.as_mut() {
            player.advance(options.dt);
        }

        summary.record(&report);
        summary.distance_travelled += before.distance(state.position.ground());

        if options.every > 0 && tick % options.every == 0 {
            on_sample(&Sample {
                agent: &spec.name,
                tick,
                x: state.position.x,
                z: state.position.z,
                heading_deg: state.heading_deg,
                waypoint: state.waypoint_index(),
                speed: state.current_speed,
                report,
            });
        }
    }

    summary.final_position = state.position;
    summary.final_heading_deg = state.heading_deg;
    summary.final_waypoint = state.waypoint_index();
    summary
}
