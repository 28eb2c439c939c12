//! Bevy adapter for `roam-core`.
//!
//! Entities carrying a [`Roamer`] and a Bevy [`Transform`] are attached on their first frame
//! (snapped to the path start) and then ticked once per frame. The controller stays
//! engine-agnostic; this crate only maps `Transform` in and out and feeds an optional
//! [`RoamClip`] animation collaborator.
//!
//! ## Scheduling
//!
//! Systems run in [`bevy_app::Update`] by default. Use [`RoamPlugin::in_fixed_update`] when the
//! app drives a fixed timestep.
//!
//! ## Features
//!
//! - `time`: if Bevy's `bevy_time::Time` resource is present, `RoamTick.dt_seconds` is updated
//!   from `Time::delta_secs()` each frame.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

use bevy_app::{App, FixedUpdate, Plugin, Update};
use bevy_ecs::entity::Entity;
use bevy_ecs::prelude::{Component, Query, ResMut, Resource, SystemSet, Without};
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_transform::components::Transform;
use roam_core::{
    AgentState, AnimationSource, ClipPlayer, RoamController, TickInput, TickReport, Vec2,
};

#[cfg(feature = "time")]
use bevy_ecs::prelude::Res;
#[cfg(feature = "time")]
use bevy_time::Time;

pub mod transform;

pub use transform::TransformHost;

#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(Resource)]
pub struct RoamTick {
    pub tick: u64,
    pub dt_seconds: f32,
}

impl Default for RoamTick {
    fn default() -> Self {
        Self {
            tick: 0,
            dt_seconds: 1.0 / 60.0,
        }
    }
}

/// A roaming agent.
///
/// `state` is filled in on the first frame the entity is seen.
#[derive(Debug, Clone)]
#[derive(Component)]
pub struct Roamer {
    pub controller: RoamController,
    pub state: Option<AgentState>,
    /// Entity whose `Transform` the agent turns to face when it comes close.
    pub observer: Option<Entity>,
    pub last_report: Option<TickReport>,
}

impl Roamer {
    pub fn new(controller: RoamController) -> Self {
        Self {
            controller,
            state: None,
            observer: None,
            last_report: None,
        }
    }

    pub fn with_observer(mut self, observer: Entity) -> Self {
        self.observer = Some(observer);
        self
    }
}

/// Animation collaborator for a [`Roamer`].
///
/// The host's animation code calls [`ClipPlayer::on_asset_ready`] once the model has loaded and
/// pushes root translation each frame; the roam systems keep the origin in sync and advance
/// clip time.
#[derive(Debug, Clone, Default)]
#[derive(Component)]
pub struct RoamClip(pub ClipPlayer);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoamSchedule {
    Update,
    FixedUpdate,
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum RoamSet {
    SyncIn,
    Roam,
}

#[cfg(feature = "time")]
pub fn sync_tick_dt_from_bevy_time(time: Option<Res<Time>>, mut tick: ResMut<RoamTick>) {
    let Some(time) = time else {
        return;
    };

    let dt = time.delta_secs();
    if dt.is_finite() && dt.is_sign_positive() {
        tick.dt_seconds = dt;
    }
}

/// Attaches every roamer that has no state yet.
pub fn attach_roamers(mut query: Query<(Entity, &mut Roamer, &mut Transform)>) {
    for (entity, mut roamer, mut transform) in query.iter_mut() {
        if roamer.state.is_some() {
            continue;
        }
        let state = roamer.controller.attach(&mut TransformHost(&mut transform));
        tracing::debug!(
            ?entity,
            waypoints = state.path.len(),
            x = state.position.x,
            z = state.position.z,
            "roamer attached"
        );
        roamer.state = Some(state);
    }
}

/// Ticks every attached roamer and writes its transform back.
pub fn tick_roamers(
    mut tick: ResMut<RoamTick>,
    mut roamers: Query<(&mut Roamer, &mut Transform, Option<&mut RoamClip>)>,
    observers: Query<&Transform, Without<Roamer>>,
) {
    let dt = tick.dt_seconds;
    tick.tick = tick.tick.wrapping_add(1);

    for (roamer, mut transform, clip) in roamers.iter_mut() {
        let roamer = roamer.into_inner();
        let Some(state) = roamer.state.as_mut() else {
            continue;
        };

        let mut input = TickInput::new(dt);
        if let Some(observer) = roamer.observer.and_then(|e| observers.get(e).ok()) {
            input = input.with_observer(Vec2::new(
                observer.translation.x,
                observer.translation.z,
            ));
        }

        let mut clip = clip.map(|c| c.into_inner());
        if let Some(clip) = clip.as_deref_mut() {
            let t = transform.translation;
            clip.0.sync_origin(roam_core::Vec3::new(t.x, t.y, t.z));
        }
        let animation: Option<&mut dyn AnimationSource> = match clip.as_deref_mut() {
            Some(clip) => Some(&mut clip.0),
            None => None,
        };

        let report = roamer.controller.tick_entity(
            &input,
            state,
            &mut TransformHost(&mut transform),
            animation,
        );
        if let Some(clip) = clip {
            clip.0.advance(dt);
        }
        roamer.last_report = Some(report);
    }
}

pub struct RoamPlugin {
    schedule: RoamSchedule,
}

impl Default for RoamPlugin {
    fn default() -> Self {
        Self {
            schedule: RoamSchedule::Update,
        }
    }
}

impl RoamPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_fixed_update(mut self) -> Self {
        self.schedule = RoamSchedule::FixedUpdate;
        self
    }

    pub fn schedule(&self) -> RoamSchedule {
        self.schedule
    }
}

impl Plugin for RoamPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RoamTick>();

        let systems = (
            #[cfg(feature = "time")]
            sync_tick_dt_from_bevy_time.in_set(RoamSet::SyncIn),
            attach_roamers.in_set(RoamSet::SyncIn),
            tick_roamers.in_set(RoamSet::Roam),
        );

        match self.schedule {
            RoamSchedule::Update => {
                app.configure_sets(Update, (RoamSet::SyncIn, RoamSet::Roam).chain());
                app.add_systems(Update, systems);
            }
            RoamSchedule::FixedUpdate => {
                app.configure_sets(FixedUpdate, (RoamSet::SyncIn, RoamSet::Roam).chain());
                app.add_systems(FixedUpdate, systems);
            }
        }
    }
}
