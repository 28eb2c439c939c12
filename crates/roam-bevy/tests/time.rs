#![cfg(feature = "time")]

use std::time::Duration;

use std::sync::Arc;

use bevy_app::App;
use bevy_time::Time;
use bevy_transform::components::Transform;
use roam_bevy::{RoamPlugin, RoamTick, Roamer};
use roam_core::{MovementGate, Rect, RoamConfig, RoamController, Vec2};

#[test]
fn bevy_time_can_drive_roam_tick_dt_seconds() {
    let mut app = App::new();
    app.add_plugins(RoamPlugin::default());

    app.insert_resource(RoamTick {
        tick: 0,
        dt_seconds: 123.0,
    });

    let mut time: Time = Time::default();
    time.advance_by(Duration::from_millis(250));
    app.insert_resource(time);

    app.update();

    let tick = app.world().resource::<RoamTick>();
    assert!((tick.dt_seconds - 0.25).abs() < 1e-6);
}

#[test]
fn roamers_turn_with_the_synced_dt() {
    let mut app = App::new();
    app.add_plugins(RoamPlugin::default());
    app.insert_resource(RoamTick {
        tick: 0,
        dt_seconds: 123.0,
    });

    let mut time: Time = Time::default();
    time.advance_by(Duration::from_millis(50));
    app.insert_resource(time);

    let config = RoamConfig {
        path: vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)],
        ..Default::default()
    };
    let turn_rate = config.turn_rate_deg;
    let gate = MovementGate::open(Rect::new(-20.0, 20.0, -20.0, 20.0));
    let controller = RoamController::with_gate(config, Arc::new(gate), 0.0);

    // The observer sits 90° off the path bearing, so the roamer turns by one rate-limited step.
    let observer = app.world_mut().spawn(Transform::from_xyz(0.0, 0.0, 3.0)).id();
    let entity = app
        .world_mut()
        .spawn((
            Transform::default(),
            Roamer::new(controller).with_observer(observer),
        ))
        .id();

    app.update();

    let roamer = app.world().get::<Roamer>(entity).expect("roamer");
    let heading = roamer.state.as_ref().expect("attached").heading_deg;
    assert!((heading - (90.0 - turn_rate * 0.05)).abs() < 1e-3, "heading {heading}");
}
