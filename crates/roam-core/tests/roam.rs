use std::sync::Arc;

use roam_core::{
    AdvanceReason, LocomotionMode, MovementGate, Rect, RoamConfig, RoamController, TickInput,
    Vec2, Vec3,
};

fn line_config() -> RoamConfig {
    RoamConfig {
        path: vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)],
        ..Default::default()
    }
}

fn open_controller(config: RoamConfig) -> RoamController {
    let gate = MovementGate::open(Rect::new(-20.0, 20.0, -20.0, 20.0));
    RoamController::with_gate(config, Arc::new(gate), 0.0)
}

#[test]
fn agent_reaches_far_waypoint_and_loops_back() {
    let controller = open_controller(line_config());
    let mut state = controller.attach_at(Vec3::ZERO, 0.0);
    assert!((state.heading_deg - 90.0).abs() < 1e-4);

    let mut arrivals = Vec::new();
    let mut max_x = f32::MIN;
    for tick in 0..2_000 {
        let report = controller.tick(&TickInput::new(0.1), &mut state, None);
        assert_eq!(report.mode, Some(LocomotionMode::ProceduralStride));
        max_x = max_x.max(state.position.x);
        if report.advanced == Some(AdvanceReason::Arrived) {
            arrivals.push((tick, state.waypoint_index()));
        }
    }

    assert!(max_x > 8.5, "never got close to the far waypoint: {max_x}");
    assert!(max_x < 10.0, "overshot the far waypoint: {max_x}");
    assert!(arrivals.len() >= 2, "expected a full loop, got {arrivals:?}");
    assert_eq!(arrivals[0].1, 1);
    assert_eq!(arrivals[1].1, 0);
}

#[test]
fn agent_never_enters_obstacle_and_abandons_the_leg() {
    let gate = MovementGate::new(
        Rect::new(-20.0, 20.0, -20.0, 20.0),
        vec![Rect::new(4.0, 6.0, -1.0, 1.0)],
    );
    let obstacle = gate.obstacles()[0];
    let controller = RoamController::with_gate(line_config(), Arc::new(gate), 0.0);
    let mut state = controller.attach_at(Vec3::ZERO, 0.0);

    let mut blocked = 0;
    for _ in 0..3_000 {
        let report = controller.tick(&TickInput::new(0.1), &mut state, None);
        assert!(
            !obstacle.contains(state.position.ground()),
            "agent entered the obstacle at {:?}",
            state.position
        );
        if matches!(
            report.advanced,
            Some(AdvanceReason::ProbeBlocked | AdvanceReason::Obstacle)
        ) {
            blocked += 1;
        }
    }
    assert!(blocked >= 2, "blocked leg was never abandoned");
}

#[test]
fn blocked_stride_brakes_to_rest_before_giving_up_the_leg() {
    let gate = MovementGate::new(
        Rect::new(-20.0, 20.0, -20.0, 20.0),
        vec![Rect::new(5.0, 6.0, -1.0, 1.0)],
    );
    let config = line_config();
    let epsilon = config.tuning.moving_speed_epsilon;
    let half_stride = config.stride * 0.5;
    let controller = RoamController::with_gate(config, Arc::new(gate), 0.0);
    let mut state = controller.attach_at(Vec3::ZERO, 0.0);

    let mut braking_ticks = 0;
    for _ in 0..400 {
        let speed_before = state.current_speed;
        let blocked_ahead = state.position.x + half_stride >= 5.0;
        let report = controller.tick(&TickInput::new(0.1), &mut state, None);
        if blocked_ahead && report.advanced.is_none() {
            braking_ticks += 1;
            assert!(state.current_speed < speed_before);
        }
        if report.advanced == Some(AdvanceReason::ProbeBlocked) {
            assert!(blocked_ahead);
            assert!(speed_before <= epsilon / 0.6, "left the leg at {speed_before}");
            assert_eq!(state.current_speed, 0.0);
            assert!(state.position.x < 5.0);
            assert!(braking_ticks > 3);
            return;
        }
        assert!(report.advanced.is_none(), "{:?}", report.advanced);
    }
    panic!("blocked leg was never given up");
}

#[test]
fn position_stays_within_bounds() {
    let config = RoamConfig {
        path: vec![Vec2::new(0.0, 0.0), Vec2::new(30.0, 4.0)],
        ..Default::default()
    };
    let bounds = Rect::new(-5.0, 10.0, -5.0, 10.0);
    let controller = RoamController::with_gate(config, Arc::new(MovementGate::open(bounds)), 0.0);
    let mut state = controller.attach_at(Vec3::ZERO, 0.0);

    for _ in 0..3_000 {
        controller.tick(&TickInput::new(0.1), &mut state, None);
        assert!(bounds.contains(state.position.ground()), "{:?}", state.position);
    }
}

#[test]
fn speed_and_displacement_respect_the_cap() {
    let config = line_config();
    let cap = config.stride / config.tuning.fallback_clip_duration * config.tuning.speed_headroom;
    let max_step = cap * config.tuning.max_dt;
    let controller = open_controller(config);
    let mut state = controller.attach_at(Vec3::ZERO, 0.0);

    let dts = [0.016, 0.5, 0.0, -1.0, f32::NAN, f32::INFINITY, 0.1, 0.033];
    for i in 0..1_000 {
        let before = state.position.ground();
        controller.tick(&TickInput::new(dts[i % dts.len()]), &mut state, None);
        assert!(state.current_speed >= 0.0);
        assert!(state.current_speed <= cap + 1e-6, "speed {}", state.current_speed);
        assert!(before.distance(state.position.ground()) <= max_step + 1e-5);
        assert!(state.position.is_finite());
    }
}

#[test]
fn heading_turns_at_most_the_turn_rate() {
    let config = line_config();
    let per_tick = config.turn_rate_deg * 0.1;
    let controller = open_controller(config);
    let mut state = controller.attach_at(Vec3::ZERO, 0.0);

    for _ in 0..1_500 {
        let before = state.heading_deg;
        controller.tick(&TickInput::new(0.1), &mut state, None);
        assert!((state.heading_deg - before).abs() <= per_tick + 1e-3);
    }
}

#[test]
fn waypoint_index_tracks_advances_modulo_path_length() {
    let config = RoamConfig {
        path: vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 4.0),
        ],
        ..Default::default()
    };
    let len = config.path.len();
    let controller = open_controller(config);
    let mut state = controller.attach_at(Vec3::ZERO, 0.0);

    let mut advances = 0;
    for _ in 0..5_000 {
        let report = controller.tick(&TickInput::new(0.1), &mut state, None);
        if report.advanced.is_some() {
            advances += 1;
        }
        assert_eq!(state.waypoint_index(), advances % len);
    }
    assert!(advances > len);
}

#[test]
fn degenerate_path_is_inert() {
    let config = RoamConfig {
        path: vec![Vec2::new(3.0, 3.0)],
        ..Default::default()
    };
    let controller = open_controller(config);
    let mut state = controller.attach_at(Vec3::new(0.0, 0.5, 0.0), 12.0);
    assert_eq!(state.position, Vec3::new(3.0, 0.5, 3.0));
    assert_eq!(state.heading_deg, 12.0);

    let before = state.clone();
    for _ in 0..10 {
        let report = controller.tick(&TickInput::new(0.1), &mut state, None);
        assert!(report.is_inert());
    }
    assert_eq!(state, before);
}

#[test]
fn nearby_observer_takes_over_heading_without_touching_the_path() {
    let controller = open_controller(line_config());
    let mut state = controller.attach_at(Vec3::ZERO, 0.0);
    let input = TickInput::new(0.1).with_observer(Vec2::new(0.0, 3.0));

    for _ in 0..10 {
        let report = controller.tick(&input, &mut state, None);
        assert!(report.gazing);
        assert!(report.advanced.is_none());
    }
    assert!(state.heading_deg.abs() < 1e-3, "heading {}", state.heading_deg);
    assert_eq!(state.waypoint_index(), 0);
    assert_eq!(state.position, Vec3::ZERO);

    let far = TickInput::new(0.1).with_observer(Vec2::new(0.0, 6.0));
    let report = controller.tick(&far, &mut state, None);
    assert!(!report.gazing);
}

#[test]
fn ground_offset_is_preserved() {
    let gate = MovementGate::open(Rect::new(-20.0, 20.0, -20.0, 20.0));
    let controller = RoamController::with_gate(line_config(), Arc::new(gate), 1.5);
    let mut state = controller.attach_at(Vec3::new(0.0, 1.75, 0.0), 0.0);

    for _ in 0..200 {
        controller.tick(&TickInput::new(0.1), &mut state, None);
        assert!((state.position.y - 1.75).abs() < 1e-6);
    }
}

#[test]
fn agents_sharing_a_controller_are_independent() {
    let controller = open_controller(line_config());
    let mut a = controller.attach_at(Vec3::ZERO, 0.0);
    let mut b = controller.attach_at(Vec3::ZERO, 0.0);
    let untouched = b.clone();

    for _ in 0..50 {
        controller.tick(&TickInput::new(0.1), &mut a, None);
    }
    assert_ne!(a, untouched);
    assert_eq!(b, untouched);

    for _ in 0..50 {
        controller.tick(&TickInput::new(0.1), &mut b, None);
    }
    assert_eq!(a, b);
}

#[test]
fn clamping_is_idempotent() {
    let gate = MovementGate::open(Rect::new(-1.0, 1.0, -2.0, 2.0));
    for p in [
        Vec2::new(5.0, 5.0),
        Vec2::new(-3.0, 0.5),
        Vec2::new(0.25, -0.25),
    ] {
        let once = gate.clamp(p);
        assert_eq!(gate.clamp(once), once);
    }
}
