//! Turn-rate-limited heading control.
//!
//! Headings are degrees about the vertical axis with `0°` facing `+z` and `90°` facing `+x`
//! (`atan2(Δx, Δz)`). The agent's heading is continuous and never wrapped; only the difference
//! used for turning is normalized.

use crate::Vec2;

/// Bearing from `from` to `to` in degrees.
///
/// Coincident points yield `0°`.
pub fn bearing_deg(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.x.atan2(d.z).to_degrees()
}

/// Normalize an angle difference into `(-180°, 180°]`.
pub fn normalize_angle_deg(diff: f32) -> f32 {
    if !diff.is_finite() {
        return 0.0;
    }
    let mut d = 180.0 - (180.0 - diff).rem_euclid(360.0);
    // `rem_euclid` may round up to the modulus itself.
    if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Result of one heading step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingUpdate {
    /// Heading after turning.
    pub heading: f32,
    /// Heading the agent wanted to face this tick.
    pub desired: f32,
    /// Normalized difference between `desired` and the heading *before* turning.
    pub diff: f32,
    /// True when the observer overrode the waypoint bearing.
    pub gazing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingController {
    /// Maximum turn rate in degrees per second.
    pub turn_rate_deg: f32,
    /// Observers closer than this (planar distance) take over the desired heading.
    /// Zero or negative disables gazing.
    pub proximity: f32,
}

impl Default for HeadingController {
    fn default() -> Self {
        Self {
            turn_rate_deg: 220.0,
            proximity: 5.0,
        }
    }
}

impl HeadingController {
    pub fn new(turn_rate_deg: f32, proximity: f32) -> Self {
        Self {
            turn_rate_deg,
            proximity,
        }
    }

    /// The bearing the agent should face, and whether the observer supplied it.
    pub fn desired_heading(&self, position: Vec2, target: Vec2, observer: Option<Vec2>) -> (f32, bool) {
        if let Some(observer) = observer {
            if self.proximity > 0.0 && position.distance(observer) < self.proximity {
                return (bearing_deg(position, observer), true);
            }
        }
        (bearing_deg(position, target), false)
    }

    /// Advance `heading` toward the desired bearing by at most `turn_rate_deg * dt`.
    pub fn step(
        &self,
        heading: f32,
        position: Vec2,
        target: Vec2,
        observer: Option<Vec2>,
        dt: f32,
    ) -> HeadingUpdate {
        let (desired, gazing) = self.desired_heading(position, target, observer);
        let diff = normalize_angle_deg(desired - heading);
        let max_turn = (self.turn_rate_deg * dt.max(0.0)).max(0.0);
        let turn = diff.signum() * diff.abs().min(max_turn);
        HeadingUpdate {
            heading: heading + turn,
            desired,
            diff,
            gazing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearing_uses_z_forward_convention() {
        let origin = Vec2::ZERO;
        assert!((bearing_deg(origin, Vec2::new(0.0, 1.0))).abs() < 1e-4);
        assert!((bearing_deg(origin, Vec2::new(1.0, 0.0)) - 90.0).abs() < 1e-4);
        assert!((bearing_deg(origin, Vec2::new(-1.0, 0.0)) + 90.0).abs() < 1e-4);
        assert_eq!(bearing_deg(origin, origin), 0.0);
    }

    #[test]
    fn normalize_keeps_half_open_range() {
        assert_eq!(normalize_angle_deg(180.0), 180.0);
        assert_eq!(normalize_angle_deg(-180.0), 180.0);
        assert!((normalize_angle_deg(190.0) + 170.0).abs() < 1e-4);
        assert!((normalize_angle_deg(-190.0) - 170.0).abs() < 1e-4);
        assert!((normalize_angle_deg(725.0) - 5.0).abs() < 1e-3);
        assert_eq!(normalize_angle_deg(0.0), 0.0);
    }

    #[test]
    fn step_never_overshoots() {
        let ctl = HeadingController::new(220.0, 0.0);
        let update = ctl.step(85.0, Vec2::ZERO, Vec2::new(1.0, 0.0), None, 0.1);
        assert!((update.heading - 90.0).abs() < 1e-4);
        assert!((update.diff - 5.0).abs() < 1e-4);
    }

    #[test]
    fn step_is_rate_limited() {
        let ctl = HeadingController::new(100.0, 0.0);
        let update = ctl.step(0.0, Vec2::ZERO, Vec2::new(1.0, 0.0), None, 0.1);
        assert!((update.heading - 10.0).abs() < 1e-4);
    }
}
