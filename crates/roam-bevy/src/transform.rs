//! [`EntityTransform`] over a Bevy [`Transform`].

use bevy_math::{EulerRot, Quat};
use bevy_transform::components::Transform;
use roam_core::{EntityTransform, Vec3};

/// Borrowed Bevy transform seen as a roaming host entity.
///
/// Bevy is Y-up and `Quat::from_rotation_y` turns `+z` toward `+x`, which matches the roaming
/// heading convention directly.
pub struct TransformHost<'a>(pub &'a mut Transform);

impl EntityTransform for TransformHost<'_> {
    fn position(&self) -> Vec3 {
        let t = self.0.translation;
        Vec3::new(t.x, t.y, t.z)
    }

    fn set_position(&mut self, position: Vec3) {
        self.0.translation.x = position.x;
        self.0.translation.y = position.y;
        self.0.translation.z = position.z;
    }

    fn rotation_y_deg(&self) -> f32 {
        let (yaw, _, _) = self.0.rotation.to_euler(EulerRot::YXZ);
        yaw.to_degrees()
    }

    fn set_rotation_y_deg(&mut self, degrees: f32) {
        self.0.rotation = Quat::from_rotation_y(degrees.to_radians());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaw_round_trips_through_quat() {
        let mut transform = Transform::default();
        let mut host = TransformHost(&mut transform);
        host.set_rotation_y_deg(90.0);
        assert!((host.rotation_y_deg() - 90.0).abs() < 1e-3);

        let forward = transform.rotation * bevy_math::Vec3::Z;
        assert!((forward.x - 1.0).abs() < 1e-5);
        assert!(forward.z.abs() < 1e-5);
    }
}
