//! Narrow interfaces to the two external collaborators: the scene host and the animation player.

use crate::Vec3;

/// Transform storage of the entity the controller drives.
///
/// Rotation is the yaw about the vertical axis in degrees (see [`crate::heading`]).
pub trait EntityTransform {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn rotation_y_deg(&self) -> f32;
    fn set_rotation_y_deg(&mut self, degrees: f32);
}

/// The animation-playback subsystem as seen by the locomotion reconciler.
///
/// Implementations own clip playback; the reconciler only queries it, consumes root translation,
/// and pushes a playback rate.
pub trait AnimationSource {
    /// False until the animated asset has loaded and its clips are known.
    fn is_ready(&self) -> bool {
        true
    }

    fn has_active_clip(&self) -> bool;

    /// Duration of the active clip in seconds.
    fn clip_duration(&self) -> f32;

    /// True when the active clip translates a skeleton root node.
    fn has_root_motion(&self) -> bool;

    /// World-space position of the skeleton root after this frame's playback.
    fn root_world_position(&self) -> Vec3;

    /// Zero the root node's local offset once its translation has been applied to the entity.
    fn reset_root_offset(&mut self);

    /// Time-scale multiplier for the active clip.
    fn set_playback_rate(&mut self, scale: f32);
}
