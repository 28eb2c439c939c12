//! Engine-agnostic waypoint roaming with locomotion reconciliation.
//!
//! A roaming agent follows a looping, pre-authored waypoint path on the ground plane. Each tick the
//! [`RoamController`]:
//! - picks the current target from the agent's [`PathState`],
//! - turns the agent toward it (or toward a nearby observer) at a bounded rate,
//! - moves it either from externally reported root motion or from a procedural stride model,
//! - and gates the result against world bounds and static obstacle rectangles.
//!
//! All per-agent mutable data lives in one [`AgentState`] record that the caller owns and passes
//! into every tick, so independent agents never share mutable state.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod clip;
pub mod config;
pub mod controller;
pub mod gate;
pub mod heading;
pub mod host;
pub mod locomotion;
pub mod math;
pub mod path;

pub use agent::AgentState;
pub use clip::{detect_root_motion_node, ClipInfo, ClipPlayer, ClipSelector, LoopMode};
pub use config::{ConfigError, LocomotionTuning, RoamConfig, Scene, SceneError};
pub use controller::{RoamController, TickInput};
pub use gate::{MovementGate, Rect};
pub use heading::{bearing_deg, normalize_angle_deg, HeadingController, HeadingUpdate};
pub use host::{AnimationSource, EntityTransform};
pub use locomotion::{cruise_speed, AdvanceReason, LocomotionMode, TickReport};
pub use math::{Vec2, Vec3};
pub use path::{PathState, Waypoint};
