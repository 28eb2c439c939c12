//! Clip selection, root-motion detection, and a minimal clip player.
//!
//! [`ClipPlayer`] is a ready-made [`AnimationSource`]: it knows which clip is playing, whether
//! that clip drives a skeleton root, and how far the root has drifted since the last reset. Hosts
//! with their own animation graph feed it root translation each frame; hosts without one can leave
//! it unready and the controller falls back to procedural stride.

use core::convert::Infallible;
use core::str::FromStr;

use crate::{AnimationSource, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Metadata of one animation clip of a loaded asset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClipInfo {
    pub name: String,
    pub duration: f32,
    /// Track names as authored, e.g. `"Hips.position"` or `"Armature/Root/position"`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tracks: Vec<String>,
}

impl ClipInfo {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            tracks: Vec::new(),
        }
    }

    pub fn with_tracks<I, S>(mut self, tracks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tracks = tracks.into_iter().map(Into::into).collect();
        self
    }
}

/// Finds the node whose translation track makes a clip root-motion driven.
///
/// The first track ending in `.position` or `/position` wins. Failing that, the first track counts
/// when its name mentions `position` or `translation`; its node is the part before the first `.`.
pub fn detect_root_motion_node<S: AsRef<str>>(tracks: &[S]) -> Option<String> {
    for track in tracks {
        let track = track.as_ref();
        let node = track
            .strip_suffix(".position")
            .or_else(|| track.strip_suffix("/position"));
        if let Some(node) = node.filter(|n| !n.is_empty()) {
            return Some(node.to_string());
        }
    }

    let first = tracks.first()?.as_ref();
    let lower = first.to_ascii_lowercase();
    if !(lower.contains("position") || lower.contains("translation")) {
        return None;
    }
    first
        .split('.')
        .next()
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

/// Which clip of an asset to play.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClipSelector {
    /// The asset's first clip (`"*"`).
    #[default]
    First,
    /// A clip by name, falling back to the first clip when absent.
    Named(String),
}

impl ClipSelector {
    pub fn select<'a>(&self, clips: &'a [ClipInfo]) -> Option<&'a ClipInfo> {
        match self {
            Self::First => clips.first(),
            Self::Named(name) => clips
                .iter()
                .find(|c| &c.name == name)
                .or_else(|| clips.first()),
        }
    }
}

impl FromStr for ClipSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "*" => Self::First,
            name => Self::Named(name.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LoopMode {
    Once,
    #[default]
    Repeat,
    PingPong,
}

impl FromStr for LoopMode {
    type Err = Infallible;

    /// Unknown names play on repeat.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "once" => Self::Once,
            "pingpong" => Self::PingPong,
            _ => Self::Repeat,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveClip {
    name: String,
    duration: f32,
    root_node: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipPlayer {
    selector: ClipSelector,
    loop_mode: LoopMode,
    base_time_scale: f32,
    ready: bool,
    active: Option<ActiveClip>,
    playback_rate: f32,
    time: f32,
    forward: bool,
    origin: Vec3,
    root_offset: Vec3,
}

impl Default for ClipPlayer {
    fn default() -> Self {
        Self::new(ClipSelector::First, LoopMode::Repeat, 1.0)
    }
}

impl ClipPlayer {
    pub fn new(selector: ClipSelector, loop_mode: LoopMode, base_time_scale: f32) -> Self {
        Self {
            selector,
            loop_mode,
            base_time_scale,
            ready: false,
            active: None,
            playback_rate: base_time_scale,
            time: 0.0,
            forward: true,
            origin: Vec3::ZERO,
            root_offset: Vec3::ZERO,
        }
    }

    /// One-time "asset ready" notification carrying the loaded clips.
    ///
    /// Returns the name of the clip that started playing, if any.
    pub fn on_asset_ready(&mut self, clips: &[ClipInfo]) -> Option<&str> {
        self.ready = true;
        self.time = 0.0;
        self.forward = true;
        self.root_offset = Vec3::ZERO;
        self.playback_rate = self.base_time_scale;
        self.active = self.selector.select(clips).map(|clip| ActiveClip {
            name: clip.name.clone(),
            duration: clip.duration,
            root_node: detect_root_motion_node(&clip.tracks),
        });

        match &self.active {
            Some(clip) => tracing::debug!(
                clip = %clip.name,
                duration = clip.duration,
                root_node = ?clip.root_node,
                "animation clip selected"
            ),
            None => tracing::debug!("asset has no animation clips"),
        }
        self.active.as_ref().map(|c| c.name.as_str())
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn playback_rate(&self) -> f32 {
        self.playback_rate
    }

    pub fn active_clip_name(&self) -> Option<&str> {
        self.active.as_ref().map(|c| c.name.as_str())
    }

    pub fn root_node(&self) -> Option<&str> {
        self.active.as_ref().and_then(|c| c.root_node.as_deref())
    }

    /// Current clip time in seconds.
    pub fn clip_time(&self) -> f32 {
        self.time
    }

    /// True once a [`LoopMode::Once`] clip has played to its end.
    pub fn is_finished(&self) -> bool {
        match (&self.active, self.loop_mode) {
            (Some(clip), LoopMode::Once) => self.time >= clip.duration,
            _ => false,
        }
    }

    /// Advance clip time by `dt` scaled by the playback rate, honoring the loop mode.
    pub fn advance(&mut self, dt: f32) {
        let Some(clip) = &self.active else {
            return;
        };
        let duration = clip.duration;
        if duration <= 0.0 || !duration.is_finite() || !dt.is_finite() {
            return;
        }

        let step = dt.max(0.0) * self.playback_rate.max(0.0);
        if !step.is_finite() {
            return;
        }
        match self.loop_mode {
            LoopMode::Once => self.time = (self.time + step).min(duration),
            LoopMode::Repeat => self.time = (self.time + step).rem_euclid(duration),
            LoopMode::PingPong => {
                let mut t = if self.forward {
                    self.time + step
                } else {
                    self.time - step
                };
                // A single step may bounce more than once for very short clips.
                while t > duration || t < 0.0 {
                    if t > duration {
                        t = 2.0 * duration - t;
                        self.forward = false;
                    } else {
                        t = -t;
                        self.forward = true;
                    }
                }
                self.time = t;
            }
        }
    }

    /// World position of the entity the skeleton is attached to.
    pub fn sync_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    /// Accumulate this frame's root-node translation (entity-aligned world axes).
    ///
    /// Ignored when the active clip has no root node.
    pub fn push_root_translation(&mut self, delta: Vec3) {
        if self.root_node().is_some() {
            self.root_offset += delta;
        }
    }

    pub fn root_offset(&self) -> Vec3 {
        self.root_offset
    }
}

impl AnimationSource for ClipPlayer {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn has_active_clip(&self) -> bool {
        self.active.is_some()
    }

    fn clip_duration(&self) -> f32 {
        self.active.as_ref().map(|c| c.duration).unwrap_or(0.0)
    }

    fn has_root_motion(&self) -> bool {
        self.root_node().is_some()
    }

    fn root_world_position(&self) -> Vec3 {
        self.origin + self.root_offset
    }

    fn reset_root_offset(&mut self) {
        self.root_offset = Vec3::ZERO;
    }

    fn set_playback_rate(&mut self, scale: f32) {
        self.playback_rate = scale;
    }
}
