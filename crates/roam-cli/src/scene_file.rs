//! YAML scene files: a scene layout plus the agents roaming it.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use roam_core::{ClipInfo, ClipPlayer, ClipSelector, LoopMode, RoamConfig, Scene, Vec2};

/// Template written by `roam init`.
pub const TEMPLATE: &str = r#"# Roaming scene

scene:
  ground_level: 0.0
  bounds: { min_x: -10.0, max_x: 10.0, min_z: -10.0, max_z: 10.0 }
  obstacles:
    - { min_x: -1.0, max_x: 1.0, min_z: 3.0, max_z: 5.0 }

# Static observer the agents turn to face when it comes within `proximity`.
observer: { x: 6.0, z: 6.0 }

agents:
  - name: pet
    height: 0.0
    roam:
      speed: 0.7
      proximity: 5.0
      turn_rate_deg: 220.0
      stride: 0.45
      path:
        - { x: -4.0, z: 0.0 }
        - { x: 4.0, z: 0.0 }
        - { x: 4.0, z: 7.0 }
        - { x: -4.0, z: 7.0 }
    clip:
      name: walk
      duration: 0.9
      root_motion: false
      loop: repeat
"#;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub scene: Scene,
    pub observer: Option<Vec2>,
    pub agents: Vec<AgentSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSpec {
    pub name: String,
    /// Authored height above the ground.
    pub height: f32,
    pub roam: RoamConfig,
    pub clip: Option<ClipSpec>,
}

impl Default for AgentSpec {
    fn default() -> Self {
        Self {
            name: "pet".to_string(),
            height: 0.0,
            roam: RoamConfig::default(),
            clip: None,
        }
    }
}

/// Single-clip stand-in for an animated model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipSpec {
    pub name: String,
    pub duration: f32,
    /// Whether the clip translates a root node.
    pub root_motion: bool,
    #[serde(rename = "loop")]
    pub loop_mode: LoopMode,
}

impl Default for ClipSpec {
    fn default() -> Self {
        Self {
            name: "walk".to_string(),
            duration: 1.0,
            root_motion: false,
            loop_mode: LoopMode::Repeat,
        }
    }
}

impl ClipSpec {
    /// A loaded clip player playing this clip.
    pub fn player(&self) -> ClipPlayer {
        let mut clip = ClipInfo::new(self.name.clone(), self.duration);
        if self.root_motion {
            clip = clip.with_tracks(["Root.position", "Root.quaternion"]);
        }
        let mut player = ClipPlayer::new(ClipSelector::Named(self.name.clone()), self.loop_mode, 1.0);
        player.on_asset_ready(&[clip]);
        player
    }
}

impl SceneFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene from {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse scene from {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: Self = serde_yaml::from_str(content)?;
        Ok(file)
    }

    /// The agents to run; a file without agents runs one default agent.
    pub fn agents(&self) -> Vec<AgentSpec> {
        if self.agents.is_empty() {
            vec![AgentSpec::default()]
        } else {
            self.agents.clone()
        }
    }
}
