//! Scenario files - scripted skeleton poses replayed frame by frame
//!
//! ```toml
//! [scenario]
//! name = "wrist tap"
//!
//! [[bones]]
//! name = "Spine2"
//! parent = "Pelvis"
//! translation = [0.0, 0.0, 30.0]
//!
//! [[spheres]]
//! id = "wrist_menu"
//! bone = "LArm_ForeArm3"
//! radius = 3.0
//! offset = [0.0, 0.0, 2.0]
//!
//! [[frames]]
//! repeat = 3
//! pose = [{ bone = "RArm_Hand", translation = [-17.5, 25.0, 2.0] }]
//! show_markers = ["wrist_menu"]
//! ```

use bone_spheres::{LifecycleEvent, SphereConfig, Transform};
use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Bone '{0}' is not declared")]
    UnknownBone(String),

    #[error("Sphere '{0}' is not declared")]
    UnknownSphere(String),

    #[error("Duplicate {0} '{1}'")]
    Duplicate(&'static str, String),
}

// ============================================================================
// Scenario Definition Structures
// ============================================================================

/// Root scenario definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub scenario: ScenarioMetadata,

    /// Overrides the config found by `SphereConfig::load`
    #[serde(default)]
    pub config: Option<SphereConfig>,

    /// Bones, parents before children
    #[serde(default)]
    pub bones: Vec<BoneDef>,

    #[serde(default)]
    pub spheres: Vec<SphereDef>,

    #[serde(default)]
    pub frames: Vec<FrameDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A bone in the demo skeleton
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoneDef {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub translation: [f32; 3],
    /// Euler XYZ in degrees
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Whether the bone is rendered at the start
    #[serde(default = "default_true")]
    pub present: bool,
}

impl BoneDef {
    pub fn local_transform(&self) -> Transform {
        pose_transform(self.translation, self.rotation)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphereDef {
    pub id: String,
    pub bone: String,
    pub radius: f32,
    #[serde(default)]
    pub offset: [f32; 3],
}

/// New local transform for a bone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseDef {
    pub bone: String,
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
}

impl PoseDef {
    pub fn local_transform(&self) -> Transform {
        pose_transform(self.translation, self.rotation)
    }
}

/// Changes applied before a frame, then the frame is run `repeat` times
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameDef {
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    #[serde(default)]
    pub pose: Vec<PoseDef>,
    #[serde(default)]
    pub show_bones: Vec<String>,
    #[serde(default)]
    pub hide_bones: Vec<String>,
    #[serde(default)]
    pub show_markers: Vec<String>,
    #[serde(default)]
    pub hide_markers: Vec<String>,
    /// Toggle every marker at once
    #[serde(default)]
    pub all_markers: Option<bool>,
    #[serde(default)]
    pub destroy: Vec<String>,
    #[serde(default)]
    pub lifecycle: Option<LifecycleEvent>,
}

fn default_true() -> bool {
    true
}

fn default_repeat() -> u32 {
    1
}

fn pose_transform(translation: [f32; 3], rotation: [f32; 3]) -> Transform {
    let [rx, ry, rz] = rotation.map(f32::to_radians);
    Transform::from_translation_rotation(
        Vec3::from_array(translation),
        Quat::from_euler(EulerRot::XYZ, rx, ry, rz),
    )
}

// ============================================================================
// Loading
// ============================================================================

impl Scenario {
    /// Load and check a scenario file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = toml::from_str(content)?;
        scenario.check()?;
        Ok(scenario)
    }

    /// Every name a frame refers to must be declared
    fn check(&self) -> Result<(), ScenarioError> {
        let mut bones = HashSet::new();
        for bone in &self.bones {
            if let Some(parent) = &bone.parent {
                if !bones.contains(parent.as_str()) {
                    return Err(ScenarioError::UnknownBone(parent.clone()));
                }
            }
            if !bones.insert(bone.name.as_str()) {
                return Err(ScenarioError::Duplicate("bone", bone.name.clone()));
            }
        }

        let mut spheres = HashSet::new();
        for sphere in &self.spheres {
            if !spheres.insert(sphere.id.as_str()) {
                return Err(ScenarioError::Duplicate("sphere", sphere.id.clone()));
            }
        }

        for frame in &self.frames {
            let bone_refs = frame
                .pose
                .iter()
                .map(|p| &p.bone)
                .chain(&frame.show_bones)
                .chain(&frame.hide_bones);
            for name in bone_refs {
                if !bones.contains(name.as_str()) {
                    return Err(ScenarioError::UnknownBone(name.clone()));
                }
            }

            let sphere_refs = frame
                .show_markers
                .iter()
                .chain(&frame.hide_markers)
                .chain(&frame.destroy);
            for id in sphere_refs {
                if !spheres.contains(id.as_str()) {
                    return Err(ScenarioError::UnknownSphere(id.clone()));
                }
            }
        }
        Ok(())
    }

    /// Total number of frames after expanding repeats
    pub fn frame_count(&self) -> u64 {
        self.frames.iter().map(|f| f.repeat as u64).sum()
    }
}
