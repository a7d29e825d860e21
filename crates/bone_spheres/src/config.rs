//! Bone sphere configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (`BONE_SPHERES_DEBUG_MARKERS=1`)
//! 2. The file named by `BONE_SPHERES_CONFIG`
//! 3. `bone_spheres.toml` in the working directory, then `config/bone_spheres.toml`
//! 4. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! [[tracked_points]]
//! slot = 0
//! label = "right hand"
//! joints = ["RArm_Finger22", "RArm_Hand"]
//!
//! [[tracked_points]]
//! slot = 1
//! label = "left hand"
//! joints = ["LArm_Finger22", "LArm_Hand"]
//!
//! [debug]
//! markers_visible = false
//! ```

use crate::error::ConfigError;
use crate::slot::{SlotMask, TrackedSlot};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One tracked point and the joints it can be read from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedPointConfig {
    /// Slot reported in events
    pub slot: TrackedSlot,
    /// Human readable name, used in logs
    #[serde(default)]
    pub label: String,
    /// Joint names, most precise first. Later entries are fallbacks.
    pub joints: Vec<String>,
}

impl TrackedPointConfig {
    pub fn new<I, S>(slot: TrackedSlot, label: impl Into<String>, joints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slot,
            label: label.into(),
            joints: joints.into_iter().map(Into::into).collect(),
        }
    }
}

/// Debug visualization settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Initial marker visibility of newly created spheres
    pub markers_visible: bool,
}

/// Complete bone sphere configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub tracked_points: Vec<TrackedPointConfig>,
    pub debug: DebugConfig,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            tracked_points: vec![
                TrackedPointConfig::new(
                    TrackedSlot::PRIMARY,
                    "right hand",
                    ["RArm_Finger22", "RArm_Hand"],
                ),
                TrackedPointConfig::new(
                    TrackedSlot::SECONDARY,
                    "left hand",
                    ["LArm_Finger22", "LArm_Hand"],
                ),
            ],
            debug: DebugConfig::default(),
        }
    }
}

impl SphereConfig {
    /// Load configuration from all sources, falling back to defaults
    pub fn load() -> Self {
        let mut config = Self::default();

        let explicit = std::env::var("BONE_SPHERES_CONFIG").ok();
        if let Some(path) = explicit.as_deref().filter(|p| !Path::new(p).exists()) {
            log::warn!("BONE_SPHERES_CONFIG points to missing file {}, searching defaults", path);
        }
        let candidates = explicit
            .iter()
            .map(String::as_str)
            .chain(["bone_spheres.toml", "config/bone_spheres.toml"]);

        for path in candidates {
            if !Path::new(path).exists() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(loaded) => {
                    log::info!("Loaded bone sphere config from {}", path);
                    config = loaded;
                    break;
                }
                Err(e) => log::warn!("Ignoring bone sphere config {}: {}", path, e),
            }
        }

        if let Ok(value) = std::env::var("BONE_SPHERES_DEBUG_MARKERS") {
            config.debug.markers_visible = value == "1" || value == "true";
            log::info!("Debug markers from env: {}", config.debug.markers_visible);
        }

        config
    }

    /// Load and validate a TOML config file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check slot uniqueness and joint chains
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = SlotMask::EMPTY;
        for point in &self.tracked_points {
            if point.slot.index() >= TrackedSlot::MAX {
                return Err(ConfigError::Invalid(format!(
                    "slot {} exceeds the maximum of {} tracked points",
                    point.slot.index(),
                    TrackedSlot::MAX
                )));
            }
            if seen.contains(point.slot) {
                return Err(ConfigError::Invalid(format!(
                    "{} is configured twice",
                    point.slot
                )));
            }
            if point.joints.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{} has no joints to read from",
                    point.slot
                )));
            }
            seen.insert(point.slot);
        }
        Ok(())
    }

    /// Configured slots in declaration order
    pub fn slots(&self) -> impl Iterator<Item = TrackedSlot> + '_ {
        self.tracked_points.iter().map(|p| p.slot)
    }

    /// Set initial marker visibility (builder pattern)
    pub fn with_markers_visible(mut self, visible: bool) -> Self {
        self.debug.markers_visible = visible;
        self
    }

    /// Replace the tracked points (builder pattern)
    pub fn with_tracked_points(mut self, points: Vec<TrackedPointConfig>) -> Self {
        self.tracked_points = points;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SphereConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.slots().collect::<Vec<_>>(),
            vec![TrackedSlot::PRIMARY, TrackedSlot::SECONDARY]
        );
        assert_eq!(config.tracked_points[0].joints[1], "RArm_Hand");
    }

    #[test]
    fn test_parse_toml() {
        let config = SphereConfig::from_toml_str(
            r#"
            [[tracked_points]]
            slot = 0
            joints = ["RArm_Finger23"]

            [[tracked_points]]
            slot = 2
            label = "right foot"
            joints = ["RLeg_Foot", "RLeg_Calf"]

            [debug]
            markers_visible = true
            "#,
        )
        .unwrap();

        assert_eq!(config.tracked_points.len(), 2);
        assert_eq!(config.tracked_points[1].slot, TrackedSlot::new(2).unwrap());
        assert_eq!(config.tracked_points[1].label, "right foot");
        assert!(config.debug.markers_visible);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = SphereConfig::from_toml_str("[debug]\nmarkers_visible = true\n").unwrap();
        assert_eq!(config.tracked_points, SphereConfig::default().tracked_points);
        assert!(config.debug.markers_visible);
    }

    #[test]
    fn test_duplicate_slot_rejected() {
        let config = SphereConfig::default().with_tracked_points(vec![
            TrackedPointConfig::new(TrackedSlot::PRIMARY, "a", ["A"]),
            TrackedPointConfig::new(TrackedSlot::PRIMARY, "b", ["B"]),
        ]);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_out_of_range_slot_rejected() {
        let result = SphereConfig::from_toml_str(
            "[[tracked_points]]\nslot = 40\njoints = [\"Head\"]\n",
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_empty_joint_chain_rejected() {
        let config = SphereConfig::default().with_tracked_points(vec![TrackedPointConfig::new(
            TrackedSlot::PRIMARY,
            "nothing",
            Vec::<String>::new(),
        )]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_falls_back() {
        std::env::set_var("BONE_SPHERES_CONFIG", "/definitely/not/here/explicit.toml");
        let config = SphereConfig::load();
        std::env::remove_var("BONE_SPHERES_CONFIG");

        assert_eq!(config.tracked_points, SphereConfig::default().tracked_points);
    }

    #[test]
    fn test_missing_file() {
        let result = SphereConfig::load_from_file("/definitely/not/here/bone_spheres.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
