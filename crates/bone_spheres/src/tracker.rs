//! Tracked points read from skeleton joints with fallbacks
//!
//! Finger joints are not always rendered, so each slot walks its joint chain
//! and uses the first joint the skeleton can currently resolve.

use crate::config::{SphereConfig, TrackedPointConfig};
use crate::provider::{BoneTransformProvider, TrackedPointProvider};
use crate::slot::TrackedSlot;
use glam::Vec3;
use std::sync::Arc;

/// [`TrackedPointProvider`] backed by joint fallback chains
pub struct JointChainTracker {
    bones: Arc<dyn BoneTransformProvider>,
    chains: Vec<TrackedPointConfig>,
}

impl JointChainTracker {
    pub fn new(bones: Arc<dyn BoneTransformProvider>, chains: Vec<TrackedPointConfig>) -> Self {
        Self { bones, chains }
    }

    /// Build from the tracked points of a config
    pub fn from_config(bones: Arc<dyn BoneTransformProvider>, config: &SphereConfig) -> Self {
        Self::new(bones, config.tracked_points.clone())
    }

    /// Name of the joint currently used for a slot
    pub fn active_joint(&self, slot: TrackedSlot) -> Option<&str> {
        let chain = self.chains.iter().find(|c| c.slot == slot)?;
        chain
            .joints
            .iter()
            .find(|joint| self.bones.world_transform_by_name(joint).is_some())
            .map(String::as_str)
    }
}

impl TrackedPointProvider for JointChainTracker {
    fn position(&self, slot: TrackedSlot) -> Option<Vec3> {
        let chain = self.chains.iter().find(|c| c.slot == slot)?;
        chain
            .joints
            .iter()
            .find_map(|joint| self.bones.world_transform_by_name(joint))
            .map(|t| t.translation)
    }
}

impl std::fmt::Debug for JointChainTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JointChainTracker")
            .field("chains", &self.chains)
            .finish()
    }
}
