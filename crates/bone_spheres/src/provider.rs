//! Collaborator interfaces
//!
//! The skeleton, the hand tracking source and the scene graph all live in the
//! host. Bone spheres only talk to them through these traits.

use crate::slot::TrackedSlot;
use crate::transform::Transform;
use glam::Vec3;

/// Live reference to a bone node, issued by a [`BoneTransformProvider`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoneId(pub u64);

/// Reference to a debug marker attached in the scene graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarkerRef(pub u64);

/// Source of bone world transforms
pub trait BoneTransformProvider: Send + Sync {
    /// Resolve a bone by name
    fn resolve_bone(&self, name: &str) -> Option<BoneId>;

    /// Current world transform of a bone, `None` if it is gone this frame
    fn world_transform(&self, bone: BoneId) -> Option<Transform>;

    /// Resolve and read in one step
    fn world_transform_by_name(&self, name: &str) -> Option<Transform> {
        self.resolve_bone(name)
            .and_then(|bone| self.world_transform(bone))
    }
}

/// Source of tracked interaction points
pub trait TrackedPointProvider: Send + Sync {
    /// World position of a slot, `None` if unavailable this frame
    fn position(&self, slot: TrackedSlot) -> Option<Vec3>;
}

/// Scene-graph operations needed for debug markers
pub trait SceneGraphAdapter: Send + Sync {
    /// Attach a sphere marker of the given diameter under a bone.
    /// `None` if the marker could not be created (e.g. missing mesh).
    fn attach_marker(&self, parent: BoneId, size: f32) -> Option<MarkerRef>;

    /// Detach a marker from its parent and release it
    fn detach_marker(&self, marker: MarkerRef);

    /// Show or hide a marker without releasing it
    fn set_marker_visible(&self, marker: MarkerRef, visible: bool);

    /// Set a marker's transform relative to its parent bone
    fn set_marker_transform(&self, marker: MarkerRef, local: Transform);
}

/// Scene adapter for hosts that never show debug markers
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScene;

impl SceneGraphAdapter for NoScene {
    fn attach_marker(&self, _parent: BoneId, _size: f32) -> Option<MarkerRef> {
        None
    }

    fn detach_marker(&self, _marker: MarkerRef) {}

    fn set_marker_visible(&self, _marker: MarkerRef, _visible: bool) {}

    fn set_marker_transform(&self, _marker: MarkerRef, _local: Transform) {}
}
