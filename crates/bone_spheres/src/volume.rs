//! Bone sphere volume

use crate::provider::{BoneId, MarkerRef};
use crate::slot::{SlotMask, TrackedSlot};
use crate::transform::Transform;
use glam::Vec3;

/// Debug marker lifecycle of one sphere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerState {
    /// No marker allocated
    #[default]
    NoVisual,
    /// Marker attached and shown
    Visible(MarkerRef),
    /// Marker attached but hidden, kept for the next show
    Hidden(MarkerRef),
}

impl MarkerState {
    pub fn marker(self) -> Option<MarkerRef> {
        match self {
            Self::NoVisual => None,
            Self::Visible(marker) | Self::Hidden(marker) => Some(marker),
        }
    }
}

/// A spherical trigger zone anchored to a bone
#[derive(Debug, Clone)]
pub struct BoneSphere {
    radius: f32,
    bone: BoneId,
    bone_name: String,
    offset: Vec3,
    inside: SlotMask,
    pub(crate) debug_visible: bool,
    pub(crate) marker: MarkerState,
}

impl BoneSphere {
    /// Radius must already be validated by the registry
    pub(crate) fn new(radius: f32, bone: BoneId, bone_name: String, offset: Vec3) -> Self {
        Self {
            radius,
            bone,
            bone_name,
            offset,
            inside: SlotMask::EMPTY,
            debug_visible: false,
            marker: MarkerState::NoVisual,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn bone(&self) -> BoneId {
        self.bone
    }

    pub fn bone_name(&self) -> &str {
        &self.bone_name
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Whether a slot is currently considered inside
    pub fn is_inside(&self, slot: TrackedSlot) -> bool {
        self.inside.contains(slot)
    }

    pub fn inside_mask(&self) -> SlotMask {
        self.inside
    }

    pub(crate) fn set_inside(&mut self, slot: TrackedSlot, inside: bool) {
        if inside {
            self.inside.insert(slot);
        } else {
            self.inside.remove(slot);
        }
    }

    pub fn debug_visible(&self) -> bool {
        self.debug_visible
    }

    pub fn marker_state(&self) -> MarkerState {
        self.marker
    }

    /// World-space center for the bone's current transform
    #[inline]
    pub fn world_center(&self, bone: &Transform) -> Vec3 {
        bone.offset_to_world(self.offset)
    }

    /// Marker transform relative to the anchor bone
    pub fn marker_local_transform(&self, bone: &Transform) -> Transform {
        let local = bone.world_to_offset(self.world_center(bone));
        Transform::from_translation(local).with_scale(self.diameter())
    }

    #[inline]
    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }
}
