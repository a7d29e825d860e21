//! Bone and marker transforms

use glam::{Quat, Vec3};

/// Rigid transform with uniform scale, as reported by the skeleton
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: 1.0,
        }
    }

    /// Set scale (builder pattern)
    #[inline]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// World position of a bone-local offset.
    ///
    /// Scale is not applied: sphere offsets are authored in world units
    /// relative to the bone's orientation.
    #[inline]
    pub fn offset_to_world(&self, offset: Vec3) -> Vec3 {
        self.rotation * offset + self.translation
    }

    /// Inverse of [`Transform::offset_to_world`]
    #[inline]
    pub fn world_to_offset(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.translation)
    }

    /// Compose a child's local transform onto this one
    pub fn mul_transform(&self, child: &Transform) -> Self {
        Self {
            translation: self.translation + self.rotation * (child.translation * self.scale),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
