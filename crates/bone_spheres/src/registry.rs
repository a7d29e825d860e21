//! Sphere registry: creation, destruction and visibility flags

use crate::detector::HYSTERESIS_MARGIN;
use crate::error::{Result, SphereError};
use crate::handle::{HandleAllocator, SphereHandle};
use crate::provider::{BoneTransformProvider, SceneGraphAdapter};
use crate::volume::BoneSphere;
use glam::Vec3;
use std::collections::BTreeMap;

/// Owns every live bone sphere, keyed by handle
#[derive(Debug, Default)]
pub struct SphereRegistry {
    spheres: BTreeMap<SphereHandle, BoneSphere>,
    handles: HandleAllocator,
}

impl SphereRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sphere anchored to a bone.
    ///
    /// No handle is consumed when validation fails.
    pub fn create(
        &mut self,
        bones: &dyn BoneTransformProvider,
        radius: f32,
        bone_name: &str,
        offset: Vec3,
    ) -> Result<SphereHandle> {
        if !(radius > 0.0) {
            log::warn!("Bone sphere on '{}' rejected: invalid radius {}", bone_name, radius);
            return Err(SphereError::InvalidRadius(radius));
        }

        let Some(bone) = bones.resolve_bone(bone_name) else {
            log::warn!("Bone sphere rejected: bone '{}' does not exist", bone_name);
            return Err(SphereError::BoneNotFound(bone_name.to_string()));
        };

        if radius <= HYSTERESIS_MARGIN {
            log::warn!(
                "Bone sphere on '{}' has radius {} within the hysteresis margin; it will never report Enter",
                bone_name,
                radius
            );
        }

        let handle = self.handles.allocate().map_err(|e| {
            log::error!("Bone sphere on '{}' rejected: {}", bone_name, e);
            e
        })?;
        self.spheres
            .insert(handle, BoneSphere::new(radius, bone, bone_name.to_string(), offset));

        log::debug!(
            "Created bone sphere {} on '{}' (radius {}, offset {:?})",
            handle,
            bone_name,
            radius,
            offset
        );
        Ok(handle)
    }

    /// Destroy a sphere and release its marker. Unknown handles are ignored.
    pub fn destroy(&mut self, scene: &dyn SceneGraphAdapter, handle: SphereHandle) -> bool {
        let Some(sphere) = self.spheres.remove(&handle) else {
            log::debug!("Destroy of unknown bone sphere {} ignored", handle);
            return false;
        };

        if let Some(marker) = sphere.marker.marker() {
            scene.set_marker_visible(marker, false);
            scene.detach_marker(marker);
        }
        log::debug!("Destroyed bone sphere {} on '{}'", handle, sphere.bone_name());
        true
    }

    /// Request or drop the debug marker of one sphere
    pub fn set_debug_visible(&mut self, handle: SphereHandle, visible: bool) {
        match self.spheres.get_mut(&handle) {
            Some(sphere) => sphere.debug_visible = visible,
            None => log::debug!("Debug toggle on unknown bone sphere {} ignored", handle),
        }
    }

    /// Request or drop the debug marker of every sphere
    pub fn set_debug_visible_all(&mut self, visible: bool) {
        for sphere in self.spheres.values_mut() {
            sphere.debug_visible = visible;
        }
    }

    /// Destroy every sphere, releasing all markers
    pub fn clear(&mut self, scene: &dyn SceneGraphAdapter) {
        let handles: Vec<_> = self.spheres.keys().copied().collect();
        for handle in handles {
            self.destroy(scene, handle);
        }
    }

    pub fn get(&self, handle: SphereHandle) -> Option<&BoneSphere> {
        self.spheres.get(&handle)
    }

    pub(crate) fn get_mut(&mut self, handle: SphereHandle) -> Option<&mut BoneSphere> {
        self.spheres.get_mut(&handle)
    }

    pub fn contains(&self, handle: SphereHandle) -> bool {
        self.spheres.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SphereHandle, &BoneSphere)> {
        self.spheres.iter().map(|(h, s)| (*h, s))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (SphereHandle, &mut BoneSphere)> {
        self.spheres.iter_mut().map(|(h, s)| (*h, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{BoneId, MarkerRef, NoScene};
    use crate::transform::Transform;
    use crate::volume::MarkerState;
    use parking_lot::Mutex;

    struct OneBone;

    impl BoneTransformProvider for OneBone {
        fn resolve_bone(&self, name: &str) -> Option<BoneId> {
            (name == "LArm_ForeArm3").then_some(BoneId(3))
        }

        fn world_transform(&self, _bone: BoneId) -> Option<Transform> {
            Some(Transform::IDENTITY)
        }
    }

    #[derive(Default)]
    struct DetachLog {
        detached: Mutex<Vec<MarkerRef>>,
    }

    impl SceneGraphAdapter for DetachLog {
        fn attach_marker(&self, _parent: BoneId, _size: f32) -> Option<MarkerRef> {
            None
        }

        fn detach_marker(&self, marker: MarkerRef) {
            self.detached.lock().push(marker);
        }

        fn set_marker_visible(&self, _marker: MarkerRef, _visible: bool) {}

        fn set_marker_transform(&self, _marker: MarkerRef, _local: Transform) {}
    }

    #[test]
    fn test_create_and_destroy() {
        let mut registry = SphereRegistry::new();
        let handle = registry.create(&OneBone, 5.0, "LArm_ForeArm3", Vec3::ZERO).unwrap();

        assert!(registry.contains(handle));
        assert_eq!(registry.get(handle).unwrap().radius(), 5.0);
        assert!(registry.destroy(&NoScene, handle));
        assert!(!registry.contains(handle));
        assert!(!registry.destroy(&NoScene, handle));
    }

    #[test]
    fn test_invalid_radius_consumes_no_handle() {
        let mut registry = SphereRegistry::new();
        for radius in [0.0, -1.0, f32::NAN] {
            let err = registry.create(&OneBone, radius, "LArm_ForeArm3", Vec3::ZERO);
            assert!(matches!(err, Err(SphereError::InvalidRadius(_))));
        }
        let handle = registry.create(&OneBone, 1.0, "LArm_ForeArm3", Vec3::ZERO).unwrap();
        assert_eq!(handle.to_raw(), 1);
    }

    #[test]
    fn test_unknown_bone() {
        let mut registry = SphereRegistry::new();
        let err = registry.create(&OneBone, 1.0, "Tail", Vec3::ZERO).unwrap_err();
        assert_eq!(err, SphereError::BoneNotFound("Tail".to_string()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_handles_never_reused() {
        let mut registry = SphereRegistry::new();
        let first: Vec<_> = (0..4)
            .map(|_| registry.create(&OneBone, 1.0, "LArm_ForeArm3", Vec3::ZERO).unwrap())
            .collect();
        registry.destroy(&NoScene, first[1]);
        registry.destroy(&NoScene, first[3]);

        let next = registry.create(&OneBone, 1.0, "LArm_ForeArm3", Vec3::ZERO).unwrap();
        assert!(!first.contains(&next));
        assert!(first.iter().all(|h| *h < next));
    }

    #[test]
    fn test_visibility_toggles() {
        let mut registry = SphereRegistry::new();
        let a = registry.create(&OneBone, 1.0, "LArm_ForeArm3", Vec3::ZERO).unwrap();
        let b = registry.create(&OneBone, 2.0, "LArm_ForeArm3", Vec3::ZERO).unwrap();

        registry.set_debug_visible(a, true);
        assert!(registry.get(a).unwrap().debug_visible());
        assert!(!registry.get(b).unwrap().debug_visible());

        registry.set_debug_visible(SphereHandle::from_raw(999), true);

        registry.set_debug_visible_all(true);
        assert!(registry.iter().all(|(_, s)| s.debug_visible()));
        registry.set_debug_visible_all(false);
        assert!(registry.iter().all(|(_, s)| !s.debug_visible()));
    }

    #[test]
    fn test_destroy_releases_marker() {
        let mut registry = SphereRegistry::new();
        let scene = DetachLog::default();
        let handle = registry.create(&OneBone, 1.0, "LArm_ForeArm3", Vec3::ZERO).unwrap();
        registry.get_mut(handle).unwrap().marker = MarkerState::Hidden(MarkerRef(11));

        registry.destroy(&scene, handle);
        assert_eq!(*scene.detached.lock(), vec![MarkerRef(11)]);
    }

    #[test]
    fn test_clear() {
        let mut registry = SphereRegistry::new();
        let scene = DetachLog::default();
        for _ in 0..3 {
            let h = registry.create(&OneBone, 1.0, "LArm_ForeArm3", Vec3::ZERO).unwrap();
            registry.get_mut(h).unwrap().marker = MarkerState::Visible(MarkerRef(h.to_raw() as u64));
        }
        registry.clear(&scene);
        assert!(registry.is_empty());
        assert_eq!(scene.detached.lock().len(), 3);
    }
}
