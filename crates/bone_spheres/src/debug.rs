//! Debug marker reconciliation
//!
//! ```text
//! NoVisual --show--> Visible <--show/hide--> Hidden
//!     ^                                        |
//!     +------------- destroy (registry) -------+
//! ```
//!
//! A hidden marker stays attached so the next show is free.

use crate::provider::{BoneTransformProvider, SceneGraphAdapter};
use crate::registry::SphereRegistry;
use crate::volume::MarkerState;

/// Keeps debug markers in sync with their spheres
#[derive(Debug, Default)]
pub struct DebugVisualizer {
    attach_failures: u64,
}

impl DebugVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of marker attach attempts the scene has refused
    pub fn attach_failures(&self) -> u64 {
        self.attach_failures
    }

    /// Reconcile every sphere's marker with its visibility flag
    pub fn sync(
        &mut self,
        registry: &mut SphereRegistry,
        bones: &dyn BoneTransformProvider,
        scene: &dyn SceneGraphAdapter,
    ) {
        for (handle, sphere) in registry.iter_mut() {
            let next = match (sphere.marker, sphere.debug_visible) {
                (MarkerState::NoVisual, false) | (MarkerState::Hidden(_), false) => continue,
                (MarkerState::NoVisual, true) => {
                    match scene.attach_marker(sphere.bone(), sphere.diameter()) {
                        Some(marker) => {
                            log::debug!("Attached debug marker {:?} to sphere {}", marker, handle);
                            scene.set_marker_visible(marker, true);
                            MarkerState::Visible(marker)
                        }
                        None => {
                            self.attach_failures += 1;
                            log::trace!("Debug marker for sphere {} unavailable, retrying", handle);
                            continue;
                        }
                    }
                }
                (MarkerState::Hidden(marker), true) => {
                    scene.set_marker_visible(marker, true);
                    MarkerState::Visible(marker)
                }
                (MarkerState::Visible(marker), false) => {
                    scene.set_marker_visible(marker, false);
                    sphere.marker = MarkerState::Hidden(marker);
                    continue;
                }
                (visible @ MarkerState::Visible(_), true) => visible,
            };
            sphere.marker = next;

            let MarkerState::Visible(marker) = next else {
                continue;
            };
            if let Some(bone) = bones.world_transform(sphere.bone()) {
                scene.set_marker_transform(marker, sphere.marker_local_transform(&bone));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{BoneId, MarkerRef};
    use crate::transform::Transform;
    use glam::Vec3;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    struct Spine;

    impl BoneTransformProvider for Spine {
        fn resolve_bone(&self, _name: &str) -> Option<BoneId> {
            Some(BoneId(2))
        }

        fn world_transform(&self, _bone: BoneId) -> Option<Transform> {
            Some(Transform::from_translation(Vec3::new(0.0, 10.0, 0.0)))
        }
    }

    #[derive(Default)]
    struct Scene {
        refuse: AtomicBool,
        next: AtomicU64,
        calls: Mutex<Vec<String>>,
    }

    impl SceneGraphAdapter for Scene {
        fn attach_marker(&self, _parent: BoneId, size: f32) -> Option<MarkerRef> {
            if self.refuse.load(Ordering::SeqCst) {
                return None;
            }
            let id = self.next.fetch_add(1, Ordering::SeqCst) + 1;
            self.calls.lock().push(format!("attach {} {}", id, size));
            Some(MarkerRef(id))
        }

        fn detach_marker(&self, marker: MarkerRef) {
            self.calls.lock().push(format!("detach {}", marker.0));
        }

        fn set_marker_visible(&self, marker: MarkerRef, visible: bool) {
            self.calls.lock().push(format!("visible {} {}", marker.0, visible));
        }

        fn set_marker_transform(&self, marker: MarkerRef, _local: Transform) {
            self.calls.lock().push(format!("transform {}", marker.0));
        }
    }

    impl Scene {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.calls.lock())
        }
    }

    #[test]
    fn test_show_hide_show_reuses_marker() {
        let mut registry = SphereRegistry::new();
        let mut visualizer = DebugVisualizer::new();
        let scene = Scene::default();
        let h = registry.create(&Spine, 1.5, "Spine2", Vec3::ZERO).unwrap();

        registry.set_debug_visible(h, true);
        visualizer.sync(&mut registry, &Spine, &scene);
        assert_eq!(scene.take(), vec!["attach 1 3", "visible 1 true", "transform 1"]);

        registry.set_debug_visible(h, false);
        visualizer.sync(&mut registry, &Spine, &scene);
        visualizer.sync(&mut registry, &Spine, &scene);
        assert_eq!(scene.take(), vec!["visible 1 false"]);
        assert_eq!(registry.get(h).unwrap().marker_state(), MarkerState::Hidden(MarkerRef(1)));

        registry.set_debug_visible(h, true);
        visualizer.sync(&mut registry, &Spine, &scene);
        assert_eq!(scene.take(), vec!["visible 1 true", "transform 1"]);
        assert_eq!(scene.next.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_visible_marker_follows_every_frame() {
        let mut registry = SphereRegistry::new();
        let mut visualizer = DebugVisualizer::new();
        let scene = Scene::default();
        let h = registry.create(&Spine, 1.0, "Spine2", Vec3::X).unwrap();
        registry.set_debug_visible(h, true);

        for _ in 0..3 {
            visualizer.sync(&mut registry, &Spine, &scene);
        }
        let transforms = scene.take().iter().filter(|c| c.starts_with("transform")).count();
        assert_eq!(transforms, 3);
    }

    #[test]
    fn test_refused_attach_retries() {
        let mut registry = SphereRegistry::new();
        let mut visualizer = DebugVisualizer::new();
        let scene = Scene::default();
        let h = registry.create(&Spine, 1.0, "Spine2", Vec3::ZERO).unwrap();
        registry.set_debug_visible(h, true);

        scene.refuse.store(true, Ordering::SeqCst);
        visualizer.sync(&mut registry, &Spine, &scene);
        visualizer.sync(&mut registry, &Spine, &scene);
        assert_eq!(visualizer.attach_failures(), 2);
        assert_eq!(registry.get(h).unwrap().marker_state(), MarkerState::NoVisual);

        scene.refuse.store(false, Ordering::SeqCst);
        visualizer.sync(&mut registry, &Spine, &scene);
        assert_eq!(registry.get(h).unwrap().marker_state(), MarkerState::Visible(MarkerRef(1)));
    }

    #[test]
    fn test_hidden_sphere_never_attaches() {
        let mut registry = SphereRegistry::new();
        let mut visualizer = DebugVisualizer::new();
        let scene = Scene::default();
        registry.create(&Spine, 1.0, "Spine2", Vec3::ZERO).unwrap();

        visualizer.sync(&mut registry, &Spine, &scene);
        assert!(scene.take().is_empty());
    }
}
