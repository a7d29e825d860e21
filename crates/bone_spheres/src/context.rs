//! The bone sphere context
//!
//! [`BoneSpheres`] owns the registry, the detector, the debug visualizer and
//! the listener set. Frame state sits behind one mutex that is held for the
//! whole detection and visualization pass; events are delivered after it is
//! released, still inside [`BoneSpheres::on_frame_update`], so listeners may
//! create or destroy spheres while handling an event.

use crate::config::SphereConfig;
use crate::debug::DebugVisualizer;
use crate::detector::ProximityDetector;
use crate::dispatcher::{EventDispatcher, ListenerId, SphereListener};
use crate::error::{ConfigError, Result};
use crate::events::{LifecycleEvent, SphereEvent};
use crate::handle::SphereHandle;
use crate::provider::{BoneTransformProvider, SceneGraphAdapter, TrackedPointProvider};
use crate::registry::SphereRegistry;
use crate::slot::TrackedSlot;
use crate::tracker::JointChainTracker;
use glam::Vec3;
use parking_lot::Mutex;
use std::sync::Arc;

struct FrameState {
    registry: SphereRegistry,
    detector: ProximityDetector,
    visualizer: DebugVisualizer,
    /// Reused across frames
    events: Vec<SphereEvent>,
}

/// Bone-attached trigger spheres with hysteresis and event broadcast
pub struct BoneSpheres {
    config: SphereConfig,
    state: Mutex<FrameState>,
    dispatcher: EventDispatcher,
    bones: Arc<dyn BoneTransformProvider>,
    points: Arc<dyn TrackedPointProvider>,
    scene: Arc<dyn SceneGraphAdapter>,
}

impl BoneSpheres {
    /// Create a context over explicit collaborators
    pub fn new(
        config: SphereConfig,
        bones: Arc<dyn BoneTransformProvider>,
        points: Arc<dyn TrackedPointProvider>,
        scene: Arc<dyn SceneGraphAdapter>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let detector = ProximityDetector::new(config.slots());
        log::info!(
            "Bone spheres tracking {} points (debug markers {})",
            detector.slots().len(),
            if config.debug.markers_visible { "on" } else { "off" }
        );

        Ok(Self {
            state: Mutex::new(FrameState {
                registry: SphereRegistry::new(),
                detector,
                visualizer: DebugVisualizer::new(),
                events: Vec::new(),
            }),
            dispatcher: EventDispatcher::new(),
            config,
            bones,
            points,
            scene,
        })
    }

    /// Create a context whose tracked points are read from skeleton joints
    pub fn with_skeleton_tracking(
        config: SphereConfig,
        bones: Arc<dyn BoneTransformProvider>,
        scene: Arc<dyn SceneGraphAdapter>,
    ) -> std::result::Result<Self, ConfigError> {
        let tracker = Arc::new(JointChainTracker::from_config(bones.clone(), &config));
        Self::new(config, bones, tracker, scene)
    }

    pub fn config(&self) -> &SphereConfig {
        &self.config
    }

    /// Create a sphere of `radius` around `offset` in `bone_name`'s frame
    pub fn create_volume(&self, radius: f32, bone_name: &str, offset: Vec3) -> Result<SphereHandle> {
        let mut state = self.state.lock();
        let handle = state
            .registry
            .create(self.bones.as_ref(), radius, bone_name, offset)?;
        if self.config.debug.markers_visible {
            state.registry.set_debug_visible(handle, true);
        }
        Ok(handle)
    }

    /// Destroy a sphere and its marker. Unknown handles are ignored.
    pub fn destroy_volume(&self, handle: SphereHandle) {
        self.state.lock().registry.destroy(self.scene.as_ref(), handle);
    }

    pub fn set_volume_debug_visible(&self, handle: SphereHandle, visible: bool) {
        self.state.lock().registry.set_debug_visible(handle, visible);
    }

    pub fn set_all_debug_visible(&self, visible: bool) {
        self.state.lock().registry.set_debug_visible_all(visible);
    }

    pub fn register_listener(&self, listener: Arc<dyn SphereListener>) {
        self.dispatcher.register(listener);
    }

    pub fn unregister_listener(&self, id: &ListenerId) {
        self.dispatcher.unregister(id);
    }

    /// Run detection and marker sync for one frame, then deliver the events.
    ///
    /// With no listeners registered, inside flags still update but no events
    /// are recorded. An Enter or Exit whose sphere was destroyed by an earlier
    /// listener in the same frame is dropped.
    pub fn on_frame_update(&self) {
        let listening = !self.dispatcher.is_empty();

        let mut events = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let mut events = std::mem::take(&mut state.events);

            state.detector.detect(
                &mut state.registry,
                self.bones.as_ref(),
                self.points.as_ref(),
                listening.then_some(&mut events),
            );
            state
                .visualizer
                .sync(&mut state.registry, self.bones.as_ref(), self.scene.as_ref());
            events
        };

        for event in events.drain(..) {
            if let Some(handle) = event.handle() {
                if !self.state.lock().registry.contains(handle) {
                    log::trace!("Dropping {:?}: sphere {} was destroyed", event, handle);
                    continue;
                }
            }
            self.dispatcher.dispatch(event);
        }

        // Keep the allocation unless a listener ran a nested frame meanwhile
        let mut state = self.state.lock();
        if state.events.capacity() < events.capacity() {
            state.events = events;
        }
    }

    /// Broadcast a holster or draw notification to every listener
    pub fn broadcast_lifecycle_event(&self, event: LifecycleEvent) {
        log::debug!("Broadcasting {:?}", event);
        self.dispatcher.dispatch(event.into());
    }

    /// Slot of the most recent Enter, cleared by any Exit
    pub fn active_slot(&self) -> Option<TrackedSlot> {
        self.state.lock().detector.active_slot()
    }

    pub fn volume_count(&self) -> usize {
        self.state.lock().registry.len()
    }

    pub fn contains_volume(&self, handle: SphereHandle) -> bool {
        self.state.lock().registry.contains(handle)
    }

    /// Run `f` against the registry under the frame lock
    pub fn with_registry<R>(&self, f: impl FnOnce(&SphereRegistry) -> R) -> R {
        f(&self.state.lock().registry)
    }

    pub fn listener_count(&self) -> usize {
        self.dispatcher.len()
    }

    /// Destroy every sphere and drop every listener
    pub fn shutdown(&self) {
        self.state.lock().registry.clear(self.scene.as_ref());
        self.dispatcher.clear();
        log::info!("Bone spheres shut down");
    }
}

impl std::fmt::Debug for BoneSpheres {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoneSpheres")
            .field("config", &self.config)
            .field("volumes", &self.volume_count())
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackedPointConfig;
    use crate::provider::{BoneId, NoScene};
    use crate::transform::Transform;

    struct Fixed;

    impl BoneTransformProvider for Fixed {
        fn resolve_bone(&self, name: &str) -> Option<BoneId> {
            (name == "Spine2").then_some(BoneId(1))
        }

        fn world_transform(&self, _bone: BoneId) -> Option<Transform> {
            Some(Transform::IDENTITY)
        }
    }

    struct Origin;

    impl TrackedPointProvider for Origin {
        fn position(&self, _slot: TrackedSlot) -> Option<Vec3> {
            Some(Vec3::ZERO)
        }
    }

    fn context(config: SphereConfig) -> BoneSpheres {
        BoneSpheres::new(config, Arc::new(Fixed), Arc::new(Origin), Arc::new(NoScene)).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let point = TrackedPointConfig::new(TrackedSlot::PRIMARY, "", ["RArm_Hand"]);
        let config = SphereConfig::default().with_tracked_points(vec![point.clone(), point]);
        let result = BoneSpheres::new(config, Arc::new(Fixed), Arc::new(Origin), Arc::new(NoScene));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_markers_visible_config() {
        let spheres = context(SphereConfig::default().with_markers_visible(true));
        let h = spheres.create_volume(1.0, "Spine2", Vec3::ZERO).unwrap();
        assert!(spheres.with_registry(|r| r.get(h).unwrap().debug_visible()));
    }

    #[test]
    fn test_frame_without_listeners() {
        let spheres = context(SphereConfig::default());
        spheres.create_volume(1.0, "Spine2", Vec3::ZERO).unwrap();
        spheres.on_frame_update();
        assert_eq!(spheres.active_slot(), Some(TrackedSlot::SECONDARY));
    }

    #[test]
    fn test_shutdown_clears_everything() {
        let spheres = context(SphereConfig::default());
        spheres.create_volume(1.0, "Spine2", Vec3::ZERO).unwrap();
        spheres.shutdown();
        assert_eq!(spheres.volume_count(), 0);
        assert_eq!(spheres.listener_count(), 0);
    }
}
