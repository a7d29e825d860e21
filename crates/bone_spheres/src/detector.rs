//! Per-frame proximity detection with hysteresis
//!
//! Each sphere keeps one "inside" bit per tracked slot. A slot only enters once
//! it is `HYSTERESIS_MARGIN` inside the surface and only exits once it is the
//! same distance outside, so jitter at the boundary produces no events.

use crate::events::SphereEvent;
use crate::provider::{BoneTransformProvider, TrackedPointProvider};
use crate::registry::SphereRegistry;
use crate::slot::TrackedSlot;
use glam::Vec3;

/// Half-width of the dead zone around the sphere surface
pub const HYSTERESIS_MARGIN: f32 = 0.1;

/// Result of evaluating one slot against one sphere
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Enter,
    Exit,
}

/// Apply the hysteresis rule to a single slot
#[inline]
pub fn evaluate(was_inside: bool, distance: f32, radius: f32) -> Option<Transition> {
    if !was_inside && distance <= radius - HYSTERESIS_MARGIN {
        Some(Transition::Enter)
    } else if was_inside && distance >= radius + HYSTERESIS_MARGIN {
        Some(Transition::Exit)
    } else {
        None
    }
}

/// Evaluates every sphere against every tracked slot once per frame
#[derive(Debug)]
pub struct ProximityDetector {
    slots: Vec<TrackedSlot>,
    positions: Vec<Option<Vec3>>,
    active_slot: Option<TrackedSlot>,
}

impl ProximityDetector {
    pub fn new(slots: impl IntoIterator<Item = TrackedSlot>) -> Self {
        let slots: Vec<_> = slots.into_iter().collect();
        let positions = Vec::with_capacity(slots.len());
        Self {
            slots,
            positions,
            active_slot: None,
        }
    }

    pub fn slots(&self) -> &[TrackedSlot] {
        &self.slots
    }

    /// Slot of the most recent Enter, cleared by any Exit
    pub fn active_slot(&self) -> Option<TrackedSlot> {
        self.active_slot
    }

    /// Run one detection pass, appending fired events to `events`.
    ///
    /// With `events` set to `None` inside flags and the active slot are still
    /// updated, but nothing is recorded.
    pub fn detect(
        &mut self,
        registry: &mut SphereRegistry,
        bones: &dyn BoneTransformProvider,
        points: &dyn TrackedPointProvider,
        mut events: Option<&mut Vec<SphereEvent>>,
    ) {
        self.positions.clear();
        self.positions
            .extend(self.slots.iter().map(|slot| points.position(*slot)));

        for (handle, sphere) in registry.iter_mut() {
            let Some(bone) = bones.world_transform(sphere.bone()) else {
                log::trace!(
                    "Bone '{}' of sphere {} has no transform this frame",
                    sphere.bone_name(),
                    handle
                );
                continue;
            };
            let center = sphere.world_center(&bone);

            for (slot, position) in self.slots.iter().zip(&self.positions) {
                let Some(position) = position else {
                    continue;
                };
                let slot = *slot;
                let distance = position.distance(center);

                let event = match evaluate(sphere.is_inside(slot), distance, sphere.radius()) {
                    Some(Transition::Enter) => {
                        sphere.set_inside(slot, true);
                        self.active_slot = Some(slot);
                        log::trace!("{} entered sphere {} at {:.3}", slot, handle, distance);
                        SphereEvent::Enter { handle, slot }
                    }
                    Some(Transition::Exit) => {
                        sphere.set_inside(slot, false);
                        self.active_slot = None;
                        log::trace!("{} left sphere {} at {:.3}", slot, handle, distance);
                        SphereEvent::Exit { handle, slot }
                    }
                    None => continue,
                };
                if let Some(events) = events.as_deref_mut() {
                    events.push(event);
                }
            }
        }
    }
}
