//! In-memory skeleton and a scene graph that logs marker operations

use crate::scenario::BoneDef;
use bone_spheres::{BoneId, BoneTransformProvider, MarkerRef, SceneGraphAdapter, Transform};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

struct Node {
    name: String,
    parent: Option<usize>,
    local: Transform,
    present: bool,
}

/// Bone hierarchy whose world transforms are composed on demand
#[derive(Default)]
pub struct Skeleton {
    nodes: RwLock<Vec<Node>>,
}

impl Skeleton {
    /// Build from bone definitions; parents must precede children
    pub fn from_defs(defs: &[BoneDef]) -> Self {
        let skeleton = Self::default();
        {
            let mut nodes = skeleton.nodes.write();
            for def in defs {
                let parent = def
                    .parent
                    .as_ref()
                    .and_then(|p| nodes.iter().position(|n| &n.name == p));
                nodes.push(Node {
                    name: def.name.clone(),
                    parent,
                    local: def.local_transform(),
                    present: def.present,
                });
            }
        }
        skeleton
    }

    pub fn set_local(&self, name: &str, local: Transform) {
        if let Some(node) = self.nodes.write().iter_mut().find(|n| n.name == name) {
            node.local = local;
        }
    }

    pub fn set_present(&self, name: &str, present: bool) {
        if let Some(node) = self.nodes.write().iter_mut().find(|n| n.name == name) {
            node.present = present;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }
}

impl BoneTransformProvider for Skeleton {
    fn resolve_bone(&self, name: &str) -> Option<BoneId> {
        self.nodes
            .read()
            .iter()
            .position(|n| n.name == name && n.present)
            .map(|i| BoneId(i as u64))
    }

    fn world_transform(&self, bone: BoneId) -> Option<Transform> {
        let nodes = self.nodes.read();
        let mut index = Some(bone.0 as usize);
        let mut world = Transform::IDENTITY;
        while let Some(i) = index {
            let node = nodes.get(i)?;
            if !node.present {
                return None;
            }
            world = node.local.mul_transform(&world);
            index = node.parent;
        }
        Some(world)
    }
}

#[derive(Debug, Clone, Copy)]
struct MarkerInfo {
    parent: BoneId,
    visible: bool,
}

/// Scene graph stand-in that logs every marker operation
#[derive(Default)]
pub struct LoggingScene {
    next: AtomicU64,
    markers: Mutex<HashMap<MarkerRef, MarkerInfo>>,
}

impl LoggingScene {
    /// (attached, visible)
    pub fn marker_summary(&self) -> (usize, usize) {
        let markers = self.markers.lock();
        (markers.len(), markers.values().filter(|m| m.visible).count())
    }
}

impl SceneGraphAdapter for LoggingScene {
    fn attach_marker(&self, parent: BoneId, size: f32) -> Option<MarkerRef> {
        let marker = MarkerRef(self.next.fetch_add(1, Ordering::Relaxed) + 1);
        log::info!("scene: attach marker {} under bone {} (size {})", marker.0, parent.0, size);
        self.markers.lock().insert(
            marker,
            MarkerInfo {
                parent,
                visible: false,
            },
        );
        Some(marker)
    }

    fn detach_marker(&self, marker: MarkerRef) {
        if let Some(info) = self.markers.lock().remove(&marker) {
            log::info!("scene: detach marker {} from bone {}", marker.0, info.parent.0);
        }
    }

    fn set_marker_visible(&self, marker: MarkerRef, visible: bool) {
        if let Some(info) = self.markers.lock().get_mut(&marker) {
            info.visible = visible;
        }
        log::info!("scene: marker {} {}", marker.0, if visible { "shown" } else { "hidden" });
    }

    fn set_marker_transform(&self, marker: MarkerRef, local: Transform) {
        log::trace!("scene: marker {} at {:?} scale {}", marker.0, local.translation, local.scale);
    }
}
