//! Bone Spheres - Skeleton-Attached Trigger Spheres
//!
//! Spheres are anchored to skeleton bones and follow them every frame. Tracked
//! points (hands, fingertips) are tested against each sphere and Enter/Exit
//! events are broadcast to registered listeners.
//!
//! # Features
//!
//! - Bone-relative spheres with a local offset
//! - Per-slot hysteresis, no flapping at the boundary
//! - Never-reused handles
//! - Optional debug markers in the host scene graph
//! - Holster/Draw lifecycle broadcast
//! - Fingertip to hand fallback for tracked points
//!
//! # Example
//!
//! ```ignore
//! use bone_spheres::prelude::*;
//!
//! let spheres = BoneSpheres::with_skeleton_tracking(SphereConfig::load(), skeleton, scene)?;
//! let holster = spheres.create_volume(8.0, "Pelvis", Vec3::new(12.0, 0.0, -4.0))?;
//! spheres.register_listener(listener);
//!
//! // every frame, after bone transforms are final
//! spheres.on_frame_update();
//! ```

pub mod config;
pub mod context;
pub mod debug;
pub mod detector;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod handle;
pub mod provider;
pub mod registry;
pub mod slot;
pub mod tracker;
pub mod transform;
pub mod volume;

pub mod prelude {
    pub use crate::config::{DebugConfig, SphereConfig, TrackedPointConfig};
    pub use crate::context::BoneSpheres;
    pub use crate::detector::HYSTERESIS_MARGIN;
    pub use crate::dispatcher::{ListenerId, SphereListener};
    pub use crate::error::{ConfigError, SphereError};
    pub use crate::events::{LifecycleEvent, SphereEvent, SphereEventKind};
    pub use crate::handle::SphereHandle;
    pub use crate::provider::{
        BoneId, BoneTransformProvider, MarkerRef, NoScene, SceneGraphAdapter, TrackedPointProvider,
    };
    pub use crate::slot::TrackedSlot;
    pub use crate::transform::Transform;
    pub use crate::volume::MarkerState;
    pub use glam::{Quat, Vec3};
}

pub use prelude::*;
