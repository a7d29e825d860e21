//! Bone sphere events

use crate::handle::SphereHandle;
use crate::slot::TrackedSlot;
use serde::{Deserialize, Serialize};

/// Kind of a bone sphere event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SphereEventKind {
    /// Tracked point entered a sphere
    Enter,
    /// Tracked point left a sphere
    Exit,
    /// Host asked scripts to holster the weapon
    Holster,
    /// Host asked scripts to draw the weapon
    Draw,
}

impl SphereEventKind {
    /// Integer code used by scripting hosts
    pub const fn code(self) -> i32 {
        match self {
            Self::Enter => 1,
            Self::Exit => 2,
            Self::Holster => 3,
            Self::Draw => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Enter),
            2 => Some(Self::Exit),
            3 => Some(Self::Holster),
            4 => Some(Self::Draw),
            _ => None,
        }
    }
}

/// Global lifecycle notifications, not tied to a sphere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Holster,
    Draw,
}

/// A bone sphere event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SphereEvent {
    Enter {
        handle: SphereHandle,
        slot: TrackedSlot,
    },
    Exit {
        handle: SphereHandle,
        slot: TrackedSlot,
    },
    Holster,
    Draw,
}

impl SphereEvent {
    pub fn kind(&self) -> SphereEventKind {
        match self {
            Self::Enter { .. } => SphereEventKind::Enter,
            Self::Exit { .. } => SphereEventKind::Exit,
            Self::Holster => SphereEventKind::Holster,
            Self::Draw => SphereEventKind::Draw,
        }
    }

    /// Sphere the event refers to, `None` for lifecycle events
    pub fn handle(&self) -> Option<SphereHandle> {
        match *self {
            Self::Enter { handle, .. } | Self::Exit { handle, .. } => Some(handle),
            Self::Holster | Self::Draw => None,
        }
    }

    /// Slot the event refers to, `None` for lifecycle events
    pub fn slot(&self) -> Option<TrackedSlot> {
        match *self {
            Self::Enter { slot, .. } | Self::Exit { slot, .. } => Some(slot),
            Self::Holster | Self::Draw => None,
        }
    }

    pub fn is_enter(&self) -> bool {
        matches!(self, Self::Enter { .. })
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Exit { .. })
    }
}

impl From<LifecycleEvent> for SphereEvent {
    fn from(event: LifecycleEvent) -> Self {
        match event {
            LifecycleEvent::Holster => Self::Holster,
            LifecycleEvent::Draw => Self::Draw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors() {
        let handle = SphereHandle::from_raw(3);
        let event = SphereEvent::Enter {
            handle,
            slot: TrackedSlot::SECONDARY,
        };

        assert!(event.is_enter());
        assert_eq!(event.handle(), Some(handle));
        assert_eq!(event.slot(), Some(TrackedSlot::SECONDARY));
        assert_eq!(event.kind().code(), 1);
    }

    #[test]
    fn test_lifecycle_has_no_payload() {
        let event = SphereEvent::from(LifecycleEvent::Draw);
        assert_eq!(event, SphereEvent::Draw);
        assert!(event.handle().is_none());
        assert!(event.slot().is_none());
    }

    #[test]
    fn test_codes_are_stable() {
        for kind in [
            SphereEventKind::Enter,
            SphereEventKind::Exit,
            SphereEventKind::Holster,
            SphereEventKind::Draw,
        ] {
            assert_eq!(SphereEventKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(SphereEventKind::from_code(0), None);
    }
}
