//! Tracked-point slots and per-slot inside flags

use serde::{Deserialize, Serialize};
use core::fmt;

/// A tracked interaction point (hand, fingertip, foot...) by slot index
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackedSlot(u8);

impl TrackedSlot {
    /// Primary hand (right hand in the default setup)
    pub const PRIMARY: Self = Self(0);
    /// Secondary hand (left hand in the default setup)
    pub const SECONDARY: Self = Self(1);
    /// Number of distinct slots a [`SlotMask`] can hold
    pub const MAX: usize = 32;

    /// Create a slot, `None` if the index does not fit in a [`SlotMask`]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < Self::MAX {
            Some(Self(index))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Device number reported to scripts (1-based, 0 means "none")
    #[inline]
    pub const fn device_id(self) -> u32 {
        self.0 as u32 + 1
    }
}

impl fmt::Debug for TrackedSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrackedSlot({})", self.0)
    }
}

impl fmt::Display for TrackedSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

/// One "currently inside" bit per tracked slot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SlotMask(u32);

impl SlotMask {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub fn contains(self, slot: TrackedSlot) -> bool {
        self.0 & (1 << slot.0) != 0
    }

    #[inline]
    pub fn insert(&mut self, slot: TrackedSlot) {
        self.0 |= 1 << slot.0;
    }

    #[inline]
    pub fn remove(&mut self, slot: TrackedSlot) {
        self.0 &= !(1 << slot.0);
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Slots whose bit is set, lowest first
    pub fn iter(self) -> impl Iterator<Item = TrackedSlot> {
        (0..TrackedSlot::MAX as u8)
            .filter(move |i| self.0 & (1 << i) != 0)
            .map(TrackedSlot)
    }
}
