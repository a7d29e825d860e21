//! Sphere handles
//!
//! Handles are plain integers handed out to scripts. Unlike the generational
//! handles used for pooled resources, sphere handles are never recycled: the
//! allocator only moves forward, so a stale handle held by a script can never
//! alias a sphere created later.

use crate::error::{Result, SphereError};
use core::fmt;

/// Opaque identifier of a bone sphere
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct SphereHandle(u32);

impl SphereHandle {
    /// Reserved "creation failed" value
    pub const INVALID: Self = Self(0);

    /// Wrap a raw value received from a script
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw value for handing to a script
    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for SphereHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "SphereHandle({})", self.0)
        } else {
            write!(f, "SphereHandle(invalid)")
        }
    }
}

impl fmt::Display for SphereHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic handle allocator
#[derive(Debug)]
pub struct HandleAllocator {
    next: u32,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Issue the next handle
    pub fn allocate(&mut self) -> Result<SphereHandle> {
        if self.next == 0 {
            return Err(SphereError::HandlesExhausted);
        }
        let handle = SphereHandle(self.next);
        // Wraps to 0 after u32::MAX, which marks the space as exhausted
        self.next = self.next.wrapping_add(1);
        Ok(handle)
    }

    /// Number of handles issued so far
    pub fn issued(&self) -> u32 {
        self.next.wrapping_sub(1)
    }
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self::new()
    }
}
