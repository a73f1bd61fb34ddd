// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable handles.
//!
//! A [`DrawableId`] pairs a slot index with the slot's generation at the time
//! the drawable was created. Destroying a drawable bumps the generation, so
//! handles held by a feature or session after its tile was unloaded no longer
//! validate even when the slot has been reused by a newer tile.

use core::fmt;

/// Marks an empty parent, child or sibling link.
pub const INVALID: u32 = u32::MAX;

/// A handle to a drawable in a [`DrawableScene`](super::DrawableScene).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawableId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl DrawableId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self { idx, generation }
    }

    /// The slot index. Presenters key their caches by it, and it is the
    /// value reported in [`SceneChanges`](super::SceneChanges).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// The slot generation this handle was issued for.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for DrawableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DrawableId(#{} v{})", self.idx, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn debug_shows_slot_and_generation() {
        assert_eq!(format!("{:?}", DrawableId::new(4, 2)), "DrawableId(#4 v2)");
    }

    #[test]
    fn generation_distinguishes_reused_slots() {
        assert_ne!(
            DrawableId::new(1, 0),
            DrawableId::new(1, 1),
            "same slot, different lifetime"
        );
    }
}
