// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays drawable storage with allocation, topology, and attribute
//! management.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Vec2;
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{DrawableId, INVALID};
use super::paint::Paint;
use super::primitive::Primitive;
use crate::dirty;

/// Per-drawable boolean flags.
///
/// Setting [`hidden`](Self::hidden) suppresses the drawable and its entire
/// subtree. Attributes can still be mutated while hidden; unhiding restores
/// state immediately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DrawableFlags {
    /// Whether the drawable (and its subtree) is hidden.
    pub hidden: bool,
}

/// Struct-of-arrays storage for all drawables.
///
/// Drawables are addressed by [`DrawableId`] handles. Internally, each
/// drawable occupies a slot in parallel arrays. Destroyed drawables are
/// recycled via a free list, and generation counters prevent stale handle
/// access.
#[derive(Debug)]
pub struct DrawableScene {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Attributes (set by callers) --
    pub(crate) primitive: Vec<Primitive>,
    pub(crate) paint: Vec<Paint>,
    pub(crate) offset: Vec<Vec2>,
    pub(crate) flags: Vec<DrawableFlags>,

    // -- Computed (written by evaluate) --
    pub(crate) effective_hidden: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for DrawableScene {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawableScene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            primitive: Vec::new(),
            paint: Vec::new(),
            offset: Vec::new(),
            flags: Vec::new(),
            effective_hidden: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a detached drawable and returns its handle.
    pub fn create(&mut self, primitive: Primitive, paint: Paint) -> DrawableId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.primitive[idx as usize] = primitive;
            self.paint[idx as usize] = paint;
            self.offset[idx as usize] = Vec2::ZERO;
            self.flags[idx as usize] = DrawableFlags::default();
            self.effective_hidden[idx as usize] = false;
            self.alive[idx as usize] = true;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.primitive.push(primitive);
            self.paint.push(paint);
            self.offset.push(Vec2::ZERO);
            self.flags.push(DrawableFlags::default());
            self.effective_hidden.push(false);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };

        self.traversal_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        DrawableId::new(idx, self.generation[idx as usize])
    }

    /// Creates a detached, empty group.
    pub fn create_group(&mut self) -> DrawableId {
        self.create(Primitive::Group, Paint::NONE)
    }

    /// Destroys a drawable, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the drawable has children (use
    /// [`destroy_subtree`](Self::destroy_subtree)) or if the handle is stale.
    pub fn destroy(&mut self, id: DrawableId) {
        self.validate(id);
        assert!(
            self.first_child[id.idx as usize] == INVALID,
            "cannot destroy drawable with children"
        );
        self.release(id.idx);
    }

    /// Detaches a drawable and destroys it together with all descendants.
    ///
    /// Returns the number of drawables destroyed.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_subtree(&mut self, id: DrawableId) -> usize {
        self.validate(id);
        let mut order = Vec::new();
        let mut stack = vec![id.idx];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            let mut child = self.first_child[idx as usize];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
        }
        // Children before parents, so every released slot is a leaf.
        for &idx in order.iter().rev() {
            self.release(idx);
        }
        order.len()
    }

    /// Returns whether the given handle refers to a live drawable.
    #[must_use]
    pub fn is_alive(&self, id: DrawableId) -> bool {
        self.is_live_slot(id.idx) && self.generation[id.idx as usize] == id.generation
    }

    /// Number of live drawables.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology API --

    /// Adds `child` as the last (topmost) child of `parent`.
    ///
    /// Marks the visibility channel for `child`'s subtree so effective hidden
    /// state is recomputed under the new ancestry.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: DrawableId, child: DrawableId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        // Child depends on parent for VISIBILITY.
        let _ = self.dirty.add_dependency(c, p, dirty::VISIBILITY);

        self.dirty.mark_with(c, dirty::VISIBILITY, &EagerPolicy);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Removes `child` from its current parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the drawable has no parent.
    pub fn remove_from_parent(&mut self, child: DrawableId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "drawable has no parent");

        let p = self.parent[c as usize];
        self.unlink_from_parent(c);
        self.dirty.remove_dependency(c, p, dirty::VISIBILITY);

        self.dirty.mark_with(c, dirty::VISIBILITY, &EagerPolicy);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Returns the parent of a drawable, if any.
    #[must_use]
    pub fn parent(&self, id: DrawableId) -> Option<DrawableId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(DrawableId::new(p, self.generation[p as usize]))
        }
    }

    /// Returns an iterator over the direct children of a drawable.
    #[must_use]
    pub fn children(&self, id: DrawableId) -> Children<'_> {
        self.validate(id);
        self.children_from(self.first_child[id.idx as usize])
    }

    // -- Attribute getters (read-only, no dirty marking) --

    /// Returns the geometry of a drawable.
    #[must_use]
    pub fn primitive(&self, id: DrawableId) -> &Primitive {
        self.validate(id);
        &self.primitive[id.idx as usize]
    }

    /// Returns the presentation attributes of a drawable.
    #[must_use]
    pub fn paint(&self, id: DrawableId) -> &Paint {
        self.validate(id);
        &self.paint[id.idx as usize]
    }

    /// Returns the flags of a drawable.
    #[must_use]
    pub fn flags(&self, id: DrawableId) -> DrawableFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns the translation of a drawable relative to its parent.
    #[must_use]
    pub fn offset(&self, id: DrawableId) -> Vec2 {
        self.validate(id);
        self.offset[id.idx as usize]
    }

    /// Returns whether the drawable is effectively hidden (including by an
    /// ancestor's hidden flag).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn effective_hidden(&self, id: DrawableId) -> bool {
        self.validate(id);
        self.effective_hidden[id.idx as usize]
    }

    // -- Mutation API (auto-marks dirty) --

    /// Replaces the geometry of a drawable.
    pub fn set_primitive(&mut self, id: DrawableId, primitive: Primitive) {
        self.validate(id);
        self.primitive[id.idx as usize] = primitive;
        self.dirty.mark(id.idx, dirty::PRIMITIVE);
    }

    /// Replaces the presentation attributes of a drawable.
    pub fn set_paint(&mut self, id: DrawableId, paint: Paint) {
        self.validate(id);
        self.paint[id.idx as usize] = paint;
        self.dirty.mark(id.idx, dirty::PAINT);
    }

    /// Moves a drawable and its subtree by `offset` relative to its parent.
    ///
    /// Placement is part of the geometry, so this marks the primitive channel.
    pub fn set_offset(&mut self, id: DrawableId, offset: Vec2) {
        self.validate(id);
        if self.offset[id.idx as usize] == offset {
            return;
        }
        self.offset[id.idx as usize] = offset;
        self.dirty.mark(id.idx, dirty::PRIMITIVE);
    }

    /// Sets the flags of a drawable.
    ///
    /// Marks the VISIBILITY channel dirty with eager propagation to
    /// descendants.
    pub fn set_flags(&mut self, id: DrawableId, flags: DrawableFlags) {
        self.validate(id);
        if self.flags[id.idx as usize] == flags {
            return;
        }
        self.flags[id.idx as usize] = flags;
        self.dirty.mark_with(id.idx, dirty::VISIBILITY, &EagerPolicy);
    }

    // -- Raw-index accessors for presenters --
    //
    // These accept raw slot indices (as found in `SceneChanges`) rather than
    // `DrawableId` handles, skipping generation validation. Only use with
    // indices that came from `SceneChanges` or `traversal_order()`.

    /// Returns the geometry at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn primitive_at(&self, idx: u32) -> &Primitive {
        self.check_slot(idx);
        &self.primitive[idx as usize]
    }

    /// Returns the presentation attributes at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn paint_at(&self, idx: u32) -> &Paint {
        self.check_slot(idx);
        &self.paint[idx as usize]
    }

    /// Returns the translation at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn offset_at(&self, idx: u32) -> Vec2 {
        self.check_slot(idx);
        self.offset[idx as usize]
    }

    /// Returns whether the drawable at raw slot `idx` is effectively hidden.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn effective_hidden_at(&self, idx: u32) -> bool {
        self.check_slot(idx);
        self.effective_hidden[idx as usize]
    }

    /// Returns the children of the drawable at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn children_at(&self, idx: u32) -> Children<'_> {
        self.check_slot(idx);
        self.children_from(self.first_child[idx as usize])
    }

    /// Returns whether the slot `idx` currently holds a live drawable.
    #[must_use]
    pub fn is_live_slot(&self, idx: u32) -> bool {
        self.alive.get(idx as usize).copied().unwrap_or(false)
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    fn validate(&self, id: DrawableId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale DrawableId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn children_from(&self, first: u32) -> Children<'_> {
        Children {
            next_sibling: &self.next_sibling,
            generation: &self.generation,
            cursor: first,
        }
    }

    fn check_slot(&self, idx: u32) {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
    }

    /// Frees a childless slot, detaching it from its parent first.
    fn release(&mut self, idx: u32) {
        if self.parent[idx as usize] != INVALID {
            let p = self.parent[idx as usize];
            self.unlink_from_parent(idx);
            self.dirty.mark(p, dirty::TOPOLOGY);
        }

        // Remove dirty tracking dependencies.
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.alive[idx as usize] = false;
        self.free_list.push(idx);
        self.traversal_dirty = true;
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

/// Direct children of a drawable, in paint order.
///
/// Created by [`DrawableScene::children`] and [`DrawableScene::children_at`].
#[derive(Clone, Debug)]
pub struct Children<'a> {
    next_sibling: &'a [u32],
    generation: &'a [u32],
    cursor: u32,
}

impl Iterator for Children<'_> {
    type Item = DrawableId;

    fn next(&mut self) -> Option<DrawableId> {
        // `INVALID` is out of bounds for both slices and ends the walk.
        let idx = self.cursor;
        let generation = *self.generation.get(idx as usize)?;
        self.cursor = self.next_sibling[idx as usize];
        Some(DrawableId::new(idx, generation))
    }
}

impl core::iter::FusedIterator for Children<'_> {}
