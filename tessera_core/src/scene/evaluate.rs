// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene evaluation and change tracking.
//!
//! Evaluation follows a drain-recompute pattern for each dirty channel:
//!
//! 1. **VISIBILITY**: Drain dirty indices (with descendants) and recompute
//!    `effective_hidden` as `parent_effective_hidden || flags.hidden`.
//! 2. **PAINT** / **PRIMITIVE**: Drain dirty indices. Presenters read the
//!    current values from the scene.
//! 3. **TOPOLOGY**: Drain and discard; the traversal order was already
//!    rebuilt at the start of evaluation.
//!
//! [`SceneChanges`] carries raw slot indices so presenters can index straight
//! into the scene via the `*_at()` accessors.

use alloc::vec::Vec;

use super::id::INVALID;
use super::store::DrawableScene;
use crate::dirty;

/// The set of changes produced by a single [`DrawableScene::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct SceneChanges {
    /// Drawables whose paint was replaced.
    pub paints: Vec<u32>,
    /// Drawables whose geometry was replaced.
    pub primitives: Vec<u32>,
    /// Drawables that became effectively hidden.
    pub hidden: Vec<u32>,
    /// Drawables that became effectively visible.
    pub unhidden: Vec<u32>,
    /// Drawables created since the last evaluate.
    pub added: Vec<u32>,
    /// Drawables destroyed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether the traversal order was rebuilt.
    pub topology_changed: bool,
}

impl SceneChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.paints.clear();
        self.primitives.clear();
        self.hidden.clear();
        self.unhidden.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paints.is_empty()
            && self.primitives.is_empty()
            && self.hidden.is_empty()
            && self.unhidden.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl DrawableScene {
    /// Evaluates the scene, recomputing effective visibility and returning
    /// the set of changes.
    pub fn evaluate(&mut self) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer.
    pub fn evaluate_into(&mut self, changes: &mut SceneChanges) {
        changes.clear();

        if self.traversal_dirty {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
            self.traversal_dirty = false;
        }

        let dirty_visibility: Vec<u32> = self
            .dirty
            .drain(dirty::VISIBILITY)
            .affected()
            .deterministic()
            .run()
            .collect();
        for idx in dirty_visibility {
            if !self.alive[idx as usize] {
                continue;
            }
            let parent_idx = self.parent[idx as usize];
            let parent_hidden = parent_idx != INVALID && self.effective_hidden[parent_idx as usize];
            let new_hidden = parent_hidden || self.flags[idx as usize].hidden;
            if new_hidden != self.effective_hidden[idx as usize] {
                if new_hidden {
                    changes.hidden.push(idx);
                } else {
                    changes.unhidden.push(idx);
                }
                self.effective_hidden[idx as usize] = new_hidden;
            }
        }

        changes.paints = self
            .dirty
            .drain(dirty::PAINT)
            .deterministic()
            .run()
            .collect();

        changes.primitives = self
            .dirty
            .drain(dirty::PRIMITIVE)
            .deterministic()
            .run()
            .collect();

        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Returns the current traversal order (depth-first pre-order, which is
    /// also paint order).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    /// Returns the live drawables that have no parent.
    #[must_use]
    pub fn roots(&self) -> Vec<u32> {
        (0..self.len)
            .filter(|&idx| self.alive[idx as usize] && self.parent[idx as usize] == INVALID)
            .collect()
    }

    fn rebuild_traversal_order(&mut self) {
        self.traversal_order.clear();
        for idx in self.roots() {
            self.dfs_collect(idx);
        }
    }

    fn dfs_collect(&mut self, idx: u32) {
        self.traversal_order.push(idx);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child);
            child = self.next_sibling[child as usize];
        }
    }
}
