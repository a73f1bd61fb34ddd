// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presenter contract for output integrations.
//!
//! `tessera_core` owns the feature model, styling, the drawable scene, and
//! the tile session lifecycle. Output crates (such as `tessera_svg`) depend
//! on it and implement [`Presenter`] to mirror the scene into a concrete
//! graphics tree.

use crate::scene::{DrawableScene, SceneChanges};

/// Applies evaluated scene changes to an output-specific graphics tree.
///
/// # Update loop pseudocode
///
/// ```rust,ignore
/// fn on_tile_loaded(ticket: TileTicket, data: Result<TileData, FetchError>) {
///     // Build: decode features into drawables under the tile's group
///     registry.on_tile_loaded(ticket, data)?;
///
///     // Evaluate: drain dirty channels, recompute effective visibility
///     let changes = registry.scene_mut().evaluate();
///
///     // Present: apply incremental changes to the output tree
///     presenter.apply(registry.scene(), &changes);
/// }
/// ```
pub trait Presenter {
    /// Applies the given [`SceneChanges`], reading current attribute values
    /// from `scene` as needed.
    fn apply(&mut self, scene: &DrawableScene, changes: &SceneChanges);
}
