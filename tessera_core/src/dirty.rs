// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants for the drawable scene.
//!
//! The scene uses multi-channel dirty tracking (via [`understory_dirty`]) so
//! presenters only touch the drawables a restyle or tile load changed.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`VISIBILITY`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and has dependency edges
//!   from child to parent. Hiding a tile root hides every feature under it,
//!   so marking a parent marks all descendants.
//!
//! - **Local-only**: [`PAINT`] and [`PRIMITIVE`] are marked with the default
//!   policy. A restyle changes presentation attributes of individual
//!   drawables; geometry is only replaced when a drawable is rebuilt.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on create/destroy and
//!   attach/detach. It triggers a traversal-order rebuild during evaluation
//!   but does not propagate.
//!
//! # Consumption
//!
//! Each [`DrawableScene::evaluate`](crate::scene::DrawableScene::evaluate)
//! call drains all channels and surfaces the results as
//! [`SceneChanges`](crate::scene::SceneChanges), which presenters
//! [consume](crate::backend::Presenter::apply).

use understory_dirty::Channel;

/// Hidden flag or ancestry changed; effective visibility of the subtree must
/// be recomputed.
pub const VISIBILITY: Channel = Channel::new(0);

/// Presentation attributes changed.
pub const PAINT: Channel = Channel::new(1);

/// Geometry changed.
pub const PRIMITIVE: Channel = Channel::new(2);

/// Tree topology changed; triggers traversal order rebuild.
pub const TOPOLOGY: Channel = Channel::new(3);
