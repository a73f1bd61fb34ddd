// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable scene graph.
//!
//! A *drawable* is a node in the retained graphics tree a presenter mirrors.
//! Each drawable has:
//!
//! - An identity ([`DrawableId`]), a generational handle that becomes stale
//!   when the drawable is destroyed.
//! - Topology: parent, first-child, and sibling links forming an ordered
//!   tree. Later siblings paint on top of earlier ones.
//! - **Local attributes** set by the caller:
//!   [`primitive`](DrawableScene::set_primitive),
//!   [`paint`](DrawableScene::set_paint), and
//!   [`flags`](DrawableScene::set_flags).
//! - **Computed attributes** produced by [`evaluate`](DrawableScene::evaluate):
//!   `effective_hidden`, the OR of the hidden flags along the ancestor chain.
//!
//! Tile sessions own one group per tile; every feature's graphics live below
//! it, so unloading a tile is a single
//! [`destroy_subtree`](DrawableScene::destroy_subtree).

mod evaluate;
mod id;
mod paint;
mod primitive;
mod store;

pub use evaluate::SceneChanges;
pub use id::{DrawableId, INVALID};
pub use paint::{Fill, FillRule, LineCap, LineJoin, Paint, Stroke};
pub use primitive::{ImagePrimitive, Primitive};
pub use store::{Children, DrawableFlags, DrawableScene};
