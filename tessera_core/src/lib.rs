// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile sessions, style resolution, and feature graphics for rendering
//! vector tiles as scalable vector graphics.
//!
//! `tessera_core` turns decoded vector-tile features into a retained tree of
//! drawables, one translated group per data tile. It is `no_std` compatible (with
//! `alloc`) and stores drawables in struct-of-arrays layout with generational
//! handles.
//!
//! # Architecture
//!
//! ```text
//!   Host grid ──► TileSessionRegistry::on_tile_start() ──► TileRequest
//!                                                             │ tickets
//!                 ┌───────────────────────────────────────────┘
//!                 ▼
//!   fetch + decode (host) ──► on_tile_loaded(ticket, TileData)
//!                                   │
//!                                   ▼
//!   StyleResolver ──► FeatureToGraphics::build() ──► TileSession
//!                                   │
//!                                   ▼
//!   DrawableScene::evaluate() ──► SceneChanges ──► Presenter::apply()
//! ```
//!
//! **[`feature`]** / **[`value`]**: the decoder boundary. Features are
//! read-only, with a geometry tag, properties, rings in extent units, and a
//! bbox.
//!
//! **[`geom`]** / **[`zoom`]**: projection from extent units to render units
//! and the detail-zoom clamp that decides which data zoom a tile is fetched
//! at and how large it renders.
//!
//! **[`style`]** / **[`resolve`]**: partial styles, geometry-class defaults,
//! and the resolver that picks a style (or skips a feature) from the filter,
//! per-feature-id overrides, the global style, and the per-layer table.
//!
//! **[`builder`]** / **[`graphics`]**: the pluggable feature-to-graphics
//! builder and the per-feature graphics it produces, restylable in place.
//!
//! **[`session`]** / **[`registry`]** / **[`bounds`]**: the tile lifecycle,
//! the host-facing hooks, and bounds aggregation across live tiles.
//!
//! **[`scene`]** / **[`dirty`]**: the drawable tree with multi-channel dirty
//! tracking via `understory_dirty`.
//!
//! **[`backend`]**: the [`Presenter`](backend::Presenter) trait that output
//! crates implement.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! lifecycle instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod bounds;
pub mod builder;
pub mod dirty;
pub mod error;
pub mod feature;
pub mod geom;
pub mod graphics;
pub mod options;
pub mod registry;
pub mod resolve;
pub mod scene;
pub mod session;
pub mod style;
pub mod trace;
pub mod value;
pub mod zoom;
