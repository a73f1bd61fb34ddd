// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Failures are scoped as narrowly as possible: a [`BuildError`] rejects one
//! feature and the rest of its tile still renders; a [`TileError`] fails one
//! tile load and is handed back to the host. Style resolution never fails.

use alloc::string::String;

use thiserror::Error;

/// A feature could not be turned into graphics.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The decoder produced a geometry type tag with no builder, which points
    /// at a decoder/schema mismatch.
    #[error("unsupported geometry type tag {tag}")]
    UnsupportedGeometry {
        /// The raw tag.
        tag: u32,
    },
    /// A point feature carried no coordinates.
    #[error("point feature has no coordinates")]
    EmptyGeometry,
}

/// The host's fetch of raw tile bytes failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The tile does not exist (a 404 equivalent). Treated as an empty tile.
    #[error("tile not found")]
    NotFound,
    /// Any other failure; propagated to the host.
    #[error("tile fetch failed: {0}")]
    Failed(String),
}

/// A tile load failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TileError {
    /// Fetching the tile failed for a reason other than absence.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
