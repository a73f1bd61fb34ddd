// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the tile lifecycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`TileSessionRegistry`](crate::registry::TileSessionRegistry) calls at each
//! lifecycle step. All method bodies default to no-ops, so implementing only
//! the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).

use crate::error::BuildError;
use crate::session::TileCoord;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How the host's fetch for a tile resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchOutcome {
    /// Tile data arrived.
    Loaded,
    /// The tile does not exist; treated as empty.
    NotFound,
    /// The fetch failed; the error goes back to the host.
    Failed,
}

impl FetchOutcome {
    /// A short lowercase label, for log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::NotFound => "not-found",
            Self::Failed => "failed",
        }
    }
}

/// What triggered a restyle pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RestyleCause {
    /// The global style was replaced.
    SetStyle,
    /// The global style was removed.
    ClearStyle,
    /// A per-feature-id override was installed.
    SetFeatureStyle,
    /// A per-feature-id override was removed.
    ResetFeatureStyle,
}

impl RestyleCause {
    /// A short lowercase label, for log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SetStyle => "set-style",
            Self::ClearStyle => "clear-style",
            Self::SetFeatureStyle => "set-feature-style",
            Self::ResetFeatureStyle => "reset-feature-style",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a data tile session is created.
#[derive(Clone, Copy, Debug)]
pub struct TileStartEvent {
    /// The data tile to fetch.
    pub coord: TileCoord,
    /// Zoom of the display tile that requested it.
    pub display_zoom: u32,
    /// Session serial.
    pub serial: u64,
}

/// Emitted when the host reports the outcome of a fetch.
#[derive(Clone, Copy, Debug)]
pub struct FetchEvent {
    /// Tile coordinate.
    pub coord: TileCoord,
    /// Session serial carried by the ticket.
    pub serial: u64,
    /// How the fetch resolved.
    pub outcome: FetchOutcome,
}

/// Emitted when a feature could not be turned into graphics.
#[derive(Clone, Copy, Debug)]
pub struct FeatureRejectedEvent<'a> {
    /// Tile coordinate.
    pub coord: TileCoord,
    /// Source layer of the feature.
    pub layer: &'a str,
    /// Why the feature was rejected.
    pub error: &'a BuildError,
}

/// Emitted when a session moves to `Populated`.
#[derive(Clone, Copy, Debug)]
pub struct TilePopulatedEvent {
    /// Tile coordinate.
    pub coord: TileCoord,
    /// Session serial.
    pub serial: u64,
    /// Number of features that produced graphics.
    pub features: usize,
    /// Number of features the filter or a style skipped.
    pub skipped: usize,
    /// Number of features rejected by the builder.
    pub rejected: usize,
}

/// Emitted when a completion arrives for a session that no longer exists.
#[derive(Clone, Copy, Debug)]
pub struct StaleCompletionEvent {
    /// Tile coordinate carried by the ticket.
    pub coord: TileCoord,
    /// Serial carried by the ticket.
    pub serial: u64,
}

/// Emitted when a session is unloaded.
#[derive(Clone, Copy, Debug)]
pub struct TileUnloadEvent {
    /// Tile coordinate.
    pub coord: TileCoord,
    /// Session serial.
    pub serial: u64,
    /// Number of drawables destroyed.
    pub drawables: usize,
}

/// Emitted after a restyle pass over all live sessions.
#[derive(Clone, Copy, Debug)]
pub struct RestyleEvent {
    /// What triggered the pass.
    pub cause: RestyleCause,
    /// Live sessions walked.
    pub sessions: usize,
    /// Features restyled.
    pub features: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the tile lifecycle.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called when a tile session is created.
    fn on_tile_start(&mut self, e: &TileStartEvent) {
        _ = e;
    }

    /// Called when the host reports a fetch outcome.
    fn on_fetch(&mut self, e: &FetchEvent) {
        _ = e;
    }

    /// Called for every feature the builder rejects.
    fn on_feature_rejected(&mut self, e: &FeatureRejectedEvent<'_>) {
        _ = e;
    }

    /// Called when a session becomes populated.
    fn on_tile_populated(&mut self, e: &TilePopulatedEvent) {
        _ = e;
    }

    /// Called for a completion that matched no live session.
    fn on_stale_completion(&mut self, e: &StaleCompletionEvent) {
        _ = e;
    }

    /// Called when a session is unloaded.
    fn on_tile_unload(&mut self, e: &TileUnloadEvent) {
        _ = e;
    }

    /// Called after a restyle pass.
    fn on_restyle(&mut self, e: &RestyleEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TileStartEvent`].
    #[inline]
    pub fn tile_start(&mut self, e: &TileStartEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tile_start(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FetchEvent`].
    #[inline]
    pub fn fetch(&mut self, e: &FetchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_fetch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FeatureRejectedEvent`].
    #[inline]
    pub fn feature_rejected(&mut self, e: &FeatureRejectedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_feature_rejected(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TilePopulatedEvent`].
    #[inline]
    pub fn tile_populated(&mut self, e: &TilePopulatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tile_populated(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StaleCompletionEvent`].
    #[inline]
    pub fn stale_completion(&mut self, e: &StaleCompletionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_stale_completion(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TileUnloadEvent`].
    #[inline]
    pub fn tile_unload(&mut self, e: &TileUnloadEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tile_unload(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RestyleEvent`].
    #[inline]
    pub fn restyle(&mut self, e: &RestyleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_restyle(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
