// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Tiles print
//! as `z/x/y`.

use std::io::Write;

use tessera_core::trace::{
    FeatureRejectedEvent, FetchEvent, RestyleEvent, StaleCompletionEvent, TilePopulatedEvent,
    TileStartEvent, TileUnloadEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_tile_start(&mut self, e: &TileStartEvent) {
        let _ = writeln!(
            self.writer,
            "[tile:start] {} serial={} display_zoom={}",
            e.coord, e.serial, e.display_zoom,
        );
    }

    fn on_fetch(&mut self, e: &FetchEvent) {
        let _ = writeln!(
            self.writer,
            "[fetch] {} serial={} {}",
            e.coord,
            e.serial,
            e.outcome.as_str(),
        );
    }

    fn on_feature_rejected(&mut self, e: &FeatureRejectedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[feature:rejected] {} layer={} {}",
            e.coord, e.layer, e.error,
        );
    }

    fn on_tile_populated(&mut self, e: &TilePopulatedEvent) {
        let _ = writeln!(
            self.writer,
            "[tile:populated] {} serial={} features={} skipped={} rejected={}",
            e.coord, e.serial, e.features, e.skipped, e.rejected,
        );
    }

    fn on_stale_completion(&mut self, e: &StaleCompletionEvent) {
        let _ = writeln!(
            self.writer,
            "[tile:stale] {} serial={} DROPPED",
            e.coord, e.serial,
        );
    }

    fn on_tile_unload(&mut self, e: &TileUnloadEvent) {
        let _ = writeln!(
            self.writer,
            "[tile:unload] {} serial={} drawables={}",
            e.coord, e.serial, e.drawables,
        );
    }

    fn on_restyle(&mut self, e: &RestyleEvent) {
        let _ = writeln!(
            self.writer,
            "[restyle] {} sessions={} features={}",
            e.cause.as_str(),
            e.sessions,
            e.features,
        );
    }
}
