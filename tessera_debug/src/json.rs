// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON Lines event log.
//!
//! [`JsonEventSink`] implements [`TraceSink`] and writes each event as one
//! JSON object per line. Every object carries `name` and `cat` keys plus an
//! `args` object with the event fields, so logs can be filtered with `jq` or
//! loaded line by line with [`serde_json::from_str`].

use std::io::{self, Write};

use serde_json::{Value, json};

use tessera_core::session::TileCoord;
use tessera_core::trace::{
    FeatureRejectedEvent, FetchEvent, RestyleEvent, StaleCompletionEvent, TilePopulatedEvent,
    TileStartEvent, TileUnloadEvent, TraceSink,
};

/// Writes one JSON object per event to a [`Write`] destination.
///
/// Write errors do not interrupt tile processing; the first one is kept and
/// can be inspected with [`error`](Self::error).
pub struct JsonEventSink<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> std::fmt::Debug for JsonEventSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonEventSink")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<W: Write> JsonEventSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// The first write error, if any occurred.
    #[must_use]
    pub fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    /// Returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, event: &Value) {
        let result = serde_json::to_writer(&mut self.writer, event)
            .map_err(io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }
}

fn tile(coord: TileCoord) -> Value {
    json!({ "z": coord.z, "x": coord.x, "y": coord.y })
}

impl<W: Write> TraceSink for JsonEventSink<W> {
    fn on_tile_start(&mut self, e: &TileStartEvent) {
        self.emit(&json!({
            "name": "TileStart",
            "cat": "Session",
            "args": {
                "tile": tile(e.coord),
                "serial": e.serial,
                "display_zoom": e.display_zoom,
            }
        }));
    }

    fn on_fetch(&mut self, e: &FetchEvent) {
        self.emit(&json!({
            "name": "Fetch",
            "cat": "Session",
            "args": {
                "tile": tile(e.coord),
                "serial": e.serial,
                "outcome": e.outcome.as_str(),
            }
        }));
    }

    fn on_feature_rejected(&mut self, e: &FeatureRejectedEvent<'_>) {
        self.emit(&json!({
            "name": "FeatureRejected",
            "cat": "Build",
            "args": {
                "tile": tile(e.coord),
                "layer": e.layer,
                "error": e.error.to_string(),
            }
        }));
    }

    fn on_tile_populated(&mut self, e: &TilePopulatedEvent) {
        self.emit(&json!({
            "name": "TilePopulated",
            "cat": "Session",
            "args": {
                "tile": tile(e.coord),
                "serial": e.serial,
                "features": e.features,
                "skipped": e.skipped,
                "rejected": e.rejected,
            }
        }));
    }

    fn on_stale_completion(&mut self, e: &StaleCompletionEvent) {
        self.emit(&json!({
            "name": "StaleCompletion",
            "cat": "Session",
            "args": {
                "tile": tile(e.coord),
                "serial": e.serial,
            }
        }));
    }

    fn on_tile_unload(&mut self, e: &TileUnloadEvent) {
        self.emit(&json!({
            "name": "TileUnload",
            "cat": "Session",
            "args": {
                "tile": tile(e.coord),
                "serial": e.serial,
                "drawables": e.drawables,
            }
        }));
    }

    fn on_restyle(&mut self, e: &RestyleEvent) {
        self.emit(&json!({
            "name": "Restyle",
            "cat": "Style",
            "args": {
                "cause": e.cause.as_str(),
                "sessions": e.sessions,
                "features": e.features,
            }
        }));
    }
}
