// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON event logs for tessera diagnostics.
//!
//! This crate provides [`TraceSink`](tessera_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`json::JsonEventSink`]: one JSON object per event (JSON Lines).
//!
//! Install one on a registry with
//! [`TileSessionRegistry::with_trace_sink`](tessera_core::registry::TileSessionRegistry::with_trace_sink).

pub mod json;
pub mod pretty;
