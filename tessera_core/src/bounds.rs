// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial bounds across loaded tiles.

use kurbo::Rect;

use crate::session::TileSession;

/// Unions the bounding boxes of every feature in `sessions`.
///
/// Each feature bbox is passed through `map` together with its session
/// before the union, so callers can move it into global render space or
/// project it further. Returns `None` when no session has a feature.
pub fn fold<'a, I, F>(sessions: I, mut map: F) -> Option<Rect>
where
    I: IntoIterator<Item = &'a TileSession>,
    F: FnMut(&TileSession, Rect) -> Rect,
{
    let mut bounds: Option<Rect> = None;
    for session in sessions {
        for graphics in session {
            let r = map(session, graphics.bbox());
            bounds = Some(bounds.map_or(r, |b| b.union(r)));
        }
    }
    bounds
}
