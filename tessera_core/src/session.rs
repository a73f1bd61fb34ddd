// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tile session state.
//!
//! A session holds the graphics of one data tile rendered at one display
//! zoom. Display tiles that need the same data tile share its session, which
//! stays alive until the last of them is evicted. Its states only move
//! forward:
//!
//! ```text
//! Loading ──populate──▶ Populated
//!    │                      │
//!    └──────unload──────────┴──▶ Unloaded
//! ```

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, Size};

use crate::graphics::FeatureGraphics;
use crate::scene::{DrawableId, DrawableScene};

/// Tile coordinate: column, row, and zoom.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TileCoord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Zoom level.
    pub z: u32,
}

impl TileCoord {
    /// Creates a coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// The tile at zoom `z` that covers this tile (when `z` is lower) or its
    /// top-left descendant (when `z` is higher).
    #[must_use]
    pub fn at_zoom(self, z: u32) -> Self {
        let (x, y) = if z >= self.z {
            let k = z - self.z;
            (
                self.x.checked_shl(k).unwrap_or(0),
                self.y.checked_shl(k).unwrap_or(0),
            )
        } else {
            let k = self.z - z;
            (
                self.x.checked_shr(k).unwrap_or(0),
                self.y.checked_shr(k).unwrap_or(0),
            )
        };
        Self { x, y, z }
    }

    /// The tiles at zoom `z` that together cover this tile, in row-major
    /// order.
    ///
    /// At or below the tile's own zoom this is the single covering ancestor.
    /// Above it, all `4^(z - self.z)` descendants are returned.
    #[must_use]
    pub fn covering(self, z: u32) -> Vec<Self> {
        if z <= self.z {
            return vec![self.at_zoom(z)];
        }
        let first = self.at_zoom(z);
        let n = 1_i32.checked_shl(z - self.z).unwrap_or(0);
        (0..n)
            .flat_map(|dy| (0..n).map(move |dx| Self::new(first.x + dx, first.y + dy, z)))
            .collect()
    }
}

impl fmt::Debug for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Lifecycle state of a [`TileSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Created; waiting for the host's fetch.
    Loading,
    /// Every accepted feature has graphics.
    Populated,
    /// Evicted. Terminal.
    Unloaded,
}

/// The graphics and bookkeeping of one data tile at one display zoom.
#[derive(Debug)]
pub struct TileSession {
    coord: TileCoord,
    display_zoom: u32,
    serial: u64,
    refs: usize,
    render_size: Size,
    state: SessionState,
    root: DrawableId,
    features: Vec<FeatureGraphics>,
}

impl TileSession {
    pub(crate) fn new(
        coord: TileCoord,
        display_zoom: u32,
        serial: u64,
        render_size: Size,
        root: DrawableId,
    ) -> Self {
        Self {
            coord,
            display_zoom,
            serial,
            refs: 1,
            render_size,
            state: SessionState::Loading,
            root,
            features: Vec::new(),
        }
    }

    /// The data tile this session renders.
    #[must_use]
    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Serial distinguishing this session from earlier sessions of the same
    /// data tile.
    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Zoom the tile data is fetched at.
    #[must_use]
    pub fn data_zoom(&self) -> u32 {
        self.coord.z
    }

    /// Zoom of the display tiles this session is drawn for. Styles and
    /// filters see this zoom.
    #[must_use]
    pub fn display_zoom(&self) -> u32 {
        self.display_zoom
    }

    /// Number of live display tiles sharing this session.
    #[must_use]
    pub fn refs(&self) -> usize {
        self.refs
    }

    pub(crate) fn retain(&mut self) {
        self.refs += 1;
    }

    /// Drops one display tile's hold. Returns the holds left.
    pub(crate) fn release(&mut self) -> usize {
        self.refs = self.refs.saturating_sub(1);
        self.refs
    }

    /// Size at which the data tile is rendered, in display render units.
    #[must_use]
    pub fn render_size(&self) -> Size {
        self.render_size
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The tile's root group.
    #[must_use]
    pub fn root(&self) -> DrawableId {
        self.root
    }

    /// Graphics of every accepted feature, in paint order.
    #[must_use]
    pub fn features(&self) -> &[FeatureGraphics] {
        &self.features
    }

    /// Iterates over the feature graphics in paint order.
    pub fn iter(&self) -> core::slice::Iter<'_, FeatureGraphics> {
        self.features.iter()
    }

    pub(crate) fn features_mut(&mut self) -> &mut [FeatureGraphics] {
        &mut self.features
    }

    /// Top-left corner of the data tile in global render units at the
    /// display zoom.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(
            f64::from(self.coord.x) * self.render_size.width,
            f64::from(self.coord.y) * self.render_size.height,
        )
    }

    /// Maps a point from tile render space to global render space.
    #[must_use]
    pub fn to_global(&self, p: Point) -> Point {
        p + self.origin().to_vec2()
    }

    /// Maps a rect from tile render space to global render space.
    #[must_use]
    pub fn rect_to_global(&self, r: Rect) -> Rect {
        r + self.origin().to_vec2()
    }

    /// Moves the session to `Populated`, taking ownership of its graphics.
    pub(crate) fn populate(&mut self, features: Vec<FeatureGraphics>) {
        debug_assert_eq!(self.state, SessionState::Loading);
        self.features = features;
        self.state = SessionState::Populated;
    }

    /// Destroys the tile root and every feature drawable under it. Returns
    /// the number of drawables destroyed.
    pub(crate) fn unload(&mut self, scene: &mut DrawableScene) -> usize {
        self.features.clear();
        self.state = SessionState::Unloaded;
        if scene.is_alive(self.root) {
            scene.destroy_subtree(self.root)
        } else {
            0
        }
    }
}

impl<'a> IntoIterator for &'a TileSession {
    type Item = &'a FeatureGraphics;
    type IntoIter = core::slice::Iter<'a, FeatureGraphics>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
