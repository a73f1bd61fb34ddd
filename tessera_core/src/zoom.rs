// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detail-zoom clamping and the render scale derived from it.
//!
//! Tiles are only fetched for zoom levels inside a configured detail band
//! `[min, max]`. Outside the band the grid keeps displaying data from the
//! nearest in-band zoom and scales it, so a tile fetched once at its native
//! detail zoom is reused at every display zoom in the tolerance band.

use alloc::vec::Vec;

use kurbo::{Size, Vec2};

use crate::session::TileCoord;

/// Clamps `zoom` into `[min, max]`.
///
/// Either bound may be absent; with both absent the zoom is returned as is.
#[inline]
#[must_use]
pub fn clamp_zoom(zoom: u32, min: Option<u32>, max: Option<u32>) -> u32 {
    if let Some(min) = min
        && zoom < min
    {
        return min;
    }
    if let Some(max) = max
        && zoom > max
    {
        return max;
    }
    zoom
}

/// Scale factor of one effective-zoom tile when displayed at `display` zoom,
/// i.e. `2^(display - effective)`.
#[must_use]
pub fn zoom_scale(display: u32, effective: u32) -> f64 {
    // Shift amounts past 31 do not occur for web-map zoom ranges.
    if display >= effective {
        f64::from(1_u32 << (display - effective).min(31))
    } else {
        1.0 / f64::from(1_u32 << (effective - display).min(31))
    }
}

/// The configured detail band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DetailZoom {
    /// Lowest zoom for which tile data is fetched.
    pub min: Option<u32>,
    /// Highest zoom for which tile data is fetched.
    pub max: Option<u32>,
}

impl DetailZoom {
    /// A band with no bounds: every zoom is fetched natively.
    pub const UNBOUNDED: Self = Self {
        min: None,
        max: None,
    };

    /// Creates a band with the given bounds.
    #[must_use]
    pub const fn new(min: Option<u32>, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Returns the data zoom to fetch for a display zoom.
    #[must_use]
    pub fn clamp(self, zoom: u32) -> u32 {
        clamp_zoom(zoom, self.min, self.max)
    }

    /// Size at which one data tile is rendered when displayed at `display`
    /// zoom, given the configured base tile size.
    #[must_use]
    pub fn tile_render_size(self, base: Size, display: u32) -> Size {
        base * zoom_scale(display, self.clamp(display))
    }

    /// The data tiles needed to draw `display`.
    ///
    /// Past the max detail zoom this is the one ancestor that sibling display
    /// tiles share. Below the min detail zoom it is every descendant at the
    /// min detail zoom.
    #[must_use]
    pub fn data_tiles(self, display: TileCoord) -> Vec<TileCoord> {
        display.covering(self.clamp(display.z))
    }
}

/// Per-axis scale from extent units to render units.
#[inline]
#[must_use]
pub fn px_per_extent(render_size: Size, extent: u32) -> Vec2 {
    let extent = f64::from(extent.max(1));
    Vec2::new(render_size.width / extent, render_size.height / extent)
}
