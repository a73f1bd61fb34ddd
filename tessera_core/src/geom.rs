// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projection from tile-local extent units to render space.
//!
//! Vector tile geometry is expressed in integer units in `[0, extent)`. A tile
//! rendered at `w × h` units uses the per-axis scale factor
//! `px_per_extent = (w / extent, h / extent)`; the render size need not be
//! square, so the factor is a [`Vec2`] rather than a scalar.

use kurbo::{Point, Rect, Vec2};

use crate::feature::{TileBBox, TilePoint};

/// Scales a tile-local point into render space.
#[inline]
#[must_use]
pub fn scale_point(p: TilePoint, px_per_extent: Vec2) -> Point {
    Point::new(
        f64::from(p.x) * px_per_extent.x,
        f64::from(p.y) * px_per_extent.y,
    )
}

/// Maps a render-space point back into (fractional) tile-local units.
///
/// The inverse of [`scale_point`] for any non-degenerate scale factor.
#[inline]
#[must_use]
pub fn inverse_scale(p: Point, px_per_extent: Vec2) -> Point {
    Point::new(p.x / px_per_extent.x, p.y / px_per_extent.y)
}

/// Projects a tile-local bounding box into render space by scaling its
/// minimum and maximum corners.
#[must_use]
pub fn project_bbox(bbox: TileBBox, px_per_extent: Vec2) -> Rect {
    Rect::from_points(
        scale_point(bbox.min, px_per_extent),
        scale_point(bbox.max, px_per_extent),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_point_is_per_axis() {
        let s = Vec2::new(0.0625, 0.125);
        let p = scale_point(TilePoint::new(4096, 2048), s);
        assert_eq!(p, Point::new(256.0, 256.0));
    }

    #[test]
    fn projection_round_trip() {
        let scales = [
            Vec2::new(256.0 / 4096.0, 256.0 / 4096.0),
            Vec2::new(512.0 / 4096.0, 384.0 / 4096.0),
            Vec2::new(3.0, 0.7),
        ];
        let points = [
            Point::new(0.0, 0.0),
            Point::new(17.25, 250.5),
            Point::new(-3.0, 1024.0),
        ];
        for s in scales {
            for p in points {
                let q = inverse_scale(p, s);
                let back = Point::new(q.x * s.x, q.y * s.y);
                assert!(
                    (back - p).hypot() < 1e-9,
                    "round trip drifted: {p:?} -> {back:?} at scale {s:?}"
                );
            }
        }
    }

    #[test]
    fn project_bbox_scales_corners() {
        let bbox = TileBBox::new(TilePoint::new(0, 0), TilePoint::new(2048, 4096));
        let rect = project_bbox(bbox, Vec2::new(0.0625, 0.0625));
        assert_eq!(rect, Rect::new(0.0, 0.0, 128.0, 256.0));
    }
}
