// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feature-to-graphics construction.
//!
//! [`FeatureToGraphics`] is the extension point hosts implement to draw
//! features their own way. [`DefaultBuilder`] covers the three geometry
//! classes:
//!
//! - points become a circle, a circle-shaped path, or an icon image;
//! - lines become an open path, wrapped in a thickened group when
//!   interactive;
//! - polygons become one closed path with a subpath per ring.

use alloc::rc::Rc;
use core::f64::consts::PI;

use kurbo::{Arc, BezPath, Circle, Point, Vec2};

use crate::error::BuildError;
use crate::feature::{Feature, GeometryKind, Ring};
use crate::geom::scale_point;
use crate::graphics::{FeatureGraphics, GraphicsShape, icon_image};
use crate::scene::{DrawableFlags, DrawableScene, Primitive};
use crate::style::ResolvedStyle;

/// Arc flattening tolerance for circle-shaped paths, in render units.
const ARC_TOLERANCE: f64 = 0.1;

/// Builds the drawables for one feature.
pub trait FeatureToGraphics {
    /// Creates the drawables for `feature` in `scene` and returns them
    /// detached; the caller attaches the root under the tile's group.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when the geometry cannot be drawn. The feature
    /// is then skipped; the rest of the tile is unaffected.
    fn build(
        &self,
        feature: &Rc<dyn Feature>,
        layer: &str,
        style: &ResolvedStyle,
        px_per_extent: Vec2,
        scene: &mut DrawableScene,
    ) -> Result<FeatureGraphics, BuildError>;
}

/// How points without an icon are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointMode {
    /// A native circle primitive.
    #[default]
    Circle,
    /// A closed path of two half-circle arcs, for outputs without circles.
    Path,
}

/// The stock [`FeatureToGraphics`] implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultBuilder {
    /// How points without an icon are drawn.
    pub point_mode: PointMode,
}

impl DefaultBuilder {
    /// Creates a builder with the given point mode.
    #[must_use]
    pub const fn new(point_mode: PointMode) -> Self {
        Self { point_mode }
    }
}

impl FeatureToGraphics for DefaultBuilder {
    fn build(
        &self,
        feature: &Rc<dyn Feature>,
        layer: &str,
        style: &ResolvedStyle,
        px_per_extent: Vec2,
        scene: &mut DrawableScene,
    ) -> Result<FeatureGraphics, BuildError> {
        let kind = feature.kind()?;
        let rings = feature.rings();

        let (root, shape) = match kind {
            GeometryKind::Point => {
                let p = rings
                    .first()
                    .and_then(|ring| ring.first())
                    .copied()
                    .ok_or(BuildError::EmptyGeometry)?;
                let center = scale_point(p, px_per_extent);
                if let Some(icon) = &style.icon {
                    let id = scene.create(
                        Primitive::Image(icon_image(icon, center)),
                        style.image_paint(),
                    );
                    (id, GraphicsShape::Icon { center })
                } else {
                    match self.point_mode {
                        PointMode::Circle => {
                            let circle = Circle::new(center, style.radius);
                            let id = scene.create(Primitive::Circle(circle), style.paint());
                            (id, GraphicsShape::Circle { center })
                        }
                        PointMode::Path => {
                            let path = circle_path(center, style.radius);
                            let id = scene.create(Primitive::Path(path), style.paint());
                            (id, GraphicsShape::CirclePath { center })
                        }
                    }
                }
            }
            GeometryKind::LineString | GeometryKind::Polygon => {
                let closed = kind == GeometryKind::Polygon;
                let path = rings_to_path(&rings, px_per_extent, closed);
                if kind == GeometryKind::LineString && style.interactive {
                    let group = scene.create_group();
                    let visible = scene.create(Primitive::Path(path.clone()), style.paint());
                    let interaction =
                        scene.create(Primitive::Path(path), style.interaction_paint());
                    scene.add_child(group, visible);
                    scene.add_child(group, interaction);
                    (
                        group,
                        GraphicsShape::ThickenedLine {
                            visible,
                            interaction,
                        },
                    )
                } else {
                    let id = scene.create(Primitive::Path(path), style.paint());
                    (id, GraphicsShape::Path)
                }
            }
        };

        if style.hidden {
            scene.set_flags(root, DrawableFlags { hidden: true });
        }

        Ok(FeatureGraphics::new(
            Rc::clone(feature),
            layer,
            kind,
            px_per_extent,
            root,
            shape,
            style.clone(),
        ))
    }
}

/// Converts extent-space rings to one render-space path, one subpath per
/// ring. Rings with no points are skipped.
#[must_use]
pub fn rings_to_path(rings: &[Ring], px_per_extent: Vec2, closed: bool) -> BezPath {
    let mut path = BezPath::new();
    for ring in rings {
        let mut points = ring.iter().map(|&p| scale_point(p, px_per_extent));
        let Some(first) = points.next() else {
            continue;
        };
        path.move_to(first);
        for p in points {
            path.line_to(p);
        }
        if closed {
            path.close_path();
        }
    }
    path
}

/// A closed circle of radius `r` around `center`, made of two half-circle
/// arcs.
#[must_use]
pub fn circle_path(center: Point, r: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(center + Vec2::new(r, 0.0));
    for start_angle in [0.0, PI] {
        let half = Arc {
            center,
            radii: Vec2::new(r, r),
            start_angle,
            sweep_angle: PI,
            x_rotation: 0.0,
        };
        path.extend(half.append_iter(ARC_TOLERANCE));
    }
    path.close_path();
    path
}
