// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The graphics built for one feature.

use alloc::rc::Rc;
use alloc::string::String;

use kurbo::{Circle, Point, Rect, Vec2};

use crate::feature::{Feature, GeometryKind};
use crate::geom::project_bbox;
use crate::scene::{DrawableFlags, DrawableId, DrawableScene, ImagePrimitive, Paint, Primitive};
use crate::style::{Icon, ResolvedStyle};

/// Which drawables make up a [`FeatureGraphics`], and what restyling may
/// change on them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GraphicsShape {
    /// A circle primitive; restyling may change its radius.
    Circle {
        /// Center in render units.
        center: Point,
    },
    /// A point drawn as a closed path of two half-circle arcs; restyling
    /// rebuilds the path for the new radius.
    CirclePath {
        /// Center in render units.
        center: Point,
    },
    /// An image anchored at a point; restyling may swap the icon.
    Icon {
        /// The point the icon anchor sits on, in render units.
        center: Point,
    },
    /// A single path for a line or polygon.
    Path,
    /// A group holding a visible line and a wider invisible overlay that
    /// receives pointer events.
    ThickenedLine {
        /// The visible path.
        visible: DrawableId,
        /// The zero-opacity interaction path.
        interaction: DrawableId,
    },
}

/// The graphics built for one feature of one tile.
///
/// The root drawable is a child of the tile's root group for as long as the
/// tile session is live.
#[derive(Clone, Debug)]
pub struct FeatureGraphics {
    feature: Rc<dyn Feature>,
    layer: String,
    kind: GeometryKind,
    px_per_extent: Vec2,
    root: DrawableId,
    bbox: Rect,
    shape: GraphicsShape,
    style: ResolvedStyle,
}

impl FeatureGraphics {
    /// Wraps drawables already created in the scene.
    ///
    /// The bounding box is the feature's extent-space bbox projected with
    /// `px_per_extent`.
    #[must_use]
    pub fn new(
        feature: Rc<dyn Feature>,
        layer: impl Into<String>,
        kind: GeometryKind,
        px_per_extent: Vec2,
        root: DrawableId,
        shape: GraphicsShape,
        style: ResolvedStyle,
    ) -> Self {
        let bbox = project_bbox(feature.bbox(), px_per_extent);
        Self {
            feature,
            layer: layer.into(),
            kind,
            px_per_extent,
            root,
            bbox,
            shape,
            style,
        }
    }

    /// The root drawable.
    #[must_use]
    pub fn graphics(&self) -> DrawableId {
        self.root
    }

    /// Bounding box in render units.
    #[must_use]
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    /// The source feature.
    #[must_use]
    pub fn feature(&self) -> &Rc<dyn Feature> {
        &self.feature
    }

    /// The source layer name.
    #[must_use]
    pub fn layer(&self) -> &str {
        &self.layer
    }

    /// The geometry class.
    #[must_use]
    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    /// Render units per extent unit, per axis.
    #[must_use]
    pub fn px_per_extent(&self) -> Vec2 {
        self.px_per_extent
    }

    /// The drawable layout.
    #[must_use]
    pub fn shape(&self) -> GraphicsShape {
        self.shape
    }

    /// The style most recently applied.
    #[must_use]
    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }

    /// Applies a new style without rebuilding geometry.
    ///
    /// Paint and the hidden flag are always re-applied. Circles take the new
    /// radius; icons take the new icon when the style carries one. A thickened
    /// line routes the base style to the visible path and the derived
    /// interaction style to the overlay.
    pub fn set_style(&mut self, scene: &mut DrawableScene, style: &ResolvedStyle) {
        match self.shape {
            GraphicsShape::Circle { center } => {
                update_primitive(
                    scene,
                    self.root,
                    Primitive::Circle(Circle::new(center, style.radius)),
                );
                update_paint(scene, self.root, style.paint());
            }
            GraphicsShape::CirclePath { center } => {
                update_primitive(
                    scene,
                    self.root,
                    Primitive::Path(crate::builder::circle_path(center, style.radius)),
                );
                update_paint(scene, self.root, style.paint());
            }
            GraphicsShape::Icon { center } => {
                if let Some(icon) = &style.icon {
                    update_primitive(scene, self.root, Primitive::Image(icon_image(icon, center)));
                }
                update_paint(scene, self.root, style.image_paint());
            }
            GraphicsShape::Path => update_paint(scene, self.root, style.paint()),
            GraphicsShape::ThickenedLine {
                visible,
                interaction,
            } => {
                update_paint(scene, visible, style.paint());
                update_paint(scene, interaction, style.interaction_paint());
            }
        }
        scene.set_flags(
            self.root,
            DrawableFlags {
                hidden: style.hidden,
            },
        );
        self.style = style.clone();
    }

    /// Destroys every drawable of this feature. Returns the number destroyed.
    pub fn detach(&self, scene: &mut DrawableScene) -> usize {
        if scene.is_alive(self.root) {
            scene.destroy_subtree(self.root)
        } else {
            0
        }
    }
}

/// The image for `icon` with its anchor placed on `center`.
pub(crate) fn icon_image(icon: &Icon, center: Point) -> ImagePrimitive {
    ImagePrimitive {
        rect: Rect::from_origin_size(center - icon.anchor, icon.size),
        href: icon.url.clone(),
    }
}

fn update_paint(scene: &mut DrawableScene, id: DrawableId, paint: Paint) {
    if *scene.paint(id) != paint {
        scene.set_paint(id, paint);
    }
}

fn update_primitive(scene: &mut DrawableScene, id: DrawableId, primitive: Primitive) {
    if *scene.primitive(id) != primitive {
        scene.set_primitive(id, primitive);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;
    use crate::builder::{DefaultBuilder, FeatureToGraphics, PointMode};
    use crate::feature::{DecodedFeature, TilePoint};
    use crate::style::Style;

    fn build(
        scene: &mut DrawableScene,
        feature: DecodedFeature,
        style: &Style,
        mode: PointMode,
    ) -> FeatureGraphics {
        let feature = feature.into_shared();
        let kind = feature.kind().unwrap();
        DefaultBuilder::new(mode)
            .build(
                &feature,
                "layer",
                &ResolvedStyle::resolve(kind, style),
                Vec2::new(1.0, 1.0),
                scene,
            )
            .unwrap()
    }

    #[test]
    fn restyle_circle_changes_radius_not_center() {
        let mut scene = DrawableScene::new();
        let mut g = build(
            &mut scene,
            DecodedFeature::point(5, 6),
            &Style::new(),
            PointMode::Circle,
        );
        let _ = scene.evaluate();

        let style = ResolvedStyle::resolve(GeometryKind::Point, &Style::new().radius(3.0));
        g.set_style(&mut scene, &style);
        assert_eq!(
            *scene.primitive(g.graphics()),
            Primitive::Circle(Circle::new(Point::new(5.0, 6.0), 3.0))
        );
        let changes = scene.evaluate();
        assert!(changes.primitives.contains(&g.graphics().index()));
    }

    #[test]
    fn unchanged_restyle_marks_nothing() {
        let mut scene = DrawableScene::new();
        let style = Style::new().color("red");
        let mut g = build(
            &mut scene,
            DecodedFeature::point(5, 6),
            &style,
            PointMode::Circle,
        );
        let _ = scene.evaluate();

        let resolved = ResolvedStyle::resolve(GeometryKind::Point, &style);
        g.set_style(&mut scene, &resolved);
        assert!(scene.evaluate().is_empty());
    }

    #[test]
    fn restyle_swaps_icon() {
        let mut scene = DrawableScene::new();
        let first = Style::new().icon(Icon::new("a.png", Size::new(10.0, 10.0)));
        let mut g = build(
            &mut scene,
            DecodedFeature::point(20, 20),
            &first,
            PointMode::Circle,
        );

        let second = Style::new().icon(
            Icon::new("b.png", Size::new(4.0, 4.0)).with_anchor(Vec2::new(2.0, 2.0)),
        );
        g.set_style(&mut scene, &ResolvedStyle::resolve(GeometryKind::Point, &second));
        let Primitive::Image(image) = scene.primitive(g.graphics()) else {
            panic!("icon should stay an image");
        };
        assert_eq!(image.href, "b.png");
        assert_eq!(image.rect, Rect::new(18.0, 18.0, 22.0, 22.0));
    }

    #[test]
    fn restyle_hidden_sets_flag() {
        let mut scene = DrawableScene::new();
        let line = DecodedFeature::new(
            GeometryKind::LineString,
            alloc::vec![alloc::vec![TilePoint::new(0, 0), TilePoint::new(4, 0)]],
        );
        let mut g = build(&mut scene, line, &Style::new(), PointMode::Circle);
        let style = ResolvedStyle::resolve(GeometryKind::LineString, &Style::new().hidden(true));
        g.set_style(&mut scene, &style);
        assert!(scene.flags(g.graphics()).hidden);
        let _ = scene.evaluate();
        let GraphicsShape::ThickenedLine { visible, .. } = g.shape() else {
            panic!("interactive line should be thickened");
        };
        assert!(scene.effective_hidden(visible));
    }

    #[test]
    fn detach_destroys_all_drawables() {
        let mut scene = DrawableScene::new();
        let line = DecodedFeature::new(
            GeometryKind::LineString,
            alloc::vec![alloc::vec![TilePoint::new(0, 0), TilePoint::new(4, 0)]],
        );
        let g = build(&mut scene, line, &Style::new(), PointMode::Circle);
        assert_eq!(g.detach(&mut scene), 3);
        assert_eq!(scene.live_count(), 0);
        assert_eq!(g.detach(&mut scene), 0);
    }
}
