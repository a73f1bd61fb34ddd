// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feature style model.
//!
//! A [`Style`] is partial: every key is optional. The keys a style sets are
//! applied over the defaults of the feature's geometry class to produce a
//! concrete [`ResolvedStyle`]:
//!
//! - lines use the path defaults (stroked, unfilled);
//! - polygons use the path defaults with fill enabled;
//! - points without an icon use the circle defaults (filled, radius 10).

use alloc::string::String;

use kurbo::{Size, Vec2};

use crate::feature::GeometryKind;
pub use crate::scene::{FillRule, LineCap, LineJoin};
use crate::scene::{Fill, Paint, Stroke};

/// Default stroke color.
pub const DEFAULT_COLOR: &str = "#3388ff";

/// Default circle radius for point features.
pub const DEFAULT_RADIUS: f64 = 10.0;

/// Default stroke width of the invisible hit-area overlay on lines.
pub const DEFAULT_INTERACTION_WEIGHT: f64 = 10.0;

/// An image marker for point features.
#[derive(Clone, Debug, PartialEq)]
pub struct Icon {
    /// Rendered image size.
    pub size: Size,
    /// Image source.
    pub url: String,
    /// Offset of the anchored point from the image's top-left corner.
    pub anchor: Vec2,
}

impl Icon {
    /// Creates an icon anchored at its top-left corner.
    #[must_use]
    pub fn new(url: impl Into<String>, size: Size) -> Self {
        Self {
            size,
            url: url.into(),
            anchor: Vec2::ZERO,
        }
    }

    /// Sets the anchor offset.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = anchor;
        self
    }
}

/// A partial style. Unset keys fall back to the geometry-class defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    /// Whether to stroke the outline.
    pub stroke: Option<bool>,
    /// Stroke color.
    pub color: Option<String>,
    /// Stroke opacity.
    pub opacity: Option<f64>,
    /// Stroke width.
    pub weight: Option<f64>,
    /// Stroke end cap.
    pub line_cap: Option<LineCap>,
    /// Stroke corner join.
    pub line_join: Option<LineJoin>,
    /// Stroke dash pattern.
    pub dash_array: Option<String>,
    /// Stroke dash offset.
    pub dash_offset: Option<f64>,
    /// Whether to fill the interior.
    pub fill: Option<bool>,
    /// Fill color; the stroke color when unset.
    pub fill_color: Option<String>,
    /// Fill opacity.
    pub fill_opacity: Option<f64>,
    /// Fill rule.
    pub fill_rule: Option<FillRule>,
    /// Circle radius for point features.
    pub radius: Option<f64>,
    /// Image marker for point features.
    pub icon: Option<Icon>,
    /// Whether the feature receives pointer events.
    pub interactive: Option<bool>,
    /// Whether the feature is hidden.
    pub hidden: Option<bool>,
    /// Extra class name.
    pub class_name: Option<String>,
    /// Stroke width of the hit-area overlay on interactive lines.
    pub interaction_weight: Option<f64>,
}

impl Style {
    /// Creates an empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `stroke`.
    #[must_use]
    pub fn stroke(mut self, stroke: bool) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Sets `color`.
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets `opacity`.
    #[must_use]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Sets `weight`.
    #[must_use]
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Sets `line_cap`.
    #[must_use]
    pub fn line_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = Some(cap);
        self
    }

    /// Sets `line_join`.
    #[must_use]
    pub fn line_join(mut self, join: LineJoin) -> Self {
        self.line_join = Some(join);
        self
    }

    /// Sets `dash_array`.
    #[must_use]
    pub fn dash_array(mut self, dashes: impl Into<String>) -> Self {
        self.dash_array = Some(dashes.into());
        self
    }

    /// Sets `dash_offset`.
    #[must_use]
    pub fn dash_offset(mut self, offset: f64) -> Self {
        self.dash_offset = Some(offset);
        self
    }

    /// Sets `fill`.
    #[must_use]
    pub fn fill(mut self, fill: bool) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Sets `fill_color`.
    #[must_use]
    pub fn fill_color(mut self, color: impl Into<String>) -> Self {
        self.fill_color = Some(color.into());
        self
    }

    /// Sets `fill_opacity`.
    #[must_use]
    pub fn fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = Some(opacity);
        self
    }

    /// Sets `fill_rule`.
    #[must_use]
    pub fn fill_rule(mut self, rule: FillRule) -> Self {
        self.fill_rule = Some(rule);
        self
    }

    /// Sets `radius`.
    #[must_use]
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets `icon`.
    #[must_use]
    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Sets `interactive`.
    #[must_use]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = Some(interactive);
        self
    }

    /// Sets `hidden`.
    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// Sets `class_name`.
    #[must_use]
    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    /// Sets `interaction_weight`.
    #[must_use]
    pub fn interaction_weight(mut self, weight: f64) -> Self {
        self.interaction_weight = Some(weight);
        self
    }
}

/// A style with every key decided.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    /// Whether to stroke the outline.
    pub stroke: bool,
    /// Stroke color.
    pub color: String,
    /// Stroke opacity.
    pub opacity: f64,
    /// Stroke width.
    pub weight: f64,
    /// Stroke end cap.
    pub line_cap: LineCap,
    /// Stroke corner join.
    pub line_join: LineJoin,
    /// Stroke dash pattern.
    pub dash_array: Option<String>,
    /// Stroke dash offset.
    pub dash_offset: Option<f64>,
    /// Whether to fill the interior.
    pub fill: bool,
    /// Fill color; the stroke color when `None`.
    pub fill_color: Option<String>,
    /// Fill opacity.
    pub fill_opacity: f64,
    /// Fill rule.
    pub fill_rule: FillRule,
    /// Circle radius for point features.
    pub radius: f64,
    /// Image marker for point features.
    pub icon: Option<Icon>,
    /// Whether the feature receives pointer events.
    pub interactive: bool,
    /// Whether the feature is hidden.
    pub hidden: bool,
    /// Extra class name.
    pub class_name: Option<String>,
    /// Stroke width of the hit-area overlay on interactive lines.
    pub interaction_weight: f64,
}

impl ResolvedStyle {
    /// Defaults for lines: stroked, unfilled.
    #[must_use]
    pub fn path_defaults() -> Self {
        Self {
            stroke: true,
            color: DEFAULT_COLOR.into(),
            opacity: 1.0,
            weight: 3.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            dash_array: None,
            dash_offset: None,
            fill: false,
            fill_color: None,
            fill_opacity: 0.2,
            fill_rule: FillRule::EvenOdd,
            radius: DEFAULT_RADIUS,
            icon: None,
            interactive: true,
            hidden: false,
            class_name: None,
            interaction_weight: DEFAULT_INTERACTION_WEIGHT,
        }
    }

    /// Defaults for polygons: the path defaults with fill enabled.
    #[must_use]
    pub fn polygon_defaults() -> Self {
        Self {
            fill: true,
            ..Self::path_defaults()
        }
    }

    /// Defaults for points drawn as circles.
    #[must_use]
    pub fn circle_defaults() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            ..Self::polygon_defaults()
        }
    }

    /// The defaults for a geometry class. Icons use the path defaults, since
    /// only their visual attributes apply.
    #[must_use]
    pub fn defaults_for(kind: GeometryKind, has_icon: bool) -> Self {
        match kind {
            GeometryKind::Point if !has_icon => Self::circle_defaults(),
            GeometryKind::Polygon => Self::polygon_defaults(),
            GeometryKind::Point | GeometryKind::LineString => Self::path_defaults(),
        }
    }

    /// Merges `style` over the defaults of `kind`.
    #[must_use]
    pub fn resolve(kind: GeometryKind, style: &Style) -> Self {
        let mut resolved = Self::defaults_for(kind, style.icon.is_some());
        resolved.apply(style);
        resolved
    }

    /// Overwrites every key that `style` sets.
    fn apply(&mut self, style: &Style) {
        macro_rules! take {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(v) = &style.$field {
                    self.$field = v.clone();
                })+
            };
        }
        macro_rules! take_opt {
            ($($field:ident),+ $(,)?) => {
                $(if style.$field.is_some() {
                    self.$field = style.$field.clone();
                })+
            };
        }
        take!(
            stroke,
            color,
            opacity,
            weight,
            line_cap,
            line_join,
            fill,
            fill_opacity,
            fill_rule,
            radius,
            interactive,
            hidden,
            interaction_weight,
        );
        take_opt!(dash_array, dash_offset, fill_color, icon, class_name);
    }

    /// The fill color actually used: the explicit fill color, else the stroke
    /// color.
    #[must_use]
    pub fn effective_fill_color(&self) -> &str {
        self.fill_color.as_deref().unwrap_or(&self.color)
    }

    /// Presentation attributes for a path or circle drawn with this style.
    #[must_use]
    pub fn paint(&self) -> Paint {
        Paint {
            stroke: self.stroke.then(|| Stroke {
                color: self.color.clone(),
                opacity: self.opacity,
                width: self.weight,
                cap: self.line_cap,
                join: self.line_join,
                dash_array: self.dash_array.clone(),
                dash_offset: self.dash_offset,
            }),
            fill: self.fill.then(|| Fill {
                color: self.effective_fill_color().into(),
                opacity: self.fill_opacity,
                rule: self.fill_rule,
            }),
            opacity: 1.0,
            class_name: self.class_name.clone(),
            interactive: self.interactive,
        }
    }

    /// Presentation attributes for an icon image drawn with this style.
    #[must_use]
    pub fn image_paint(&self) -> Paint {
        Paint {
            stroke: None,
            fill: None,
            opacity: self.opacity,
            class_name: self.class_name.clone(),
            interactive: self.interactive,
        }
    }

    /// Presentation attributes for the invisible hit-area overlay of a line:
    /// a wide stroke at zero opacity sharing the line's cap and join.
    #[must_use]
    pub fn interaction_paint(&self) -> Paint {
        Paint {
            stroke: Some(Stroke {
                color: self.color.clone(),
                opacity: 0.0,
                width: self.interaction_weight,
                cap: self.line_cap,
                join: self.line_join,
                dash_array: None,
                dash_offset: None,
            }),
            fill: None,
            opacity: 1.0,
            class_name: self.class_name.clone(),
            interactive: self.interactive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_defaults_differ() {
        let line = ResolvedStyle::resolve(GeometryKind::LineString, &Style::new());
        let poly = ResolvedStyle::resolve(GeometryKind::Polygon, &Style::new());
        let point = ResolvedStyle::resolve(GeometryKind::Point, &Style::new());
        assert!(!line.fill, "lines are unfilled by default");
        assert!(poly.fill, "polygons are filled by default");
        assert!(point.fill, "circles are filled by default");
        assert_eq!(point.radius, DEFAULT_RADIUS);
        assert_eq!(line.color, DEFAULT_COLOR);
    }

    #[test]
    fn icon_points_use_path_defaults() {
        let style = Style::new().icon(Icon::new("pin.png", Size::new(16.0, 16.0)));
        let resolved = ResolvedStyle::resolve(GeometryKind::Point, &style);
        assert!(!resolved.fill, "icons are not filled");
        assert!(resolved.icon.is_some());
    }

    #[test]
    fn explicit_keys_override_defaults() {
        let style = Style::new().fill(false).weight(7.5).dash_array("4 2");
        let resolved = ResolvedStyle::resolve(GeometryKind::Polygon, &style);
        assert!(!resolved.fill);
        assert_eq!(resolved.weight, 7.5);
        assert_eq!(resolved.dash_array.as_deref(), Some("4 2"));
    }

    #[test]
    fn fill_color_falls_back_to_stroke_color() {
        let resolved = ResolvedStyle::resolve(GeometryKind::Polygon, &Style::new().color("#123"));
        assert_eq!(resolved.effective_fill_color(), "#123");
        let paint = resolved.paint();
        assert_eq!(paint.fill.map(|f| f.color).as_deref(), Some("#123"));
    }

    #[test]
    fn interaction_paint_is_wide_and_transparent() {
        let resolved = ResolvedStyle::resolve(
            GeometryKind::LineString,
            &Style::new().weight(1.0).interaction_weight(14.0),
        );
        let paint = resolved.interaction_paint();
        let stroke = paint.stroke.as_ref().map(|s| (s.width, s.opacity));
        assert_eq!(stroke, Some((14.0, 0.0)));
        assert!(paint.fill.is_none());
    }
}
