// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation attributes attached to drawables.

use alloc::string::String;

/// Shape drawn at the ends of open stroked subpaths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineCap {
    /// Flat end at the endpoint.
    Butt,
    /// Semicircular end.
    #[default]
    Round,
    /// Square end extending past the endpoint.
    Square,
}

impl LineCap {
    /// The SVG keyword for this cap.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Shape drawn at the corners of stroked paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineJoin {
    /// Sharp corner.
    Miter,
    /// Rounded corner.
    #[default]
    Round,
    /// Cut-off corner.
    Bevel,
}

impl LineJoin {
    /// The SVG keyword for this join.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// Rule deciding which regions of a self-overlapping path are inside.
///
/// `EvenOdd` renders multi-ring polygons (outer rings plus holes) correctly
/// without tracking ring winding order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    /// Inside if a ray crosses the outline an odd number of times.
    #[default]
    EvenOdd,
    /// Inside if the winding number is non-zero.
    NonZero,
}

impl FillRule {
    /// The SVG keyword for this rule.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EvenOdd => "evenodd",
            Self::NonZero => "nonzero",
        }
    }
}

/// Stroke attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Stroke color, as a CSS color string.
    pub color: String,
    /// Stroke opacity (0.0–1.0).
    pub opacity: f64,
    /// Stroke width in render units.
    pub width: f64,
    /// End cap.
    pub cap: LineCap,
    /// Corner join.
    pub join: LineJoin,
    /// Dash pattern, as an SVG dash list.
    pub dash_array: Option<String>,
    /// Offset into the dash pattern.
    pub dash_offset: Option<f64>,
}

/// Fill attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Fill {
    /// Fill color, as a CSS color string.
    pub color: String,
    /// Fill opacity (0.0–1.0).
    pub opacity: f64,
    /// Fill rule.
    pub rule: FillRule,
}

/// The full set of presentation attributes of one drawable.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    /// Stroke, or `None` for no stroke.
    pub stroke: Option<Stroke>,
    /// Fill, or `None` for no fill.
    pub fill: Option<Fill>,
    /// Whole-element opacity (used by images).
    pub opacity: f64,
    /// Extra class name for host styling hooks.
    pub class_name: Option<String>,
    /// Whether the drawable receives pointer events.
    pub interactive: bool,
}

impl Paint {
    /// Paint that draws nothing and ignores pointer events; used for groups.
    pub const NONE: Self = Self {
        stroke: None,
        fill: None,
        opacity: 1.0,
        class_name: None,
        interactive: false,
    };
}

impl Default for Paint {
    fn default() -> Self {
        Self::NONE
    }
}
