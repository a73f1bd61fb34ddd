// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable geometry.

use alloc::string::String;

use kurbo::{BezPath, Circle, Rect, Shape};

/// An image placed in render space.
#[derive(Clone, Debug, PartialEq)]
pub struct ImagePrimitive {
    /// Placement and size of the image.
    pub rect: Rect,
    /// Image source.
    pub href: String,
}

/// What a drawable draws.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Primitive {
    /// A container for child drawables; draws nothing itself.
    #[default]
    Group,
    /// A path of one or more subpaths.
    Path(BezPath),
    /// A native circle.
    Circle(Circle),
    /// A raster image.
    Image(ImagePrimitive),
}

impl Primitive {
    /// Returns `true` for groups.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }

    /// Geometric bounds of the primitive, ignoring stroke width. Groups have
    /// no bounds of their own.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect> {
        match self {
            Self::Group => None,
            Self::Path(path) => Some(path.bounding_box()),
            Self::Circle(circle) => Some(circle.bounding_box()),
            Self::Image(image) => Some(image.rect),
        }
    }
}
