// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The decoder boundary: features, layers and decoded tiles.
//!
//! Binary tile decoding happens outside this crate. A decoder hands over a
//! [`TileData`]: an ordered list of named [`VectorLayer`]s, each carrying an
//! extent and a sequence of [`Feature`]s. Features are read-only once
//! decoded; their ring geometry may be produced lazily by the implementor.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::BuildError;
use crate::value::{Properties, Value};

/// Default extent of a vector tile layer.
pub const DEFAULT_EXTENT: u32 = 4096;

/// A point in tile-local extent units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TilePoint {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate (grows downwards).
    pub y: i32,
}

impl TilePoint {
    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A ring (or line part) of tile-local points.
pub type Ring = Vec<TilePoint>;

/// An axis-aligned bounding box in tile-local extent units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileBBox {
    /// Minimum corner.
    pub min: TilePoint,
    /// Maximum corner.
    pub max: TilePoint,
}

impl TileBBox {
    /// Creates a box from its corners.
    #[must_use]
    pub const fn new(min: TilePoint, max: TilePoint) -> Self {
        Self { min, max }
    }

    /// Computes the bounding box of a set of rings.
    ///
    /// Returns a zero box at the origin when there are no points.
    #[must_use]
    pub fn of_rings(rings: &[Ring]) -> Self {
        let mut points = rings.iter().flatten();
        let Some(first) = points.next() else {
            return Self::default();
        };
        points.fold(Self::new(*first, *first), |b, p| Self {
            min: TilePoint::new(b.min.x.min(p.x), b.min.y.min(p.y)),
            max: TilePoint::new(b.max.x.max(p.x), b.max.y.max(p.y)),
        })
    }
}

/// The closed set of geometry classes the builder knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// One or more points; only the first point is drawn.
    Point,
    /// One or more open polylines.
    LineString,
    /// One or more closed rings (outer rings and holes).
    Polygon,
}

impl GeometryKind {
    /// Decoder tag for points.
    pub const POINT_TAG: u32 = 1;
    /// Decoder tag for line strings.
    pub const LINE_STRING_TAG: u32 = 2;
    /// Decoder tag for polygons.
    pub const POLYGON_TAG: u32 = 3;

    /// Maps a decoder geometry tag to a geometry class.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnsupportedGeometry`] for any tag other than the
    /// three known ones (including the "unknown" tag `0`).
    pub fn from_tag(tag: u32) -> Result<Self, BuildError> {
        match tag {
            Self::POINT_TAG => Ok(Self::Point),
            Self::LINE_STRING_TAG => Ok(Self::LineString),
            Self::POLYGON_TAG => Ok(Self::Polygon),
            tag => Err(BuildError::UnsupportedGeometry { tag }),
        }
    }

    /// Returns the decoder tag for this class.
    #[must_use]
    pub const fn tag(self) -> u32 {
        match self {
            Self::Point => Self::POINT_TAG,
            Self::LineString => Self::LINE_STRING_TAG,
            Self::Polygon => Self::POLYGON_TAG,
        }
    }
}

/// A decoded feature, as produced by an external tile decoder.
pub trait Feature: fmt::Debug {
    /// The decoder's raw geometry type tag.
    fn geometry_tag(&self) -> u32;

    /// The feature id, if the tile carries one.
    fn id(&self) -> Option<u64> {
        None
    }

    /// The feature's properties.
    fn properties(&self) -> &Properties;

    /// Produces the feature geometry as a list of rings in extent units.
    fn rings(&self) -> Vec<Ring>;

    /// Bounding box of the geometry in extent units.
    fn bbox(&self) -> TileBBox;

    /// The geometry class, or an error for unsupported tags.
    ///
    /// # Errors
    ///
    /// See [`GeometryKind::from_tag`].
    fn kind(&self) -> Result<GeometryKind, BuildError> {
        GeometryKind::from_tag(self.geometry_tag())
    }
}

/// An owned, eagerly decoded feature.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedFeature {
    tag: u32,
    id: Option<u64>,
    properties: Properties,
    rings: Vec<Ring>,
    bbox: TileBBox,
}

impl DecodedFeature {
    /// Creates a feature of a known geometry class.
    #[must_use]
    pub fn new(kind: GeometryKind, rings: Vec<Ring>) -> Self {
        Self::with_tag(kind.tag(), rings)
    }

    /// Creates a feature with a raw decoder tag, which may be unsupported.
    #[must_use]
    pub fn with_tag(tag: u32, rings: Vec<Ring>) -> Self {
        let bbox = TileBBox::of_rings(&rings);
        Self {
            tag,
            id: None,
            properties: Properties::new(),
            rings,
            bbox,
        }
    }

    /// Creates a single-point feature.
    #[must_use]
    pub fn point(x: i32, y: i32) -> Self {
        Self::new(GeometryKind::Point, alloc::vec![alloc::vec![TilePoint::new(x, y)]])
    }

    /// Sets the feature id.
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Wraps the feature for sharing between a tile layer and its graphics.
    #[must_use]
    pub fn into_shared(self) -> Rc<dyn Feature> {
        Rc::new(self)
    }
}

impl Feature for DecodedFeature {
    fn geometry_tag(&self) -> u32 {
        self.tag
    }

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn rings(&self) -> Vec<Ring> {
        self.rings.clone()
    }

    fn bbox(&self) -> TileBBox {
        self.bbox
    }
}

/// One named layer of a decoded tile.
#[derive(Clone, Debug)]
pub struct VectorLayer {
    /// Size of the layer's coordinate space.
    pub extent: u32,
    /// Features in decode order.
    pub features: Vec<Rc<dyn Feature>>,
}

impl VectorLayer {
    /// Creates an empty layer with the given extent.
    #[must_use]
    pub fn new(extent: u32) -> Self {
        Self {
            extent,
            features: Vec::new(),
        }
    }

    /// Appends a feature.
    #[must_use]
    pub fn with_feature(mut self, feature: impl Feature + 'static) -> Self {
        self.features.push(Rc::new(feature));
        self
    }
}

impl Default for VectorLayer {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENT)
    }
}

/// A decoded tile: named layers in decode order.
#[derive(Clone, Debug, Default)]
pub struct TileData {
    layers: Vec<(String, VectorLayer)>,
}

impl TileData {
    /// Creates a tile with no layers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a layer. A later layer with an existing name replaces the
    /// earlier one in place.
    #[must_use]
    pub fn with_layer(mut self, name: impl Into<String>, layer: VectorLayer) -> Self {
        self.insert(name, layer);
        self
    }

    /// Inserts a layer, replacing any layer of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, layer: VectorLayer) {
        let name = name.into();
        if let Some(slot) = self.layers.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = layer;
        } else {
            self.layers.push((name, layer));
        }
    }

    /// Layer names in decode order.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|(n, _)| n.as_str())
    }

    /// Layers with their names, in decode order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VectorLayer)> {
        self.layers.iter().map(|(n, l)| (n.as_str(), l))
    }

    /// Looks up a layer by name.
    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&VectorLayer> {
        self.layers.iter().find(|(n, _)| n == name).map(|(_, l)| l)
    }

    /// Returns `true` if the tile has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn bbox_of_rings_spans_all_points() {
        let rings = vec![
            vec![TilePoint::new(5, 9), TilePoint::new(12, 1)],
            vec![TilePoint::new(-3, 4)],
        ];
        let b = TileBBox::of_rings(&rings);
        assert_eq!(b.min, TilePoint::new(-3, 1));
        assert_eq!(b.max, TilePoint::new(12, 9));
    }

    #[test]
    fn unknown_tag_is_unsupported() {
        assert_eq!(
            GeometryKind::from_tag(0),
            Err(BuildError::UnsupportedGeometry { tag: 0 })
        );
        assert_eq!(GeometryKind::from_tag(3), Ok(GeometryKind::Polygon));
    }

    #[test]
    fn duplicate_layer_name_replaces_in_place() {
        let tile = TileData::new()
            .with_layer("water", VectorLayer::new(4096))
            .with_layer("roads", VectorLayer::new(4096))
            .with_layer("water", VectorLayer::new(512));
        let names: Vec<_> = tile.layer_names().collect();
        assert_eq!(names, ["water", "roads"]);
        assert_eq!(tile.layer("water").map(|l| l.extent), Some(512));
    }
}
