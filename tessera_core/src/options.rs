// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid configuration.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use kurbo::Size;

use crate::builder::{FeatureToGraphics, PointMode};
use crate::feature::Feature;
use crate::resolve::{FeatureId, FeatureIdFn, FilterFn, StyleSource};
use crate::zoom::DetailZoom;

/// Default tile size in render units.
pub const DEFAULT_TILE_SIZE: Size = Size::new(256.0, 256.0);

/// Comparator that orders the layer names present in a tile.
pub type LayerOrderFn = Rc<dyn Fn(&str, &str) -> Ordering>;

/// Configuration of a [`TileSessionRegistry`](crate::registry::TileSessionRegistry).
///
/// Every field is optional except the tile size. Build one with
/// [`Default`] and the `with_*` methods.
#[derive(Clone)]
pub struct GridOptions {
    /// Custom graphics builder; `None` uses
    /// [`DefaultBuilder`](crate::builder::DefaultBuilder) with
    /// [`point_mode`](Self::point_mode).
    pub feature_to_graphics: Option<Rc<dyn FeatureToGraphics>>,
    /// Feature filter, run once per feature at build time.
    pub filter: Option<FilterFn>,
    /// Comparator for layer draw order. Ignored when
    /// [`layers`](Self::layers) is set.
    pub layer_order: Option<LayerOrderFn>,
    /// Allow-list of layers, in draw order.
    pub layers: Option<Vec<String>>,
    /// Lowest zoom tile data is requested at.
    pub min_detail_zoom: Option<u32>,
    /// Highest zoom tile data is requested at.
    pub max_detail_zoom: Option<u32>,
    /// Style applied to every feature.
    pub style: Option<StyleSource>,
    /// Legacy per-layer styles, used when [`style`](Self::style) is unset.
    pub layer_styles: BTreeMap<String, StyleSource>,
    /// Extracts the id that per-feature overrides are keyed by.
    pub feature_id: Option<FeatureIdFn>,
    /// Tile size at display zoom, in render units.
    pub tile_size: Size,
    /// How the default builder draws points without an icon.
    pub point_mode: PointMode,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            feature_to_graphics: None,
            filter: None,
            layer_order: None,
            layers: None,
            min_detail_zoom: None,
            max_detail_zoom: None,
            style: None,
            layer_styles: BTreeMap::new(),
            feature_id: None,
            tile_size: DEFAULT_TILE_SIZE,
            point_mode: PointMode::Circle,
        }
    }
}

impl fmt::Debug for GridOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridOptions")
            .field("feature_to_graphics", &self.feature_to_graphics.is_some())
            .field("filter", &self.filter.is_some())
            .field("layer_order", &self.layer_order.is_some())
            .field("layers", &self.layers)
            .field("min_detail_zoom", &self.min_detail_zoom)
            .field("max_detail_zoom", &self.max_detail_zoom)
            .field("style", &self.style)
            .field("layer_styles", &self.layer_styles)
            .field("feature_id", &self.feature_id.is_some())
            .field("tile_size", &self.tile_size)
            .field("point_mode", &self.point_mode)
            .finish()
    }
}

impl GridOptions {
    /// Sets a custom graphics builder.
    #[must_use]
    pub fn with_feature_to_graphics(mut self, builder: impl FeatureToGraphics + 'static) -> Self {
        self.feature_to_graphics = Some(Rc::new(builder));
        self
    }

    /// Sets the feature filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Fn(&dyn Feature, &str, u32) -> bool + 'static) -> Self {
        self.filter = Some(Rc::new(filter));
        self
    }

    /// Sets the layer order comparator.
    #[must_use]
    pub fn with_layer_order(mut self, order: impl Fn(&str, &str) -> Ordering + 'static) -> Self {
        self.layer_order = Some(Rc::new(order));
        self
    }

    /// Restricts drawing to the given layers, in the given order.
    #[must_use]
    pub fn with_layers<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers = Some(layers.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the lowest data zoom.
    #[must_use]
    pub fn with_min_detail_zoom(mut self, zoom: u32) -> Self {
        self.min_detail_zoom = Some(zoom);
        self
    }

    /// Sets the highest data zoom.
    #[must_use]
    pub fn with_max_detail_zoom(mut self, zoom: u32) -> Self {
        self.max_detail_zoom = Some(zoom);
        self
    }

    /// Sets the style applied to every feature.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<StyleSource>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Adds a legacy per-layer style.
    #[must_use]
    pub fn with_layer_style(mut self, layer: impl Into<String>, style: impl Into<StyleSource>) -> Self {
        self.layer_styles.insert(layer.into(), style.into());
        self
    }

    /// Sets the feature id extractor.
    #[must_use]
    pub fn with_feature_id(
        mut self,
        feature_id: impl Fn(&dyn Feature) -> Option<FeatureId> + 'static,
    ) -> Self {
        self.feature_id = Some(Rc::new(feature_id));
        self
    }

    /// Sets the tile size.
    #[must_use]
    pub fn with_tile_size(mut self, size: Size) -> Self {
        self.tile_size = size;
        self
    }

    /// Sets how the default builder draws points.
    #[must_use]
    pub fn with_point_mode(mut self, mode: PointMode) -> Self {
        self.point_mode = mode;
        self
    }

    /// The configured detail zoom band.
    #[must_use]
    pub fn detail_zoom(&self) -> DetailZoom {
        DetailZoom::new(self.min_detail_zoom, self.max_detail_zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;

    #[test]
    fn defaults() {
        let options = GridOptions::default();
        assert_eq!(options.tile_size, Size::new(256.0, 256.0));
        assert_eq!(options.detail_zoom(), DetailZoom::UNBOUNDED);
        assert!(options.style.is_none());
        assert!(options.layers.is_none());
    }

    #[test]
    fn builders_fill_fields() {
        let options = GridOptions::default()
            .with_layers(["water", "roads"])
            .with_min_detail_zoom(2)
            .with_max_detail_zoom(14)
            .with_layer_style("water", Style::new().color("blue"))
            .with_point_mode(PointMode::Path);
        assert_eq!(
            options.layers.as_deref(),
            Some(&[String::from("water"), String::from("roads")][..])
        );
        assert_eq!(options.detail_zoom(), DetailZoom::new(Some(2), Some(14)));
        assert!(options.layer_styles.contains_key("water"));
        assert_eq!(options.point_mode, PointMode::Path);
    }
}
