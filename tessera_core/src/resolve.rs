// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style resolution.
//!
//! [`StyleResolver::resolve`] decides, for one feature of one tile layer at
//! one zoom, whether the feature is drawn and with which [`ResolvedStyle`].
//! Sources are consulted through a fixed priority chain:
//!
//! 1. the filter, which can reject the feature outright;
//! 2. a per-feature-id override from the [`OverrideTable`], if one exists
//!    for the feature's id; it replaces everything below;
//! 3. the explicit `style` source;
//! 4. the legacy per-layer table, indexed by layer name.
//!
//! A source is either static or computed from the feature's properties, and
//! yields a [`StyleValue`]. An empty list skips the feature; a non-empty list
//! uses its first entry; an undefined value draws with the class defaults.
//!
//! The override table is owned by the registry and passed in by reference, so
//! resolution stays a pure function of its inputs.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::feature::{Feature, GeometryKind};
use crate::style::{ResolvedStyle, Style};
use crate::value::Properties;

/// Computes a style from `(properties, zoom, geometry kind)`.
pub type StyleFn = Rc<dyn Fn(&Properties, u32, GeometryKind) -> StyleValue>;

/// Decides whether a feature of a layer is drawn at a zoom.
pub type FilterFn = Rc<dyn Fn(&dyn Feature, &str, u32) -> bool>;

/// Extracts the identity used for per-feature style overrides.
pub type FeatureIdFn = Rc<dyn Fn(&dyn Feature) -> Option<FeatureId>>;

/// What a style source yields.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum StyleValue {
    /// No style: the feature draws with its class defaults.
    #[default]
    Undefined,
    /// A single style.
    One(Style),
    /// A list of styles. Empty skips the feature; otherwise the first entry
    /// is used and the rest are ignored.
    Many(Vec<Style>),
}

impl StyleValue {
    /// Picks the style to apply, or `None` to skip the feature.
    #[must_use]
    pub fn pick(&self) -> Option<Style> {
        match self {
            Self::Undefined => Some(Style::default()),
            Self::One(style) => Some(style.clone()),
            Self::Many(styles) => styles.first().cloned(),
        }
    }
}

impl From<Style> for StyleValue {
    fn from(style: Style) -> Self {
        Self::One(style)
    }
}

impl From<Vec<Style>> for StyleValue {
    fn from(styles: Vec<Style>) -> Self {
        Self::Many(styles)
    }
}

impl From<Option<Style>> for StyleValue {
    fn from(style: Option<Style>) -> Self {
        style.map_or(Self::Undefined, Self::One)
    }
}

/// A static or computed style.
#[derive(Clone)]
pub enum StyleSource {
    /// A fixed style value.
    Static(StyleValue),
    /// A style computed per feature.
    Computed(StyleFn),
}

impl StyleSource {
    /// Wraps a style function.
    pub fn computed(f: impl Fn(&Properties, u32, GeometryKind) -> StyleValue + 'static) -> Self {
        Self::Computed(Rc::new(f))
    }

    /// Evaluates the source for one feature.
    #[must_use]
    pub fn evaluate(&self, properties: &Properties, zoom: u32, kind: GeometryKind) -> StyleValue {
        match self {
            Self::Static(value) => value.clone(),
            Self::Computed(f) => f(properties, zoom, kind),
        }
    }
}

impl fmt::Debug for StyleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<Style> for StyleSource {
    fn from(style: Style) -> Self {
        Self::Static(style.into())
    }
}

impl From<Vec<Style>> for StyleSource {
    fn from(styles: Vec<Style>) -> Self {
        Self::Static(styles.into())
    }
}

impl From<StyleValue> for StyleSource {
    fn from(value: StyleValue) -> Self {
        Self::Static(value)
    }
}

/// Identity of a feature across tiles, as extracted by a [`FeatureIdFn`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureId {
    /// A numeric id.
    Int(u64),
    /// A string id.
    Str(String),
}

impl From<u64> for FeatureId {
    fn from(id: u64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        Self::Str(id.into())
    }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

/// A per-feature-id style override.
#[derive(Clone, Debug)]
pub enum IdOverride {
    /// Applies to the feature in every layer.
    All(StyleSource),
    /// Applies only in the listed layers; other layers keep their normal
    /// style.
    PerLayer(BTreeMap<String, StyleSource>),
}

impl IdOverride {
    /// The override source for a layer, if any.
    #[must_use]
    pub fn for_layer(&self, layer: &str) -> Option<&StyleSource> {
        match self {
            Self::All(source) => Some(source),
            Self::PerLayer(map) => map.get(layer),
        }
    }
}

impl From<StyleSource> for IdOverride {
    fn from(source: StyleSource) -> Self {
        Self::All(source)
    }
}

impl From<Style> for IdOverride {
    fn from(style: Style) -> Self {
        Self::All(style.into())
    }
}

/// Per-feature-id overrides, shared by every tile.
#[derive(Clone, Debug, Default)]
pub struct OverrideTable {
    entries: HashMap<FeatureId, IdOverride>,
}

impl OverrideTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the override for an id, returning the previous one.
    pub fn insert(&mut self, id: FeatureId, style: IdOverride) -> Option<IdOverride> {
        self.entries.insert(id, style)
    }

    /// Removes the override for an id.
    pub fn remove(&mut self, id: &FeatureId) -> Option<IdOverride> {
        self.entries.remove(id)
    }

    /// Looks up the override for an id.
    #[must_use]
    pub fn get(&self, id: &FeatureId) -> Option<&IdOverride> {
        self.entries.get(id)
    }

    /// Number of overridden ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no id is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of resolving one feature.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// Do not draw the feature.
    Skip,
    /// Draw the feature with this style.
    Style(ResolvedStyle),
}

impl Resolution {
    /// The resolved style, if the feature is drawn.
    #[must_use]
    pub fn into_style(self) -> Option<ResolvedStyle> {
        match self {
            Self::Skip => None,
            Self::Style(style) => Some(style),
        }
    }
}

/// The configured style sources.
#[derive(Clone, Default)]
pub struct StyleResolver {
    /// Rejects features before any style is computed.
    pub filter: Option<FilterFn>,
    /// The explicit style; takes precedence over `layer_styles`.
    pub style: Option<StyleSource>,
    /// Legacy per-layer styles, indexed by tile layer name.
    pub layer_styles: BTreeMap<String, StyleSource>,
    /// Extracts the id used to look up per-feature overrides.
    pub feature_id: Option<FeatureIdFn>,
}

impl fmt::Debug for StyleResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleResolver")
            .field("filter", &self.filter.is_some())
            .field("style", &self.style)
            .field("layer_styles", &self.layer_styles)
            .field("feature_id", &self.feature_id.is_some())
            .finish()
    }
}

impl StyleResolver {
    /// Creates a resolver with no sources; every feature draws with its
    /// class defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the filter. Features are accepted when no filter is configured.
    #[must_use]
    pub fn accepts(&self, feature: &dyn Feature, layer: &str, zoom: u32) -> bool {
        self.filter.as_ref().is_none_or(|f| f(feature, layer, zoom))
    }

    /// Extracts the feature's override id, if an id function is configured.
    #[must_use]
    pub fn feature_id(&self, feature: &dyn Feature) -> Option<FeatureId> {
        self.feature_id.as_ref().and_then(|f| f(feature))
    }

    /// Resolves the style of a feature, running the filter first.
    #[must_use]
    pub fn resolve(
        &self,
        overrides: &OverrideTable,
        feature: &dyn Feature,
        kind: GeometryKind,
        layer: &str,
        zoom: u32,
    ) -> Resolution {
        if !self.accepts(feature, layer, zoom) {
            return Resolution::Skip;
        }
        self.restyle(overrides, feature, kind, layer, zoom)
    }

    /// Resolves the style of an already accepted feature, without consulting
    /// the filter.
    #[must_use]
    pub fn restyle(
        &self,
        overrides: &OverrideTable,
        feature: &dyn Feature,
        kind: GeometryKind,
        layer: &str,
        zoom: u32,
    ) -> Resolution {
        let value = self
            .source_for(overrides, feature, layer)
            .map_or(StyleValue::Undefined, |source| {
                source.evaluate(feature.properties(), zoom, kind)
            });
        match value.pick() {
            Some(style) => Resolution::Style(ResolvedStyle::resolve(kind, &style)),
            None => Resolution::Skip,
        }
    }

    /// Selects the winning source for a feature of a layer.
    fn source_for<'a>(
        &'a self,
        overrides: &'a OverrideTable,
        feature: &dyn Feature,
        layer: &str,
    ) -> Option<&'a StyleSource> {
        let overridden = self
            .feature_id(feature)
            .and_then(|id| overrides.get(&id))
            .and_then(|o| o.for_layer(layer));
        overridden
            .or(self.style.as_ref())
            .or_else(|| self.layer_styles.get(layer))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::feature::DecodedFeature;
    use crate::value::Value;

    fn road(id: u64) -> DecodedFeature {
        DecodedFeature::new(
            GeometryKind::LineString,
            vec![vec![
                crate::feature::TilePoint::new(0, 0),
                crate::feature::TilePoint::new(10, 0),
            ]],
        )
        .with_id(id)
        .with_property("class", "primary")
    }

    fn by_feature_id() -> FeatureIdFn {
        Rc::new(|f: &dyn Feature| f.id().map(FeatureId::Int))
    }

    fn style_of(resolution: Resolution) -> ResolvedStyle {
        match resolution {
            Resolution::Style(style) => style,
            Resolution::Skip => panic!("feature was skipped"),
        }
    }

    #[test]
    fn no_sources_yields_defaults() {
        let resolver = StyleResolver::new();
        let r = resolver.resolve(
            &OverrideTable::new(),
            &road(1),
            GeometryKind::LineString,
            "roads",
            12,
        );
        assert_eq!(style_of(r), ResolvedStyle::path_defaults());
    }

    #[test]
    fn filter_rejects_before_styling() {
        let resolver = StyleResolver {
            filter: Some(Rc::new(|_: &dyn Feature, layer: &str, zoom: u32| {
                layer != "roads" || zoom > 14
            })),
            ..StyleResolver::new()
        };
        let overrides = OverrideTable::new();
        let f = road(1);
        assert_eq!(
            resolver.resolve(&overrides, &f, GeometryKind::LineString, "roads", 12),
            Resolution::Skip
        );
        assert_ne!(
            resolver.resolve(&overrides, &f, GeometryKind::LineString, "roads", 15),
            Resolution::Skip
        );
    }

    #[test]
    fn explicit_style_beats_layer_table() {
        let mut resolver = StyleResolver::new();
        resolver
            .layer_styles
            .insert("roads".into(), Style::new().color("gray").into());
        resolver.style = Some(Style::new().color("black").into());
        let r = resolver.resolve(
            &OverrideTable::new(),
            &road(1),
            GeometryKind::LineString,
            "roads",
            12,
        );
        assert_eq!(style_of(r).color, "black");
    }

    #[test]
    fn layer_table_is_indexed_by_layer_name() {
        let mut resolver = StyleResolver::new();
        resolver
            .layer_styles
            .insert("water".into(), Style::new().color("blue").into());
        let overrides = OverrideTable::new();
        let f = road(1);
        let water = resolver.resolve(&overrides, &f, GeometryKind::LineString, "water", 3);
        let other = resolver.resolve(&overrides, &f, GeometryKind::LineString, "roads", 3);
        assert_eq!(style_of(water).color, "blue");
        assert_eq!(style_of(other).color, crate::style::DEFAULT_COLOR);
    }

    #[test]
    fn empty_list_skips_every_feature() {
        let overrides = OverrideTable::new();
        let computed = StyleResolver {
            style: Some(StyleSource::computed(|_, _, _| StyleValue::Many(Vec::new()))),
            ..StyleResolver::new()
        };
        let fixed = StyleResolver {
            style: Some(Vec::<Style>::new().into()),
            ..StyleResolver::new()
        };
        for resolver in [computed, fixed] {
            for layer in ["roads", "water"] {
                for zoom in [0, 9, 20] {
                    for kind in [GeometryKind::Point, GeometryKind::Polygon] {
                        assert_eq!(
                            resolver.resolve(&overrides, &road(7), kind, layer, zoom),
                            Resolution::Skip
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn first_list_entry_wins() {
        let resolver = StyleResolver {
            style: Some(vec![Style::new().color("first"), Style::new().color("second")].into()),
            ..StyleResolver::new()
        };
        let r = resolver.resolve(
            &OverrideTable::new(),
            &road(1),
            GeometryKind::LineString,
            "roads",
            1,
        );
        assert_eq!(style_of(r).color, "first");
    }

    #[test]
    fn computed_style_sees_properties_zoom_and_kind() {
        let resolver = StyleResolver {
            style: Some(StyleSource::computed(|props, zoom, kind| {
                let primary = props.get("class") == Some(&Value::from("primary"));
                let weight = if primary { 4.0 } else { 1.0 } + f64::from(zoom);
                let fill = kind == GeometryKind::Polygon;
                Style::new().weight(weight).fill(fill).into()
            })),
            ..StyleResolver::new()
        };
        let r = resolver.resolve(
            &OverrideTable::new(),
            &road(1),
            GeometryKind::LineString,
            "roads",
            2,
        );
        let style = style_of(r);
        assert_eq!(style.weight, 6.0);
        assert!(!style.fill);
    }

    #[test]
    fn id_override_always_wins() {
        let layer_style = Style::new().color("gray").weight(2.0);
        let override_style = Style::new().color("red");
        let mut resolver = StyleResolver {
            feature_id: Some(by_feature_id()),
            ..StyleResolver::new()
        };
        resolver
            .layer_styles
            .insert("roads".into(), layer_style.clone().into());
        let mut overrides = OverrideTable::new();
        overrides.insert(FeatureId::Int(42), override_style.clone().into());

        let expected = ResolvedStyle::resolve(GeometryKind::LineString, &override_style);
        for explicit in [None, Some(StyleSource::from(Style::new().color("black")))] {
            resolver.style = explicit;
            let r = resolver.resolve(&overrides, &road(42), GeometryKind::LineString, "roads", 9);
            assert_eq!(style_of(r), expected, "override is not merged with the layer style");
        }

        let other = resolver.resolve(&overrides, &road(43), GeometryKind::LineString, "roads", 9);
        assert_ne!(style_of(other).color, "red");
    }

    #[test]
    fn per_layer_override_only_applies_to_its_layer() {
        let mut per_layer = BTreeMap::new();
        per_layer.insert(String::from("roads"), StyleSource::from(Style::new().color("red")));
        let mut overrides = OverrideTable::new();
        overrides.insert(FeatureId::Int(5), IdOverride::PerLayer(per_layer));
        let mut resolver = StyleResolver {
            feature_id: Some(by_feature_id()),
            ..StyleResolver::new()
        };
        resolver
            .layer_styles
            .insert("bridges".into(), Style::new().color("gray").into());

        let f = road(5);
        let in_roads = resolver.resolve(&overrides, &f, GeometryKind::LineString, "roads", 9);
        let in_bridges = resolver.resolve(&overrides, &f, GeometryKind::LineString, "bridges", 9);
        assert_eq!(style_of(in_roads).color, "red");
        assert_eq!(style_of(in_bridges).color, "gray");
    }

    #[test]
    fn overrides_ignored_without_id_function() {
        let mut overrides = OverrideTable::new();
        overrides.insert(FeatureId::Int(42), Style::new().color("red").into());
        let resolver = StyleResolver::new();
        let r = resolver.resolve(&overrides, &road(42), GeometryKind::LineString, "roads", 9);
        assert_eq!(style_of(r).color, crate::style::DEFAULT_COLOR);
    }

    #[test]
    fn undefined_from_function_draws_defaults() {
        let resolver = StyleResolver {
            style: Some(StyleSource::computed(|_, _, _| StyleValue::Undefined)),
            ..StyleResolver::new()
        };
        let r = resolver.resolve(
            &OverrideTable::new(),
            &road(1),
            GeometryKind::Polygon,
            "landuse",
            9,
        );
        assert_eq!(style_of(r), ResolvedStyle::polygon_defaults());
    }
}
