// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end: tile data through the registry into SVG markup.

use kurbo::{Size, Vec2};
use tessera_core::feature::{DecodedFeature, Feature, GeometryKind, TileData, TilePoint, VectorLayer};
use tessera_core::options::GridOptions;
use tessera_core::registry::{TileSessionRegistry, TileTicket};
use tessera_core::resolve::{FeatureId, StyleSource, StyleValue};
use tessera_core::session::TileCoord;
use tessera_core::style::{Icon, Style};
use tessera_svg::{Presenter, SvgPresenter, render_document};

fn tile() -> TileData {
    TileData::new()
        .with_layer(
            "water",
            VectorLayer::new(256).with_feature(DecodedFeature::new(
                GeometryKind::Polygon,
                vec![vec![
                    TilePoint::new(0, 0),
                    TilePoint::new(10, 0),
                    TilePoint::new(10, 10),
                    TilePoint::new(0, 10),
                ]],
            )),
        )
        .with_layer(
            "roads",
            VectorLayer::new(256).with_feature(
                DecodedFeature::new(
                    GeometryKind::LineString,
                    vec![vec![TilePoint::new(0, 128), TilePoint::new(256, 128)]],
                )
                .with_id(1)
                .with_property("class", "primary"),
            ),
        )
        .with_layer(
            "pois",
            VectorLayer::new(256).with_feature(
                DecodedFeature::point(64, 32)
                    .with_id(2)
                    .with_property("kind", "cafe"),
            ),
        )
}

fn pois(x: i32, y: i32) -> TileData {
    TileData::new().with_layer("pois", VectorLayer::new(256).with_feature(DecodedFeature::point(x, y)))
}

fn start(registry: &mut TileSessionRegistry, coord: TileCoord) -> TileTicket {
    registry.on_tile_start(coord).tickets()[0]
}

fn registry(options: GridOptions) -> TileSessionRegistry {
    TileSessionRegistry::new(
        options.with_feature_id(|f: &dyn Feature| f.id().map(FeatureId::Int)),
    )
}

#[test]
fn tile_renders_to_svg() {
    let mut registry = registry(
        GridOptions::default()
            .with_layer_style("water", Style::new().color("#0000ff").weight(1.0))
            .with_layer_style(
                "roads",
                StyleSource::computed(|props, _zoom, _kind| {
                    match props.get("class").and_then(|v| v.as_str()) {
                        Some("primary") => Style::new().color("#ff8800").weight(4.0).into(),
                        _ => StyleValue::Undefined,
                    }
                }),
            ),
    );
    let mut presenter = SvgPresenter::new();

    let ticket = start(&mut registry, TileCoord::new(0, 0, 0));
    let outcome = registry
        .on_tile_loaded(ticket, Ok(tile()))
        .expect("fetch succeeded")
        .expect("session is live");
    assert_eq!(outcome.features, 3);

    let changes = registry.scene_mut().evaluate();
    presenter.apply(registry.scene(), &changes);
    let svg = presenter.document(
        registry.scene(),
        registry.display_root(),
        Size::new(256.0, 256.0),
    );

    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""), "{svg}");
    assert!(
        svg.contains("<path d=\"M 0 0 L 10 0 L 10 10 L 0 10 Z\" stroke=\"#0000ff\""),
        "polygon path: {svg}"
    );
    assert!(svg.contains("fill-rule=\"evenodd\""), "{svg}");
    assert!(
        svg.contains("<path d=\"M 0 128 L 256 128\" stroke=\"#ff8800\""),
        "visible road: {svg}"
    );
    assert!(
        svg.contains("stroke-opacity=\"0\" stroke-width=\"10\""),
        "interaction overlay: {svg}"
    );
    assert!(svg.contains("<circle cx=\"64\" cy=\"32\" r=\"10\""), "{svg}");

    let water = svg.find("#0000ff").expect("water drawn");
    let road = svg.find("#ff8800").expect("road drawn");
    let poi = svg.find("<circle").expect("poi drawn");
    assert!(water < road && road < poi, "layers paint in decode order");

    assert_eq!(svg, render_document(registry.scene(), registry.display_root(), Size::new(256.0, 256.0)));
}

#[test]
fn restyle_updates_markup_incrementally() {
    let mut registry = registry(GridOptions::default());
    let mut presenter = SvgPresenter::new();
    let ticket = start(&mut registry, TileCoord::new(0, 0, 0));
    let _ = registry.on_tile_loaded(ticket, Ok(tile())).unwrap();
    let changes = registry.scene_mut().evaluate();
    presenter.apply(registry.scene(), &changes);

    let icon = Icon::new("cafe.svg", Size::new(16.0, 16.0)).with_anchor(Vec2::new(8.0, 16.0));
    let _ = registry.set_feature_style(2_u64, Style::new().icon(icon));
    let _ = registry.set_feature_style(1_u64, Style::new().hidden(true));
    let changes = registry.scene_mut().evaluate();
    assert!(changes.added.is_empty(), "restyle builds nothing new");
    presenter.apply(registry.scene(), &changes);

    let svg = presenter.document(
        registry.scene(),
        registry.display_root(),
        Size::new(256.0, 256.0),
    );
    // A point built as a circle keeps its circle; icons only apply at build.
    assert!(svg.contains("<circle cx=\"64\" cy=\"32\""), "{svg}");
    assert!(!svg.contains("M 0 128"), "hidden road is omitted: {svg}");

    let _ = registry.reset_feature_style(1_u64);
    let changes = registry.scene_mut().evaluate();
    presenter.apply(registry.scene(), &changes);
    let svg = presenter.document(
        registry.scene(),
        registry.display_root(),
        Size::new(256.0, 256.0),
    );
    assert!(svg.contains("M 0 128"), "road is back: {svg}");
}

#[test]
fn icon_style_at_build_renders_image() {
    let icon = Icon::new("cafe.svg", Size::new(16.0, 16.0)).with_anchor(Vec2::new(8.0, 16.0));
    let mut registry = registry(GridOptions::default().with_layer_style("pois", Style::new().icon(icon)));
    let ticket = start(&mut registry, TileCoord::new(0, 0, 0));
    let _ = registry.on_tile_loaded(ticket, Ok(tile())).unwrap();
    let _ = registry.scene_mut().evaluate();

    let svg = render_document(registry.scene(), registry.display_root(), Size::new(256.0, 256.0));
    assert!(
        svg.contains("<image x=\"56\" y=\"16\" width=\"16\" height=\"16\" href=\"cafe.svg\"/>"),
        "{svg}"
    );
}

#[test]
fn unloaded_tile_leaves_empty_document() {
    let mut registry = registry(GridOptions::default());
    let mut presenter = SvgPresenter::new();
    let coord = TileCoord::new(0, 0, 0);
    let ticket = start(&mut registry, coord);
    let _ = registry.on_tile_loaded(ticket, Ok(tile())).unwrap();
    let changes = registry.scene_mut().evaluate();
    presenter.apply(registry.scene(), &changes);
    assert!(presenter.len() > 1);

    assert!(registry.on_tile_end(coord));
    let changes = registry.scene_mut().evaluate();
    presenter.apply(registry.scene(), &changes);
    assert_eq!(presenter.len(), 1, "only the display root is cached");

    let svg = presenter.document(registry.scene(), registry.display_root(), Size::new(1.0, 1.0));
    assert!(svg.ends_with("<g></g></svg>"), "{svg}");
    assert_eq!(registry.bounds(), None);
}

#[test]
fn neighbouring_tiles_are_translated_apart() {
    let mut registry = registry(GridOptions::default());
    let mut presenter = SvgPresenter::new();
    for x in 0..2 {
        let ticket = start(&mut registry, TileCoord::new(x, 0, 1));
        let _ = registry.on_tile_loaded(ticket, Ok(pois(64, 32))).unwrap();
    }
    let changes = registry.scene_mut().evaluate();
    presenter.apply(registry.scene(), &changes);

    let svg = presenter.document(registry.scene(), registry.display_root(), Size::new(512.0, 256.0));
    assert!(
        svg.contains("viewBox=\"0 0 512 256\"><g><g><circle cx=\"64\" cy=\"32\" r=\"10\""),
        "left tile sits at the origin: {svg}"
    );
    assert!(
        svg.contains("<g transform=\"translate(256 0)\"><circle cx=\"64\" cy=\"32\" r=\"10\""),
        "right tile is shifted by one tile width: {svg}"
    );
}

#[test]
fn below_min_detail_zoom_draws_every_covering_tile() {
    let mut registry = registry(GridOptions::default().with_min_detail_zoom(2));
    let request = registry.on_tile_start(TileCoord::new(0, 0, 0));
    assert_eq!(request.tickets().len(), 16);
    for ticket in request.into_tickets() {
        let _ = registry.on_tile_loaded(ticket, Ok(pois(128, 128))).unwrap();
    }
    let _ = registry.scene_mut().evaluate();

    let svg = render_document(registry.scene(), registry.display_root(), Size::new(256.0, 256.0));
    assert_eq!(svg.matches("<circle cx=\"32\" cy=\"32\"").count(), 16, "{svg}");
    assert!(svg.contains("<g transform=\"translate(64 0)\">"), "{svg}");
    assert!(svg.contains("<g transform=\"translate(192 192)\">"), "{svg}");
}

#[test]
fn past_max_detail_zoom_siblings_draw_one_tile() {
    let mut registry = registry(GridOptions::default().with_max_detail_zoom(0));
    let ticket = start(&mut registry, TileCoord::new(0, 0, 1));
    assert!(registry.on_tile_start(TileCoord::new(1, 0, 1)).tickets().is_empty());
    let _ = registry.on_tile_loaded(ticket, Ok(pois(64, 32))).unwrap();
    let _ = registry.scene_mut().evaluate();

    let svg = render_document(registry.scene(), registry.display_root(), Size::new(512.0, 256.0));
    assert_eq!(svg.matches("<circle").count(), 1, "{svg}");
    assert!(svg.contains("<circle cx=\"128\" cy=\"64\""), "scaled to 512 px: {svg}");
}
