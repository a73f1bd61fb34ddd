// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-facing tile session registry.
//!
//! The host's tiling grid drives the registry through plain hooks:
//!
//! 1. [`on_tile_start`](TileSessionRegistry::on_tile_start) when a display
//!    tile comes into view. The detail band maps it to the data tiles it
//!    needs; the returned [`TileRequest`] holds one [`TileTicket`] for each
//!    data tile that must be fetched. Data tiles already live at the same
//!    display zoom are shared, not fetched again.
//! 2. [`on_tile_loaded`](TileSessionRegistry::on_tile_loaded) once a fetch
//!    resolves, in any order relative to other tiles. Every accepted feature
//!    gets graphics under the data tile's root group, which is placed at the
//!    tile's origin.
//! 3. [`on_tile_end`](TileSessionRegistry::on_tile_end) when the display tile
//!    is evicted. A data tile is unloaded once no display tile needs it, and
//!    a completion for an unloaded tile is ignored.
//!
//! Restyle calls ([`set_style`](TileSessionRegistry::set_style),
//! [`set_feature_style`](TileSessionRegistry::set_feature_style), and their
//! resets) re-resolve every live feature and update its drawables in place.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Rect, Size};

use crate::bounds;
use crate::builder::{DefaultBuilder, FeatureToGraphics};
use crate::error::{BuildError, FetchError, TileError};
use crate::feature::{TileData, VectorLayer};
use crate::options::{GridOptions, LayerOrderFn};
use crate::resolve::{FeatureId, IdOverride, OverrideTable, Resolution, StyleResolver, StyleSource};
use crate::scene::{DrawableFlags, DrawableId, DrawableScene};
use crate::session::{SessionState, TileCoord, TileSession};
use crate::trace::{
    FeatureRejectedEvent, FetchEvent, FetchOutcome, RestyleCause, RestyleEvent,
    StaleCompletionEvent, TilePopulatedEvent, TileStartEvent, TileUnloadEvent, TraceSink, Tracer,
};
use crate::zoom::{DetailZoom, px_per_extent};

/// Sessions are keyed by display zoom, then data tile.
type SessionKey = (u32, TileCoord);

/// A data tile to fetch. Handed back with the fetch result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileTicket {
    coord: TileCoord,
    display_zoom: u32,
    serial: u64,
    root: DrawableId,
}

impl TileTicket {
    /// The data tile to fetch.
    #[must_use]
    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Zoom to fetch tile data at.
    #[must_use]
    pub fn data_zoom(&self) -> u32 {
        self.coord.z
    }

    /// Zoom of the display tile that requested the data.
    #[must_use]
    pub fn display_zoom(&self) -> u32 {
        self.display_zoom
    }

    /// Session serial this ticket belongs to.
    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// The data tile's root drawable.
    #[must_use]
    pub fn root(&self) -> DrawableId {
        self.root
    }
}

/// What a display tile needs, returned by
/// [`on_tile_start`](TileSessionRegistry::on_tile_start).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileRequest {
    display: TileCoord,
    data_tiles: Vec<TileCoord>,
    tickets: Vec<TileTicket>,
}

impl TileRequest {
    /// The display tile.
    #[must_use]
    pub fn display(&self) -> TileCoord {
        self.display
    }

    /// Every data tile drawn for the display tile, in row-major order.
    #[must_use]
    pub fn data_tiles(&self) -> &[TileCoord] {
        &self.data_tiles
    }

    /// Fetches to perform. Shared data tiles that another display tile
    /// already requested have no ticket here.
    #[must_use]
    pub fn tickets(&self) -> &[TileTicket] {
        &self.tickets
    }

    /// Takes the tickets.
    #[must_use]
    pub fn into_tickets(self) -> Vec<TileTicket> {
        self.tickets
    }
}

/// Result of populating a tile.
#[derive(Clone, Debug, PartialEq)]
pub struct TileOutcome {
    /// The tile's root drawable.
    pub root: DrawableId,
    /// Features that produced graphics.
    pub features: usize,
    /// Features the filter or their style skipped.
    pub skipped: usize,
    /// Features the builder rejected, in encounter order.
    pub rejected: Vec<BuildError>,
}

/// Owns the drawable scene, the style state, and one [`TileSession`] per
/// data tile and display zoom.
pub struct TileSessionRegistry {
    builder: Rc<dyn FeatureToGraphics>,
    resolver: StyleResolver,
    overrides: OverrideTable,
    layers: Option<Vec<String>>,
    layer_order: Option<LayerOrderFn>,
    detail: DetailZoom,
    tile_size: Size,
    scene: DrawableScene,
    display_root: DrawableId,
    sessions: BTreeMap<SessionKey, TileSession>,
    displays: BTreeMap<TileCoord, Vec<TileCoord>>,
    next_serial: u64,
    trace_sink: Option<Box<dyn TraceSink>>,
}

impl fmt::Debug for TileSessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileSessionRegistry")
            .field("resolver", &self.resolver)
            .field("overrides", &self.overrides.len())
            .field("layers", &self.layers)
            .field("detail", &self.detail)
            .field("tile_size", &self.tile_size)
            .field("display_root", &self.display_root)
            .field("sessions", &self.sessions.len())
            .field("displays", &self.displays.len())
            .finish_non_exhaustive()
    }
}

impl Default for TileSessionRegistry {
    fn default() -> Self {
        Self::new(GridOptions::default())
    }
}

impl TileSessionRegistry {
    /// Creates a registry with an empty scene holding only the display root.
    #[must_use]
    pub fn new(options: GridOptions) -> Self {
        let detail = options.detail_zoom();
        let GridOptions {
            feature_to_graphics,
            filter,
            layer_order,
            layers,
            style,
            layer_styles,
            feature_id,
            tile_size,
            point_mode,
            ..
        } = options;

        let mut scene = DrawableScene::new();
        let display_root = scene.create_group();

        Self {
            builder: feature_to_graphics
                .unwrap_or_else(|| Rc::new(DefaultBuilder::new(point_mode))),
            resolver: StyleResolver {
                filter,
                style,
                layer_styles,
                feature_id,
            },
            overrides: OverrideTable::new(),
            layers,
            layer_order,
            detail,
            tile_size,
            scene,
            display_root,
            sessions: BTreeMap::new(),
            displays: BTreeMap::new(),
            next_serial: 0,
            trace_sink: None,
        }
    }

    /// Installs a trace sink.
    #[must_use]
    pub fn with_trace_sink(mut self, sink: impl TraceSink + 'static) -> Self {
        self.trace_sink = Some(Box::new(sink));
        self
    }

    /// Removes and returns the trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.trace_sink.take()
    }

    // -- Lifecycle hooks --

    /// Starts showing the display tile `display`.
    ///
    /// Each data tile it needs either joins a live session at the same
    /// display zoom or gets a new `Loading` session, with its root group
    /// attached under the display root and placed at the tile's origin.
    /// Only new sessions get a ticket.
    ///
    /// Restarting a live display tile ends it first, so data tiles it held
    /// alone are unloaded and refetched under a fresh serial.
    pub fn on_tile_start(&mut self, display: TileCoord) -> TileRequest {
        if self.displays.contains_key(&display) {
            self.on_tile_end(display);
        }

        let render_size = self.detail.tile_render_size(self.tile_size, display.z);
        let data_tiles = self.detail.data_tiles(display);
        let mut tickets = Vec::new();
        for &coord in &data_tiles {
            let key = (display.z, coord);
            if let Some(session) = self.sessions.get_mut(&key) {
                session.retain();
                continue;
            }

            let root = self.scene.create_group();
            self.scene.add_child(self.display_root, root);
            let serial = self.next_serial;
            self.next_serial += 1;
            let session = TileSession::new(coord, display.z, serial, render_size, root);
            self.scene.set_offset(root, session.origin().to_vec2());
            self.sessions.insert(key, session);

            tracer(&mut self.trace_sink).tile_start(&TileStartEvent {
                coord,
                display_zoom: display.z,
                serial,
            });
            tickets.push(TileTicket {
                coord,
                display_zoom: display.z,
                serial,
                root,
            });
        }
        self.displays.insert(display, data_tiles.clone());

        TileRequest {
            display,
            data_tiles,
            tickets,
        }
    }

    /// Populates the session a ticket belongs to.
    ///
    /// Returns `Ok(None)` when the session was unloaded or replaced since the
    /// ticket was issued. A [`FetchError::NotFound`] populates an empty tile.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::Fetch`] for any other fetch failure. The session
    /// stays `Loading` until the host ends it.
    pub fn on_tile_loaded(
        &mut self,
        ticket: TileTicket,
        data: Result<TileData, FetchError>,
    ) -> Result<Option<TileOutcome>, TileError> {
        let coord = ticket.coord;
        let mut tracer = tracer(&mut self.trace_sink);

        let Some(session) = self
            .sessions
            .get_mut(&(ticket.display_zoom, coord))
            .filter(|s| s.serial() == ticket.serial && s.state() == SessionState::Loading)
        else {
            tracer.stale_completion(&StaleCompletionEvent {
                coord,
                serial: ticket.serial,
            });
            return Ok(None);
        };

        let fetch = |outcome| FetchEvent {
            coord,
            serial: ticket.serial,
            outcome,
        };
        let data = match data {
            Ok(data) => {
                tracer.fetch(&fetch(FetchOutcome::Loaded));
                data
            }
            Err(FetchError::NotFound) => {
                tracer.fetch(&fetch(FetchOutcome::NotFound));
                TileData::new()
            }
            Err(err) => {
                tracer.fetch(&fetch(FetchOutcome::Failed));
                return Err(err.into());
            }
        };

        let zoom = session.display_zoom();
        let render_size = session.render_size();
        let mut built = Vec::new();
        let mut rejected = Vec::new();
        let mut skipped = 0;

        for (name, layer) in ordered_layers(&data, self.layers.as_deref(), self.layer_order.as_ref()) {
            let scale = px_per_extent(render_size, layer.extent);
            for feature in &layer.features {
                if !self.resolver.accepts(feature.as_ref(), name, zoom) {
                    skipped += 1;
                    continue;
                }
                let result = feature.kind().and_then(|kind| {
                    match self
                        .resolver
                        .restyle(&self.overrides, feature.as_ref(), kind, name, zoom)
                    {
                        Resolution::Skip => Ok(None),
                        Resolution::Style(style) => self
                            .builder
                            .build(feature, name, &style, scale, &mut self.scene)
                            .map(Some),
                    }
                });
                match result {
                    Ok(Some(graphics)) => {
                        self.scene.add_child(session.root(), graphics.graphics());
                        built.push(graphics);
                    }
                    Ok(None) => skipped += 1,
                    Err(error) => {
                        tracer.feature_rejected(&FeatureRejectedEvent {
                            coord,
                            layer: name,
                            error: &error,
                        });
                        rejected.push(error);
                    }
                }
            }
        }

        let features = built.len();
        session.populate(built);
        tracer.tile_populated(&TilePopulatedEvent {
            coord,
            serial: ticket.serial,
            features,
            skipped,
            rejected: rejected.len(),
        });

        Ok(Some(TileOutcome {
            root: session.root(),
            features,
            skipped,
            rejected,
        }))
    }

    /// Stops showing the display tile `display`. Data tiles no other display
    /// tile needs are unloaded. Returns `false` if the tile was not live.
    pub fn on_tile_end(&mut self, display: TileCoord) -> bool {
        let Some(data_tiles) = self.displays.remove(&display) else {
            return false;
        };
        for coord in data_tiles {
            let key = (display.z, coord);
            let Some(session) = self.sessions.get_mut(&key) else {
                continue;
            };
            if session.release() > 0 {
                continue;
            }
            let Some(mut session) = self.sessions.remove(&key) else {
                continue;
            };
            let drawables = session.unload(&mut self.scene);
            tracer(&mut self.trace_sink).tile_unload(&TileUnloadEvent {
                coord,
                serial: session.serial(),
                drawables,
            });
        }
        true
    }

    // -- Restyle --

    /// Replaces the style applied to every feature and restyles all live
    /// features. Returns the number of features restyled.
    pub fn set_style(&mut self, style: impl Into<StyleSource>) -> usize {
        self.resolver.style = Some(style.into());
        self.restyle(RestyleCause::SetStyle)
    }

    /// Removes the global style, falling back to the per-layer table, and
    /// restyles all live features.
    pub fn clear_style(&mut self) -> usize {
        self.resolver.style = None;
        self.restyle(RestyleCause::ClearStyle)
    }

    /// Overrides the style of every feature with `id`, in every tile, and
    /// restyles all live features.
    pub fn set_feature_style(
        &mut self,
        id: impl Into<FeatureId>,
        style: impl Into<IdOverride>,
    ) -> usize {
        let _ = self.overrides.insert(id.into(), style.into());
        self.restyle(RestyleCause::SetFeatureStyle)
    }

    /// Removes the override for `id` and restyles all live features.
    pub fn reset_feature_style(&mut self, id: impl Into<FeatureId>) -> usize {
        let _ = self.overrides.remove(&id.into());
        self.restyle(RestyleCause::ResetFeatureStyle)
    }

    fn restyle(&mut self, cause: RestyleCause) -> usize {
        let mut features = 0;
        for session in self.sessions.values_mut() {
            let zoom = session.display_zoom();
            for graphics in session.features_mut() {
                let resolution = self.resolver.restyle(
                    &self.overrides,
                    graphics.feature().as_ref(),
                    graphics.kind(),
                    graphics.layer(),
                    zoom,
                );
                match resolution {
                    Resolution::Style(style) => graphics.set_style(&mut self.scene, &style),
                    Resolution::Skip => self
                        .scene
                        .set_flags(graphics.graphics(), DrawableFlags { hidden: true }),
                }
                features += 1;
            }
        }
        tracer(&mut self.trace_sink).restyle(&RestyleEvent {
            cause,
            sessions: self.sessions.len(),
            features,
        });
        features
    }

    // -- Queries --

    /// Union of all feature bounding boxes in global render units, or `None`
    /// when no live tile has a feature.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        bounds::fold(self.sessions.values(), |session, r| session.rect_to_global(r))
    }

    /// Like [`bounds`](Self::bounds), with `project` applied to each global
    /// bbox before the union.
    #[must_use]
    pub fn bounds_with(&self, mut project: impl FnMut(Rect) -> Rect) -> Option<Rect> {
        bounds::fold(self.sessions.values(), |session, r| {
            project(session.rect_to_global(r))
        })
    }

    /// The live session of data tile `coord` drawn at `display_zoom`.
    #[must_use]
    pub fn session(&self, coord: TileCoord, display_zoom: u32) -> Option<&TileSession> {
        self.sessions.get(&(display_zoom, coord))
    }

    /// The data tiles drawn for a live display tile.
    #[must_use]
    pub fn data_tiles(&self, display: TileCoord) -> Option<&[TileCoord]> {
        self.displays.get(&display).map(Vec::as_slice)
    }

    /// The sessions backing a live display tile, in row-major order.
    pub fn display_sessions(&self, display: TileCoord) -> impl Iterator<Item = &TileSession> {
        self.data_tiles(display)
            .unwrap_or_default()
            .iter()
            .filter_map(move |&coord| self.session(coord, display.z))
    }

    /// All live sessions, ordered by display zoom, then data tile.
    pub fn sessions(&self) -> impl Iterator<Item = &TileSession> {
        self.sessions.values()
    }

    /// All live display tiles, ordered by coordinate.
    pub fn displays(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.displays.keys().copied()
    }

    /// The drawable scene.
    #[must_use]
    pub fn scene(&self) -> &DrawableScene {
        &self.scene
    }

    /// The drawable scene, for evaluation and host-side edits.
    pub fn scene_mut(&mut self) -> &mut DrawableScene {
        &mut self.scene
    }

    /// The group every tile root is attached under.
    #[must_use]
    pub fn display_root(&self) -> DrawableId {
        self.display_root
    }

    /// The style resolver.
    #[must_use]
    pub fn resolver(&self) -> &StyleResolver {
        &self.resolver
    }

    /// The per-feature-id overrides.
    #[must_use]
    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }
}

fn tracer(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
    match sink {
        Some(sink) => Tracer::new(sink.as_mut()),
        None => Tracer::none(),
    }
}

/// The layers of `data` to draw, in draw order.
///
/// An allow-list decides both membership and order. Otherwise all layers are
/// drawn, sorted by `order` if given (stable, so ties keep decode order).
fn ordered_layers<'d>(
    data: &'d TileData,
    allow: Option<&[String]>,
    order: Option<&LayerOrderFn>,
) -> Vec<(&'d str, &'d VectorLayer)> {
    if let Some(allow) = allow {
        return allow
            .iter()
            .filter_map(|wanted| data.iter().find(|(name, _)| *name == wanted.as_str()))
            .collect();
    }
    let mut layers: Vec<_> = data.iter().collect();
    if let Some(order) = order {
        layers.sort_by(|(a, _), (b, _)| order(a, b));
    }
    layers
}
