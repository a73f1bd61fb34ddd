// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG element management.
//!
//! Mirrors [`DrawableScene`] state as cached SVG elements, applying
//! incremental updates from [`SceneChanges`], and serializes the tree below a
//! root drawable as an SVG document on demand.

use std::fmt::Write as _;

use kurbo::Size;
use tessera_core::backend::Presenter;
use tessera_core::scene::{DrawableId, DrawableScene, SceneChanges};

use crate::markup::Element;

/// Maps a [`DrawableScene`] to cached SVG elements.
///
/// Call [`apply`](Presenter::apply) after each
/// [`evaluate`](DrawableScene::evaluate) to refresh the elements that changed,
/// then [`document`](Self::document) to write the markup.
#[derive(Clone, Debug, Default)]
pub struct SvgPresenter {
    elements: Vec<Option<Element>>,
}

impl SvgPresenter {
    /// Creates a presenter with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.iter().flatten().count()
    }

    /// Returns `true` if no element is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cached start tag of the drawable at slot `idx`, if any.
    #[must_use]
    pub fn element(&self, idx: u32) -> Option<String> {
        self.get_element(idx).map(|el| {
            let mut out = String::new();
            el.write_open(&mut out);
            out
        })
    }

    /// Writes the tree below `root` as a standalone SVG document of the given
    /// size.
    ///
    /// Effectively hidden drawables and their subtrees are omitted, so the
    /// scene must have been evaluated since its last change. Drawables missing
    /// from the cache are rendered from the scene directly.
    #[must_use]
    pub fn document(&self, scene: &DrawableScene, root: DrawableId, size: Size) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\">",
            w = size.width,
            h = size.height
        );
        if scene.is_alive(root) {
            self.write_subtree(scene, root.index(), &mut out);
        }
        out.push_str("</svg>");
        out
    }

    fn write_subtree(&self, scene: &DrawableScene, idx: u32, out: &mut String) {
        if scene.effective_hidden_at(idx) {
            return;
        }
        let fresh;
        let el = match self.get_element(idx) {
            Some(el) => el,
            None => {
                fresh = element_at(scene, idx);
                &fresh
            }
        };
        el.write_open(out);
        for child in scene.children_at(idx) {
            self.write_subtree(scene, child.index(), out);
        }
        el.write_close(out);
    }

    fn get_element(&self, idx: u32) -> Option<&Element> {
        self.elements
            .get(idx as usize)
            .and_then(|slot| slot.as_ref())
    }

    fn take_element(&mut self, idx: u32) -> Option<Element> {
        self.elements.get_mut(idx as usize)?.take()
    }

    fn put_element(&mut self, idx: u32, el: Element) {
        let slot = idx as usize;
        if self.elements.len() <= slot {
            self.elements.resize_with(slot + 1, || None);
        }
        self.elements[slot] = Some(el);
    }

    fn refresh(&mut self, scene: &DrawableScene, idx: u32) {
        if scene.is_live_slot(idx) {
            self.put_element(idx, element_at(scene, idx));
        }
    }
}

fn element_at(scene: &DrawableScene, idx: u32) -> Element {
    Element::new(scene.primitive_at(idx), scene.paint_at(idx), scene.offset_at(idx))
}

impl Presenter for SvgPresenter {
    /// Applies incremental changes from a [`SceneChanges`] to the cache.
    fn apply(&mut self, scene: &DrawableScene, changes: &SceneChanges) {
        // 1. Removals
        for &idx in &changes.removed {
            let _ = self.take_element(idx);
        }

        // 2. Additions, then attribute changes. A slot can be removed and
        // reused within one evaluation, so liveness is checked again here.
        for &idx in changes
            .added
            .iter()
            .chain(&changes.paints)
            .chain(&changes.primitives)
        {
            self.refresh(scene, idx);
        }

        // Visibility and topology are read from the scene when writing.
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Circle, Point, Vec2};
    use tessera_core::scene::{DrawableFlags, Paint, Primitive};

    use super::*;

    fn dot(scene: &mut DrawableScene, x: f64) -> DrawableId {
        scene.create(
            Primitive::Circle(Circle::new(Point::new(x, 0.0), 1.0)),
            Paint {
                interactive: true,
                ..Paint::NONE
            },
        )
    }

    #[test]
    fn apply_caches_added_and_drops_removed() {
        let mut scene = DrawableScene::new();
        let mut presenter = SvgPresenter::new();
        let root = scene.create_group();
        let a = dot(&mut scene, 1.0);
        scene.add_child(root, a);
        let changes = scene.evaluate();
        presenter.apply(&scene, &changes);
        assert_eq!(presenter.len(), 2);

        scene.destroy(a);
        let changes = scene.evaluate();
        presenter.apply(&scene, &changes);
        assert_eq!(presenter.len(), 1);
        assert!(presenter.element(a.index()).is_none());
    }

    #[test]
    fn paint_change_refreshes_element() {
        let mut scene = DrawableScene::new();
        let mut presenter = SvgPresenter::new();
        let a = dot(&mut scene, 1.0);
        let changes = scene.evaluate();
        presenter.apply(&scene, &changes);
        let before = presenter.element(a.index()).unwrap();

        scene.set_paint(
            a,
            Paint {
                class_name: Some("hot".into()),
                ..scene.paint(a).clone()
            },
        );
        let changes = scene.evaluate();
        presenter.apply(&scene, &changes);
        let after = presenter.element(a.index()).unwrap();
        assert_ne!(before, after);
        assert!(after.contains("class=\"hot\""), "{after}");
    }

    #[test]
    fn document_omits_hidden_subtrees_and_keeps_paint_order() {
        let mut scene = DrawableScene::new();
        let mut presenter = SvgPresenter::new();
        let root = scene.create_group();
        let shown = scene.create_group();
        let hidden = scene.create_group();
        let a = dot(&mut scene, 1.0);
        let b = dot(&mut scene, 2.0);
        let c = dot(&mut scene, 3.0);
        scene.add_child(root, shown);
        scene.add_child(root, hidden);
        scene.add_child(shown, a);
        scene.add_child(shown, b);
        scene.add_child(hidden, c);
        scene.set_flags(hidden, DrawableFlags { hidden: true });
        let changes = scene.evaluate();
        presenter.apply(&scene, &changes);

        let doc = presenter.document(&scene, root, Size::new(10.0, 20.0));
        assert_eq!(
            doc,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"20\" \
             viewBox=\"0 0 10 20\"><g><g>\
             <circle cx=\"1\" cy=\"0\" r=\"1\" stroke=\"none\" fill=\"none\"/>\
             <circle cx=\"2\" cy=\"0\" r=\"1\" stroke=\"none\" fill=\"none\"/>\
             </g></g></svg>"
        );
    }

    #[test]
    fn offset_change_refreshes_group() {
        let mut scene = DrawableScene::new();
        let mut presenter = SvgPresenter::new();
        let tile = scene.create_group();
        let changes = scene.evaluate();
        presenter.apply(&scene, &changes);
        assert_eq!(presenter.element(tile.index()).as_deref(), Some("<g>"));

        scene.set_offset(tile, Vec2::new(0.0, 512.0));
        let changes = scene.evaluate();
        presenter.apply(&scene, &changes);
        assert_eq!(
            presenter.element(tile.index()).as_deref(),
            Some("<g transform=\"translate(0 512)\">")
        );
    }

    #[test]
    fn document_of_dead_root_is_empty() {
        let mut scene = DrawableScene::new();
        let root = scene.create_group();
        scene.destroy(root);
        let _ = scene.evaluate();
        let doc = SvgPresenter::new().document(&scene, root, Size::new(1.0, 1.0));
        assert!(doc.ends_with("viewBox=\"0 0 1 1\"></svg>"), "{doc}");
    }
}
