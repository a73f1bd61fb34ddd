// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG output for tessera.
//!
//! This crate turns a [`DrawableScene`] into SVG markup:
//!
//! - [`SvgPresenter`]: a [`Presenter`] that caches one element per drawable
//!   and refreshes only what each evaluation changed
//! - [`render_document`]: one-shot, stateless rendering of a subtree
//! - [`path_data`]: SVG path data for a [`BezPath`](kurbo::BezPath)
//!
//! Drawables map to `<g>`, `<path>`, `<circle>` and `<image>` elements with
//! SVG presentation attributes. Non-interactive shapes get
//! `pointer-events="none"`; effectively hidden subtrees are left out.

mod markup;
mod presenter;

pub use markup::path_data;
pub use presenter::SvgPresenter;
pub use tessera_core::backend::Presenter;

use kurbo::Size;
use tessera_core::scene::{DrawableId, DrawableScene};

/// Writes the tree below `root` as a standalone SVG document, without a
/// cache.
///
/// The scene must have been evaluated since its last change, so that hidden
/// subtrees are known.
#[must_use]
pub fn render_document(scene: &DrawableScene, root: DrawableId, size: Size) -> String {
    SvgPresenter::new().document(scene, root, size)
}

#[cfg(test)]
mod tests {
    use kurbo::BezPath;
    use tessera_core::scene::{Paint, Primitive};

    use super::*;

    #[test]
    fn render_document_matches_presenter() {
        let mut scene = DrawableScene::new();
        let root = scene.create_group();
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((4.0, 4.0));
        let line = scene.create(Primitive::Path(path), Paint::NONE);
        scene.add_child(root, line);
        let changes = scene.evaluate();

        let mut presenter = SvgPresenter::new();
        presenter.apply(&scene, &changes);
        let size = Size::new(4.0, 4.0);
        assert_eq!(
            render_document(&scene, root, size),
            presenter.document(&scene, root, size)
        );
        assert!(
            render_document(&scene, root, size).contains(
                "<path d=\"M 0 0 L 4 4\" stroke=\"none\" fill=\"none\" pointer-events=\"none\"/>"
            ),
            "non-interactive path"
        );
    }
}
