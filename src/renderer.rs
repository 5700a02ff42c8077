// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::document::Document;
use crate::element::{Element, RenderingHint};
use crate::geom::Rect;

/// A rendering backend attached to a `Window`.
///
/// The object model doesn't compute geometry on its own,
/// so bounding boxes are requested from the renderer.
pub trait Renderer {
    /// Returns element's bounds in screen coordinates.
    fn rendered_bounds(&self, element: &Element, hint: RenderingHint) -> Option<Rect>;

    /// Renders a document.
    fn render(&self, document: &Document);

    /// Marks a screen region as dirty.
    fn invalidate_rect(&self, rect: Rect);
}
