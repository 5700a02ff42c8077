// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::element::Element;
use crate::geom::Size;
use crate::renderer::Renderer;
use crate::tree::{Node, WeakNode};

/// A viewport context of documents.
///
/// Provides the pixel size that outermost percentages resolve against
/// and the renderer used for bounds and invalidation.
pub struct Window {
    size: Cell<(u32, u32)>,
    parent: Option<Rc<Window>>,
    renderer: RefCell<Option<Rc<dyn Renderer>>>,
    working_dir: RefCell<PathBuf>,
    roots: RefCell<Vec<WeakNode>>,
}

impl Window {
    /// Creates a new window.
    ///
    /// The working directory is set to the current process directory.
    pub fn new(width: u32, height: u32) -> Rc<Window> {
        Rc::new(Self::new_impl(width, height, None))
    }

    /// Creates a window nested into another one, like an SVG used as an image.
    pub fn with_parent(width: u32, height: u32, parent: Rc<Window>) -> Rc<Window> {
        Rc::new(Self::new_impl(width, height, Some(parent)))
    }

    fn new_impl(width: u32, height: u32, parent: Option<Rc<Window>>) -> Window {
        let working_dir = std::env::current_dir().unwrap_or_default();
        Window {
            size: Cell::new((width, height)),
            parent,
            renderer: RefCell::new(None),
            working_dir: RefCell::new(working_dir),
            roots: RefCell::new(Vec::new()),
        }
    }

    /// Returns the inner width.
    #[inline]
    pub fn inner_width(&self) -> u32 {
        self.size.get().0
    }

    /// Returns the inner height.
    #[inline]
    pub fn inner_height(&self) -> u32 {
        self.size.get().1
    }

    /// Returns the inner size.
    pub fn size(&self) -> Size {
        let (w, h) = self.size.get();
        Size::new(w as f64, h as f64)
    }

    /// Resizes the window.
    ///
    /// Viewport values of all attached documents are recomputed on next access.
    pub fn resize(&self, width: u32, height: u32) {
        if self.size.get() == (width, height) {
            return;
        }

        self.size.set((width, height));

        self.roots.borrow_mut().retain(|root| root.upgrade().is_some());
        let roots: Vec<Node> = self.roots.borrow().iter().filter_map(|r| r.upgrade()).collect();
        for root in roots {
            for e in root.descendants().filter_map(Element::new) {
                e.invalidate_viewport_cache();
            }
        }

        log::debug!("Window resized to {}x{}.", width, height);

        if let Some(renderer) = self.renderer() {
            renderer.invalidate_rect(self.size().to_rect(0.0, 0.0));
        }
    }

    /// Returns the parent window.
    pub fn parent(&self) -> Option<&Rc<Window>> {
        self.parent.as_ref()
    }

    /// Returns the attached renderer.
    pub fn renderer(&self) -> Option<Rc<dyn Renderer>> {
        self.renderer.borrow().clone()
    }

    /// Attaches a renderer.
    pub fn set_renderer(&self, renderer: Option<Rc<dyn Renderer>>) {
        *self.renderer.borrow_mut() = renderer;
    }

    /// Returns the directory relative references resolve against
    /// when a document has no base URL.
    pub fn working_dir(&self) -> PathBuf {
        self.working_dir.borrow().clone()
    }

    /// Sets the working directory.
    pub fn set_working_dir(&self, dir: PathBuf) {
        *self.working_dir.borrow_mut() = dir;
    }

    pub(crate) fn attach(&self, root: &Node) {
        let mut roots = self.roots.borrow_mut();
        roots.retain(|root| root.upgrade().is_some());
        roots.push(root.downgrade());
    }

    #[cfg(test)]
    fn attached_count(&self) -> usize {
        self.roots.borrow().len()
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Window")
            .field("size", &self.size.get())
            .field("has_parent", &self.parent.is_some())
            .field("has_renderer", &self.renderer.borrow().is_some())
            .field("working_dir", &*self.working_dir.borrow())
            .finish()
    }
}
