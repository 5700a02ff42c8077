// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;
use std::rc::Rc;

use url::Url;

use crate::style::{CssStyleProvider, StyleProvider};
use crate::uri::{FileLoader, ResourceLoader};

/// Document loading options.
#[derive(Clone)]
pub struct Options {
    /// The URL of the document.
    ///
    /// Relative references are resolved against it, unless the document
    /// element has `xml:base`. When not set, the window's working
    /// directory is used.
    ///
    /// Default: `None`
    pub base_url: Option<Url>,

    /// Target DPI.
    ///
    /// Impacts units conversion.
    ///
    /// Default: 96.0
    pub dpi: f64,

    /// A default font size.
    ///
    /// Used to resolve `em` and `ex` units when no `font-size` attribute is set.
    ///
    /// Default: 16
    pub font_size: f64,

    /// A loader for external documents.
    ///
    /// Default: `FileLoader`
    pub resource_loader: Rc<dyn ResourceLoader>,

    /// A CSS engine.
    ///
    /// Default: `CssStyleProvider`
    pub style_provider: Rc<dyn StyleProvider>,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            base_url: None,
            dpi: 96.0,
            font_size: 16.0,
            resource_loader: Rc::new(FileLoader),
            style_provider: Rc::new(CssStyleProvider),
        }
    }
}

impl Options {
    /// Returns a copy of the options with another base URL.
    ///
    /// Used for documents loaded by reference.
    pub(crate) fn copy_with_base_url(&self, url: &Url) -> Options {
        let mut opt = self.clone();
        opt.base_url = Some(url.clone());
        opt
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Options")
            .field("base_url", &self.base_url)
            .field("dpi", &self.dpi)
            .field("font_size", &self.font_size)
            .finish()
    }
}
