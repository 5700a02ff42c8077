// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgom` is an [SVG] Document Object Model.

Unlike a render tree, the document stays editable. Every element is a typed
handle over a mutable markup tree, and values derived from attributes, like
transforms, lengths and viewport mappings, are computed on demand, cached per
element and invalidated when the underlying attributes change.

Geometry and rendering are delegated to a `Renderer` attached to a `Window`.

## Example

```
let window = svgom::Window::new(200, 100);
let doc = svgom::Document::from_str(
    "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'/>",
    window,
    svgom::Options::default(),
).unwrap();

let svg = doc.document_element().unwrap();
let ts = svg.as_viewport().unwrap().view_box_transform().unwrap();
assert_eq!(ts, svgom::Transform::new(1.0, 0.0, 0.0, 1.0, 50.0, 0.0));
```

[SVG]: https://en.wikipedia.org/wiki/Scalable_Vector_Graphics
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::new_ret_no_self)]
#![allow(clippy::question_mark)]
#![allow(clippy::too_many_arguments)]

mod cache;
mod document;
mod element;
pub mod factory;
mod geom;
mod instance;
mod names;
mod namespace;
mod options;
mod renderer;
mod style;
mod transform;
mod tree;
mod units;
mod uri;
mod use_node;
mod viewport;
mod window;

pub use crate::document::Document;
pub use crate::element::{Capabilities, Element, RenderingHint};
pub use crate::geom::*;
pub use crate::instance::{Instance, InstanceList};
pub use crate::names::{is_presentation_attribute, EId};
pub use crate::namespace::NamespaceManager;
pub use crate::options::Options;
pub use crate::renderer::Renderer;
pub use crate::style::{CssStyleProvider, StyleDeclaration, StyleProvider, Styleable};
pub use crate::transform::{TransformItem, TransformList, Transformable};
pub use crate::tree::writer::XmlOptions;
pub use crate::tree::{Attribute, Node, NodeData, QualName, SVG_NS, XLINK_NS, XML_NAMESPACE_NS};
pub use crate::uri::{decompress_svgz, FileLoader, Href, ResourceLoader, UriReference};
pub use crate::use_node::{ReferencedElementGuard, Use};
pub use crate::viewport::{FitToViewBox, Viewport};
pub use crate::window::Window;

pub use roxmltree;
pub use svgtypes;
pub use url;

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// Only UTF-8 content are supported.
    NotAnUtf8Str,

    /// Compressed SVG must use the GZip algorithm.
    MalformedGZip,

    /// We do not allow SVG with more than 1_000_000 elements
    /// or nested deeper than 1024 levels for security reasons.
    ElementsLimitReached,

    /// Failed to parse an SVG data.
    ParsingFailed(roxmltree::Error),

    /// Failed to read a resource.
    Io(std::io::Error),

    /// A URL cannot be resolved or loaded.
    InvalidUrl(String),

    /// An attribute value or an operation argument is not valid.
    InvalidValue(String),
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::ParsingFailed(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::NotAnUtf8Str => {
                write!(f, "provided data has not an UTF-8 encoding")
            }
            Error::MalformedGZip => {
                write!(f, "provided data has a malformed GZip content")
            }
            Error::ElementsLimitReached => {
                write!(f, "the maximum number of SVG elements has been reached")
            }
            Error::ParsingFailed(ref e) => {
                write!(f, "SVG data parsing failed cause {}", e)
            }
            Error::Io(ref e) => {
                write!(f, "failed to read a resource cause {}", e)
            }
            Error::InvalidUrl(ref url) => {
                write!(f, "'{}' is not a valid URL", url)
            }
            Error::InvalidValue(ref msg) => {
                write!(f, "invalid value: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

trait OptionLog {
    fn log_none<F: FnOnce()>(self, f: F) -> Self;
}

impl<T> OptionLog for Option<T> {
    #[inline]
    fn log_none<F: FnOnce()>(self, f: F) -> Self {
        self.or_else(|| {
            f();
            None
        })
    }
}
