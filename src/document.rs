// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::{Rc, Weak};

use url::Url;

use crate::cache::CacheKey;
use crate::element::Element;
use crate::namespace::NamespaceManager;
use crate::tree::{self, Node, NodeData, QualName, SVG_NS, XML_NAMESPACE_NS};
use crate::uri::{self, Href};
use crate::window::Window;
use crate::{factory, Error, Options, XmlOptions};

/// An SVG document.
///
/// Cheap to clone. Elements keep only a weak reference to their document,
/// so the document must outlive element handles that need it.
#[derive(Clone)]
pub struct Document(Rc<DocumentInner>);

pub(crate) struct DocumentInner {
    root: Node,
    window: Rc<Window>,
    options: Options,
    ids: RefCell<Option<HashMap<String, Node>>>,
    namespaces: RefCell<NamespaceManager>,
    // The document that loaded this one by reference.
    primary: Weak<DocumentInner>,
    // Documents loaded by reference. Used only by a primary document.
    external: RefCell<HashMap<Url, Option<Document>>>,
    current_scale: Cell<f64>,
    current_translate: Cell<(f64, f64)>,
}

impl Document {
    /// Creates an empty document.
    pub fn new(window: Rc<Window>, opt: Options) -> Document {
        Self::new_impl(window, opt, Weak::new())
    }

    fn new_impl(window: Rc<Window>, opt: Options, primary: Weak<DocumentInner>) -> Document {
        let inner = Rc::new_cyclic(|weak: &Weak<DocumentInner>| DocumentInner {
            root: Node::new(NodeData::new_root(weak.clone())),
            window: window.clone(),
            options: opt,
            ids: RefCell::new(None),
            namespaces: RefCell::new(NamespaceManager::new()),
            primary,
            external: RefCell::new(HashMap::new()),
            current_scale: Cell::new(1.0),
            current_translate: Cell::new((0.0, 0.0)),
        });

        window.attach(&inner.root);
        Document(inner)
    }

    /// Parses a document from an SVG string.
    pub fn from_str(text: &str, window: Rc<Window>, opt: Options) -> Result<Document, Error> {
        Self::from_str_impl(text, window, opt, Weak::new())
    }

    fn from_str_impl(
        text: &str,
        window: Rc<Window>,
        opt: Options,
        primary: Weak<DocumentInner>,
    ) -> Result<Document, Error> {
        let xml_opt = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };

        let xml = roxmltree::Document::parse_with_options(text, xml_opt)
            .map_err(Error::ParsingFailed)?;

        let doc = Self::new_impl(window, opt, primary);
        tree::parse::parse_document(&xml, &doc)?;
        Ok(doc)
    }

    /// Parses a document from SVG data.
    ///
    /// Can contain an SVG string or gzip compressed data.
    pub fn from_data(data: &[u8], window: Rc<Window>, opt: Options) -> Result<Document, Error> {
        Self::from_data_impl(data, false, window, opt, Weak::new())
    }

    fn from_data_impl(
        data: &[u8],
        compressed: bool,
        window: Rc<Window>,
        opt: Options,
        primary: Weak<DocumentInner>,
    ) -> Result<Document, Error> {
        if compressed || uri::is_gzip(data) {
            let data = uri::decompress_svgz(data)?;
            let text = std::str::from_utf8(&data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::from_str_impl(text, window, opt, primary)
        } else {
            let text = std::str::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::from_str_impl(text, window, opt, primary)
        }
    }

    /// Loads a document using `Options::resource_loader`.
    ///
    /// URLs with the `.svgz` extension are decompressed.
    /// `Options::base_url` is replaced by `url`.
    pub fn load(url: &Url, window: Rc<Window>, opt: Options) -> Result<Document, Error> {
        Self::load_impl(url, window, opt, Weak::new())
    }

    fn load_impl(
        url: &Url,
        window: Rc<Window>,
        opt: Options,
        primary: Weak<DocumentInner>,
    ) -> Result<Document, Error> {
        let data = opt.resource_loader.load(url)?;
        let opt = opt.copy_with_base_url(url);
        Self::from_data_impl(&data, uri::is_svgz(url), window, opt, primary)
    }

    /// Loads a document from a file.
    pub fn load_file(path: &Path, window: Rc<Window>, opt: Options) -> Result<Document, Error> {
        let path = path.canonicalize().map_err(Error::Io)?;
        let url = Url::from_file_path(&path)
            .map_err(|_| Error::InvalidUrl(path.display().to_string()))?;
        Self::load(&url, window, opt)
    }

    pub(crate) fn from_inner(inner: Rc<DocumentInner>) -> Document {
        Document(inner)
    }

    pub(crate) fn downgrade(&self) -> Weak<DocumentInner> {
        Rc::downgrade(&self.0)
    }

    /// Checks that both handles point to the same document.
    #[inline]
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the root node.
    ///
    /// Not an element. Use `document_element` to get the `svg` element.
    #[inline]
    pub fn root(&self) -> Node {
        self.0.root.clone()
    }

    /// Returns the first element of the document.
    pub fn document_element(&self) -> Option<Element> {
        self.0.root.children().find_map(Element::new)
    }

    /// Returns an iterator over all elements in document order.
    pub fn descendants(&self) -> impl Iterator<Item = Element> {
        self.0.root.descendants().filter_map(Element::new)
    }

    /// Returns the window.
    #[inline]
    pub fn window(&self) -> &Rc<Window> {
        &self.0.window
    }

    /// Returns the options the document was created with.
    #[inline]
    pub fn options(&self) -> &Options {
        &self.0.options
    }

    /// Returns the document URL.
    #[inline]
    pub fn url(&self) -> Option<&Url> {
        self.0.options.base_url.as_ref()
    }

    /// Returns the base URL.
    ///
    /// This is `xml:base` of the document element resolved against
    /// the document URL, or just the document URL.
    pub fn base_url(&self) -> Option<Url> {
        let url = self.url().cloned();
        let xml_base = self.document_element()
            .and_then(|e| e.attribute_ns(Some(XML_NAMESPACE_NS), "base"));

        match xml_base {
            Some(base) => {
                let resolved = match url {
                    Some(ref url) => url.join(&base).ok(),
                    None => Url::parse(&base).ok(),
                };
                resolved.or(url)
            }
            None => url,
        }
    }

    /// Resolves a relative reference against the base URL.
    ///
    /// Falls back to the window's working directory when there is no base URL.
    pub fn resolve_uri(&self, relative: &str) -> Option<Url> {
        let base = self.base_url()
            .or_else(|| Url::from_directory_path(self.window().working_dir()).ok());

        let url = match base {
            Some(base) => base.join(relative),
            None => Url::parse(relative),
        };

        match url {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("Failed to resolve '{}' cause {}.", relative, e);
                None
            }
        }
    }

    /// Returns the element with the specified id.
    ///
    /// When several elements share an id, the first one in document order wins.
    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        if self.0.ids.borrow().is_none() {
            let ids = self.build_id_index();
            *self.0.ids.borrow_mut() = Some(ids);
        }

        let ids = self.0.ids.borrow();
        ids.as_ref()?.get(id).cloned().and_then(Element::new)
    }

    fn build_id_index(&self) -> HashMap<String, Node> {
        let mut ids = HashMap::new();
        for e in self.descendants() {
            let id = match e.attribute_ns(None, "id") {
                Some(id) if !id.is_empty() => id,
                _ => continue,
            };

            match ids.entry(id) {
                Entry::Vacant(entry) => {
                    entry.insert(e.node().clone());
                }
                Entry::Occupied(entry) => {
                    log::debug!("Duplicated id '{}' ignored.", entry.key());
                }
            }
        }

        ids
    }

    pub(crate) fn mark_ids_stale(&self) {
        *self.0.ids.borrow_mut() = None;
    }

    pub(crate) fn invalidate_computed_styles(&self) {
        for e in self.descendants() {
            e.cache_remove(&CacheKey::ComputedStyle);
        }
    }

    /// Resolves an IRI reference to an element.
    ///
    /// `#id` is looked up in this document. Any other reference is resolved
    /// against the base URL and the target document is loaded on demand.
    /// Without a fragment, the document element is returned.
    ///
    /// Returns `None` when the reference cannot be resolved.
    pub fn get_node_by_uri(&self, uri: &str) -> Option<Element> {
        match Href::parse(uri)? {
            Href::Fragment(id) => self.get_element_by_id(&id),
            Href::External(_, fragment) => {
                let mut url = self.resolve_uri(uri)?;
                url.set_fragment(None);

                let doc = self.document_by_url(&url)?;
                match fragment {
                    Some(id) => doc.get_element_by_id(&id),
                    None => doc.document_element(),
                }
            }
        }
    }

    fn primary(&self) -> Document {
        match self.0.primary.upgrade() {
            Some(inner) => Document(inner),
            None => self.clone(),
        }
    }

    fn has_url(&self, url: &Url) -> bool {
        match self.url() {
            Some(u) => {
                let mut u = u.clone();
                u.set_fragment(None);
                u == *url
            }
            None => false,
        }
    }

    // Finds a document by URL among the primary document and
    // everything it has loaded. Loads a new one when needed.
    fn document_by_url(&self, url: &Url) -> Option<Document> {
        if self.has_url(url) {
            return Some(self.clone());
        }

        let primary = self.primary();
        if primary.has_url(url) {
            return Some(primary);
        }

        if let Some(doc) = primary.0.external.borrow().get(url) {
            return doc.clone();
        }

        let opt = self.0.options.clone();
        let doc = match Self::load_impl(url, self.0.window.clone(), opt, primary.downgrade()) {
            Ok(doc) => Some(doc),
            Err(e) => {
                log::warn!("Failed to load '{}' cause {}.", url, e);
                None
            }
        };

        primary.0.external.borrow_mut().insert(url.clone(), doc.clone());
        doc
    }

    /// Creates a detached element in the SVG namespace.
    pub fn create_element(&self, local_name: &str) -> Element {
        self.create_element_ns(Some(SVG_NS), local_name)
    }

    /// Creates a detached element.
    ///
    /// Unknown SVG elements and elements from other namespaces are created
    /// as generic elements.
    pub fn create_element_ns(&self, namespace_uri: Option<&str>, qualified_name: &str) -> Element {
        let (prefix, local) = match qualified_name.find(':') {
            Some(idx) => (Some(&qualified_name[..idx]), &qualified_name[idx + 1..]),
            None => (None, qualified_name),
        };

        match factory::create(prefix, local, namespace_uri, self) {
            Some(e) => e,
            None => factory::create_any(self.downgrade(), QualName::new(prefix, local, namespace_uri)),
        }
    }

    /// Returns namespace bindings.
    pub fn namespaces(&self) -> Ref<NamespaceManager> {
        self.0.namespaces.borrow()
    }

    /// Returns mutable namespace bindings.
    pub fn namespaces_mut(&self) -> RefMut<NamespaceManager> {
        self.0.namespaces.borrow_mut()
    }

    pub(crate) fn current_scale(&self) -> f64 {
        self.0.current_scale.get()
    }

    pub(crate) fn set_current_scale(&self, scale: f64) {
        self.0.current_scale.set(scale);
    }

    pub(crate) fn current_translate(&self) -> (f64, f64) {
        self.0.current_translate.get()
    }

    pub(crate) fn set_current_translate(&self, x: f64, y: f64) {
        self.0.current_translate.set((x, y));
    }

    /// Renders the document using the window's renderer.
    ///
    /// Does nothing when there is no renderer.
    pub fn render(&self) {
        match self.window().renderer() {
            Some(renderer) => renderer.render(self),
            None => log::warn!("No renderer attached."),
        }
    }

    /// Writes the document to an SVG string.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self, opt: XmlOptions) -> String {
        tree::writer::write(self, opt)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        if !self.0.root.has_children() {
            return write!(f, "Document []");
        }

        macro_rules! writeln_indented {
            ($depth:expr, $f:expr, $fmt:expr) => {
                for _ in 0..$depth { write!($f, "    ")?; }
                writeln!($f, $fmt)?;
            };
            ($depth:expr, $f:expr, $fmt:expr, $($arg:tt)*) => {
                for _ in 0..$depth { write!($f, "    ")?; }
                writeln!($f, $fmt, $($arg)*)?;
            };
        }

        fn print_children(parent: &Node, depth: usize, f: &mut fmt::Formatter)
            -> Result<(), fmt::Error>
        {
            for child in parent.children() {
                match Element::new(child.clone()) {
                    Some(e) => {
                        writeln_indented!(depth, f, "Element {{");
                        writeln_indented!(depth, f, "    tag_name: {:?}", e.tag_name());

                        let attributes = e.attributes();
                        if !attributes.is_empty() {
                            writeln_indented!(depth + 1, f, "attributes: [");
                            for attr in attributes {
                                writeln_indented!(depth + 2, f, "{:?}", attr);
                            }
                            writeln_indented!(depth + 1, f, "]");
                        }

                        if child.has_children() {
                            writeln_indented!(depth, f, "    children: [");
                            print_children(&child, depth + 2, f)?;
                            writeln_indented!(depth, f, "    ]");
                        }

                        writeln_indented!(depth, f, "}}");
                    }
                    None => {
                        writeln_indented!(depth, f, "{:?}", child.borrow());
                    }
                }
            }

            Ok(())
        }

        writeln!(f, "Document [")?;
        print_children(&self.0.root, 1, f)?;
        writeln!(f, "]")?;

        Ok(())
    }
}
