// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;
use std::rc::Rc;

use svgtypes::Length;

use crate::cache::{CacheKey, CachedValue, PropertyCache};
use crate::document::Document;
use crate::geom::Rect;
use crate::names::{EId, VIEWPORT_ATTRIBUTES};
use crate::renderer::Renderer;
use crate::style::Styleable;
use crate::transform::Transformable;
use crate::tree::{Attribute, Attributes, Node, NodeData, NodeKind, QualName};
use crate::tree::{SVG_NS, XLINK_NS, XML_NAMESPACE_NS};
use crate::uri::UriReference;
use crate::use_node::Use;
use crate::viewport::{FitToViewBox, Viewport};
use crate::{units, Error, OptionLog};

/// A set of behaviors supported by an element type.
///
/// Fixed at element creation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Capabilities {
    /// Has `class`, `style` and presentation attributes.
    pub styleable: bool,
    /// Has a `transform` attribute.
    pub transformable: bool,
    /// Establishes a new viewport.
    pub viewport: bool,
    /// Has `viewBox` and `preserveAspectRatio` attributes.
    pub fit_to_view_box: bool,
    /// Has an `xlink:href` attribute.
    pub uri_reference: bool,
}

/// A rendering category of an element.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum RenderingHint {
    Containment,
    Shape,
    Text,
    Image,
    Clipping,
    Masking,
    Other,
}

impl EId {
    /// Returns capabilities of the element type.
    pub fn capabilities(self) -> Capabilities {
        let transformable = matches!(
            self,
            EId::A
                | EId::Circle
                | EId::ClipPath
                | EId::Defs
                | EId::Ellipse
                | EId::G
                | EId::Image
                | EId::Line
                | EId::Path
                | EId::Polygon
                | EId::Polyline
                | EId::Rect
                | EId::Switch
                | EId::Text
                | EId::Use
        );

        let styleable = !matches!(self, EId::Metadata | EId::Script | EId::ColorProfile);

        let fit_to_view_box = matches!(self, EId::Svg | EId::Symbol | EId::Marker | EId::Pattern);

        let uri_reference = matches!(
            self,
            EId::A
                | EId::Image
                | EId::LinearGradient
                | EId::RadialGradient
                | EId::Pattern
                | EId::Script
                | EId::TextPath
                | EId::Tref
                | EId::Use
                | EId::ColorProfile
        );

        Capabilities {
            styleable,
            transformable,
            viewport: self == EId::Svg,
            fit_to_view_box,
            uri_reference,
        }
    }

    /// Returns the rendering hint of the element type.
    pub fn rendering_hint(self) -> RenderingHint {
        match self {
            EId::Svg | EId::G | EId::A | EId::Switch | EId::Use | EId::Symbol => {
                RenderingHint::Containment
            }
            EId::Circle
            | EId::Ellipse
            | EId::Line
            | EId::Path
            | EId::Polygon
            | EId::Polyline
            | EId::Rect => RenderingHint::Shape,
            EId::Text | EId::Tspan | EId::Tref | EId::TextPath => RenderingHint::Text,
            EId::Image => RenderingHint::Image,
            EId::ClipPath => RenderingHint::Clipping,
            EId::Mask => RenderingHint::Masking,
            _ => RenderingHint::Other,
        }
    }
}


pub(crate) struct ElementData {
    pub(crate) name: QualName,
    pub(crate) kind: Option<EId>,
    pub(crate) attributes: Attributes,
    pub(crate) cache: PropertyCache,
}

impl ElementData {
    pub(crate) fn new(name: QualName, kind: Option<EId>) -> Self {
        ElementData {
            name,
            kind,
            attributes: Attributes::default(),
            cache: PropertyCache::default(),
        }
    }
}


/// An element handle.
///
/// Cheap to clone. Two handles are equal when they point to the same element.
#[derive(Clone, PartialEq)]
pub struct Element(pub(crate) Node);

impl Element {
    /// Wraps a markup node. Returns `None` for non-element nodes.
    pub fn new(node: Node) -> Option<Element> {
        if node.borrow().is_element() {
            Some(Element(node))
        } else {
            None
        }
    }

    /// Returns the underlying markup node.
    #[inline]
    pub fn node(&self) -> &Node {
        &self.0
    }

    fn with<R, F: FnOnce(&ElementData) -> R>(&self, f: F) -> R {
        let data = self.0.borrow();
        match data.kind {
            NodeKind::Element(ref d) => f(d),
            // `Element` can be created only from an element node.
            _ => unreachable!(),
        }
    }

    fn with_mut<R, F: FnOnce(&mut ElementData) -> R>(&self, f: F) -> R {
        let mut data = self.0.borrow_mut();
        match data.kind {
            NodeKind::Element(ref mut d) => f(d),
            _ => unreachable!(),
        }
    }

    /// Returns element's qualified name.
    pub fn tag_name(&self) -> QualName {
        self.with(|d| d.name.clone())
    }

    /// Returns element's local name.
    pub fn local_name(&self) -> String {
        self.with(|d| d.name.local.clone())
    }

    /// Returns element's namespace URI.
    pub fn namespace_uri(&self) -> Option<String> {
        self.with(|d| d.name.namespace.clone())
    }

    /// Returns the well-known element type.
    ///
    /// `None` for generic and foreign elements.
    #[inline]
    pub fn kind(&self) -> Option<EId> {
        self.with(|d| d.kind)
    }

    /// Checks that the element has the specified type.
    #[inline]
    pub fn is(&self, kind: EId) -> bool {
        self.kind() == Some(kind)
    }

    /// Returns element's capabilities.
    pub fn capabilities(&self) -> Capabilities {
        self.kind().map(EId::capabilities).unwrap_or_default()
    }

    /// Returns element's rendering hint.
    pub fn rendering_hint(&self) -> RenderingHint {
        self.kind().map(EId::rendering_hint).unwrap_or(RenderingHint::Other)
    }

    /// Checks that the element is rendered directly.
    ///
    /// `symbol` is a container, but it's rendered only via `use`.
    pub fn is_renderable(&self) -> bool {
        let hint_ok = matches!(
            self.rendering_hint(),
            RenderingHint::Containment
                | RenderingHint::Shape
                | RenderingHint::Text
                | RenderingHint::Image
        );

        hint_ok && !self.is(EId::Symbol)
    }

    /// Returns the document that owns this element.
    pub fn owner_document(&self) -> Option<Document> {
        self.0.borrow().owner.upgrade().map(Document::from_inner)
    }

    /// Returns the `id` attribute or an empty string.
    pub fn id(&self) -> String {
        self.attribute("id").unwrap_or_default()
    }


    // Attributes.

    fn resolve_name(&self, name: &str) -> (Option<String>, Option<String>, String) {
        let (prefix, local) = split_qname(name);
        let namespace = prefix.and_then(|prefix| match prefix {
            "xml" => Some(XML_NAMESPACE_NS.to_string()),
            "xlink" => Some(XLINK_NS.to_string()),
            _ => {
                let doc = self.owner_document()?;
                let ns = doc.namespaces().lookup_namespace(prefix).map(String::from);
                ns.log_none(|| log::warn!("Unknown namespace prefix: '{}'.", prefix))
            }
        });

        // An unknown prefix is kept as a part of the local name.
        match namespace {
            Some(ns) => (Some(ns), prefix.map(String::from), local.to_string()),
            None => (None, None, name.to_string()),
        }
    }

    /// Returns an attribute value.
    ///
    /// A prefixed name, like `xlink:href`, is resolved
    /// via the document's namespace bindings.
    pub fn attribute(&self, name: &str) -> Option<String> {
        let (ns, _, local) = self.resolve_name(name);
        self.attribute_ns(ns.as_deref(), &local)
    }

    /// Returns an attribute value by namespace URI and local name.
    pub fn attribute_ns(&self, namespace: Option<&str>, local: &str) -> Option<String> {
        self.with(|d| d.attributes.get(namespace, local).map(String::from))
    }

    /// Checks that an attribute is set.
    pub fn has_attribute(&self, name: &str) -> bool {
        let (ns, _, local) = self.resolve_name(name);
        self.with(|d| d.attributes.get(ns.as_deref(), &local).is_some())
    }

    /// Returns a copy of all attributes.
    pub fn attributes(&self) -> Vec<Attribute> {
        self.with(|d| d.attributes.iter().cloned().collect())
    }

    /// Returns the `xlink:href` attribute, or `href` when it's not set.
    pub fn href(&self) -> Option<String> {
        self.attribute_ns(Some(XLINK_NS), "href")
            .or_else(|| self.attribute_ns(None, "href"))
    }

    /// Sets an attribute.
    pub fn set_attribute(&self, name: &str, value: &str) {
        let (ns, prefix, local) = self.resolve_name(name);
        let qname = QualName::new(prefix.as_deref(), &local, ns.as_deref());
        self.set_qualified(qname, value);
    }

    /// Sets an attribute with an explicit namespace.
    pub fn set_attribute_ns(&self, namespace: Option<&str>, qualified_name: &str, value: &str) {
        let (prefix, local) = split_qname(qualified_name);
        let qname = QualName::new(prefix, local, namespace);
        self.set_qualified(qname, value);
    }

    fn set_qualified(&self, name: QualName, value: &str) {
        let old_bounds = self.rendered_bounds();
        let namespace = name.namespace.clone();
        let local = name.local.clone();
        self.with_mut(|d| d.attributes.set(name, value));
        self.on_attribute_changed(namespace.as_deref(), &local, old_bounds);
    }

    /// Removes an attribute. Returns the removed value.
    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        let (ns, _, local) = self.resolve_name(name);
        self.remove_attribute_ns(ns.as_deref(), &local)
    }

    /// Removes an attribute by namespace URI and local name.
    pub fn remove_attribute_ns(&self, namespace: Option<&str>, local: &str) -> Option<String> {
        if self.with(|d| d.attributes.get(namespace, local).is_none()) {
            return None;
        }

        let old_bounds = self.rendered_bounds();
        let old = self.with_mut(|d| d.attributes.remove(namespace, local));
        self.on_attribute_changed(namespace, local, old_bounds);
        old
    }

    /// Stores an attribute without change notification.
    ///
    /// Used by the parser, when there is nothing to invalidate yet.
    pub(crate) fn init_attribute(&self, name: QualName, value: &str) {
        self.with_mut(|d| d.attributes.set(name, value));
    }

    /// The attribute change handler.
    ///
    /// Every attribute mutation ends up here.
    pub(crate) fn on_attribute_changed(
        &self,
        namespace: Option<&str>,
        local: &str,
        old_bounds: Option<Rect>,
    ) {
        self.with_mut(|d| d.cache.invalidate(namespace, local));

        if namespace.is_none() {
            // `em` and `ex` lengths resolve against the inherited `font-size`.
            let is_viewport_attr = self.capabilities().viewport && VIEWPORT_ATTRIBUTES.contains(&local);
            if is_viewport_attr || local == "font-size" {
                for e in self.descendants().skip(1) {
                    e.with_mut(|d| d.cache.invalidate_viewport());
                }
            }

            // Selectors can match on ancestors and siblings.
            self.invalidate_computed_styles();

            if local == "id" {
                if let Some(doc) = self.owner_document() {
                    doc.mark_ids_stale();
                    for e in doc.descendants().filter(|e| e.is(EId::Use)) {
                        e.cache_remove(&CacheKey::InstanceRoot);
                    }
                }
            }
        }

        if let Some(renderer) = self.renderer() {
            if let Some(rect) = old_bounds {
                renderer.invalidate_rect(rect);
            }

            if let Some(rect) = self.rendered_bounds() {
                renderer.invalidate_rect(rect);
            }
        }
    }

    fn renderer(&self) -> Option<Rc<dyn Renderer>> {
        self.owner_document()?.window().renderer()
    }

    /// Returns element's bounds as reported by the window's renderer.
    ///
    /// `None` when there is no renderer or the element is not renderable.
    pub fn rendered_bounds(&self) -> Option<Rect> {
        if !self.is_renderable() {
            return None;
        }

        self.renderer()?.rendered_bounds(self, self.rendering_hint())
    }


    // Cache.

    pub(crate) fn cache_get(&self, key: &CacheKey) -> Option<CachedValue> {
        self.with(|d| d.cache.get(key).cloned())
    }

    pub(crate) fn cache_insert(&self, key: CacheKey, value: CachedValue) {
        self.with_mut(|d| d.cache.insert(key, value));
    }

    pub(crate) fn cache_remove(&self, key: &CacheKey) {
        self.with_mut(|d| d.cache.remove(key));
    }

    pub(crate) fn invalidate_viewport_cache(&self) {
        self.with_mut(|d| d.cache.invalidate_viewport());
    }

    /// Returns a cached value or computes and stores a new one.
    ///
    /// No borrow is held while `compute` runs, so it can read other elements.
    pub(crate) fn cached<T, G, C>(
        &self,
        key: CacheKey,
        get: G,
        wrap: fn(T) -> CachedValue,
        compute: C,
    ) -> T
    where
        T: Clone,
        G: FnOnce(&CachedValue) -> Option<T>,
        C: FnOnce() -> T,
    {
        if let Some(value) = self.cache_get(&key).as_ref().and_then(get) {
            return value;
        }

        let value = compute();
        self.cache_insert(key, wrap(value.clone()));
        value
    }

    /// Returns a parsed length attribute.
    ///
    /// Cached until the attribute changes.
    pub fn length_attribute(&self, name: &str) -> Option<Length> {
        self.cached(
            CacheKey::Length(name.to_string()),
            |v| match v {
                CachedValue::Length(len) => Some(*len),
                _ => None,
            },
            CachedValue::Length,
            || {
                let text = self.attribute_ns(None, name)?;
                text.parse::<Length>().ok().log_none(|| {
                    log::warn!("Failed to parse {} value: '{}'.", name, text)
                })
            },
        )
    }

    /// Resolves a length attribute into user units.
    ///
    /// Percentages are resolved against the applicable viewport.
    pub fn resolve_length(&self, name: &str, default: Length) -> f64 {
        let length = self.length_attribute(name).unwrap_or(default);
        let viewport = crate::viewport::viewport_size_for(self);
        let ctx = units::UnitContext::for_element(self);
        units::convert_length(length, name, viewport, self, ctx)
    }


    // Tree.

    /// Returns the parent element.
    pub fn parent_element(&self) -> Option<Element> {
        self.0.parent().and_then(Element::new)
    }

    /// Returns an iterator over ancestor elements, starting from the parent.
    pub fn ancestors(&self) -> impl Iterator<Item = Element> {
        self.0.ancestors().skip(1).filter_map(Element::new)
    }

    /// Returns an iterator over child elements.
    pub fn children(&self) -> impl Iterator<Item = Element> {
        self.0.children().filter_map(Element::new)
    }

    /// Returns an iterator over descendant elements, including the current one.
    pub fn descendants(&self) -> impl Iterator<Item = Element> {
        self.0.descendants().filter_map(Element::new)
    }

    /// Returns the first child element.
    pub fn first_element_child(&self) -> Option<Element> {
        self.children().next()
    }

    /// Returns the previous sibling element.
    pub fn previous_sibling_element(&self) -> Option<Element> {
        let mut node = self.0.previous_sibling();
        while let Some(n) = node {
            if let Some(e) = Element::new(n.clone()) {
                return Some(e);
            }
            node = n.previous_sibling();
        }

        None
    }

    /// Returns the next sibling element.
    pub fn next_sibling_element(&self) -> Option<Element> {
        let mut node = self.0.next_sibling();
        while let Some(n) = node {
            if let Some(e) = Element::new(n.clone()) {
                return Some(e);
            }
            node = n.next_sibling();
        }

        None
    }

    /// Returns a concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in self.0.descendants() {
            if let Some(s) = node.borrow().text() {
                text.push_str(s);
            }
        }
        text
    }

    /// Appends a child element.
    ///
    /// The child is detached from its current parent first.
    pub fn append_child(&self, child: &Element) -> Result<(), Error> {
        if self.0.ancestors().any(|n| n == child.0) {
            return Err(Error::InvalidValue(
                "an element cannot be appended to its own descendant".to_string()
            ));
        }

        let old_doc = child.owner_document();
        child.0.detach();
        if let Some(ref doc) = old_doc {
            doc.mark_ids_stale();
        }

        let owner = self.0.borrow().owner.clone();
        for node in child.0.descendants() {
            node.borrow_mut().owner = owner.clone();
        }

        self.0.append(child.0.clone());

        child.on_structure_changed(old_doc.as_ref());

        if let Some(doc) = self.owner_document() {
            doc.mark_ids_stale();
        }

        Ok(())
    }

    /// Appends a text node.
    pub fn append_text(&self, text: &str) {
        let owner = self.0.borrow().owner.clone();
        self.0.append(Node::new(NodeData::new_text(owner, text)));

        if self.tag_name().matches(Some(SVG_NS), "style") {
            self.invalidate_computed_styles();
        }
    }

    /// Detaches the element from its parent.
    pub fn remove(&self) {
        let doc = self.owner_document();
        self.0.detach();
        self.on_structure_changed(doc.as_ref());

        if let Some(doc) = doc {
            doc.mark_ids_stale();
        }
    }

    // Values that depend on the element position are no longer valid.
    fn on_structure_changed(&self, old_doc: Option<&Document>) {
        for e in self.descendants() {
            e.with_mut(|d| d.cache.invalidate_viewport());
        }

        if let Some(doc) = old_doc {
            doc.invalidate_computed_styles();
        }

        self.invalidate_computed_styles();
    }

    // Drops computed styles of the whole document, or of the detached subtree.
    fn invalidate_computed_styles(&self) {
        match self.owner_document() {
            Some(ref doc) if self.0.ancestors().any(|n| n.borrow().is_root()) => {
                doc.invalidate_computed_styles();
            }
            _ => {
                for e in self.descendants() {
                    e.cache_remove(&CacheKey::ComputedStyle);
                }
            }
        }
    }


    // Capability views.

    /// Returns a styleable view of the element.
    pub fn as_styleable(&self) -> Option<Styleable> {
        if self.capabilities().styleable {
            Some(Styleable(self.clone()))
        } else {
            None
        }
    }

    /// Returns a transformable view of the element.
    pub fn as_transformable(&self) -> Option<Transformable> {
        if self.capabilities().transformable {
            Some(Transformable(self.clone()))
        } else {
            None
        }
    }

    /// Returns a viewport view of the element.
    pub fn as_viewport(&self) -> Option<Viewport> {
        if self.capabilities().viewport {
            Some(Viewport(self.clone()))
        } else {
            None
        }
    }

    /// Returns a `viewBox` view of the element.
    pub fn as_fit_to_view_box(&self) -> Option<FitToViewBox> {
        if self.capabilities().fit_to_view_box {
            Some(FitToViewBox(self.clone()))
        } else {
            None
        }
    }

    /// Returns a URI reference view of the element.
    pub fn as_uri_reference(&self) -> Option<UriReference> {
        if self.capabilities().uri_reference {
            Some(UriReference(self.clone()))
        } else {
            None
        }
    }

    /// Returns a `use` view of the element.
    pub fn as_use(&self) -> Option<Use> {
        if self.is(EId::Use) {
            Some(Use(self.clone()))
        } else {
            None
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.with(|d| {
            write!(f, "Element({:?}", d.name)?;
            if let Some(id) = d.attributes.get(None, "id") {
                write!(f, " id={:?}", id)?;
            }
            write!(f, ")")
        })
    }
}

fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.find(':') {
        Some(idx) => (Some(&name[..idx]), &name[idx + 1..]),
        None => (None, name),
    }
}
