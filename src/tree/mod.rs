// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The mutable markup tree.
//!
//! Nodes are stored in an `rctree`, so every node is a reference-counted
//! handle and the tree can be edited in place.

use std::fmt;
use std::rc::Weak;

use crate::document::DocumentInner;
use crate::element::ElementData;

pub(crate) mod parse;
pub(crate) mod writer;

/// The SVG namespace URI.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
/// The XLink namespace URI.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
/// The XML namespace URI.
pub const XML_NAMESPACE_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A markup tree node.
pub type Node = rctree::Node<NodeData>;

pub(crate) type WeakNode = rctree::WeakNode<NodeData>;


/// A qualified name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct QualName {
    /// The namespace prefix, if any.
    pub prefix: Option<String>,
    /// The local name.
    pub local: String,
    /// The namespace URI, if any.
    pub namespace: Option<String>,
}

impl QualName {
    /// Creates a new qualified name.
    pub fn new(prefix: Option<&str>, local: &str, namespace: Option<&str>) -> Self {
        QualName {
            prefix: prefix.filter(|p| !p.is_empty()).map(String::from),
            local: local.to_string(),
            namespace: namespace.filter(|ns| !ns.is_empty()).map(String::from),
        }
    }

    /// Checks that the name has the specified namespace and local name.
    #[inline]
    pub fn matches(&self, namespace: Option<&str>, local: &str) -> bool {
        self.local == local && self.namespace.as_deref() == namespace
    }
}

impl fmt::Debug for QualName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.namespace {
            Some(ref ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

impl fmt::Display for QualName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.prefix {
            Some(ref prefix) => write!(f, "{}:{}", prefix, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}


/// An element attribute.
#[derive(Clone, PartialEq)]
pub struct Attribute {
    /// Attribute's name.
    pub name: QualName,
    /// Attribute's raw value.
    pub value: String,
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Attribute {{ name: {:?}, value: {:?} }}", self.name, self.value)
    }
}


/// An ordered attribute list.
///
/// Attributes are unique by namespace and local name.
#[derive(Clone, Default, Debug)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    /// Returns a value of the attribute with the specified namespace and local name.
    pub fn get(&self, namespace: Option<&str>, local: &str) -> Option<&str> {
        self.0.iter()
            .find(|a| a.name.matches(namespace, local))
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute, replacing an existing one with the same name.
    ///
    /// Returns the previous value.
    pub fn set(&mut self, name: QualName, value: &str) -> Option<String> {
        let pos = self.0.iter()
            .position(|a| a.name.matches(name.namespace.as_deref(), &name.local));

        match pos {
            Some(idx) => {
                let attr = &mut self.0[idx];
                // The original prefix is preserved.
                Some(std::mem::replace(&mut attr.value, value.to_string()))
            }
            None => {
                self.0.push(Attribute { name, value: value.to_string() });
                None
            }
        }
    }

    /// Removes an attribute and returns its value.
    pub fn remove(&mut self, namespace: Option<&str>, local: &str) -> Option<String> {
        let idx = self.0.iter().position(|a| a.name.matches(namespace, local))?;
        Some(self.0.remove(idx).value)
    }

    /// Returns an iterator over attributes.
    pub fn iter(&self) -> std::slice::Iter<Attribute> {
        self.0.iter()
    }

    /// Returns the number of attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks that there are no attributes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}


/// A markup node payload.
pub struct NodeData {
    pub(crate) owner: Weak<DocumentInner>,
    pub(crate) kind: NodeKind,
}

pub(crate) enum NodeKind {
    Root,
    Element(ElementData),
    Text(String),
}

impl NodeData {
    pub(crate) fn new_root(owner: Weak<DocumentInner>) -> Self {
        NodeData { owner, kind: NodeKind::Root }
    }

    pub(crate) fn new_text(owner: Weak<DocumentInner>, text: &str) -> Self {
        NodeData { owner, kind: NodeKind::Text(text.to_string()) }
    }

    /// Checks that the node is the document root.
    #[inline]
    pub fn is_root(&self) -> bool {
        matches!(self.kind, NodeKind::Root)
    }

    /// Checks that the node is an element.
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    /// Returns node's text, if it's a text node.
    pub fn text(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Text(ref text) => Some(text),
            _ => None,
        }
    }

    pub(crate) fn element(&self) -> Option<&ElementData> {
        match self.kind {
            NodeKind::Element(ref d) => Some(d),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self) -> Option<&mut ElementData> {
        match self.kind {
            NodeKind::Element(ref mut d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Debug for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            NodeKind::Root => write!(f, "Root"),
            NodeKind::Element(ref d) => write!(f, "Element({:?})", d.name),
            NodeKind::Text(ref text) => write!(f, "Text({:?})", text),
        }
    }
}
