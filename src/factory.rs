// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The element type registry.

use std::rc::Weak;

use crate::document::{Document, DocumentInner};
use crate::element::{Element, ElementData};
use crate::names::EId;
use crate::tree::{Node, NodeData, NodeKind, QualName, SVG_NS};

/// Maps a namespace and a local name to a well-known element type.
///
/// The namespace is compared case-insensitively, the local name is not.
/// Returns `None` for foreign namespaces and unknown names.
pub fn element_kind(namespace_uri: Option<&str>, local_name: &str) -> Option<EId> {
    if !namespace_uri?.eq_ignore_ascii_case(SVG_NS) {
        return None;
    }

    EId::from_str(local_name)
}

/// Creates a well-known SVG element owned by a document.
///
/// Returns `None` when `element_kind` does. The element is not attached.
pub fn create(
    prefix: Option<&str>,
    local_name: &str,
    namespace_uri: Option<&str>,
    owner: &Document,
) -> Option<Element> {
    let kind = element_kind(namespace_uri, local_name)?;
    let name = QualName::new(prefix, local_name, namespace_uri);
    Some(new_element(owner.downgrade(), name, Some(kind)))
}

/// Creates an element of any type.
///
/// Falls back to a generic element when the registry doesn't know the name.
pub(crate) fn create_any(owner: Weak<DocumentInner>, name: QualName) -> Element {
    let kind = element_kind(name.namespace.as_deref(), &name.local);
    new_element(owner, name, kind)
}

fn new_element(owner: Weak<DocumentInner>, name: QualName, kind: Option<EId>) -> Element {
    Element(Node::new(NodeData {
        owner,
        kind: NodeKind::Element(ElementData::new(name, kind)),
    }))
}
