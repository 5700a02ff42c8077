// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::document::Document;
use crate::element::Element;
use crate::{factory, Error};

use super::{QualName, SVG_NS, XML_NAMESPACE_NS};

const MAX_DEPTH: u32 = 1024;
const ELEMENTS_LIMIT: usize = 1_000_000;

/// Builds the document tree from a parsed XML.
pub(crate) fn parse_document(xml: &roxmltree::Document, doc: &Document) -> Result<(), Error> {
    let root = xml.root_element();

    {
        let mut namespaces = doc.namespaces_mut();
        for ns in root.namespaces() {
            if let Some(prefix) = ns.name() {
                namespaces.add_namespace(prefix, ns.uri());
            }
        }
    }

    let mut elements_count = 0;
    let svg = parse_element(root, doc, 0, &mut elements_count)?;
    doc.root().append(svg.node().clone());

    log::trace!("Parsed {} elements.", elements_count);

    Ok(())
}

fn parse_element(
    node: roxmltree::Node,
    doc: &Document,
    depth: u32,
    elements_count: &mut usize,
) -> Result<Element, Error> {
    if depth > MAX_DEPTH {
        return Err(Error::ElementsLimitReached);
    }

    *elements_count += 1;
    if *elements_count > ELEMENTS_LIMIT {
        return Err(Error::ElementsLimitReached);
    }

    let tag_name = node.tag_name();
    let name = qual_name(node, tag_name.namespace(), tag_name.name());
    let element = factory::create_any(doc.downgrade(), name);

    for attr in node.attributes() {
        let name = qual_name(node, attr.namespace(), attr.name());
        element.init_attribute(name, attr.value());
    }

    let keep_spaces = preserves_whitespaces(&element);
    for child in node.children() {
        if child.is_element() {
            let e = parse_element(child, doc, depth + 1, elements_count)?;
            element.node().append(e.node().clone());
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            if keep_spaces || !text.trim().is_empty() {
                element.append_text(text);
            }
        }
    }

    Ok(element)
}

fn qual_name(node: roxmltree::Node, namespace: Option<&str>, local: &str) -> QualName {
    let prefix = namespace.and_then(|ns| {
        if ns == XML_NAMESPACE_NS {
            Some("xml")
        } else {
            node.lookup_prefix(ns)
        }
    });

    QualName::new(prefix, local, namespace)
}

// Whitespace-only text is meaningful only inside text content and raw data elements.
fn preserves_whitespaces(element: &Element) -> bool {
    if element.namespace_uri().as_deref() != Some(SVG_NS) {
        return false;
    }

    matches!(
        element.local_name().as_str(),
        "text" | "tspan" | "tref" | "textPath" | "style" | "title" | "desc" | "script"
    )
}
