// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use xmlwriter::XmlWriter;

use crate::document::Document;
use crate::element::Element;
use crate::namespace::NamespaceManager;

use super::{QualName, XML_NAMESPACE_NS};

pub use xmlwriter::Options as XmlOptions;

/// Writes a document to an SVG string.
pub(crate) fn write(doc: &Document, opt: XmlOptions) -> String {
    let mut xml = XmlWriter::new(opt);

    if let Some(svg) = doc.document_element() {
        let namespaces = doc.namespaces();
        let bindings = collect_bindings(&svg, &namespaces);
        write_element(&svg, None, &bindings, &namespaces, &mut xml);
    }

    xml.end_document()
}

// Prefixes used by the tree, declared once on the document element.
fn collect_bindings(root: &Element, namespaces: &NamespaceManager) -> Vec<(String, String)> {
    let mut bindings: Vec<(String, String)> = namespaces.iter()
        .filter(|(prefix, _)| *prefix != "xml")
        .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
        .collect();

    let mut add = |name: &QualName| {
        if let Some((prefix, uri)) = prefix_of(name, namespaces) {
            if prefix != "xml" && !bindings.iter().any(|(p, _)| *p == prefix) {
                bindings.push((prefix, uri));
            }
        }
    };

    for e in root.descendants() {
        add(&e.tag_name());
        for attr in e.attributes() {
            add(&attr.name);
        }
    }

    bindings
}

fn prefix_of(name: &QualName, namespaces: &NamespaceManager) -> Option<(String, String)> {
    let uri = name.namespace.as_deref()?;
    let prefix = match name.prefix {
        Some(ref prefix) => prefix.clone(),
        None => namespaces.lookup_prefix(uri)?.to_string(),
    };

    Some((prefix, uri.to_string()))
}

fn write_element(
    element: &Element,
    parent_ns: Option<&str>,
    bindings: &[(String, String)],
    namespaces: &NamespaceManager,
    xml: &mut XmlWriter,
) {
    let name = element.tag_name();
    xml.start_element(&name.to_string());

    if name.prefix.is_none() && name.namespace.as_deref() != parent_ns {
        xml.write_attribute("xmlns", name.namespace.as_deref().unwrap_or_default());
    }

    for (prefix, uri) in bindings {
        xml.write_attribute(&format!("xmlns:{}", prefix), uri);
    }

    for attr in element.attributes() {
        xml.write_attribute(&attribute_name(&attr.name, namespaces), &attr.value);
    }

    for child in element.node().children() {
        match Element::new(child.clone()) {
            Some(e) => write_element(&e, name.namespace.as_deref(), &[], namespaces, xml),
            None => {
                if let Some(text) = child.borrow().text() {
                    xml.write_text(text);
                }
            }
        }
    }

    xml.end_element();
}

fn attribute_name(name: &QualName, namespaces: &NamespaceManager) -> String {
    if name.prefix.is_some() {
        return name.to_string();
    }

    match name.namespace.as_deref() {
        Some(XML_NAMESPACE_NS) => format!("xml:{}", name.local),
        Some(uri) => match namespaces.lookup_prefix(uri) {
            Some(prefix) => format!("{}:{}", prefix, name.local),
            None => name.local.clone(),
        },
        None => name.local.clone(),
    }
}
