// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::tree::{SVG_NS, XLINK_NS, XML_NAMESPACE_NS};

// Used when a document doesn't bind a prefix explicitly.
const FALLBACK_BINDINGS: &[(&str, &str)] = &[
    ("svg", SVG_NS),
    ("xlink", XLINK_NS),
    ("xml", XML_NAMESPACE_NS),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("cc", "http://creativecommons.org/ns#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
];

/// Prefix to namespace URI bindings of a document.
///
/// Explicit bindings come from the document element and from
/// `add_namespace` calls. Well-known prefixes resolve even without them.
#[derive(Clone, Default, Debug)]
pub struct NamespaceManager {
    bindings: Vec<(String, String)>,
}

impl NamespaceManager {
    /// Creates a manager without explicit bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a prefix to a namespace URI, replacing the previous binding.
    pub fn add_namespace(&mut self, prefix: &str, uri: &str) {
        match self.bindings.iter_mut().find(|(p, _)| p == prefix) {
            Some(binding) => binding.1 = uri.to_string(),
            None => self.bindings.push((prefix.to_string(), uri.to_string())),
        }
    }

    /// Removes an explicit binding.
    ///
    /// A well-known prefix still resolves to its default URI afterwards.
    pub fn remove_namespace(&mut self, prefix: &str) -> bool {
        let len = self.bindings.len();
        self.bindings.retain(|(p, _)| p != prefix);
        self.bindings.len() != len
    }

    /// Returns the namespace URI bound to a prefix.
    pub fn lookup_namespace(&self, prefix: &str) -> Option<&str> {
        self.bindings.iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
            .or_else(|| {
                FALLBACK_BINDINGS.iter()
                    .find(|(p, _)| *p == prefix)
                    .map(|(_, uri)| *uri)
            })
    }

    /// Returns a prefix bound to a namespace URI.
    pub fn lookup_prefix(&self, uri: &str) -> Option<&str> {
        self.bindings.iter()
            .find(|(_, u)| u == uri)
            .map(|(prefix, _)| prefix.as_str())
            .or_else(|| {
                FALLBACK_BINDINGS.iter()
                    .find(|(_, u)| *u == uri)
                    .map(|(prefix, _)| *prefix)
            })
    }

    /// Checks that a prefix is bound explicitly.
    pub fn has_explicit_binding(&self, prefix: &str) -> bool {
        self.bindings.iter().any(|(p, _)| p == prefix)
    }

    /// Returns an iterator over explicit bindings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}
