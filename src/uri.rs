// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;
use std::io::Read;

use url::Url;

use crate::element::Element;
use crate::Error;

/// A parsed IRI reference.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Href {
    /// A fragment in the current document, like `#id`.
    Fragment(String),
    /// A reference to another resource, with an optional fragment.
    External(String, Option<String>),
}

impl Href {
    /// Parses an IRI reference.
    ///
    /// Returns `None` for an empty string or an empty fragment.
    pub fn parse(href: &str) -> Option<Href> {
        let href = href.trim();
        let (url, id) = match href.rfind('#') {
            None => (Some(href), None),
            Some(0) => (None, Some(&href[1..])),
            Some(p) => (Some(&href[..p]), Some(&href[(p + 1)..])),
        };

        match (url, id) {
            (None, Some(id)) if !id.is_empty() => Some(Href::Fragment(id.to_string())),
            (Some(url), None) if !url.is_empty() => Some(Href::External(url.to_string(), None)),
            (Some(url), Some(id)) if !id.is_empty() => {
                Some(Href::External(url.to_string(), Some(id.to_string())))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Href::Fragment(id) => write!(f, "#{}", id),
            Href::External(url, Some(id)) => write!(f, "{}#{}", url, id),
            Href::External(url, None) => write!(f, "{}", url),
        }
    }
}


/// A view over an element that has an `xlink:href` attribute.
#[derive(Clone, PartialEq, Debug)]
pub struct UriReference(pub(crate) Element);

impl UriReference {
    /// Returns the underlying element.
    #[inline]
    pub fn element(&self) -> &Element {
        &self.0
    }

    /// Returns the raw `xlink:href` value.
    pub fn href(&self) -> Option<String> {
        self.0.href()
    }

    /// Resolves `xlink:href` to an element.
    ///
    /// Returns `None` when the attribute is not set or cannot be resolved.
    pub fn referenced_element(&self) -> Option<Element> {
        let href = self.0.href()?;
        let doc = self.0.owner_document()?;
        let link = doc.get_node_by_uri(&href);
        if link.is_none() {
            log::warn!("Failed to resolve '{}' referenced by {:?}.", href, self.0);
        }

        link
    }
}


/// A source of external resources.
pub trait ResourceLoader {
    /// Loads a resource as raw bytes.
    fn load(&self, url: &Url) -> Result<Vec<u8>, Error>;
}

/// A `ResourceLoader` for `file:` URLs.
#[derive(Clone, Copy, Default, Debug)]
pub struct FileLoader;

impl ResourceLoader for FileLoader {
    fn load(&self, url: &Url) -> Result<Vec<u8>, Error> {
        if url.scheme() != "file" {
            return Err(Error::InvalidUrl(format!("unsupported URL scheme: {}", url)));
        }

        let path = url.to_file_path()
            .map_err(|_| Error::InvalidUrl(url.to_string()))?;
        std::fs::read(path).map_err(Error::Io)
    }
}


/// Checks that the URL points to a compressed SVG.
pub(crate) fn is_svgz(url: &Url) -> bool {
    url.path().to_ascii_lowercase().ends_with(".svgz")
}

/// Checks that the data starts with the gzip magic bytes.
#[inline]
pub(crate) fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&[0x1f, 0x8b])
}

/// Decompresses an SVGZ file.
pub fn decompress_svgz(data: &[u8]) -> Result<Vec<u8>, Error> {
    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(data);
    let mut decoded = Vec::with_capacity(data.len() * 2);
    decoder.read_to_end(&mut decoded).map_err(|_| Error::MalformedGZip)?;
    Ok(decoded)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_href() {
        assert_eq!(Href::parse("#foo"), Some(Href::Fragment("foo".to_string())));
        assert_eq!(
            Href::parse("file.svg#foo"),
            Some(Href::External("file.svg".to_string(), Some("foo".to_string())))
        );
        assert_eq!(Href::parse("file.svg"), Some(Href::External("file.svg".to_string(), None)));
        assert_eq!(Href::parse("#"), None);
        assert_eq!(Href::parse(""), None);
    }

    #[test]
    fn svgz_detection() {
        assert!(is_svgz(&Url::parse("file:///tmp/image.SVGZ").unwrap()));
        assert!(!is_svgz(&Url::parse("file:///tmp/image.svg").unwrap()));
    }

    #[test]
    fn malformed_gzip() {
        assert!(matches!(decompress_svgz(&[0x1f, 0x8b, 0, 0]), Err(Error::MalformedGZip)));
    }
}
