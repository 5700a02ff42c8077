// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;
use std::rc::Rc;

use crate::cache::{CacheKey, CachedValue};
use crate::element::Element;
use crate::names::is_presentation_attribute;
use crate::tree::SVG_NS;

/// An ordered list of style properties.
#[derive(Clone, Default, PartialEq)]
pub struct StyleDeclaration {
    properties: Vec<(String, String)>,
}

impl StyleDeclaration {
    /// Returns a property value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets a property, replacing the previous value.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.properties.iter_mut().find(|(n, _)| n == name) {
            Some(prop) => prop.1 = value.to_string(),
            None => self.properties.push((name.to_string(), value.to_string())),
        }
    }

    /// Removes a property.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.properties.iter().position(|(n, _)| n == name)?;
        Some(self.properties.remove(idx).1)
    }

    /// Copies all properties from `other`, replacing existing ones.
    pub fn merge(&mut self, other: &StyleDeclaration) {
        for (name, value) in other.iter() {
            self.set(name, value);
        }
    }

    /// Returns an iterator over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of properties.
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Checks that there are no properties.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl fmt::Debug for StyleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "StyleDeclaration {{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ";")?;
            }
            write!(f, " {}: {}", name, value)?;
        }
        write!(f, " }}")
    }
}


/// A source of CSS-resolved styles.
///
/// Presentation attributes are folded in by `Styleable`
/// and must not be handled by the provider.
pub trait StyleProvider {
    /// Returns a cascaded style of an element.
    fn computed_style(&self, element: &Element, pseudo_element: Option<&str>) -> StyleDeclaration;
}


/// A `StyleProvider` backed by `simplecss`.
///
/// Applies document style sheets in document order and then the `style`
/// attribute. `!important` declarations win over normal ones.
#[derive(Clone, Copy, Default, Debug)]
pub struct CssStyleProvider;

impl StyleProvider for CssStyleProvider {
    fn computed_style(&self, element: &Element, pseudo_element: Option<&str>) -> StyleDeclaration {
        let mut normal = StyleDeclaration::default();
        let mut important = StyleDeclaration::default();

        // SVG doesn't have pseudo-elements that can be styled.
        if pseudo_element.is_some() {
            return normal;
        }

        let mut insert = |name: &str, value: &str, is_important: bool| {
            let decl = if is_important { &mut important } else { &mut normal };
            if name == "marker" {
                decl.set("marker-start", value);
                decl.set("marker-mid", value);
                decl.set("marker-end", value);
            } else {
                decl.set(name, value);
            }
        };

        let texts = style_sheets(element);
        let mut sheet = simplecss::StyleSheet::new();
        for text in &texts {
            sheet.parse_more(text);
        }

        for rule in &sheet.rules {
            if rule.selector.matches(&CssElement(element.clone())) {
                for declaration in &rule.declarations {
                    insert(declaration.name, declaration.value, declaration.important);
                }
            }
        }

        if let Some(value) = element.attribute_ns(None, "style") {
            for declaration in simplecss::DeclarationTokenizer::from(value.as_str()) {
                insert(declaration.name, declaration.value, declaration.important);
            }
        }

        normal.merge(&important);
        normal
    }
}

fn style_sheets(element: &Element) -> Vec<String> {
    let doc = match element.owner_document() {
        Some(doc) => doc,
        None => return Vec::new(),
    };

    let mut texts = Vec::new();
    for node in doc.descendants() {
        if !node.tag_name().matches(Some(SVG_NS), "style") {
            continue;
        }

        match node.attribute_ns(None, "type").as_deref() {
            Some("text/css") => {}
            Some(_) => continue,
            None => {}
        }

        texts.push(node.text());
    }

    texts
}

// Checks for a trailing `!important`, as CSS spells it.
fn is_important(value: &str) -> bool {
    const KEYWORD: &str = "important";

    let value = value.trim_end();
    let split = match value.len().checked_sub(KEYWORD.len()) {
        Some(n) if value.is_char_boundary(n) => n,
        _ => return false,
    };

    let (rest, keyword) = value.split_at(split);
    keyword.eq_ignore_ascii_case(KEYWORD) && rest.trim_end().ends_with('!')
}

struct CssElement(Element);

impl simplecss::Element for CssElement {
    fn parent_element(&self) -> Option<Self> {
        self.0.parent_element().map(CssElement)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.0.previous_sibling_element().map(CssElement)
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.0.tag_name().local == local_name
    }

    fn attribute_matches(&self, local_name: &str, operator: simplecss::AttributeOperator) -> bool {
        match self.0.attribute_ns(None, local_name) {
            Some(value) => operator.matches(&value),
            None => false,
        }
    }

    fn pseudo_class_matches(&self, class: simplecss::PseudoClass) -> bool {
        match class {
            simplecss::PseudoClass::FirstChild => self.prev_sibling_element().is_none(),
            _ => false,
        }
    }
}


/// A view over an element that accepts style attributes.
#[derive(Clone, PartialEq, Debug)]
pub struct Styleable(pub(crate) Element);

impl Styleable {
    /// Returns the underlying element.
    #[inline]
    pub fn element(&self) -> &Element {
        &self.0
    }

    /// Returns parsed class names.
    ///
    /// Cached until `class` changes.
    pub fn class_name(&self) -> Rc<Vec<String>> {
        self.0.cached(
            CacheKey::ClassName,
            |v| match v {
                CachedValue::ClassName(names) => Some(names.clone()),
                _ => None,
            },
            CachedValue::ClassName,
            || {
                let names = self.0.attribute_ns(None, "class")
                    .map(|s| s.split_whitespace().map(String::from).collect())
                    .unwrap_or_default();
                Rc::new(names)
            },
        )
    }

    /// Returns a presentation attribute value.
    ///
    /// Returns `None` for non-presentation attributes, for unset ones and for
    /// values marked as `!important`, which is not allowed outside of CSS.
    pub fn presentation_attribute(&self, name: &str) -> Option<String> {
        if !is_presentation_attribute(name) {
            return None;
        }

        self.0.cached(
            CacheKey::Presentation(name.to_string()),
            |v| match v {
                CachedValue::Presentation(value) => Some(value.clone()),
                _ => None,
            },
            CachedValue::Presentation,
            || {
                let value = self.0.attribute_ns(None, name)?;
                let trimmed = value.trim();
                if is_important(trimmed) {
                    log::warn!("'!important' is not allowed in the '{}' attribute.", name);
                    return None;
                }

                Some(trimmed.to_string())
            },
        )
    }

    /// Returns the computed style.
    ///
    /// Presentation attributes have the lowest priority, so any value
    /// resolved by the style provider replaces them.
    /// Cached until an attribute or the document structure changes.
    pub fn computed_style(&self) -> Rc<StyleDeclaration> {
        self.0.cached(
            CacheKey::ComputedStyle,
            |v| match v {
                CachedValue::ComputedStyle(style) => Some(style.clone()),
                _ => None,
            },
            CachedValue::ComputedStyle,
            || Rc::new(self.compute_style()),
        )
    }

    fn compute_style(&self) -> StyleDeclaration {
        let mut style = StyleDeclaration::default();
        for attr in self.0.attributes() {
            if attr.name.namespace.is_some() {
                continue;
            }

            if let Some(value) = self.presentation_attribute(&attr.name.local) {
                style.set(&attr.name.local, &value);
            }
        }

        let css = match self.0.owner_document() {
            Some(doc) => doc.options().style_provider.computed_style(&self.0, None),
            None => CssStyleProvider.computed_style(&self.0, None),
        };

        style.merge(&css);
        style
    }

    /// Returns a computed property value.
    pub fn style_property(&self, name: &str) -> Option<String> {
        self.computed_style().get(name).map(String::from)
    }
}
