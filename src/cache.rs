// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::rc::Rc;

use svgtypes::{AspectRatio, Length};

use crate::geom::{Rect, Transform};
use crate::instance::Instance;
use crate::names::VIEWPORT_ATTRIBUTES;
use crate::style::StyleDeclaration;
use crate::transform::TransformList;
use crate::tree::XLINK_NS;

/// A derived property kept in a per-element cache.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) enum CacheKey {
    ClassName,
    Presentation(String),
    ComputedStyle,
    TransformList,
    Length(String),
    ViewBox,
    AspectRatio,
    ViewportRect,
    ViewBoxTransform,
    InstanceRoot,
}

impl CacheKey {
    /// Checks that the cached value is derived from the specified attribute.
    pub(crate) fn depends_on(&self, namespace: Option<&str>, local: &str) -> bool {
        if namespace.is_some() {
            // `xlink:href` is the only namespaced attribute we care about.
            return *self == CacheKey::InstanceRoot && namespace == Some(XLINK_NS) && local == "href";
        }

        match *self {
            CacheKey::ClassName => local == "class",
            CacheKey::Presentation(ref name) => local == name,
            // Attribute selectors can match on any attribute.
            CacheKey::ComputedStyle => true,
            CacheKey::TransformList => local == "transform",
            CacheKey::Length(ref name) => local == name,
            CacheKey::ViewBox => local == "viewBox",
            CacheKey::AspectRatio => local == "preserveAspectRatio",
            CacheKey::ViewportRect | CacheKey::ViewBoxTransform => {
                VIEWPORT_ATTRIBUTES.contains(&local) || local == "font-size"
            }
            CacheKey::InstanceRoot => local == "href",
        }
    }

    /// Checks that the value depends on the geometry of an outer viewport.
    pub(crate) fn is_viewport_dependent(&self) -> bool {
        matches!(
            self,
            CacheKey::ViewportRect | CacheKey::ViewBoxTransform
        )
    }
}

#[derive(Clone, Debug)]
pub(crate) enum CachedValue {
    ClassName(Rc<Vec<String>>),
    Presentation(Option<String>),
    ComputedStyle(Rc<StyleDeclaration>),
    TransformList(Rc<TransformList>),
    Length(Option<Length>),
    ViewBox(Option<Rect>),
    AspectRatio(AspectRatio),
    ViewportRect(Rect),
    ViewBoxTransform(Transform),
    InstanceRoot(Instance),
}

/// A per-element map of derived values.
///
/// A value stays valid until one of the attributes it depends on changes.
#[derive(Default, Debug)]
pub(crate) struct PropertyCache {
    entries: HashMap<CacheKey, CachedValue>,
}

impl PropertyCache {
    #[inline]
    pub fn get(&self, key: &CacheKey) -> Option<&CachedValue> {
        self.entries.get(key)
    }

    #[inline]
    pub fn insert(&mut self, key: CacheKey, value: CachedValue) {
        self.entries.insert(key, value);
    }

    #[inline]
    pub fn remove(&mut self, key: &CacheKey) {
        self.entries.remove(key);
    }

    /// Drops all entries that depend on the specified attribute.
    pub fn invalidate(&mut self, namespace: Option<&str>, local: &str) {
        self.entries.retain(|key, _| !key.depends_on(namespace, local));
    }

    /// Drops all entries that depend on an outer viewport.
    pub fn invalidate_viewport(&mut self) {
        self.entries.retain(|key, _| !key.is_viewport_dependent());
        // Percentage lengths are resolved on each access, so parsed lengths stay.
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
