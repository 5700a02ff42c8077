// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::Length;

use crate::cache::{CacheKey, CachedValue};
use crate::element::Element;
use crate::instance::Instance;
use crate::names::EId;
use crate::uri::UriReference;

// Stops the recursion check on pathological `use` graphs.
const VISITED_LIMIT: usize = 1_000_000;

/// A view over a `use` element.
#[derive(Clone, PartialEq, Debug)]
pub struct Use(pub(crate) Element);

impl Use {
    /// Returns the underlying element.
    #[inline]
    pub fn element(&self) -> &Element {
        &self.0
    }

    /// Returns the element referenced by `xlink:href`.
    pub fn referenced_element(&self) -> Option<Element> {
        UriReference(self.0.clone()).referenced_element()
    }

    /// Checks that the element references itself, directly or via other `use` elements.
    pub fn is_recursive(&self) -> bool {
        is_recursive(&self.0)
    }

    /// Returns the root of the instance tree.
    ///
    /// Returns `None` when the reference cannot be resolved or is recursive.
    /// The tree is cached until `xlink:href` changes. Changes inside
    /// the referenced subtree are not tracked.
    pub fn instance_root(&self) -> Option<Instance> {
        if let Some(CachedValue::InstanceRoot(root)) = self.0.cache_get(&CacheKey::InstanceRoot) {
            return Some(root);
        }

        let link = self.referenced_element()?;
        if self.is_recursive() {
            log::warn!("Recursive 'use' detected. '{}' will be skipped.", self.0.id());
            return None;
        }

        let root = Instance::new_root(&link, &self.0);
        self.0.cache_insert(CacheKey::InstanceRoot, CachedValue::InstanceRoot(root.clone()));
        Some(root)
    }

    /// Drops the cached instance tree.
    ///
    /// Must be called after a structural change inside the referenced subtree.
    pub fn invalidate_instance_root(&self) {
        self.0.cache_remove(&CacheKey::InstanceRoot);
    }

    /// Temporarily applies the `use` geometry to the referenced element.
    ///
    /// Appends `translate(x, y)` to the `use` transform and, when the referenced
    /// element is a `symbol`, sets its `width` and `height` to the ones of `use`
    /// or to `100%`. Everything is restored when the returned guard is dropped.
    ///
    /// Returns `None` when the reference cannot be resolved or is recursive.
    pub fn copy_to_referenced_element(&self) -> Option<ReferencedElementGuard> {
        let target = self.referenced_element()?;
        if self.is_recursive() {
            log::warn!("Recursive 'use' detected. '{}' will be skipped.", self.0.id());
            return None;
        }

        let zero = Length::new_number(0.0);
        let x = self.0.resolve_length("x", zero);
        let y = self.0.resolve_length("y", zero);

        let saved_transform = self.0.attribute_ns(None, "transform");
        let translate = format!("translate({},{})", x, y);
        let ts = match saved_transform.as_deref().map(str::trim) {
            Some(prev) if !prev.is_empty() => format!("{} {}", prev, translate),
            _ => translate,
        };
        self.0.set_attribute("transform", &ts);

        let saved_size = if target.is(EId::Symbol) {
            let saved = (target.attribute_ns(None, "width"), target.attribute_ns(None, "height"));
            let width = self.0.attribute_ns(None, "width").unwrap_or_else(|| "100%".to_string());
            let height = self.0.attribute_ns(None, "height").unwrap_or_else(|| "100%".to_string());
            target.set_attribute("width", &width);
            target.set_attribute("height", &height);
            Some(saved)
        } else {
            None
        };

        Some(ReferencedElementGuard {
            use_element: self.0.clone(),
            target,
            saved_transform,
            saved_size,
            restored: false,
        })
    }

    /// Runs `f` on the referenced element with the `use` geometry applied.
    ///
    /// Attributes are restored even when `f` panics.
    pub fn with_referenced_element<F, R>(&self, f: F) -> Option<R>
        where F: FnOnce(&Element) -> R
    {
        let guard = self.copy_to_referenced_element()?;
        Some(f(guard.target()))
    }
}


/// Restores attributes modified by `Use::copy_to_referenced_element` on drop.
#[derive(Debug)]
pub struct ReferencedElementGuard {
    use_element: Element,
    target: Element,
    saved_transform: Option<String>,
    saved_size: Option<(Option<String>, Option<String>)>,
    restored: bool,
}

impl ReferencedElementGuard {
    /// Returns the referenced element.
    #[inline]
    pub fn target(&self) -> &Element {
        &self.target
    }

    /// Restores attributes explicitly.
    pub fn restore(mut self) {
        self.restore_impl();
    }

    fn restore_impl(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        set_or_remove(&self.use_element, "transform", self.saved_transform.as_deref());

        if let Some((ref width, ref height)) = self.saved_size {
            set_or_remove(&self.target, "width", width.as_deref());
            set_or_remove(&self.target, "height", height.as_deref());
        }
    }
}

impl Drop for ReferencedElementGuard {
    fn drop(&mut self) {
        self.restore_impl();
    }
}

fn set_or_remove(element: &Element, name: &str, value: Option<&str>) {
    match value {
        Some(v) => element.set_attribute(name, v),
        None => {
            element.remove_attribute_ns(None, name);
        }
    }
}

enum Frame {
    Enter(Element),
    Exit,
}

// An explicit depth-first walk over `use` references.
// The element is recursive when it shows up again on its own reference path.
fn is_recursive(use_element: &Element) -> bool {
    let mut path: Vec<Element> = Vec::new();
    let mut stack = vec![Frame::Enter(use_element.clone())];
    let mut visited = 0;

    while let Some(frame) = stack.pop() {
        let node = match frame {
            Frame::Enter(node) => node,
            Frame::Exit => {
                path.pop();
                continue;
            }
        };

        visited += 1;
        if visited > VISITED_LIMIT {
            log::warn!("Too many 'use' references. Treating as recursive.");
            return true;
        }

        // Cycles that do not pass through the checked element are skipped,
        // since the `use` that closes them has no instance tree on its own.
        if path.contains(&node) {
            if node == *use_element {
                return true;
            }
            continue;
        }

        let link = match UriReference(node.clone()).referenced_element() {
            Some(v) => v,
            None => continue,
        };

        // A `use` cannot reference itself or its own ancestor.
        if link == node || node.ancestors().any(|a| a == link) {
            if node == *use_element {
                return true;
            }
            continue;
        }

        path.push(node);
        stack.push(Frame::Exit);
        for child in link.descendants().filter(|e| e.is(EId::Use)) {
            stack.push(Frame::Enter(child));
        }
    }

    false
}
