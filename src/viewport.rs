// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::{Align, AspectRatio, Length, LengthUnit};

use crate::cache::{CacheKey, CachedValue};
use crate::element::Element;
use crate::geom::{Rect, Size, Transform};
use crate::{Error, OptionLog};

/// A view over an element that has `viewBox` and `preserveAspectRatio`.
#[derive(Clone, PartialEq, Debug)]
pub struct FitToViewBox(pub(crate) Element);

impl FitToViewBox {
    /// Returns the underlying element.
    #[inline]
    pub fn element(&self) -> &Element {
        &self.0
    }

    /// Returns the parsed `viewBox` attribute.
    ///
    /// Values are not validated, so the size can be zero or negative.
    pub fn view_box(&self) -> Option<Rect> {
        view_box(&self.0)
    }

    /// Returns the parsed `preserveAspectRatio` attribute.
    pub fn preserve_aspect_ratio(&self) -> AspectRatio {
        aspect_ratio(&self.0)
    }
}


/// A view over a viewport-establishing element, i.e. `svg`.
#[derive(Clone, PartialEq, Debug)]
pub struct Viewport(pub(crate) Element);

impl Viewport {
    /// Returns the underlying element.
    #[inline]
    pub fn element(&self) -> &Element {
        &self.0
    }

    /// Checks that there are no viewport-establishing ancestors.
    pub fn is_outermost(&self) -> bool {
        nearest_viewport(&self.0).is_none()
    }

    /// Returns the parsed `viewBox` attribute.
    pub fn view_box(&self) -> Option<Rect> {
        view_box(&self.0)
    }

    /// Returns the parsed `preserveAspectRatio` attribute.
    pub fn preserve_aspect_ratio(&self) -> AspectRatio {
        aspect_ratio(&self.0)
    }

    /// Returns the resolved `width` and `height` attributes.
    ///
    /// Both default to `100%`.
    pub fn viewport_size(&self) -> Size {
        let def = Length::new(100.0, LengthUnit::Percent);
        Size::new(
            self.0.resolve_length("width", def),
            self.0.resolve_length("height", def),
        )
    }

    /// Returns the viewport rectangle in the parent's user space.
    ///
    /// `x` and `y` are ignored on the outermost element.
    pub fn viewport_rect(&self) -> Rect {
        let size = self.viewport_size();
        if self.is_outermost() {
            size.to_rect(0.0, 0.0)
        } else {
            let zero = Length::new_number(0.0);
            size.to_rect(self.0.resolve_length("x", zero), self.0.resolve_length("y", zero))
        }
    }

    /// Returns the rectangle that percentages of descendants resolve against.
    ///
    /// This is the `viewBox`, when set, or the viewport size otherwise.
    pub fn user_rect(&self) -> Rect {
        self.0.cached(
            CacheKey::ViewportRect,
            |v| match v {
                CachedValue::ViewportRect(r) => Some(*r),
                _ => None,
            },
            CachedValue::ViewportRect,
            || match self.view_box() {
                Some(vb) => vb,
                None => self.viewport_size().to_rect(0.0, 0.0),
            },
        )
    }

    /// Returns the transform from the `viewBox` coordinates
    /// to the parent's user space.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidValue` when the `viewBox` size is zero or negative.
    pub fn view_box_transform(&self) -> Result<Transform, Error> {
        if let Some(CachedValue::ViewBoxTransform(ts)) = self.0.cache_get(&CacheKey::ViewBoxTransform) {
            return Ok(ts);
        }

        let ts = self.compute_view_box_transform()?;
        self.0.cache_insert(CacheKey::ViewBoxTransform, CachedValue::ViewBoxTransform(ts));
        Ok(ts)
    }

    fn compute_view_box_transform(&self) -> Result<Transform, Error> {
        let size = self.viewport_size();

        let mut ts = Transform::default();
        if !self.is_outermost() {
            let rect = self.viewport_rect();
            ts.translate(rect.x, rect.y);
        }

        if let Some(vb) = self.view_box() {
            if vb.width < 0.0 || vb.height < 0.0 {
                return Err(Error::InvalidValue(format!("negative viewBox size: {:?}", vb)));
            }

            if vb.width == 0.0 || vb.height == 0.0 {
                return Err(Error::InvalidValue(format!("zero viewBox size: {:?}", vb)));
            }

            let rx = size.width / vb.width;
            let ry = size.height / vb.height;

            let aspect = self.preserve_aspect_ratio();
            if aspect.align == Align::None {
                ts.scale(rx, ry);
            } else {
                let ratio = if aspect.slice { rx.max(ry) } else { rx.min(ry) };
                let dx = size.width - ratio * vb.width;
                let dy = size.height - ratio * vb.height;
                let (tx, ty) = aligned_pos(aspect.align, 0.0, 0.0, dx, dy);
                ts.translate(tx, ty);
                ts.scale(ratio, ratio);
            }

            ts.translate(-vb.x, -vb.y);
        }

        if is_document_element(&self.0) {
            if let Some(doc) = self.0.owner_document() {
                let (tx, ty) = doc.current_translate();
                ts.translate(tx, ty);
                let scale = doc.current_scale();
                ts.scale(scale, scale);
            }
        }

        Ok(ts)
    }

    /// Returns the transform to the parent viewport's user space.
    pub fn ctm(&self) -> Result<Transform, Error> {
        ctm(&self.0, false)
    }

    /// Returns the transform to the screen.
    pub fn screen_ctm(&self) -> Result<Transform, Error> {
        ctm(&self.0, true)
    }

    /// Returns the user zoom factor.
    ///
    /// Always 1 for a non-root element.
    pub fn current_scale(&self) -> f64 {
        match self.root_document() {
            Some(doc) => doc.current_scale(),
            None => 1.0,
        }
    }

    /// Sets the user zoom factor.
    ///
    /// Has an effect only on the document element.
    pub fn set_current_scale(&self, scale: f64) {
        match self.root_document() {
            Some(doc) => {
                doc.set_current_scale(scale);
                self.on_zoom_or_pan();
            }
            None => log::warn!("Zoom can be set only on the document element."),
        }
    }

    /// Returns the user pan offset.
    pub fn current_translate(&self) -> (f64, f64) {
        match self.root_document() {
            Some(doc) => doc.current_translate(),
            None => (0.0, 0.0),
        }
    }

    /// Sets the user pan offset.
    ///
    /// Has an effect only on the document element.
    pub fn set_current_translate(&self, x: f64, y: f64) {
        match self.root_document() {
            Some(doc) => {
                doc.set_current_translate(x, y);
                self.on_zoom_or_pan();
            }
            None => log::warn!("Pan can be set only on the document element."),
        }
    }

    fn root_document(&self) -> Option<crate::Document> {
        if is_document_element(&self.0) {
            self.0.owner_document()
        } else {
            None
        }
    }

    fn on_zoom_or_pan(&self) {
        self.0.invalidate_viewport_cache();

        if let Some(doc) = self.0.owner_document() {
            let window = doc.window();
            if let Some(renderer) = window.renderer() {
                renderer.invalidate_rect(window.size().to_rect(0.0, 0.0));
            }
        }
    }
}


/// Returns object aligned position.
fn aligned_pos(align: Align, x: f64, y: f64, w: f64, h: f64) -> (f64, f64) {
    match align {
        Align::None     => (x,           y          ),
        Align::XMinYMin => (x,           y          ),
        Align::XMidYMin => (x + w / 2.0, y          ),
        Align::XMaxYMin => (x + w,       y          ),
        Align::XMinYMid => (x,           y + h / 2.0),
        Align::XMidYMid => (x + w / 2.0, y + h / 2.0),
        Align::XMaxYMid => (x + w,       y + h / 2.0),
        Align::XMinYMax => (x,           y + h      ),
        Align::XMidYMax => (x + w / 2.0, y + h      ),
        Align::XMaxYMax => (x + w,       y + h      ),
    }
}

fn view_box(element: &Element) -> Option<Rect> {
    element.cached(
        CacheKey::ViewBox,
        |v| match v {
            CachedValue::ViewBox(r) => Some(*r),
            _ => None,
        },
        CachedValue::ViewBox,
        || {
            let text = element.attribute_ns(None, "viewBox")?;
            parse_view_box(&text).log_none(|| {
                log::warn!("Failed to parse viewBox value: '{}'.", text)
            })
        },
    )
}

// `svgtypes::ViewBox` rejects a non-positive size,
// while we have to report it on transform computation.
fn parse_view_box(text: &str) -> Option<Rect> {
    let mut numbers = Vec::with_capacity(4);
    for n in svgtypes::NumberListParser::from(text) {
        numbers.push(n.ok()?);
    }

    if numbers.len() != 4 {
        return None;
    }

    Some(Rect::new(numbers[0], numbers[1], numbers[2], numbers[3]))
}

fn aspect_ratio(element: &Element) -> AspectRatio {
    element.cached(
        CacheKey::AspectRatio,
        |v| match v {
            CachedValue::AspectRatio(a) => Some(*a),
            _ => None,
        },
        CachedValue::AspectRatio,
        || {
            let text = match element.attribute_ns(None, "preserveAspectRatio") {
                Some(v) => v,
                None => return AspectRatio::default(),
            };

            text.parse().ok().log_none(|| {
                log::warn!("Failed to parse preserveAspectRatio value: '{}'.", text)
            }).unwrap_or_default()
        },
    )
}

fn is_document_element(element: &Element) -> bool {
    match element.node().parent() {
        Some(parent) => parent.borrow().is_root(),
        None => false,
    }
}

pub(crate) fn nearest_viewport(element: &Element) -> Option<Element> {
    element.ancestors().find(|e| e.capabilities().viewport)
}

/// Returns the size that percentage lengths of an element resolve against.
pub(crate) fn viewport_size_for(element: &Element) -> Size {
    match nearest_viewport(element) {
        Some(vp) => Viewport(vp).user_rect().size(),
        None => match element.owner_document() {
            Some(doc) => doc.window().size(),
            None => Size::default(),
        },
    }
}

/// Accumulates transforms from an element to the nearest viewport,
/// or to the screen when `screen` is set.
pub(crate) fn ctm(element: &Element, screen: bool) -> Result<Transform, Error> {
    let mut ts = if let Some(vp) = element.as_viewport() {
        vp.view_box_transform()?
    } else if let Some(t) = element.as_transformable() {
        t.transform()
    } else {
        Transform::default()
    };

    for ancestor in element.ancestors() {
        if let Some(vp) = ancestor.as_viewport() {
            ts.prepend(&vp.view_box_transform()?);
            if !screen {
                break;
            }
        } else if let Some(t) = ancestor.as_transformable() {
            ts.prepend(&t.transform());
        }
    }

    Ok(ts)
}
