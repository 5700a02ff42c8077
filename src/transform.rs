// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::rc::Rc;
use std::str::FromStr;

use svgtypes::TransformListToken;

use crate::cache::{CacheKey, CachedValue};
use crate::element::Element;
use crate::geom::Transform;
use crate::{Error, OptionLog};

/// A single `transform` attribute entry.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum TransformItem {
    Matrix(Transform),
    Translate { tx: f64, ty: f64 },
    Scale { sx: f64, sy: f64 },
    Rotate { angle: f64 },
    SkewX { angle: f64 },
    SkewY { angle: f64 },
}

impl TransformItem {
    /// Returns the item as a matrix.
    pub fn to_transform(&self) -> Transform {
        match *self {
            TransformItem::Matrix(ts) => ts,
            TransformItem::Translate { tx, ty } => Transform::new_translate(tx, ty),
            TransformItem::Scale { sx, sy } => Transform::new_scale(sx, sy),
            TransformItem::Rotate { angle } => Transform::new_rotate(angle),
            TransformItem::SkewX { angle } => Transform::new_skew_x(angle),
            TransformItem::SkewY { angle } => Transform::new_skew_y(angle),
        }
    }
}

impl From<TransformListToken> for TransformItem {
    fn from(token: TransformListToken) -> Self {
        match token {
            TransformListToken::Matrix { a, b, c, d, e, f } => {
                TransformItem::Matrix(Transform::new(a, b, c, d, e, f))
            }
            TransformListToken::Translate { tx, ty } => TransformItem::Translate { tx, ty },
            TransformListToken::Scale { sx, sy } => TransformItem::Scale { sx, sy },
            TransformListToken::Rotate { angle } => TransformItem::Rotate { angle },
            TransformListToken::SkewX { angle } => TransformItem::SkewX { angle },
            TransformListToken::SkewY { angle } => TransformItem::SkewY { angle },
        }
    }
}


/// A parsed `transform` attribute.
///
/// `rotate(a cx cy)` is stored as a translate, rotate, translate sequence.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct TransformList(Vec<TransformItem>);

impl TransformList {
    /// Returns the number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks that the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an item at index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&TransformItem> {
        self.0.get(index)
    }

    /// Returns an iterator over items.
    pub fn iter(&self) -> std::slice::Iter<TransformItem> {
        self.0.iter()
    }

    /// Multiplies all items, left to right.
    ///
    /// An empty list yields an identity matrix.
    pub fn consolidate(&self) -> Transform {
        let mut ts = Transform::default();
        for item in &self.0 {
            ts.append(&item.to_transform());
        }
        ts
    }
}

impl FromStr for TransformList {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Error> {
        let mut items = Vec::new();
        for token in svgtypes::TransformListParser::from(text) {
            let token = token.map_err(|e| Error::InvalidValue(e.to_string()))?;
            items.push(TransformItem::from(token));
        }

        Ok(TransformList(items))
    }
}


/// A view over an element that accepts the `transform` attribute.
#[derive(Clone, PartialEq, Debug)]
pub struct Transformable(pub(crate) Element);

impl Transformable {
    /// Returns the underlying element.
    #[inline]
    pub fn element(&self) -> &Element {
        &self.0
    }

    /// Returns the parsed `transform` attribute.
    ///
    /// The result is cached until the attribute changes.
    /// A missing or malformed attribute yields an empty list.
    pub fn transform_list(&self) -> Rc<TransformList> {
        self.0.cached(
            CacheKey::TransformList,
            |v| match v {
                CachedValue::TransformList(list) => Some(list.clone()),
                _ => None,
            },
            CachedValue::TransformList,
            || {
                let list = self.0.attribute("transform").and_then(|text| {
                    text.parse::<TransformList>().ok().log_none(|| {
                        log::warn!("Failed to parse transform value: '{}'.", text)
                    })
                });
                Rc::new(list.unwrap_or_default())
            },
        )
    }

    /// Returns the consolidated `transform` attribute.
    #[inline]
    pub fn transform(&self) -> Transform {
        self.transform_list().consolidate()
    }

    /// Returns the transform from the element's user space
    /// to the nearest viewport's user space.
    pub fn ctm(&self) -> Result<Transform, Error> {
        crate::viewport::ctm(&self.0, false)
    }

    /// Returns the transform from the element's user space to the screen.
    pub fn screen_ctm(&self) -> Result<Transform, Error> {
        crate::viewport::ctm(&self.0, true)
    }
}
