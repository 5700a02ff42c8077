// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::{Length, LengthUnit as Unit};

use crate::element::Element;
use crate::geom::Size;
use crate::Options;

/// Values required to resolve absolute and font-relative units.
#[derive(Clone, Copy, Debug)]
pub(crate) struct UnitContext {
    pub dpi: f64,
    pub font_size: f64,
}

impl UnitContext {
    pub fn from_options(opt: &Options) -> Self {
        UnitContext { dpi: opt.dpi, font_size: opt.font_size }
    }

    pub fn for_element(element: &Element) -> Self {
        match element.owner_document() {
            Some(doc) => Self::from_options(doc.options()),
            None => Self::from_options(&Options::default()),
        }
    }
}

/// Converts a length into user units.
///
/// Percentages are resolved against the viewport size. The axis is
/// selected by the attribute name, with the normalized diagonal
/// used for attributes that have no axis.
#[inline(never)]
pub(crate) fn convert_length(
    length: Length,
    attribute: &str,
    viewport: Size,
    element: &Element,
    ctx: UnitContext,
) -> f64 {
    let dpi = ctx.dpi;
    let n = length.number;
    match length.unit {
        Unit::None | Unit::Px => n,
        Unit::Em => n * resolve_font_size(element, ctx),
        Unit::Ex => n * resolve_font_size(element, ctx) / 2.0,
        Unit::In => n * dpi,
        Unit::Cm => n * dpi / 2.54,
        Unit::Mm => n * dpi / 25.4,
        Unit::Pt => n * dpi / 72.0,
        Unit::Pc => n * dpi / 6.0,
        Unit::Percent => {
            match attribute {
                "cx" | "dx" | "fx" | "markerWidth" | "refX" | "rx" | "width" | "x" | "x1"
                | "x2" => convert_percent(length, viewport.width),
                "cy" | "dy" | "fy" | "height" | "markerHeight" | "refY" | "ry" | "y" | "y1"
                | "y2" => convert_percent(length, viewport.height),
                _ => {
                    let mut vb_len = viewport.width.powi(2) + viewport.height.powi(2);
                    vb_len = (vb_len / 2.0).sqrt();
                    convert_percent(length, vb_len)
                }
            }
        }
    }
}

fn convert_percent(length: Length, base: f64) -> f64 {
    base * length.number / 100.0
}

/// Resolves the `font-size` in effect for an element.
///
/// Only `font-size` attributes are taken into account,
/// style sheets are ignored.
pub(crate) fn resolve_font_size(element: &Element, ctx: UnitContext) -> f64 {
    let mut nodes: Vec<Element> = element.ancestors().collect();
    nodes.reverse();
    nodes.push(element.clone());

    let mut font_size = ctx.font_size;
    for n in &nodes {
        let value = match n.attribute("font-size") {
            Some(v) => v,
            None => continue,
        };

        match value.parse::<Length>() {
            Ok(length) => {
                let dpi = ctx.dpi;
                let n = length.number;
                font_size = match length.unit {
                    Unit::None | Unit::Px => n,
                    Unit::Em => n * font_size,
                    Unit::Ex => n * font_size / 2.0,
                    Unit::In => n * dpi,
                    Unit::Cm => n * dpi / 2.54,
                    Unit::Mm => n * dpi / 25.4,
                    Unit::Pt => n * dpi / 72.0,
                    Unit::Pc => n * dpi / 6.0,
                    // Relative to the parent `font-size`.
                    Unit::Percent => n * font_size * 0.01,
                }
            }
            Err(_) => font_size = convert_named_font_size(&value, font_size),
        }
    }

    font_size
}

fn convert_named_font_size(name: &str, parent_font_size: f64) -> f64 {
    let factor = match name {
        "xx-small" => -3,
        "x-small" => -2,
        "small" => -1,
        "medium" => 0,
        "large" => 1,
        "x-large" => 2,
        "xx-large" => 3,
        "smaller" => -1,
        "larger" => 1,
        _ => {
            log::warn!("Invalid 'font-size' value: '{}'.", name);
            0
        }
    };

    parent_font_size * 1.2f64.powi(factor)
}
