// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

macro_rules! element_ids {
    ($($variant:ident => $name:literal,)+) => {
        /// List of well-known SVG elements.
        ///
        /// Any other element in the SVG namespace is created as a generic element.
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        #[allow(missing_docs)]
        pub enum EId {
            $($variant,)+
        }

        impl EId {
            /// Parses an element id from a local name.
            ///
            /// Case-sensitive.
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(text: &str) -> Option<EId> {
                match text {
                    $($name => Some(EId::$variant),)+
                    _ => None,
                }
            }

            /// Returns the element's local name.
            pub fn to_str(self) -> &'static str {
                match self {
                    $(EId::$variant => $name,)+
                }
            }
        }
    };
}

element_ids! {
    A               => "a",
    Circle          => "circle",
    ClipPath        => "clipPath",
    ColorProfile    => "color-profile",
    Defs            => "defs",
    Desc            => "desc",
    Ellipse         => "ellipse",
    G               => "g",
    Image           => "image",
    Line            => "line",
    LinearGradient  => "linearGradient",
    Marker          => "marker",
    Mask            => "mask",
    Metadata        => "metadata",
    Path            => "path",
    Pattern         => "pattern",
    Polygon         => "polygon",
    Polyline        => "polyline",
    RadialGradient  => "radialGradient",
    Rect            => "rect",
    Script          => "script",
    Stop            => "stop",
    Svg             => "svg",
    Switch          => "switch",
    Symbol          => "symbol",
    Text            => "text",
    TextPath        => "textPath",
    Title           => "title",
    Tref            => "tref",
    Tspan           => "tspan",
    Use             => "use",
}

impl std::fmt::Display for EId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Attributes that define an element's viewport.
///
/// A change to any of them invalidates viewport-derived values
/// of the element and of all nested viewports.
pub(crate) const VIEWPORT_ATTRIBUTES: &[&str] = &[
    "x",
    "y",
    "width",
    "height",
    "viewBox",
    "preserveAspectRatio",
];

// SVG 1.1 presentation attributes.
const PRESENTATION_ATTRIBUTES: &[&str] = &[
    "alignment-baseline",
    "baseline-shift",
    "clip",
    "clip-path",
    "clip-rule",
    "color",
    "color-interpolation",
    "color-interpolation-filters",
    "color-profile",
    "color-rendering",
    "cursor",
    "direction",
    "display",
    "dominant-baseline",
    "enable-background",
    "fill",
    "fill-opacity",
    "fill-rule",
    "filter",
    "flood-color",
    "flood-opacity",
    "font-family",
    "font-size",
    "font-size-adjust",
    "font-stretch",
    "font-style",
    "font-variant",
    "font-weight",
    "glyph-orientation-horizontal",
    "glyph-orientation-vertical",
    "image-rendering",
    "kerning",
    "letter-spacing",
    "lighting-color",
    "marker-end",
    "marker-mid",
    "marker-start",
    "mask",
    "opacity",
    "overflow",
    "pointer-events",
    "shape-rendering",
    "stop-color",
    "stop-opacity",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "text-anchor",
    "text-decoration",
    "text-rendering",
    "unicode-bidi",
    "visibility",
    "word-spacing",
    "writing-mode",
];

/// Checks that an attribute name is a presentation attribute.
pub fn is_presentation_attribute(name: &str) -> bool {
    PRESENTATION_ATTRIBUTES.contains(&name)
}
