//! The recognized property set.
//!
//! Spatial properties (`x`, `y`, `z`, `scale`, `rotation`) never render on
//! their own; they compose into the single `transform` entry. Every other
//! property renders under its camelCase style key, which [`css_name`]
//! translates to kebab-case for declaration text.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, StyleError};
use crate::value::StyleValue;

/// A property recognized by the style state.
///
/// Declaration order is render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    X,
    Y,
    Z,
    Scale,
    Rotation,
    Width,
    Height,
    Opacity,
    ZIndex,
    Margin,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    Padding,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    Border,
    BorderWidth,
    BorderColor,
    BorderRadius,
    Background,
    BackgroundColor,
    Transition,
    Display,
}

/// What kind of value a property accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Numeric,
    Text,
    /// Numbers get the unit suffix, text (`auto`, `1px 2px`) passes through.
    Either,
}

impl Property {
    /// Every recognized property, in render order.
    pub const ALL: [Property; 27] = [
        Self::X,
        Self::Y,
        Self::Z,
        Self::Scale,
        Self::Rotation,
        Self::Width,
        Self::Height,
        Self::Opacity,
        Self::ZIndex,
        Self::Margin,
        Self::MarginTop,
        Self::MarginRight,
        Self::MarginBottom,
        Self::MarginLeft,
        Self::Padding,
        Self::PaddingTop,
        Self::PaddingRight,
        Self::PaddingBottom,
        Self::PaddingLeft,
        Self::Border,
        Self::BorderWidth,
        Self::BorderColor,
        Self::BorderRadius,
        Self::Background,
        Self::BackgroundColor,
        Self::Transition,
        Self::Display,
    ];

    /// The property's name, which is also its style key.
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::Scale => "scale",
            Self::Rotation => "rotation",
            Self::Width => "width",
            Self::Height => "height",
            Self::Opacity => "opacity",
            Self::ZIndex => "zIndex",
            Self::Margin => "margin",
            Self::MarginTop => "marginTop",
            Self::MarginRight => "marginRight",
            Self::MarginBottom => "marginBottom",
            Self::MarginLeft => "marginLeft",
            Self::Padding => "padding",
            Self::PaddingTop => "paddingTop",
            Self::PaddingRight => "paddingRight",
            Self::PaddingBottom => "paddingBottom",
            Self::PaddingLeft => "paddingLeft",
            Self::Border => "border",
            Self::BorderWidth => "borderWidth",
            Self::BorderColor => "borderColor",
            Self::BorderRadius => "borderRadius",
            Self::Background => "background",
            Self::BackgroundColor => "backgroundColor",
            Self::Transition => "transition",
            Self::Display => "display",
        }
    }

    /// Look up a property by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Whether the property is a component of the composite transform.
    pub fn is_spatial(self) -> bool {
        matches!(
            self,
            Self::X | Self::Y | Self::Z | Self::Scale | Self::Rotation
        )
    }

    pub fn value_kind(self) -> ValueKind {
        match self {
            Self::X
            | Self::Y
            | Self::Z
            | Self::Scale
            | Self::Rotation
            | Self::Width
            | Self::Height
            | Self::Opacity
            | Self::ZIndex => ValueKind::Numeric,
            Self::Border
            | Self::BorderColor
            | Self::Background
            | Self::BackgroundColor
            | Self::Transition
            | Self::Display => ValueKind::Text,
            _ => ValueKind::Either,
        }
    }

    /// Unit suffix used when no override is configured.
    pub fn default_unit(self) -> &'static str {
        match self {
            Self::Rotation => "rad",
            Self::Scale | Self::Opacity | Self::ZIndex => "",
            _ if self.value_kind() == ValueKind::Text => "",
            _ => "px",
        }
    }

    /// Check that `value` fits this property. The clear marker always fits.
    pub fn validate(self, value: &StyleValue) -> Result<()> {
        match (self.value_kind(), value) {
            (_, StyleValue::Clear) => Ok(()),
            (ValueKind::Numeric, StyleValue::Text(text)) => Err(StyleError::ExpectedNumber {
                property: self.name().to_string(),
                value: text.clone(),
            }),
            (ValueKind::Text, StyleValue::Number(n)) => Err(StyleError::ExpectedText {
                property: self.name().to_string(),
                value: *n,
            }),
            (_, StyleValue::Number(n)) if !n.is_finite() => Err(StyleError::NonFiniteNumber {
                property: self.name().to_string(),
                value: *n,
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Property {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| StyleError::UnknownProperty(s.to_string()))
    }
}

/// Translation table from camelCase style keys to CSS declaration names.
const CSS_NAMES: &[(&str, &str)] = &[
    ("zIndex", "z-index"),
    ("marginTop", "margin-top"),
    ("marginRight", "margin-right"),
    ("marginBottom", "margin-bottom"),
    ("marginLeft", "margin-left"),
    ("paddingTop", "padding-top"),
    ("paddingRight", "padding-right"),
    ("paddingBottom", "padding-bottom"),
    ("paddingLeft", "padding-left"),
    ("borderWidth", "border-width"),
    ("borderColor", "border-color"),
    ("borderRadius", "border-radius"),
    ("backgroundColor", "background-color"),
];

/// Declaration name for a style key. Keys missing from the table pass through.
pub fn css_name(key: &str) -> &str {
    CSS_NAMES
        .iter()
        .find(|(camel, _)| *camel == key)
        .map_or(key, |(_, kebab)| *kebab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for property in Property::ALL {
            assert_eq!(Property::from_name(property.name()), Some(property));
        }
        assert_eq!(Property::from_name("duration"), None);
    }

    #[test]
    fn all_is_sorted_in_render_order() {
        let mut sorted = Property::ALL;
        sorted.sort();
        assert_eq!(sorted, Property::ALL);
    }

    #[test]
    fn default_units() {
        assert_eq!(Property::X.default_unit(), "px");
        assert_eq!(Property::Height.default_unit(), "px");
        assert_eq!(Property::Rotation.default_unit(), "rad");
        assert_eq!(Property::Opacity.default_unit(), "");
        assert_eq!(Property::ZIndex.default_unit(), "");
        assert_eq!(Property::MarginLeft.default_unit(), "px");
        assert_eq!(Property::Display.default_unit(), "");
    }

    #[test]
    fn validate_rejects_mismatched_kinds() {
        assert!(Property::X.validate(&"10px".into()).is_err());
        assert!(Property::Display.validate(&StyleValue::Number(1.0)).is_err());
        assert!(Property::Margin.validate(&"auto".into()).is_ok());
        assert!(Property::Margin.validate(&StyleValue::Number(4.0)).is_ok());
        assert!(Property::Opacity.validate(&StyleValue::Clear).is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_numbers() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                Property::X.validate(&StyleValue::Number(value)),
                Err(StyleError::NonFiniteNumber { ref property, .. }) if property == "x"
            ));
            assert!(matches!(
                Property::Margin.validate(&StyleValue::Number(value)),
                Err(StyleError::NonFiniteNumber { .. })
            ));
        }
        assert!(Property::Width.validate(&StyleValue::Number(-0.0)).is_ok());
    }

    #[test]
    fn css_names_translate_multi_word_keys() {
        assert_eq!(css_name("backgroundColor"), "background-color");
        assert_eq!(css_name("marginTop"), "margin-top");
        assert_eq!(css_name("zIndex"), "z-index");
        assert_eq!(css_name("width"), "width");
        assert_eq!(css_name("fontSize"), "fontSize");
    }
}
