//! Property values and the clear marker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value assigned to a style property.
///
/// `Clear` is the marker that removes a property from the bag. It is distinct
/// from `Number(0.0)` and `Text("")`, both of which are rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// Numeric value, rendered with the property's unit suffix.
    Number(f64),
    /// Text value, rendered verbatim.
    Text(String),
    /// Removes the property. Deserializes from `null`.
    Clear,
}

impl StyleValue {
    /// Numeric payload, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for the clear marker.
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }

    /// Render with a unit suffix. Text ignores the unit.
    pub fn render(&self, unit: &str) -> String {
        match self {
            Self::Number(n) => format!("{n}{unit}"),
            Self::Text(s) => s.clone(),
            Self::Clear => String::new(),
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Clear => f.write_str("null"),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<StyleValue>> From<Option<T>> for StyleValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Clear, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_render_like_css() {
        assert_eq!(StyleValue::Number(10.0).render("px"), "10px");
        assert_eq!(StyleValue::Number(0.5).render("rad"), "0.5rad");
        assert_eq!(StyleValue::Number(-3.25).render(""), "-3.25");
    }

    #[test]
    fn text_ignores_unit() {
        assert_eq!(StyleValue::from("none").render("px"), "none");
    }

    #[test]
    fn none_maps_to_clear() {
        assert!(StyleValue::from(None::<f64>).is_clear());
        assert_eq!(StyleValue::from(Some(4.0)), StyleValue::Number(4.0));
    }

    #[test]
    fn unit_and_numbers_deserialize_untagged() {
        use serde::de::IntoDeserializer;
        use serde::de::value::Error;

        let clear = StyleValue::deserialize(IntoDeserializer::<Error>::into_deserializer(()));
        assert_eq!(clear, Ok(StyleValue::Clear));

        let number = StyleValue::deserialize(IntoDeserializer::<Error>::into_deserializer(1.5_f64));
        assert_eq!(number, Ok(StyleValue::Number(1.5)));

        let text = StyleValue::deserialize(IntoDeserializer::<Error>::into_deserializer("auto"));
        assert_eq!(text, Ok(StyleValue::Text("auto".to_string())));
    }
}
