//! Property bag, unit table and style derivation.
//!
//! `StyleState` holds the current property values and derives a render-ready
//! style from them. It has no side effects beyond its own mutation; pushing
//! the derived style anywhere is the coordinator's job.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

use crate::changes::StyleChanges;
use crate::error::Result;
use crate::property::{Property, css_name};
use crate::units::UnitTable;
use crate::value::StyleValue;

/// Style key of the composite transform entry.
pub const TRANSFORM_KEY: &str = "transform";

/// Render-ready style: ordered `key -> value` declarations.
///
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedStyle {
    entries: Vec<(String, String)>,
}

impl DerivedStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten into `name:value;` declarations with kebab-case names.
    pub fn to_css_text(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}:{};", css_name(k), v))
            .collect()
    }
}

impl Serialize for DerivedStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Current style-affecting values of one component.
#[derive(Debug, Clone, Default)]
pub struct StyleState {
    values: BTreeMap<Property, StyleValue>,
    units: UnitTable,
    custom: BTreeMap<String, StyleValue>,
}

impl StyleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `property`, or `None` when absent.
    pub fn get(&self, property: Property) -> Option<&StyleValue> {
        self.values.get(&property)
    }

    /// Numeric value of `property`, or `None` when absent or textual.
    pub fn number(&self, property: Property) -> Option<f64> {
        self.get(property).and_then(StyleValue::as_f64)
    }

    /// Set one property. `StyleValue::Clear` removes it.
    ///
    /// Returns whether the stored state changed; assigning the current value
    /// again reports `false`.
    pub fn set_property(&mut self, property: Property, value: StyleValue) -> Result<bool> {
        property.validate(&value)?;
        Ok(self.assign(property, value))
    }

    /// Apply a change set, reporting whether any property changed.
    ///
    /// Timing metadata carried by the change set is not a property and is
    /// ignored here.
    pub fn set_properties(&mut self, changes: &StyleChanges) -> bool {
        let mut changed = false;
        for (property, value) in changes.iter() {
            changed |= self.assign(property, value.clone());
        }
        changed
    }

    /// Unvalidated assignment; callers guarantee the value kind.
    pub(crate) fn assign(&mut self, property: Property, value: StyleValue) -> bool {
        match value {
            StyleValue::Clear => self.values.remove(&property).is_some(),
            value => {
                if self.values.get(&property) == Some(&value) {
                    return false;
                }
                self.values.insert(property, value);
                true
            }
        }
    }

    pub fn unit(&self, property: Property) -> &str {
        self.units.get(property)
    }

    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    pub fn set_unit(&mut self, property: Property, unit: impl Into<String>) {
        self.units.set(property, unit);
    }

    pub fn set_units<I, S>(&mut self, units: I)
    where
        I: IntoIterator<Item = (Property, S)>,
        S: Into<String>,
    {
        self.units.set_many(units);
    }

    /// Replace the custom overlay. Returns whether it differs from before.
    pub fn set_custom_style(&mut self, style: BTreeMap<String, StyleValue>) -> bool {
        if self.custom == style {
            return false;
        }
        self.custom = style;
        true
    }

    pub fn custom_style(&self) -> &BTreeMap<String, StyleValue> {
        &self.custom
    }

    /// Derive the structured style.
    ///
    /// The custom overlay is laid down first so recognized properties win on
    /// key collisions. Spatial properties compose into one `transform` entry
    /// in the fixed order translate, scale, rotate; it is omitted when none of
    /// them is present.
    pub fn derive_style(&self) -> DerivedStyle {
        let mut style = DerivedStyle::new();
        for (key, value) in &self.custom {
            if !value.is_clear() {
                style.insert(key.clone(), value.render(""));
            }
        }

        for (property, value) in &self.values {
            if property.is_spatial() {
                continue;
            }
            style.insert(property.name(), value.render(self.unit(*property)));
        }

        if let Some(transform) = self.transform() {
            style.insert(TRANSFORM_KEY, transform);
        }
        style
    }

    /// Derive the style as flat declaration text (`name:value;`).
    pub fn derive_style_text(&self) -> String {
        self.derive_style().to_css_text()
    }

    fn transform(&self) -> Option<String> {
        let mut parts = Vec::new();

        let axes = [Property::X, Property::Y, Property::Z];
        if axes.iter().any(|axis| self.values.contains_key(axis)) {
            let rendered: Vec<String> = axes
                .iter()
                .map(|axis| {
                    let value = self.get(*axis).cloned().unwrap_or(StyleValue::Number(0.0));
                    value.render(self.unit(*axis))
                })
                .collect();
            parts.push(format!("translate3d({})", rendered.join(",")));
        }
        if let Some(scale) = self.get(Property::Scale) {
            parts.push(format!("scale({})", scale.render(self.unit(Property::Scale))));
        }
        if let Some(rotation) = self.get(Property::Rotation) {
            parts.push(format!(
                "rotate({})",
                rotation.render(self.unit(Property::Rotation))
            ));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}
