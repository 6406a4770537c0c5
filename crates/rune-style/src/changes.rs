//! Batched property changes.

use crate::error::{Result, StyleError};
use crate::property::Property;
use crate::value::StyleValue;

/// Reserved key carrying transition timing. It travels with a change set but
/// is never applied as a property.
pub const DURATION_KEY: &str = "duration";

/// An ordered set of property changes, plus optional transition timing.
///
/// Later entries for the same property win. Entries are validated when added,
/// so a built change set is always applicable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleChanges {
    entries: Vec<(Property, StyleValue)>,
    duration_ms: Option<u64>,
}

impl StyleChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs as a host component would supply them.
    ///
    /// The `duration` key is lifted into [`Self::duration_ms`]; any other
    /// unknown key is an error.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<StyleValue>,
    {
        let mut changes = Self::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.into();
            if key == DURATION_KEY {
                changes.duration_ms = match value {
                    StyleValue::Number(ms) => Some(duration_from_f64(ms)?),
                    StyleValue::Clear => None,
                    StyleValue::Text(text) => {
                        return Err(StyleError::ExpectedNumber {
                            property: DURATION_KEY.to_string(),
                            value: text,
                        });
                    }
                };
                continue;
            }
            let property = key.parse::<Property>()?;
            changes.push(property, value)?;
        }
        Ok(changes)
    }

    /// Add a change after checking the value kind.
    pub fn push(&mut self, property: Property, value: impl Into<StyleValue>) -> Result<()> {
        let value = value.into();
        property.validate(&value)?;
        self.entries.push((property, value));
        Ok(())
    }

    /// Builder form of [`Self::push`].
    pub fn with(mut self, property: Property, value: impl Into<StyleValue>) -> Result<Self> {
        self.push(property, value)?;
        Ok(self)
    }

    /// Builder form for an explicit transition duration.
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    /// Last value given for `property`, if any.
    pub fn get(&self, property: Property) -> Option<&StyleValue> {
        self.entries
            .iter()
            .rev()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, &StyleValue)> {
        self.entries.iter().map(|(p, v)| (*p, v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

pub(crate) fn duration_from_f64(ms: f64) -> Result<u64> {
    if !ms.is_finite() || ms < 0.0 {
        return Err(StyleError::InvalidDuration(ms));
    }
    Ok(ms.floor() as u64)
}
