//! Per-property unit suffixes.

use std::collections::BTreeMap;

use crate::property::Property;

/// Unit suffix table.
///
/// Units are structural configuration: changing one never counts as a
/// property change and never triggers a notification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitTable {
    overrides: BTreeMap<Property, String>,
}

impl UnitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit for `property`, falling back to its default.
    pub fn get(&self, property: Property) -> &str {
        self.overrides
            .get(&property)
            .map_or(property.default_unit(), String::as_str)
    }

    pub fn set(&mut self, property: Property, unit: impl Into<String>) {
        self.overrides.insert(property, unit.into());
    }

    pub fn set_many<I, S>(&mut self, units: I)
    where
        I: IntoIterator<Item = (Property, S)>,
        S: Into<String>,
    {
        for (property, unit) in units {
            self.set(property, unit);
        }
    }

    /// Drop an override so the default applies again.
    pub fn reset(&mut self, property: Property) {
        self.overrides.remove(&property);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_shadow_defaults() {
        let mut units = UnitTable::new();
        assert_eq!(units.get(Property::Rotation), "rad");

        units.set(Property::Rotation, "deg");
        assert_eq!(units.get(Property::Rotation), "deg");

        units.reset(Property::Rotation);
        assert_eq!(units.get(Property::Rotation), "rad");
    }

    #[test]
    fn set_many_applies_each_entry() {
        let mut units = UnitTable::new();
        units.set_many([(Property::X, "%"), (Property::Y, "vh")]);
        assert_eq!(units.get(Property::X), "%");
        assert_eq!(units.get(Property::Y), "vh");
        assert_eq!(units.get(Property::Z), "px");
    }
}
