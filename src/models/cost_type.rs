//! Cost type model
//!
//! A cost type categorizes entries and defines the unit and per-unit rate
//! used to derive an entry's cost amount. Exactly one cost type is the
//! system-wide default, applied when a payload leaves the type unset.

use serde::{Deserialize, Serialize};

use super::ids::CostTypeId;
use super::money::Money;

/// A category of cost with a unit and a per-unit rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostType {
    /// Unique identifier
    pub id: CostTypeId,

    /// Display name (e.g., "Labor")
    pub name: String,

    /// Singular unit label (e.g., "hour")
    pub unit: String,

    /// Plural unit label (e.g., "hours")
    pub unit_plural: String,

    /// Monetary rate per unit
    pub rate: Money,

    /// Whether this is the system-wide default cost type
    #[serde(default)]
    pub is_default: bool,
}

impl CostType {
    /// Create a new cost type
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        unit_plural: impl Into<String>,
        rate: Money,
    ) -> Self {
        Self {
            id: CostTypeId::new(),
            name: name.into(),
            unit: unit.into(),
            unit_plural: unit_plural.into(),
            rate,
            is_default: false,
        }
    }

    /// Derive the cost amount for a unit count at this type's rate
    pub fn cost_for(&self, units: f64) -> Money {
        self.rate.scale(units)
    }

    /// Unit label for a unit count ("1 hour", "2.5 hours")
    pub fn unit_label(&self, units: f64) -> String {
        let label = if (units - 1.0).abs() < f64::EPSILON {
            &self.unit
        } else {
            &self.unit_plural
        };
        format!("{} {}", format_units(units), label)
    }
}

/// Format a unit count without a trailing ".0" on whole numbers
pub fn format_units(units: f64) -> String {
    if units.fract() == 0.0 {
        format!("{:.0}", units)
    } else {
        format!("{}", units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_for() {
        let ct = CostType::new("Labor", "hour", "hours", Money::from_cents(7500));
        assert_eq!(ct.cost_for(2.0), Money::from_cents(15000));
        assert_eq!(ct.cost_for(0.5), Money::from_cents(3750));
    }

    #[test]
    fn test_unit_label() {
        let ct = CostType::new("Labor", "hour", "hours", Money::from_cents(7500));
        assert_eq!(ct.unit_label(1.0), "1 hour");
        assert_eq!(ct.unit_label(2.5), "2.5 hours");
        assert_eq!(ct.unit_label(3.0), "3 hours");
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(3.0), "3");
        assert_eq!(format_units(2.5), "2.5");
    }
}
