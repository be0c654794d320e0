//! # Cost Records
//!
//! Fixed costs and business-wide variable costs as entered by the user.
//! Everything downstream of input validation works in monthly-equivalent
//! amounts; [`CostFrequency::monthly_divisor`] is the single place where
//! a declared frequency becomes a divisor.
//!
//! Cost records are never mutated in place. An edit replaces the record,
//! and derived values (price records, summaries) are recomputed from
//! scratch.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "name": "Shop rent",
//!   "amount": 14400.0,
//!   "frequency": "annual",
//!   "category": "rent"
//! }
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};

/// How often a cost recurs.
///
/// All aggregation happens on monthly equivalents, so a 1200/year
/// license contributes 100/month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CostFrequency {
    /// Recurs every month
    #[default]
    Monthly,
    /// Recurs every six months
    Semiannual,
    /// Recurs once a year
    Annual,
}

impl CostFrequency {
    /// All frequency variants for UI selection
    pub const ALL: [CostFrequency; 3] = [
        CostFrequency::Monthly,
        CostFrequency::Semiannual,
        CostFrequency::Annual,
    ];

    /// Number of months the declared amount covers
    pub fn monthly_divisor(&self) -> f64 {
        match self {
            CostFrequency::Monthly => 1.0,
            CostFrequency::Semiannual => 6.0,
            CostFrequency::Annual => 12.0,
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            CostFrequency::Monthly => "Monthly",
            CostFrequency::Semiannual => "Semiannual",
            CostFrequency::Annual => "Annual",
        }
    }
}

/// Cost categories recognized by the market-range validator.
///
/// Categories without a market reference range (e.g. [`CostCategory::Other`])
/// still aggregate normally; they just skip range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Rent,
    Utilities,
    Personnel,
    Supplies,
    Licenses,
    Insurance,
    Marketing,
    Equipment,
    Transport,
    Other,
}

impl CostCategory {
    /// All category variants for UI selection
    pub const ALL: [CostCategory; 10] = [
        CostCategory::Rent,
        CostCategory::Utilities,
        CostCategory::Personnel,
        CostCategory::Supplies,
        CostCategory::Licenses,
        CostCategory::Insurance,
        CostCategory::Marketing,
        CostCategory::Equipment,
        CostCategory::Transport,
        CostCategory::Other,
    ];

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            CostCategory::Rent => "Rent",
            CostCategory::Utilities => "Utilities",
            CostCategory::Personnel => "Personnel",
            CostCategory::Supplies => "Supplies",
            CostCategory::Licenses => "Licenses & Permits",
            CostCategory::Insurance => "Insurance",
            CostCategory::Marketing => "Marketing",
            CostCategory::Equipment => "Equipment",
            CostCategory::Transport => "Transport",
            CostCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A recurring fixed cost as entered by the user.
///
/// Invariant: `amount > 0`, enforced by [`CostItem::validate`] before the
/// record enters a business. The aggregators assume validated inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    /// User label (e.g., "Shop rent", "Health permit")
    pub name: String,

    /// Declared amount, in the declared frequency
    pub amount: f64,

    /// How often the amount recurs
    pub frequency: CostFrequency,

    /// Category, drives market-range validation
    pub category: CostCategory,
}

impl CostItem {
    /// Create a cost item. Does not validate; call [`CostItem::validate`].
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        frequency: CostFrequency,
        category: CostCategory,
    ) -> Self {
        CostItem {
            name: name.into(),
            amount,
            frequency,
            category,
        }
    }

    /// Validate input invariants.
    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::missing_field("name"));
        }
        if self.amount <= 0.0 {
            return Err(EngineError::invalid_input(
                "amount",
                self.amount.to_string(),
                "Cost amount must be positive",
            ));
        }
        Ok(())
    }

    /// Monthly-equivalent amount.
    pub fn monthly_amount(&self) -> f64 {
        self.amount / self.frequency.monthly_divisor()
    }
}

/// A variable cost not tied to a single unit of product.
///
/// Entries with `product_id == None` are business-wide overhead and are
/// allocated across products by the engine; entries tied to a product
/// stay out of the overhead pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalVariableCost {
    /// Free-form category label (e.g., "packaging", "delivery")
    pub category: String,

    /// User label for this cost
    pub name: String,

    /// Monthly value
    pub value: f64,

    /// Product this cost belongs to, if any
    pub product_id: Option<Uuid>,
}

impl AdditionalVariableCost {
    /// Create a business-wide (overhead) variable cost.
    pub fn overhead(category: impl Into<String>, name: impl Into<String>, value: f64) -> Self {
        AdditionalVariableCost {
            category: category.into(),
            name: name.into(),
            value,
            product_id: None,
        }
    }

    /// Create a variable cost attached to one product.
    pub fn for_product(
        category: impl Into<String>,
        name: impl Into<String>,
        value: f64,
        product_id: Uuid,
    ) -> Self {
        AdditionalVariableCost {
            category: category.into(),
            name: name.into(),
            value,
            product_id: Some(product_id),
        }
    }

    /// Validate input invariants.
    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::missing_field("name"));
        }
        if self.value <= 0.0 {
            return Err(EngineError::invalid_input(
                "value",
                self.value.to_string(),
                "Cost value must be positive",
            ));
        }
        Ok(())
    }

    /// Whether this entry belongs to the business-wide overhead pool.
    pub fn is_overhead(&self) -> bool {
        self.product_id.is_none()
    }
}

/// Sum of all business-wide overhead entries (monthly).
pub fn overhead_total(costs: &[AdditionalVariableCost]) -> f64 {
    costs
        .iter()
        .filter(|c| c.is_overhead())
        .map(|c| c.value)
        .sum()
}

/// Sum of all fixed costs, normalized to monthly equivalents.
pub fn monthly_fixed_total(items: &[CostItem]) -> f64 {
    items.iter().map(|c| c.monthly_amount()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_normalization() {
        let annual = CostItem::new("License", 1200.0, CostFrequency::Annual, CostCategory::Licenses);
        assert_eq!(annual.monthly_amount(), 100.0);

        let semiannual =
            CostItem::new("Insurance", 600.0, CostFrequency::Semiannual, CostCategory::Insurance);
        assert_eq!(semiannual.monthly_amount(), 100.0);

        let monthly = CostItem::new("Rent", 900.0, CostFrequency::Monthly, CostCategory::Rent);
        assert_eq!(monthly.monthly_amount(), 900.0);
    }

    #[test]
    fn test_validate_rejects_non_positive_amount() {
        let zero = CostItem::new("Rent", 0.0, CostFrequency::Monthly, CostCategory::Rent);
        assert!(zero.validate().is_err());

        let negative = CostItem::new("Rent", -50.0, CostFrequency::Monthly, CostCategory::Rent);
        assert_eq!(negative.validate().unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let item = CostItem::new("  ", 100.0, CostFrequency::Monthly, CostCategory::Rent);
        assert_eq!(item.validate().unwrap_err().error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_overhead_total_skips_product_costs() {
        let product_id = Uuid::new_v4();
        let costs = vec![
            AdditionalVariableCost::overhead("packaging", "Boxes", 120.0),
            AdditionalVariableCost::overhead("delivery", "Fuel", 80.0),
            AdditionalVariableCost::for_product("topping", "Sprinkles", 40.0, product_id),
        ];
        assert_eq!(overhead_total(&costs), 200.0);
    }

    #[test]
    fn test_monthly_fixed_total_mixes_frequencies() {
        let items = vec![
            CostItem::new("Rent", 900.0, CostFrequency::Monthly, CostCategory::Rent),
            CostItem::new("License", 1200.0, CostFrequency::Annual, CostCategory::Licenses),
        ];
        assert_eq!(monthly_fixed_total(&items), 1000.0);
    }

    #[test]
    fn test_frequency_serialization() {
        let json = serde_json::to_string(&CostFrequency::Semiannual).unwrap();
        assert_eq!(json, "\"semiannual\"");

        let roundtrip: CostFrequency = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, CostFrequency::Semiannual);
    }

    #[test]
    fn test_cost_item_serialization_roundtrip() {
        let item = CostItem::new("Rent", 800.0, CostFrequency::Monthly, CostCategory::Rent);
        let json = serde_json::to_string(&item).unwrap();
        let roundtrip: CostItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, roundtrip);
    }
}
