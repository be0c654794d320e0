//! # Market Reference Data & Cost Validation
//!
//! Compares declared costs against a static table of plausible monthly
//! market ranges, scaled by a location multiplier, and detects essential
//! cost categories a business type is missing.
//!
//! Findings are purely advisory: they never block a cost from being
//! recorded. The rules, per category range `[min, max]` adjusted by the
//! zone multiplier:
//!
//! | Monthly amount            | Finding | Severity | Suggested amount |
//! |---------------------------|---------|----------|------------------|
//! | `< adjusted min`          | warning | medium   | adjusted min     |
//! | `> adjusted max × 1.5`    | error   | high     | adjusted max     |
//! | otherwise                 | success | low      | -                |
//!
//! Personnel costs get one extra check, independent of the range: a
//! per-employee monthly amount below the statutory minimum wage adds a
//! high-severity warning.
//!
//! ## Example
//!
//! ```rust
//! use costwise_core::costs::{CostCategory, CostFrequency, CostItem};
//! use costwise_core::market::{validate_cost, BusinessContext, FindingType};
//!
//! let rent = CostItem::new("Shop rent", 400.0, CostFrequency::Monthly, CostCategory::Rent);
//! let findings = validate_cost(&rent, &BusinessContext::default());
//!
//! assert_eq!(findings.len(), 1);
//! assert_eq!(findings[0].finding_type, FindingType::Warning);
//! assert_eq!(findings[0].suggested_amount, Some(800.0));
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::costs::{CostCategory, CostItem};
use crate::rounding::round2;

/// Statutory minimum monthly wage used by the personnel check.
/// Update when the statutory figure changes.
pub const MONTHLY_MINIMUM_WAGE: f64 = 1300.0;

/// Factor above the adjusted maximum at which a cost stops being
/// "high" and becomes implausible.
const OVERRUN_FACTOR: f64 = 1.5;

/// How severe a finding is, for display ordering and emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// The outcome class of a validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingType {
    /// The amount sits inside the expected range
    Success,
    /// The amount looks off; worth reviewing
    Warning,
    /// The amount is implausible for the market
    Error,
}

/// A plausible monthly range for one cost category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketRange {
    /// Lower bound of the plausible monthly amount
    pub min_monthly: f64,
    /// Upper bound of the plausible monthly amount
    pub max_monthly: f64,
}

impl MarketRange {
    const fn new(min_monthly: f64, max_monthly: f64) -> Self {
        MarketRange {
            min_monthly,
            max_monthly,
        }
    }

    /// Scale both bounds by a location multiplier.
    pub fn scaled(&self, multiplier: f64) -> MarketRange {
        MarketRange {
            min_monthly: round2(self.min_monthly * multiplier),
            max_monthly: round2(self.max_monthly * multiplier),
        }
    }
}

/// Named location zones with cost-of-doing-business multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationZone {
    /// City center, premium foot traffic
    Downtown,
    /// Commercial district or mall
    Commercial,
    /// Neighborhood storefront (the 1.0 baseline)
    #[default]
    Residential,
    /// Small town or roadside
    Rural,
}

impl LocationZone {
    /// All zone variants for UI selection
    pub const ALL: [LocationZone; 4] = [
        LocationZone::Downtown,
        LocationZone::Commercial,
        LocationZone::Residential,
        LocationZone::Rural,
    ];

    /// Multiplier applied to base market ranges
    pub fn multiplier(&self) -> f64 {
        match self {
            LocationZone::Downtown => 1.3,
            LocationZone::Commercial => 1.15,
            LocationZone::Residential => 1.0,
            LocationZone::Rural => 0.85,
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            LocationZone::Downtown => "Downtown",
            LocationZone::Commercial => "Commercial district",
            LocationZone::Residential => "Residential area",
            LocationZone::Rural => "Rural",
        }
    }
}

/// The kind of food/beverage business being planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    Restaurant,
    #[default]
    Cafeteria,
    Bakery,
    FoodTruck,
    JuiceBar,
}

impl BusinessType {
    /// All business type variants for UI selection
    pub const ALL: [BusinessType; 5] = [
        BusinessType::Restaurant,
        BusinessType::Cafeteria,
        BusinessType::Bakery,
        BusinessType::FoodTruck,
        BusinessType::JuiceBar,
    ];

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            BusinessType::Restaurant => "Restaurant",
            BusinessType::Cafeteria => "Cafeteria",
            BusinessType::Bakery => "Bakery",
            BusinessType::FoodTruck => "Food truck",
            BusinessType::JuiceBar => "Juice bar",
        }
    }
}

/// Base monthly market range for a cost category, before zone scaling.
///
/// Categories without a reference range (e.g. `Other`) return `None`
/// and skip range validation entirely.
pub fn base_range(category: CostCategory) -> Option<MarketRange> {
    match category {
        CostCategory::Rent => Some(MarketRange::new(800.0, 5000.0)),
        CostCategory::Utilities => Some(MarketRange::new(150.0, 900.0)),
        CostCategory::Personnel => Some(MarketRange::new(MONTHLY_MINIMUM_WAGE, 9000.0)),
        CostCategory::Supplies => Some(MarketRange::new(200.0, 3000.0)),
        CostCategory::Licenses => Some(MarketRange::new(50.0, 600.0)),
        CostCategory::Insurance => Some(MarketRange::new(80.0, 700.0)),
        CostCategory::Marketing => Some(MarketRange::new(100.0, 2500.0)),
        CostCategory::Equipment => Some(MarketRange::new(100.0, 2000.0)),
        CostCategory::Transport => Some(MarketRange::new(80.0, 1200.0)),
        CostCategory::Other => None,
    }
}

/// The business context a cost is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BusinessContext {
    /// Kind of business, drives the essential-cost table
    pub business_type: BusinessType,

    /// Location zone, drives the range multiplier
    pub zone: LocationZone,

    /// Headcount for the per-employee personnel check
    pub employee_count: u32,
}

impl Default for BusinessContext {
    fn default() -> Self {
        BusinessContext {
            business_type: BusinessType::default(),
            zone: LocationZone::default(),
            employee_count: 1,
        }
    }
}

/// One advisory validation finding for a cost entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFinding {
    /// Outcome class (success / warning / error)
    pub finding_type: FindingType,

    /// How prominently to surface the finding
    pub severity: Severity,

    /// Category of the validated cost
    pub category: CostCategory,

    /// Human-readable explanation
    pub message: String,

    /// An in-range amount to suggest instead, when applicable
    pub suggested_amount: Option<f64>,

    /// The zone-adjusted range the amount was checked against
    pub market_range: Option<MarketRange>,
}

/// Validate one cost entry against the market table.
///
/// Always returns at least one finding. Never blocks persistence; the
/// caller decides what to show and whether to keep the entry as-is.
pub fn validate_cost(item: &CostItem, ctx: &BusinessContext) -> Vec<ValidationFinding> {
    let monthly = item.monthly_amount();
    let mut findings = Vec::new();

    match base_range(item.category) {
        None => findings.push(ValidationFinding {
            finding_type: FindingType::Success,
            severity: Severity::Low,
            category: item.category,
            message: format!("No market reference range for {}", item.category),
            suggested_amount: None,
            market_range: None,
        }),
        Some(base) => {
            let adjusted = base.scaled(ctx.zone.multiplier());
            if monthly < adjusted.min_monthly {
                findings.push(ValidationFinding {
                    finding_type: FindingType::Warning,
                    severity: Severity::Medium,
                    category: item.category,
                    message: format!(
                        "{} of {:.2}/month is below the typical market minimum of {:.2}",
                        item.category, monthly, adjusted.min_monthly
                    ),
                    suggested_amount: Some(adjusted.min_monthly),
                    market_range: Some(adjusted),
                });
            } else if monthly > adjusted.max_monthly * OVERRUN_FACTOR {
                findings.push(ValidationFinding {
                    finding_type: FindingType::Error,
                    severity: Severity::High,
                    category: item.category,
                    message: format!(
                        "{} of {:.2}/month is far above the typical market maximum of {:.2}",
                        item.category, monthly, adjusted.max_monthly
                    ),
                    suggested_amount: Some(adjusted.max_monthly),
                    market_range: Some(adjusted),
                });
            } else {
                findings.push(ValidationFinding {
                    finding_type: FindingType::Success,
                    severity: Severity::Low,
                    category: item.category,
                    message: format!("{} is within the expected market range", item.category),
                    suggested_amount: None,
                    market_range: Some(adjusted),
                });
            }
        }
    }

    // Personnel: per-employee wage floor, independent of the range check
    if item.category == CostCategory::Personnel {
        let employees = ctx.employee_count.max(1) as f64;
        let per_employee = monthly / employees;
        if per_employee < MONTHLY_MINIMUM_WAGE {
            findings.push(ValidationFinding {
                finding_type: FindingType::Warning,
                severity: Severity::High,
                category: item.category,
                message: format!(
                    "Personnel cost of {:.2}/month per employee is below the statutory minimum wage of {:.2}",
                    per_employee, MONTHLY_MINIMUM_WAGE
                ),
                suggested_amount: Some(round2(MONTHLY_MINIMUM_WAGE * employees)),
                market_range: None,
            });
        }
    }

    findings
}

/// How important an essential cost is for a business type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

/// A cost category a business type is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EssentialCost {
    /// The expected category
    pub category: CostCategory,

    /// Rough monthly estimate to seed the suggestion
    pub estimated_monthly: f64,

    /// How critical the category is for this business type
    pub importance: Importance,
}

impl EssentialCost {
    const fn new(category: CostCategory, estimated_monthly: f64, importance: Importance) -> Self {
        EssentialCost {
            category,
            estimated_monthly,
            importance,
        }
    }
}

/// Essential cost categories per business type.
static ESSENTIAL_COSTS: Lazy<HashMap<BusinessType, Vec<EssentialCost>>> = Lazy::new(|| {
    use CostCategory::*;
    use Importance::*;

    let mut table = HashMap::new();
    table.insert(
        BusinessType::Restaurant,
        vec![
            EssentialCost::new(Rent, 2500.0, High),
            EssentialCost::new(Personnel, 4000.0, High),
            EssentialCost::new(Utilities, 500.0, High),
            EssentialCost::new(Supplies, 1200.0, Medium),
            EssentialCost::new(Licenses, 200.0, Medium),
            EssentialCost::new(Insurance, 300.0, Low),
        ],
    );
    table.insert(
        BusinessType::Cafeteria,
        vec![
            EssentialCost::new(Rent, 1500.0, High),
            EssentialCost::new(Utilities, 350.0, High),
            EssentialCost::new(Supplies, 800.0, Medium),
            EssentialCost::new(Licenses, 150.0, Medium),
            EssentialCost::new(Marketing, 200.0, Low),
        ],
    );
    table.insert(
        BusinessType::Bakery,
        vec![
            EssentialCost::new(Rent, 1200.0, High),
            EssentialCost::new(Utilities, 450.0, High),
            EssentialCost::new(Equipment, 600.0, High),
            EssentialCost::new(Supplies, 900.0, Medium),
            EssentialCost::new(Licenses, 150.0, Medium),
        ],
    );
    table.insert(
        BusinessType::FoodTruck,
        vec![
            EssentialCost::new(Transport, 400.0, High),
            EssentialCost::new(Licenses, 250.0, High),
            EssentialCost::new(Supplies, 600.0, Medium),
            EssentialCost::new(Insurance, 200.0, Medium),
            EssentialCost::new(Marketing, 150.0, Low),
        ],
    );
    table.insert(
        BusinessType::JuiceBar,
        vec![
            EssentialCost::new(Rent, 1000.0, High),
            EssentialCost::new(Supplies, 700.0, High),
            EssentialCost::new(Utilities, 300.0, Medium),
            EssentialCost::new(Licenses, 120.0, Medium),
        ],
    );
    table
});

/// Essential cost categories for a business type.
pub fn essential_costs(business_type: BusinessType) -> &'static [EssentialCost] {
    ESSENTIAL_COSTS
        .get(&business_type)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// A cost category the business should have but doesn't.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingCost {
    /// The absent category
    pub category: CostCategory,

    /// Rough monthly estimate for the suggestion
    pub estimated_monthly: f64,

    /// How critical the absence is
    pub importance: Importance,

    /// Human-readable suggestion
    pub message: String,
}

/// Detect essential cost categories absent from the user's cost list.
pub fn detect_missing_costs(items: &[CostItem], business_type: BusinessType) -> Vec<MissingCost> {
    let present: Vec<CostCategory> = items.iter().map(|i| i.category).collect();

    essential_costs(business_type)
        .iter()
        .filter(|essential| !present.contains(&essential.category))
        .map(|essential| MissingCost {
            category: essential.category,
            estimated_monthly: essential.estimated_monthly,
            importance: essential.importance,
            message: format!(
                "A {} usually has {} costs; budget around {:.2}/month",
                business_type.display_name().to_lowercase(),
                essential.category.display_name().to_lowercase(),
                essential.estimated_monthly
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::CostFrequency;

    fn rent(amount: f64) -> CostItem {
        CostItem::new("Shop rent", amount, CostFrequency::Monthly, CostCategory::Rent)
    }

    #[test]
    fn test_low_rent_single_warning() {
        // 400/month against [800, 5000] at multiplier 1.0
        let findings = validate_cost(&rent(400.0), &BusinessContext::default());

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].finding_type, FindingType::Warning);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[0].suggested_amount, Some(800.0));
    }

    #[test]
    fn test_in_range_success() {
        let findings = validate_cost(&rent(1500.0), &BusinessContext::default());

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].finding_type, FindingType::Success);
        assert_eq!(findings[0].suggested_amount, None);
    }

    #[test]
    fn test_implausibly_high_is_error() {
        // 5000 * 1.5 = 7500; 8000 exceeds it
        let findings = validate_cost(&rent(8000.0), &BusinessContext::default());

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].finding_type, FindingType::Error);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].suggested_amount, Some(5000.0));
    }

    #[test]
    fn test_high_but_not_implausible_is_success() {
        // Between max and max*1.5: still plausible
        let findings = validate_cost(&rent(6000.0), &BusinessContext::default());

        assert_eq!(findings[0].finding_type, FindingType::Success);
    }

    #[test]
    fn test_zone_multiplier_scales_range() {
        let ctx = BusinessContext {
            zone: LocationZone::Rural,
            ..BusinessContext::default()
        };
        // Rural min = 800 * 0.85 = 680; 700 is now in range
        let findings = validate_cost(&rent(700.0), &ctx);
        assert_eq!(findings[0].finding_type, FindingType::Success);

        // Downtown min = 800 * 1.3 = 1040; 1000 now warns
        let downtown = BusinessContext {
            zone: LocationZone::Downtown,
            ..BusinessContext::default()
        };
        let findings = validate_cost(&rent(1000.0), &downtown);
        assert_eq!(findings[0].finding_type, FindingType::Warning);
        assert_eq!(findings[0].suggested_amount, Some(1040.0));
    }

    #[test]
    fn test_annual_cost_normalized_before_check() {
        // 14400/year = 1200/month: inside [800, 5000]
        let item = CostItem::new(
            "Shop rent",
            14_400.0,
            CostFrequency::Annual,
            CostCategory::Rent,
        );
        let findings = validate_cost(&item, &BusinessContext::default());
        assert_eq!(findings[0].finding_type, FindingType::Success);
    }

    #[test]
    fn test_personnel_below_minimum_wage_extra_warning() {
        let ctx = BusinessContext {
            employee_count: 2,
            ..BusinessContext::default()
        };
        // 2000/month total is inside the range, but 1000 per employee
        // sits below the 1300 wage floor: success plus wage warning
        let item = CostItem::new(
            "Cook salaries",
            2000.0,
            CostFrequency::Monthly,
            CostCategory::Personnel,
        );
        let findings = validate_cost(&item, &ctx);

        assert_eq!(findings.len(), 2);
        let wage = findings
            .iter()
            .find(|f| f.severity == Severity::High)
            .unwrap();
        assert_eq!(wage.finding_type, FindingType::Warning);
        assert_eq!(wage.suggested_amount, Some(2600.0));
    }

    #[test]
    fn test_personnel_at_minimum_wage_passes() {
        let item = CostItem::new(
            "Cook salary",
            MONTHLY_MINIMUM_WAGE,
            CostFrequency::Monthly,
            CostCategory::Personnel,
        );
        let findings = validate_cost(&item, &BusinessContext::default());

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].finding_type, FindingType::Success);
    }

    #[test]
    fn test_uncategorized_cost_skips_range_check() {
        let item = CostItem::new(
            "Misc",
            50.0,
            CostFrequency::Monthly,
            CostCategory::Other,
        );
        let findings = validate_cost(&item, &BusinessContext::default());

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].finding_type, FindingType::Success);
        assert!(findings[0].market_range.is_none());
    }

    #[test]
    fn test_missing_costs_for_restaurant() {
        let items = vec![rent(2000.0)];
        let missing = detect_missing_costs(&items, BusinessType::Restaurant);

        // Rent present; personnel, utilities, supplies, licenses, insurance absent
        assert_eq!(missing.len(), 5);
        assert!(missing.iter().all(|m| m.category != CostCategory::Rent));

        let personnel = missing
            .iter()
            .find(|m| m.category == CostCategory::Personnel)
            .unwrap();
        assert_eq!(personnel.importance, Importance::High);
        assert_eq!(personnel.estimated_monthly, 4000.0);
    }

    #[test]
    fn test_no_missing_costs_when_all_present() {
        let items: Vec<CostItem> = essential_costs(BusinessType::JuiceBar)
            .iter()
            .map(|e| CostItem::new("x", e.estimated_monthly, CostFrequency::Monthly, e.category))
            .collect();
        let missing = detect_missing_costs(&items, BusinessType::JuiceBar);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_every_business_type_has_essentials() {
        for business_type in BusinessType::ALL {
            assert!(!essential_costs(business_type).is_empty());
        }
    }

    #[test]
    fn test_finding_serialization() {
        let findings = validate_cost(&rent(400.0), &BusinessContext::default());
        let json = serde_json::to_string(&findings).unwrap();
        assert!(json.contains("\"finding_type\":\"warning\""));
        assert!(json.contains("\"severity\":\"medium\""));

        let roundtrip: Vec<ValidationFinding> = serde_json::from_str(&json).unwrap();
        assert_eq!(findings, roundtrip);
    }
}
