//! # Engine Facade
//!
//! The operations a presentation or API layer calls. Every function
//! takes the [`Business`] container explicitly; there is no implicit
//! global business and no cached derived state. Recomputation is the
//! only invalidation strategy.
//!
//! ## Overhead allocation
//!
//! Business-wide variable costs are divided evenly across products:
//! each product's price record carries `total_overhead / product_count`
//! as its overhead share. Adding the full overhead to every product
//! would count it once per product in any business-wide total, so no
//! full-sum policy exists here.
//!
//! ## Example
//!
//! ```rust
//! use costwise_core::business::Business;
//! use costwise_core::engine;
//! use costwise_core::products::Product;
//!
//! let mut business = Business::new("Dana Baker", "Corner Lemonade");
//! let id = business.add_product(Product::new_resale("Bottled water", 4.0)).unwrap();
//!
//! let record = engine::compute_product_pricing(&business, id).unwrap();
//! assert_eq!(record.suggested_price, 4.8);
//!
//! let summary = engine::compute_business_summary(&business).unwrap();
//! assert_eq!(summary.total_product_cost, 4.0);
//! ```

use uuid::Uuid;

use crate::business::Business;
use crate::calculations::break_even::{self, BreakEvenInput, BreakEvenResult};
use crate::calculations::pricing::{self, PriceRecord, PricingInput};
use crate::calculations::summary::{summarize, BusinessSummary};
use crate::costs::{monthly_fixed_total, overhead_total, CostItem};
use crate::errors::{EngineError, EngineResult};
use crate::market::{self, MissingCost, ValidationFinding};

/// Each product's share of the business-wide overhead pool.
fn overhead_share(business: &Business) -> f64 {
    let count = business.product_count();
    if count == 0 {
        return 0.0;
    }
    overhead_total(&business.additional_costs) / count as f64
}

/// Compute the price record for one product.
///
/// Pure given the business state: calling this twice without changing
/// the business yields bit-identical records.
///
/// # Errors
///
/// [`EngineError::NotFound`] when the product is not in the business.
pub fn compute_product_pricing(business: &Business, product_id: Uuid) -> EngineResult<PriceRecord> {
    let product = business
        .get_product(&product_id)
        .ok_or_else(|| EngineError::not_found("Product", product_id.to_string()))?;

    let input = PricingInput {
        product: product.clone(),
        overhead_share: overhead_share(business),
        margin_percent: business.settings.margin_percent,
        client_price: business.client_price(product_id),
    };
    pricing::calculate(&input)
}

/// Compute price records for every product, ordered by product name
/// (then id) so output is stable across the unordered product map.
pub fn compute_all_pricing(business: &Business) -> EngineResult<Vec<PriceRecord>> {
    let mut products: Vec<&Uuid> = business.products.keys().collect();
    products.sort_by_key(|id| {
        let product = &business.products[*id];
        (product.name.clone(), product.id)
    });

    products
        .into_iter()
        .map(|id| compute_product_pricing(business, *id))
        .collect()
}

/// Fold the whole business into a [`BusinessSummary`].
///
/// A business with no products still reports its overhead total; see
/// the summary module's empty-state contract.
pub fn compute_business_summary(business: &Business) -> EngineResult<BusinessSummary> {
    let records = compute_all_pricing(business)?;
    Ok(summarize(&records, &business.additional_costs))
}

/// Run break-even analysis for the business.
///
/// Averages the per-product cost totals and effective selling prices
/// across the product mix, takes monthly fixed costs from the cost
/// list, and capacity plus reference investment from settings.
/// `target_profit` switches to the goal-adjusted mode.
///
/// # Errors
///
/// [`EngineError::MissingField`] when the business has no products to
/// average over.
pub fn compute_break_even(
    business: &Business,
    target_profit: Option<f64>,
) -> EngineResult<BreakEvenResult> {
    let records = compute_all_pricing(business)?;
    if records.is_empty() {
        return Err(EngineError::missing_field("products"));
    }

    let count = records.len() as f64;
    let avg_variable_cost = records.iter().map(|r| r.cost_total).sum::<f64>() / count;
    let avg_selling_price = records.iter().map(|r| r.client_price).sum::<f64>() / count;

    let input = BreakEvenInput {
        fixed_costs: monthly_fixed_total(&business.fixed_costs),
        avg_variable_cost,
        avg_selling_price,
        monthly_capacity: business.settings.monthly_capacity,
        target_profit,
        reference_investment: business.settings.reference_investment,
    };
    break_even::calculate(&input)
}

/// Validate a cost entry against the market table, in this business's
/// context. Advisory only; never blocks the entry.
pub fn validate_cost_entry(business: &Business, item: &CostItem) -> Vec<ValidationFinding> {
    market::validate_cost(item, &business.context())
}

/// Essential cost categories this business type is missing.
pub fn missing_cost_suggestions(business: &Business) -> Vec<MissingCost> {
    market::detect_missing_costs(&business.fixed_costs, business.settings.business_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::{AdditionalVariableCost, CostCategory, CostFrequency};
    use crate::market::FindingType;
    use crate::products::{Ingredient, Product};

    /// A lemonade stand with two products, overhead, and one client price.
    fn test_business() -> (Business, Uuid, Uuid) {
        let mut business = Business::new("Dana Baker", "Corner Lemonade");

        let lemonade_id = business
            .add_product(Product::new_recipe(
                "Lemonade",
                vec![Ingredient::new("Lemons", "kg", 2.0, Some(5.0), 10.0)],
            ))
            .unwrap();
        let water_id = business
            .add_product(Product::new_resale("Bottled water", 2.0))
            .unwrap();

        business
            .add_additional_cost(AdditionalVariableCost::overhead("packaging", "Cups", 3.0))
            .unwrap();
        business
            .add_fixed_cost(CostItem::new(
                "Stand rent",
                1000.0,
                CostFrequency::Monthly,
                CostCategory::Rent,
            ))
            .unwrap();
        business.update_client_price(lemonade_id, 8.0).unwrap();

        (business, lemonade_id, water_id)
    }

    #[test]
    fn test_overhead_split_evenly() {
        let (business, lemonade_id, water_id) = test_business();

        // 3.0 overhead across 2 products = 1.5 each
        let lemonade = compute_product_pricing(&business, lemonade_id).unwrap();
        let water = compute_product_pricing(&business, water_id).unwrap();

        assert_eq!(lemonade.overhead_share, 1.5);
        assert_eq!(water.overhead_share, 1.5);
        assert_eq!(lemonade.cost_total, 5.5);
        assert_eq!(water.cost_total, 3.5);
    }

    #[test]
    fn test_pricing_uses_client_price_when_set() {
        let (business, lemonade_id, water_id) = test_business();

        let lemonade = compute_product_pricing(&business, lemonade_id).unwrap();
        assert_eq!(lemonade.client_price, 8.0);
        // (8 - 5.5) / 8 * 100 = 31.25
        assert_eq!(lemonade.margin_real, 31.25);

        // Water has no client price: falls back to suggestion
        let water = compute_product_pricing(&business, water_id).unwrap();
        assert_eq!(water.client_price, water.suggested_price);
    }

    #[test]
    fn test_pricing_unknown_product() {
        let (business, _, _) = test_business();
        let err = compute_product_pricing(&business, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_pricing_is_idempotent() {
        let (business, lemonade_id, _) = test_business();

        let first = compute_product_pricing(&business, lemonade_id).unwrap();
        let second = compute_product_pricing(&business, lemonade_id).unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_all_pricing_sorted_by_name() {
        let (business, _, _) = test_business();
        let records = compute_all_pricing(&business).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product_name, "Bottled water");
        assert_eq!(records[1].product_name, "Lemonade");
    }

    #[test]
    fn test_business_summary() {
        let (business, _, _) = test_business();
        let summary = compute_business_summary(&business).unwrap();

        // Own costs 4.0 + 2.0, overhead 3.0
        assert_eq!(summary.total_product_cost, 6.0);
        assert_eq!(summary.total_additional_cost, 3.0);
        assert_eq!(summary.total_cost_general, 9.0);
        // Water falls back to suggestion 3.5 * 1.2 = 4.2; lemonade 8.0
        assert_eq!(summary.total_client_revenue, 12.2);
        assert_eq!(summary.total_real_profit, 3.2);
    }

    #[test]
    fn test_summary_of_empty_business_keeps_overhead() {
        let mut business = Business::new("Owner", "Shop");
        business
            .add_additional_cost(AdditionalVariableCost::overhead("packaging", "Cups", 3.0))
            .unwrap();

        let summary = compute_business_summary(&business).unwrap();
        assert_eq!(summary.total_additional_cost, 3.0);
        assert_eq!(summary.total_cost_general, 0.0);
        assert_eq!(summary.total_client_revenue, 0.0);
    }

    #[test]
    fn test_break_even_from_business() {
        let (business, _, _) = test_business();
        let result = compute_break_even(&business, None).unwrap();

        // avg cost (5.5 + 3.5) / 2 = 4.5; avg price (8.0 + 4.2) / 2 = 6.1
        assert_eq!(result.contribution_margin, 1.6);
        // ceil(1000 / 1.6) = 625
        assert_eq!(result.break_even_units, 625.0);
        assert!(result.is_achievable());
    }

    #[test]
    fn test_break_even_with_target() {
        let (business, _, _) = test_business();
        let classic = compute_break_even(&business, None).unwrap();
        let with_goal = compute_break_even(&business, Some(600.0)).unwrap();

        assert!(with_goal.break_even_units > classic.break_even_units);
        // ceil(1600 / 1.6) = 1000
        assert_eq!(with_goal.break_even_units, 1000.0);
    }

    #[test]
    fn test_break_even_without_products() {
        let business = Business::new("Owner", "Shop");
        let err = compute_break_even(&business, None).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_validate_cost_entry_uses_business_context() {
        let (business, _, _) = test_business();
        let rent = CostItem::new("Rent", 400.0, CostFrequency::Monthly, CostCategory::Rent);

        let findings = validate_cost_entry(&business, &rent);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].finding_type, FindingType::Warning);
        assert_eq!(findings[0].suggested_amount, Some(800.0));
    }

    #[test]
    fn test_missing_cost_suggestions() {
        let (business, _, _) = test_business();
        // Default business type is Cafeteria; rent is present
        let missing = missing_cost_suggestions(&business);

        assert!(missing.iter().all(|m| m.category != CostCategory::Rent));
        assert!(missing.iter().any(|m| m.category == CostCategory::Utilities));
    }
}
