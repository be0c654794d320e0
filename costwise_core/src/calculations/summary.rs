//! # Business Summary Aggregation
//!
//! Folds per-product [`PriceRecord`]s into business-wide totals and
//! averages. Pure aggregation over the input slices; nothing here reads
//! or writes state.
//!
//! ## Empty-state contract
//!
//! A business with no priced products returns a summary with every
//! cost/revenue field zeroed *except* `total_additional_cost`, which is
//! still the sum of business-wide overhead. Overhead exists before the
//! first product does, and the display layer shows it as such.
//!
//! ## Sentinel policy
//!
//! `total_profitability` and `estimated_roi` are ratios; both return
//! `0.0` instead of dividing when their denominator is zero.

use serde::{Deserialize, Serialize};

use crate::calculations::pricing::PriceRecord;
use crate::costs::{overhead_total, AdditionalVariableCost};
use crate::rounding::round2;

/// Aggregate financial picture of one business.
///
/// Derived entirely from price records and overhead costs; recomputed on
/// demand and never persisted as a source of truth.
///
/// ## JSON Example
///
/// ```json
/// {
///   "total_product_cost": 7.5,
///   "total_additional_cost": 2.0,
///   "total_cost_general": 9.5,
///   "total_suggested_revenue": 11.4,
///   "total_client_revenue": 12.0,
///   "total_suggested_profit": 1.9,
///   "total_real_profit": 2.5,
///   "average_margin": 20.83,
///   "total_profitability": 20.83,
///   "estimated_roi": 26.32
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessSummary {
    /// Sum of the products' own unit costs (before overhead allocation)
    pub total_product_cost: f64,

    /// Sum of business-wide overhead costs
    pub total_additional_cost: f64,

    /// `total_product_cost + total_additional_cost`
    pub total_cost_general: f64,

    /// Revenue if every product sold at its suggested price
    pub total_suggested_revenue: f64,

    /// Revenue at the effective client prices
    pub total_client_revenue: f64,

    /// Profit at suggested prices, against total cost
    pub total_suggested_profit: f64,

    /// Profit at client prices, against total cost
    pub total_real_profit: f64,

    /// Arithmetic mean of the records' realized margins
    pub average_margin: f64,

    /// `total_real_profit / total_client_revenue`, as a percentage
    pub total_profitability: f64,

    /// `total_real_profit / total_cost_general`, as a percentage
    pub estimated_roi: f64,
}

impl BusinessSummary {
    /// Summary for a business with no priced products. Overhead is the
    /// only nonzero field.
    fn empty(total_additional_cost: f64) -> Self {
        BusinessSummary {
            total_product_cost: 0.0,
            total_additional_cost,
            total_cost_general: 0.0,
            total_suggested_revenue: 0.0,
            total_client_revenue: 0.0,
            total_suggested_profit: 0.0,
            total_real_profit: 0.0,
            average_margin: 0.0,
            total_profitability: 0.0,
            estimated_roi: 0.0,
        }
    }

    /// Whether the business as a whole makes money at client prices.
    pub fn is_profitable(&self) -> bool {
        self.total_real_profit > 0.0
    }
}

/// Fold price records and overhead costs into a [`BusinessSummary`].
pub fn summarize(
    records: &[PriceRecord],
    additional_costs: &[AdditionalVariableCost],
) -> BusinessSummary {
    let total_additional_cost = round2(overhead_total(additional_costs));

    if records.is_empty() {
        return BusinessSummary::empty(total_additional_cost);
    }

    let total_product_cost: f64 = records.iter().map(|r| r.unit_cost).sum();
    let total_cost_general = total_product_cost + total_additional_cost;
    let total_suggested_revenue: f64 = records.iter().map(|r| r.suggested_price).sum();
    let total_client_revenue: f64 = records.iter().map(|r| r.client_price).sum();
    let total_suggested_profit = total_suggested_revenue - total_cost_general;
    let total_real_profit = total_client_revenue - total_cost_general;

    let margin_sum: f64 = records.iter().map(|r| r.margin_real).sum();
    let average_margin = round2(margin_sum / records.len() as f64);

    let total_profitability = if total_client_revenue > 0.0 {
        round2((total_real_profit / total_client_revenue) * 100.0)
    } else {
        0.0
    };

    let estimated_roi = if total_cost_general > 0.0 {
        round2((total_real_profit / total_cost_general) * 100.0)
    } else {
        0.0
    };

    BusinessSummary {
        total_product_cost: round2(total_product_cost),
        total_additional_cost,
        total_cost_general: round2(total_cost_general),
        total_suggested_revenue: round2(total_suggested_revenue),
        total_client_revenue: round2(total_client_revenue),
        total_suggested_profit: round2(total_suggested_profit),
        total_real_profit: round2(total_real_profit),
        average_margin,
        total_profitability,
        estimated_roi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::pricing::{calculate, PricingInput, DEFAULT_MARGIN_PERCENT};
    use crate::products::Product;

    fn record(name: &str, unit_cost: f64, client_price: Option<f64>) -> PriceRecord {
        let input = PricingInput {
            product: Product::new_resale(name, unit_cost),
            overhead_share: 0.0,
            margin_percent: DEFAULT_MARGIN_PERCENT,
            client_price,
        };
        calculate(&input).unwrap()
    }

    #[test]
    fn test_empty_records_zeroes_everything_but_overhead() {
        let overhead = vec![
            AdditionalVariableCost::overhead("packaging", "Boxes", 120.0),
            AdditionalVariableCost::overhead("delivery", "Fuel", 80.0),
        ];
        let summary = summarize(&[], &overhead);

        assert_eq!(summary.total_additional_cost, 200.0);
        assert_eq!(summary.total_product_cost, 0.0);
        assert_eq!(summary.total_cost_general, 0.0);
        assert_eq!(summary.total_suggested_revenue, 0.0);
        assert_eq!(summary.total_client_revenue, 0.0);
        assert_eq!(summary.total_real_profit, 0.0);
        assert_eq!(summary.average_margin, 0.0);
        assert_eq!(summary.total_profitability, 0.0);
        assert_eq!(summary.estimated_roi, 0.0);
    }

    #[test]
    fn test_totals_are_plain_sums() {
        let records = vec![
            record("Lemonade", 4.0, Some(5.0)),
            record("Sandwich", 3.5, Some(7.0)),
        ];
        let summary = summarize(&records, &[]);

        assert_eq!(summary.total_product_cost, 7.5);
        assert_eq!(summary.total_cost_general, 7.5);
        assert_eq!(summary.total_client_revenue, 12.0);
        // 4.8 + 4.2
        assert_eq!(summary.total_suggested_revenue, 9.0);
        assert_eq!(summary.total_real_profit, 4.5);
    }

    #[test]
    fn test_average_margin_is_arithmetic_mean() {
        let records = vec![
            // margin_real = 20.0
            record("Lemonade", 4.0, Some(5.0)),
            // margin_real = 50.0
            record("Sandwich", 3.5, Some(7.0)),
        ];
        let summary = summarize(&records, &[]);
        assert_eq!(summary.average_margin, 35.0);
    }

    #[test]
    fn test_overhead_counted_once_in_general_cost() {
        let overhead = vec![AdditionalVariableCost::overhead("packaging", "Cups", 2.0)];
        let records = vec![record("Lemonade", 4.0, Some(8.0))];
        let summary = summarize(&records, &overhead);

        assert_eq!(summary.total_product_cost, 4.0);
        assert_eq!(summary.total_additional_cost, 2.0);
        assert_eq!(summary.total_cost_general, 6.0);
        assert_eq!(summary.total_real_profit, 2.0);
        // 2 / 6 * 100
        assert_eq!(summary.estimated_roi, 33.33);
        // 2 / 8 * 100
        assert_eq!(summary.total_profitability, 25.0);
    }

    #[test]
    fn test_loss_surfaces_as_negative_profit() {
        let records = vec![record("Lemonade", 4.0, Some(3.0))];
        let summary = summarize(&records, &[]);

        assert_eq!(summary.total_real_profit, -1.0);
        assert!(!summary.is_profitable());
        assert_eq!(summary.total_profitability, -33.33);
    }

    #[test]
    fn test_summary_serialization_roundtrip() {
        let records = vec![record("Lemonade", 4.0, Some(5.0))];
        let summary = summarize(&records, &[]);
        let json = serde_json::to_string(&summary).unwrap();
        let roundtrip: BusinessSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, roundtrip);
    }
}
