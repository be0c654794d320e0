//! # Product Pricing Calculation
//!
//! Turns one product plus its allocated overhead share into a
//! [`PriceRecord`]: total unit cost, suggested price at a flat margin,
//! and realized margin/profit against the client's price.
//!
//! ## Sentinel policy
//!
//! - [`real_margin`] returns `0.0` when the client price is zero or
//!   negative. This is a documented safe default, not an error: a
//!   product without a price yet simply has no realized margin.
//! - [`profit_per_unit`] may be negative; a loss is a result, not an
//!   error.
//!
//! ## Example
//!
//! ```rust
//! use costwise_core::calculations::pricing::{calculate, PricingInput, DEFAULT_MARGIN_PERCENT};
//! use costwise_core::products::{Ingredient, Product};
//!
//! let product = Product::new_recipe(
//!     "Lemonade",
//!     vec![Ingredient::new("Lemons", "kg", 2.0, Some(5.0), 10.0)],
//! );
//!
//! let input = PricingInput {
//!     product,
//!     overhead_share: 0.0,
//!     margin_percent: DEFAULT_MARGIN_PERCENT,
//!     client_price: None,
//! };
//!
//! let record = calculate(&input).unwrap();
//! assert_eq!(record.cost_total, 4.0);
//! assert_eq!(record.suggested_price, 4.8);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};
use crate::products::Product;
use crate::rounding::round2;

/// Flat margin applied when the business has not configured one.
pub const DEFAULT_MARGIN_PERCENT: f64 = 20.0;

/// Suggested selling price: `cost_total * (1 + margin_percent / 100)`,
/// rounded to 2 decimals.
///
/// Rejects a negative cost with [`EngineError::InvalidInput`]; a zero
/// cost is allowed and yields a zero suggestion.
pub fn suggested_price(cost_total: f64, margin_percent: f64) -> EngineResult<f64> {
    if cost_total < 0.0 {
        return Err(EngineError::invalid_input(
            "cost_total",
            cost_total.to_string(),
            "Cost must not be negative",
        ));
    }
    Ok(round2(cost_total * (1.0 + margin_percent / 100.0)))
}

/// Realized margin percentage: `((price - cost) / price) * 100`.
///
/// Returns `0.0` when `client_price <= 0` instead of dividing: the
/// documented safe default for unpriced products.
pub fn real_margin(cost_total: f64, client_price: f64) -> f64 {
    if client_price <= 0.0 {
        return 0.0;
    }
    round2(((client_price - cost_total) / client_price) * 100.0)
}

/// Per-unit profit: `client_price - cost_total`. Negative means a loss.
pub fn profit_per_unit(cost_total: f64, client_price: f64) -> f64 {
    round2(client_price - cost_total)
}

/// Profit relative to cost (markup realized on cost), as a percentage.
/// Guarded to `0.0` when the cost is zero.
pub fn profitability(cost_total: f64, client_price: f64) -> f64 {
    if cost_total <= 0.0 {
        return 0.0;
    }
    round2(((client_price - cost_total) / cost_total) * 100.0)
}

/// Input for one product's pricing calculation.
///
/// The overhead share is the slice of business-wide variable costs
/// allocated to this product; the engine facade computes it by dividing
/// total overhead evenly across products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingInput {
    /// The product to price
    pub product: Product,

    /// This product's allocated share of business-wide overhead
    pub overhead_share: f64,

    /// Margin percentage for the suggested price (e.g., 20.0)
    pub margin_percent: f64,

    /// Client-set selling price; `None` means not priced yet, in which
    /// case the suggested price stands in for it
    pub client_price: Option<f64>,
}

impl PricingInput {
    /// Validate input parameters.
    pub fn validate(&self) -> EngineResult<()> {
        self.product.validate()?;
        if self.overhead_share < 0.0 {
            return Err(EngineError::invalid_input(
                "overhead_share",
                self.overhead_share.to_string(),
                "Overhead share must not be negative",
            ));
        }
        if self.margin_percent < 0.0 {
            return Err(EngineError::invalid_input(
                "margin_percent",
                self.margin_percent.to_string(),
                "Margin percent must not be negative",
            ));
        }
        if let Some(price) = self.client_price {
            if price <= 0.0 {
                return Err(EngineError::invalid_input(
                    "client_price",
                    price.to_string(),
                    "Client price must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Derived pricing metrics for one product.
///
/// Recomputed whenever the client price or underlying costs change;
/// never edited field by field.
///
/// ## JSON Example
///
/// ```json
/// {
///   "product_id": "5f7c1b1e-83c8-4b1e-9df1-1c2b77f5a001",
///   "product_name": "Lemonade",
///   "unit_cost": 4.0,
///   "overhead_share": 0.0,
///   "cost_total": 4.0,
///   "suggested_price": 4.8,
///   "client_price": 5.0,
///   "margin_suggested": 16.67,
///   "margin_real": 20.0,
///   "profit_per_unit": 1.0,
///   "profitability": 25.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Product this record was computed for
    pub product_id: Uuid,

    /// Product name, echoed for display layers
    pub product_name: String,

    /// The product's own unit cost (ingredients or resale cost)
    pub unit_cost: f64,

    /// Allocated share of business-wide overhead
    pub overhead_share: f64,

    /// `unit_cost + overhead_share`
    pub cost_total: f64,

    /// Cost plus the configured flat margin
    pub suggested_price: f64,

    /// Effective selling price: the client's price, or the suggested
    /// price when the client has not set one
    pub client_price: f64,

    /// Margin realized if sold at the suggested price
    pub margin_suggested: f64,

    /// Margin realized at the effective client price
    pub margin_real: f64,

    /// Profit per unit at the effective client price (negative = loss)
    pub profit_per_unit: f64,

    /// Profit relative to cost, as a percentage
    pub profitability: f64,
}

impl PriceRecord {
    /// Whether the effective price covers the total cost.
    pub fn is_profitable(&self) -> bool {
        self.profit_per_unit > 0.0
    }
}

/// Compute the full price record for one product.
///
/// Pure function: identical inputs give bit-identical records.
///
/// # Errors
///
/// [`EngineError::InvalidInput`] / [`EngineError::MissingField`] when
/// the product or parameters fail validation.
pub fn calculate(input: &PricingInput) -> EngineResult<PriceRecord> {
    input.validate()?;

    let unit_cost = round2(input.product.unit_cost());
    let cost_total = round2(unit_cost + input.overhead_share);

    let suggested = suggested_price(cost_total, input.margin_percent)?;
    let client_price = input.client_price.unwrap_or(suggested);

    Ok(PriceRecord {
        product_id: input.product.id,
        product_name: input.product.name.clone(),
        unit_cost,
        overhead_share: round2(input.overhead_share),
        cost_total,
        suggested_price: suggested,
        client_price,
        margin_suggested: real_margin(cost_total, suggested),
        margin_real: real_margin(cost_total, client_price),
        profit_per_unit: profit_per_unit(cost_total, client_price),
        profitability: profitability(cost_total, client_price),
    })
}
