//! # Break-Even Analysis
//!
//! Classic break-even over monthly fixed costs and per-unit averages,
//! with an optional target profit ("how many units to *also* earn X").
//!
//! ## Sentinel policy
//!
//! When the contribution margin (price minus variable cost) is zero or
//! negative, no unit volume recovers fixed costs. The analyzer returns
//! `break_even_units = f64::INFINITY` and never divides by the
//! non-positive margin; callers check [`BreakEvenResult::is_achievable`].
//!
//! ## Example
//!
//! ```rust
//! use costwise_core::calculations::break_even::{calculate, BreakEvenInput};
//!
//! let input = BreakEvenInput {
//!     fixed_costs: 1000.0,
//!     avg_variable_cost: 3.0,
//!     avg_selling_price: 8.0,
//!     monthly_capacity: 500.0,
//!     target_profit: None,
//!     reference_investment: 25_000.0,
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.break_even_units, 200.0);
//! assert_eq!(result.break_even_revenue, 1600.0);
//! assert!(result.is_achievable());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};
use crate::rounding::round2;

/// Input parameters for break-even analysis.
///
/// `avg_variable_cost` and `avg_selling_price` are per-unit averages
/// across the product mix; the engine facade derives them from price
/// records. `reference_investment` is the capital figure ROI is measured
/// against; it is always caller-supplied, never assumed by the analyzer.
///
/// ## JSON Example
///
/// ```json
/// {
///   "fixed_costs": 1000.0,
///   "avg_variable_cost": 3.0,
///   "avg_selling_price": 8.0,
///   "monthly_capacity": 500.0,
///   "target_profit": 500.0,
///   "reference_investment": 25000.0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenInput {
    /// Total monthly fixed costs
    pub fixed_costs: f64,

    /// Average variable cost per unit sold
    pub avg_variable_cost: f64,

    /// Average selling price per unit
    pub avg_selling_price: f64,

    /// Units the business can produce/sell per month
    pub monthly_capacity: f64,

    /// Desired monthly profit on top of covering fixed costs;
    /// `None` runs the classic break-even
    pub target_profit: Option<f64>,

    /// Capital figure the annual ROI is measured against
    pub reference_investment: f64,
}

impl BreakEvenInput {
    /// Validate input parameters.
    pub fn validate(&self) -> EngineResult<()> {
        if self.fixed_costs < 0.0 {
            return Err(EngineError::invalid_input(
                "fixed_costs",
                self.fixed_costs.to_string(),
                "Fixed costs must not be negative",
            ));
        }
        if self.avg_variable_cost < 0.0 {
            return Err(EngineError::invalid_input(
                "avg_variable_cost",
                self.avg_variable_cost.to_string(),
                "Variable cost must not be negative",
            ));
        }
        if self.avg_selling_price < 0.0 {
            return Err(EngineError::invalid_input(
                "avg_selling_price",
                self.avg_selling_price.to_string(),
                "Selling price must not be negative",
            ));
        }
        if self.monthly_capacity <= 0.0 {
            return Err(EngineError::invalid_input(
                "monthly_capacity",
                self.monthly_capacity.to_string(),
                "Monthly capacity must be positive",
            ));
        }
        if let Some(target) = self.target_profit {
            if target < 0.0 {
                return Err(EngineError::invalid_input(
                    "target_profit",
                    target.to_string(),
                    "Target profit must not be negative",
                ));
            }
        }
        if self.reference_investment < 0.0 {
            return Err(EngineError::invalid_input(
                "reference_investment",
                self.reference_investment.to_string(),
                "Reference investment must not be negative",
            ));
        }
        Ok(())
    }
}

/// Results of break-even analysis.
///
/// `break_even_units` and `break_even_revenue` are `f64::INFINITY` when
/// the contribution margin is zero or negative (the sentinel, not an
/// error). All finite money/percent values are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenResult {
    /// Per-unit contribution margin: price minus variable cost
    pub contribution_margin: f64,

    /// Target profit included in the unit calculation (0 for classic)
    pub target_profit: f64,

    /// Units per month to cover fixed costs (and the target profit,
    /// if one was set); infinite when the margin is non-positive
    pub break_even_units: f64,

    /// Revenue at the break-even volume
    pub break_even_revenue: f64,

    /// How far capacity sits above break-even, as a percentage of
    /// capacity; clamped to 0 when break-even is out of reach
    pub margin_of_safety_pct: f64,

    /// Profit at full monthly capacity
    pub monthly_profit: f64,

    /// Annualized profit relative to the reference investment
    pub annual_roi_pct: f64,
}

impl BreakEvenResult {
    /// Whether a finite sales volume reaches break-even.
    pub fn is_achievable(&self) -> bool {
        self.break_even_units.is_finite()
    }
}

/// Run break-even analysis.
///
/// Classic mode covers fixed costs; supplying `target_profit` switches
/// to the goal-adjusted mode, `ceil((fixed + target) / margin)`.
pub fn calculate(input: &BreakEvenInput) -> EngineResult<BreakEvenResult> {
    input.validate()?;

    let contribution_margin = input.avg_selling_price - input.avg_variable_cost;
    let target_profit = input.target_profit.unwrap_or(0.0);

    let (break_even_units, break_even_revenue, margin_of_safety_pct) =
        if contribution_margin <= 0.0 {
            // Selling at or below variable cost: no volume ever recovers
            // fixed costs. Sentinel, not a division.
            (f64::INFINITY, f64::INFINITY, 0.0)
        } else {
            let units = ((input.fixed_costs + target_profit) / contribution_margin).ceil();
            let revenue = round2(units * input.avg_selling_price);
            let safety = round2(f64::max(
                0.0,
                ((input.monthly_capacity - units) / input.monthly_capacity) * 100.0,
            ));
            (units, revenue, safety)
        };

    let monthly_profit = round2(
        input.monthly_capacity * input.avg_selling_price
            - input.monthly_capacity * input.avg_variable_cost
            - input.fixed_costs,
    );

    let annual_roi_pct = if input.reference_investment > 0.0 {
        round2(((monthly_profit * 12.0) / input.reference_investment) * 100.0)
    } else {
        0.0
    };

    Ok(BreakEvenResult {
        contribution_margin: round2(contribution_margin),
        target_profit,
        break_even_units,
        break_even_revenue,
        margin_of_safety_pct,
        monthly_profit,
        annual_roi_pct,
    })
}
